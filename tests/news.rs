mod common;

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{ DateTime, Duration, Utc };
use uuid::Uuid;

use base_pulse::db::{ NewNewsItem, NewsFilter, NewsRepository, SourceRepository };
use base_pulse::enums::{ Category, Priority, SourceKind };
use base_pulse::error::AppError;
use base_pulse::services::{ NewsService, RetentionSweepJob };

use common::*;

fn item(source_id: Uuid, link: &str, created_at: DateTime<Utc>, ttl: Duration) -> NewNewsItem {
    NewNewsItem {
        source_id,
        title: link.to_string(),
        content: None,
        image_url: None,
        original_link: link.to_string(),
        source_kind: SourceKind::Farcaster,
        created_at,
        expires_at: created_at + ttl,
    }
}

#[tokio::test]
async fn test_pages_cover_all_live_items_without_overlap() {
    let db = setup_db().await;
    let sources = SourceRepository::new(db.clone());
    let news = NewsRepository::new(db.clone());
    let source = create_source(&sources, "Base", None, None, Category::Official).await;

    // 25 live items, some sharing a timestamp, plus 3 expired ones
    for i in 0..25 {
        let at = t0() - Duration::minutes(i / 2);
        news.insert_if_absent(item(source.id, &format!("live-{}", i), at, Duration::hours(48))).await.unwrap();
    }
    for i in 0..3 {
        let at = t0() - Duration::hours(50);
        news.insert_if_absent(item(source.id, &format!("dead-{}", i), at, Duration::hours(48))).await.unwrap();
    }

    let service = NewsService::new(news, manual_clock());

    let mut seen = HashSet::new();
    let mut previous_created = None;
    for page in 1..=3u64 {
        let result = service.list(NewsFilter::default(), Some(page), Some(10)).await.unwrap();
        assert_eq!(result.total, 25);
        assert_eq!(result.has_more, page < 3, "hasMore on page {}", page);

        for (news_item, project) in &result.items {
            assert!(seen.insert(news_item.id), "item repeated across pages");
            assert!(news_item.expires_at > t0());
            assert_eq!(project.as_ref().map(|p| p.id), Some(source.id));
            if let Some(prev) = previous_created {
                assert!(news_item.created_at <= prev, "not newest first");
            }
            previous_created = Some(news_item.created_at);
        }
    }
    assert_eq!(seen.len(), 25);

    let beyond = service.list(NewsFilter::default(), Some(4), Some(10)).await.unwrap();
    assert!(beyond.items.is_empty());
    assert!(!beyond.has_more);
}

#[tokio::test]
async fn test_has_more_is_false_on_exact_last_page() {
    let db = setup_db().await;
    let sources = SourceRepository::new(db.clone());
    let news = NewsRepository::new(db.clone());
    let source = create_source(&sources, "Base", None, None, Category::Official).await;
    for i in 0..20 {
        news.insert_if_absent(item(source.id, &format!("n-{}", i), t0(), Duration::hours(48))).await.unwrap();
    }

    let service = NewsService::new(news, manual_clock());
    let first = service.list(NewsFilter::default(), None, None).await.unwrap();

    assert_eq!(first.page, 1);
    assert_eq!(first.page_size, 20);
    assert_eq!(first.items.len(), 20);
    assert!(!first.has_more);
}

#[tokio::test]
async fn test_invalid_paging_is_rejected() {
    let db = setup_db().await;
    let service = NewsService::new(NewsRepository::new(db), manual_clock());

    for (page, size) in [(Some(0), None), (None, Some(0)), (None, Some(101))] {
        let result = service.list(NewsFilter::default(), page, size).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))), "{:?}/{:?}", page, size);
    }
    assert!(service.list(NewsFilter::default(), Some(1), Some(100)).await.is_ok());
}

#[tokio::test]
async fn test_filters_by_source_category_and_priority() {
    let db = setup_db().await;
    let sources = SourceRepository::new(db.clone());
    let news = NewsRepository::new(db.clone());

    let official = create_source(&sources, "Base", None, None, Category::Official).await;
    let defi = create_source(&sources, "Aerodrome", None, None, Category::Defi).await;
    news.insert_if_absent(item(official.id, "o-1", t0(), Duration::hours(48))).await.unwrap();
    news.insert_if_absent(item(defi.id, "d-1", t0(), Duration::hours(48))).await.unwrap();
    news.insert_if_absent(item(defi.id, "d-2", t0(), Duration::hours(48))).await.unwrap();

    let service = NewsService::new(news, manual_clock());

    let defi_only = service
        .list(NewsFilter { category: Some(Category::Defi), priority: None }, None, None).await
        .unwrap();
    assert_eq!(defi_only.total, 2);
    assert!(defi_only.items.iter().all(|(n, _)| n.source_id == defi.id));

    // create_source uses NORMAL priority
    let high = service
        .list(NewsFilter { category: None, priority: Some(Priority::High) }, None, None).await
        .unwrap();
    assert_eq!(high.total, 0);

    let normal_official = service
        .list(
            NewsFilter { category: Some(Category::Official), priority: Some(Priority::Normal) },
            None,
            None
        ).await
        .unwrap();
    assert_eq!(normal_official.total, 1);
}

#[tokio::test]
async fn test_highlights_are_latest_ten_official_items() {
    let db = setup_db().await;
    let sources = SourceRepository::new(db.clone());
    let news = NewsRepository::new(db.clone());

    let official = create_source(&sources, "Base", None, None, Category::Official).await;
    let meme = create_source(&sources, "Degen", None, None, Category::Meme).await;
    for i in 0..12 {
        let at = t0() - Duration::minutes(i);
        news.insert_if_absent(item(official.id, &format!("o-{}", i), at, Duration::hours(48))).await.unwrap();
    }
    news.insert_if_absent(item(meme.id, "m-1", t0(), Duration::hours(48))).await.unwrap();
    news.insert_if_absent(
        item(official.id, "o-expired", t0() - Duration::hours(49), Duration::hours(48))
    ).await.unwrap();

    let service = NewsService::new(news, manual_clock());
    let highlights = service.highlights().await.unwrap();

    assert_eq!(highlights.len(), 10);
    assert_eq!(highlights[0].0.original_link.as_deref(), Some("o-0"));
    assert!(highlights.iter().all(|(n, _)| n.source_id == official.id));
}

#[tokio::test]
async fn test_get_returns_item_with_source_or_not_found() {
    let db = setup_db().await;
    let sources = SourceRepository::new(db.clone());
    let news = NewsRepository::new(db.clone());
    let source = create_source(&sources, "Base", None, None, Category::Official).await;
    news.insert_if_absent(item(source.id, "only", t0(), Duration::hours(48))).await.unwrap();

    let service = NewsService::new(news, manual_clock());
    let page = service.list(NewsFilter::default(), None, None).await.unwrap();
    let id = page.items[0].0.id;

    let (found, project) = service.get(id).await.unwrap();
    assert_eq!(found.id, id);
    assert_eq!(project.unwrap().name, "Base");

    assert!(matches!(service.get(Uuid::new_v4()).await, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_concurrent_likes_are_all_counted() {
    let db = setup_db().await;
    let sources = SourceRepository::new(db.clone());
    let news = NewsRepository::new(db.clone());
    let source = create_source(&sources, "Base", None, None, Category::Official).await;
    news.insert_if_absent(item(source.id, "liked", t0(), Duration::hours(48))).await.unwrap();

    let service = Arc::new(NewsService::new(news, manual_clock()));
    let id = service.list(NewsFilter::default(), None, None).await.unwrap().items[0].0.id;

    let likes = futures::future::join_all(
        (0..20).map(|_| {
            let service = service.clone();
            tokio::spawn(async move { service.like(id).await.unwrap() })
        })
    ).await;

    assert!(likes.iter().all(|r| r.is_ok()));
    let (after, _) = service.get(id).await.unwrap();
    assert_eq!(after.likes, 20);
}

#[tokio::test]
async fn test_like_unknown_item_is_not_found() {
    let db = setup_db().await;
    let service = NewsService::new(NewsRepository::new(db), manual_clock());

    assert!(matches!(service.like(Uuid::new_v4()).await, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_sweep_deletes_only_strictly_expired_items() {
    let db = setup_db().await;
    let sources = SourceRepository::new(db.clone());
    let news = NewsRepository::new(db.clone());
    let source = create_source(&sources, "Base", None, None, Category::Official).await;

    // Expired one second ago, expiring exactly now, expiring later
    let ttl = Duration::hours(48);
    news.insert_if_absent(item(source.id, "past", t0() - ttl - Duration::seconds(1), ttl)).await.unwrap();
    news.insert_if_absent(item(source.id, "boundary", t0() - ttl, ttl)).await.unwrap();
    news.insert_if_absent(item(source.id, "future", t0(), ttl)).await.unwrap();

    let clock = manual_clock();
    let job = RetentionSweepJob::new(news.clone(), clock.clone());

    let summary = job.run().await.unwrap();
    assert_eq!(summary.deleted_count, 1);
    assert_eq!(summary.timestamp, t0());

    // Boundary item is no longer listed but survives until strictly past expiry
    let again = job.run().await.unwrap();
    assert_eq!(again.deleted_count, 0);

    clock.advance(Duration::seconds(1));
    assert_eq!(job.run().await.unwrap().deleted_count, 1);

    let service = NewsService::new(news, clock);
    let remaining = service.list(NewsFilter::default(), None, None).await.unwrap();
    assert_eq!(remaining.total, 1);
    assert_eq!(remaining.items[0].0.original_link.as_deref(), Some("future"));
}

#[tokio::test]
async fn test_sweep_on_empty_store_reports_zero() {
    let db = setup_db().await;
    let job = RetentionSweepJob::new(NewsRepository::new(db), manual_clock());

    let summary = job.run().await.unwrap();
    assert_eq!(summary.deleted_count, 0);

    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["deletedCount"], 0);
}
