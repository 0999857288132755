use std::sync::Arc;

use uuid::Uuid;

use crate::clock::Clock;
use crate::db::{ NewsFilter, NewsRepository, NewsWithSource };
use crate::enums::Category;
use crate::error::{ AppError, Result };

pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 100;
const HIGHLIGHTS_LIMIT: u64 = 10;

#[derive(Debug, Clone)]
pub struct NewsPage {
    pub items: Vec<NewsWithSource>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
    pub has_more: bool,
}

/// Read side of the feed plus the like counter.
pub struct NewsService {
    news: NewsRepository,
    clock: Arc<dyn Clock>,
}

impl NewsService {
    pub fn new(news: NewsRepository, clock: Arc<dyn Clock>) -> Self {
        Self { news, clock }
    }

    /// Live items, newest first. `page` is 1-based.
    pub async fn list(
        &self,
        filter: NewsFilter,
        page: Option<u64>,
        page_size: Option<u64>
    ) -> Result<NewsPage> {
        let page = page.unwrap_or(1);
        let page_size = page_size.unwrap_or(DEFAULT_PAGE_SIZE);

        if page == 0 {
            return Err(AppError::InvalidInput("page must be at least 1".to_string()));
        }
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(
                AppError::InvalidInput(format!("pageSize must be between 1 and {}", MAX_PAGE_SIZE))
            );
        }

        let (items, total) = self.news.list_page(filter, self.clock.now(), page, page_size).await?;

        Ok(NewsPage {
            items,
            total,
            page,
            page_size,
            has_more: page.saturating_mul(page_size) < total,
        })
    }

    pub async fn get(&self, id: Uuid) -> Result<NewsWithSource> {
        self.news.find_with_source(id).await?.ok_or_else(|| AppError::NotFound("News".to_string()))
    }

    /// Latest items from official sources.
    pub async fn highlights(&self) -> Result<Vec<NewsWithSource>> {
        self.news.latest_in_category(Category::Official, self.clock.now(), HIGHLIGHTS_LIMIT).await
    }

    pub async fn like(&self, id: Uuid) -> Result<i32> {
        let likes = self.news.increment_likes(id).await?;
        tracing::debug!(%id, likes, "news item liked");
        Ok(likes)
    }
}
