use chrono::{ DateTime, Utc };
use sea_orm::{
    sea_query::{ Expr, OnConflict },
    ActiveValue,
    ColumnTrait,
    DatabaseConnection,
    EntityTrait,
    PaginatorTrait,
    QueryFilter,
    QueryOrder,
    QuerySelect,
};
use uuid::Uuid;

use crate::db::entity::{ news_item, source, NewsItem, Source };
use crate::enums::{ Category, Priority, SourceKind };
use crate::error::{ AppError, Result };

/// A news row with its owning source.
pub type NewsWithSource = (news_item::Model, Option<source::Model>);

#[derive(Clone)]
pub struct NewsRepository {
    db: DatabaseConnection,
}

#[derive(Debug, Clone)]
pub struct NewNewsItem {
    pub source_id: Uuid,
    pub title: String,
    pub content: Option<String>,
    pub image_url: Option<String>,
    pub original_link: String,
    pub source_kind: SourceKind,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NewsFilter {
    pub category: Option<Category>,
    pub priority: Option<Priority>,
}

impl NewsRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Insert unless (source, original link) already exists. Returns whether a
    /// row was written; the unique index makes this safe under concurrent runs.
    pub async fn insert_if_absent(&self, item: NewNewsItem) -> Result<bool> {
        let model = news_item::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            source_id: ActiveValue::Set(item.source_id),
            title: ActiveValue::Set(item.title),
            content: ActiveValue::Set(item.content),
            image_url: ActiveValue::Set(item.image_url),
            original_link: ActiveValue::Set(Some(item.original_link)),
            source_kind: ActiveValue::Set(item.source_kind.to_string()),
            created_at: ActiveValue::Set(item.created_at),
            expires_at: ActiveValue::Set(item.expires_at),
            likes: ActiveValue::Set(0),
        };

        let inserted = NewsItem::insert(model)
            .on_conflict(
                OnConflict::columns([news_item::Column::SourceId, news_item::Column::OriginalLink])
                    .do_nothing()
                    .to_owned()
            )
            .exec_without_returning(&self.db).await?;

        Ok(inserted > 0)
    }

    pub async fn find_with_source(&self, id: Uuid) -> Result<Option<NewsWithSource>> {
        let found = NewsItem::find_by_id(id).find_also_related(Source).one(&self.db).await?;
        Ok(found)
    }

    /// One page of live items, newest first, plus the total matching count.
    pub async fn list_page(
        &self,
        filter: NewsFilter,
        now: DateTime<Utc>,
        page: u64,
        page_size: u64
    ) -> Result<(Vec<NewsWithSource>, u64)> {
        let mut query = NewsItem::find()
            .find_also_related(Source)
            .filter(news_item::Column::ExpiresAt.gt(now));

        if let Some(category) = filter.category {
            query = query.filter(source::Column::Category.eq(category.as_str()));
        }
        if let Some(priority) = filter.priority {
            query = query.filter(source::Column::Priority.eq(priority.as_str()));
        }

        let total = query.clone().count(&self.db).await?;

        // id breaks created_at ties so pages never overlap
        let items = query
            .order_by_desc(news_item::Column::CreatedAt)
            .order_by_desc(news_item::Column::Id)
            .offset(page.saturating_sub(1).saturating_mul(page_size))
            .limit(page_size)
            .all(&self.db).await?;

        Ok((items, total))
    }

    /// Newest live items from sources in `category`.
    pub async fn latest_in_category(
        &self,
        category: Category,
        now: DateTime<Utc>,
        limit: u64
    ) -> Result<Vec<NewsWithSource>> {
        let items = NewsItem::find()
            .find_also_related(Source)
            .filter(news_item::Column::ExpiresAt.gt(now))
            .filter(source::Column::Category.eq(category.as_str()))
            .order_by_desc(news_item::Column::CreatedAt)
            .order_by_desc(news_item::Column::Id)
            .limit(limit)
            .all(&self.db).await?;

        Ok(items)
    }

    /// `likes = likes + 1` in a single statement; returns the new count.
    pub async fn increment_likes(&self, id: Uuid) -> Result<i32> {
        let result = NewsItem::update_many()
            .col_expr(news_item::Column::Likes, Expr::col(news_item::Column::Likes).add(1))
            .filter(news_item::Column::Id.eq(id))
            .exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound("News".to_string()));
        }

        let item = NewsItem::find_by_id(id)
            .one(&self.db).await?
            .ok_or_else(|| AppError::NotFound("News".to_string()))?;

        Ok(item.likes)
    }

    /// Delete every item with `expires_at < now`.
    pub async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        let result = NewsItem::delete_many()
            .filter(news_item::Column::ExpiresAt.lt(now))
            .exec(&self.db).await?;

        Ok(result.rows_affected)
    }
}
