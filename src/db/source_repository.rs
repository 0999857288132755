use chrono::Utc;
use sea_orm::{
    ActiveModelTrait,
    ActiveValue,
    ColumnTrait,
    DatabaseConnection,
    EntityTrait,
    QueryFilter,
    QueryOrder,
};
use uuid::Uuid;

use crate::db::entity::{ news_item, source };
use crate::enums::{ Category, Priority };
use crate::error::{ AppError, Result };

#[derive(Clone)]
pub struct SourceRepository {
    db: DatabaseConnection,
}

#[derive(Debug, Clone)]
pub struct NewSource {
    pub name: String,
    pub farcaster_username: Option<String>,
    pub farcaster_fid: Option<String>,
    pub website_url: Option<String>,
    pub logo_url: Option<String>,
    pub rss_url: Option<String>,
    pub category: Category,
    pub priority: Priority,
}

impl SourceRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, input: NewSource) -> Result<source::Model> {
        let now = Utc::now();

        let model = source::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            name: ActiveValue::Set(input.name),
            farcaster_username: ActiveValue::Set(input.farcaster_username),
            farcaster_fid: ActiveValue::Set(input.farcaster_fid),
            website_url: ActiveValue::Set(input.website_url),
            logo_url: ActiveValue::Set(input.logo_url),
            rss_url: ActiveValue::Set(input.rss_url),
            category: ActiveValue::Set(input.category.to_string()),
            priority: ActiveValue::Set(input.priority.to_string()),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        };

        Ok(model.insert(&self.db).await?)
    }

    pub async fn find_all(&self) -> Result<Vec<source::Model>> {
        let sources = source::Entity
            ::find()
            .order_by_asc(source::Column::Name)
            .all(&self.db).await?;
        Ok(sources)
    }

    /// Sources with a Farcaster account to poll.
    pub async fn find_with_fid(&self) -> Result<Vec<source::Model>> {
        let sources = source::Entity
            ::find()
            .filter(source::Column::FarcasterFid.is_not_null())
            .order_by_asc(source::Column::Name)
            .all(&self.db).await?;
        Ok(sources)
    }

    /// Sources with a syndication feed to poll.
    pub async fn find_with_rss(&self) -> Result<Vec<source::Model>> {
        let sources = source::Entity
            ::find()
            .filter(source::Column::RssUrl.is_not_null())
            .order_by_asc(source::Column::Name)
            .all(&self.db).await?;
        Ok(sources)
    }

    pub async fn set_fid(&self, id: Uuid, fid: Option<String>) -> Result<source::Model> {
        let existing = source::Entity
            ::find_by_id(id)
            .one(&self.db).await?
            .ok_or_else(|| AppError::NotFound("Source".to_string()))?;

        let mut active: source::ActiveModel = existing.into();
        active.farcaster_fid = ActiveValue::Set(fid);
        active.updated_at = ActiveValue::Set(Utc::now());
        Ok(active.update(&self.db).await?)
    }

    /// Full reset: removes every news item and every source.
    pub async fn delete_all(&self) -> Result<u64> {
        news_item::Entity::delete_many().exec(&self.db).await?;
        let result = source::Entity::delete_many().exec(&self.db).await?;
        Ok(result.rows_affected)
    }
}
