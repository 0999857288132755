use sea_orm::entity::prelude::*;
use serde::{ Deserialize, Serialize };

use crate::enums::{ Category, Priority };

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sources")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub farcaster_username: Option<String>,
    pub farcaster_fid: Option<String>,
    pub website_url: Option<String>,
    pub logo_url: Option<String>,
    pub rss_url: Option<String>,
    pub category: String, // see enums::Category
    pub priority: String, // see enums::Priority
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl Model {
    pub fn category(&self) -> Option<Category> {
        self.category.parse().ok()
    }

    pub fn priority(&self) -> Option<Priority> {
        self.priority.parse().ok()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::news_item::Entity")]
    NewsItem,
}

impl Related<super::news_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::NewsItem.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
