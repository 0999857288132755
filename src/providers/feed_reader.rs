use async_trait::async_trait;
use chrono::{ DateTime, Utc };
use serde::{ Deserialize, Serialize };

/// One syndication entry after cleaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedItem {
    pub title: String,
    /// Plain text, at most 500 characters.
    pub content: String,
    pub link: Option<String>,
    pub image_url: Option<String>,
    pub published_at: DateTime<Utc>,
}

#[async_trait]
pub trait FeedReader: Send + Sync {
    /// Fetch and normalize a feed. A feed that cannot be fetched or parsed
    /// yields no items rather than an error.
    async fn parse(&self, feed_url: &str) -> Vec<NormalizedItem>;
}
