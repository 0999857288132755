use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{ DateTime, Utc };
use serde::{ Deserialize, Serialize };

use crate::error::Result;

const IMAGE_EXTENSIONS: [&str; 6] = [".jpg", ".jpeg", ".png", ".gif", ".webp", ".svg"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CastAuthor {
    pub fid: i64,
    pub username: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub pfp_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmbedMetadata {
    /// Either a bare URL or an object carrying a `url` field, depending on the
    /// embed type.
    #[serde(default)]
    pub image: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CastEmbed {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub metadata: Option<EmbedMetadata>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cast {
    pub hash: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub author: CastAuthor,
    #[serde(default)]
    pub embeds: Vec<CastEmbed>,
}

impl Cast {
    /// Public Warpcast URL of the cast; used as the dedup key.
    pub fn canonical_link(&self) -> String {
        canonical_link(&self.author.username, &self.hash)
    }

    /// Walks embeds in order; an embed yields its URL when that looks like an
    /// image, otherwise its preview image if it has one.
    pub fn image_url(&self) -> Option<String> {
        for embed in &self.embeds {
            if let Some(url) = embed.url.as_deref() {
                if is_image_url(url) {
                    return Some(url.to_string());
                }
            }
            if let Some(image) = embed.metadata.as_ref().and_then(|m| m.image.as_ref()) {
                if let Some(url) = metadata_image_url(image) {
                    return Some(url);
                }
            }
        }
        None
    }
}

pub fn canonical_link(username: &str, hash: &str) -> String {
    let short: String = hash.chars().take(10).collect();
    format!("https://warpcast.com/{}/{}", username, short)
}

pub fn is_image_url(url: &str) -> bool {
    let lower = url.to_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| lower.contains(ext))
}

fn metadata_image_url(image: &serde_json::Value) -> Option<String> {
    match image {
        serde_json::Value::String(url) if !url.is_empty() => Some(url.clone()),
        serde_json::Value::Object(obj) =>
            obj
                .get("url")
                .and_then(|v| v.as_str())
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        _ => None,
    }
}

#[async_trait]
pub trait CastFeed: Send + Sync {
    /// Most recent top-level casts by `fid`, newest first.
    async fn fetch_casts(&self, fid: &str, limit: u32) -> Result<Vec<Cast>>;

    /// Resolve usernames to FIDs. Unknown usernames are absent from the map.
    /// Keys are lowercased usernames.
    async fn fetch_fids_by_usernames(&self, usernames: &[String]) -> Result<HashMap<String, i64>>;
}
