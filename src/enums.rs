use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

// ─── Category ────────────────────────────────────────────────────────

/// What kind of project a news source is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Official,
    Defi,
    Social,
    Nft,
    Meme,
    Lifestyle,
    Socialfi,
    Content,
    Influencer,
    Wallet,
    Gaming,
    Infra,
    Other,
}

impl Category {
    /// Canonical string stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Official => "OFFICIAL",
            Category::Defi => "DEFI",
            Category::Social => "SOCIAL",
            Category::Nft => "NFT",
            Category::Meme => "MEME",
            Category::Lifestyle => "LIFESTYLE",
            Category::Socialfi => "SOCIALFI",
            Category::Content => "CONTENT",
            Category::Influencer => "INFLUENCER",
            Category::Wallet => "WALLET",
            Category::Gaming => "GAMING",
            Category::Infra => "INFRA",
            Category::Other => "OTHER",
        }
    }

    pub fn all() -> &'static [Category] {
        &[
            Category::Official,
            Category::Defi,
            Category::Social,
            Category::Nft,
            Category::Meme,
            Category::Lifestyle,
            Category::Socialfi,
            Category::Content,
            Category::Influencer,
            Category::Wallet,
            Category::Gaming,
            Category::Infra,
            Category::Other,
        ]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        Category::all()
            .iter()
            .copied()
            .find(|c| c.as_str() == upper)
            .ok_or_else(|| AppError::InvalidInput(format!("Unknown category: {}", s)))
    }
}

// ─── Priority ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Critical,
    High,
    Normal,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Critical => "CRITICAL",
            Priority::High => "HIGH",
            Priority::Normal => "NORMAL",
            Priority::Low => "LOW",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "CRITICAL" => Ok(Priority::Critical),
            "HIGH" => Ok(Priority::High),
            "NORMAL" => Ok(Priority::Normal),
            "LOW" => Ok(Priority::Low),
            _ => Err(AppError::InvalidInput(format!("Unknown priority: {}", s))),
        }
    }
}

// ─── SourceKind ──────────────────────────────────────────────────────

/// Where a news item was ingested from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceKind {
    Farcaster,
    Rss,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Farcaster => "FARCASTER",
            SourceKind::Rss => "RSS",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "FARCASTER" => Ok(SourceKind::Farcaster),
            "RSS" | "BLOG" => Ok(SourceKind::Rss),
            _ => Err(AppError::InvalidInput(format!("Unknown source kind: {}", s))),
        }
    }
}
