use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{ AppError, Result };
use crate::providers::{ Cast, CastFeed };

const REQUEST_TIMEOUT_SECS: u64 = 15;

/// Farcaster reads through the Neynar v2 API.
pub struct NeynarClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Deserialize)]
struct CastsResponse {
    #[serde(default)]
    casts: Vec<Cast>,
}

#[derive(Deserialize)]
struct BulkUsersResponse {
    #[serde(default)]
    users: Vec<NeynarUser>,
}

#[derive(Deserialize)]
struct NeynarUser {
    fid: i64,
    username: String,
}

impl NeynarClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Result<Self> {
        let client = reqwest::Client
            ::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| AppError::Config("NEYNAR_API_KEY is not set".to_string()))
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response> {
        let response = self.client
            .get(url)
            .header("accept", "application/json")
            .header("api_key", self.api_key()?)
            .send().await
            .map_err(|e| AppError::External(format!("Neynar request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::External(format!("Neynar returned status: {}", response.status())));
        }

        Ok(response)
    }
}

#[async_trait]
impl CastFeed for NeynarClient {
    async fn fetch_casts(&self, fid: &str, limit: u32) -> Result<Vec<Cast>> {
        let url = format!(
            "{}/farcaster/feed/user/casts?fid={}&limit={}&include_replies=false",
            self.base_url,
            urlencoding::encode(fid),
            limit
        );

        let body: CastsResponse = self
            .get(&url).await?
            .json().await
            .map_err(|e| AppError::External(format!("Failed to parse Neynar casts: {}", e)))?;

        Ok(body.casts)
    }

    async fn fetch_fids_by_usernames(&self, usernames: &[String]) -> Result<HashMap<String, i64>> {
        if usernames.is_empty() {
            return Ok(HashMap::new());
        }

        let url = format!(
            "{}/farcaster/user/bulk-by-username?usernames={}",
            self.base_url,
            urlencoding::encode(&usernames.join(","))
        );

        let body: BulkUsersResponse = self
            .get(&url).await?
            .json().await
            .map_err(|e| AppError::External(format!("Failed to parse Neynar users: {}", e)))?;

        Ok(
            body.users
                .into_iter()
                .map(|u| (u.username.to_lowercase(), u.fid))
                .collect()
        )
    }
}
