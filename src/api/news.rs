use axum::{ extract::{ Path, Query, State }, Json };
use chrono::{ DateTime, Utc };
use serde::{ Deserialize, Serialize };
use uuid::Uuid;

use crate::db::entity::{ news_item, source };
use crate::db::{ NewsFilter, NewsWithSource };
use crate::enums::{ Category, Priority };
use crate::error::{ AppError, Result };

use super::{ ApiResponse, AppState };

/// Raw query string; numbers are parsed by hand so bad input gets the JSON error envelope.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsQuery {
    pub page: Option<String>,
    pub page_size: Option<String>,
    pub category: Option<String>,
    pub priority: Option<String>,
}

impl NewsQuery {
    fn filter(&self) -> Result<NewsFilter> {
        Ok(NewsFilter {
            category: non_blank(&self.category).map(str::parse::<Category>).transpose()?,
            priority: non_blank(&self.priority).map(str::parse::<Priority>).transpose()?,
        })
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn parse_number(name: &str, value: &Option<String>) -> Result<Option<u64>> {
    non_blank(value)
        .map(|v| {
            v.parse::<u64>().map_err(|_| {
                AppError::InvalidInput(format!("{} must be a positive integer", name))
            })
        })
        .transpose()
}

fn parse_id(id: &str) -> Result<Uuid> {
    // An id that is not a UUID cannot exist
    Uuid::parse_str(id).map_err(|_| AppError::NotFound("News".to_string()))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceResponse {
    pub id: Uuid,
    pub name: String,
    pub farcaster_username: Option<String>,
    pub farcaster_fid: Option<String>,
    pub website_url: Option<String>,
    pub logo_url: Option<String>,
    pub rss_url: Option<String>,
    pub category: String,
    pub priority: String,
}

impl From<source::Model> for SourceResponse {
    fn from(source: source::Model) -> Self {
        Self {
            id: source.id,
            name: source.name,
            farcaster_username: source.farcaster_username,
            farcaster_fid: source.farcaster_fid,
            website_url: source.website_url,
            logo_url: source.logo_url,
            rss_url: source.rss_url,
            category: source.category,
            priority: source.priority,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsResponse {
    pub id: Uuid,
    pub source_id: Uuid,
    pub project: Option<SourceResponse>,
    pub title: String,
    pub content: Option<String>,
    pub image_url: Option<String>,
    pub original_link: Option<String>,
    pub source_type: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub likes: i32,
}

impl From<NewsWithSource> for NewsResponse {
    fn from((item, source): NewsWithSource) -> Self {
        let news_item::Model {
            id,
            source_id,
            title,
            content,
            image_url,
            original_link,
            source_kind,
            created_at,
            expires_at,
            likes,
        } = item;

        Self {
            id,
            source_id,
            project: source.map(SourceResponse::from),
            title,
            content,
            image_url,
            original_link,
            source_type: source_kind,
            created_at,
            expires_at,
            likes,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsPageResponse {
    pub items: Vec<NewsResponse>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
    pub has_more: bool,
}

#[derive(Debug, Serialize)]
pub struct LikeResponse {
    pub likes: i32,
}

pub async fn list_news(
    State(state): State<AppState>,
    Query(query): Query<NewsQuery>
) -> Result<Json<ApiResponse<NewsPageResponse>>> {
    let filter = query.filter()?;
    let page = parse_number("page", &query.page)?;
    let page_size = parse_number("pageSize", &query.page_size)?;

    let result = state.news_service.list(filter, page, page_size).await?;

    Ok(
        Json(
            ApiResponse::ok(NewsPageResponse {
                items: result.items.into_iter().map(NewsResponse::from).collect(),
                total: result.total,
                page: result.page,
                page_size: result.page_size,
                has_more: result.has_more,
            })
        )
    )
}

pub async fn get_news(
    State(state): State<AppState>,
    Path(id): Path<String>
) -> Result<Json<ApiResponse<NewsResponse>>> {
    let item = state.news_service.get(parse_id(&id)?).await?;
    Ok(Json(ApiResponse::ok(item.into())))
}

pub async fn like_news(
    State(state): State<AppState>,
    Path(id): Path<String>
) -> Result<Json<ApiResponse<LikeResponse>>> {
    let likes = state.news_service.like(parse_id(&id)?).await?;
    Ok(Json(ApiResponse::ok(LikeResponse { likes })))
}

pub async fn highlights(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<NewsResponse>>>> {
    let items = state.news_service.highlights().await?;
    Ok(Json(ApiResponse::ok(items.into_iter().map(NewsResponse::from).collect())))
}
