use std::time::Duration;

use async_trait::async_trait;
use chrono::{ DateTime, Utc };
use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{ AppError, Result };
use crate::providers::{ FeedReader, NormalizedItem };

const REQUEST_TIMEOUT_SECS: u64 = 15;
const MAX_CONTENT_CHARS: usize = 500;

lazy_static! {
    static ref IMG_SRC: Regex = Regex::new(r#"<img[^>]+src="([^">]+)""#).unwrap();
    static ref HTML_TAG: Regex = Regex::new(r"<[^>]*>").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Only these entities are decoded; anything else is left as written.
const ENTITIES: [(&str, &str); 6] = [
    ("&nbsp;", " "),
    ("&amp;", "&"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
];

/// RSS 2.0 reader over HTTP.
pub struct RssFeedReader {
    client: reqwest::Client,
}

impl RssFeedReader {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client
            ::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    async fn fetch_channel(&self, feed_url: &str) -> Result<rss::Channel> {
        let response = self.client
            .get(feed_url)
            .send().await
            .map_err(|e| AppError::External(format!("Feed request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::External(format!("Feed returned status: {}", response.status())));
        }

        let bytes = response
            .bytes().await
            .map_err(|e| AppError::External(format!("Failed to read feed body: {}", e)))?;

        rss::Channel
            ::read_from(&bytes[..])
            .map_err(|e| AppError::External(format!("Failed to parse feed: {}", e)))
    }
}

#[async_trait]
impl FeedReader for RssFeedReader {
    async fn parse(&self, feed_url: &str) -> Vec<NormalizedItem> {
        match self.fetch_channel(feed_url).await {
            Ok(channel) => normalize_channel(&channel, Utc::now()),
            Err(e) => {
                tracing::warn!(feed = %feed_url, error = %e, "failed to fetch feed");
                Vec::new()
            }
        }
    }
}

/// Normalize every item of a parsed channel. Items without a publish date are
/// dated `fetched_at`; items whose date cannot be read are dropped.
pub fn normalize_channel(channel: &rss::Channel, fetched_at: DateTime<Utc>) -> Vec<NormalizedItem> {
    channel
        .items()
        .iter()
        .filter_map(|item| {
            let title = item
                .title()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .unwrap_or("Untitled")
                .to_string();

            let published_at = match item.pub_date().map(str::trim).filter(|d| !d.is_empty()) {
                None => fetched_at,
                Some(value) =>
                    match parse_pub_date(value) {
                        Some(date) => date,
                        None => {
                            tracing::warn!(title = %title, pub_date = %value, "skipping feed item with unreadable date");
                            return None;
                        }
                    }
            };

            Some(NormalizedItem {
                title,
                content: clean_content(item.content().or(item.description()).unwrap_or_default()),
                link: item
                    .link()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(str::to_string),
                image_url: extract_image(item),
                published_at,
            })
        })
        .collect()
}

/// RFC 2822 as RSS prescribes, falling back to RFC 3339 which many feeds emit.
pub fn parse_pub_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value)
        .or_else(|_| DateTime::parse_from_rfc3339(value))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// media:content, media:thumbnail, an image enclosure, then the first
/// `<img>` in the description and finally in content:encoded.
pub fn extract_image(item: &rss::Item) -> Option<String> {
    media_url(item, "content")
        .or_else(|| media_url(item, "thumbnail"))
        .or_else(|| {
            item.enclosure()
                .filter(|e| e.mime_type().starts_with("image/"))
                .map(|e| e.url().to_string())
        })
        .or_else(|| item.description().and_then(first_img_src))
        .or_else(|| item.content().and_then(first_img_src))
}

fn media_url(item: &rss::Item, name: &str) -> Option<String> {
    item.extensions()
        .get("media")
        .and_then(|media| media.get(name))
        .and_then(|elements| elements.first())
        .and_then(|element| element.attrs().get("url"))
        .filter(|url| !url.is_empty())
        .cloned()
}

fn first_img_src(html: &str) -> Option<String> {
    IMG_SRC.captures(html).map(|caps| caps[1].to_string())
}

/// Strip markup, decode the common entities, collapse whitespace and cap the
/// length at 500 characters.
pub fn clean_content(html: &str) -> String {
    let mut text = HTML_TAG.replace_all(html, "").into_owned();
    for (entity, replacement) in ENTITIES {
        text = text.replace(entity, replacement);
    }
    let text = WHITESPACE.replace_all(&text, " ");
    text.trim().chars().take(MAX_CONTENT_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:media="http://search.yahoo.com/mrss/" xmlns:content="http://purl.org/rss/1.0/modules/content/">
  <channel>
    <title>Base Blog</title>
    <link>https://base.mirror.xyz</link>
    <description>Base updates</description>
    <item>
      <title>Media content</title>
      <link>https://blog.example.com/1</link>
      <pubDate>Mon, 21 Oct 2024 07:28:00 GMT</pubDate>
      <media:content url="https://img.example.com/media.jpg" medium="image"/>
      <media:thumbnail url="https://img.example.com/thumb.jpg"/>
      <description>First</description>
    </item>
    <item>
      <title>Thumbnail only</title>
      <link>https://blog.example.com/2</link>
      <media:thumbnail url="https://img.example.com/thumb.jpg"/>
      <enclosure url="https://img.example.com/enc.png" length="10" type="image/png"/>
    </item>
    <item>
      <title>Audio enclosure</title>
      <link>https://blog.example.com/3</link>
      <enclosure url="https://cdn.example.com/ep.mp3" length="10" type="audio/mpeg"/>
      <description>&lt;p&gt;Hello &lt;img src="https://img.example.com/body.gif"&gt;&lt;/p&gt;</description>
    </item>
    <item>
      <title>Encoded only</title>
      <description>no pictures here</description>
      <content:encoded><![CDATA[<p>Read <img alt="x" src="https://img.example.com/encoded.webp"> more</p>]]></content:encoded>
    </item>
    <item>
      <title>   </title>
      <description>plain</description>
    </item>
  </channel>
</rss>"#;

    fn items() -> Vec<NormalizedItem> {
        let channel = rss::Channel::read_from(FEED.as_bytes()).unwrap();
        normalize_channel(&channel, DateTime::parse_from_rfc3339("2026-10-19T12:00:00Z").unwrap().with_timezone(&Utc))
    }

    #[test]
    fn test_image_extraction_order() {
        let items = items();
        assert_eq!(items[0].image_url.as_deref(), Some("https://img.example.com/media.jpg"));
        assert_eq!(items[1].image_url.as_deref(), Some("https://img.example.com/thumb.jpg"));
        assert_eq!(items[2].image_url.as_deref(), Some("https://img.example.com/body.gif"));
        assert_eq!(items[3].image_url.as_deref(), Some("https://img.example.com/encoded.webp"));
        assert_eq!(items[4].image_url, None);
    }

    #[test]
    fn test_defaults_for_missing_fields() {
        let items = items();
        assert_eq!(items[4].title, "Untitled");
        assert_eq!(items[4].link, None);
        assert_eq!(items[4].published_at.to_rfc3339(), "2026-10-19T12:00:00+00:00");
        assert_eq!(items[0].published_at.to_rfc3339(), "2024-10-21T07:28:00+00:00");
    }

    #[test]
    fn test_pub_date_formats() {
        const DATED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Dates</title>
    <link>https://dates.example.com</link>
    <description>dates</description>
    <item>
      <title>Iso</title>
      <link>https://dates.example.com/iso</link>
      <pubDate>2020-01-01T00:00:00Z</pubDate>
    </item>
    <item>
      <title>Garbage</title>
      <link>https://dates.example.com/garbage</link>
      <pubDate>last tuesday</pubDate>
    </item>
    <item>
      <title>Offset</title>
      <link>https://dates.example.com/offset</link>
      <pubDate>Mon, 21 Oct 2024 09:28:00 +0200</pubDate>
    </item>
  </channel>
</rss>"#;

        let channel = rss::Channel::read_from(DATED.as_bytes()).unwrap();
        let fetched_at = DateTime::parse_from_rfc3339("2026-10-19T12:00:00Z").unwrap().with_timezone(&Utc);
        let items = normalize_channel(&channel, fetched_at);

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Iso");
        assert_eq!(items[0].published_at.to_rfc3339(), "2020-01-01T00:00:00+00:00");
        assert_eq!(items[1].title, "Offset");
        assert_eq!(items[1].published_at.to_rfc3339(), "2024-10-21T07:28:00+00:00");
    }

    #[test]
    fn test_parse_pub_date() {
        assert!(parse_pub_date("Mon, 21 Oct 2024 07:28:00 GMT").is_some());
        assert!(parse_pub_date("2024-10-21T07:28:00.500+02:00").is_some());
        assert_eq!(parse_pub_date("21/10/2024"), None);
    }

    #[test]
    fn test_content_prefers_encoded_body() {
        let items = items();
        assert_eq!(items[3].content, "Read more");
        assert_eq!(items[2].content, "Hello");
    }

    #[test]
    fn test_clean_content() {
        assert_eq!(
            clean_content("<p>Base&nbsp;is   <b>live</b> &amp; growing &lt;3 &quot;gm&quot; it&#39;s\n\n here</p>"),
            "Base is live & growing <3 \"gm\" it's here"
        );
        assert_eq!(clean_content(""), "");
        assert_eq!(clean_content(&"a".repeat(800)).chars().count(), 500);
    }
}
