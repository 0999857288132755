use crate::db::{ NewSource, SourceRepository, TickerRepository };
use crate::enums::{ Category, Priority };
use crate::error::Result;
use crate::providers::CastFeed;

const BASE_LOGO: &str =
    "https://raw.githubusercontent.com/base-org/brand-kit/master/logo/symbol/Base_Symbol_Blue.svg";
const COINBASE_AVATAR: &str = "https://avatars.githubusercontent.com/u/18060234?s=200&v=4";

pub struct SeedSource {
    pub name: &'static str,
    pub farcaster_username: &'static str,
    pub website_url: &'static str,
    pub logo_url: &'static str,
    pub category: Category,
    pub priority: Priority,
}

const fn source(
    name: &'static str,
    farcaster_username: &'static str,
    website_url: &'static str,
    logo_url: &'static str,
    category: Category,
    priority: Priority
) -> SeedSource {
    SeedSource { name, farcaster_username, website_url, logo_url, category, priority }
}

pub const SEED_SOURCES: &[SeedSource] = &[
    source("Base Official", "base", "https://base.org", BASE_LOGO, Category::Official, Priority::Critical),
    source("Jesse Pollak", "jessepollak", "https://base.org/jobs", BASE_LOGO, Category::Official, Priority::High),
    source(
        "Coinbase Wallet",
        "coinbasewallet",
        "https://www.coinbase.com/wallet",
        COINBASE_AVATAR,
        Category::Official,
        Priority::High
    ),
    source(
        "Aerodrome",
        "aerodrome",
        "https://aerodrome.finance",
        "https://aerodrome.finance/aerodrome.svg",
        Category::Defi,
        Priority::High
    ),
    source(
        "Farcaster",
        "farcaster",
        "https://farcaster.xyz",
        "https://warpcast.com/og-logo.png",
        Category::Social,
        Priority::High
    ),
    source("Zora", "zora", "https://zora.co", "https://zora.co/assets/og-image.png", Category::Nft, Priority::Normal),
    source("Degen", "degen", "https://degen.tips", "https://degen.tips/logo.png", Category::Meme, Priority::Normal),
    source(
        "Blackbird",
        "blackbird",
        "https://www.blackbird.xyz",
        "https://www.blackbird.xyz/logo.png",
        Category::Lifestyle,
        Priority::Normal
    ),
    source(
        "Seamless",
        "seamless",
        "https://seamlessprotocol.com",
        "https://seamlessprotocol.com/logo.svg",
        Category::Defi,
        Priority::Normal
    ),
    source(
        "Friend.tech",
        "friendtech",
        "https://friend.tech",
        "https://friend.tech/favicon.ico",
        Category::Socialfi,
        Priority::Normal
    ),
    source("Moonwell", "moonwell", "https://moonwell.fi", "https://moonwell.fi/logo.svg", Category::Defi, Priority::Low),
    source(
        "Paragraph",
        "paragraph",
        "https://paragraph.xyz",
        "https://paragraph.xyz/logo.png",
        Category::Content,
        Priority::Low
    ),
    source("Brian Armstrong", "brian", "https://coinbase.com", COINBASE_AVATAR, Category::Influencer, Priority::High),
    source(
        "Rainbow Wallet",
        "rainbow",
        "https://rainbow.me",
        "https://rainbow.me/favicon.ico",
        Category::Wallet,
        Priority::Low
    ),
    source(
        "Synthetix",
        "synthetix",
        "https://synthetix.io",
        "https://synthetix.io/logo.svg",
        Category::Defi,
        Priority::Low
    ),
];

#[derive(Debug, Clone, Default)]
pub struct SeedReport {
    pub sources: usize,
    pub fids_resolved: usize,
}

/// Full reset: drops all news and sources, inserts `sources`, resolves their
/// Farcaster FIDs and makes sure the ticker row exists.
///
/// FID resolution is best-effort; without it the sources are stored with no FID
/// and ingestion skips them.
pub async fn seed(
    sources: &SourceRepository,
    ticker: &TickerRepository,
    casts: &dyn CastFeed,
    seed_sources: &[SeedSource]
) -> Result<SeedReport> {
    let removed = sources.delete_all().await?;
    tracing::info!(removed, "cleared existing sources");

    let usernames: Vec<String> = seed_sources
        .iter()
        .map(|s| s.farcaster_username.to_string())
        .collect();

    let fids = match casts.fetch_fids_by_usernames(&usernames).await {
        Ok(fids) => fids,
        Err(e) => {
            tracing::warn!(error = %e, "could not resolve Farcaster FIDs; seeding without them");
            Default::default()
        }
    };

    let mut report = SeedReport::default();
    for seed_source in seed_sources {
        let fid = fids.get(&seed_source.farcaster_username.to_lowercase()).map(|fid| fid.to_string());
        if fid.is_some() {
            report.fids_resolved += 1;
        }

        let created = sources.create(NewSource {
            name: seed_source.name.to_string(),
            farcaster_username: Some(seed_source.farcaster_username.to_string()),
            farcaster_fid: fid,
            website_url: Some(seed_source.website_url.to_string()),
            logo_url: Some(seed_source.logo_url.to_string()),
            rss_url: None,
            category: seed_source.category,
            priority: seed_source.priority,
        }).await?;

        tracing::info!(name = %created.name, fid = ?created.farcaster_fid, "created source");
        report.sources += 1;
    }

    if ticker.ensure_placeholder().await? {
        tracing::info!("initialized ticker row");
    }

    Ok(report)
}
