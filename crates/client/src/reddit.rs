//! Reddit public JSON listing client.
//!
//! Reads `https://www.reddit.com/r/{subreddit}/{sort}.json` without
//! authentication. Posts from several subreddits are merged and ranked by
//! score.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use std::time::Duration;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::SourceError;
use crate::http;

const DEFAULT_BASE_URL: &str = "https://www.reddit.com";

/// Reddit caps listings at 100 items per request.
const MAX_LIMIT: u32 = 100;

/// Pause between subreddit requests when fetching several.
const SUBREDDIT_DELAY: Duration = Duration::from_millis(200);

static SUBREDDIT_NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]{2,21}$").unwrap());

/// Listing order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sort {
    #[default]
    Hot,
    New,
    Rising,
    Top,
    Controversial,
}

impl Sort {
    pub fn as_str(self) -> &'static str {
        match self {
            Sort::Hot => "hot",
            Sort::New => "new",
            Sort::Rising => "rising",
            Sort::Top => "top",
            Sort::Controversial => "controversial",
        }
    }

    /// Only `top` and `controversial` accept a time window.
    pub fn uses_period(self) -> bool {
        matches!(self, Sort::Top | Sort::Controversial)
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sort {
    type Err = SourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hot" => Ok(Sort::Hot),
            "new" => Ok(Sort::New),
            "rising" => Ok(Sort::Rising),
            "top" => Ok(Sort::Top),
            "controversial" => Ok(Sort::Controversial),
            other => Err(SourceError::InvalidRequest(format!(
                "invalid sort '{other}': expected hot, new, rising, top or controversial"
            ))),
        }
    }
}

/// Time window for `top` and `controversial`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Hour,
    Day,
    #[default]
    Week,
    Month,
    Year,
    All,
}

impl Period {
    pub fn as_str(self) -> &'static str {
        match self {
            Period::Hour => "hour",
            Period::Day => "day",
            Period::Week => "week",
            Period::Month => "month",
            Period::Year => "year",
            Period::All => "all",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = SourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hour" => Ok(Period::Hour),
            "day" => Ok(Period::Day),
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            "year" => Ok(Period::Year),
            "all" => Ok(Period::All),
            other => Err(SourceError::InvalidRequest(format!(
                "invalid period '{other}': expected hour, day, week, month, year or all"
            ))),
        }
    }
}

/// A normalized Reddit post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedditPost {
    pub id: String,
    pub title: String,
    pub url: String,
    /// Absolute `https://reddit.com/...` link to the comments page.
    pub permalink: String,
    pub author: String,
    pub subreddit: String,
    pub score: i64,
    pub upvote_ratio: f64,
    pub comments: u64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub flair: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Child>,
}

#[derive(Debug, Deserialize)]
struct Child {
    data: RawPost,
}

#[derive(Debug, Deserialize)]
struct RawPost {
    #[serde(default)]
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    permalink: String,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    subreddit: String,
    #[serde(default)]
    score: i64,
    #[serde(default)]
    upvote_ratio: f64,
    #[serde(default)]
    num_comments: u64,
    #[serde(default)]
    created_utc: f64,
    #[serde(default)]
    link_flair_text: Option<String>,
}

impl From<RawPost> for RedditPost {
    fn from(raw: RawPost) -> Self {
        let created_at = DateTime::from_timestamp(raw.created_utc as i64, 0).unwrap_or(DateTime::UNIX_EPOCH);

        Self {
            id: raw.id,
            title: raw.title,
            url: raw.url,
            permalink: format!("https://reddit.com{}", raw.permalink),
            author: raw.author.unwrap_or_else(|| "[deleted]".to_string()),
            subreddit: raw.subreddit,
            score: raw.score,
            upvote_ratio: raw.upvote_ratio,
            comments: raw.num_comments,
            created_at,
            flair: raw.link_flair_text.filter(|f| !f.is_empty()),
        }
    }
}

/// Strip an optional `r/` prefix and check the name against Reddit's rules.
pub fn normalize_subreddit(name: &str) -> Result<String, SourceError> {
    let trimmed = name.trim();
    let bare = trimmed
        .strip_prefix("/r/")
        .or_else(|| trimmed.strip_prefix("r/"))
        .unwrap_or(trimmed);

    if !SUBREDDIT_NAME.is_match(bare) {
        return Err(SourceError::InvalidRequest(format!("invalid subreddit name: {name}")));
    }
    Ok(bare.to_lowercase())
}

/// Single-subreddit listing access.
#[async_trait::async_trait]
pub trait RedditApi: Send + Sync {
    async fn listing(&self, subreddit: &str, sort: Sort, period: Period, limit: u32)
    -> Result<Vec<RedditPost>, SourceError>;
}

/// Reddit HTTP client.
#[derive(Debug, Clone)]
pub struct RedditClient {
    http: reqwest::Client,
    base_url: String,
}

impl RedditClient {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, SourceError> {
        Ok(Self { http: http::build_client(timeout, user_agent)?, base_url: DEFAULT_BASE_URL.to_string() })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait::async_trait]
impl RedditApi for RedditClient {
    async fn listing(
        &self, subreddit: &str, sort: Sort, period: Period, limit: u32,
    ) -> Result<Vec<RedditPost>, SourceError> {
        let url = format!("{}/r/{subreddit}/{sort}.json", self.base_url);
        let mut query = vec![("limit", limit.min(MAX_LIMIT).to_string())];
        if sort.uses_period() {
            query.push(("t", period.to_string()));
        }

        tracing::debug!(%url, ?query, "fetching subreddit listing");

        let listing: Listing = http::send_json("reddit", self.http.get(&url).query(&query)).await?;
        Ok(listing.data.children.into_iter().map(|c| c.data.into()).collect())
    }
}

/// Fetch `limit` posts from each subreddit and rank them by score, highest first.
///
/// Subreddits are fetched one after another with a short pause between them.
/// Any failing subreddit fails the whole call so a partial result is never cached.
pub async fn fetch_posts(
    api: &dyn RedditApi, subreddits: &[String], sort: Sort, period: Period, limit: u32,
) -> Result<Vec<RedditPost>, SourceError> {
    let mut posts = Vec::new();

    for (idx, subreddit) in subreddits.iter().enumerate() {
        if idx > 0 {
            tokio::time::sleep(SUBREDDIT_DELAY).await;
        }
        posts.extend(api.listing(subreddit, sort, period, limit).await?);
    }

    posts.sort_by(|a, b| b.score.cmp(&a.score));
    Ok(posts)
}
