//! dev.to (Forem) articles API client.
//!
//! Trending articles come from `GET https://dev.to/api/articles?top={days}`,
//! optionally filtered by tag. The API key is optional and only raises the
//! rate limit.

use std::collections::{BTreeMap, HashSet};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::SourceError;
use crate::http;

const DEFAULT_BASE_URL: &str = "https://dev.to/api";

/// Forem caps `per_page` at 100.
const MAX_PER_PAGE: u32 = 100;

/// Pause between page and tag requests.
const PAGE_DELAY: Duration = Duration::from_millis(100);

/// A normalized dev.to article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: u64,
    pub title: String,
    pub url: String,
    pub author: String,
    pub reactions: u64,
    pub comments: u64,
    pub reading_time: u32,
    pub tags: Vec<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct RawArticle {
    #[serde(default)]
    id: u64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    user: Option<RawUser>,
    #[serde(default)]
    public_reactions_count: u64,
    #[serde(default)]
    comments_count: u64,
    #[serde(default)]
    reading_time_minutes: u32,
    #[serde(default)]
    tag_list: Option<TagList>,
    #[serde(default)]
    published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    published_timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct RawUser {
    #[serde(default)]
    username: Option<String>,
}

/// The list endpoint returns tags as an array; single-article responses use a comma string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TagList {
    List(Vec<String>),
    Joined(String),
}

impl From<TagList> for Vec<String> {
    fn from(tags: TagList) -> Self {
        match tags {
            TagList::List(tags) => tags,
            TagList::Joined(joined) => joined
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(String::from)
                .collect(),
        }
    }
}

impl From<RawArticle> for Article {
    fn from(raw: RawArticle) -> Self {
        Self {
            id: raw.id,
            title: raw.title,
            url: raw.url,
            author: raw
                .user
                .and_then(|u| u.username)
                .unwrap_or_else(|| "unknown".to_string()),
            reactions: raw.public_reactions_count,
            comments: raw.comments_count,
            reading_time: raw.reading_time_minutes,
            tags: raw.tag_list.map(Vec::from).unwrap_or_default(),
            published_at: raw.published_at.or(raw.published_timestamp),
        }
    }
}

/// One page of the articles listing.
#[async_trait::async_trait]
pub trait DevToApi: Send + Sync {
    async fn articles_page(
        &self, tag: Option<&str>, period_days: u32, page: u32, per_page: u32,
    ) -> Result<Vec<Article>, SourceError>;
}

/// dev.to HTTP client.
#[derive(Debug, Clone)]
pub struct DevToClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl DevToClient {
    pub fn new(timeout: Duration, user_agent: &str, api_key: Option<String>) -> Result<Self, SourceError> {
        Ok(Self {
            http: http::build_client(timeout, user_agent)?,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.filter(|k| !k.is_empty()),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait::async_trait]
impl DevToApi for DevToClient {
    async fn articles_page(
        &self, tag: Option<&str>, period_days: u32, page: u32, per_page: u32,
    ) -> Result<Vec<Article>, SourceError> {
        let url = format!("{}/articles", self.base_url);
        let mut query = vec![
            ("top", period_days.to_string()),
            ("page", page.to_string()),
            ("per_page", per_page.to_string()),
        ];
        if let Some(tag) = tag {
            query.push(("tag", tag.to_string()));
        }

        tracing::debug!(%url, ?query, "fetching dev.to articles");

        let mut request = self.http.get(&url).query(&query);
        if let Some(key) = &self.api_key {
            request = request.header("api-key", key);
        }

        let raw: Vec<RawArticle> = http::send_json("devto", request).await?;
        Ok(raw.into_iter().map(Article::from).collect())
    }
}

async fn fetch_for_tag(
    api: &dyn DevToApi, tag: Option<&str>, period_days: u32, limit: usize,
) -> Result<Vec<Article>, SourceError> {
    let per_page = (limit as u32).clamp(1, MAX_PER_PAGE);
    let mut articles = Vec::new();
    let mut page = 1;

    while articles.len() < limit {
        if page > 1 {
            tokio::time::sleep(PAGE_DELAY).await;
        }

        let batch = api.articles_page(tag, period_days, page, per_page).await?;
        let full_page = batch.len() >= per_page as usize;
        let remaining = limit - articles.len();
        articles.extend(batch.into_iter().take(remaining));

        if !full_page {
            break;
        }
        page += 1;
    }

    Ok(articles)
}

/// Top articles of the last `period_days`, most reactions first.
///
/// With tags, each tag is paged separately and articles seen under an earlier
/// tag are skipped. Without tags the general feed is used.
pub async fn fetch_articles(
    api: &dyn DevToApi, tags: &[String], period_days: u32, limit: usize,
) -> Result<Vec<Article>, SourceError> {
    let mut articles = if tags.is_empty() {
        fetch_for_tag(api, None, period_days, limit).await?
    } else {
        let mut seen = HashSet::new();
        let mut merged = Vec::new();

        for (idx, tag) in tags.iter().enumerate() {
            if merged.len() >= limit {
                break;
            }
            if idx > 0 {
                tokio::time::sleep(PAGE_DELAY).await;
            }

            for article in fetch_for_tag(api, Some(tag), period_days, limit).await? {
                if merged.len() >= limit {
                    break;
                }
                if seen.insert(article.id) {
                    merged.push(article);
                }
            }
        }
        merged
    };

    articles.sort_by(|a, b| b.reactions.cmp(&a.reactions));
    articles.truncate(limit);
    Ok(articles)
}

/// Engagement for one tag across a sample of articles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagStats {
    pub name: String,
    pub article_count: usize,
    pub total_reactions: u64,
    pub total_comments: u64,
    pub avg_reactions: f64,
    pub avg_comments: f64,
    pub avg_reading_time: f64,
}

/// Engagement for one author across a sample of articles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorStats {
    pub username: String,
    pub article_count: usize,
    pub total_reactions: u64,
    pub total_comments: u64,
    pub avg_reactions: f64,
}

fn average(total: u64, count: usize) -> f64 {
    let avg = total as f64 / count as f64;
    (avg * 10.0).round() / 10.0
}

/// Group `articles` under each of `tags`, highest average reactions first.
///
/// An article counts once for every requested tag it carries; tags with no
/// articles in the sample are left out.
pub fn tag_stats(articles: &[Article], tags: &[String], limit: usize) -> Vec<TagStats> {
    let mut stats: Vec<TagStats> = tags
        .iter()
        .filter_map(|tag| {
            let tagged: Vec<&Article> = articles
                .iter()
                .filter(|a| a.tags.iter().any(|t| t.eq_ignore_ascii_case(tag)))
                .collect();
            if tagged.is_empty() {
                return None;
            }

            let count = tagged.len();
            let total_reactions = tagged.iter().map(|a| a.reactions).sum();
            let total_comments = tagged.iter().map(|a| a.comments).sum();
            let total_reading: u64 = tagged.iter().map(|a| u64::from(a.reading_time)).sum();

            Some(TagStats {
                name: tag.clone(),
                article_count: count,
                total_reactions,
                total_comments,
                avg_reactions: average(total_reactions, count),
                avg_comments: average(total_comments, count),
                avg_reading_time: average(total_reading, count),
            })
        })
        .collect();

    stats.sort_by(|a, b| b.avg_reactions.total_cmp(&a.avg_reactions));
    stats.truncate(limit);
    stats
}

/// Group `articles` by author, most total reactions first.
pub fn author_stats(articles: &[Article], limit: usize) -> Vec<AuthorStats> {
    let mut by_author: BTreeMap<&str, (usize, u64, u64)> = BTreeMap::new();
    for article in articles {
        let entry = by_author.entry(article.author.as_str()).or_default();
        entry.0 += 1;
        entry.1 += article.reactions;
        entry.2 += article.comments;
    }

    let mut stats: Vec<AuthorStats> = by_author
        .into_iter()
        .map(|(username, (count, total_reactions, total_comments))| AuthorStats {
            username: username.to_string(),
            article_count: count,
            total_reactions,
            total_comments,
            avg_reactions: average(total_reactions, count),
        })
        .collect();

    stats.sort_by(|a, b| b.total_reactions.cmp(&a.total_reactions));
    stats.truncate(limit);
    stats
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    fn article(id: u64, reactions: u64) -> Article {
        Article {
            id,
            title: format!("article {id}"),
            url: format!("https://dev.to/a/{id}"),
            author: "writer".into(),
            reactions,
            comments: 0,
            reading_time: 3,
            tags: vec![],
            published_at: None,
        }
    }

    /// Serves `total` articles per tag in pages and records every call.
    struct PagedDevTo {
        total: u64,
        calls: Mutex<Vec<(Option<String>, u32, u32)>>,
    }

    impl PagedDevTo {
        fn new(total: u64) -> Self {
            Self { total, calls: Mutex::new(Vec::new()) }
        }
    }

    #[async_trait::async_trait]
    impl DevToApi for PagedDevTo {
        async fn articles_page(
            &self, tag: Option<&str>, _period_days: u32, page: u32, per_page: u32,
        ) -> Result<Vec<Article>, SourceError> {
            self.calls.lock().unwrap().push((tag.map(String::from), page, per_page));
            if tag == Some("broken") {
                return Err(SourceError::RateLimited);
            }
            // "python" overlaps ids with every other tag.
            let offset = if tag == Some("python") || tag.is_none() { 0 } else { 1000 };
            let start = u64::from((page - 1) * per_page);
            let end = (start + u64::from(per_page)).min(self.total);
            Ok((start..end).map(|i| article(offset + i, i % 7)).collect())
        }
    }

    #[test]
    fn test_parse_article_tag_formats() {
        let raw: Vec<RawArticle> = serde_json::from_str(
            r#"[
                {"id": 1, "title": "A", "url": "https://dev.to/a", "user": {"username": "ann"},
                 "public_reactions_count": 12, "comments_count": 3, "reading_time_minutes": 4,
                 "tag_list": ["rust", "webdev"], "published_at": "2026-01-02T03:04:05Z"},
                {"id": 2, "title": "B", "tag_list": "python, , ai", "published_timestamp": "2026-02-01T00:00:00Z"}
            ]"#,
        )
        .unwrap();
        let articles: Vec<Article> = raw.into_iter().map(Article::from).collect();

        assert_eq!(articles[0].author, "ann");
        assert_eq!(articles[0].tags, vec!["rust", "webdev"]);
        assert_eq!(articles[0].published_at.unwrap().to_rfc3339(), "2026-01-02T03:04:05+00:00");
        assert_eq!(articles[1].author, "unknown");
        assert_eq!(articles[1].tags, vec!["python", "ai"]);
        assert!(articles[1].published_at.is_some());
    }

    #[tokio::test]
    async fn test_pagination_stops_at_limit() {
        let api = PagedDevTo::new(500);
        let articles = fetch_articles(&api, &[], 7, 150).await.unwrap();

        assert_eq!(articles.len(), 150);
        let calls = api.calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], (None, 1, 100));
        assert_eq!(calls[1], (None, 2, 100));
    }

    #[tokio::test]
    async fn test_pagination_stops_on_short_page() {
        let api = PagedDevTo::new(30);
        let articles = fetch_articles(&api, &[], 7, 50).await.unwrap();

        assert_eq!(articles.len(), 30);
        assert_eq!(api.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_tags_deduplicate_and_sort() {
        let api = PagedDevTo::new(5);
        let tags = vec!["python".to_string(), "python".to_string(), "rust".to_string()];
        let articles = fetch_articles(&api, &tags, 7, 100).await.unwrap();

        // 5 from python, duplicates skipped, 5 distinct from rust.
        assert_eq!(articles.len(), 10);
        assert!(articles.windows(2).all(|w| w[0].reactions >= w[1].reactions));
    }

    #[tokio::test]
    async fn test_tag_failure_propagates() {
        let api = PagedDevTo::new(5);
        let tags = vec!["rust".to_string(), "broken".to_string()];
        let result = fetch_articles(&api, &tags, 7, 100).await;
        assert!(matches!(result, Err(SourceError::RateLimited)));
    }

    fn tagged(id: u64, author: &str, reactions: u64, comments: u64, tags: &[&str]) -> Article {
        Article {
            author: author.into(),
            comments,
            reading_time: 4,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            ..article(id, reactions)
        }
    }

    #[test]
    fn test_tag_stats_sorted_by_average() {
        let articles = vec![
            tagged(1, "ann", 30, 3, &["rust", "webdev"]),
            tagged(2, "bob", 10, 1, &["Rust"]),
            tagged(3, "cat", 50, 5, &["webdev"]),
            tagged(4, "dan", 7, 0, &["python"]),
        ];
        let tags = vec!["rust".to_string(), "webdev".to_string(), "go".to_string()];
        let stats = tag_stats(&articles, &tags, 10);

        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].name, "webdev");
        assert_eq!(stats[0].article_count, 2);
        assert_eq!(stats[0].total_reactions, 80);
        assert_eq!(stats[0].avg_reactions, 40.0);
        assert_eq!(stats[1].name, "rust");
        assert_eq!(stats[1].total_comments, 4);
        assert_eq!(stats[1].avg_comments, 2.0);
        assert_eq!(stats[1].avg_reading_time, 4.0);

        assert_eq!(tag_stats(&articles, &tags, 1).len(), 1);
    }

    #[test]
    fn test_tag_stats_rounds_averages() {
        let articles = vec![
            tagged(1, "ann", 1, 0, &["rust"]),
            tagged(2, "ann", 1, 0, &["rust"]),
            tagged(3, "ann", 0, 0, &["rust"]),
        ];
        let stats = tag_stats(&articles, &["rust".to_string()], 10);
        assert_eq!(stats[0].avg_reactions, 0.7);
    }

    #[test]
    fn test_author_stats_sorted_by_total() {
        let articles = vec![
            tagged(1, "ann", 30, 2, &[]),
            tagged(2, "bob", 45, 1, &[]),
            tagged(3, "ann", 20, 4, &[]),
        ];
        let stats = author_stats(&articles, 10);

        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].username, "ann");
        assert_eq!(stats[0].article_count, 2);
        assert_eq!(stats[0].total_reactions, 50);
        assert_eq!(stats[0].total_comments, 6);
        assert_eq!(stats[0].avg_reactions, 25.0);
        assert_eq!(stats[1].username, "bob");

        assert_eq!(author_stats(&articles, 1).len(), 1);
        assert!(author_stats(&[], 10).is_empty());
    }
}
