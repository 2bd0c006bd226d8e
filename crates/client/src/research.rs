//! Cached research operations over every content source.
//!
//! [`Research`] is what the front ends call. Each operation validates its
//! input, builds a [`CacheRequest`] fingerprint, and goes through
//! [`ResponseCache::get_or_fetch`] so identical requests are served from the
//! local store until their source's TTL runs out.

use std::collections::BTreeSet;
use std::future::Future;
use std::sync::Arc;

use research_core::cache::CacheRequest;
use research_core::cache::policy::{DEVTO, REDDIT, SERPER, YOUTUBE};
use research_core::{AppConfig, Error, FetchOptions, Fetched, ResponseCache};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::SourceError;
use crate::devto::{self, Article, AuthorStats, DevToApi, DevToClient, TagStats};
use crate::reddit::{self, Period, RedditApi, RedditClient, RedditPost, Sort};
use crate::serper::{
    AutocompleteRequest, OrganicResult, PeopleAlsoAsk, SearchRequest, SerperApi, SerperClient, SerperConfig,
    VideoResult,
};

/// Serper returns at most 100 results per call.
const MAX_RESULTS: u32 = 100;

/// Autocomplete suggestions for a seed keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordSuggestions {
    pub query: String,
    pub suggestions: Vec<String>,
    pub count: usize,
}

/// Who ranks for a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerpAnalysis {
    pub query: String,
    pub country: String,
    pub results: Vec<OrganicResult>,
    pub people_also_ask: Vec<PeopleAlsoAsk>,
    pub related_searches: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeopleAlsoAskList {
    pub query: String,
    pub questions: Vec<PeopleAlsoAsk>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedSearches {
    pub query: String,
    pub related: Vec<String>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubredditPosts {
    pub subreddits: Vec<String>,
    pub sort: Sort,
    pub period: Period,
    pub posts: Vec<RedditPost>,
    pub count: usize,
}

/// Videos for a search, channel or trending query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoList {
    pub query: String,
    pub videos: Vec<VideoResult>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendingArticles {
    pub tags: Vec<String>,
    pub period_days: u32,
    pub articles: Vec<Article>,
    pub count: usize,
}

/// Per-tag engagement over a sample of trending articles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagEngagement {
    pub period_days: u32,
    pub sample_size: usize,
    pub tags: Vec<TagStats>,
}

/// Top authors over a sample of trending articles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorEngagement {
    pub period_days: u32,
    pub tags: Vec<String>,
    pub sample_size: usize,
    pub authors: Vec<AuthorStats>,
}

/// Subreddit listing parameters.
#[derive(Debug, Clone, Default)]
pub struct RedditQuery {
    pub subreddits: Vec<String>,
    pub sort: Sort,
    pub period: Period,
    pub limit: u32,
}

/// dev.to trending parameters.
#[derive(Debug, Clone)]
pub struct DevToQuery {
    pub tags: Vec<String>,
    pub period_days: u32,
    pub limit: u32,
}

impl Default for DevToQuery {
    fn default() -> Self {
        Self { tags: Vec::new(), period_days: 7, limit: 100 }
    }
}

/// dev.to tag or author analysis parameters; `limit` caps the returned rows.
#[derive(Debug, Clone)]
pub struct DevToStatsQuery {
    pub tags: Vec<String>,
    pub period_days: u32,
    pub limit: u32,
}

impl Default for DevToStatsQuery {
    fn default() -> Self {
        Self { tags: Vec::new(), period_days: 7, limit: 10 }
    }
}

impl DevToStatsQuery {
    /// Articles sampled for the analysis: ten per returned row, at least 100.
    pub fn sample_size(&self) -> u32 {
        self.limit.saturating_mul(10).max(100)
    }

    fn sample(&self) -> DevToQuery {
        DevToQuery { tags: self.tags.clone(), period_days: self.period_days, limit: self.sample_size() }
    }
}

/// Source adapters bound to one response cache.
#[derive(Clone)]
pub struct Research {
    cache: Option<ResponseCache>,
    cache_error: Option<String>,
    serper: Option<Arc<dyn SerperApi>>,
    reddit: Arc<dyn RedditApi>,
    devto: Arc<dyn DevToApi>,
}

impl std::fmt::Debug for Research {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Research")
            .field("cache", &self.cache)
            .field("cache_error", &self.cache_error)
            .field("serper", &self.serper.is_some())
            .finish_non_exhaustive()
    }
}

impl Research {
    pub fn new(
        cache: Option<ResponseCache>, serper: Option<Arc<dyn SerperApi>>, reddit: Arc<dyn RedditApi>,
        devto: Arc<dyn DevToApi>,
    ) -> Self {
        Self { cache, cache_error: None, serper, reddit, devto }
    }

    /// Build the HTTP clients and open the cache described by `config`.
    ///
    /// A cache that cannot be opened is logged and the operations run uncached;
    /// the cache maintenance calls then report the store as unavailable.
    pub async fn from_config(config: &AppConfig) -> Result<Self, SourceError> {
        let (cache, cache_error) = match config.open_cache().await {
            Ok(cache) => (Some(cache), None),
            Err(e) => {
                tracing::warn!(path = %config.db_path.display(), error = %e, "response cache unavailable, fetching fresh");
                (None, Some(e.to_string()))
            }
        };

        let serper = match config.require_serper_api_key() {
            Ok(key) => {
                let client = SerperClient::new(SerperConfig {
                    api_key: key.to_string(),
                    timeout: config.timeout(),
                    user_agent: config.user_agent.clone(),
                    ..Default::default()
                })?;
                Some(Arc::new(client) as Arc<dyn SerperApi>)
            }
            Err(_) => None,
        };

        let reddit = RedditClient::new(config.timeout(), &config.user_agent)?;
        let devto = DevToClient::new(config.timeout(), &config.user_agent, config.devto_api_key.clone())?;

        Ok(Self { cache, cache_error, serper, reddit: Arc::new(reddit), devto: Arc::new(devto) })
    }

    /// The response cache, or `StoreUnavailable` when it could not be opened.
    pub fn cache(&self) -> Result<&ResponseCache, Error> {
        self.cache.as_ref().ok_or_else(|| {
            Error::StoreUnavailable(
                self.cache_error
                    .clone()
                    .unwrap_or_else(|| "response cache is not configured".to_string()),
            )
        })
    }

    async fn cached<T, F, Fut>(&self, request: &CacheRequest, no_cache: bool, fetch: F) -> Result<Fetched<T>, SourceError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, SourceError>>,
    {
        match &self.cache {
            Some(cache) => cache.get_or_fetch(request, FetchOptions::no_cache(no_cache), fetch).await,
            None => fetch().await.map(Fetched::miss),
        }
    }

    fn serper(&self) -> Result<&dyn SerperApi, SourceError> {
        self.serper
            .as_deref()
            .ok_or(SourceError::MissingApiKey("RESEARCH_TOOLS_SERPER_API_KEY not set"))
    }

    /// Google autocomplete suggestions for `query`.
    pub async fn keywords(&self, query: &str, no_cache: bool) -> Result<Fetched<KeywordSuggestions>, SourceError> {
        let req = AutocompleteRequest { q: query.trim().to_string() };
        req.validate()?;

        let request = CacheRequest::new(SERPER, "keywords").text("query", &req.q);
        self.cached(&request, no_cache, || async {
            let suggestions = self.serper()?.autocomplete(&req).await?;
            Ok::<_, SourceError>(KeywordSuggestions { query: req.q.clone(), count: suggestions.len(), suggestions })
        })
        .await
    }

    /// Organic results, People Also Ask and related searches for `query`.
    pub async fn serp(
        &self, query: &str, num: u32, country: &str, no_cache: bool,
    ) -> Result<Fetched<SerpAnalysis>, SourceError> {
        let req = SearchRequest::new(query.trim(), num, country.trim());
        req.validate()?;

        let request = CacheRequest::new(SERPER, "serp")
            .text("query", &req.q)
            .int("num", i64::from(req.num))
            .folded("gl", &req.gl);
        self.cached(&request, no_cache, || async {
            let response = self.serper()?.search(&req).await?;
            Ok::<_, SourceError>(SerpAnalysis {
                query: response.query,
                country: req.gl.clone(),
                results: response.organic,
                people_also_ask: response.people_also_ask,
                related_searches: response.related_searches,
            })
        })
        .await
    }

    /// "People Also Ask" questions for `query`.
    pub async fn people_also_ask(
        &self, query: &str, country: &str, no_cache: bool,
    ) -> Result<Fetched<PeopleAlsoAskList>, SourceError> {
        let req = SearchRequest::new(query.trim(), 10, country.trim());
        req.validate()?;

        let request = CacheRequest::new(SERPER, "paa").text("query", &req.q).folded("gl", &req.gl);
        self.cached(&request, no_cache, || async {
            let questions = self.serper()?.search(&req).await?.people_also_ask;
            Ok::<_, SourceError>(PeopleAlsoAskList { query: req.q.clone(), count: questions.len(), questions })
        })
        .await
    }

    /// Related searches for `query`.
    pub async fn related(
        &self, query: &str, country: &str, no_cache: bool,
    ) -> Result<Fetched<RelatedSearches>, SourceError> {
        let req = SearchRequest::new(query.trim(), 10, country.trim());
        req.validate()?;

        let request = CacheRequest::new(SERPER, "related").text("query", &req.q).folded("gl", &req.gl);
        self.cached(&request, no_cache, || async {
            let related = self.serper()?.search(&req).await?.related_searches;
            Ok::<_, SourceError>(RelatedSearches { query: req.q.clone(), count: related.len(), related })
        })
        .await
    }

    /// Posts from one or more subreddits, merged and ranked by score.
    pub async fn reddit_posts(&self, query: &RedditQuery, no_cache: bool) -> Result<Fetched<SubredditPosts>, SourceError> {
        let subreddits = query
            .subreddits
            .iter()
            .map(|s| reddit::normalize_subreddit(s))
            .collect::<Result<BTreeSet<_>, _>>()?;
        if subreddits.is_empty() {
            return Err(SourceError::InvalidRequest("at least one subreddit is required".to_string()));
        }
        if !(1..=MAX_RESULTS).contains(&query.limit) {
            return Err(SourceError::InvalidRequest(format!("limit must be 1-100, got {}", query.limit)));
        }
        let subreddits: Vec<String> = subreddits.into_iter().collect();
        let (sort, period, limit) = (query.sort, query.period, query.limit);

        let request = CacheRequest::new(REDDIT, "posts")
            .set("subreddits", &subreddits)
            .folded("sort", sort.as_str())
            .folded_opt("period", sort.uses_period().then_some(period.as_str()))
            .int("limit", i64::from(limit));
        self.cached(&request, no_cache, || async {
            let posts = reddit::fetch_posts(self.reddit.as_ref(), &subreddits, sort, period, limit).await?;
            Ok::<_, SourceError>(SubredditPosts { subreddits: subreddits.clone(), sort, period, count: posts.len(), posts })
        })
        .await
    }

    /// Videos matching `query`.
    pub async fn youtube_search(
        &self, query: &str, limit: u32, region: &str, no_cache: bool,
    ) -> Result<Fetched<VideoList>, SourceError> {
        let req = SearchRequest::new(query.trim(), limit, region.trim());
        req.validate()?;

        let request = CacheRequest::new(YOUTUBE, "search")
            .text("query", &req.q)
            .int("limit", i64::from(req.num))
            .folded("region", &req.gl);
        self.cached(&request, no_cache, || async {
            let videos = self.serper()?.videos(&req).await?;
            Ok::<_, SourceError>(VideoList { query: req.q.clone(), count: videos.len(), videos })
        })
        .await
    }

    /// Videos from a channel; falls back to every match when none name the channel.
    pub async fn youtube_channel(
        &self, channel: &str, limit: u32, region: &str, no_cache: bool,
    ) -> Result<Fetched<VideoList>, SourceError> {
        let channel = channel.trim();
        if channel.is_empty() {
            return Err(SourceError::InvalidRequest("channel cannot be empty".to_string()));
        }
        let req = SearchRequest::new(format!("\"{channel}\" site:youtube.com"), limit, region.trim());
        req.validate()?;

        let request = CacheRequest::new(YOUTUBE, "channel")
            .folded("channel", channel)
            .int("limit", i64::from(req.num))
            .folded("region", &req.gl);
        self.cached(&request, no_cache, || async {
            let videos = self.serper()?.videos(&req).await?;
            let needle = channel.to_lowercase();
            let (matching, other): (Vec<_>, Vec<_>) =
                videos.into_iter().partition(|v| v.channel.to_lowercase().contains(&needle));
            let videos = if matching.is_empty() { other } else { matching };
            Ok::<_, SourceError>(VideoList { query: channel.to_string(), count: videos.len(), videos })
        })
        .await
    }

    /// Trending videos, optionally for one category.
    pub async fn youtube_trending(
        &self, category: Option<&str>, region: &str, limit: u32, no_cache: bool,
    ) -> Result<Fetched<VideoList>, SourceError> {
        let category = category.map(str::trim).filter(|c| !c.is_empty());
        let region = region.trim().to_lowercase();
        let q = match category {
            Some(category) => format!("trending {category} videos {region}"),
            None => format!("trending videos {region}"),
        };
        let req = SearchRequest::new(q, limit, &region);
        req.validate()?;

        let request = CacheRequest::new(YOUTUBE, "trending")
            .folded_opt("category", category)
            .folded("region", &req.gl)
            .int("limit", i64::from(req.num));
        self.cached(&request, no_cache, || async {
            let videos = self.serper()?.videos(&req).await?;
            Ok::<_, SourceError>(VideoList { query: req.q.clone(), count: videos.len(), videos })
        })
        .await
    }

    /// Top dev.to articles for the last `period_days`, optionally per tag.
    pub async fn devto_trending(
        &self, query: &DevToQuery, no_cache: bool,
    ) -> Result<Fetched<TrendingArticles>, SourceError> {
        if query.limit == 0 {
            return Err(SourceError::InvalidRequest("limit must be at least 1".to_string()));
        }
        if query.period_days == 0 {
            return Err(SourceError::InvalidRequest("period must be at least 1 day".to_string()));
        }
        let tags: Vec<String> = query
            .tags
            .iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let (period_days, limit) = (query.period_days, query.limit);

        let request = CacheRequest::new(DEVTO, "trending")
            .set("tags", &tags)
            .int("period_days", i64::from(period_days))
            .int("limit", i64::from(limit));
        self.cached(&request, no_cache, || async {
            let articles = devto::fetch_articles(self.devto.as_ref(), &tags, period_days, limit as usize).await?;
            Ok::<_, SourceError>(TrendingArticles { tags: tags.clone(), period_days, count: articles.len(), articles })
        })
        .await
    }

    /// Engagement per requested tag, highest average reactions first.
    ///
    /// The article sample is the cached trending listing for the same tags.
    pub async fn devto_tags(
        &self, query: &DevToStatsQuery, no_cache: bool,
    ) -> Result<Fetched<TagEngagement>, SourceError> {
        if query.tags.iter().all(|t| t.trim().is_empty()) {
            return Err(SourceError::InvalidRequest("at least one tag is required".to_string()));
        }
        if query.limit == 0 {
            return Err(SourceError::InvalidRequest("limit must be at least 1".to_string()));
        }
        let limit = query.limit as usize;

        let sample = self.devto_trending(&query.sample(), no_cache).await?;
        Ok(sample.map(|sample| TagEngagement {
            period_days: sample.period_days,
            sample_size: sample.count,
            tags: devto::tag_stats(&sample.articles, &sample.tags, limit),
        }))
    }

    /// Authors ranked by total reactions, optionally within some tags.
    pub async fn devto_authors(
        &self, query: &DevToStatsQuery, no_cache: bool,
    ) -> Result<Fetched<AuthorEngagement>, SourceError> {
        if query.limit == 0 {
            return Err(SourceError::InvalidRequest("limit must be at least 1".to_string()));
        }
        let limit = query.limit as usize;

        let sample = self.devto_trending(&query.sample(), no_cache).await?;
        Ok(sample.map(|sample| AuthorEngagement {
            period_days: sample.period_days,
            sample_size: sample.count,
            authors: devto::author_stats(&sample.articles, limit),
            tags: sample.tags,
        }))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::{DateTime, Utc};
    use research_core::TtlPolicy;
    use research_core::cache::CacheDb;

    use super::*;

    #[derive(Default)]
    struct MockSerper {
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl SerperApi for MockSerper {
        async fn search(&self, req: &SearchRequest) -> Result<crate::serper::SearchResponse, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(crate::serper::SearchResponse {
                query: req.q.clone(),
                organic: vec![OrganicResult {
                    position: 1,
                    title: "Result".into(),
                    link: "https://example.com".into(),
                    snippet: String::new(),
                }],
                people_also_ask: vec![PeopleAlsoAsk {
                    question: format!("what is {}?", req.q),
                    snippet: String::new(),
                    link: String::new(),
                }],
                related_searches: vec![format!("{} tutorial", req.q)],
            })
        }

        async fn autocomplete(&self, req: &AutocompleteRequest) -> Result<Vec<String>, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if req.q == "fail" {
                return Err(SourceError::RateLimited);
            }
            Ok(vec![format!("{} book", req.q), format!("{} course", req.q)])
        }

        async fn videos(&self, req: &SearchRequest) -> Result<Vec<VideoResult>, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let video = |channel: &str| VideoResult {
                position: 1,
                title: req.q.clone(),
                link: "https://www.youtube.com/watch?v=x".into(),
                snippet: String::new(),
                channel: channel.into(),
                duration: None,
                views: None,
                date: None,
            };
            Ok(vec![video("Fireship"), video("Someone Else")])
        }
    }

    #[derive(Default)]
    struct MockReddit {
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl RedditApi for MockReddit {
        async fn listing(
            &self, subreddit: &str, _sort: Sort, _period: Period, _limit: u32,
        ) -> Result<Vec<RedditPost>, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![RedditPost {
                id: subreddit.into(),
                title: "post".into(),
                url: String::new(),
                permalink: String::new(),
                author: "a".into(),
                subreddit: subreddit.into(),
                score: 1,
                upvote_ratio: 1.0,
                comments: 0,
                created_at: DateTime::<Utc>::UNIX_EPOCH,
                flair: None,
            }])
        }
    }

    fn devto_article(id: u64, author: &str, reactions: u64, tags: &[&str]) -> Article {
        Article {
            id,
            title: format!("article {id}"),
            url: format!("https://dev.to/{author}/{id}"),
            author: author.into(),
            reactions,
            comments: 1,
            reading_time: 5,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            published_at: None,
        }
    }

    #[derive(Default)]
    struct MockDevTo {
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl DevToApi for MockDevTo {
        async fn articles_page(
            &self, _tag: Option<&str>, _period_days: u32, page: u32, _per_page: u32,
        ) -> Result<Vec<Article>, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if page > 1 {
                return Ok(Vec::new());
            }
            Ok(vec![
                devto_article(1, "ann", 40, &["rust", "webdev"]),
                devto_article(2, "bob", 10, &["rust"]),
                devto_article(3, "ann", 20, &["webdev"]),
            ])
        }
    }

    struct Fixture {
        research: Research,
        serper: Arc<MockSerper>,
        reddit: Arc<MockReddit>,
        devto: Arc<MockDevTo>,
    }

    async fn fixture(with_serper: bool, with_cache: bool) -> Fixture {
        let serper = Arc::new(MockSerper::default());
        let reddit = Arc::new(MockReddit::default());
        let devto = Arc::new(MockDevTo::default());
        let cache = if with_cache {
            Some(ResponseCache::new(CacheDb::open_in_memory().await.unwrap(), TtlPolicy::default()))
        } else {
            None
        };
        let research = Research::new(
            cache,
            with_serper.then(|| serper.clone() as Arc<dyn SerperApi>),
            reddit.clone(),
            devto.clone(),
        );
        Fixture { research, serper, reddit, devto }
    }

    #[tokio::test]
    async fn test_keywords_cached_on_second_call() {
        let f = fixture(true, true).await;

        let first = f.research.keywords("rust", false).await.unwrap();
        assert!(!first.cache_hit);
        assert_eq!(first.value.count, 2);

        let second = f.research.keywords("rust", false).await.unwrap();
        assert!(second.cache_hit);
        assert_eq!(second.value, first.value);
        assert_eq!(f.serper.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_no_cache_refetches() {
        let f = fixture(true, true).await;

        f.research.keywords("rust", false).await.unwrap();
        let bypassed = f.research.keywords("rust", true).await.unwrap();
        assert!(!bypassed.cache_hit);
        assert_eq!(f.serper.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_fetch_failure_not_cached() {
        let f = fixture(true, true).await;

        assert!(matches!(f.research.keywords("fail", false).await, Err(SourceError::RateLimited)));
        assert!(f.research.keywords("fail", false).await.is_err());
        assert_eq!(f.serper.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_invalid_input_skips_cache_and_network() {
        let f = fixture(true, true).await;

        assert!(matches!(f.research.keywords("   ", false).await, Err(SourceError::InvalidRequest(_))));
        assert!(matches!(f.research.serp("rust", 0, "us", false).await, Err(SourceError::InvalidRequest(_))));
        let empty = RedditQuery { subreddits: vec![], limit: 10, ..Default::default() };
        assert!(matches!(f.research.reddit_posts(&empty, false).await, Err(SourceError::InvalidRequest(_))));
        let zero = DevToQuery { limit: 0, ..Default::default() };
        assert!(matches!(f.research.devto_trending(&zero, false).await, Err(SourceError::InvalidRequest(_))));

        assert_eq!(f.serper.calls.load(Ordering::SeqCst), 0);
        assert_eq!(f.research.cache().unwrap().statistics().await.unwrap().total_entries, 0);
    }

    #[tokio::test]
    async fn test_missing_serper_key_still_serves_cache() {
        let keyed = fixture(true, true).await;
        keyed.research.serp("rust", 10, "US", false).await.unwrap();

        let cache = keyed.research.cache().unwrap().clone();
        let keyless = Research::new(Some(cache), None, keyed.reddit.clone(), keyed.devto.clone());

        let hit = keyless.serp("rust", 10, "us", false).await.unwrap();
        assert!(hit.cache_hit);
        assert_eq!(hit.value.country, "us");

        let miss = keyless.serp("golang", 10, "us", false).await;
        assert!(matches!(miss, Err(SourceError::MissingApiKey(_))));
    }

    #[tokio::test]
    async fn test_paa_and_related_are_cached_separately() {
        let f = fixture(true, true).await;

        let paa = f.research.people_also_ask("rust", "us", false).await.unwrap();
        let related = f.research.related("rust", "us", false).await.unwrap();
        assert!(!paa.cache_hit);
        assert!(!related.cache_hit);
        assert_eq!(paa.value.questions[0].question, "what is rust?");
        assert_eq!(related.value.related, vec!["rust tutorial".to_string()]);
        assert_eq!(f.serper.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_reddit_equivalent_subreddit_lists_share_entry() {
        let f = fixture(false, true).await;

        let a = RedditQuery {
            subreddits: vec!["rust".into(), "r/TypeScript".into()],
            sort: Sort::Top,
            period: Period::Month,
            limit: 25,
        };
        let b = RedditQuery { subreddits: vec!["typescript".into(), "Rust".into(), "rust".into()], ..a.clone() };

        let first = f.research.reddit_posts(&a, false).await.unwrap();
        assert_eq!(first.value.subreddits, vec!["rust".to_string(), "typescript".to_string()]);
        let second = f.research.reddit_posts(&b, false).await.unwrap();
        assert!(second.cache_hit);
        assert_eq!(f.reddit.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_youtube_channel_filters_to_channel() {
        let f = fixture(true, true).await;

        let videos = f.research.youtube_channel("fireship", 10, "us", false).await.unwrap();
        assert_eq!(videos.value.count, 1);
        assert_eq!(videos.value.videos[0].channel, "Fireship");

        let fallback = f.research.youtube_channel("nobody", 10, "us", false).await.unwrap();
        assert_eq!(fallback.value.count, 2);
    }

    #[tokio::test]
    async fn test_youtube_trending_query() {
        let f = fixture(true, true).await;

        let trending = f.research.youtube_trending(Some("Gaming"), "GB", 5, false).await.unwrap();
        assert_eq!(trending.value.query, "trending Gaming videos gb");

        let again = f.research.youtube_trending(Some("gaming"), "gb", 5, false).await.unwrap();
        assert!(again.cache_hit);
    }

    #[tokio::test]
    async fn test_runs_uncached_without_store() {
        let f = fixture(true, false).await;

        assert!(!f.research.keywords("rust", false).await.unwrap().cache_hit);
        assert!(!f.research.keywords("rust", false).await.unwrap().cache_hit);
        assert_eq!(f.serper.calls.load(Ordering::SeqCst), 2);
        assert!(matches!(f.research.cache(), Err(Error::StoreUnavailable(_))));
    }

    #[tokio::test]
    async fn test_devto_trending_cached() {
        let f = fixture(false, true).await;
        let query = DevToQuery { tags: vec!["Rust".into(), "rust".into()], period_days: 7, limit: 10 };

        let first = f.research.devto_trending(&query, false).await.unwrap();
        assert_eq!(first.value.tags, vec!["rust".to_string()]);
        let second = f.research.devto_trending(&query, false).await.unwrap();
        assert!(second.cache_hit);
        assert_eq!(f.devto.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_devto_tags_share_trending_sample() {
        let f = fixture(false, true).await;
        let query = DevToStatsQuery { tags: vec!["Rust".into(), "webdev".into(), "go".into()], ..Default::default() };
        assert_eq!(query.sample_size(), 100);

        let first = f.research.devto_tags(&query, false).await.unwrap();
        assert!(!first.cache_hit);
        assert_eq!(first.value.sample_size, 3);
        let names: Vec<&str> = first.value.tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["webdev", "rust"]);
        assert_eq!(first.value.tags[0].avg_reactions, 30.0);

        let trending = DevToQuery { tags: query.tags.clone(), period_days: 7, limit: 100 };
        let sample = f.research.devto_trending(&trending, false).await.unwrap();
        assert!(sample.cache_hit);
        assert_eq!(f.devto.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_devto_tags_requires_tags() {
        let f = fixture(false, true).await;
        let query = DevToStatsQuery { tags: vec!["  ".into()], ..Default::default() };
        let result = f.research.devto_tags(&query, false).await;
        assert!(matches!(result, Err(SourceError::InvalidRequest(_))));
        assert_eq!(f.devto.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_devto_authors_ranked_by_total() {
        let f = fixture(false, true).await;
        let query = DevToStatsQuery { limit: 1, ..Default::default() };
        assert_eq!(query.sample_size(), 100);
        assert_eq!(DevToStatsQuery { limit: 25, ..Default::default() }.sample_size(), 250);

        let result = f.research.devto_authors(&query, false).await.unwrap();
        assert!(result.value.tags.is_empty());
        assert_eq!(result.value.sample_size, 3);
        assert_eq!(result.value.authors.len(), 1);
        assert_eq!(result.value.authors[0].username, "ann");
        assert_eq!(result.value.authors[0].total_reactions, 60);

        let again = f.research.devto_authors(&query, false).await.unwrap();
        assert!(again.cache_hit);
        assert_eq!(f.devto.calls.load(Ordering::SeqCst), 1);
    }
}
