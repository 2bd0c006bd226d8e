//! Serper.dev response types and normalization.

use serde::{Deserialize, Serialize};

/// Raw response from `POST /search`.
#[derive(Debug, Deserialize)]
pub struct SerperSearchResponse {
    #[serde(default)]
    pub organic: Vec<RawOrganic>,
    #[serde(default, rename = "peopleAlsoAsk")]
    pub people_also_ask: Vec<RawPeopleAlsoAsk>,
    #[serde(default, rename = "relatedSearches")]
    pub related_searches: Vec<RawRelated>,
}

#[derive(Debug, Deserialize)]
pub struct RawOrganic {
    #[serde(default)]
    pub position: Option<u32>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub snippet: String,
}

#[derive(Debug, Deserialize)]
pub struct RawPeopleAlsoAsk {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub snippet: String,
    #[serde(default)]
    pub link: String,
}

#[derive(Debug, Deserialize)]
pub struct RawRelated {
    #[serde(default)]
    pub query: Option<String>,
}

/// Raw response from `POST /autocomplete`.
#[derive(Debug, Deserialize)]
pub struct SerperAutocompleteResponse {
    #[serde(default)]
    pub suggestions: Vec<RawSuggestion>,
}

/// Suggestions arrive either as bare strings or as `{"value": ...}` objects.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawSuggestion {
    Text(String),
    Object { value: String },
}

/// Raw response from `POST /videos`.
#[derive(Debug, Deserialize)]
pub struct SerperVideosResponse {
    #[serde(default)]
    pub videos: Vec<RawVideo>,
}

#[derive(Debug, Deserialize)]
pub struct RawVideo {
    #[serde(default)]
    pub position: Option<u32>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub snippet: String,
    #[serde(default)]
    pub channel: String,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub views: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

/// Normalized organic result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganicResult {
    pub position: u32,
    pub title: String,
    pub link: String,
    pub snippet: String,
}

/// Normalized "People Also Ask" item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeopleAlsoAsk {
    pub question: String,
    pub snippet: String,
    pub link: String,
}

/// Normalized search response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub organic: Vec<OrganicResult>,
    pub people_also_ask: Vec<PeopleAlsoAsk>,
    pub related_searches: Vec<String>,
}

/// Normalized video result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoResult {
    pub position: u32,
    pub title: String,
    pub link: String,
    pub snippet: String,
    pub channel: String,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub views: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

impl SearchResponse {
    /// Convert a raw search response; missing positions fall back to rank order.
    pub fn from_raw(query: &str, raw: SerperSearchResponse) -> Self {
        let organic = raw
            .organic
            .into_iter()
            .enumerate()
            .map(|(idx, r)| OrganicResult {
                position: r.position.unwrap_or(idx as u32 + 1),
                title: r.title,
                link: r.link,
                snippet: r.snippet,
            })
            .collect();

        let people_also_ask = raw
            .people_also_ask
            .into_iter()
            .map(|p| PeopleAlsoAsk { question: p.question, snippet: p.snippet, link: p.link })
            .collect();

        let related_searches = raw
            .related_searches
            .into_iter()
            .filter_map(|r| r.query)
            .filter(|q| !q.is_empty())
            .collect();

        Self { query: query.to_string(), organic, people_also_ask, related_searches }
    }

    /// 1-indexed position of the first organic result whose link contains `pattern`.
    pub fn find_url_position(&self, pattern: &str) -> Option<u32> {
        self.organic
            .iter()
            .find(|r| r.link.contains(pattern))
            .map(|r| r.position)
    }
}

impl From<SerperAutocompleteResponse> for Vec<String> {
    fn from(raw: SerperAutocompleteResponse) -> Self {
        raw.suggestions
            .into_iter()
            .map(|s| match s {
                RawSuggestion::Text(text) => text,
                RawSuggestion::Object { value } => value,
            })
            .collect()
    }
}

impl From<SerperVideosResponse> for Vec<VideoResult> {
    fn from(raw: SerperVideosResponse) -> Self {
        raw.videos
            .into_iter()
            .enumerate()
            .map(|(idx, v)| VideoResult {
                position: v.position.unwrap_or(idx as u32 + 1),
                title: v.title,
                link: v.link,
                snippet: v.snippet,
                channel: v.channel,
                duration: v.duration,
                views: v.views,
                date: v.date,
            })
            .collect()
    }
}
