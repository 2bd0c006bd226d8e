//! Content-source clients for research-tools.
//!
//! This crate provides HTTP clients for Serper (Google and YouTube), Reddit
//! and dev.to, plus the [`Research`] facade that routes every call through
//! the response cache. Shared by the MCP server and the CLI.

pub mod devto;
pub mod error;
pub mod reddit;
pub mod research;
pub mod serper;

mod http;

pub use error::SourceError;
pub use research::{
    AuthorEngagement, DevToQuery, DevToStatsQuery, KeywordSuggestions, PeopleAlsoAskList, RedditQuery,
    RelatedSearches, Research, SerpAnalysis, SubredditPosts, TagEngagement, TrendingArticles, VideoList,
};
