//! Command-line interface parsing for rt.

use clap::{Args, Parser, Subcommand};
use research_client::reddit::{Period, Sort};

/// Research data from Google, Reddit, YouTube and dev.to with a local response cache
#[derive(Parser, Debug)]
#[command(name = "rt")]
#[command(about = "Research data from Google, Reddit, YouTube and dev.to with a local response cache")]
#[command(version)]
pub struct Cli {
    /// Skip the cache lookup and fetch fresh data (the result is still cached)
    #[arg(long, global = true)]
    pub no_cache: bool,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Inspect and maintain the response cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
    #[command(flatten)]
    Source(SourceCommand),
}

/// Commands that query a content source through the cache.
#[derive(Subcommand, Debug)]
pub enum SourceCommand {
    /// Google keyword and SERP research (needs a Serper API key)
    Google {
        #[command(subcommand)]
        action: GoogleAction,
    },
    /// Top posts from one or more subreddits
    Reddit(RedditArgs),
    /// YouTube video research (needs a Serper API key)
    Youtube {
        #[command(subcommand)]
        action: YoutubeAction,
    },
    /// dev.to article research
    Devto {
        #[command(subcommand)]
        action: DevtoAction,
    },
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheAction {
    /// Entry counts per source, expired entries and size on disk
    Stats,
    /// Delete every cached response
    Clear,
    /// Delete only expired responses
    Cleanup,
}

#[derive(Subcommand, Debug)]
pub enum GoogleAction {
    /// Autocomplete keyword suggestions
    Keywords { query: String },
    /// Organic results, People Also Ask and related searches
    Serp {
        query: String,
        /// Number of results (1-100)
        #[arg(short, long, default_value_t = 10)]
        num: u32,
        /// Two-letter country code
        #[arg(short, long, default_value = "us")]
        country: String,
    },
    /// People Also Ask questions
    Paa {
        query: String,
        #[arg(short, long, default_value = "us")]
        country: String,
    },
    /// Related searches
    Related {
        query: String,
        #[arg(short, long, default_value = "us")]
        country: String,
    },
}

#[derive(Args, Debug)]
pub struct RedditArgs {
    /// Subreddit names, with or without the r/ prefix
    #[arg(required = true)]
    pub subreddits: Vec<String>,
    /// hot, new, rising, top or controversial
    #[arg(short, long, default_value = "hot")]
    pub sort: Sort,
    /// Time window for top and controversial: hour, day, week, month, year or all
    #[arg(short, long, default_value = "week")]
    pub period: Period,
    /// Posts per subreddit (1-100)
    #[arg(short, long, default_value_t = 25)]
    pub limit: u32,
}

#[derive(Subcommand, Debug)]
pub enum YoutubeAction {
    /// Search videos
    Search {
        query: String,
        #[arg(short, long, default_value_t = 20)]
        limit: u32,
        #[arg(short, long, default_value = "us")]
        region: String,
    },
    /// Videos from a channel
    Channel {
        channel: String,
        #[arg(short, long, default_value_t = 20)]
        limit: u32,
        #[arg(short, long, default_value = "us")]
        region: String,
    },
    /// Trending videos, optionally for a category
    Trending {
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long, default_value = "us")]
        region: String,
        #[arg(short, long, default_value_t = 20)]
        limit: u32,
    },
}

#[derive(Subcommand, Debug)]
pub enum DevtoAction {
    /// Most-reacted articles over the last N days
    Trending {
        /// Tag to include; repeat for several
        #[arg(short, long = "tag")]
        tags: Vec<String>,
        /// Look-back window in days
        #[arg(short, long, default_value_t = 7)]
        period: u32,
        #[arg(short, long, default_value_t = 100)]
        limit: u32,
    },
    /// Engagement per tag, highest average reactions first
    Tags {
        /// Tag to compare; repeat for several
        #[arg(short, long = "tag", required = true)]
        tags: Vec<String>,
        /// Look-back window in days
        #[arg(short, long, default_value_t = 7)]
        period: u32,
        /// Maximum tags shown
        #[arg(short, long, default_value_t = 10)]
        limit: u32,
    },
    /// Authors ranked by total reactions
    Authors {
        /// Only count articles under this tag; repeat for several
        #[arg(short, long = "tag")]
        tags: Vec<String>,
        /// Look-back window in days
        #[arg(short, long, default_value_t = 7)]
        period: u32,
        /// Maximum authors shown
        #[arg(short, long, default_value_t = 10)]
        limit: u32,
    },
}
