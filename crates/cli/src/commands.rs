//! Command execution for rt.

use anyhow::Result;
use research_client::{DevToQuery, DevToStatsQuery, RedditQuery, Research};
use research_core::{AppConfig, Fetched};
use serde::Serialize;

use crate::cli::{CacheAction, Cli, Command, DevtoAction, GoogleAction, SourceCommand, YoutubeAction};

/// Run the parsed command with configuration from the environment.
pub async fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::load()?;

    match cli.command {
        Command::Cache { action } => run_cache(&config, action).await,
        Command::Source(command) => {
            let research = Research::from_config(&config).await?;
            run_source(&research, command, cli.no_cache).await
        }
    }
}

/// Cache maintenance fails outright when the store cannot be opened.
async fn run_cache(config: &AppConfig, action: CacheAction) -> Result<()> {
    let cache = config.open_cache().await.inspect_err(|e| {
        tracing::error!(path = %config.db_path.display(), error = %e, "cannot open response cache");
    })?;

    match action {
        CacheAction::Stats => print_json(&cache.statistics().await?),
        CacheAction::Clear => {
            let deleted = cache.clear_all().await?;
            print_json(&serde_json::json!({ "deleted": deleted }))
        }
        CacheAction::Cleanup => {
            let deleted = cache.cleanup().await?;
            print_json(&serde_json::json!({ "deleted": deleted }))
        }
    }
}

async fn run_source(research: &Research, command: SourceCommand, no_cache: bool) -> Result<()> {
    match command {
        SourceCommand::Google { action } => match action {
            GoogleAction::Keywords { query } => emit(research.keywords(&query, no_cache).await?),
            GoogleAction::Serp { query, num, country } => {
                emit(research.serp(&query, num, &country, no_cache).await?)
            }
            GoogleAction::Paa { query, country } => emit(research.people_also_ask(&query, &country, no_cache).await?),
            GoogleAction::Related { query, country } => emit(research.related(&query, &country, no_cache).await?),
        },
        SourceCommand::Reddit(args) => {
            let query = RedditQuery { subreddits: args.subreddits, sort: args.sort, period: args.period, limit: args.limit };
            emit(research.reddit_posts(&query, no_cache).await?)
        }
        SourceCommand::Youtube { action } => match action {
            YoutubeAction::Search { query, limit, region } => {
                emit(research.youtube_search(&query, limit, &region, no_cache).await?)
            }
            YoutubeAction::Channel { channel, limit, region } => {
                emit(research.youtube_channel(&channel, limit, &region, no_cache).await?)
            }
            YoutubeAction::Trending { category, region, limit } => {
                emit(research.youtube_trending(category.as_deref(), &region, limit, no_cache).await?)
            }
        },
        SourceCommand::Devto { action } => match action {
            DevtoAction::Trending { tags, period, limit } => {
                let query = DevToQuery { tags, period_days: period, limit };
                emit(research.devto_trending(&query, no_cache).await?)
            }
            DevtoAction::Tags { tags, period, limit } => {
                let query = DevToStatsQuery { tags, period_days: period, limit };
                emit(research.devto_tags(&query, no_cache).await?)
            }
            DevtoAction::Authors { tags, period, limit } => {
                let query = DevToStatsQuery { tags, period_days: period, limit };
                emit(research.devto_authors(&query, no_cache).await?)
            }
        },
    }
}

/// Print the payload to stdout and where it came from to stderr.
fn emit<T: Serialize>(fetched: Fetched<T>) -> Result<()> {
    eprintln!("{}", if fetched.cache_hit { "served from cache" } else { "fetched" });
    print_json(&fetched.value)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
