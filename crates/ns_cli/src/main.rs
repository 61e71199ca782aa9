use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use ns_client::config::{DEFAULT_API_URL, DEFAULT_NEWS_PATH};
use ns_client::{ClientConfig, NewsClient};
use ns_core::NewsSource;
use ns_dashboard::{Dashboard, FetchOutcome, FilterState, KeywordStore, DEFAULT_REFRESH_INTERVAL};
use ns_storage::DEFAULT_KEYWORDS_FILE;
use tracing::{debug, info};

mod duration;
mod logging;
mod render;

use duration::HumanDuration;
use render::Renderer;

#[derive(Parser, Debug)]
#[command(author, version, about = "Keyword news feed with sentiment emoji", long_about = None)]
pub struct Cli {
    /// Base URL of the news sentiment backend
    #[arg(long, env = "NEWS_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,
    /// Path of the keyword fetch endpoint (e.g. /news or /news/latest/)
    #[arg(long, default_value = DEFAULT_NEWS_PATH)]
    news_path: String,
    /// Request timeout (e.g. 30s, 1m)
    #[arg(long, default_value = "30s")]
    timeout: HumanDuration,
    #[arg(long, default_value = "file", help = "Keyword storage backend: file (default), memory")]
    storage: String,
    #[arg(long, env = "NEWS_KEYWORDS_FILE", default_value = DEFAULT_KEYWORDS_FILE)]
    keywords_file: PathBuf,
    #[arg(short, long)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage saved keywords
    Keywords {
        #[command(subcommand)]
        command: KeywordCommands,
    },
    /// Fetch articles for the saved keywords
    Fetch(FetchArgs),
    /// Search articles by free text and date range
    Search {
        #[arg(long, short)]
        query: Option<String>,
        #[arg(long, value_parser = parse_date)]
        start: Option<NaiveDate>,
        #[arg(long, value_parser = parse_date)]
        end: Option<NaiveDate>,
        /// Only show articles whose title or abstract contains this text
        #[arg(long)]
        filter: Option<String>,
    },
    /// Ask the backend to refresh, then fetch again
    Refresh(FetchArgs),
    /// Fetch, then keep re-fetching in the background until Ctrl-C
    Watch {
        #[command(flatten)]
        args: FetchArgs,
        /// Refresh interval (e.g. 10m, 1h, 1h15m30s)
        #[arg(long, default_value = "10m")]
        interval: HumanDuration,
    },
    /// Run sentiment analysis on a piece of text
    Analyze {
        #[arg(required = true)]
        text: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
enum KeywordCommands {
    List,
    Add {
        #[arg(required = true)]
        keywords: Vec<String>,
    },
    Remove {
        #[arg(required = true)]
        keywords: Vec<String>,
    },
}

#[derive(Args, Debug, Clone)]
struct FetchArgs {
    /// Only articles published on or after this date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,
    /// Only show articles whose title or abstract contains this text
    #[arg(long)]
    filter: Option<String>,
}

impl FetchArgs {
    fn filter_state(&self) -> FilterState {
        let mut filter = FilterState::new();
        filter.set_since(self.date);
        if let Some(term) = &self.filter {
            filter.set_search_term(term.clone());
        }
        filter
    }
}

fn parse_date(raw: &str) -> std::result::Result<NaiveDate, String> {
    ns_core::parse_date(raw).map_err(|e| e.to_string())
}

fn create_source(cli: &Cli) -> ns_core::Result<Arc<dyn NewsSource>> {
    let config = ClientConfig::new(&cli.api_url)?
        .with_news_path(cli.news_path.clone())
        .with_timeout(cli.timeout.0);
    let client = NewsClient::new(config)?;
    info!("🌐 Using backend {}", client.name());
    debug!("{:?}", client);
    Ok(Arc::new(client))
}

async fn handle_keywords(command: KeywordCommands, store: &mut KeywordStore) -> anyhow::Result<()> {
    match command {
        KeywordCommands::List => {}
        KeywordCommands::Add { keywords } => {
            for keyword in keywords {
                if store.add(&keyword).await? {
                    info!("➕ Added keyword '{}'", keyword.trim());
                } else {
                    info!("⏭️ Skipped '{}' (blank or already saved)", keyword.trim());
                }
            }
        }
        KeywordCommands::Remove { keywords } => {
            for keyword in keywords {
                if store.remove(&keyword).await? {
                    info!("➖ Removed keyword '{}'", keyword);
                } else {
                    info!("⏭️ '{}' is not a saved keyword", keyword);
                }
            }
        }
    }
    println!("{}", render::keywords(store.keywords()));
    Ok(())
}

/// Runs one fetch, prints the resulting state, and reports the fetch error if any.
async fn run_once(
    dashboard: &Dashboard,
    filter: &FilterState,
    fetch: impl std::future::Future<Output = ns_core::Result<FetchOutcome>>,
) -> anyhow::Result<()> {
    let result = fetch.await;
    print!("{}", Renderer::new().render(&dashboard.snapshot(), filter.search_term()));
    result.map(|_| ()).map_err(Into::into)
}

async fn watch(
    dashboard: Arc<Dashboard>,
    store: &KeywordStore,
    filter: &FilterState,
    interval: HumanDuration,
) -> anyhow::Result<()> {
    let mut renderer = Renderer::new();
    let mut updates = dashboard.subscribe();

    // Failures are already recorded as notifications; keep watching.
    let _ = dashboard.fetch_news(store.keywords(), filter).await;
    print!("{}", renderer.render(&updates.borrow_and_update(), filter.search_term()));

    info!("⏰ Auto-refresh every {}s, Ctrl-C to stop", interval.0.as_secs());
    let handle = dashboard.spawn_auto_refresh(interval.0);

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();
                if !state.is_loading() {
                    print!("{}", renderer.render(&state, filter.search_term()));
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("👋 Stopping");
                break;
            }
        }
    }

    dashboard.detach();
    handle.abort();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let storage = ns_storage::create_storage(&cli.storage, Some(cli.keywords_file.as_path()))
        .await
        .context("Failed to open keyword storage")?;
    let mut store = KeywordStore::load(storage).await;

    match cli.command {
        Commands::Keywords { command } => handle_keywords(command, &mut store).await,
        Commands::Analyze { ref text } => {
            let source = create_source(&cli)?;
            let result = source.analyze_sentiment(&text.join(" ")).await?;
            println!("{}", render::sentiment(&result));
            Ok(())
        }
        Commands::Fetch(ref args) => {
            let dashboard = Dashboard::new(create_source(&cli)?);
            let filter = args.filter_state();
            run_once(&dashboard, &filter, dashboard.fetch_news(store.keywords(), &filter)).await
        }
        Commands::Refresh(ref args) => {
            let dashboard = Dashboard::new(create_source(&cli)?);
            let filter = args.filter_state();
            run_once(&dashboard, &filter, dashboard.refresh_news(store.keywords(), &filter)).await
        }
        Commands::Search {
            ref query,
            start,
            end,
            ref filter,
        } => {
            let dashboard = Dashboard::new(create_source(&cli)?);
            let mut search = FilterState::new();
            search.set_range(start, end)?;
            if let Some(query) = query {
                search.set_search_term(query.clone());
            }
            // `--filter` narrows the displayed results, `--query` goes to the backend.
            let mut display = FilterState::new();
            if let Some(term) = filter {
                display.set_search_term(term.clone());
            }
            run_once(&dashboard, &display, dashboard.search_news(&search)).await
        }
        Commands::Watch { ref args, interval } => {
            let dashboard = Arc::new(Dashboard::new(create_source(&cli)?));
            watch(dashboard, &store, &args.filter_state(), interval).await
        }
    }
}
