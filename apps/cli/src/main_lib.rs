use std::sync::Arc;

use stockwatch_core::constants::DEFAULT_WATCHLIST;
use stockwatch_core::{
    AggregationEvent, DetailAggregator, DetailConfig, DetailRequest, JsonFileWatchlistStore,
    NewsFeed, SymbolSearch, WatchlistAggregator, WatchlistConfig, WatchlistStore,
};
use stockwatch_market_data::{FinnhubConfig, FinnhubProvider, NewsScope, QuoteProvider};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::Commands;
use crate::config::Config;
use crate::render;

pub fn init_tracing(log_format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr so command output stays clean on stdout.
    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

pub struct AppServices {
    pub store: Arc<JsonFileWatchlistStore>,
    pub watchlist: Arc<WatchlistAggregator>,
    pub detail: DetailAggregator,
    pub news: NewsFeed,
    pub search: SymbolSearch,
}

pub fn build_services(config: &Config) -> anyhow::Result<AppServices> {
    let path = config.watchlist_path();
    let store = Arc::new(JsonFileWatchlistStore::open(&path)?);
    tracing::debug!("Watchlist file in use: {}", path.display());

    if store.seed_defaults(DEFAULT_WATCHLIST)? {
        tracing::info!("First run: seeded default watchlist");
    }

    let provider: Arc<dyn QuoteProvider> = Arc::new(FinnhubProvider::with_config(FinnhubConfig {
        api_key: config.finnhub_api_key.clone().unwrap_or_default(),
        base_url: config.finnhub_base_url.clone(),
        timeout: config.request_timeout,
        ..FinnhubConfig::new("")
    }));

    Ok(services_with_provider(config, store, provider))
}

fn services_with_provider(
    config: &Config,
    store: Arc<JsonFileWatchlistStore>,
    provider: Arc<dyn QuoteProvider>,
) -> AppServices {
    let watchlist = Arc::new(WatchlistAggregator::new(
        provider.clone(),
        store.clone(),
        WatchlistConfig {
            market_tz: config.market_tz,
            locale: config.locale.clone(),
            ..WatchlistConfig::default()
        },
    ));
    let detail = DetailAggregator::new(
        provider.clone(),
        store.clone(),
        DetailConfig {
            market_tz: config.market_tz,
            locale: config.locale.clone(),
            ..DetailConfig::default()
        },
    );
    let news = NewsFeed::new(provider.clone(), config.market_tz);
    let search = SymbolSearch::new(provider);

    AppServices {
        store,
        watchlist,
        detail,
        news,
        search,
    }
}

/// The stored display name for `symbol`, else the company name from an exact
/// search match.
async fn company_name_for(
    services: &AppServices,
    symbol: &str,
) -> anyhow::Result<Option<String>> {
    if let Some(name) = services.store.display_name(symbol)? {
        return Ok(Some(name));
    }
    Ok(services.search.company_name(symbol).await)
}

pub async fn run(command: Commands, config: &Config, services: &AppServices) -> anyhow::Result<()> {
    match command {
        Commands::Watchlist { placeholders } => {
            config.require_api_key()?;
            let mut events = services.watchlist.subscribe();
            let snapshot = services.watchlist.refresh().await?;
            if placeholders {
                while let Ok(event) = events.try_recv() {
                    if let AggregationEvent::PlaceholderReady(skeleton) = event {
                        print!("{}", render::watchlist(&skeleton));
                        println!();
                    }
                }
            }
            print!("{}", render::watchlist(&snapshot));
        }
        Commands::Add { symbol, name } => {
            let name = name.join(" ");
            if services.store.add(&symbol, &name)? {
                println!("Added {}", symbol.trim().to_uppercase());
            } else {
                println!("{} is already on the watchlist", symbol.trim().to_uppercase());
            }
        }
        Commands::Remove { symbol } => {
            if services.store.remove(&symbol)? {
                println!("Removed {}", symbol.trim().to_uppercase());
            } else {
                println!("{} is not on the watchlist", symbol.trim().to_uppercase());
            }
        }
        Commands::Detail { symbol, watch } => {
            config.require_api_key()?;
            let company_name = company_name_for(services, &symbol).await?;
            let mut request = DetailRequest::new(symbol.as_str());
            if let Some(name) = company_name.clone() {
                request = request.with_company_name(name);
            }
            let mut session = services.detail.open(request)?;
            let snapshot = session.settled().await;
            print!("{}", render::detail(&snapshot));

            let name = company_name.unwrap_or_default();
            if watch && services.detail.add_to_watchlist(&snapshot.symbol, &name)? {
                println!("\nAdded {} to watchlist", snapshot.symbol);
            }
        }
        Commands::Search { query } => {
            config.require_api_key()?;
            let results = services.search.search(&query.join(" ")).await;
            print!("{}", render::search_results(&results));
        }
        Commands::News { symbol } => {
            config.require_api_key()?;
            let scope = match symbol {
                Some(symbol) => NewsScope::ForSymbol(symbol.trim().to_uppercase()),
                None => NewsScope::AllMarkets,
            };
            let stories = services.news.load_views(&scope).await;
            print!("{}", render::news(&scope.title(), &stories));
        }
    }
    Ok(())
}
