use std::{io, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use storefront_core::{
    query::{self, CatalogQuery, SortOrder},
    CatalogSource, FallbackPolicy, HttpCatalogSource, OfflineCatalogSource, Storefront,
};
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod shell;

use config::load_settings;
use shell::{report_startup_outcome, Shell};

#[derive(Parser, Debug)]
#[command(about = "Browse the product catalog and build a cart")]
struct Cli {
    /// Catalog endpoint; overrides settings file and environment.
    #[arg(long)]
    catalog_url: Option<String>,
    /// Maximum number of products to request.
    #[arg(long)]
    limit: Option<u32>,
    #[arg(long)]
    timeout_seconds: Option<u64>,
    #[arg(long, value_enum)]
    on_error: Option<OnError>,
    /// Skip the network and serve the bundled catalog.
    #[arg(long)]
    offline: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OnError {
    Fallback,
    Fail,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PriceOrder {
    Asc,
    Desc,
}

impl From<PriceOrder> for SortOrder {
    fn from(order: PriceOrder) -> Self {
        match order {
            PriceOrder::Asc => SortOrder::Ascending,
            PriceOrder::Desc => SortOrder::Descending,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the catalog once and exit.
    List {
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long, value_enum)]
        sort: Option<PriceOrder>,
    },
    /// Print the catalog's categories and exit.
    Categories,
    /// Interactive session (default).
    Shell,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings();
    if let Some(url) = cli.catalog_url {
        settings.catalog_url = url;
    }
    if let Some(limit) = cli.limit {
        settings.catalog_limit = (limit > 0).then_some(limit);
    }
    if let Some(seconds) = cli.timeout_seconds.filter(|s| *s > 0) {
        settings.request_timeout_seconds = seconds;
    }
    if let Some(on_error) = cli.on_error {
        settings.fallback_policy = match on_error {
            OnError::Fallback => FallbackPolicy::UseBundled,
            OnError::Fail => FallbackPolicy::Surface,
        };
    }

    let source: Arc<dyn CatalogSource> = if cli.offline {
        Arc::new(OfflineCatalogSource)
    } else {
        let endpoint = settings.catalog_endpoint()?;
        info!(%endpoint, limit = ?settings.catalog_limit, "using catalog endpoint");
        Arc::new(
            HttpCatalogSource::new(endpoint, settings.catalog_limit, settings.request_timeout())
                .context("failed to build catalog http client")?,
        )
    };
    let store = Storefront::new_with_policy(source, settings.fallback_policy);

    let command = cli.command.unwrap_or(Command::Shell);
    let mut stdout = io::stdout();
    let outcome = store.fetch_catalog().await;
    report_startup_outcome(
        &outcome,
        matches!(command, Command::Shell),
        &mut stdout,
        &mut io::stderr(),
    )?;

    match command {
        Command::List {
            category,
            search,
            sort,
        } => {
            let view = CatalogQuery {
                category,
                search,
                sort: sort.map(SortOrder::from),
            };
            Shell::with_view(store, view)
                .print_products(&mut stdout)
                .await?;
        }
        Command::Categories => {
            let products = store.products().await;
            for category in query::categories(&products) {
                println!("{category}");
            }
        }
        Command::Shell => {
            println!("{}", shell::HELP);
            Shell::new(store)
                .run(BufReader::new(tokio::io::stdin()), &mut stdout)
                .await?;
        }
    }

    Ok(())
}
