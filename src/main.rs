use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use price_catalog::{
    load_or_bootstrap, CatalogConfig, Catalog, LinePrompter, ScorerKind, Session, VERSION,
};

/// Interactive price catalog with similarity lookup.
///
/// Type a name to search, `name=price` to add, an index to edit,
/// `/help` for everything else.
#[derive(Parser, Debug)]
#[command(name = "catalog", version)]
struct Cli {
    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Catalog JSON file (overrides the config file).
    #[arg(long)]
    file: Option<PathBuf>,

    /// Similarity strategy used for lookups.
    #[arg(long, value_enum)]
    scorer: Option<ScorerKind>,

    /// Save products in their current order instead of sorting by (name, price).
    #[arg(long)]
    no_sort: bool,
}

fn main() -> Result<()> {
    // Logs go to stderr so they never interleave with prompts
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("price_catalog=warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    let store = config.build_store();
    let products = load_or_bootstrap(&store, config.create_if_missing)
        .with_context(|| format!("Failed to load catalog from {}", config.path.display()))?;

    println!(
        "Price catalog v{} - {} products from {} ({} lookup). Type /help for commands.",
        VERSION,
        products.len(),
        config.path.display(),
        config.build_scorer().name()
    );

    let catalog = Catalog::with_products(config.build_scorer(), products);
    let mut session = Session::new(catalog, store, LinePrompter::stdio())
        .with_sort_on_save(config.sort_on_save);
    session.run()
}

fn resolve_config(cli: &Cli) -> Result<CatalogConfig> {
    let mut config = match &cli.config {
        Some(path) => CatalogConfig::load(path)?,
        None => CatalogConfig::default(),
    };

    if let Some(file) = &cli.file {
        config.path = file.clone();
    }
    if let Some(scorer) = cli.scorer {
        config.scorer = scorer;
    }
    if cli.no_sort {
        config.sort_on_save = false;
    }

    Ok(config)
}
