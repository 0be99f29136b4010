use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use update_checker::config::CheckerConfig;
use update_checker::version::cache::ResultCache;
use update_checker::version::checker::UpdateChecker;
use update_checker::version::types::ExtraFields;

#[derive(Parser)]
#[command(name = "update-checker")]
#[command(version, about = "Report when a newer release of a package is available")]
struct Cli {
    /// Package name to check
    package: String,

    /// Version currently running
    version: String,

    /// Update endpoint URL
    #[arg(long)]
    url: Option<String>,

    /// Extra field sent with the request (repeatable)
    #[arg(long = "field", value_name = "KEY=VALUE", value_parser = parse_field)]
    fields: Vec<(String, String)>,

    /// Seconds a result stays fresh
    #[arg(long)]
    ttl: Option<u64>,

    /// Keep results in memory only
    #[arg(long)]
    no_persist: bool,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", raw))
}

fn load_config(cli: &Cli) -> anyhow::Result<CheckerConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("reading config file {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("parsing config file {}", path.display()))?
        }
        None => CheckerConfig::default(),
    };

    if let Some(url) = &cli.url {
        config.url = Some(url.clone());
    }
    if let Some(ttl) = cli.ttl {
        config.cache.ttl_secs = ttl;
    }
    if cli.no_persist {
        config.cache.persist = false;
    }

    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("update_checker=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config = load_config(&cli)?;

    let cache = match config.cache.store_path() {
        Some(path) => ResultCache::open(path),
        None => ResultCache::in_memory(),
    };
    let checker = UpdateChecker::from_config(&config, Arc::new(cache));

    let extra: ExtraFields = cli
        .fields
        .iter()
        .map(|(key, value)| (key.clone(), serde_json::Value::String(value.clone())))
        .collect();

    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(checker.notify(&cli.package, &cli.version, &extra, &mut std::io::stdout()));

    Ok(())
}
