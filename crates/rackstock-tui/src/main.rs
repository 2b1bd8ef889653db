//! Rackstock terminal client entry point.

use anyhow::Context;
use clap::Parser;
use log::{debug, info};
use rackstock_config::{LayeredConfigOptions, RackstockConfig};
use rackstock_core::AppState;
use rackstock_gateway::AiGateway;
use rackstock_storage::{FileKeyValueStore, PersistenceBridge};
use rackstock_tui::TuiConfig;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Fallback env var checked when the configured one is unset.
const FALLBACK_API_KEY_ENV: &str = "API_KEY";
const LOG_FILE: &str = "rackstock.log";

/// CLI arguments for the Rackstock TUI.
#[derive(Parser, Debug)]
#[command(name = "rackstock", about = "Data-center parts inventory", version)]
struct Cli {
    /// Extra config file applied over the layered config
    #[arg(long)]
    config: Option<PathBuf>,
    /// Storage directory override
    #[arg(long)]
    storage: Option<PathBuf>,
    /// Model override
    #[arg(long)]
    model: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cwd = std::env::current_dir().context("cwd")?;

    let mut options = LayeredConfigOptions::new(&cwd);
    if let Some(path) = cli.config.as_ref() {
        options = options.with_runtime_path(path);
    }
    let layered = RackstockConfig::load_layered_with_options(options)
        .context("failed to load layered config")?;
    let mut config = layered.config;

    if let Some(storage) = cli.storage.as_ref() {
        config.storage.path = storage.display().to_string();
    }
    if let Some(model) = cli.model.clone() {
        config.gateway.model = model;
    }

    let storage_dir = resolve_dir(&cwd, &config.storage.path);
    fs::create_dir_all(&storage_dir)
        .with_context(|| format!("failed to create {}", storage_dir.display()))?;
    init_logging(&storage_dir)?;

    info!(
        "starting TUI (config_set={}, storage={}, layers={})",
        cli.config.is_some(),
        storage_dir.display(),
        layered.layers.len()
    );

    let api_key = read_api_key(&config.gateway.api_key_env);
    debug!(
        "api key lookup (env={}, found={})",
        config.gateway.api_key_env,
        api_key.is_some()
    );

    let store = Arc::new(FileKeyValueStore::new(&storage_dir).context("failed to open storage")?);
    let bridge = PersistenceBridge::new(store);
    let state = AppState::load(bridge, config.chat.greeting.as_deref())
        .context("failed to load inventory")?;
    let gateway =
        AiGateway::from_config(&config.gateway, api_key).context("failed to build ai gateway")?;

    rackstock_tui::run(
        state,
        gateway,
        TuiConfig {
            model_name: config.gateway.model.clone(),
        },
    )
    .await
}

/// First non-blank key from the configured env var, then the fallback one.
fn read_api_key(env_name: &str) -> Option<String> {
    pick_api_key([
        std::env::var(env_name).ok(),
        std::env::var(FALLBACK_API_KEY_ENV).ok(),
    ])
}

fn pick_api_key(candidates: impl IntoIterator<Item = Option<String>>) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .find(|value| !value.trim().is_empty())
}

fn resolve_dir(cwd: &Path, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

/// Log to a file under the storage dir so output never lands on the TUI.
fn init_logging(storage_dir: &Path) -> anyhow::Result<()> {
    let path = storage_dir.join(LOG_FILE);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let _ = env_logger::builder()
        .format_timestamp_millis()
        .parse_default_env()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init();
    Ok(())
}
