use anyhow::Result;
use clap::Parser;

use skingate::{
    app::{load_config, load_config_file, Config},
    cli::{handle_command, Cli},
    utils::{init_logger, log_warn},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let (config, load_error) = match &cli.config {
        Some(path) => (load_config_file(path)?, None),
        None => match load_config() {
            Ok(cfg) => (cfg, None),
            Err(e) => (Config::default(), Some(e)),
        },
    };

    let level = if cli.verbose { "debug" } else { config.logging.level.as_str() };
    init_logger(level);

    if let Some(e) = load_error {
        log_warn("⚠️", format!("Failed to load config: {:#}. Using defaults.", e));
    }

    handle_command(&cli, &config).await
}
