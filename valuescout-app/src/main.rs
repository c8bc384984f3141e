use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use valuescout_common::observability::init_logging;
use valuescout_config::{ScoutConfig, ScoutConfigLoader};
mod cli;
mod commands;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::RandomString { count } => {
            commands::random_strings(count);
            Ok(())
        }
        Command::CoreValues(args) => {
            // 1) Load config (env wins over file, flags win over both)
            let loader = match &cli.config {
                Some(path) => ScoutConfigLoader::new().with_file(path),
                None => ScoutConfigLoader::new().with_optional_file("valuescout.yaml"),
            };
            let mut cfg: ScoutConfig = loader.load()?;
            args.apply(&mut cfg);

            let log_path = init_logging(cfg.logging.to_log_config())?;
            tracing::info!(log = %log_path.display(), "valuescout starting");

            commands::core_values(&cfg, &args).await
        }
    }
}
