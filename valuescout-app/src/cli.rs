use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use valuescout_config::ScoutConfig;

#[derive(Debug, Parser)]
#[command(name = "valuescout", version, about = "Scrape the TRG careers core values")]
pub struct Cli {
    /// Configuration file; `valuescout.yaml` is used when present.
    #[arg(long, global = true, env = "VALUESCOUT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Navigate to the careers site and save its core values and images.
    CoreValues(CoreValuesArgs),
    /// Print random test strings.
    RandomString {
        #[arg(long, default_value_t = 5)]
        count: usize,
    },
}

#[derive(Debug, Default, Args)]
pub struct CoreValuesArgs {
    #[arg(long)]
    pub headless: bool,

    #[arg(long, value_name = "FILE")]
    pub json_out: Option<PathBuf>,

    #[arg(long, value_name = "DIR")]
    pub images_dir: Option<PathBuf>,

    #[arg(long, value_name = "URL")]
    pub webdriver_url: Option<String>,

    /// Print the run report as JSON instead of a summary.
    #[arg(long)]
    pub report_json: bool,
}

impl CoreValuesArgs {
    /// Command-line flags win over file and environment settings.
    pub fn apply(&self, cfg: &mut ScoutConfig) {
        if self.headless {
            cfg.browser.headless = true;
        }
        if let Some(path) = &self.json_out {
            cfg.output.json_path = path.clone();
        }
        if let Some(dir) = &self.images_dir {
            cfg.output.images_dir = dir.clone();
        }
        if let Some(url) = &self.webdriver_url {
            cfg.browser.webdriver_url = url.clone();
        }
    }
}
