use clap::Parser;
use opex_config::Config;
use std::path::PathBuf;

#[cfg(test)]
#[path = "./cli.tests.rs"]
mod cli_tests;

/// opex fetches cluster usage data files and turns them into chart-ready dashboard datasets.
#[derive(Parser, Debug, Clone, Default)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the configuration file (defaults to $HOME/.opex/config.yaml).
    #[arg(long, env = "OPEX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Base URL or local directory with the usage data files.
    #[arg(long, env = "OPEX_DATA_URL")]
    pub data_url: Option<String>,

    /// Resource kind to build node datasets for (cpu or memory).
    #[arg(long, short = 'k')]
    pub usage_kind: Option<String>,

    /// Seconds between two refresh cycles.
    #[arg(long, short)]
    pub interval: Option<u64>,

    /// Directory where the dashboard snapshot is written after every update.
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Run a single refresh cycle and print the dashboard snapshot to stdout.
    #[arg(long)]
    pub once: bool,
}

impl Args {
    /// Returns configuration with command line values taking precedence over the file ones.
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(data_url) = &self.data_url {
            config.data_url = data_url.clone();
        }

        if let Some(usage_kind) = &self.usage_kind {
            config.usage_kind = usage_kind.clone();
        }

        if let Some(interval) = self.interval {
            config.refresh_interval = interval;
        }

        if self.output.is_some() {
            config.output_dir = self.output.clone();
        }

        config
    }
}
