use crate::config::toml_config::{SourceConfig, TomlConfig};
use crate::core::adapter::SourceFormat;
use crate::core::CanonicalDate;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "lotto-live")]
#[command(about = "Today's winning numbers from the lottery results page")]
pub struct CliConfig {
    /// Results page to fetch (defaults to the New York Lottery homepage)
    #[arg(long)]
    pub url: Option<String>,

    /// Page representation: html, json or embedded_json
    #[arg(long, default_value = "embedded_json")]
    pub format: SourceFormat,

    /// Report draws for this date (YYYY-MM-DD) instead of today
    #[arg(long)]
    pub date: Option<CanonicalDate>,

    #[arg(long, default_value = "America/New_York")]
    pub time_zone: String,

    #[arg(long, default_value = "15")]
    pub timeout: u64,

    /// Also write the JSON result to this file
    #[arg(long)]
    pub output: Option<String>,

    #[arg(long, help = "Pretty-print the JSON result")]
    pub pretty: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    pub fn to_config(&self) -> TomlConfig {
        let mut config = TomlConfig::default();
        if let Some(url) = &self.url {
            config.sources = vec![SourceConfig::new(url, self.format)];
        } else {
            config.sources.iter_mut().for_each(|s| s.format = self.format);
        }
        config.service.time_zone = self.time_zone.clone();
        config.service.timeout_seconds = self.timeout;
        config.service.pretty = self.pretty;
        config.date = self.date;
        config
    }
}
