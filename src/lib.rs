pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::{SourceConfig, TomlConfig};

pub use crate::core::{
    adapter::{SourceDocument, SourceFormat},
    dates::today,
    engine::{ResultsEngine, RunOutput},
    extract::{extract, Extractor},
    fetcher::HttpFetcher,
    pipeline::LiveResultsPipeline,
    response::HttpResponse,
};
pub use crate::domain::model::{CanonicalDate, DrawRecord, RawGameBlock, RawSessionEntry, ResultSet};
pub use crate::utils::error::{Result, ResultsError};
