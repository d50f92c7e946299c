pub mod adapter;
pub mod aggregator;
pub mod assembler;
pub mod dates;
pub mod engine;
pub mod extract;
pub mod fetcher;
pub mod games;
pub mod pipeline;
pub mod response;

pub use crate::domain::model::{
    CanonicalDate, DrawRecord, RawGameBlock, RawSessionEntry, ResultSet,
};
pub use crate::domain::ports::{ConfigProvider, DocumentFetcher, Pipeline};
pub use crate::utils::error::Result;
