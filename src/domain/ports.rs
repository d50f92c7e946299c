use crate::config::toml_config::SourceConfig;
use crate::core::adapter::{HtmlLayout, JsonLayout};
use crate::core::games::GameTable;
use crate::domain::model::{CanonicalDate, RawGameBlock, ResultSet};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono_tz::Tz;
use std::time::Duration;

pub trait DocumentFetcher: Send + Sync {
    /// `timeout` bounds the whole request for this one source.
    fn fetch(
        &self,
        url: &str,
        timeout: Duration,
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn sources(&self) -> &[SourceConfig];
    fn time_zone(&self) -> Tz;
    fn fetch_timeout(&self) -> Duration;
    /// 來源自訂的逾時優先於服務預設值
    fn source_timeout(&self, source: &SourceConfig) -> Duration;
    /// 指定日期時不讀取系統時鐘
    fn fixed_date(&self) -> Option<CanonicalDate>;
    fn pretty_output(&self) -> bool;
    fn html_layout(&self) -> &HtmlLayout;
    fn json_layout(&self) -> &JsonLayout;
    fn game_table(&self) -> GameTable;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<RawGameBlock>>;
    async fn transform(&self, blocks: Vec<RawGameBlock>) -> Result<ResultSet>;
    async fn load(&self, results: &ResultSet) -> Result<String>;
}
