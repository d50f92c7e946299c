use crate::config::toml_config::SourceConfig;
use crate::core::adapter::SourceDocument;
use crate::core::dates;
use crate::core::extract::Extractor;
use crate::core::games::canonical_game_name;
use crate::core::{ConfigProvider, DocumentFetcher, Pipeline, RawGameBlock, ResultSet};
use crate::utils::error::{Result, ResultsError};
use futures::future::join_all;

/// Fetches every configured source concurrently, adapts each one on its own,
/// then reconciles all blocks into one result set.
pub struct LiveResultsPipeline<F: DocumentFetcher, C: ConfigProvider> {
    fetcher: F,
    config: C,
    extractor: Extractor,
}

impl<F: DocumentFetcher, C: ConfigProvider> LiveResultsPipeline<F, C> {
    pub fn new(fetcher: F, config: C) -> Result<Self> {
        let extractor = Extractor::new(
            config.html_layout(),
            config.json_layout().clone(),
            config.game_table(),
        )?;
        Ok(Self {
            fetcher,
            config,
            extractor,
        })
    }

    async fn fetch_source(&self, source: &SourceConfig) -> Result<Vec<RawGameBlock>> {
        let timeout = self.config.source_timeout(source);

        let body = tokio::time::timeout(timeout, self.fetcher.fetch(&source.url, timeout))
            .await
            .map_err(|_| ResultsError::TimeoutError {
                url: source.url.clone(),
                seconds: timeout.as_secs(),
            })??;

        // 解析後的 HTML 樹不跨越 await
        self.adapt_source(source, &body)
    }

    fn adapt_source(&self, source: &SourceConfig, body: &str) -> Result<Vec<RawGameBlock>> {
        let json = source.json_layout(self.extractor.json_layout());
        let document = SourceDocument::from_body(source.format, body, &json)?;
        let mut blocks = self.extractor.adapt_with(&document, &json)?;

        if let Some(game) = &source.game {
            let wanted = self
                .extractor
                .games()
                .resolve(game)
                .unwrap_or_else(|| canonical_game_name(game));
            blocks.retain(|block| block.game_name == wanted);
        }
        Ok(blocks)
    }
}

#[async_trait::async_trait]
impl<F: DocumentFetcher, C: ConfigProvider> Pipeline for LiveResultsPipeline<F, C> {
    async fn extract(&self) -> Result<Vec<RawGameBlock>> {
        let sources = self.config.sources();
        tracing::info!("Fetching {} source(s)", sources.len());

        let outcomes = join_all(sources.iter().map(|source| self.fetch_source(source))).await;

        let mut blocks = Vec::new();
        for (source, outcome) in sources.iter().zip(outcomes) {
            match outcome {
                Ok(found) => {
                    tracing::info!("{}: {} game block(s)", source.label(), found.len());
                    blocks.extend(found);
                }
                Err(e) => {
                    // 單一來源失敗只影響該來源的遊戲
                    tracing::warn!(
                        "{}: skipped ({:?}): {}",
                        source.label(),
                        e.category(),
                        e
                    );
                }
            }
        }

        Ok(blocks)
    }

    async fn transform(&self, blocks: Vec<RawGameBlock>) -> Result<ResultSet> {
        let today = self
            .config
            .fixed_date()
            .unwrap_or_else(|| dates::today(self.config.time_zone()));
        tracing::info!("Matching draws against {}", today);

        Ok(self.extractor.reconcile(&blocks, today))
    }

    async fn load(&self, results: &ResultSet) -> Result<String> {
        let body = if self.config.pretty_output() {
            serde_json::to_string_pretty(results)?
        } else {
            serde_json::to_string(results)?
        };
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::toml_config::TomlConfig;
    use crate::core::adapter::SourceFormat;
    use crate::core::CanonicalDate;
    use std::collections::HashMap;
    use std::time::Duration;

    #[derive(Clone, Default)]
    struct MockFetcher {
        pages: HashMap<String, String>,
        slow: Vec<String>,
    }

    impl MockFetcher {
        fn with_page(mut self, url: &str, body: &str) -> Self {
            self.pages.insert(url.to_string(), body.to_string());
            self
        }

        fn with_slow(mut self, url: &str) -> Self {
            self.slow.push(url.to_string());
            self
        }
    }

    impl DocumentFetcher for MockFetcher {
        async fn fetch(&self, url: &str, _timeout: Duration) -> Result<String> {
            if self.slow.iter().any(|u| u == url) {
                tokio::time::sleep(Duration::from_secs(30)).await;
            }
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| ResultsError::HttpStatusError {
                    url: url.to_string(),
                    status: 404,
                })
        }
    }

    fn config(sources: Vec<SourceConfig>) -> TomlConfig {
        TomlConfig {
            sources,
            date: CanonicalDate::from_ymd(2025, 6, 17),
            ..TomlConfig::default()
        }
    }

    fn numbers_json(game: &str, session: &str, numbers: &str) -> String {
        serde_json::json!({"result": {"data": {"allContentstackWinningNumbers": {"nodes": [
            {"game_name": game, "draws": [
                {"draw_time": session, "winning_numbers": numbers, "draw_date": "2025-06-17"}
            ]}
        ]}}}})
        .to_string()
    }

    #[tokio::test]
    async fn test_failed_source_does_not_block_others() {
        let fetcher = MockFetcher::default()
            .with_page("http://a/numbers", &numbers_json("Numbers", "Midday", "1 2 3"));
        let pipeline = LiveResultsPipeline::new(
            fetcher,
            config(vec![
                SourceConfig::new("http://a/numbers", SourceFormat::Json),
                SourceConfig::new("http://a/missing", SourceFormat::Json),
            ]),
        )
        .unwrap();

        let blocks = pipeline.extract().await.unwrap();
        let results = pipeline.transform(blocks).await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results.numbers("NUMBERS", "Midday"), Some("1 2 3"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timed_out_source_is_omitted() {
        let fetcher = MockFetcher::default()
            .with_page("http://a/win4", &numbers_json("Win 4", "Evening", "1 2 3 4"))
            .with_page("http://a/slow", &numbers_json("Numbers", "Midday", "1 2 3"))
            .with_slow("http://a/slow");
        let mut slow = SourceConfig::new("http://a/slow", SourceFormat::Json);
        slow.timeout_seconds = Some(1);
        let pipeline = LiveResultsPipeline::new(
            fetcher,
            config(vec![SourceConfig::new("http://a/win4", SourceFormat::Json), slow]),
        )
        .unwrap();

        let blocks = pipeline.extract().await.unwrap();

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].game_name, "WIN 4");
    }

    #[tokio::test]
    async fn test_shape_error_is_isolated_per_source() {
        let fetcher = MockFetcher::default()
            .with_page("http://a/good", &numbers_json("Take 5", "Evening", "1 2 3 4 5"))
            .with_page("http://a/bad", r#"{"result": {}}"#);
        let pipeline = LiveResultsPipeline::new(
            fetcher,
            config(vec![
                SourceConfig::new("http://a/bad", SourceFormat::Json),
                SourceConfig::new("http://a/good", SourceFormat::Json),
            ]),
        )
        .unwrap();

        let blocks = pipeline.extract().await.unwrap();
        let results = pipeline.transform(blocks).await.unwrap();

        assert_eq!(results.numbers("TAKE 5", "Evening"), Some("1 2 3 4 5"));
    }

    #[tokio::test]
    async fn test_game_filter_keeps_only_that_game() {
        let page = serde_json::json!({"result": {"data": {"allContentstackWinningNumbers": {"nodes": [
            {"game_name": "Numbers", "draws": [{"draw_time": "Midday", "winning_numbers": "1 2 3", "draw_date": "2025-06-17"}]},
            {"game_name": "Win 4", "draws": [{"draw_time": "Midday", "winning_numbers": "1 2 3 4", "draw_date": "2025-06-17"}]}
        ]}}}})
        .to_string();
        let mut source = SourceConfig::new("http://a/all", SourceFormat::Json);
        source.game = Some("win4".to_string());

        let pipeline = LiveResultsPipeline::new(
            MockFetcher::default().with_page("http://a/all", &page),
            config(vec![source]),
        )
        .unwrap();

        let blocks = pipeline.extract().await.unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].game_name, "WIN 4");
    }

    #[tokio::test]
    async fn test_load_serializes_result_set() {
        let pipeline = LiveResultsPipeline::new(
            MockFetcher::default().with_page("http://a/n", &numbers_json("Numbers", "Midday", "1 2 3")),
            config(vec![SourceConfig::new("http://a/n", SourceFormat::Json)]),
        )
        .unwrap();

        let blocks = pipeline.extract().await.unwrap();
        let results = pipeline.transform(blocks).await.unwrap();
        let body = pipeline.load(&results).await.unwrap();

        assert_eq!(body, r#"{"NUMBERS":{"Midday":"1 2 3"}}"#);
    }
}
