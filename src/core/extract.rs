use crate::core::adapter::{DocumentAdapter, HtmlLayout, JsonLayout, SourceDocument};
use crate::core::aggregator::ResultAggregator;
use crate::core::assembler::assemble;
use crate::core::games::GameTable;
use crate::domain::model::{CanonicalDate, DrawRecord, RawGameBlock, ResultSet};
use crate::utils::error::Result;

/// Adapter + cadence table + aggregation. Pure: the only notion of "today" is
/// the date passed in.
#[derive(Debug, Clone)]
pub struct Extractor {
    adapter: DocumentAdapter,
    json: JsonLayout,
    games: GameTable,
}

impl Extractor {
    pub fn new(html: &HtmlLayout, json: JsonLayout, games: GameTable) -> Result<Self> {
        Ok(Self {
            adapter: DocumentAdapter::new(html)?,
            json,
            games,
        })
    }

    /// Built-in New York Lottery layout and games.
    pub fn new_york() -> Result<Self> {
        Self::new(&HtmlLayout::default(), JsonLayout::default(), GameTable::new_york())
    }

    pub fn json_layout(&self) -> &JsonLayout {
        &self.json
    }

    pub fn games(&self) -> &GameTable {
        &self.games
    }

    pub fn adapt(&self, document: &SourceDocument) -> Result<Vec<RawGameBlock>> {
        self.adapt_with(document, &self.json)
    }

    pub fn adapt_with(
        &self,
        document: &SourceDocument,
        json: &JsonLayout,
    ) -> Result<Vec<RawGameBlock>> {
        self.adapter.adapt(document, json, &self.games)
    }

    pub fn assemble(&self, blocks: &[RawGameBlock], today: CanonicalDate) -> Vec<DrawRecord> {
        blocks
            .iter()
            .flat_map(|block| assemble(block, today, &self.games))
            .collect()
    }

    /// Folds already-adapted blocks into today's result set.
    pub fn reconcile(&self, blocks: &[RawGameBlock], today: CanonicalDate) -> ResultSet {
        if blocks.is_empty() {
            tracing::warn!("No game blocks found; the source page structure may have changed");
        }
        let mut aggregator = ResultAggregator::new();
        aggregator.fold_all(self.assemble(blocks, today));
        aggregator.finish()
    }

    pub fn extract(&self, document: &SourceDocument, today: CanonicalDate) -> Result<ResultSet> {
        let blocks = self.adapt(document)?;
        Ok(self.reconcile(&blocks, today))
    }
}

/// Extracts today's results from `document` with the built-in layout.
pub fn extract(document: &SourceDocument, today: CanonicalDate) -> Result<ResultSet> {
    Extractor::new_york()?.extract(document, today)
}
