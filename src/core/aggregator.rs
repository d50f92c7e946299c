use crate::domain::model::{DrawRecord, ResultSet};

/// Folds draw records into one [`ResultSet`]. Last write wins per
/// (game, session).
#[derive(Debug, Default)]
pub struct ResultAggregator {
    results: ResultSet,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fold(&mut self, record: DrawRecord) {
        if let Some(previous) = self
            .results
            .insert(record.game(), record.session(), record.numbers())
        {
            if previous != record.numbers() {
                tracing::debug!(
                    "{} {}: '{}' replaced by '{}'",
                    record.game(),
                    record.session(),
                    previous,
                    record.numbers()
                );
            }
        }
    }

    pub fn fold_all(&mut self, records: impl IntoIterator<Item = DrawRecord>) {
        for record in records {
            self.fold(record);
        }
    }

    pub fn finish(self) -> ResultSet {
        self.results
    }
}
