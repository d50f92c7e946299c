use crate::core::dates;
use crate::core::games::{Cadence, GameSpec, GameTable, MissingLabelPolicy};
use crate::domain::model::{CanonicalDate, DrawRecord, RawGameBlock, RawSessionEntry};

/// Applies the game's cadence to one block and keeps only today's draws.
///
/// Single-draw games report at most one record, keyed by the default
/// session: the first entry in page order that survives filtering. Dual-draw
/// games key each entry by its label.
pub fn assemble(block: &RawGameBlock, today: CanonicalDate, games: &GameTable) -> Vec<DrawRecord> {
    let spec = games.spec(&block.game_name);

    match spec.cadence {
        Cadence::Single => block
            .sessions
            .iter()
            .find_map(|entry| build_record(block, entry, &spec.default_session, today))
            .into_iter()
            .collect(),
        Cadence::Dual => block
            .sessions
            .iter()
            .filter_map(|entry| {
                let session = dual_session_key(&spec, entry)?;
                build_record(block, entry, &session, today)
            })
            .collect(),
    }
}

fn dual_session_key(spec: &GameSpec, entry: &RawSessionEntry) -> Option<String> {
    if let Some(key) = spec.session_key(&entry.label) {
        return Some(key);
    }
    match spec.missing_label {
        MissingLabelPolicy::Default => Some(spec.default_session.clone()),
        MissingLabelPolicy::Skip => {
            tracing::debug!("{}: dropping entry without session label", spec.name);
            None
        }
    }
}

/// Entry date, else block date, else a date printed inside the label.
fn effective_date(block: &RawGameBlock, entry: &RawSessionEntry) -> Option<CanonicalDate> {
    match entry.date_text.as_deref().or(block.source_date_text.as_deref()) {
        Some(text) => dates::parse(text),
        None => dates::parse(&entry.label),
    }
}

fn build_record(
    block: &RawGameBlock,
    entry: &RawSessionEntry,
    session: &str,
    today: CanonicalDate,
) -> Option<DrawRecord> {
    let Some(date) = effective_date(block, entry) else {
        tracing::debug!("{} {}: no recognizable draw date", block.game_name, session);
        return None;
    };
    let record = DrawRecord::new(&block.game_name, session, &entry.numbers_text, date, today);
    if record.is_none() {
        tracing::debug!(
            "{} {}: skipped (drawn {}, numbers '{}')",
            block.game_name,
            session,
            date,
            entry.numbers_text.trim()
        );
    }
    record
}
