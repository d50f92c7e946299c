use lotto_live::core::aggregator::ResultAggregator;
use lotto_live::core::assembler::assemble;
use lotto_live::core::dates;
use lotto_live::core::games::{default_games, GameConfig, GameTable, MissingLabelPolicy};
use lotto_live::{
    extract, CanonicalDate, DrawRecord, Extractor, RawGameBlock, RawSessionEntry, SourceDocument,
};
use serde_json::json;

fn june_17() -> CanonicalDate {
    CanonicalDate::from_ymd(2025, 6, 17).unwrap()
}

fn nodes(games: serde_json::Value) -> SourceDocument {
    SourceDocument::json(json!({
        "result": {"data": {"allContentstackWinningNumbers": {"nodes": games}}}
    }))
}

#[test]
fn test_documents_without_game_blocks_give_empty_results() {
    let documents = [
        SourceDocument::html(""),
        SourceDocument::html("<html><body><div class=\"Footer\">Play responsibly</div></body></html>"),
        nodes(json!([])),
        nodes(json!([{"game_name": "Numbers", "draws": []}])),
    ];

    for document in &documents {
        let results = extract(document, june_17()).unwrap();
        assert!(results.is_empty());
    }
}

#[test]
fn test_only_todays_draws_survive() {
    let document = nodes(json!([
        {"game_name": "Numbers", "draws": [
            {"draw_time": "Midday", "winning_numbers": "1 2 3", "draw_date": "06/17/25"},
            {"draw_time": "Evening", "winning_numbers": "4 5 6", "draw_date": "06/18/25"}
        ]},
        {"game_name": "Win 4", "draws": [
            {"draw_time": "Midday", "winning_numbers": "1 2 3 4", "draw_date": "June 16, 2025"}
        ]},
        {"game_name": "Pick 10", "draw_date": "Jun 17, 2025", "draws": [
            {"draw_time": "", "winning_numbers": "1 2 3 4 5 6 7 8 9 10"}
        ]}
    ]));

    let extractor = Extractor::new_york().unwrap();
    let blocks = extractor.adapt(&document).unwrap();
    let records = extractor.assemble(&blocks, june_17());

    assert!(records.iter().all(|record| record.date() == june_17()));
    let keys: Vec<_> = records.iter().map(|r| (r.game(), r.session())).collect();
    assert_eq!(keys, vec![("NUMBERS", "Midday"), ("PICK 10", "Evening")]);
}

#[test]
fn test_extract_is_idempotent() {
    let document = SourceDocument::html(
        r#"<div class="WinningNumbers-module--game-container--x">
             <h3>Numbers</h3>
             <div class="DrawGame-module--container--y">
               <div class="DrawGame-module--label--z">Midday Tue 06/17/25</div>
               <div class="DrawGame-module--numbers--w">1 2 3</div>
             </div>
           </div>"#,
    );

    let first = extract(&document, june_17()).unwrap();
    let second = extract(&document, june_17()).unwrap();
    assert_eq!(first, second);
    assert!(!first.is_empty());
}

#[test]
fn test_last_write_wins_across_blocks() {
    let today = june_17();
    let mut aggregator = ResultAggregator::new();
    aggregator.fold(DrawRecord::new("NUMBERS", "Evening", "1 1 1", today, today).unwrap());
    aggregator.fold(DrawRecord::new("NUMBERS", "Evening", "2 2 2", today, today).unwrap());

    assert_eq!(aggregator.finish().numbers("NUMBERS", "Evening"), Some("2 2 2"));
}

#[test]
fn test_cadence_controls_session_keys() {
    let table = GameTable::new_york();
    let sessions = vec![
        RawSessionEntry::new("Midday", "1 2 3").with_date("06/17/25"),
        RawSessionEntry::new("Evening", "4 5 6").with_date("06/17/25"),
    ];

    let single = RawGameBlock {
        game_name: "CASH4LIFE".to_string(),
        sessions: sessions.clone(),
        source_date_text: None,
    };
    let dual = RawGameBlock {
        game_name: "NUMBERS".to_string(),
        sessions,
        source_date_text: None,
    };

    let single_sessions: Vec<_> = assemble(&single, june_17(), &table)
        .iter()
        .map(|r| r.session().to_string())
        .collect();
    let dual_sessions: Vec<_> = assemble(&dual, june_17(), &table)
        .iter()
        .map(|r| r.session().to_string())
        .collect();

    assert_eq!(single_sessions, vec!["Evening"]);
    assert_eq!(dual_sessions, vec!["Midday", "Evening"]);
}

#[test]
fn test_token_join_and_prejoined_numbers_agree() {
    let tokens = nodes(json!([
        {"game_name": "Numbers", "draws": [
            {"draw_time": "Midday", "winning_numbers": ["1", "2", "3"], "draw_date": "06/17/25"}
        ]}
    ]));
    let joined = nodes(json!([
        {"game_name": "Numbers", "draws": [
            {"draw_time": "Midday", "winning_numbers": "1 2 3", "draw_date": "06/17/25"}
        ]}
    ]));

    let from_tokens = extract(&tokens, june_17()).unwrap();
    let from_joined = extract(&joined, june_17()).unwrap();

    assert_eq!(from_tokens.numbers("NUMBERS", "Midday"), Some("1 2 3"));
    assert_eq!(from_tokens, from_joined);
}

#[test]
fn test_date_substring_matching() {
    assert!(dates::matches("Midday Tue 06/17/25", june_17()));
    assert!(!dates::matches("Midday Tue 06/18/25", june_17()));
}

#[test]
fn test_take5_end_to_end_scenario() {
    let block = RawGameBlock {
        game_name: "TAKE 5".to_string(),
        sessions: vec![RawSessionEntry::new("Midday", "04 09 15 22 30").with_date("06/17/25")],
        source_date_text: None,
    };

    let mut aggregator = ResultAggregator::new();
    aggregator.fold_all(assemble(&block, june_17(), &GameTable::new_york()));

    assert_eq!(
        serde_json::to_value(aggregator.finish()).unwrap(),
        json!({"TAKE 5": {"Midday": "04 09 15 22 30"}})
    );
}

#[test]
fn test_missing_label_policy_both_ways() {
    let document = nodes(json!([
        {"game_name": "Win 4", "draws": [
            {"winning_numbers": "7 7 7 7", "draw_date": "06/17/25"}
        ]}
    ]));

    let defaulted = extract(&document, june_17()).unwrap();
    assert_eq!(defaulted.numbers("WIN 4", "Evening"), Some("7 7 7 7"));

    let games: Vec<GameConfig> = default_games()
        .into_iter()
        .map(|game| GameConfig {
            missing_label: Some(MissingLabelPolicy::Skip),
            ..game
        })
        .collect();
    let strict = Extractor::new(
        &Default::default(),
        Default::default(),
        GameTable::from_configs(&games, false),
    )
    .unwrap();
    assert!(strict.extract(&document, june_17()).unwrap().is_empty());
}
