use crate::domain::model::normalize_whitespace;
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_list, validate_non_empty_string, Validate};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_SESSION: &str = "Evening";
pub const MIDDAY: &str = "Midday";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cadence {
    /// One nightly draw, reported under the default session key.
    Single,
    /// Midday/Evening pair, keyed by each entry's own label.
    Dual,
}

/// What to do with a dual-draw entry whose label is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingLabelPolicy {
    #[default]
    Default,
    Skip,
}

/// `[[games]]` 設定項
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    pub cadence: Cadence,
    pub default_session: Option<String>,
    pub sessions: Option<Vec<String>>,
    pub missing_label: Option<MissingLabelPolicy>,
}

impl GameConfig {
    pub fn single(name: &str) -> Self {
        Self {
            name: name.to_string(),
            aliases: Vec::new(),
            cadence: Cadence::Single,
            default_session: None,
            sessions: None,
            missing_label: None,
        }
    }

    pub fn dual(name: &str) -> Self {
        Self {
            cadence: Cadence::Dual,
            ..Self::single(name)
        }
    }

    pub fn with_aliases(mut self, aliases: &[&str]) -> Self {
        self.aliases = aliases.iter().map(|a| a.to_string()).collect();
        self
    }
}

impl Validate for GameConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("games.name", &self.name)?;
        if let Some(session) = &self.default_session {
            validate_non_empty_string("games.default_session", session)?;
        }
        if let Some(sessions) = &self.sessions {
            validate_non_empty_list("games.sessions", sessions)?;
        }
        Ok(())
    }
}

/// Resolved cadence rules for one game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSpec {
    pub name: String,
    pub cadence: Cadence,
    pub default_session: String,
    pub sessions: Vec<String>,
    pub missing_label: MissingLabelPolicy,
}

impl GameSpec {
    fn unlisted(name: &str) -> Self {
        Self {
            name: name.to_string(),
            cadence: Cadence::Single,
            default_session: DEFAULT_SESSION.to_string(),
            sessions: vec![DEFAULT_SESSION.to_string()],
            missing_label: MissingLabelPolicy::Default,
        }
    }

    /// Maps a raw label onto one of the known session names when the label
    /// contains it ("Midday Tue 06/17/25" → "Midday"). Otherwise the cleaned
    /// label itself.
    pub fn session_key(&self, label: &str) -> Option<String> {
        let label = normalize_whitespace(label);
        if label.is_empty() {
            return None;
        }
        let lowered = label.to_lowercase();
        let known = self
            .sessions
            .iter()
            .find(|session| lowered.contains(&session.to_lowercase()));
        Some(known.cloned().unwrap_or(label))
    }
}

/// Game name → cadence lookup, plus alias resolution.
#[derive(Debug, Clone)]
pub struct GameTable {
    games: IndexMap<String, GameSpec>,
    aliases: HashMap<String, String>,
    include_unlisted: bool,
}

impl GameTable {
    pub fn from_configs(configs: &[GameConfig], include_unlisted: bool) -> Self {
        let mut games = IndexMap::new();
        let mut aliases = HashMap::new();

        for config in configs {
            let name = canonical_game_name(&config.name);
            let default_session = config
                .default_session
                .clone()
                .unwrap_or_else(|| DEFAULT_SESSION.to_string());
            let sessions = config.sessions.clone().unwrap_or_else(|| match config.cadence {
                Cadence::Dual => vec![MIDDAY.to_string(), DEFAULT_SESSION.to_string()],
                Cadence::Single => vec![default_session.clone()],
            });

            for alias in &config.aliases {
                aliases.insert(canonical_game_name(alias), name.clone());
            }
            games.insert(
                name.clone(),
                GameSpec {
                    name,
                    cadence: config.cadence,
                    default_session,
                    sessions,
                    missing_label: config.missing_label.unwrap_or_default(),
                },
            );
        }

        Self {
            games,
            aliases,
            include_unlisted,
        }
    }

    /// The New York Lottery draw games.
    pub fn new_york() -> Self {
        Self::from_configs(&default_games(), false)
    }

    /// Canonical key for a game name as printed on the page, or `None` when the
    /// game is not recognized and unlisted games are excluded.
    pub fn resolve(&self, raw_name: &str) -> Option<String> {
        let name = canonical_game_name(raw_name);
        if name.is_empty() {
            return None;
        }
        if self.games.contains_key(&name) {
            return Some(name);
        }
        if let Some(target) = self.aliases.get(&name) {
            return Some(target.clone());
        }
        self.include_unlisted.then_some(name)
    }

    pub fn spec(&self, game: &str) -> GameSpec {
        self.games
            .get(game)
            .cloned()
            .unwrap_or_else(|| GameSpec::unlisted(game))
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

impl Default for GameTable {
    fn default() -> Self {
        Self::new_york()
    }
}

pub fn canonical_game_name(raw: &str) -> String {
    normalize_whitespace(raw).to_uppercase()
}

pub fn default_games() -> Vec<GameConfig> {
    vec![
        GameConfig::dual("NUMBERS"),
        GameConfig::dual("WIN 4").with_aliases(&["WIN4"]),
        GameConfig::dual("TAKE 5").with_aliases(&["TAKE5"]),
        GameConfig::single("PICK 10").with_aliases(&["PICK10"]),
        GameConfig::single("LOTTO").with_aliases(&["NEW YORK LOTTO", "NY LOTTO"]),
        GameConfig::single("CASH4LIFE").with_aliases(&["CASH 4 LIFE"]),
        GameConfig::single("POWERBALL"),
        GameConfig::single("MEGA MILLIONS").with_aliases(&["MEGAMILLIONS"]),
    ]
}
