use chrono::{Datelike, NaiveDate};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// 來源頁面中單一遊戲的區塊
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawGameBlock {
    pub game_name: String,
    pub sessions: Vec<RawSessionEntry>,
    pub source_date_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawSessionEntry {
    pub label: String,
    pub numbers_text: String,
    /// 優先於區塊層級的日期
    pub date_text: Option<String>,
}

impl RawSessionEntry {
    pub fn new(label: impl Into<String>, numbers_text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            numbers_text: numbers_text.into(),
            date_text: None,
        }
    }

    pub fn with_date(mut self, date_text: impl Into<String>) -> Self {
        self.date_text = Some(date_text.into());
        self
    }
}

/// Calendar date in the reference time zone, no time-of-day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CanonicalDate(NaiveDate);

impl CanonicalDate {
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }
}

impl From<NaiveDate> for CanonicalDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for CanonicalDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for CanonicalDate {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map(Self)
    }
}

impl Serialize for CanonicalDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CanonicalDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A draw that happened today. Only [`DrawRecord::new`] builds one, and it
/// refuses dates other than `today` and empty numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawRecord {
    game: String,
    session: String,
    numbers: String,
    date: CanonicalDate,
}

impl DrawRecord {
    pub fn new(
        game: impl Into<String>,
        session: impl Into<String>,
        numbers: &str,
        date: CanonicalDate,
        today: CanonicalDate,
    ) -> Option<Self> {
        let numbers = normalize_whitespace(numbers);
        if date != today || numbers.is_empty() {
            return None;
        }
        Some(Self {
            game: game.into(),
            session: session.into(),
            numbers,
            date,
        })
    }

    pub fn game(&self) -> &str {
        &self.game
    }

    pub fn session(&self) -> &str {
        &self.session
    }

    pub fn numbers(&self) -> &str {
        &self.numbers
    }

    pub fn date(&self) -> CanonicalDate {
        self.date
    }
}

/// game → session → numbers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultSet {
    games: IndexMap<String, IndexMap<String, String>>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// Number of games with at least one session.
    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn game(&self, game: &str) -> Option<&IndexMap<String, String>> {
        self.games.get(game)
    }

    pub fn numbers(&self, game: &str, session: &str) -> Option<&str> {
        self.games
            .get(game)
            .and_then(|sessions| sessions.get(session))
            .map(String::as_str)
    }

    pub fn games(&self) -> impl Iterator<Item = (&str, &IndexMap<String, String>)> {
        self.games.iter().map(|(game, sessions)| (game.as_str(), sessions))
    }

    /// Returns the previous numbers stored under the same key, if any.
    pub(crate) fn insert(&mut self, game: &str, session: &str, numbers: &str) -> Option<String> {
        self.games
            .entry(game.to_string())
            .or_default()
            .insert(session.to_string(), numbers.to_string())
    }
}

/// Trims and collapses every run of whitespace into a single space.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
