//! Document adapter: turns an HTML page, a JSON value or an HTML page with an
//! embedded JSON blob into [`RawGameBlock`]s. Everything downstream is
//! representation-agnostic.

use crate::core::games::GameTable;
use crate::domain::model::{normalize_whitespace, RawGameBlock, RawSessionEntry};
use crate::utils::error::{Result, ResultsError};
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
    #[default]
    Html,
    Json,
    EmbeddedJson,
}

impl std::str::FromStr for SourceFormat {
    type Err = ResultsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html" => Ok(Self::Html),
            "json" => Ok(Self::Json),
            "embedded_json" | "embedded-json" => Ok(Self::EmbeddedJson),
            other => Err(ResultsError::InvalidConfigValueError {
                field: "format".to_string(),
                value: other.to_string(),
                reason: "Valid formats: html, json, embedded_json".to_string(),
            }),
        }
    }
}

/// CSS selectors for the HTML shape. The defaults match on class-name
/// substrings so CSS-module hash suffixes (`--T8aW5`) can change freely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HtmlLayout {
    pub game_block: String,
    pub game_name: String,
    pub block_date: String,
    pub session_block: String,
    pub session_label: String,
    pub session_date: String,
    pub numbers: String,
    pub number_token: String,
}

impl Default for HtmlLayout {
    fn default() -> Self {
        Self {
            game_block: r#"[class*="WinningNumbers-module--game-container"]"#.to_string(),
            game_name: "h3".to_string(),
            block_date: r#"[class*="WinningNumbers-module--date"]"#.to_string(),
            session_block: r#"[class*="DrawGame-module--container"]"#.to_string(),
            session_label: r#"[class*="DrawGame-module--label"]"#.to_string(),
            session_date: r#"[class*="DrawGame-module--date"]"#.to_string(),
            numbers: r#"[class*="DrawGame-module--numbers"]"#.to_string(),
            number_token: r#"[class*="DrawGame-module--ball"]"#.to_string(),
        }
    }
}

/// Navigation path and field names for the JSON shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonLayout {
    pub script_id: String,
    pub games_path: Vec<String>,
    pub game_name_field: String,
    pub game_date_field: String,
    pub draws_field: String,
    pub session_field: String,
    pub numbers_field: String,
    pub date_field: String,
}

impl Default for JsonLayout {
    fn default() -> Self {
        Self {
            script_id: "gatsby-initial-page-data".to_string(),
            games_path: ["result", "data", "allContentstackWinningNumbers", "nodes"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            game_name_field: "game_name".to_string(),
            game_date_field: "draw_date".to_string(),
            draws_field: "draws".to_string(),
            session_field: "draw_time".to_string(),
            numbers_field: "winning_numbers".to_string(),
            date_field: "draw_date".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum SourceDocument {
    Html(Html),
    Json(Value),
}

impl SourceDocument {
    pub fn html(markup: &str) -> Self {
        Self::Html(Html::parse_document(markup))
    }

    pub fn json(value: Value) -> Self {
        Self::Json(value)
    }

    /// Parses a fetched body according to its declared format.
    pub fn from_body(format: SourceFormat, body: &str, layout: &JsonLayout) -> Result<Self> {
        match format {
            SourceFormat::Html => Ok(Self::html(body)),
            SourceFormat::Json => serde_json::from_str(body)
                .map(Self::Json)
                .map_err(|e| ResultsError::shape("$", format!("invalid JSON body: {}", e))),
            SourceFormat::EmbeddedJson => embedded_json(body, &layout.script_id).map(Self::Json),
        }
    }
}

/// Pulls the JSON blob out of `<script id="...">` in a rendered page.
pub fn embedded_json(markup: &str, script_id: &str) -> Result<Value> {
    let html = Html::parse_document(markup);
    let selector = compile(&format!(r#"script[id="{}"]"#, script_id))?;
    let path = format!("script#{}", script_id);

    let script = html
        .select(&selector)
        .next()
        .ok_or_else(|| ResultsError::shape(&path, "could not find page data JSON blob"))?;
    let text: String = script.text().collect();

    serde_json::from_str(text.trim())
        .map_err(|e| ResultsError::shape(&path, format!("invalid JSON blob: {}", e)))
}

fn compile(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| ResultsError::SelectorError {
        selector: selector.to_string(),
        message: format!("{:?}", e),
    })
}

#[derive(Debug, Clone)]
struct HtmlSelectors {
    game_block: Selector,
    game_name: Selector,
    block_date: Selector,
    session_block: Selector,
    session_label: Selector,
    session_date: Selector,
    numbers: Selector,
    number_token: Selector,
}

impl HtmlSelectors {
    fn compile(layout: &HtmlLayout) -> Result<Self> {
        Ok(Self {
            game_block: compile(&layout.game_block)?,
            game_name: compile(&layout.game_name)?,
            block_date: compile(&layout.block_date)?,
            session_block: compile(&layout.session_block)?,
            session_label: compile(&layout.session_label)?,
            session_date: compile(&layout.session_date)?,
            numbers: compile(&layout.numbers)?,
            number_token: compile(&layout.number_token)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct DocumentAdapter {
    selectors: HtmlSelectors,
}

impl DocumentAdapter {
    pub fn new(layout: &HtmlLayout) -> Result<Self> {
        Ok(Self {
            selectors: HtmlSelectors::compile(layout)?,
        })
    }

    /// Game blocks for every recognized game in `document`. Finding none is
    /// not an error; a JSON document without `json.games_path` is.
    pub fn adapt(
        &self,
        document: &SourceDocument,
        json: &JsonLayout,
        games: &GameTable,
    ) -> Result<Vec<RawGameBlock>> {
        match document {
            SourceDocument::Html(html) => Ok(self.adapt_html(html, games)),
            SourceDocument::Json(value) => adapt_json(value, json, games),
        }
    }

    fn adapt_html(&self, html: &Html, games: &GameTable) -> Vec<RawGameBlock> {
        html.select(&self.selectors.game_block)
            .filter_map(|block| self.html_block(block, games))
            .collect()
    }

    fn html_block(&self, block: ElementRef, games: &GameTable) -> Option<RawGameBlock> {
        let s = &self.selectors;
        let raw_name = first_text(block, &s.game_name)?;
        let Some(game_name) = games.resolve(&raw_name) else {
            tracing::debug!("Skipping unrecognized game block: {}", raw_name);
            return None;
        };

        let mut sessions: Vec<RawSessionEntry> = block
            .select(&s.session_block)
            .map(|session| RawSessionEntry {
                label: first_text(session, &s.session_label).unwrap_or_default(),
                numbers_text: self.numbers_text(session),
                date_text: first_text(session, &s.session_date),
            })
            .collect();

        // 單場次遊戲：號碼直接掛在遊戲區塊下，沒有場次標籤
        if sessions.is_empty() {
            let numbers_text = self.numbers_text(block);
            if !numbers_text.is_empty() {
                sessions.push(RawSessionEntry {
                    label: String::new(),
                    numbers_text,
                    date_text: first_text(block, &s.session_date),
                });
            }
        }

        Some(RawGameBlock {
            game_name,
            sessions,
            source_date_text: first_text(block, &s.block_date),
        })
    }

    /// Numbers are either one text node or one node per ball; both come out
    /// space-separated.
    fn numbers_text(&self, scope: ElementRef) -> String {
        match scope.select(&self.selectors.numbers).next() {
            Some(container) => join_tokens(container.text()),
            None => join_tokens(
                scope
                    .select(&self.selectors.number_token)
                    .flat_map(|token| token.text()),
            ),
        }
    }
}

fn join_tokens<'a>(tokens: impl Iterator<Item = &'a str>) -> String {
    normalize_whitespace(&tokens.collect::<Vec<_>>().join(" "))
}

fn first_text(scope: ElementRef, selector: &Selector) -> Option<String> {
    scope
        .select(selector)
        .next()
        .map(|element| join_tokens(element.text()))
        .filter(|text| !text.is_empty())
}

fn adapt_json(value: &Value, layout: &JsonLayout, games: &GameTable) -> Result<Vec<RawGameBlock>> {
    let nodes = navigate(value, &layout.games_path)?;
    let items = nodes.as_array().ok_or_else(|| {
        ResultsError::shape(layout.games_path.join("."), "expected an array of games")
    })?;

    Ok(items
        .iter()
        .filter_map(|game| json_block(game, layout, games))
        .collect())
}

fn navigate<'a>(value: &'a Value, path: &[String]) -> Result<&'a Value> {
    let mut current = value;
    for (depth, segment) in path.iter().enumerate() {
        let next = match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        };
        current = next.ok_or_else(|| {
            ResultsError::shape(
                path[..=depth].join("."),
                format!("missing segment '{}'", segment),
            )
        })?;
    }
    Ok(current)
}

fn json_block(game: &Value, layout: &JsonLayout, games: &GameTable) -> Option<RawGameBlock> {
    let raw_name = game.get(&layout.game_name_field)?.as_str()?;
    let Some(game_name) = games.resolve(raw_name) else {
        tracing::debug!("Skipping unrecognized game: {}", raw_name);
        return None;
    };

    let sessions = game
        .get(&layout.draws_field)
        .and_then(Value::as_array)
        .map(|draws| {
            draws
                .iter()
                .map(|draw| RawSessionEntry {
                    label: json_text(draw.get(&layout.session_field)).unwrap_or_default(),
                    numbers_text: json_text(draw.get(&layout.numbers_field)).unwrap_or_default(),
                    date_text: json_text(draw.get(&layout.date_field)),
                })
                .collect()
        })
        .unwrap_or_default();

    Some(RawGameBlock {
        game_name,
        sessions,
        source_date_text: json_text(game.get(&layout.game_date_field)),
    })
}

/// Strings as-is, numbers printed, arrays joined with single spaces.
fn json_text(value: Option<&Value>) -> Option<String> {
    let text = match value? {
        Value::String(s) => normalize_whitespace(s),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => normalize_whitespace(
            &items
                .iter()
                .filter_map(|item| json_text(Some(item)))
                .collect::<Vec<_>>()
                .join(" "),
        ),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}
