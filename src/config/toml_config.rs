use crate::core::adapter::{DocumentAdapter, HtmlLayout, JsonLayout, SourceFormat};
use crate::core::dates::DEFAULT_TIME_ZONE;
use crate::core::fetcher::DEFAULT_USER_AGENT;
use crate::core::games::{default_games, GameConfig, GameTable};
use crate::core::{CanonicalDate, ConfigProvider};
use crate::utils::error::{Result, ResultsError};
use crate::utils::validation::{
    validate_non_empty_list, validate_range, validate_time_zone, validate_url, Validate,
};
use chrono_tz::Tz;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

pub const NY_LOTTERY_URL: &str = "https://nylottery.ny.gov/";
pub const MAX_TIMEOUT_SECONDS: u64 = 120;

static RE_ENV_VAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").unwrap());

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default = "default_sources")]
    pub sources: Vec<SourceConfig>,
    #[serde(default = "default_games")]
    pub games: Vec<GameConfig>,
    /// 命令列 `--date` 覆蓋，不從檔案讀取
    #[serde(skip)]
    pub date: Option<CanonicalDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub name: String,
    pub time_zone: String,
    pub timeout_seconds: u64,
    pub user_agent: String,
    pub pretty: bool,
    pub include_unlisted_games: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "ny-lottery-live".to_string(),
            time_zone: DEFAULT_TIME_ZONE.name().to_string(),
            timeout_seconds: 15,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            pretty: false,
            include_unlisted_games: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub html: HtmlLayout,
    pub json: JsonLayout,
}

/// One page to fetch. `game` restricts the page to a single game, for
/// per-game result pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub name: Option<String>,
    pub url: String,
    #[serde(default)]
    pub format: SourceFormat,
    pub game: Option<String>,
    pub json_path: Option<Vec<String>>,
    pub script_id: Option<String>,
    pub timeout_seconds: Option<u64>,
}

impl SourceConfig {
    pub fn new(url: &str, format: SourceFormat) -> Self {
        Self {
            name: None,
            url: url.to_string(),
            format,
            game: None,
            json_path: None,
            script_id: None,
            timeout_seconds: None,
        }
    }

    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.url)
    }

    /// The global JSON layout with this source's overrides applied.
    pub fn json_layout(&self, base: &JsonLayout) -> JsonLayout {
        let mut layout = base.clone();
        if let Some(path) = &self.json_path {
            layout.games_path = path.clone();
        }
        if let Some(script_id) = &self.script_id {
            layout.script_id = script_id.clone();
        }
        layout
    }
}

fn default_sources() -> Vec<SourceConfig> {
    vec![SourceConfig {
        name: Some("ny-lottery-home".to_string()),
        ..SourceConfig::new(NY_LOTTERY_URL, SourceFormat::EmbeddedJson)
    }]
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            service: ServiceConfig::default(),
            layout: LayoutConfig::default(),
            sources: default_sources(),
            games: default_games(),
            date: None,
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ResultsError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ResultsError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${RESULTS_URL})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> String {
        RE_ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_time_zone("service.time_zone", &self.service.time_zone)?;
        validate_range(
            "service.timeout_seconds",
            self.service.timeout_seconds,
            1,
            MAX_TIMEOUT_SECONDS,
        )?;

        validate_non_empty_list("sources", &self.sources)?;
        for source in &self.sources {
            validate_url("sources.url", &source.url)?;
            if let Some(timeout) = source.timeout_seconds {
                validate_range("sources.timeout_seconds", timeout, 1, MAX_TIMEOUT_SECONDS)?;
            }
            if source.format != SourceFormat::Html {
                let layout = source.json_layout(&self.layout.json);
                validate_non_empty_list("sources.json_path", &layout.games_path)?;
            }
        }

        validate_non_empty_list("games", &self.games)?;
        for game in &self.games {
            game.validate()?;
        }

        // 選擇器能否編譯
        DocumentAdapter::new(&self.layout.html)?;

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn sources(&self) -> &[SourceConfig] {
        &self.sources
    }

    fn time_zone(&self) -> Tz {
        self.service.time_zone.parse().unwrap_or(DEFAULT_TIME_ZONE)
    }

    fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.service.timeout_seconds)
    }

    fn source_timeout(&self, source: &SourceConfig) -> Duration {
        Duration::from_secs(source.timeout_seconds.unwrap_or(self.service.timeout_seconds))
    }

    fn fixed_date(&self) -> Option<CanonicalDate> {
        self.date
    }

    fn pretty_output(&self) -> bool {
        self.service.pretty
    }

    fn html_layout(&self) -> &HtmlLayout {
        &self.layout.html
    }

    fn json_layout(&self) -> &JsonLayout {
        &self.layout.json
    }

    fn game_table(&self) -> GameTable {
        GameTable::from_configs(&self.games, self.service.include_unlisted_games)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
