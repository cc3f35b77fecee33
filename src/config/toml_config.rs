use crate::core::aggregator::{EXPIRY_WINDOW_DAYS, MAX_WINDOW_DAYS};
use crate::core::ingest::DEFAULT_SOON_DAYS;
use crate::core::report::MAX_ITEMS_PER_MONTH;
use crate::utils::error::{AlertError, Result};
use crate::utils::validation;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "inventory-alert.toml";
pub const DEFAULT_DATA_PATH: &str = "data/processed/output.jsonl";
pub const DEFAULT_CSV_PATH: &str = "data/uploads/Grocery_Inventory_and_Sales_Dataset.csv";
pub const DEFAULT_DISPATCH_ENDPOINT: &str = "https://backend.omnidim.io/api/v1/calls/dispatch";
pub const DEFAULT_PREVIEW_CHARS: usize = 500;
pub const API_KEY_ENV: &str = "OMNI_API_KEY";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    pub inventory: InventoryConfig,
    pub report: ReportConfig,
    pub dispatch: DispatchConfig,
    pub ingest: IngestConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    pub data_path: String,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            data_path: DEFAULT_DATA_PATH.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub window_days: i64,
    pub max_items_per_month: usize,
    pub preview_chars: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            window_days: EXPIRY_WINDOW_DAYS,
            max_items_per_month: MAX_ITEMS_PER_MONTH,
            preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }
}

/// Voice-call service settings. `api_key` is a bearer credential.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    pub endpoint: String,
    pub api_key: String,
    pub agent_id: u64,
    pub to_number: String,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_DISPATCH_ENDPOINT.to_string(),
            api_key: String::new(),
            agent_id: 0,
            to_number: String::new(),
        }
    }
}

impl std::fmt::Debug for DispatchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"***")
            .field("agent_id", &self.agent_id)
            .field("to_number", &self.to_number)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    pub csv_path: String,
    /// Defaults to `inventory.data_path`.
    pub output_path: Option<String>,
    pub soon_days: i64,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            csv_path: DEFAULT_CSV_PATH.to_string(),
            output_path: None,
            soon_days: DEFAULT_SOON_DAYS,
        }
    }
}

impl AlertConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        let mut config: Self =
            toml::from_str(&processed_content).map_err(|e| AlertError::ConfigValidationError {
                field: "toml_parsing".to_string(),
                message: format!("TOML parsing error: {}", e),
            })?;
        config.apply_env_fallbacks();
        Ok(config)
    }

    /// Reads `path` when it exists, otherwise starts from the built-in defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            tracing::debug!(
                "Config file {} not found, using defaults",
                path.as_ref().display()
            );
            let mut config = Self::default();
            config.apply_env_fallbacks();
            Ok(config)
        }
    }

    /// 替換環境變數 (例如 ${OMNI_API_KEY})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AlertError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    fn apply_env_fallbacks(&mut self) {
        if self.dispatch.api_key.trim().is_empty() || is_unresolved(&self.dispatch.api_key) {
            if let Ok(key) = std::env::var(API_KEY_ENV) {
                self.dispatch.api_key = key;
            }
        }
    }

    pub fn ingest_output_path(&self) -> &str {
        self.ingest
            .output_path
            .as_deref()
            .unwrap_or(&self.inventory.data_path)
    }

    /// Checks everything needed to load inventory and build the narration.
    pub fn validate_report(&self) -> Result<()> {
        validation::validate_path("inventory.data_path", &self.inventory.data_path)?;
        if !(0..=MAX_WINDOW_DAYS).contains(&self.report.window_days) {
            return Err(AlertError::InvalidConfigValueError {
                field: "report.window_days".to_string(),
                value: self.report.window_days.to_string(),
                reason: format!("Window must be between 0 and {} days", MAX_WINDOW_DAYS),
            });
        }
        validation::validate_positive_number(
            "report.max_items_per_month",
            self.report.max_items_per_month,
            1,
        )?;
        validation::validate_positive_number("report.preview_chars", self.report.preview_chars, 1)?;
        Ok(())
    }

    pub fn validate_dispatch(&self) -> Result<()> {
        validation::validate_url("dispatch.endpoint", &self.dispatch.endpoint)?;
        if is_unresolved(&self.dispatch.api_key) {
            return Err(AlertError::MissingConfigError {
                field: "dispatch.api_key".to_string(),
            });
        }
        validation::validate_non_empty_string("dispatch.api_key", &self.dispatch.api_key)?;
        validation::validate_phone_number("dispatch.to_number", &self.dispatch.to_number)?;
        Ok(())
    }

    pub fn validate_ingest(&self) -> Result<()> {
        validation::validate_path("ingest.csv_path", &self.ingest.csv_path)?;
        validation::validate_path("ingest.output_path", self.ingest_output_path())?;
        if self.ingest.soon_days < 0 {
            return Err(AlertError::InvalidConfigValueError {
                field: "ingest.soon_days".to_string(),
                value: self.ingest.soon_days.to_string(),
                reason: "Value cannot be negative".to_string(),
            });
        }
        Ok(())
    }
}

/// A `${VAR}` placeholder whose variable was not set.
fn is_unresolved(value: &str) -> bool {
    value.starts_with("${") && value.ends_with('}')
}
