use crate::error::ConfigError;
use core_types::NaStrategy;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub data: DataSettings,
    pub returns: ReturnsColumns,
    pub constituents: ConstituentColumns,
    pub logging: LoggingSettings,
}

/// Where the HTTP server binds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

/// The backing workbook and how it is loaded.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub excel_path: PathBuf,
    pub sheet_returns: String,
    pub sheet_constituents: String,
    /// Load the workbook at startup instead of on the first request.
    pub preload: bool,
    /// Accept blank cells in the validated numeric columns as missing values.
    /// Unparseable text is rejected either way.
    pub allow_missing_values: bool,
    /// Strategy applied when a request does not pass `na_strategy`.
    pub default_na_strategy: NaStrategy,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            excel_path: PathBuf::from("app/data/Returns_and_Constituent_Data.xlsx"),
            sheet_returns: "Returns".to_string(),
            sheet_constituents: "IndexConstituents".to_string(),
            preload: false,
            allow_missing_values: false,
            default_na_strategy: NaStrategy::Keep,
        }
    }
}

/// Column names of the returns sheet.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReturnsColumns {
    pub date_col: String,
    pub fund_col: String,
    pub benchmark_col: String,
    /// Trailing windows, in calendar days, used when a request gives none.
    pub default_windows: Vec<u32>,
}

impl Default for ReturnsColumns {
    fn default() -> Self {
        Self {
            date_col: "ReturnDate".to_string(),
            fund_col: "FundReturn".to_string(),
            benchmark_col: "BenchmarkReturn".to_string(),
            default_windows: vec![30, 90, 180],
        }
    }
}

/// Column names of the index constituents sheet.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConstituentColumns {
    pub date_col: String,
    pub weight_col: String,
    pub index_col: String,
    /// Default group-by column for exposure differences.
    pub region_col: String,
}

impl Default for ConstituentColumns {
    fn default() -> Self {
        Self {
            date_col: "Date".to_string(),
            weight_col: "Weight".to_string(),
            index_col: "Index".to_string(),
            region_col: "Antipodes Region".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// An `EnvFilter` directive; `RUST_LOG` takes precedence when set.
    pub level: String,
    /// When set, JSON logs are also written to a daily rolling file in this directory.
    pub directory: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}

impl Settings {
    /// Rejects settings that would only fail later, on the first request.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let named = [
            ("data.sheet_returns", &self.data.sheet_returns),
            ("data.sheet_constituents", &self.data.sheet_constituents),
            ("returns.date_col", &self.returns.date_col),
            ("returns.fund_col", &self.returns.fund_col),
            ("returns.benchmark_col", &self.returns.benchmark_col),
            ("constituents.date_col", &self.constituents.date_col),
            ("constituents.weight_col", &self.constituents.weight_col),
            ("constituents.index_col", &self.constituents.index_col),
            ("constituents.region_col", &self.constituents.region_col),
        ];
        if let Some((key, _)) = named.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(ConfigError::ValidationError(format!("'{}' must not be empty", key)));
        }

        if self.data.excel_path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "'data.excel_path' must not be empty".to_string(),
            ));
        }

        if self.returns.default_windows.is_empty() {
            return Err(ConfigError::ValidationError(
                "'returns.default_windows' must contain at least one window".to_string(),
            ));
        }
        if self.returns.default_windows.contains(&0) {
            return Err(ConfigError::ValidationError(
                "'returns.default_windows' must not contain a zero-day window".to_string(),
            ));
        }

        Ok(())
    }
}
