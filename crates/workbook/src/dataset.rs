use crate::error::WorkbookError;
use crate::reader;
use crate::validate::{ColumnRule, normalize_and_validate};
use configuration::Settings;
use core_types::Table;
use std::path::PathBuf;

/// The two validated tables the analytics endpoints read from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub returns: Table,
    pub constituents: Table,
}

/// Something that can produce a `Dataset`. Called from the blocking thread pool.
pub trait DatasetSource: Send + Sync {
    fn load(&self) -> Result<Dataset, WorkbookError>;

    /// Human-readable origin, used in log lines.
    fn describe(&self) -> String;
}

/// Reads both sheets from the configured workbook and validates the configured columns.
#[derive(Debug, Clone)]
pub struct WorkbookSource {
    pub path: PathBuf,
    pub returns_sheet: String,
    pub returns_rules: Vec<ColumnRule>,
    pub constituents_sheet: String,
    pub constituents_rules: Vec<ColumnRule>,
}

impl WorkbookSource {
    pub fn from_settings(settings: &Settings) -> Self {
        let allow_missing = settings.data.allow_missing_values;
        let returns = &settings.returns;
        let constituents = &settings.constituents;

        Self {
            path: settings.data.excel_path.clone(),
            returns_sheet: settings.data.sheet_returns.clone(),
            returns_rules: vec![
                ColumnRule::date(&returns.date_col),
                ColumnRule::numeric(&returns.fund_col).allow_missing(allow_missing),
                ColumnRule::numeric(&returns.benchmark_col).allow_missing(allow_missing),
            ],
            constituents_sheet: settings.data.sheet_constituents.clone(),
            constituents_rules: vec![
                ColumnRule::date(&constituents.date_col),
                ColumnRule::numeric(&constituents.weight_col).allow_missing(allow_missing),
            ],
        }
    }
}

impl DatasetSource for WorkbookSource {
    fn load(&self) -> Result<Dataset, WorkbookError> {
        let mut workbook = reader::open(&self.path)?;

        let returns = reader::read_sheet(&mut workbook, &self.path, &self.returns_sheet)?;
        let constituents = reader::read_sheet(&mut workbook, &self.path, &self.constituents_sheet)?;

        Ok(Dataset {
            returns: normalize_and_validate(returns, &self.returns_sheet, &self.returns_rules)?,
            constituents: normalize_and_validate(
                constituents,
                &self.constituents_sheet,
                &self.constituents_rules,
            )?,
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Serves a dataset that is already in memory.
#[derive(Debug, Clone)]
pub struct InMemorySource(pub Dataset);

impl DatasetSource for InMemorySource {
    fn load(&self) -> Result<Dataset, WorkbookError> {
        Ok(self.0.clone())
    }

    fn describe(&self) -> String {
        "in-memory dataset".to_string()
    }
}

/// Loads and validates the dataset described by `settings`, bypassing any cache.
pub fn load_dataset(settings: &Settings) -> Result<Dataset, WorkbookError> {
    WorkbookSource::from_settings(settings).load()
}
