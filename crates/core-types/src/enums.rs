use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Policy for missing values in a numeric column, applied before aggregation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NaStrategy {
    /// Leave missing values in place; any aggregate touching one is "not available".
    #[default]
    Keep,
    /// Substitute zero for every missing value.
    Zero,
    /// Remove the rows whose value is missing.
    Drop,
}

impl NaStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            NaStrategy::Keep => "keep",
            NaStrategy::Zero => "zero",
            NaStrategy::Drop => "drop",
        }
    }
}

impl fmt::Display for NaStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NaStrategy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keep" => Ok(NaStrategy::Keep),
            "zero" => Ok(NaStrategy::Zero),
            "drop" => Ok(NaStrategy::Drop),
            _ => Err(CoreError::InvalidNaStrategy(s.to_string())),
        }
    }
}

/// The type a column is coerced to during validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Date,
    Numeric,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_strategies_case_insensitively() {
        assert_eq!("keep".parse::<NaStrategy>().unwrap(), NaStrategy::Keep);
        assert_eq!(" Zero ".parse::<NaStrategy>().unwrap(), NaStrategy::Zero);
        assert_eq!("DROP".parse::<NaStrategy>().unwrap(), NaStrategy::Drop);
    }

    #[test]
    fn rejects_unknown_strategy() {
        let err = "mean".parse::<NaStrategy>().unwrap_err();
        assert_eq!(err, CoreError::InvalidNaStrategy("mean".to_string()));
    }
}
