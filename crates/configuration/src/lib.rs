use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::{LogGuard, init_tracing};
pub use settings::{
    ConstituentColumns, DataSettings, LoggingSettings, ReturnsColumns, ServerSettings, Settings,
};

/// Prefix of the environment variables that override file settings,
/// e.g. `APP_DATA__EXCEL_PATH` or `APP_RETURNS__DEFAULT_WINDOWS=30,90`.
pub const ENV_PREFIX: &str = "APP";

/// Loads the application settings.
///
/// Sources are layered: built-in defaults, then the TOML file at `path` (optional),
/// then `APP_*` environment variables (a `.env` file is read first if present).
pub fn load_config(path: &Path) -> Result<Settings, ConfigError> {
    dotenvy::dotenv().ok();

    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("returns.default_windows")
                .try_parsing(true),
        )
        .build()?;

    let settings = builder.try_deserialize::<Settings>()?;
    settings.validate()?;

    Ok(settings)
}
