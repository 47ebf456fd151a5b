use std::path::PathBuf;

// This main function is the entry point when running `cargo run -p web-server`.
// It loads `config.toml` (or the file named by APP_CONFIG) and serves the API.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let path = std::env::var("APP_CONFIG").map_or_else(|_| PathBuf::from("config.toml"), PathBuf::from);
    let settings = configuration::load_config(&path)?;
    let _log_guard = configuration::init_tracing(&settings.logging)?;
    web_server::run_server(settings).await
}
