//! Tries to create an `AppConfig` from config files.
//! `base.toml` is applied first, then the environment-specific file on top of it.
//! Gets initialized with `OnceLock` so it only needs to get initialized once.

mod error;
mod structs;

use std::sync::OnceLock;

use secrecy::SecretString;
use tracing::info;

// Re-export config structs
pub use error::{ConfigError, ConfigResult};
pub use structs::{AppConfig, Environment, GithubConfig, NetConfig};

/// Allocates a static `OnceLock` containing `AppConfig`.
/// This ensures configuration only gets initialized the first time we call this function.
/// Every other caller gets a &'static ref to AppConfig.
/// Panics if anything goes wrong.
pub fn get_or_init_config() -> &'static AppConfig {
    static CONFIG_INIT: OnceLock<AppConfig> = OnceLock::new();
    CONFIG_INIT.get_or_init(|| {
        info!(
            "{:<12} - Initializing the configuration",
            "get_or_init_config"
        );
        let base_path = std::env::current_dir().expect("Failed to determine the current DIR.");
        let config_dir = base_path.join("config");

        let environment: Environment = std::env::var("APP_ENVIRONMENT")
            .unwrap_or_else(|_| "local".into())
            .try_into()
            .expect("Failed to parse APP_ENVIRONMENT.");
        let environment_filename = format!("{}.toml", environment.as_ref().to_lowercase());

        let base_file = std::fs::File::open(config_dir.join("base.toml"))
            .unwrap_or_else(|er| panic!("Fatal Error: Building config: {er}"));
        let env_file = std::fs::File::open(config_dir.join(environment_filename))
            .unwrap_or_else(|er| panic!("Fatal Error: Building config: {er}"));

        let mut config = AppConfig::init()
            .add_source(base_file)
            .and_then(|builder| builder.add_source(env_file))
            .and_then(|builder| builder.build())
            .unwrap_or_else(|er| panic!("Fatal Error: Building config: {er}"));

        // The deploy environment provides the GitHub credential directly.
        if matches!(environment, Environment::Production) {
            // Panic early if there are any problems.
            let token = std::env::var("GITHUB_TOKEN").unwrap_or_else(|er| {
                panic!("Fatal Error: While looking for GITHUB_TOKEN env variable: {er:?}")
            });
            config.github_config.token = SecretString::from(token);
        }

        config
    })
}
