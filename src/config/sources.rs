use super::models::Config;
use config::{ConfigError, Environment, File};
use std::env;
use std::path::PathBuf;

const CONFIG_ENV_VAR: &str = "GLYPHBOX_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/glyphbox.toml";
const ENV_PREFIX: &str = "GLYPHBOX";
const ENV_SEPARATOR: &str = "__";

/// Load configuration from multiple sources with priority:
/// 1. Defaults (embedded in structs)
/// 2. TOML file (if exists)
/// 3. Environment variables from .env file (via dotenvy)
/// 4. System environment variables (highest priority)
pub fn load() -> Result<Config, ConfigError> {
    // Load .env file if it exists (ignore errors if file doesn't exist)
    let _ = dotenvy::dotenv();

    let config_path = env::var(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

    let mut config = load_from_sources(config_path)?;

    load_environment_overrides(&mut config);

    Ok(config)
}

/// Overlay values that only ever come from the process environment:
/// the deployment environment label and storage credentials.
fn load_environment_overrides(config: &mut Config) {
    if let Ok(environment) = env::var("GLYPHBOX_ENV").or_else(|_| env::var("DEPLOY_ENV")) {
        if !environment.is_empty() {
            config.environment = environment;
        }
    }

    if let Ok(access_key) = env::var("S3_ACCESS_KEY").or_else(|_| env::var("AWS_ACCESS_KEY_ID")) {
        config.storage.access_key = Some(access_key);
    }
    if let Ok(secret_key) =
        env::var("S3_SECRET_KEY").or_else(|_| env::var("AWS_SECRET_ACCESS_KEY"))
    {
        config.storage.secret_key = Some(secret_key);
    }
}

/// Load configuration from a specific path and environment
/// Useful for testing with custom config files
pub fn load_from_sources(config_path: PathBuf) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();

    if config_path.exists() {
        tracing::info!("Loading configuration from: {}", config_path.display());
        builder = builder.add_source(File::from(config_path).required(false));
    } else {
        tracing::warn!(
            "Configuration file not found at {}, using defaults and environment overrides",
            config_path.display()
        );
    }

    // GLYPHBOX__SERVER__BIND_ADDR -> server.bind_addr
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator(ENV_SEPARATOR)
            .try_parsing(true),
    );

    let config = builder.build()?;
    config.try_deserialize()
}
