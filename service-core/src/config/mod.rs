use crate::error::AppError;
use config::{Config as Cfg, File};
use serde::Deserialize;

/// Settings every service shares: where to listen and how loud to log.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            log_level: default_log_level(),
            otlp_endpoint: None,
        }
    }
}

impl Config {
    /// Load from an optional `configuration` file, then `APP__*` variables.
    ///
    /// `LOG_LEVEL` and `OTLP_ENDPOINT` are honoured without the prefix so the
    /// same deployment manifests work for every service.
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let mut builder = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"));

        if let Ok(level) = std::env::var("LOG_LEVEL") {
            builder = builder.set_override("log_level", level)?;
        }
        if let Ok(endpoint) = std::env::var("OTLP_ENDPOINT")
            && !endpoint.trim().is_empty()
        {
            builder = builder.set_override("otlp_endpoint", endpoint)?;
        }

        Ok(builder.build()?.try_deserialize()?)
    }
}
