use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

/// Name written to every stored record in place of whatever the model
/// extracted, and the default filter for history queries. The deployment
/// is single-user; the alias keeps real names out of the store.
const DEFAULT_ATHLETE_ALIAS: &str = "常夏冬太郎";

#[derive(Debug, Clone, Deserialize)]
pub struct CertificateConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub mongodb: MongoConfig,
    pub gemini: GeminiSettings,
    pub privacy: PrivacyConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiSettings {
    pub api_key: String,
    pub model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PrivacyConfig {
    pub athlete_alias: String,
}

impl CertificateConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(CertificateConfig {
            common: common_config,
            mongodb: MongoConfig {
                uri: get_env("MONGODB_URI", None, is_prod)?,
                database: get_env("MONGODB_DATABASE", Some("marathon_db"), is_prod)?,
            },
            gemini: GeminiSettings {
                api_key: get_env("GOOGLE_API_KEY", None, is_prod)?,
                model: get_env("GEMINI_MODEL", Some("gemini-2.0-flash"), is_prod)?,
            },
            privacy: PrivacyConfig {
                athlete_alias: get_env("ATHLETE_ALIAS", Some(DEFAULT_ATHLETE_ALIAS), is_prod)?,
            },
        })
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
