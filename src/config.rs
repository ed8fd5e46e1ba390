// Runtime configuration from environment variables (.env supported)
//
//   PAINEL_DATA_FILE       merchant JSON file       (dados_comercios.json)
//   PAINEL_BIND_ADDR       server listen address    (0.0.0.0:8080)
//   PAINEL_STATIC_DIR      files served at /static  (web/static)
//   PAINEL_CACHE_TTL_SECS  ranking cache lifetime   (60)
//   PAINEL_BATCH_SIZE      records per generation   (10000)
//   PAINEL_API_URL         API used by the terminal dashboard (http://localhost:8080)

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_file: PathBuf,
    pub bind_addr: String,
    pub static_dir: PathBuf,
    pub cache_ttl: Duration,
    pub batch_size: usize,
    pub api_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("dados_comercios.json"),
            bind_addr: "0.0.0.0:8080".to_string(),
            static_dir: PathBuf::from("web/static"),
            cache_ttl: Duration::from_secs(60),
            batch_size: 10_000,
            api_url: "http://localhost:8080".to_string(),
        }
    }
}

impl Config {
    /// Load `.env` (if any) and read the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(path) = lookup("PAINEL_DATA_FILE") {
            config.data_file = PathBuf::from(path);
        }
        if let Some(addr) = lookup("PAINEL_BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Some(dir) = lookup("PAINEL_STATIC_DIR") {
            config.static_dir = PathBuf::from(dir);
        }
        if let Some(secs) = lookup("PAINEL_CACHE_TTL_SECS") {
            config.cache_ttl = Duration::from_secs(parse_number("PAINEL_CACHE_TTL_SECS", &secs)?);
        }
        if let Some(size) = lookup("PAINEL_BATCH_SIZE") {
            config.batch_size = parse_number("PAINEL_BATCH_SIZE", &size)?;
        }
        if let Some(url) = lookup("PAINEL_API_URL") {
            config.api_url = url.trim_end_matches('/').to_string();
        }

        Ok(config)
    }
}

fn parse_number<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: e.to_string(),
    })
}
