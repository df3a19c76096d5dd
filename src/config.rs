use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub database_url: String,
    pub store_timeout_ms: u64,
    pub scan_rps: u32,
    pub report_rps: u32,
    pub report_rows_per_page: usize,
    pub program_title: String,
    pub registry_url: Option<String>,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_address: get_env("SERVER_ADDRESS")?,
            database_url: get_env("DATABASE_URL")?,
            store_timeout_ms: get_env_parse_or("STORE_TIMEOUT_MS", 5_000)?,
            scan_rps: get_env_parse_or("SCAN_RPS", 200)?,
            report_rps: get_env_parse_or("REPORT_RPS", 20)?,
            report_rows_per_page: get_env_parse_or("REPORT_ROWS_PER_PAGE", 40)?,
            program_title: env::var("PROGRAM_TITLE").unwrap_or_else(|_| "Program".to_string()),
            registry_url: env::var("REGISTRY_URL").ok().filter(|url| !url.trim().is_empty()),
        })
    }

    pub fn store_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.store_timeout_ms.max(1))
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}
