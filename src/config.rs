use crate::error::{Error, Result};
use crate::services::retry::RetryPolicy;
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub text_model: String,
    pub image_model: String,
    pub max_questions: usize,
    pub generation_max_attempts: u32,
    pub retry_base_delay_ms: u64,
    pub upstream_timeout_secs: u64,
    pub public_rps: u32,
    pub image_store_capacity: Option<usize>,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_address: get_env("SERVER_ADDRESS")?,
            openai_api_key: get_env("OPENAI_API_KEY")?,
            openai_base_url: get_env_or("OPENAI_BASE_URL", "https://api.openai.com/v1"),
            text_model: get_env_or("TEXT_MODEL", "gpt-4o"),
            image_model: get_env_or("IMAGE_MODEL", "dall-e-3"),
            max_questions: get_env_parse_or("MAX_QUESTIONS", 10)?,
            generation_max_attempts: get_env_parse_or("GENERATION_MAX_ATTEMPTS", 3)?,
            retry_base_delay_ms: get_env_parse_or("RETRY_BASE_DELAY_MS", 500)?,
            upstream_timeout_secs: get_env_parse_or("UPSTREAM_TIMEOUT_SECS", 120)?,
            public_rps: get_env_parse_or("PUBLIC_RPS", 20)?,
            image_store_capacity: get_env_parse_opt("IMAGE_STORE_CAPACITY")?,
        })
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.generation_max_attempts,
            Duration::from_millis(self.retry_base_delay_ms),
        )
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs.max(1))
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    Ok(get_env_parse_opt(name)?.unwrap_or(default))
}

fn get_env_parse_opt<T>(name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        _ => Ok(None),
    }
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> Result<&'static Config> {
    CONFIG
        .get()
        .ok_or_else(|| Error::Config("Configuration has not been initialized".to_string()))
}
