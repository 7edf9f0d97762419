use std::env;
use std::str::FromStr;
use std::time::Duration;

use log;

use crate::ai_agent::error::{AnalysisError, AnalysisResult};
use crate::ai_agent::llm::groq::GROQ_CHAT_URL;

pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_ORACLE_TIMEOUT_SECS: u64 = 60;

#[derive(Clone)]
pub struct Config {
  pub groq_api_key : String,
  pub groq_url: String,
  pub model_name: String,
  pub bind_address: String,
  pub port: u16,
  pub oracle_timeout: Duration,
}

impl std::fmt::Debug for Config {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Config")
      .field("groq_api_key", &"<redacted>")
      .field("groq_url", &self.groq_url)
      .field("model_name", &self.model_name)
      .field("bind_address", &self.bind_address)
      .field("port", &self.port)
      .field("oracle_timeout", &self.oracle_timeout)
      .finish()
  }
}

impl Config {

  /// Reads `.env` and the process environment. A missing `GROQ_API_KEY`
  /// is fatal.
  pub fn load() -> AnalysisResult<Self> {
    match dotenv::dotenv() {
      Ok(_) => log::info!("Loaded .env file"),
      Err(_) => log::warn!("No .env file found, using process environment"),
    }
    Self::from_lookup(|key| env::var(key).ok())
  }

  pub fn from_lookup<F>(lookup: F) -> AnalysisResult<Self> where F: Fn(&str) -> Option<String> {
    let groq_api_key: String = lookup("GROQ_API_KEY")
      .map(|key| key.trim().to_string())
      .filter(|key| !key.is_empty())
      .ok_or_else(|| AnalysisError::MissingCredential("GROQ_API_KEY".to_string()))?;

    let groq_url: String = lookup("GROQ_API_URL").unwrap_or_else(|| GROQ_CHAT_URL.to_string());
    let model_name: String = lookup("GROQ_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
    let bind_address: String = lookup("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());
    let port: u16 = parse_or_default(&lookup, "PORT", DEFAULT_PORT);
    let timeout_secs: u64 = parse_or_default(&lookup, "ORACLE_TIMEOUT_SECS", DEFAULT_ORACLE_TIMEOUT_SECS);

    return Ok(Config {
      groq_api_key, groq_url, model_name, bind_address, port, oracle_timeout: Duration::from_secs(timeout_secs)
    });
  }

  pub fn api_key_configured(&self) -> bool {
    !self.groq_api_key.is_empty()
  }
}

fn parse_or_default<F, T>(lookup: &F, key: &str, default: T) -> T where F: Fn(&str) -> Option<String>, T: FromStr + std::fmt::Display {
  match lookup(key) {
    Some(raw) => raw.trim().parse::<T>().unwrap_or_else(|_| {
      log::warn!("Warning: {} has invalid value {:?}, using default {}", key, raw, default);
      default
    }),
    None => default,
  }
}
