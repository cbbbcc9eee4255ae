use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Missing required variables fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub rust_log: String,
    /// Directory holding the model artifacts (vectorizer, classifier,
    /// optional skill vocabulary and entity model config).
    pub model_dir: PathBuf,
    /// When false the engine runs lexical-only skill extraction.
    pub enable_ner: bool,
    pub max_upload_mb: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            model_dir: PathBuf::from(
                std::env::var("MODEL_DIR").unwrap_or_else(|_| "models".to_string()),
            ),
            enable_ner: std::env::var("ENABLE_NER_EXTRACTION")
                .map(|v| v.to_lowercase() != "false")
                .unwrap_or(true),
            max_upload_mb: std::env::var("MAX_UPLOAD_MB")
                .unwrap_or_else(|_| "10".to_string())
                .parse::<u64>()
                .context("MAX_UPLOAD_MB must be a number")?,
        })
    }

    pub fn max_upload_bytes(&self) -> usize {
        (self.max_upload_mb as usize) * 1024 * 1024
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
