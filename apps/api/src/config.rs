use anyhow::{Context, Result};

const DEFAULT_GROQ_MODEL: &str = "llama-3.3-70b-versatile";
const DEFAULT_GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
///
/// `GROQ_API_KEY` is optional: an empty key starts the service with AI
/// features reporting "not configured" instead of refusing to boot.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub groq_api_key: String,
    pub groq_model: String,
    pub groq_base_url: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            groq_api_key: std::env::var("GROQ_API_KEY").unwrap_or_default(),
            groq_model: optional_env("GROQ_MODEL", DEFAULT_GROQ_MODEL),
            groq_base_url: optional_env("GROQ_BASE_URL", DEFAULT_GROQ_BASE_URL),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
