use dotenv::dotenv;
use std::env;

/// Runtime configuration, read once at startup and passed explicitly to
/// whatever needs it. Deliberately not a process-wide static.
pub struct Config {
    pub log_level: String,
    pub insight_host: String,
    pub insight_model: String,
    pub insight_api_key: Option<String>,
    pub insight_timeout_secs: u64,
}

impl core::fmt::Debug for Config {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Config")
            .field("log_level", &self.log_level)
            .field("insight_host", &self.insight_host)
            .field("insight_model", &self.insight_model)
            .field("insight_api_key", &"<redacted>")
            .field("insight_timeout_secs", &self.insight_timeout_secs)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            insight_host: env::var("INSIGHT_HOST")
                .unwrap_or_else(|_| "https://api.groq.com/openai".to_string()),
            insight_model: env::var("INSIGHT_MODEL")
                .unwrap_or_else(|_| "llama3-8b-8192".to_string()),
            insight_api_key: env::var("INSIGHT_API_KEY").ok(),
            insight_timeout_secs: env::var("INSIGHT_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
        }
    }
}
