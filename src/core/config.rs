//! Environment-derived configuration
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Initial implementation

use anyhow::{Context, Result};
use dotenvy::dotenv;

/// Application configuration, loaded from the environment (and a `.env` file
/// when present).
#[derive(Debug, Clone)]
pub struct Config {
    /// Application id used in webhook and registration URLs.
    pub application_id: String,
    /// Public key the embedding HTTP layer verifies request signatures with.
    pub application_public_key: Option<String>,
    /// Bot token for bulk command registration.
    pub bot_token: Option<String>,
    /// Guild to deploy commands to during development (global otherwise).
    pub test_guild_id: Option<String>,
    /// Render handler failures as diagnostic messages.
    pub development: bool,
    /// Default log filter, e.g. "info" or "parley=debug".
    pub log_level: String,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// `DISCORD_APPLICATION_ID` is required; `DISCORD_PUBLIC_KEY`,
    /// `DISCORD_BOT_TOKEN`, `DISCORD_TEST_GUILD_ID`, `PARLEY_DEVELOPMENT`
    /// and `LOG_LEVEL` are optional.
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let application_id = std::env::var("DISCORD_APPLICATION_ID")
            .context("DISCORD_APPLICATION_ID must be set")?;

        Ok(Self {
            application_id,
            application_public_key: std::env::var("DISCORD_PUBLIC_KEY").ok(),
            bot_token: std::env::var("DISCORD_BOT_TOKEN").ok(),
            test_guild_id: std::env::var("DISCORD_TEST_GUILD_ID").ok(),
            development: std::env::var("PARLEY_DEVELOPMENT")
                .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_is_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<Config>();
    }
}
