use std::env;
use std::time::Duration;

use crate::errors::ConfigError;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const OPENAI_HOST: &str = "https://api.openai.com";
pub const AVWX_HOST: &str = "https://avwx.rest";
pub const NOTAM_HOST: &str = "https://pilotweb.nas.faa.gov";
pub const SEARCH_HOST: &str = "https://html.duckduckgo.com";

pub const GATEWAY_TIMEOUT: Duration = Duration::from_secs(60);
pub const METAR_TIMEOUT: Duration = Duration::from_secs(10);
pub const TAF_TIMEOUT: Duration = Duration::from_secs(10);
pub const NOTAM_TIMEOUT: Duration = Duration::from_secs(15);
pub const WEB_SEARCH_TIMEOUT: Duration = Duration::from_secs(10);

/// How many NOTAMs a single advisory lookup returns.
pub const MAX_NOTAMS_DISPLAY: usize = 5;
/// How many nearby stations the TAF fallback considers.
pub const NEARBY_STATION_LIMIT: usize = 10;

pub const USER_AGENT: &str = concat!("skybrief/", env!("CARGO_PKG_VERSION"));

/// Credentials and model selection, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub avwx_api_key: String,
    pub model: String,
    pub openai_host: String,
}

impl Config {
    /// Load configuration from the environment, honoring a `.env` file when
    /// one is present. Both credentials are checked up front so a missing
    /// key is reported at startup rather than discovered mid-conversation.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenv::dotenv();

        let openai_api_key = env::var("OPENAI_API_KEY").ok().filter(|v| !v.is_empty());
        let avwx_api_key = env::var("AVWX_API_KEY").ok().filter(|v| !v.is_empty());

        let mut missing = Vec::new();
        if openai_api_key.is_none() {
            missing.push("OPENAI_API_KEY");
        }
        if avwx_api_key.is_none() {
            missing.push("AVWX_API_KEY");
        }
        if !missing.is_empty() {
            return Err(ConfigError::MissingKeys(missing));
        }

        Ok(Config {
            openai_api_key: openai_api_key.unwrap_or_default(),
            avwx_api_key: avwx_api_key.unwrap_or_default(),
            model: env::var("SKYBRIEF_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            openai_host: env::var("OPENAI_HOST").unwrap_or_else(|_| OPENAI_HOST.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    // Empty strings rather than remove_var: dotenv never overrides a set
    // variable, so a developer's .env file cannot leak into these tests.
    fn clear_keys() {
        env::set_var("OPENAI_API_KEY", "");
        env::set_var("AVWX_API_KEY", "");
        env::remove_var("SKYBRIEF_MODEL");
        env::remove_var("OPENAI_HOST");
    }

    #[test]
    #[serial]
    fn missing_keys_are_reported_together() {
        clear_keys();
        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::MissingKeys(keys) => {
                assert_eq!(keys, vec!["OPENAI_API_KEY", "AVWX_API_KEY"]);
            }
        }
    }

    #[test]
    #[serial]
    fn one_missing_key_is_reported_alone() {
        clear_keys();
        env::set_var("OPENAI_API_KEY", "sk-test");
        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::MissingKeys(keys) => assert_eq!(keys, vec!["AVWX_API_KEY"]),
        }
    }

    #[test]
    #[serial]
    fn defaults_apply_when_only_keys_are_set() {
        clear_keys();
        env::set_var("OPENAI_API_KEY", "sk-test");
        env::set_var("AVWX_API_KEY", "avwx-test");

        let config = Config::from_env().unwrap();
        assert_eq!(config.openai_api_key, "sk-test");
        assert_eq!(config.avwx_api_key, "avwx-test");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.openai_host, OPENAI_HOST);
    }

    #[test]
    #[serial]
    fn model_and_host_overrides_are_honored() {
        clear_keys();
        env::set_var("OPENAI_API_KEY", "sk-test");
        env::set_var("AVWX_API_KEY", "avwx-test");
        env::set_var("SKYBRIEF_MODEL", "gpt-4o");
        env::set_var("OPENAI_HOST", "http://localhost:9001");

        let config = Config::from_env().unwrap();
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.openai_host, "http://localhost:9001");

        env::remove_var("SKYBRIEF_MODEL");
        env::remove_var("OPENAI_HOST");
    }
}
