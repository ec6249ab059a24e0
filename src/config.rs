use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_TAVILY_BASE_URL: &str = "https://api.tavily.com";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LLMConfig,
    pub search: SearchConfig,
    pub user: UserProfile,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LLMConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

impl LLMConfig {
    /// Returns the API key if one is configured
    pub fn active_api_key(&self) -> Option<String> {
        if self.api_key.trim().is_empty() {
            None
        } else {
            Some(self.api_key.clone())
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    pub tavily_api_key: String,
    pub base_url: String,
    /// "basic" or "advanced"
    pub search_depth: String,
    pub max_results: usize,
    pub include_answer: bool,
    /// Bound on cached search responses. `None` keeps every entry for the process lifetime.
    pub cache_max_entries: Option<usize>,
}

/// Who the research is being done for. Passed to the model as context.
#[derive(Debug, Clone, Default, Deserialize, serde::Serialize, PartialEq)]
pub struct UserProfile {
    pub name: Option<String>,
    pub city: Option<String>,
    pub topic: Option<String>,
    pub user_id: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Self {
            server: ServerConfig {
                port: var("PORT", "3000")
                    .parse()
                    .context("PORT must be a valid port number")?,
                host: var("HOST", "0.0.0.0"),
                cors_allowed_origins: var(
                    "ALLOWED_ORIGINS",
                    "http://localhost:3000,http://localhost:5173",
                )
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            },
            llm: LLMConfig {
                api_key: var("GEMINI_API_KEY", ""),
                base_url: var("BASE_URL", DEFAULT_BASE_URL),
                model: var("MODEL", DEFAULT_MODEL),
            },
            search: SearchConfig {
                tavily_api_key: var("TAVILY_API_KEY", ""),
                base_url: var("TAVILY_BASE_URL", DEFAULT_TAVILY_BASE_URL),
                search_depth: var("SEARCH_DEPTH", "advanced"),
                max_results: var("SEARCH_MAX_RESULTS", "5")
                    .parse()
                    .context("SEARCH_MAX_RESULTS must be a non-negative integer")?,
                include_answer: var("SEARCH_INCLUDE_ANSWER", "true")
                    .parse()
                    .context("SEARCH_INCLUDE_ANSWER must be true or false")?,
                cache_max_entries: lookup("SEARCH_CACHE_MAX_ENTRIES")
                    .map(|v| v.parse())
                    .transpose()
                    .context("SEARCH_CACHE_MAX_ENTRIES must be a non-negative integer")?,
            },
            user: UserProfile {
                name: lookup("USER_NAME"),
                city: lookup("USER_CITY"),
                topic: lookup("USER_TOPIC"),
                user_id: lookup("USER_ID"),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.llm.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.llm.model, DEFAULT_MODEL);
        assert!(config.llm.active_api_key().is_none());
        assert_eq!(config.search.search_depth, "advanced");
        assert_eq!(config.search.max_results, 5);
        assert!(config.search.include_answer);
        assert_eq!(config.search.cache_max_entries, None);
        assert_eq!(config.user, UserProfile::default());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("GEMINI_API_KEY", "key"),
            ("MODEL", "gemini-2.5-flash"),
            ("SEARCH_MAX_RESULTS", "8"),
            ("SEARCH_CACHE_MAX_ENTRIES", "100"),
            ("USER_NAME", "Ada"),
            ("ALLOWED_ORIGINS", "http://a, http://b"),
        ])
        .unwrap();
        assert_eq!(config.llm.active_api_key(), Some("key".to_string()));
        assert_eq!(config.llm.model, "gemini-2.5-flash");
        assert_eq!(config.search.max_results, 8);
        assert_eq!(config.search.cache_max_entries, Some(100));
        assert_eq!(config.user.name.as_deref(), Some("Ada"));
        assert_eq!(config.server.cors_allowed_origins, vec!["http://a", "http://b"]);
    }

    #[test]
    fn test_invalid_numbers_are_errors() {
        assert!(config_from(&[("PORT", "not-a-port")]).is_err());
        assert!(config_from(&[("SEARCH_CACHE_MAX_ENTRIES", "many")]).is_err());
        assert!(config_from(&[("SEARCH_INCLUDE_ANSWER", "maybe")]).is_err());
    }
}
