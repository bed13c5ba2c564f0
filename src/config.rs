//! Agent configuration.
//!
//! Values come from the environment (optionally seeded from a `.env` file by
//! the binaries) and can be overridden with the `with_*` builder methods.
//!
//! | Variable                 | Default                                       |
//! |--------------------------|-----------------------------------------------|
//! | `GEMINI_API_KEY`         | keyring entry, then `GOOGLE_API_KEY`          |
//! | `GEMINI_MODEL`           | `gemini-2.5-flash`                            |
//! | `GEMINI_BASE_URL`        | `https://generativelanguage.googleapis.com`   |
//! | `MCP_MAX_ITERATIONS`     | `10`                                          |
//! | `MCP_MODEL_TIMEOUT_MS`   | `60000`                                       |
//! | `MCP_BACKEND_TIMEOUT_MS` | `30000`                                       |

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::Error;
use crate::transport::http::{HttpTransport, API_KEY_VARS};
use crate::Result;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MAX_ITERATIONS: usize = 10;
pub const DEFAULT_MODEL_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_BACKEND_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct AgentConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    /// Upper bound on model calls per query.
    pub max_iterations: usize,
    pub model_timeout: Duration,
    pub backend_timeout: Duration,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            model_timeout: DEFAULT_MODEL_TIMEOUT,
            backend_timeout: DEFAULT_BACKEND_TIMEOUT,
        }
    }
}

impl AgentConfig {
    /// Read configuration from the process environment, with the API key
    /// looked up in the OS keyring first.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::from_lookup(|key| env::var(key).ok())?;
        if let Some(key) = HttpTransport::get_api_key() {
            config.api_key = Some(key);
        }
        Ok(config)
    }

    /// Build a configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let config = Self {
            api_key: API_KEY_VARS.iter().find_map(|var| non_empty(*var)),
            model: non_empty("GEMINI_MODEL").unwrap_or(defaults.model),
            base_url: non_empty("GEMINI_BASE_URL").unwrap_or(defaults.base_url),
            max_iterations: parse_or(
                "MCP_MAX_ITERATIONS",
                non_empty("MCP_MAX_ITERATIONS"),
                defaults.max_iterations,
            ),
            model_timeout: Duration::from_millis(parse_or(
                "MCP_MODEL_TIMEOUT_MS",
                non_empty("MCP_MODEL_TIMEOUT_MS"),
                defaults.model_timeout.as_millis() as u64,
            )),
            backend_timeout: Duration::from_millis(parse_or(
                "MCP_BACKEND_TIMEOUT_MS",
                non_empty("MCP_BACKEND_TIMEOUT_MS"),
                defaults.backend_timeout.as_millis() as u64,
            )),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.base_url).map_err(|e| {
            Error::Configuration(format!("Invalid base URL '{}': {}", self.base_url, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::Configuration(format!(
                "Base URL must be http or https: {}",
                self.base_url
            )));
        }
        if self.max_iterations == 0 {
            return Err(Error::Configuration(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        if self.model.trim().is_empty() {
            return Err(Error::Configuration("model must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_model_timeout(mut self, timeout: Duration) -> Self {
        self.model_timeout = timeout;
        self
    }

    pub fn with_backend_timeout(mut self, timeout: Duration) -> Self {
        self.backend_timeout = timeout;
        self
    }
}

impl std::fmt::Debug for AgentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("max_iterations", &self.max_iterations)
            .field("model_timeout", &self.model_timeout)
            .field("backend_timeout", &self.backend_timeout)
            .finish()
    }
}

fn parse_or<T: FromStr>(name: &str, raw: Option<String>, default: T) -> T {
    match raw {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(variable = name, value = %raw, "ignoring unparseable value");
            default
        }),
    }
}
