use crate::error::Error;
use crate::Result;
use keyring::Entry;
use reqwest::Proxy;
use serde_json::Value;
use std::env;
use std::time::Duration;

pub const KEYRING_SERVICE: &str = "mcp-tool-bridge";
pub const KEYRING_USER: &str = "gemini";

/// Environment variables consulted for the API key, in order.
pub const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "GOOGLE_API_KEY"];

#[derive(Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpTransport {
    pub fn new(base_url: &str, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(
                env::var("MCP_HTTP_POOL_MAX_IDLE_PER_HOST")
                    .ok()
                    .and_then(|s| s.parse::<usize>().ok())
                    .unwrap_or(8),
            )
            .pool_idle_timeout(Some(Duration::from_secs(90)));

        if let Ok(proxy_url) = env::var("MCP_PROXY_URL") {
            match Proxy::all(&proxy_url) {
                Ok(proxy) => builder = builder.proxy(proxy),
                Err(e) => tracing::warn!(error = %e, "ignoring invalid MCP_PROXY_URL"),
            }
        }

        let client = builder
            .build()
            .map_err(|e| Error::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Look up the model API key: OS keyring first, then environment.
    pub fn get_api_key() -> Option<String> {
        // 1. Try Keyring
        if let Ok(entry) = Entry::new(KEYRING_SERVICE, KEYRING_USER) {
            if let Ok(key) = entry.get_password() {
                return Some(key);
            }
        }

        // 2. Try Environment Variables
        API_KEY_VARS
            .iter()
            .find_map(|var| env::var(var).ok().filter(|v| !v.is_empty()))
    }

    /// POST `body` to `{base_url}{path}` and return the decoded JSON reply.
    ///
    /// The API key, if any, goes in the `key` query parameter. Non-2xx
    /// replies become [`Error::Endpoint`] carrying the provider's message.
    pub async fn post_json(&self, path: &str, body: &Value) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.post(&url).json(body);
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key)]);
        }

        tracing::debug!(%url, "POST");
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|v| {
                    v.pointer("/error/message")
                        .and_then(Value::as_str)
                        .map(str::to_string)
                })
                .unwrap_or_else(|| {
                    if text.is_empty() {
                        status.to_string()
                    } else {
                        text
                    }
                });
            tracing::warn!(status = status.as_u16(), %message, "model endpoint returned an error");
            return Err(Error::Endpoint {
                status: Some(status.as_u16()),
                message,
            });
        }

        let json = response.json().await?;
        Ok(json)
    }
}
