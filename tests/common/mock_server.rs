//! Mock Gemini HTTP server for integration tests

use mcp_tool_bridge::{AgentConfig, GeminiDriver};
use mockito::{Matcher, Mock, Server, ServerGuard};
use serde_json::Value;

pub const TEST_MODEL: &str = "gemini-test";
pub const TEST_KEY: &str = "test-key";

/// Test fixture that manages a mock server
pub struct MockServerFixture {
    pub server: ServerGuard,
    pub base_url: String,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        let base_url = server.url();
        Self { server, base_url }
    }

    /// Agent configuration pointing at the mock server
    pub fn config(&self) -> AgentConfig {
        AgentConfig::default()
            .with_base_url(&self.base_url)
            .with_api_key(TEST_KEY)
            .with_model(TEST_MODEL)
    }

    pub fn driver(&self) -> GeminiDriver {
        GeminiDriver::from_config(&self.config()).unwrap()
    }

    fn generate_path() -> Matcher {
        Matcher::Regex(format!("^/v1beta/models/{}:generateContent", TEST_MODEL))
    }

    /// Create a mock for a JSON reply to `generateContent`
    pub async fn mock_generate(&mut self, status: usize, body: &Value) -> Mock {
        self.server
            .mock("POST", Self::generate_path())
            .match_query(Matcher::UrlEncoded("key".into(), TEST_KEY.into()))
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await
    }

    /// Like [`mock_generate`](Self::mock_generate), but only matches request
    /// bodies containing `partial`
    pub async fn mock_generate_matching(&mut self, partial: Value, body: &Value) -> Mock {
        self.server
            .mock("POST", Self::generate_path())
            .match_query(Matcher::UrlEncoded("key".into(), TEST_KEY.into()))
            .match_body(Matcher::PartialJson(partial))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await
    }
}
