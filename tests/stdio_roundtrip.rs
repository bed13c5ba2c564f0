//! MCP client ↔ server over in-memory pipes and over a real subprocess.

mod common;

use common::{args, text, tool_call, ScriptedEndpoint};
use mcp_tool_bridge::{
    AgentConfig, BackendSpec, ErrorKind, McpClient, McpServer, ProduceBackend, ToolBackend,
    ToolCallingAgent, ToolOutcome,
};
use serde_json::json;

fn server_target() -> String {
    format!("stdio:{}", env!("CARGO_BIN_EXE_produce-server"))
}

/// Client connected to an in-process server through a duplex pipe.
async fn in_memory_client() -> McpClient {
    let (client_side, server_side) = tokio::io::duplex(64 * 1024);

    let (server_read, server_write) = tokio::io::split(server_side);
    tokio::spawn(async move {
        let server = McpServer::new(ProduceBackend::new().unwrap());
        server.serve(server_read, server_write).await
    });

    let (client_read, client_write) = tokio::io::split(client_side);
    let client = McpClient::from_streams(client_read, client_write);
    let init = client.initialize().await.unwrap();
    assert_eq!(init.server_info.name, "custom-mcp-server");
    client
}

#[tokio::test]
async fn test_list_tools_over_pipe() {
    let client = in_memory_client().await;
    let catalog = client.list_tools().await.unwrap();
    assert_eq!(catalog.names(), vec!["get_potatoes", "get_tomatoes"]);
    assert_eq!(
        catalog.get("get_tomatoes").unwrap().required_params(),
        vec!["size"]
    );
}

#[tokio::test]
async fn test_call_outcomes_survive_the_wire() {
    let client = in_memory_client().await;

    let ok = client
        .call_tool("get_potatoes", &args(json!({ "size": "L" })))
        .await
        .unwrap();
    assert_eq!(
        ok.outcome,
        ToolOutcome::Success {
            value: json!({ "size": "L", "quantity": 10 })
        }
    );

    let missing = client
        .call_tool("get_tomatoes", &args(json!({ "color": "Green" })))
        .await
        .unwrap();
    assert_eq!(
        missing.outcome,
        ToolOutcome::Failure {
            kind: ErrorKind::InvalidArguments,
            message: "Missing required parameter: size".into()
        }
    );

    let unknown = client
        .call_tool("get_onions", &args(json!({})))
        .await
        .unwrap();
    assert_eq!(unknown.error_kind(), Some(ErrorKind::UnknownTool));
}

#[tokio::test]
async fn test_real_server_process() {
    let spec = BackendSpec::parse(&server_target()).unwrap();
    let client = McpClient::connect(&spec).await.unwrap();

    let catalog = client.list_tools().await.unwrap();
    assert_eq!(catalog.len(), 2);

    let result = client
        .call_tool("get_tomatoes", &args(json!({ "size": "S", "color": "Red" })))
        .await
        .unwrap();
    assert_eq!(
        result.outcome,
        ToolOutcome::Success {
            value: json!({ "size": "S", "quantity": 15 })
        }
    );

    client.close().await.unwrap();
    let err = client.list_tools().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotConnected);
}

#[tokio::test]
async fn test_agent_drives_real_server() {
    let (endpoint, _log) = ScriptedEndpoint::new(vec![
        tool_call("get_potatoes", json!({ "size": "L" })),
        text("There are 10 large potatoes."),
    ]);
    let mut agent = ToolCallingAgent::new(endpoint, AgentConfig::default());

    let catalog = agent.connect(&server_target()).await.unwrap();
    assert!(catalog.contains("get_potatoes"));

    let report = agent.run_query("How many large potatoes?").await;
    let result = report.conversation.tool_results().next().unwrap().clone();
    assert_eq!(
        result.outcome,
        ToolOutcome::Success {
            value: json!({ "size": "L", "quantity": 10 })
        }
    );
    assert_eq!(report.into_text(), "There are 10 large potatoes.");

    agent.close().await.unwrap();
    assert!(!agent.is_connected());
}

#[tokio::test]
async fn test_process_that_exits_immediately_fails_to_connect() {
    let spec = BackendSpec::parse("stdio:true").unwrap();
    let err = McpClient::connect(&spec).await.err().unwrap();
    assert_eq!(err.kind(), ErrorKind::InternalError);
}

#[tokio::test]
async fn test_missing_executable_fails_to_connect() {
    let spec = BackendSpec::parse("stdio:/nonexistent/produce-server").unwrap();
    let err = McpClient::connect(&spec).await.err().unwrap();
    assert!(err.to_string().contains("Failed to spawn"), "{err}");
}
