//! mcp-client：启动 MCP 工具服务端并通过 Gemini 函数调用回答问题的命令行客户端
//!
//! Usage:
//!   mcp-client <server-target>                   Interactive chat loop
//!   mcp-client <server-target> --query <text>    Answer one query and exit
//!
//! `<server-target>` is a `.py` or `.js` server script, or
//! `stdio:<command> [args..]` for any other executable (for example
//! `stdio:produce-server`).
//!
//! Configuration is read from the environment and an optional `.env` file;
//! see `GEMINI_API_KEY`, `GEMINI_MODEL`, `MCP_MAX_ITERATIONS`.

use anyhow::{bail, Context};
use mcp_tool_bridge::{AgentConfig, ToolCallingAgent};
use std::io::BufRead;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;

struct Args {
    target: String,
    query: Option<String>,
}

fn print_usage() {
    eprintln!(
        r#"mcp-client：MCP 工具客户端

USAGE:
    mcp-client <server-target> [--query <text>]

ARGS:
    <server-target>     path/to/server.py, path/to/server.js or stdio:<command> [args..]

OPTIONS:
    --query <text>      Answer a single query and exit
    -h, --help          Show this help message

ENVIRONMENT:
    GEMINI_API_KEY      Gemini API key (keyring entry mcp-tool-bridge/gemini is tried first)
    GEMINI_MODEL        Model name (default gemini-2.5-flash)
    MCP_MAX_ITERATIONS  Model calls allowed per query (default 10)"#
    );
}

fn parse_args() -> anyhow::Result<Option<Args>> {
    let mut target = None;
    let mut query = None;
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(None),
            "--query" => {
                query = Some(args.next().context("--query requires a value")?);
            }
            other if target.is_none() => target = Some(other.to_string()),
            other => bail!("Unexpected argument: {}", other),
        }
    }

    match target {
        Some(target) => Ok(Some(Args { target, query })),
        None => Ok(None),
    }
}

/// Forward stdin lines from a detached thread; runtime shutdown does not
/// wait for it, unlike a read on `tokio::io::stdin`.
fn spawn_stdin_lines() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(1);
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}

async fn chat_loop(agent: &mut ToolCallingAgent) -> anyhow::Result<()> {
    let mut stdout = tokio::io::stdout();
    let mut lines = spawn_stdin_lines();

    stdout
        .write_all(b"\nMCP Client Started!\nType your queries or 'quit' to exit.\n")
        .await?;

    loop {
        stdout.write_all(b"\nQuery: ").await?;
        stdout.flush().await?;

        let Some(line) = lines.recv().await else {
            break;
        };
        let query = line.trim();
        if query.is_empty() {
            continue;
        }
        if query.eq_ignore_ascii_case("quit") {
            break;
        }

        let answer = agent.process_query(query).await;
        stdout.write_all(format!("\n{}\n", answer).as_bytes()).await?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    mcp_tool_bridge::logging::init("warn");

    let Some(args) = parse_args()? else {
        print_usage();
        std::process::exit(1);
    };

    let config = AgentConfig::from_env().context("invalid configuration")?;
    let mut agent = ToolCallingAgent::with_gemini(config)?;

    let catalog = agent
        .connect(&args.target)
        .await
        .with_context(|| format!("failed to connect to '{}'", args.target))?;
    println!("\nConnected to server with tools: {:?}", catalog.names());

    let run = async {
        match &args.query {
            Some(query) => {
                let answer = agent.process_query(query).await;
                println!("{}", answer);
                Ok(())
            }
            None => chat_loop(&mut agent).await,
        }
    };

    let result = tokio::select! {
        result = run => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("interrupt received");
            Ok(())
        }
    };

    agent.close().await?;
    result
}
