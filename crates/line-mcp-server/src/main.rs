//! MCP server for LINE desktop automation
//!
//! This server provides MCP tools for reading and sending LINE chat messages
//! by driving the desktop app's UI.

mod constants;
mod guide;
mod requests;
mod tools;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use line_mcp_automation::setup::{default_marker_path, ensure_dependencies};
use line_mcp_automation::{EngineConfig, LineAutomation};
use line_mcp_protocol::ScrollPreset;
use requests::{ChatHistoryRequest, SendMessageRequest};
use rmcp::{
    ServerHandler, ServiceExt,
    handler::server::{tool::ToolRouter, wrapper::Parameters},
    model::{Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
    transport::stdio,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// MCP server that reads and sends LINE desktop chat messages
#[derive(Parser, Debug)]
#[command(name = "line-mcp-server", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Save every retrieved chat history to a text file
    #[arg(long, global = true)]
    chat_log: bool,

    /// Directory for saved chat histories (implies --chat-log)
    #[arg(long, global = true, value_name = "DIR")]
    chat_log_path: Option<PathBuf>,

    /// Skip the one-time dependency check on start
    #[arg(long, global = true)]
    skip_setup: bool,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Run the MCP server over stdio (default)
    Serve,
    /// Check helper programs and print a report
    Setup,
    /// Print the setup guide
    Guide,
}

impl Cli {
    /// Environment config with the command line flags applied on top
    fn engine_config(&self, base: EngineConfig) -> EngineConfig {
        if self.chat_log || self.chat_log_path.is_some() {
            let dir = self
                .chat_log_path
                .clone()
                .or_else(|| base.chat_log.as_ref().map(|log| log.dir.clone()));
            base.with_chat_log(dir)
        } else {
            base
        }
    }
}

/// line-mcp server handler
#[derive(Clone)]
struct LineMcpServer {
    tool_router: ToolRouter<Self>,
    engine: Arc<LineAutomation>,
}

impl LineMcpServer {
    fn new(engine: LineAutomation) -> Self {
        let tool_router = Self::tool_router();
        Self {
            tool_router,
            engine: Arc::new(engine),
        }
    }
}

#[tool_router]
impl LineMcpServer {
    #[tool(description = "Ping the line-mcp server to verify it's running")]
    async fn ping(&self) -> String {
        tools::basic::ping()
    }

    #[tool(
        description = "Get the recent conversation of a LINE chat room. Scrolls back 10 pages, then copies the visible messages"
    )]
    async fn get_line_chatroom_history_default(
        &self,
        Parameters(req): Parameters<ChatHistoryRequest>,
    ) -> String {
        tools::history::get_chat_history(&self.engine, req, ScrollPreset::Default).await
    }

    #[tool(
        description = "Get a longer conversation history of a LINE chat room (scrolls back 50 pages; slow)"
    )]
    async fn get_line_chatroom_history_long(
        &self,
        Parameters(req): Parameters<ChatHistoryRequest>,
    ) -> String {
        tools::history::get_chat_history(&self.engine, req, ScrollPreset::Long).await
    }

    #[tool(description = "Get only the latest messages of a LINE chat room (scrolls back 5 pages)")]
    async fn get_line_chatroom_history_short(
        &self,
        Parameters(req): Parameters<ChatHistoryRequest>,
    ) -> String {
        tools::history::get_chat_history(&self.engine, req, ScrollPreset::Short).await
    }

    #[tool(
        description = "Type a message into a LINE chat without sending it, so the user can review and press Enter"
    )]
    async fn send_message_manual(&self, Parameters(req): Parameters<SendMessageRequest>) -> String {
        tools::message::send_message(&self.engine, req, false).await
    }

    #[tool(description = "Type a message into a LINE chat and send it immediately")]
    async fn send_message_auto(&self, Parameters(req): Parameters<SendMessageRequest>) -> String {
        tools::message::send_message(&self.engine, req, true).await
    }

    #[tool(description = "Check whether the LINE desktop app is running")]
    async fn is_line_running(&self) -> String {
        tools::basic::is_line_running(&self.engine).await
    }

    #[tool(description = "Bring the LINE desktop app to the foreground")]
    async fn activate_line(&self) -> String {
        tools::basic::activate_line(&self.engine).await
    }
}

#[tool_handler]
impl ServerHandler for LineMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "line-mcp server reads and sends LINE chat messages by driving the LINE \
                 desktop app. Use 'get_line_chatroom_history_default' to read a chat, \
                 'send_message_manual' to draft a message for the user to send, and \
                 'send_message_auto' only when the user asked to send right away. \
                 Tools take over the mouse and keyboard while they run."
                    .into(),
            ),
        }
    }
}

async fn run_setup() -> Result<()> {
    let marker = default_marker_path().context("Cannot determine the home directory")?;
    let report = ensure_dependencies(&marker, std::env::consts::OS).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

async fn serve(cli: &Cli) -> Result<()> {
    if !cli.skip_setup {
        match default_marker_path() {
            Some(marker) => {
                if let Err(e) = ensure_dependencies(&marker, std::env::consts::OS).await {
                    tracing::error!("Dependency check failed: {}", e);
                }
            }
            None => tracing::warn!("No home directory, skipping dependency check"),
        }
    }

    let config = cli.engine_config(EngineConfig::from_env()?);
    if let Some(log) = &config.chat_log {
        tracing::info!("Chat logs will be saved to {}", log.dir.display());
    }
    let engine = LineAutomation::for_current_platform(config)?;

    tracing::info!("Starting line-mcp server...");

    let server = LineMcpServer::new(engine);
    let service = server.serve(stdio()).await?;

    tracing::info!("Server started, waiting for connections...");
    service.waiting().await?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    // Variables already set in the process take precedence over `.env`
    let dotenv = dotenvy::dotenv();

    // Initialize logging to stderr (stdout is used for MCP communication)
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    match dotenv {
        Ok(path) => tracing::info!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("Failed to load .env: {}", e),
    }

    match cli.command.unwrap_or(Command::Serve) {
        Command::Guide => {
            guide::print_guide();
            Ok(())
        }
        Command::Setup => run_setup().await,
        Command::Serve => serve(&cli).await,
    }
}
