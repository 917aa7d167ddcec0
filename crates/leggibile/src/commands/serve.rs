//! Serve command: MCP server on stdio.

use anyhow::Context;
use clap::Args;
use leggibile_core::config::Config;
use rmcp::ServiceExt;
use rmcp::transport::stdio;
use tracing::{debug, info, instrument};

use crate::gemini::{GeminiClient, GeminiConfig};
use crate::server::ProjectServer;

/// Arguments for the `serve` subcommand.
#[derive(Args, Debug, Default)]
pub struct ServeArgs {}

/// Run the MCP server until the client disconnects.
///
/// Stdout carries the protocol; logs go to stderr.
#[instrument(name = "cmd_serve", skip_all)]
pub async fn cmd_serve(
    _args: ServeArgs,
    max_input_bytes: Option<usize>,
    config: Config,
) -> anyhow::Result<()> {
    let gemini = GeminiClient::new(GeminiConfig::from_config(&config))
        .context("failed to set up the Gemini client")?;
    debug!(
        ?max_input_bytes,
        gemini_configured = gemini.is_configured(),
        "starting MCP server"
    );

    let service = ProjectServer::new(max_input_bytes, gemini)
        .serve(stdio())
        .await
        .context("failed to start MCP server")?;
    info!("MCP server ready on stdio");

    service.waiting().await.context("MCP server terminated")?;
    info!("MCP server stopped");
    Ok(())
}
