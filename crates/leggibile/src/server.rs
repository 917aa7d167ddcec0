//! MCP (Model Context Protocol) server implementation.
//!
//! Exposes the readability engine and the Gemini comparison over the MCP
//! protocol on stdio, for AI assistants and editors.
//!
//! # Architecture
//!
//! The MCP server is a presentation layer: it wraps the same core library that
//! the CLI commands use. Each `#[tool]` method delegates to core library
//! functions or to [`GeminiClient`].
//!
//! Analysis failures are not protocol errors. They come back as tool results
//! with `is_error = true` and a `{ "error", "kind" }` JSON body.

use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::schemars;
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};
use serde_json::Value;

use leggibile_core::compare::{ErrorKind, Failure};
use leggibile_core::{AnalysisOptions, ComparisonReport, Success, analyze};

use crate::gemini::GeminiClient;

/// Parameters for the `get_info` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct GetInfoParams {
    /// Output format: "text" or "json"
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "text".to_string()
}

/// Parameters for the `health` tool.
#[derive(Debug, Default, serde::Deserialize, schemars::JsonSchema)]
pub struct HealthParams {}

/// Parameters for `analyze_text` and `compare_analysis`.
///
/// The filter fields are loosely typed: anything that is not a boolean
/// enables the filter, and `min_word_length` accepts numbers or numeric
/// strings (clamped to 2..=10, default 4).
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct AnalyzeTextParams {
    /// The Italian text to analyze.
    pub text: String,
    /// Drop short words before counting frequencies (default: true).
    #[serde(default)]
    pub filter_short_words: Option<Value>,
    /// Minimum word length for the frequency table (default: 4).
    #[serde(default)]
    pub min_word_length: Option<Value>,
}

impl AnalyzeTextParams {
    fn options(&self) -> AnalysisOptions {
        let mut request = serde_json::Map::new();
        if let Some(ref v) = self.filter_short_words {
            request.insert("filter_short_words".into(), v.clone());
        }
        if let Some(ref v) = self.min_word_length {
            request.insert("min_word_length".into(), v.clone());
        }
        AnalysisOptions::from_request(&Value::Object(request))
    }
}

/// Parameters for the `analyze_semantic` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct AnalyzeSemanticParams {
    /// The Italian text to analyze.
    pub text: String,
}

/// MCP server exposing the readability engine to AI assistants.
#[derive(Clone)]
pub struct ProjectServer {
    tool_router: rmcp::handler::server::router::tool::ToolRouter<Self>,
    max_input_bytes: Option<usize>,
    gemini: GeminiClient,
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, McpError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))
}

fn tool_failure(failure: &Failure) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::error(vec![Content::text(to_json(failure)?)]))
}

fn error_result<E: ErrorKind>(err: &E) -> Result<CallToolResult, McpError> {
    tool_failure(&Failure::from_error(err))
}

#[tool_router]
impl ProjectServer {
    /// Create a server with an input limit and a Gemini client.
    pub fn new(max_input_bytes: Option<usize>, gemini: GeminiClient) -> Self {
        Self {
            tool_router: Self::tool_router(),
            max_input_bytes,
            gemini,
        }
    }

    fn oversized(&self, text: &str) -> Option<Failure> {
        let max = self.max_input_bytes?;
        (text.len() > max).then(|| Failure {
            error: format!("input too large: {} bytes (limit: {max} bytes)", text.len()),
            kind: "input_too_large".to_string(),
        })
    }

    /// Get project information.
    #[tool(description = "Get project name, version, and description")]
    #[tracing::instrument(skip(self), fields(otel.kind = "server"))]
    fn get_info(
        &self,
        Parameters(params): Parameters<GetInfoParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "get_info", format = %params.format, "executing MCP tool");

        let info = serde_json::json!({
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "description": env!("CARGO_PKG_DESCRIPTION"),
            "semantic_analysis": {
                "model": self.gemini.model(),
                "configured": self.gemini.is_configured(),
            },
        });

        let text = if params.format == "json" {
            to_json(&info)?
        } else {
            format!(
                "{} v{}\n{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION"),
                env!("CARGO_PKG_DESCRIPTION"),
            )
        };

        tracing::info!(tool = "get_info", "MCP tool completed");
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    /// Liveness check.
    #[tool(description = "Check that the server is running")]
    #[tracing::instrument(skip(self, _params), fields(otel.kind = "server"))]
    fn health(
        &self,
        Parameters(_params): Parameters<HealthParams>,
    ) -> Result<CallToolResult, McpError> {
        let status = serde_json::json!({
            "status": "ok",
            "message": "server is running",
            "version": env!("CARGO_PKG_VERSION"),
        });
        Ok(CallToolResult::success(vec![Content::text(to_json(
            &status,
        )?)]))
    }

    /// Compute readability metrics for Italian text.
    #[tool(
        description = "Analyze Italian text: Gulpease index, type-token ratio, sentence-length buckets, complexity score and category, and the five most frequent words."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server", text_len = params.text.len()))]
    fn analyze_text(
        &self,
        Parameters(params): Parameters<AnalyzeTextParams>,
    ) -> Result<CallToolResult, McpError> {
        let options = params.options();
        tracing::debug!(tool = "analyze_text", ?options, "executing MCP tool");

        if let Some(failure) = self.oversized(&params.text) {
            return tool_failure(&failure);
        }

        match analyze(&params.text, options) {
            Ok(report) => {
                tracing::info!(
                    tool = "analyze_text",
                    score = report.complexity_score.score,
                    "MCP tool completed"
                );
                Ok(CallToolResult::success(vec![Content::text(to_json(
                    &Success::new(report),
                )?)]))
            }
            Err(err) => {
                tracing::debug!(tool = "analyze_text", error = %err, "analysis rejected input");
                error_result(&err)
            }
        }
    }

    /// Ask Gemini for a semantic analysis.
    #[tool(
        description = "Analyze Italian text with Gemini: estimated metrics plus conceptual difficulty, school level, register, technical terms, and suggestions. Requires a Gemini API key."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server", text_len = params.text.len()))]
    async fn analyze_semantic(
        &self,
        Parameters(params): Parameters<AnalyzeSemanticParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "analyze_semantic", "executing MCP tool");

        if let Some(failure) = self.oversized(&params.text) {
            return tool_failure(&failure);
        }

        match self.gemini.analyze(&params.text).await {
            Ok(report) => {
                tracing::info!(tool = "analyze_semantic", "MCP tool completed");
                Ok(CallToolResult::success(vec![Content::text(to_json(
                    &Success::new(report),
                )?)]))
            }
            Err(err) => {
                tracing::warn!(tool = "analyze_semantic", error = %err, "semantic analysis failed");
                error_result(&err)
            }
        }
    }

    /// Compare local metrics with Gemini's estimate.
    #[tool(
        description = "Analyze Italian text locally and with Gemini, and report the differences and an agreement label (Alta, Media, Bassa). The local side is returned even when Gemini is unavailable."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server", text_len = params.text.len()))]
    async fn compare_analysis(
        &self,
        Parameters(params): Parameters<AnalyzeTextParams>,
    ) -> Result<CallToolResult, McpError> {
        let options = params.options();
        tracing::debug!(tool = "compare_analysis", ?options, "executing MCP tool");

        if let Some(failure) = self.oversized(&params.text) {
            return tool_failure(&failure);
        }
        if params.text.trim().is_empty() {
            return error_result(&leggibile_core::AnalysisError::EmptyInput);
        }

        let local = analyze(&params.text, options);
        let semantic = self.gemini.analyze(&params.text).await;
        let report = ComparisonReport::new(local.into(), semantic.into());

        tracing::info!(
            tool = "compare_analysis",
            compared = report.differences.is_some(),
            "MCP tool completed"
        );
        Ok(CallToolResult::success(vec![Content::text(to_json(
            &Success::new(report),
        )?)]))
    }
}

#[tool_handler]
impl ServerHandler for ProjectServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(format!(
                "{} MCP server. Use analyze_text for readability metrics of Italian text, \
                 analyze_semantic and compare_analysis for a Gemini-based second opinion.",
                env!("CARGO_PKG_NAME"),
            )),
        }
    }
}
