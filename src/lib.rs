//! MCP server exposing a single text-generation tool.
//!
//! This crate is a thin adapter: it advertises one MCP tool named
//! `foundation-models` over stdio, validates `{prompt, temperature,
//! max_tokens}` arguments, forwards them to an OpenAI-compatible
//! chat-completions backend, and returns the text or an error-flagged
//! result. Protocol framing and session handling come from `rmcp`.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use mcp_foundation_models::{
//!     ChatCompletionsBackend, FoundationModelsService, Result, ServerConfig,
//! };
//! use rmcp::ServiceExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = ServerConfig::new(None, false, None, None);
//!     let backend = ChatCompletionsBackend::new(&config);
//!     let service = FoundationModelsService::new(config, Arc::new(backend));
//!
//!     let running = service
//!         .serve((tokio::io::stdin(), tokio::io::stdout()))
//!         .await?;
//!     running.waiting().await?;
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod mcp;
pub mod params;

// Re-export main types for library users
pub use backend::{ChatCompletionsBackend, TextGeneration};
pub use config::{EnvOverrides, ServerConfig};
pub use error::ServerError;
pub use mcp::{FoundationModelsService, FOUNDATION_MODELS_TOOL};
pub use params::GenerationRequest;

// Re-export common types
pub type Result<T> = std::result::Result<T, anyhow::Error>;
