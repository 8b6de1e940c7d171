//! MCP service: advertises the single `foundation-models` tool and routes
//! incoming calls to the text generation backend.
//!
//! Every per-call failure is converted into an error-flagged tool result at
//! this boundary; nothing below it can terminate the server or leak a
//! protocol-level error for a recoverable condition.

use std::sync::Arc;

use rmcp::{
    model::{ErrorData as McpError, *},
    service::RequestContext,
    RoleServer, ServerHandler,
};
use serde_json::Value;

use crate::backend::TextGeneration;
use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::params::GenerationRequest;

/// Name of the single advertised tool; also the dispatch key.
pub const FOUNDATION_MODELS_TOOL: &str = "foundation-models";

const TOOL_DESCRIPTION: &str = "Generate text using Apple Foundation Models";

/// Builds the advertised tool descriptor. The schema is written out
/// literally because it is a wire contract: `prompt` required, `temperature`
/// bounded to [0.0, 1.0], `max_tokens` a plain integer.
pub fn foundation_models_tool() -> Tool {
    let schema = serde_json::json!({
        "type": "object",
        "properties": {
            "prompt": {
                "type": "string",
                "description": "The text prompt to generate a response for"
            },
            "temperature": {
                "type": "number",
                "description": "Controls randomness in the output (0.0 to 1.0, default: 0.7)",
                "minimum": 0.0,
                "maximum": 1.0
            },
            "max_tokens": {
                "type": "integer",
                "description": "Maximum number of tokens to generate"
            }
        },
        "required": ["prompt"]
    });
    let schema = match schema {
        Value::Object(map) => map,
        _ => JsonObject::default(),
    };
    Tool::new(FOUNDATION_MODELS_TOOL, TOOL_DESCRIPTION, Arc::new(schema))
}

/// MCP server handler bound to a text generation backend.
///
/// Stateless across calls: the configuration and tool descriptor are
/// read-only after construction, so concurrent in-flight calls need no
/// coordination at this layer.
#[derive(Clone)]
pub struct FoundationModelsService {
    config: Arc<ServerConfig>,
    backend: Arc<dyn TextGeneration>,
    tool: Tool,
}

impl FoundationModelsService {
    pub fn new(config: ServerConfig, backend: Arc<dyn TextGeneration>) -> Self {
        Self {
            config: Arc::new(config),
            backend,
            tool: foundation_models_tool(),
        }
    }

    /// The advertised tool set: static for the process lifetime.
    pub fn advertised_tools(&self) -> Vec<Tool> {
        vec![self.tool.clone()]
    }

    /// Route a tool call by name. Unknown tools and per-call failures are
    /// normal, recoverable outcomes: both come back as error-flagged
    /// results, never as protocol errors.
    pub async fn dispatch(
        &self,
        name: &str,
        arguments: Option<&JsonObject>,
    ) -> CallToolResult {
        tracing::debug!(tool = name, "received tool call");

        if name != FOUNDATION_MODELS_TOOL {
            tracing::debug!(tool = name, "unknown tool requested");
            let message = ServerError::UnknownTool(name.to_string()).to_string();
            return CallToolResult::error(vec![Content::text(message)]);
        }

        match self.generate(arguments).await {
            Ok(text) => CallToolResult::success(vec![Content::text(text)]),
            Err(e) => {
                tracing::error!(error = %e, "tool execution failed");
                CallToolResult::error(vec![Content::text(e.to_string())])
            }
        }
    }

    async fn generate(&self, arguments: Option<&JsonObject>) -> Result<String, ServerError> {
        let request = GenerationRequest::from_arguments(arguments)?;
        tracing::debug!(
            prompt_length = request.prompt.len(),
            temperature = request.temperature,
            max_tokens = ?request.max_tokens,
            "validated generation request"
        );
        self.backend
            .generate(&request, &self.config.system_instructions)
            .await
    }
}

impl ServerHandler for FoundationModelsService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_06_18,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: self.config.server_name.clone().into(),
                version: self.config.server_version.clone().into(),
                icons: None,
                title: None,
                website_url: None,
            },
            instructions: Some(
                "Provides text generation through the foundation-models tool. \
                 Pass a prompt and optionally temperature (0.0-1.0) and max_tokens."
                    .into(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _ctx: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        // No pagination; the set never changes.
        Ok(ListToolsResult {
            tools: self.advertised_tools(),
            next_cursor: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _ctx: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.dispatch(&request.name, request.arguments.as_ref()).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_schema_requires_prompt() {
        let tool = foundation_models_tool();
        assert_eq!(tool.name, FOUNDATION_MODELS_TOOL);

        let schema = Value::Object((*tool.input_schema).clone());
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["required"], serde_json::json!(["prompt"]));
        assert_eq!(schema["properties"]["prompt"]["type"], "string");
        assert_eq!(schema["properties"]["temperature"]["minimum"], 0.0);
        assert_eq!(schema["properties"]["temperature"]["maximum"], 1.0);
        assert_eq!(schema["properties"]["max_tokens"]["type"], "integer");
    }
}
