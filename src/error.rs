use thiserror::Error;

/// Errors produced while handling a tool call or starting the server.
///
/// The first three per-call variants never escape the dispatcher: they are
/// converted into error-flagged tool results at that boundary. Only
/// `ServerSetupFailed` is fatal and propagates to process exit.
#[derive(Debug, Error)]
pub enum ServerError {
    /// A tool argument was missing, malformed, or out of range.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The generation backend reported a failure (transport, status, or
    /// response parsing). The message carries the backend's description.
    #[error("Text generation failed: {0}")]
    GenerationFailed(String),

    /// The stdio transport could not be brought up.
    #[error("Server setup failed: {0}")]
    ServerSetupFailed(String),

    /// A tool was requested that this server does not advertise.
    #[error("Unknown tool requested: {0}")]
    UnknownTool(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages_are_human_readable() {
        assert_eq!(
            ServerError::InvalidParameter("Prompt cannot be empty".into()).to_string(),
            "Invalid parameter: Prompt cannot be empty"
        );
        assert_eq!(
            ServerError::GenerationFailed("connection refused".into()).to_string(),
            "Text generation failed: connection refused"
        );
        assert_eq!(
            ServerError::UnknownTool("weather".into()).to_string(),
            "Unknown tool requested: weather"
        );
        assert_eq!(
            ServerError::ServerSetupFailed("broken pipe".into()).to_string(),
            "Server setup failed: broken pipe"
        );
    }
}
