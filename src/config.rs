//! Runtime configuration resolved once at startup from CLI flags and the
//! process environment. Immutable for the lifetime of the process.

/// System instructions used when neither the CLI flag nor the environment
/// variable provides any.
pub const DEFAULT_SYSTEM_INSTRUCTIONS: &str = "You are a helpful assistant.";

/// Chat-completions base URL used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080/v1";

/// Model name sent to the backend when none is configured. Local
/// OpenAI-compatible servers typically accept any name.
pub const DEFAULT_MODEL: &str = "default";

pub const SYSTEM_INSTRUCTIONS_ENV: &str = "SYSTEM_INSTRUCTIONS";
pub const DEBUG_ENV: &str = "DEBUG";
pub const ENDPOINT_ENV: &str = "MODEL_ENDPOINT";
pub const MODEL_ENV: &str = "MODEL_NAME";
pub const API_KEY_ENV: &str = "MODEL_API_KEY";

/// Resolved server settings. Constructed once in `main` and shared read-only
/// across all in-flight tool calls.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub system_instructions: String,
    pub debug: bool,
    pub server_name: String,
    pub server_version: String,
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
}

/// Snapshot of the environment variables the server cares about, captured
/// once so that resolution stays a pure function (and testable without
/// mutating the process environment).
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub system_instructions: Option<String>,
    pub debug: bool,
    pub endpoint: Option<String>,
    pub model: Option<String>,
    pub api_key: Option<String>,
}

impl EnvOverrides {
    pub fn capture() -> Self {
        Self {
            system_instructions: std::env::var(SYSTEM_INSTRUCTIONS_ENV).ok(),
            // Presence alone enables debug; the value is ignored.
            debug: std::env::var_os(DEBUG_ENV).is_some(),
            endpoint: std::env::var(ENDPOINT_ENV).ok(),
            model: std::env::var(MODEL_ENV).ok(),
            api_key: std::env::var(API_KEY_ENV).ok(),
        }
    }
}

impl ServerConfig {
    /// Resolve configuration from CLI-supplied values and the live
    /// environment. Never fails; every setting has a default.
    pub fn new(
        system_instructions: Option<String>,
        debug: bool,
        endpoint: Option<String>,
        model: Option<String>,
    ) -> Self {
        Self::from_parts(
            system_instructions,
            debug,
            endpoint,
            model,
            EnvOverrides::capture(),
        )
    }

    /// Resolution order: explicit CLI value, then environment, then default.
    pub fn from_parts(
        system_instructions: Option<String>,
        debug: bool,
        endpoint: Option<String>,
        model: Option<String>,
        env: EnvOverrides,
    ) -> Self {
        Self {
            system_instructions: system_instructions
                .or(env.system_instructions)
                .unwrap_or_else(|| DEFAULT_SYSTEM_INSTRUCTIONS.to_string()),
            debug: debug || env.debug,
            server_name: env!("CARGO_PKG_NAME").to_string(),
            server_version: env!("CARGO_PKG_VERSION").to_string(),
            endpoint: endpoint
                .or(env.endpoint)
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            model: model.or(env.model).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_key: env.api_key,
        }
    }
}
