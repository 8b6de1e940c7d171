//! Validation of raw tool-call arguments into a typed generation request.

use std::ops::RangeInclusive;

use serde_json::{Map, Value};

use crate::error::ServerError;

/// Sampling temperature applied when the caller does not supply one.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Accepted temperature interval, bounds inclusive.
pub const TEMPERATURE_RANGE: RangeInclusive<f64> = 0.0..=1.0;

/// One validated tool invocation: prompt plus sampling parameters. Created
/// per inbound call and discarded once the response is produced.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub temperature: f64,
    pub max_tokens: Option<u32>,
}

impl GenerationRequest {
    /// Convert the untyped argument bag of a `tools/call` request into a
    /// range-checked request. Pure; rejects malformed input before any
    /// backend call is made.
    pub fn from_arguments(
        arguments: Option<&Map<String, Value>>,
    ) -> Result<Self, ServerError> {
        let prompt = arguments
            .and_then(|args| args.get("prompt"))
            .and_then(Value::as_str)
            .ok_or_else(|| ServerError::InvalidParameter("prompt is required".into()))?;
        if prompt.is_empty() {
            return Err(ServerError::InvalidParameter("Prompt cannot be empty".into()));
        }

        let temperature = match arguments.and_then(|args| args.get("temperature")) {
            Some(value) => value.as_f64().ok_or_else(|| {
                ServerError::InvalidParameter("temperature must be a number".into())
            })?,
            None => DEFAULT_TEMPERATURE,
        };
        if !TEMPERATURE_RANGE.contains(&temperature) {
            return Err(ServerError::InvalidParameter(format!(
                "Temperature must be between {} and {}",
                TEMPERATURE_RANGE.start(),
                TEMPERATURE_RANGE.end()
            )));
        }

        let max_tokens = match arguments.and_then(|args| args.get("max_tokens")) {
            Some(value) => {
                let tokens = value.as_i64().ok_or_else(|| {
                    ServerError::InvalidParameter("max_tokens must be an integer".into())
                })?;
                if tokens <= 0 {
                    return Err(ServerError::InvalidParameter(
                        "Max tokens must be positive".into(),
                    ));
                }
                Some(u32::try_from(tokens).map_err(|_| {
                    ServerError::InvalidParameter("max_tokens is out of range".into())
                })?)
            }
            None => None,
        };

        Ok(Self {
            prompt: prompt.to_string(),
            temperature,
            max_tokens,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn valid_arguments_echo_through() {
        let args = args(json!({
            "prompt": "Write a haiku about autumn",
            "temperature": 0.3,
            "max_tokens": 128
        }));
        let request = GenerationRequest::from_arguments(Some(&args)).unwrap();
        assert_eq!(request.prompt, "Write a haiku about autumn");
        assert_eq!(request.temperature, 0.3);
        assert_eq!(request.max_tokens, Some(128));
    }

    #[test]
    fn temperature_defaults_when_absent() {
        let args = args(json!({"prompt": "hello"}));
        let request = GenerationRequest::from_arguments(Some(&args)).unwrap();
        assert_eq!(request.temperature, DEFAULT_TEMPERATURE);
        assert_eq!(request.max_tokens, None);
    }

    #[test]
    fn missing_prompt_is_rejected() {
        let err = GenerationRequest::from_arguments(None).unwrap_err();
        assert!(matches!(err, ServerError::InvalidParameter(_)));
        assert!(err.to_string().contains("prompt is required"));

        let args = args(json!({"temperature": 0.5}));
        let err = GenerationRequest::from_arguments(Some(&args)).unwrap_err();
        assert!(err.to_string().contains("prompt is required"));
    }

    #[test]
    fn empty_prompt_is_rejected_regardless_of_other_fields() {
        let args = args(json!({"prompt": "", "temperature": 0.5, "max_tokens": 10}));
        let err = GenerationRequest::from_arguments(Some(&args)).unwrap_err();
        assert!(matches!(err, ServerError::InvalidParameter(_)));
        assert!(err.to_string().contains("Prompt cannot be empty"));
    }

    #[test]
    fn temperature_bounds_are_inclusive() {
        for temp in [0.0, 1.0] {
            let args = args(json!({"prompt": "hi", "temperature": temp}));
            let request = GenerationRequest::from_arguments(Some(&args)).unwrap();
            assert_eq!(request.temperature, temp);
        }
        for temp in [-0.01, 1.01] {
            let args = args(json!({"prompt": "hi", "temperature": temp}));
            let err = GenerationRequest::from_arguments(Some(&args)).unwrap_err();
            assert!(matches!(err, ServerError::InvalidParameter(_)));
        }
    }

    #[test]
    fn non_numeric_temperature_is_rejected() {
        let args = args(json!({"prompt": "hi", "temperature": "warm"}));
        let err = GenerationRequest::from_arguments(Some(&args)).unwrap_err();
        assert!(err.to_string().contains("temperature must be a number"));
    }

    #[test]
    fn max_tokens_must_be_positive() {
        for tokens in [0, -1, -100] {
            let args = args(json!({"prompt": "hi", "max_tokens": tokens}));
            let err = GenerationRequest::from_arguments(Some(&args)).unwrap_err();
            assert!(matches!(err, ServerError::InvalidParameter(_)));
        }

        let args = args(json!({"prompt": "hi", "max_tokens": 1}));
        let request = GenerationRequest::from_arguments(Some(&args)).unwrap();
        assert_eq!(request.max_tokens, Some(1));
    }

    #[test]
    fn fractional_max_tokens_is_rejected() {
        let args = args(json!({"prompt": "hi", "max_tokens": 1.5}));
        let err = GenerationRequest::from_arguments(Some(&args)).unwrap_err();
        assert!(err.to_string().contains("max_tokens must be an integer"));
    }
}
