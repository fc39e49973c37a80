//! Analysis result types.

use serde::{Deserialize, Serialize};

use crate::errors::AnalysisError;

/// Message reported when the screenshot could not be encoded.
pub const ENCODING_FAILED_MESSAGE: &str = "이미지 인코딩에 실패했습니다.";

/// Prefix for every failure after encoding succeeded.
pub const API_ERROR_PREFIX: &str = "API 호출 중 오류 발생";

/// The model's structured answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionReport {
    /// Korean paragraph describing what the user is doing.
    pub current_action: String,
}

/// Outcome of one analysis, serialized as exactly one of
/// `{"current_action": ...}` or `{"error": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalysisResult {
    /// The model described the user's current action.
    Success {
        /// Description of the inferred action.
        current_action: String,
    },
    /// Something failed along the way.
    Failure {
        /// Human-readable failure description.
        error: String,
    },
}

impl AnalysisResult {
    /// Converts an error into the user-facing failure shape.
    ///
    /// Encoding failures get a fixed message; everything else is reported as
    /// an API call failure with the error's description.
    pub fn from_error(err: &AnalysisError) -> Self {
        let error = match err {
            AnalysisError::EncodingFailed
            | AnalysisError::FileNotFound { .. }
            | AnalysisError::ImageRead { .. } => ENCODING_FAILED_MESSAGE.to_string(),
            other => format!("{}: {}", API_ERROR_PREFIX, other),
        };
        AnalysisResult::Failure { error }
    }

    /// Returns true for the success shape.
    pub fn is_success(&self) -> bool {
        matches!(self, AnalysisResult::Success { .. })
    }

    /// Returns the described action, if any.
    pub fn current_action(&self) -> Option<&str> {
        match self {
            AnalysisResult::Success { current_action } => Some(current_action),
            AnalysisResult::Failure { .. } => None,
        }
    }

    /// Returns the failure description, if any.
    pub fn error(&self) -> Option<&str> {
        match self {
            AnalysisResult::Failure { error } => Some(error),
            AnalysisResult::Success { .. } => None,
        }
    }

    /// Pretty-prints the result as two-space indented JSON.
    ///
    /// Non-ASCII text is written as-is, not as `\u` escapes.
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl From<ActionReport> for AnalysisResult {
    fn from(report: ActionReport) -> Self {
        AnalysisResult::Success {
            current_action: report.current_action,
        }
    }
}

impl From<Result<ActionReport, AnalysisError>> for AnalysisResult {
    fn from(result: Result<ActionReport, AnalysisError>) -> Self {
        match result {
            Ok(report) => report.into(),
            Err(err) => AnalysisResult::from_error(&err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_success_serializes_to_single_key() {
        let result = AnalysisResult::Success {
            current_action: "설명".to_string(),
        };

        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"current_action": "설명"})
        );
        assert!(result.is_success());
        assert_eq!(result.current_action(), Some("설명"));
        assert_eq!(result.error(), None);
    }

    #[test]
    fn test_failure_serializes_to_single_key() {
        let result = AnalysisResult::Failure {
            error: "boom".to_string(),
        };

        assert_eq!(serde_json::to_value(&result).unwrap(), json!({"error": "boom"}));
        assert!(!result.is_success());
    }

    #[test]
    fn test_encoding_failure_message() {
        let result = AnalysisResult::from_error(&AnalysisError::EncodingFailed);
        assert_eq!(result.error(), Some(ENCODING_FAILED_MESSAGE));
    }

    #[test]
    fn test_api_failure_message_carries_description() {
        let result = AnalysisResult::from_error(&AnalysisError::Transport {
            message: "connection reset".to_string(),
        });

        let error = result.error().unwrap();
        assert!(error.starts_with(API_ERROR_PREFIX));
        assert!(error.contains("connection reset"));
    }

    #[test]
    fn test_pretty_json_keeps_korean_unescaped() {
        let result = AnalysisResult::Success {
            current_action: "사용자가 브라우저에서 문서를 작성하고 있습니다.".to_string(),
        };

        let pretty = result.to_pretty_json().unwrap();
        assert_eq!(
            pretty,
            "{\n  \"current_action\": \"사용자가 브라우저에서 문서를 작성하고 있습니다.\"\n}"
        );
        assert!(!pretty.contains("\\u"));
    }

    #[test]
    fn test_round_trips_through_json() {
        let parsed: AnalysisResult = serde_json::from_str(r#"{"error": "x"}"#).unwrap();
        assert_eq!(
            parsed,
            AnalysisResult::Failure {
                error: "x".to_string()
            }
        );
    }

    #[test]
    fn test_from_result() {
        let ok = AnalysisResult::from(Ok::<_, AnalysisError>(ActionReport {
            current_action: "typing".to_string(),
        }));
        assert_eq!(ok.current_action(), Some("typing"));

        let err = AnalysisResult::from(Err::<ActionReport, _>(AnalysisError::malformed("bad")));
        assert!(err.error().unwrap().contains("bad"));
    }
}
