//! Reply normalization and parsing.

use crate::errors::{AnalysisError, IntentResult};
use crate::types::analysis::ActionReport;

const FENCE_OPENER: &str = "```json";

/// Removes a Markdown code fence labelled `json` from a model reply.
///
/// Only replies starting with "```json" are touched. Trimming works on
/// characters, not on the literal markers: every leading and trailing
/// backtick, newline, `j`, `s`, `o` and `n` goes first, then any remaining
/// edge backticks. A payload whose own edges use those characters loses them.
pub fn strip_code_fence(reply: &str) -> &str {
    if !reply.starts_with(FENCE_OPENER) {
        return reply;
    }

    reply
        .trim_matches(|c| matches!(c, '`' | 'j' | 's' | 'o' | 'n' | '\n'))
        .trim_matches('`')
}

/// Strips any fence from `reply` and parses it as an [`ActionReport`].
///
/// Keys other than `current_action` are ignored.
pub fn parse_action_report(reply: &str) -> IntentResult<ActionReport> {
    let body = strip_code_fence(reply);
    serde_json::from_str(body)
        .map_err(|e| AnalysisError::malformed(format!("Reply is not the expected JSON: {}", e)))
}
