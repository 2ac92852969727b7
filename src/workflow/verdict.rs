//! Structured proofreading verdict.
//!
//! The proofreader asks the chat service for JSON matching
//! [`ProofreadVerdict::response_schema`] and validates the reply here.

use serde::{Deserialize, Serialize};

use crate::ai::ResponseSchema;

/// Name the verdict schema is registered under.
pub const VERDICT_SCHEMA_NAME: &str = "proofreading_response";

/// Outcome of proofreading one draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProofreadVerdict {
    /// Whether the draft is fit for publishing
    pub meets_expectations: bool,
    /// Why the draft does or does not meet expectations
    pub explanation: String,
    /// Suggested changes, empty when there are none
    pub suggestions: Vec<String>,
}

/// The chat service reply did not match the verdict schema.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Proofreading response does not match schema: {reason}")]
pub struct ParseError {
    pub reason: String,
}

impl ProofreadVerdict {
    /// Verdict that passes the draft.
    pub fn approve(explanation: impl Into<String>) -> Self {
        Self { meets_expectations: true, explanation: explanation.into(), suggestions: Vec::new() }
    }

    /// Verdict that sends the draft back with suggestions.
    pub fn reject(explanation: impl Into<String>, suggestions: Vec<String>) -> Self {
        Self { meets_expectations: false, explanation: explanation.into(), suggestions }
    }

    /// JSON schema sent with the proofreading request.
    pub fn response_schema() -> ResponseSchema {
        ResponseSchema::new(
            VERDICT_SCHEMA_NAME,
            serde_json::json!({
                "type": "object",
                "properties": {
                    "meets_expectations": {
                        "type": "boolean",
                        "description": "Specifies if the proposed docs meet the standards for publishing."
                    },
                    "explanation": {
                        "type": "string",
                        "description": "Why the documentation does or does not meet expectations."
                    },
                    "suggestions": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Suggestions for improvement, empty if there are none."
                    }
                },
                "required": ["meets_expectations", "explanation", "suggestions"],
                "additionalProperties": false
            }),
        )
    }

    /// Parse a raw chat reply.
    ///
    /// Accepts the bare JSON object, optionally wrapped in a Markdown code
    /// fence. Missing, mistyped or unknown fields are rejected.
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let body = strip_code_fence(raw.trim());
        if body.is_empty() {
            return Err(ParseError { reason: "empty response".to_string() });
        }

        serde_json::from_str(body).map_err(|e| ParseError { reason: e.to_string() })
    }

    /// Suggestions joined with `separator`.
    pub fn joined_suggestions(&self, separator: &str) -> String {
        self.suggestions.join(separator)
    }

    /// "Pass" or "Fail".
    pub fn grade(&self) -> &'static str {
        if self.meets_expectations {
            "Pass"
        } else {
            "Fail"
        }
    }
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };

    // Drop the info string ("json") on the opening fence line
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_approved() {
        let verdict = ProofreadVerdict::parse(
            r#"{"meets_expectations": true, "explanation": "Looks great", "suggestions": []}"#,
        )
        .unwrap();
        assert_eq!(verdict, ProofreadVerdict::approve("Looks great"));
        assert_eq!(verdict.grade(), "Pass");
    }

    #[test]
    fn test_parse_rejected() {
        let verdict = ProofreadVerdict::parse(
            r#"{"meets_expectations": false, "explanation": "Spelling error", "suggestions": ["Fix typo", "Shorten intro"]}"#,
        )
        .unwrap();
        assert!(!verdict.meets_expectations);
        assert_eq!(verdict.grade(), "Fail");
        assert_eq!(verdict.joined_suggestions("\n"), "Fix typo\nShorten intro");
    }

    #[test]
    fn test_parse_fenced_json() {
        let raw = "```json\n{\"meets_expectations\": true, \"explanation\": \"ok\", \"suggestions\": []}\n```";
        assert!(ProofreadVerdict::parse(raw).unwrap().meets_expectations);
    }

    #[test]
    fn test_parse_rejects_missing_field() {
        let err = ProofreadVerdict::parse(r#"{"meets_expectations": true, "explanation": "ok"}"#)
            .unwrap_err();
        assert!(err.reason.contains("suggestions"));
    }

    #[test]
    fn test_parse_rejects_wrong_type_and_extra_fields() {
        assert!(ProofreadVerdict::parse(
            r#"{"meets_expectations": "yes", "explanation": "ok", "suggestions": []}"#
        )
        .is_err());
        assert!(ProofreadVerdict::parse(
            r#"{"meets_expectations": true, "explanation": "ok", "suggestions": [], "score": 9}"#
        )
        .is_err());
    }

    #[test]
    fn test_parse_rejects_prose() {
        assert!(ProofreadVerdict::parse("The documentation looks good to me!").is_err());
        assert!(ProofreadVerdict::parse("   ").is_err());
        assert!(ProofreadVerdict::parse("```json\n```").is_err());
    }

    #[test]
    fn test_schema_lists_every_field() {
        let schema = ProofreadVerdict::response_schema();
        assert_eq!(schema.name, VERDICT_SCHEMA_NAME);

        let required = schema.schema["required"].as_array().unwrap();
        assert_eq!(required.len(), 3);
        assert_eq!(schema.schema["additionalProperties"], false);
    }
}
