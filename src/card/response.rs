//! Turning the model's free text into JSON.
//!
//! Models wrap JSON in markdown fences even when told not to. The repair here
//! is deliberately narrow: trim, drop one leading fence line (with or without
//! a language tag) and one trailing fence, then parse. Anything else is the
//! model's problem and surfaces as [`MalformedResponse`].

use serde_json::Value;

const FENCE: &str = "```";

/// The model's text could not be parsed as JSON.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("model response is not valid JSON: {reason}")]
pub struct MalformedResponse {
    pub reason: String,
    /// The cleaned text that failed to parse.
    pub text: String,
}

/// Strip a surrounding markdown code fence, if present.
///
/// ```
/// use mythicard::card::response::strip_code_fences;
///
/// assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
/// assert_eq!(strip_code_fences("```\n{\"a\":1}```"), "{\"a\":1}");
/// assert_eq!(strip_code_fences("  {\"a\":1}  "), "{\"a\":1}");
/// ```
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(after_open) = trimmed.strip_prefix(FENCE) else {
        return trimmed;
    };

    // The rest of the opening line is a language tag ("json", "JSON", ...)
    // unless it already holds content.
    let body = match after_open.find('\n') {
        Some(newline) if is_language_tag(&after_open[..newline]) => &after_open[newline + 1..],
        _ => after_open.strip_prefix("json").unwrap_or(after_open),
    };

    body.trim()
        .strip_suffix(FENCE)
        .unwrap_or(body)
        .trim()
}

fn is_language_tag(line: &str) -> bool {
    line.trim().chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Strip fences and parse the remainder as JSON.
pub fn parse_model_json(text: &str) -> Result<Value, MalformedResponse> {
    let cleaned = strip_code_fences(text);
    if cleaned.is_empty() {
        return Err(MalformedResponse {
            reason: "response was empty".to_string(),
            text: String::new(),
        });
    }
    serde_json::from_str(cleaned).map_err(|err| MalformedResponse {
        reason: err.to_string(),
        text: cleaned.to_string(),
    })
}
