use crate::card::response::MalformedResponse;
use crate::card::schema::SchemaViolation;

/// The external model call failed before producing usable text.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("request timed out")]
    Timeout,
    #[error("provider returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("provider returned no text (finish reason: {})", finish_reason.as_deref().unwrap_or("unknown"))]
    EmptyCandidates { finish_reason: Option<String> },
    #[error("request was cancelled")]
    Cancelled,
}

impl TransportError {
    /// Fold reqwest's timeout flag into the dedicated variant.
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else {
            TransportError::Http(err)
        }
    }
}

/// Why a card could not be produced.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("no API key supplied and no default key configured")]
    NoCredential,
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    MalformedResponse(#[from] MalformedResponse),
    #[error("generated card does not match the card schema at {0}")]
    SchemaViolation(#[from] SchemaViolation),
}

/// Discriminant of [`GenerationError`] for logging and metrics labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationErrorKind {
    NoCredential,
    Transport,
    MalformedResponse,
    SchemaViolation,
}

impl GenerationErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationErrorKind::NoCredential => "no_credential",
            GenerationErrorKind::Transport => "transport",
            GenerationErrorKind::MalformedResponse => "malformed_response",
            GenerationErrorKind::SchemaViolation => "schema_violation",
        }
    }
}

impl GenerationError {
    pub fn kind(&self) -> GenerationErrorKind {
        match self {
            GenerationError::NoCredential => GenerationErrorKind::NoCredential,
            GenerationError::Transport(_) => GenerationErrorKind::Transport,
            GenerationError::MalformedResponse(_) => GenerationErrorKind::MalformedResponse,
            GenerationError::SchemaViolation(_) => GenerationErrorKind::SchemaViolation,
        }
    }

    /// The one message shown to end users regardless of kind.
    pub fn user_message(&self) -> &'static str {
        "Could not generate a card from this photo. Please try again."
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, GenerationError::Transport(TransportError::Cancelled))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_distinct() {
        let malformed = GenerationError::from(MalformedResponse {
            reason: "eof".to_string(),
            text: String::new(),
        });
        let violation = GenerationError::from(SchemaViolation {
            path: "category".to_string(),
            reason: "bad".to_string(),
        });
        assert_eq!(malformed.kind(), GenerationErrorKind::MalformedResponse);
        assert_eq!(violation.kind(), GenerationErrorKind::SchemaViolation);
        assert_eq!(malformed.user_message(), violation.user_message());
    }

    #[test]
    fn schema_violation_message_names_path() {
        let err = GenerationError::from(SchemaViolation {
            path: "stats.Zoomies.value".to_string(),
            reason: "expected number or string, got boolean".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "generated card does not match the card schema at stats.Zoomies.value: expected number or string, got boolean"
        );
    }

    #[test]
    fn empty_candidates_message_includes_reason() {
        let err = TransportError::EmptyCandidates {
            finish_reason: Some("SAFETY".to_string()),
        };
        assert_eq!(err.to_string(), "provider returned no text (finish reason: SAFETY)");
    }
}
