use thiserror::Error;

use super::features::FieldIssue;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    /// Bad, missing, or out-of-range input. Client-facing and names every
    /// offending field, not just the first.
    #[error("Validation failed: {}", format_fields(.fields))]
    Validation { fields: Vec<FieldIssue> },

    #[error("Not found: {message}")]
    NotFound { message: String },

    /// A registry snapshot is missing a required primary descriptor. Raised
    /// at build/swap time only, never on a per-request path.
    #[error("Model unavailable: {message}")]
    ModelUnavailable { message: String },

    /// The assigned model and its one fallback both produced invalid output.
    #[error("Inference failed: {message}")]
    InferenceFailure { message: String },

    /// Embedding provider unreachable. The search path handles this by
    /// degrading to filter-only ranking.
    #[error("Search index unavailable: {message}")]
    SearchIndexUnavailable { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

fn format_fields(fields: &[FieldIssue]) -> String {
    fields
        .iter()
        .map(|f| format!("{}: {}", f.field, f.issue))
        .collect::<Vec<_>>()
        .join("; ")
}

impl DomainError {
    pub fn validation(fields: Vec<FieldIssue>) -> Self {
        Self::Validation { fields }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn model_unavailable(message: impl Into<String>) -> Self {
        Self::ModelUnavailable {
            message: message.into(),
        }
    }

    pub fn inference_failure(message: impl Into<String>) -> Self {
        Self::InferenceFailure {
            message: message.into(),
        }
    }

    pub fn search_index_unavailable(message: impl Into<String>) -> Self {
        Self::SearchIndexUnavailable {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Validation errors are returned to callers verbatim; everything else
    /// is surfaced as a generic failure.
    pub fn is_client_facing(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_names_every_field() {
        let error = DomainError::validation(vec![
            FieldIssue::new("memory_gb", "value -5 outside domain [1, 24]"),
            FieldIssue::new("brand", "missing required field"),
        ]);

        let message = error.to_string();
        assert!(message.contains("memory_gb"));
        assert!(message.contains("brand"));
    }

    #[test]
    fn test_inference_failure_display() {
        let error = DomainError::inference_failure("assigned model and fallback both invalid");
        assert!(error.to_string().starts_with("Inference failed"));
    }

    #[test]
    fn test_client_facing_classification() {
        assert!(DomainError::validation(vec![]).is_client_facing());
        assert!(!DomainError::inference_failure("oops").is_client_facing());
        assert!(!DomainError::internal("oops").is_client_facing());
    }
}
