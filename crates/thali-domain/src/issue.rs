//! Validation issues attached to candidate records

use crate::observation::FieldKind;
use serde::{Deserialize, Serialize};

/// How serious a validation issue is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The record cannot be confidently merged; it is excluded from
    /// resolution but still retained and reported
    Fatal,
    /// A quality problem that degrades the score but does not exclude
    /// the record
    Warning,
}

/// A single validation finding
///
/// Issues describe a candidate record; they never mutate the underlying
/// observations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// The field the issue concerns, if any (record-level issues have none)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<FieldKind>,

    /// Severity of the issue
    pub severity: Severity,

    /// Stable machine-readable code (e.g. "missing_name")
    pub code: String,

    /// Human-readable description
    pub message: String,
}

impl ValidationIssue {
    /// Create a fatal issue
    pub fn fatal(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: None,
            severity: Severity::Fatal,
            code: code.into(),
            message: message.into(),
        }
    }

    /// Create a warning issue
    pub fn warning(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: None,
            severity: Severity::Warning,
            code: code.into(),
            message: message.into(),
        }
    }

    /// Attach the field the issue concerns
    pub fn with_field(mut self, field: FieldKind) -> Self {
        self.field = Some(field);
        self
    }

    /// Whether the issue is fatal
    pub fn is_fatal(&self) -> bool {
        self.severity == Severity::Fatal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_builders() {
        let issue = ValidationIssue::fatal("missing_name", "record has no name");
        assert!(issue.is_fatal());
        assert!(issue.field.is_none());

        let issue = ValidationIssue::warning("phone_format", "phone not in +91 format")
            .with_field(FieldKind::Phone);
        assert!(!issue.is_fatal());
        assert_eq!(issue.field, Some(FieldKind::Phone));
    }

    #[test]
    fn test_severity_serialization() {
        assert_eq!(serde_json::to_value(Severity::Fatal).unwrap(), "fatal");
        assert_eq!(serde_json::to_value(Severity::Warning).unwrap(), "warning");
    }
}
