//! Diagnostics emitted by process validation.
//!
//! A [`Diagnostic`] is a single validation finding with a [`Severity`],
//! a human-readable message, and an optional element scope. Validation
//! never fails; callers inspect the returned diagnostics and decide policy
//! (e.g. refusing deployment while any error-severity finding is present).

use std::fmt;

use serde::{Deserialize, Serialize};

/// The severity level of a diagnostic.
///
/// - [`Severity::Error`] indicates a blocking semantic problem
/// - [`Severity::Warning`] indicates an advisory issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// A blocking semantic problem that must be fixed before deployment.
    Error,

    /// A non-fatal finding about a questionable construct.
    Warning,
}

impl Severity {
    /// Returns `true` if this is an error severity.
    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Error)
    }

    /// Returns `true` if this is a warning severity.
    pub fn is_warning(&self) -> bool {
        matches!(self, Severity::Warning)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A single validation finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    severity: Severity,
    message: String,
    element_id: Option<String>,
}

impl Diagnostic {
    /// Create an error-severity diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            element_id: None,
        }
    }

    /// Create a warning-severity diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            element_id: None,
        }
    }

    /// Scope this diagnostic to a specific element.
    pub fn for_element(mut self, element_id: impl Into<String>) -> Self {
        self.element_id = Some(element_id.into());
        self
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The element this finding is scoped to, if any; `None` for
    /// process-level findings.
    pub fn element_id(&self) -> Option<&str> {
        self.element_id.as_deref()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_predicates() {
        assert!(Severity::Error.is_error());
        assert!(!Severity::Error.is_warning());
        assert!(Severity::Warning.is_warning());
    }

    #[test]
    fn test_severity_display() {
        assert_eq!(Severity::Error.to_string(), "error");
        assert_eq!(Severity::Warning.to_string(), "warning");
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::error("Process must have at least one start event");
        assert_eq!(
            diag.to_string(),
            "error: Process must have at least one start event"
        );
        assert_eq!(diag.element_id(), None);
    }

    #[test]
    fn test_diagnostic_element_scope() {
        let diag = Diagnostic::warning("Exclusive gateway should have conditions on outgoing flows")
            .for_element("Gateway_1");
        assert_eq!(diag.element_id(), Some("Gateway_1"));
        assert!(diag.severity().is_warning());
    }
}
