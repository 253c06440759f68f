//! Validation error payloads.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A tagged validation failure carrying a field-name to message mapping.
///
/// Raised locally before any network call (empty batch, missing identifiers)
/// and parsed from server validation responses. Never retried.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Field name mapped to the human-readable message for that field.
    pub fields: BTreeMap<String, String>,
}

impl ValidationError {
    /// Creates an empty validation error.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a validation error for a single field.
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new().with_field(field, message)
    }

    /// Adds a field message to this error.
    pub fn with_field(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.fields.insert(field.into(), message.into());
        self
    }

    /// Returns the message recorded for a field, if any.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Returns whether no field messages are present.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.fields.is_empty() {
            return write!(f, "validation failed");
        }
        write!(f, "validation failed: ")?;
        let mut first = true;
        for (field, message) in &self.fields {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}
