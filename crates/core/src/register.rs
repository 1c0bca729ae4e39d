//! The shared diagnostic sink of an audit file.
//!
//! Every stage that touches the tree (entity setters, XML building, schema
//! validation, business rules) appends here. Nothing is ever removed except
//! by [`ErrorRegister::clear_all_errors`], which callers use to re-run the
//! engine under a different configuration.

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

/// One business-rule finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Stable message key of the rule that failed.
    pub code: String,
    /// Document the finding is about, when there is one.
    pub document: Option<String>,
    /// Message rendered from the catalog template.
    pub message: String,
}

impl core::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match &self.document {
            Some(doc) => write!(f, "[{}] {}: {}", self.code, doc, self.message),
            None => write!(f, "[{}] {}", self.code, self.message),
        }
    }
}

/// Point-in-time copy of every category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub on_set_value: Vec<String>,
    pub on_create_xml_node: Vec<String>,
    pub lib_xml: Vec<String>,
    pub validation: Vec<ValidationError>,
    pub warnings: Vec<String>,
}

impl ErrorReport {
    /// Warnings never count as errors.
    pub fn has_errors(&self) -> bool {
        !(self.on_set_value.is_empty()
            && self.on_create_xml_node.is_empty()
            && self.lib_xml.is_empty()
            && self.validation.is_empty())
    }
}

/// Append-only multiset of findings keyed by category.
///
/// Appends go through a mutex so independent series can be checked from
/// several threads against the same register.
#[derive(Debug, Default)]
pub struct ErrorRegister {
    inner: Mutex<ErrorReport>,
}

impl ErrorRegister {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ErrorReport> {
        // A panicking appender cannot leave a Vec half-pushed.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// A setter rejected a value (message key of the field).
    pub fn add_on_set_value(&self, key: impl Into<String>) {
        self.lock().on_set_value.push(key.into());
    }

    /// A node could not be rendered (message key of the node).
    pub fn add_on_create_xml_node(&self, key: impl Into<String>) {
        self.lock().on_create_xml_node.push(key.into());
    }

    /// Structural (schema) error text from the XML library.
    pub fn add_lib_xml_error(&self, text: impl Into<String>) {
        self.lock().lib_xml.push(text.into());
    }

    pub fn add_validation_error(&self, error: ValidationError) {
        tracing::debug!(code = %error.code, document = ?error.document, "validation finding");
        self.lock().validation.push(error);
    }

    pub fn add_warning(&self, text: impl Into<String>) {
        self.lock().warnings.push(text.into());
    }

    pub fn has_errors(&self) -> bool {
        self.lock().has_errors()
    }

    pub fn on_set_value(&self) -> Vec<String> {
        self.lock().on_set_value.clone()
    }

    pub fn on_create_xml_node(&self) -> Vec<String> {
        self.lock().on_create_xml_node.clone()
    }

    pub fn lib_xml_errors(&self) -> Vec<String> {
        self.lock().lib_xml.clone()
    }

    pub fn validation_errors(&self) -> Vec<ValidationError> {
        self.lock().validation.clone()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.lock().warnings.clone()
    }

    pub fn report(&self) -> ErrorReport {
        self.lock().clone()
    }

    pub fn clear_all_errors(&self) {
        *self.lock() = ErrorReport::default();
    }
}
