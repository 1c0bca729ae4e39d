use saftpt_documents::AuditFile;

/// Structural (XSD) validation of a rendered file.
///
/// Rendering and the schema itself live outside this crate. Whatever a
/// validator returns lands in the register's schema category.
pub trait SchemaValidator: Send + Sync {
    fn validate(&self, audit: &AuditFile) -> Vec<String>;
}

impl<F> SchemaValidator for F
where
    F: Fn(&AuditFile) -> Vec<String> + Send + Sync,
{
    fn validate(&self, audit: &AuditFile) -> Vec<String> {
        self(audit)
    }
}
