//! Turns rule failures into register entries.

use core::fmt::Display;

use saftpt_core::{ErrorRegister, ValidationError};

use crate::config::ValidationConfig;
use crate::rules::{MessageCatalog, Rule, Severity, format_message, template};

/// Formats findings through the catalog and appends them to the register,
/// dropping rules whose group is switched off.
pub struct Reporter<'a> {
    register: &'a ErrorRegister,
    catalog: &'a dyn MessageCatalog,
    config: ValidationConfig,
}

impl<'a> Reporter<'a> {
    pub fn new(
        register: &'a ErrorRegister,
        catalog: &'a dyn MessageCatalog,
        config: ValidationConfig,
    ) -> Self {
        Self {
            register,
            catalog,
            config,
        }
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    pub fn is_enabled(&self, rule: Rule) -> bool {
        self.config.is_enabled(rule.group())
    }

    /// Record `rule` about `document` with positional message arguments.
    pub fn report(&self, rule: Rule, document: Option<&str>, args: &[&dyn Display]) {
        if !self.is_enabled(rule) {
            return;
        }
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        let message = format_message(&template(self.catalog, rule), &args);
        match rule.severity() {
            Severity::Error => self.register.add_validation_error(ValidationError {
                code: rule.key().to_string(),
                document: document.map(str::to_string),
                message,
            }),
            Severity::Warning => self.register.add_warning(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::BuiltinCatalog;

    #[test]
    fn disabled_groups_are_dropped() {
        let register = ErrorRegister::new();
        let config = ValidationConfig {
            tax: false,
            ..ValidationConfig::default()
        };
        let reporter = Reporter::new(&register, &BuiltinCatalog, config);

        reporter.report(Rule::TaxMissing, Some("FT A/1"), &[&"FT A/1", &1]);
        assert!(!register.has_errors());

        reporter.report(Rule::DebitAndCredit, Some("FT A/1"), &[&"FT A/1", &1]);
        let errors = register.validation_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, "debit_and_credit");
        assert_eq!(errors[0].document.as_deref(), Some("FT A/1"));
        assert_eq!(errors[0].message, "FT A/1: line 1 declares both DebitAmount and CreditAmount");
    }

    #[test]
    fn warnings_go_to_the_warning_category() {
        let register = ErrorRegister::new();
        let reporter = Reporter::new(&register, &BuiltinCatalog, ValidationConfig::default());
        reporter.report(Rule::FieldMalformed, Some("FT A/1"), &[&"FT A/1", &"GrossTotal", &"1,0"]);
        assert!(!register.has_errors());
        assert_eq!(register.warnings().len(), 1);
    }
}
