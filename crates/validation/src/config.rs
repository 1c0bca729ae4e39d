//! Which rule groups a validation pass runs.
//!
//! A plain value: every switch is independent, and a switch missing from a
//! config file keeps its historical default (everything on).

use serde::{Deserialize, Serialize};

use crate::rules::RuleGroup;

fn enabled() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Structural (XSD) validation through the attached schema validator.
    #[serde(default = "enabled")]
    pub schema_validate: bool,

    /// Hash-chain verification. Off also lifts the public-key requirement.
    #[serde(default = "enabled")]
    pub sign_validation: bool,

    /// Document/line numbering: unparsable, duplicate and missing numbers.
    #[serde(default = "enabled")]
    pub numbering: bool,

    /// Line, document and table totals.
    #[serde(default = "enabled")]
    pub totals: bool,

    /// Table columns that must stay zero.
    #[serde(default = "enabled")]
    pub zero_column: bool,

    /// Date ordering inside a series, file period, status dates.
    #[serde(default = "enabled")]
    pub temporal: bool,

    #[serde(default = "enabled")]
    pub tax: bool,

    #[serde(default = "enabled")]
    pub debit_credit: bool,

    /// Customers, suppliers, products and document references.
    #[serde(default = "enabled")]
    pub references: bool,

    #[serde(default = "enabled")]
    pub shipment: bool,

    #[serde(default = "enabled")]
    pub payments: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            schema_validate: true,
            sign_validation: true,
            numbering: true,
            totals: true,
            zero_column: true,
            temporal: true,
            tax: true,
            debit_credit: true,
            references: true,
            shipment: true,
            payments: true,
        }
    }
}

impl ValidationConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    pub fn with_sign_validation(mut self, on: bool) -> Self {
        self.sign_validation = on;
        self
    }

    pub fn with_schema_validate(mut self, on: bool) -> Self {
        self.schema_validate = on;
        self
    }

    /// Turn one rule group on or off.
    pub fn with_group(mut self, group: RuleGroup, on: bool) -> Self {
        match group {
            RuleGroup::Fields => {}
            RuleGroup::Signature => self.sign_validation = on,
            RuleGroup::Numbering => self.numbering = on,
            RuleGroup::Totals => self.totals = on,
            RuleGroup::ZeroColumn => self.zero_column = on,
            RuleGroup::Temporal => self.temporal = on,
            RuleGroup::Tax => self.tax = on,
            RuleGroup::DebitCredit => self.debit_credit = on,
            RuleGroup::References => self.references = on,
            RuleGroup::Shipment => self.shipment = on,
            RuleGroup::Payments => self.payments = on,
        }
        self
    }

    pub fn is_enabled(&self, group: RuleGroup) -> bool {
        match group {
            RuleGroup::Fields => true,
            RuleGroup::Signature => self.sign_validation,
            RuleGroup::Numbering => self.numbering,
            RuleGroup::Totals => self.totals,
            RuleGroup::ZeroColumn => self.zero_column,
            RuleGroup::Temporal => self.temporal,
            RuleGroup::Tax => self.tax,
            RuleGroup::DebitCredit => self.debit_credit,
            RuleGroup::References => self.references,
            RuleGroup::Shipment => self.shipment,
            RuleGroup::Payments => self.payments,
        }
    }
}
