//! The rule set, its message keys and the default (English) templates.
//!
//! Templates use positional placeholders `{0}`, `{1}`, ... Translations are
//! supplied through a [`MessageCatalog`]; keys it does not know fall back to
//! the built-in template.

use std::borrow::Cow;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Switchable family of rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleGroup {
    /// Missing/malformed required fields. Always on.
    Fields,
    Signature,
    Numbering,
    Totals,
    ZeroColumn,
    Temporal,
    Tax,
    DebitCredit,
    References,
    Shipment,
    Payments,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

macro_rules! rules {
    (
        $( $variant:ident : $group:ident, $severity:ident, $key:literal => $template:literal; )+
    ) => {
        /// Every finding the engine can produce.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum Rule {
            $($variant,)+
        }

        impl Rule {
            pub const ALL: &'static [Rule] = &[$(Rule::$variant),+];

            /// Stable message key.
            pub fn key(self) -> &'static str {
                match self {
                    $(Rule::$variant => $key,)+
                }
            }

            pub fn group(self) -> RuleGroup {
                match self {
                    $(Rule::$variant => RuleGroup::$group,)+
                }
            }

            pub fn severity(self) -> Severity {
                match self {
                    $(Rule::$variant => Severity::$severity,)+
                }
            }

            pub fn default_template(self) -> &'static str {
                match self {
                    $(Rule::$variant => $template,)+
                }
            }
        }
    };
}

rules! {
    FieldMissing: Fields, Error, "field_missing"
        => "{0}: required field {1} is missing";
    FieldMalformed: Fields, Warning, "field_malformed"
        => "{0}: field {1} has malformed value \"{2}\" and was ignored";
    SchemaValidatorMissing: Fields, Warning, "schema_validator_missing"
        => "schema validation was requested but no schema validator is attached";
    AmountOverflow: Fields, Error, "amount_overflow"
        => "{0}: {1} exceeds the decimal range and was not checked";

    HashSignatureInvalid: Signature, Error, "hash_signature_invalid"
        => "{0}: hash does not verify against the previous document of series {1} ({2})";

    UnparsableDocumentNumber: Numbering, Error, "unparsable_document_number"
        => "document at index {0} of {1} has unparsable number \"{2}\"";
    DocumentNumberOutOfRange: Numbering, Error, "document_number_out_of_range"
        => "document at index {0} of {1} has number \"{2}\" past the u64 sequence range";
    DuplicateDocumentNumber: Numbering, Error, "duplicate_document_number"
        => "{0}: number is duplicated in {1} (index {2}); the first occurrence is kept";
    MissingDocumentNumber: Numbering, Error, "missing_document_number"
        => "series {0} skips numbers {1} to {2}";
    DocumentTypeMismatch: Numbering, Error, "document_type_mismatch"
        => "{0}: numbered with type {1} but declares type {2}";
    LineNumberSequence: Numbering, Error, "line_number_sequence"
        => "{0}: line at position {1} is numbered {2}, expected {3}";

    LineAmountMismatch: Totals, Error, "line_amount_mismatch"
        => "{0}: line {1} declares {2} but unit price times quantity is {3}";
    NetTotalMismatch: Totals, Error, "net_total_mismatch"
        => "{0}: declared NetTotal {1} differs from the computed {2}";
    TaxPayableMismatch: Totals, Error, "tax_payable_mismatch"
        => "{0}: declared TaxPayable {1} differs from the computed {2}";
    GrossTotalMismatch: Totals, Error, "gross_total_mismatch"
        => "{0}: declared GrossTotal {1} differs from the computed {2}";
    DeclaredGrossInconsistent: Totals, Error, "declared_gross_inconsistent"
        => "{0}: declared GrossTotal {1} differs from NetTotal + TaxPayable {2}";
    NumberOfEntriesMismatch: Totals, Error, "number_of_entries_mismatch"
        => "{0}: declared NumberOfEntries {1} differs from the {2} documents found";
    TotalDebitMismatch: Totals, Error, "total_debit_mismatch"
        => "{0}: declared TotalDebit {1} differs from the computed {2}";
    TotalCreditMismatch: Totals, Error, "total_credit_mismatch"
        => "{0}: declared TotalCredit {1} differs from the computed {2}";
    NumberOfMovementLinesMismatch: Totals, Error, "number_of_movement_lines_mismatch"
        => "{0}: declared NumberOfMovementLines {1} differs from the {2} lines found";
    TotalQuantityIssuedMismatch: Totals, Error, "total_quantity_issued_mismatch"
        => "{0}: declared TotalQuantityIssued {1} differs from the computed {2}";

    ZeroColumnViolation: ZeroColumn, Error, "zero_column_violation"
        => "{0}: contributes {1} to {2} of {3}, which must be zero";

    DateOrder: Temporal, Error, "date_order"
        => "{0}: date {1} is earlier than {2} of the previous document {3}";
    SystemEntryDateOrder: Temporal, Error, "system_entry_date_order"
        => "{0}: system entry date {1} is earlier than {2} of the previous document {3}";
    DateOutsidePeriod: Temporal, Error, "date_outside_period"
        => "{0}: date {1} is outside the file period {2} to {3}";
    HeaderPeriodInverted: Temporal, Error, "header_period_inverted"
        => "header: StartDate {0} is after EndDate {1}";
    CancelledWithoutReason: Temporal, Error, "cancelled_without_reason"
        => "{0}: cancelled on {1} without a reason";

    TaxMissing: Tax, Error, "tax_missing"
        => "{0}: line {1} has no tax";
    TaxPercentageAndAmount: Tax, Error, "tax_percentage_and_amount"
        => "{0}: line {1} declares both a tax percentage and a tax amount";
    TaxRateMissing: Tax, Error, "tax_rate_missing"
        => "{0}: line {1} declares neither a tax percentage nor a tax amount";
    IvaWithoutPercentage: Tax, Error, "iva_without_percentage"
        => "{0}: line {1} is IVA but has no tax percentage";
    ZeroRateWithoutExemption: Tax, Error, "zero_rate_without_exemption"
        => "{0}: line {1} has a zero tax rate but no exemption code and reason";
    ExemptionWithoutZeroRate: Tax, Error, "exemption_without_zero_rate"
        => "{0}: line {1} declares an exemption but its tax rate is not zero";
    TaxCodeUnknown: Tax, Error, "tax_code_unknown"
        => "{0}: line {1} uses tax {2}/{3}/{4}, which is not in the tax table";
    TaxPercentageMismatch: Tax, Error, "tax_percentage_mismatch"
        => "{0}: line {1} uses {2}% but the tax table rate is {3}%";

    DebitAndCredit: DebitCredit, Error, "debit_and_credit"
        => "{0}: line {1} declares both DebitAmount and CreditAmount";
    NeitherDebitNorCredit: DebitCredit, Error, "neither_debit_nor_credit"
        => "{0}: line {1} declares neither DebitAmount nor CreditAmount";
    WrongLineColumn: DebitCredit, Error, "wrong_line_column"
        => "{0}: line {1} of a {2} document must use {3}";

    CustomerMissing: References, Error, "customer_missing"
        => "{0}: a customer is required";
    CounterpartyNotExclusive: References, Error, "counterparty_not_exclusive"
        => "{0}: exactly one of CustomerID or SupplierID must be set";
    CustomerUnknown: References, Error, "customer_unknown"
        => "{0}: customer {1} is not in MasterFiles";
    SupplierUnknown: References, Error, "supplier_unknown"
        => "{0}: supplier {1} is not in MasterFiles";
    ProductUnknown: References, Error, "product_unknown"
        => "{0}: line {1} uses product {2}, which is not in MasterFiles";
    ReferenceUnknown: References, Error, "reference_unknown"
        => "{0}: referenced document {1} does not exist in the file";
    ReferenceNotPreceding: References, Error, "reference_not_preceding"
        => "{0}: referenced document {1} is dated {2}, after {3}";
    CreditNoteWithoutReference: References, Error, "credit_note_without_reference"
        => "{0}: credit notes must reference the corrected document";

    MovementStartMissing: Shipment, Error, "movement_start_missing"
        => "{0}: transport documents must declare MovementStartTime";
    MovementStartBeforeDate: Shipment, Error, "movement_start_before_date"
        => "{0}: movement starts at {1}, before the document date {2}";
    MovementStartBeforeEntry: Shipment, Error, "movement_start_before_entry"
        => "{0}: movement starts at {1}, before the system entry date {2}";
    MovementEndBeforeStart: Shipment, Error, "movement_end_before_start"
        => "{0}: movement ends at {1}, before it starts at {2}";
    ShippingAddressIncomplete: Shipment, Error, "shipping_address_incomplete"
        => "{0}: {1} address lacks {2}";

    PaymentSumMismatch: Payments, Error, "payment_sum_mismatch"
        => "{0}: payment methods {1} minus withholding {2} differ from GrossTotal {3}";
    WithholdingExceedsGross: Payments, Error, "withholding_exceeds_gross"
        => "{0}: withholding tax {1} exceeds GrossTotal {2}";
    PaymentMethodsMissing: Payments, Error, "payment_methods_missing"
        => "{0}: no payment method is declared";
}

/// Key → template lookup for localized messages.
pub trait MessageCatalog: Send + Sync {
    fn lookup(&self, key: &str) -> Option<&str>;
}

/// Catalog with no overrides: every rule uses its default template.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCatalog;

impl MessageCatalog for BuiltinCatalog {
    fn lookup(&self, _key: &str) -> Option<&str> {
        None
    }
}

impl MessageCatalog for HashMap<String, String> {
    fn lookup(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

/// Substitute `{n}` with `args[n]`. Unknown or malformed placeholders are
/// left as they are.
pub fn format_message(template: &str, args: &[String]) -> String {
    let mut out = String::with_capacity(template.len() + 16);
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let substituted = after.find('}').and_then(|close| {
            let idx: usize = after[..close].parse().ok()?;
            let arg = args.get(idx)?;
            Some((arg, close))
        });
        match substituted {
            Some((arg, close)) => {
                out.push_str(arg);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

pub(crate) fn template<'a>(catalog: &'a dyn MessageCatalog, rule: Rule) -> Cow<'a, str> {
    match catalog.lookup(rule.key()) {
        Some(t) => Cow::Borrowed(t),
        None => Cow::Borrowed(rule.default_template()),
    }
}
