use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use saftpt_core::{Field, PaymentStatus, PaymentType};

use crate::document::{
    DeclaredTotals, DocumentStatus, HashFields, SourceDocument, SourceTable, TableKind,
    monetary_totals,
};
use crate::line::Line;
use crate::totals::{DocumentTotals, PaymentMethod, WithholdingTax};

/// Receipt (`RC`, `RG`). Receipts are not signed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Payment {
    pub payment_ref_no: String,
    #[serde(rename = "ATCUD")]
    pub atcud: Option<String>,
    pub period: Option<u8>,
    #[serde(rename = "TransactionID")]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub transaction_date: Field<NaiveDate>,
    pub payment_type: PaymentType,
    pub description: Option<String>,
    #[serde(rename = "SystemID")]
    pub system_id: Option<String>,
    pub document_status: DocumentStatus<PaymentStatus>,
    #[serde(rename = "PaymentMethod", default)]
    pub payment_method: Vec<PaymentMethod>,
    #[serde(rename = "SourceID")]
    pub source_id: String,
    #[serde(default)]
    pub system_entry_date: Field<NaiveDateTime>,
    #[serde(rename = "CustomerID")]
    pub customer_id: String,
    #[serde(rename = "Line", default)]
    pub lines: Vec<Line>,
    #[serde(default)]
    pub document_totals: DocumentTotals,
    #[serde(default)]
    pub withholding_tax: Vec<WithholdingTax>,
}

impl Payment {
    pub fn new(
        payment_ref_no: impl Into<String>,
        payment_type: PaymentType,
        transaction_date: NaiveDate,
        system_entry_date: NaiveDateTime,
        customer_id: impl Into<String>,
    ) -> Self {
        Self {
            payment_ref_no: payment_ref_no.into(),
            atcud: None,
            period: None,
            transaction_id: None,
            transaction_date: Field::Valid(transaction_date),
            payment_type,
            description: None,
            system_id: None,
            document_status: DocumentStatus::new(PaymentStatus::Normal, system_entry_date),
            payment_method: Vec::new(),
            source_id: "system".to_string(),
            system_entry_date: Field::Valid(system_entry_date),
            customer_id: customer_id.into(),
            lines: Vec::new(),
            document_totals: DocumentTotals::default(),
            withholding_tax: Vec::new(),
        }
    }

    pub fn with_line(mut self, line: Line) -> Self {
        self.lines.push(line);
        self
    }

    pub fn with_totals(mut self, totals: DocumentTotals) -> Self {
        self.document_totals = totals;
        self
    }

    pub fn with_method(mut self, method: PaymentMethod) -> Self {
        self.payment_method.push(method);
        self
    }

    pub fn with_withholding(mut self, withholding: WithholdingTax) -> Self {
        self.withholding_tax.push(withholding);
        self
    }
}

impl SourceDocument for Payment {
    type Status = PaymentStatus;

    fn document_number(&self) -> &str {
        &self.payment_ref_no
    }

    fn type_code(&self) -> &'static str {
        self.payment_type.code()
    }

    fn date(&self) -> &Field<NaiveDate> {
        &self.transaction_date
    }

    fn system_entry_date(&self) -> &Field<NaiveDateTime> {
        &self.system_entry_date
    }

    fn status(&self) -> &DocumentStatus<PaymentStatus> {
        &self.document_status
    }

    fn lines(&self) -> &[Line] {
        &self.lines
    }

    fn totals(&self) -> &DocumentTotals {
        &self.document_totals
    }

    fn hash_fields(&self) -> Option<HashFields<'_>> {
        None
    }

    fn customer_id(&self) -> Option<&str> {
        Some(self.customer_id.as_str()).filter(|id| !id.is_empty())
    }

    fn withholding_tax(&self) -> &[WithholdingTax] {
        &self.withholding_tax
    }

    fn payment_methods(&self) -> &[PaymentMethod] {
        &self.payment_method
    }

    fn requires_payment_methods(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Payments {
    pub number_of_entries: u64,
    pub total_debit: Decimal,
    pub total_credit: Decimal,
    #[serde(rename = "Payment", default)]
    pub payments: Vec<Payment>,
}

impl Payments {
    /// Table whose declared aggregates are computed from `payments`.
    pub fn new(payments: Vec<Payment>) -> Self {
        let (number_of_entries, total_debit, total_credit) = monetary_totals(&payments);
        Self {
            number_of_entries,
            total_debit,
            total_credit,
            payments,
        }
    }
}

impl SourceTable for Payments {
    type Document = Payment;

    const KIND: TableKind = TableKind::Payments;

    fn documents(&self) -> &[Payment] {
        &self.payments
    }

    fn declared_totals(&self) -> DeclaredTotals {
        DeclaredTotals::Monetary {
            number_of_entries: self.number_of_entries,
            total_debit: self.total_debit,
            total_credit: self.total_credit,
        }
    }
}
