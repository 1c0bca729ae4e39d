use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use saftpt_core::{Field, InvoiceStatus, InvoiceType};

use crate::document::{
    Column, DeclaredTotals, DocumentStatus, HashFields, ShippingPoint, SourceDocument, SourceTable,
    TableKind, monetary_totals,
};
use crate::line::Line;
use crate::totals::{DocumentTotals, WithholdingTax};

/// Sales invoice (`FT`, `FS`, `FR`, `ND`, `NC`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Invoice {
    pub invoice_no: String,
    #[serde(rename = "ATCUD")]
    pub atcud: Option<String>,
    pub document_status: DocumentStatus<InvoiceStatus>,
    pub hash: String,
    pub hash_control: String,
    pub period: Option<u8>,
    #[serde(default)]
    pub invoice_date: Field<NaiveDate>,
    pub invoice_type: InvoiceType,
    #[serde(rename = "SourceID")]
    pub source_id: String,
    #[serde(rename = "EACCode")]
    pub eac_code: Option<String>,
    #[serde(default)]
    pub system_entry_date: Field<NaiveDateTime>,
    #[serde(rename = "TransactionID", default)]
    pub transaction_ids: Vec<String>,
    #[serde(rename = "CustomerID")]
    pub customer_id: String,
    pub ship_to: Option<ShippingPoint>,
    pub ship_from: Option<ShippingPoint>,
    pub movement_end_time: Option<NaiveDateTime>,
    pub movement_start_time: Option<NaiveDateTime>,
    #[serde(rename = "Line", default)]
    pub lines: Vec<Line>,
    #[serde(default)]
    pub document_totals: DocumentTotals,
    #[serde(default)]
    pub withholding_tax: Vec<WithholdingTax>,
}

impl Invoice {
    pub fn new(
        invoice_no: impl Into<String>,
        invoice_type: InvoiceType,
        invoice_date: NaiveDate,
        system_entry_date: NaiveDateTime,
        customer_id: impl Into<String>,
    ) -> Self {
        Self {
            invoice_no: invoice_no.into(),
            atcud: None,
            document_status: DocumentStatus::new(InvoiceStatus::Normal, system_entry_date),
            hash: String::new(),
            hash_control: "1".to_string(),
            period: None,
            invoice_date: Field::Valid(invoice_date),
            invoice_type,
            source_id: "system".to_string(),
            eac_code: None,
            system_entry_date: Field::Valid(system_entry_date),
            transaction_ids: Vec::new(),
            customer_id: customer_id.into(),
            ship_to: None,
            ship_from: None,
            movement_end_time: None,
            movement_start_time: None,
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

    pub fn with_status(mut self, status: DocumentStatus<InvoiceStatus>) -> Self {
        self.document_status = status;
        self
    }
}

impl SourceDocument for Invoice {
    type Status = InvoiceStatus;

    fn document_number(&self) -> &str {
        &self.invoice_no
    }

    fn type_code(&self) -> &'static str {
        self.invoice_type.code()
    }

    fn date(&self) -> &Field<NaiveDate> {
        &self.invoice_date
    }

    fn system_entry_date(&self) -> &Field<NaiveDateTime> {
        &self.system_entry_date
    }

    fn status(&self) -> &DocumentStatus<InvoiceStatus> {
        &self.document_status
    }

    fn lines(&self) -> &[Line] {
        &self.lines
    }

    fn totals(&self) -> &DocumentTotals {
        &self.document_totals
    }

    fn hash_fields(&self) -> Option<HashFields<'_>> {
        Some(HashFields {
            hash: &self.hash,
            hash_control: &self.hash_control,
        })
    }

    fn customer_id(&self) -> Option<&str> {
        Some(self.customer_id.as_str()).filter(|id| !id.is_empty())
    }

    fn line_column(&self) -> Option<Column> {
        if self.invoice_type.expects_debit_lines() {
            Some(Column::Debit)
        } else {
            Some(Column::Credit)
        }
    }

    fn ship_from(&self) -> Option<&ShippingPoint> {
        self.ship_from.as_ref()
    }

    fn ship_to(&self) -> Option<&ShippingPoint> {
        self.ship_to.as_ref()
    }

    fn movement_start_time(&self) -> Option<NaiveDateTime> {
        self.movement_start_time
    }

    fn movement_end_time(&self) -> Option<NaiveDateTime> {
        self.movement_end_time
    }

    fn withholding_tax(&self) -> &[WithholdingTax] {
        &self.withholding_tax
    }

    fn requires_payment_methods(&self) -> bool {
        self.invoice_type == InvoiceType::InvoiceReceipt
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SalesInvoices {
    pub number_of_entries: u64,
    pub total_debit: Decimal,
    pub total_credit: Decimal,
    #[serde(rename = "Invoice", default)]
    pub invoices: Vec<Invoice>,
}

impl SalesInvoices {
    /// Table whose declared aggregates are computed from `invoices`.
    pub fn new(invoices: Vec<Invoice>) -> Self {
        let (number_of_entries, total_debit, total_credit) = monetary_totals(&invoices);
        Self {
            number_of_entries,
            total_debit,
            total_credit,
            invoices,
        }
    }
}

impl SourceTable for SalesInvoices {
    type Document = Invoice;

    const KIND: TableKind = TableKind::SalesInvoices;

    fn documents(&self) -> &[Invoice] {
        &self.invoices
    }

    fn declared_totals(&self) -> DeclaredTotals {
        DeclaredTotals::Monetary {
            number_of_entries: self.number_of_entries,
            total_debit: self.total_debit,
            total_credit: self.total_credit,
        }
    }
}
