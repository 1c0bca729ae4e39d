//! The shape shared by invoices, stock movements, working documents and
//! payments, and by the tables that hold them.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use saftpt_core::{Field, SourceBilling, StatusCode};

use crate::line::Line;
use crate::master_files::Address;
use crate::totals::{DocumentTotals, PaymentMethod, WithholdingTax};

/// Status block of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DocumentStatus<S> {
    #[serde(rename = "Status")]
    pub status: S,
    pub status_date: NaiveDateTime,
    pub reason: Option<String>,
    #[serde(rename = "SourceID")]
    pub source_id: String,
    pub source_billing: SourceBilling,
}

impl<S> DocumentStatus<S> {
    pub fn new(status: S, status_date: NaiveDateTime) -> Self {
        Self {
            status,
            status_date,
            reason: None,
            source_id: "system".to_string(),
            source_billing: SourceBilling::Produced,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

/// Ship-from / ship-to point of a transport document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ShippingPoint {
    #[serde(rename = "DeliveryID")]
    pub delivery_id: Vec<String>,
    pub delivery_date: Option<NaiveDate>,
    #[serde(rename = "WarehouseID")]
    pub warehouse_id: Option<String>,
    #[serde(rename = "LocationID")]
    pub location_id: Option<String>,
    pub address: Option<Address>,
}

impl ShippingPoint {
    pub fn at(address: Address) -> Self {
        Self {
            address: Some(address),
            ..Self::default()
        }
    }
}

/// `Hash` and `HashControl` of a signed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashFields<'a> {
    pub hash: &'a str,
    pub hash_control: &'a str,
}

/// Which counterparty a document must name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartyRule {
    Customer,
    /// Exactly one of customer or supplier.
    CustomerOrSupplier,
}

/// Debit/credit column of a line or table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    Debit,
    Credit,
}

impl core::fmt::Display for Column {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Column::Debit => f.write_str("TotalDebit"),
            Column::Credit => f.write_str("TotalCredit"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TableKind {
    SalesInvoices,
    MovementOfGoods,
    WorkingDocuments,
    Payments,
}

impl TableKind {
    /// Column that must stay zero for the whole table, if any.
    pub fn zero_column(self) -> Option<Column> {
        match self {
            TableKind::SalesInvoices | TableKind::WorkingDocuments => Some(Column::Credit),
            TableKind::MovementOfGoods | TableKind::Payments => None,
        }
    }
}

impl core::fmt::Display for TableKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            TableKind::SalesInvoices => "SalesInvoices",
            TableKind::MovementOfGoods => "MovementOfGoods",
            TableKind::WorkingDocuments => "WorkingDocuments",
            TableKind::Payments => "Payments",
        };
        f.write_str(name)
    }
}

/// Aggregates a table declares about itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclaredTotals {
    Monetary {
        number_of_entries: u64,
        total_debit: Decimal,
        total_credit: Decimal,
    },
    Quantity {
        number_of_movement_lines: u64,
        total_quantity_issued: Decimal,
    },
}

/// A document of one of the four tables.
pub trait SourceDocument {
    type Status: StatusCode;

    /// Raw `InvoiceNo` / `DocumentNumber` / `PaymentRefNo`.
    fn document_number(&self) -> &str;

    /// Declared type code (`FT`, `GR`, `OR`, `RG`, ...).
    fn type_code(&self) -> &'static str;

    fn date(&self) -> &Field<NaiveDate>;

    fn system_entry_date(&self) -> &Field<NaiveDateTime>;

    fn status(&self) -> &DocumentStatus<Self::Status>;

    fn lines(&self) -> &[Line];

    fn totals(&self) -> &DocumentTotals;

    /// `None` for documents that are not part of a signature chain.
    fn hash_fields(&self) -> Option<HashFields<'_>>;

    fn customer_id(&self) -> Option<&str>;

    fn supplier_id(&self) -> Option<&str> {
        None
    }

    fn party_rule(&self) -> PartyRule {
        PartyRule::Customer
    }

    /// Side every line must use, when the document type fixes one.
    fn line_column(&self) -> Option<Column> {
        None
    }

    fn ship_from(&self) -> Option<&ShippingPoint> {
        None
    }

    fn ship_to(&self) -> Option<&ShippingPoint> {
        None
    }

    fn movement_start_time(&self) -> Option<NaiveDateTime> {
        None
    }

    fn movement_end_time(&self) -> Option<NaiveDateTime> {
        None
    }

    /// Whether the document travels with goods.
    fn is_transport_document(&self) -> bool {
        self.movement_start_time().is_some()
    }

    fn withholding_tax(&self) -> &[WithholdingTax] {
        &[]
    }

    fn payment_methods(&self) -> &[PaymentMethod] {
        &self.totals().payment
    }

    /// Whether payment methods must be declared (receipts, invoice-receipts).
    fn requires_payment_methods(&self) -> bool {
        false
    }
}

/// A table of source documents with its declared aggregates.
pub trait SourceTable {
    type Document: SourceDocument;

    const KIND: TableKind;

    fn documents(&self) -> &[Self::Document];

    fn declared_totals(&self) -> DeclaredTotals;
}

/// Debit and credit sums of the documents that count towards table totals,
/// saturating at the decimal range.
pub(crate) fn monetary_totals<D: SourceDocument>(docs: &[D]) -> (u64, Decimal, Decimal) {
    let mut debit = Decimal::ZERO;
    let mut credit = Decimal::ZERO;
    for doc in docs.iter().filter(|d| !d.status().status.excluded_from_totals()) {
        for line in doc.lines() {
            debit = debit.saturating_add(line.debit_amount.unwrap_or_default());
            credit = credit.saturating_add(line.credit_amount.unwrap_or_default());
        }
    }
    (docs.len() as u64, debit, credit)
}
