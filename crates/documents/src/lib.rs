//! SAF-T (PT) document tree.
//!
//! These are the already field-validated values the entity layer hands to the
//! validation engine. The engine only reads them; producers build them with
//! the constructors and `with_*` helpers below.

pub mod audit_file;
pub mod document;
pub mod header;
pub mod line;
pub mod master_files;
pub mod movement_of_goods;
pub mod payments;
pub mod sales_invoices;
pub mod totals;
pub mod working_documents;

pub use audit_file::{AuditFile, SourceDocuments};
pub use document::{
    Column, DeclaredTotals, DocumentStatus, HashFields, PartyRule, ShippingPoint, SourceDocument,
    SourceTable, TableKind,
};
pub use header::Header;
pub use line::{CustomsInformation, Line, OrderReference, Reference, SourceDocumentRef, Tax};
pub use master_files::{Address, Customer, MasterFiles, Product, Supplier, TaxTableEntry};
pub use movement_of_goods::{MovementOfGoods, StockMovement};
pub use payments::{Payment, Payments};
pub use sales_invoices::{Invoice, SalesInvoices};
pub use totals::{Currency, DocumentTotals, PaymentMethod, Settlement, WithholdingTax};
pub use working_documents::{WorkDocument, WorkingDocuments};
