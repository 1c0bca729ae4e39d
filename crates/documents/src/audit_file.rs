use std::sync::Arc;

use serde::{Deserialize, Serialize};

use saftpt_core::ErrorRegister;

use crate::header::Header;
use crate::master_files::MasterFiles;
use crate::movement_of_goods::MovementOfGoods;
use crate::payments::Payments;
use crate::sales_invoices::SalesInvoices;
use crate::working_documents::WorkingDocuments;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SourceDocuments {
    pub sales_invoices: Option<SalesInvoices>,
    pub movement_of_goods: Option<MovementOfGoods>,
    pub working_documents: Option<WorkingDocuments>,
    pub payments: Option<Payments>,
}

/// Root of a SAF-T (PT) export.
///
/// Owns the [`ErrorRegister`] every stage reports into; clones of the file
/// share the same register.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AuditFile {
    pub header: Header,
    #[serde(default)]
    pub master_files: MasterFiles,
    #[serde(default)]
    pub source_documents: SourceDocuments,
    #[serde(skip)]
    errors: Arc<ErrorRegister>,
}

impl AuditFile {
    pub fn new(header: Header) -> Self {
        Self {
            header,
            master_files: MasterFiles::default(),
            source_documents: SourceDocuments::default(),
            errors: Arc::new(ErrorRegister::new()),
        }
    }

    pub fn error_register(&self) -> &Arc<ErrorRegister> {
        &self.errors
    }

    pub fn with_master_files(mut self, master_files: MasterFiles) -> Self {
        self.master_files = master_files;
        self
    }

    pub fn with_sales_invoices(mut self, table: SalesInvoices) -> Self {
        self.source_documents.sales_invoices = Some(table);
        self
    }

    pub fn with_movement_of_goods(mut self, table: MovementOfGoods) -> Self {
        self.source_documents.movement_of_goods = Some(table);
        self
    }

    pub fn with_working_documents(mut self, table: WorkingDocuments) -> Self {
        self.source_documents.working_documents = Some(table);
        self
    }

    pub fn with_payments(mut self, table: Payments) -> Self {
        self.source_documents.payments = Some(table);
        self
    }
}

/// Equality over business content; the register is not part of it.
impl PartialEq for AuditFile {
    fn eq(&self, other: &Self) -> bool {
        self.header == other.header
            && self.master_files == other.master_files
            && self.source_documents == other.source_documents
    }
}

impl Eq for AuditFile {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line::{Line, Tax};
    use crate::master_files::{Customer, Product, TaxTableEntry};
    use crate::sales_invoices::Invoice;
    use crate::totals::DocumentTotals;
    use chrono::{Duration, NaiveDate};
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use saftpt_core::{Field, InvoiceType, TaxType};

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn file_with(invoices: Vec<Invoice>) -> AuditFile {
        let end = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        let header = Header::new("Acme", "500000000", start(), end);
        let master = MasterFiles {
            customers: vec![Customer::new("C1", "999999990", "Consumidor final")],
            products: vec![Product::new("P1", "Widget")],
            tax_table: vec![TaxTableEntry::percentage(TaxType::Iva, "PT", "NOR", dec!(23))],
            ..MasterFiles::default()
        };
        AuditFile::new(header)
            .with_master_files(master)
            .with_sales_invoices(SalesInvoices::new(invoices))
    }

    #[test]
    fn register_is_shared_by_clones_and_ignored_by_equality() {
        let file = file_with(Vec::new());
        let copy = file.clone();
        copy.error_register().add_warning("w");
        assert_eq!(file.error_register().warnings().len(), 1);

        let other = file_with(Vec::new());
        assert_eq!(file, other);
    }

    #[test]
    fn malformed_totals_survive_round_trip() {
        let mut invoice = Invoice::new(
            "FT A/1",
            InvoiceType::Invoice,
            start(),
            start().and_hms_opt(9, 0, 0).unwrap(),
            "C1",
        );
        invoice.document_totals.gross_total = Field::Invalid("12,30".to_string());
        let file = file_with(vec![invoice]);

        let json = serde_json::to_string(&file).unwrap();
        let back: AuditFile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, file);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 64,
            ..ProptestConfig::default()
        })]

        #[test]
        fn serialize_then_parse_is_identity(
            docs in prop::collection::vec(
                (1i64..100_000i64, 1i64..50i64, 0i64..365i64, 0u32..86_400u32),
                0..8,
            )
        ) {
            let invoices: Vec<Invoice> = docs
                .iter()
                .enumerate()
                .map(|(i, (cents, qty, day, secs))| {
                    let date = start() + Duration::days(*day);
                    let entry =
                        date.and_hms_opt(0, 0, 0).unwrap() + Duration::seconds(i64::from(*secs));
                    let unit = Decimal::new(*cents, 2);
                    let qty = Decimal::from(*qty);
                    let net = unit * qty;
                    let tax = (net * dec!(0.23)).round_dp(2);
                    let iva = Tax::percentage(TaxType::Iva, "PT", "NOR", dec!(23));
                    Invoice::new(format!("FT A/{}", i + 1), InvoiceType::Invoice, date, entry, "C1")
                        .with_line(Line::credit(1, "P1", qty, unit, iva))
                        .with_totals(DocumentTotals::new(net, tax, net + tax))
                })
                .collect();
            let file = file_with(invoices);

            let json = serde_json::to_string(&file).unwrap();
            let back: AuditFile = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(back, file);
        }
    }
}
