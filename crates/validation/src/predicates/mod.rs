//! Per-document and per-line business rules.
//!
//! Every predicate reports through the shared [`Reporter`] and returns
//! nothing; groups never short-circuit each other.

pub mod debit_credit;
pub mod fields;
pub mod payments;
pub mod references;
pub mod shipment;
pub mod tax;
pub mod temporal;

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;

use saftpt_core::{DocumentNumber, TaxType};
use saftpt_documents::{AuditFile, Header, SourceDocument, TaxTableEntry};

use crate::reporter::Reporter;
use crate::rules::Rule;

/// Lookups shared by the predicates of one validation pass.
pub struct RuleContext<'a> {
    pub reporter: &'a Reporter<'a>,
    pub header: &'a Header,
    customers: HashSet<&'a str>,
    suppliers: HashSet<&'a str>,
    products: HashSet<&'a str>,
    tax_table: HashMap<(TaxType, &'a str, &'a str), &'a TaxTableEntry>,
    /// Every document number in the file (normalized) with its date.
    documents: HashMap<String, Option<NaiveDate>>,
}

impl<'a> RuleContext<'a> {
    pub fn new(audit: &'a AuditFile, reporter: &'a Reporter<'a>) -> Self {
        let master = &audit.master_files;
        let mut tax_table = HashMap::new();
        for entry in &master.tax_table {
            tax_table
                .entry((entry.tax_type, entry.tax_country_region.as_str(), entry.tax_code.as_str()))
                .or_insert(entry);
        }

        let mut ctx = Self {
            reporter,
            header: &audit.header,
            customers: master.customers.iter().map(|c| c.customer_id.as_str()).collect(),
            suppliers: master.suppliers.iter().map(|s| s.supplier_id.as_str()).collect(),
            products: master.products.iter().map(|p| p.product_code.as_str()).collect(),
            tax_table,
            documents: HashMap::new(),
        };

        let sources = &audit.source_documents;
        if let Some(t) = &sources.sales_invoices {
            ctx.register_documents(&t.invoices);
        }
        if let Some(t) = &sources.movement_of_goods {
            ctx.register_documents(&t.stock_movements);
        }
        if let Some(t) = &sources.working_documents {
            ctx.register_documents(&t.work_documents);
        }
        if let Some(t) = &sources.payments {
            ctx.register_documents(&t.payments);
        }
        ctx
    }

    fn register_documents<D: SourceDocument>(&mut self, docs: &[D]) {
        for doc in docs {
            self.documents
                .entry(normalize(doc.document_number()))
                .or_insert_with(|| doc.date().get());
        }
    }

    pub fn report(&self, rule: Rule, document: &str, args: &[&dyn core::fmt::Display]) {
        self.reporter.report(rule, Some(document), args);
    }

    pub fn has_customer(&self, id: &str) -> bool {
        self.customers.contains(id)
    }

    pub fn has_supplier(&self, id: &str) -> bool {
        self.suppliers.contains(id)
    }

    pub fn has_product(&self, code: &str) -> bool {
        self.products.contains(code)
    }

    pub fn tax_entry(
        &self,
        tax_type: TaxType,
        region: &str,
        code: &str,
    ) -> Option<&'a TaxTableEntry> {
        self.tax_table.get(&(tax_type, region, code)).copied()
    }

    /// `None` when no document with that number is in the file; `Some(None)`
    /// when it is there without a usable date.
    pub fn document_date(&self, number: &str) -> Option<Option<NaiveDate>> {
        self.documents.get(&normalize(number)).copied()
    }
}

/// References are compared on the parsed number so `FT A/007` and `FT A/7`
/// name the same document.
fn normalize(number: &str) -> String {
    match number.parse::<DocumentNumber>() {
        Ok(n) => n.to_string(),
        Err(_) => number.trim().to_string(),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Fixtures shared by the predicate tests.

    use chrono::{NaiveDate, NaiveDateTime};
    use rust_decimal_macros::dec;
    use saftpt_core::{ErrorRegister, TaxType};
    use saftpt_documents::{
        Address, AuditFile, Customer, Header, MasterFiles, Product, Supplier, Tax, TaxTableEntry,
    };

    use super::RuleContext;
    use crate::config::ValidationConfig;
    use crate::reporter::Reporter;
    use crate::rules::BuiltinCatalog;

    pub fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    pub fn at(d: u32, h: u32) -> NaiveDateTime {
        day(d).and_hms_opt(h, 0, 0).unwrap()
    }

    pub fn iva() -> Tax {
        Tax::percentage(TaxType::Iva, "PT", "NOR", dec!(23))
    }

    pub fn address() -> Address {
        Address::new("Rua do Ouro 1", "Lisboa", "1100-060", "PT")
    }

    pub fn audit() -> AuditFile {
        AuditFile::new(Header::new("Empresa", "500000000", day(1), day(30))).with_master_files(
            MasterFiles {
                customers: vec![Customer::new("C1", "123456789", "Cliente")],
                suppliers: vec![Supplier::new("S1", "987654321", "Fornecedor")],
                products: vec![Product::new("P1", "Produto"), Product::new("P2", "Outro")],
                tax_table: vec![
                    TaxTableEntry::percentage(TaxType::Iva, "PT", "NOR", dec!(23)),
                    TaxTableEntry::percentage(TaxType::Iva, "PT", "ISE", dec!(0)),
                ],
            },
        )
    }

    /// Runs `f` against a context over `audit` and returns the finding codes.
    pub fn findings<F>(audit: &AuditFile, config: ValidationConfig, f: F) -> Vec<String>
    where
        F: FnOnce(&RuleContext<'_>),
    {
        let register = ErrorRegister::new();
        {
            let reporter = Reporter::new(&register, &BuiltinCatalog, config);
            let ctx = RuleContext::new(audit, &reporter);
            f(&ctx);
        }
        let mut codes: Vec<String> = register
            .validation_errors()
            .into_iter()
            .map(|e| e.code)
            .collect();
        codes.extend(register.warnings().into_iter().map(|w| format!("warning: {w}")));
        codes
    }
}

#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use crate::config::ValidationConfig;
    use saftpt_core::InvoiceType;
    use saftpt_documents::{Invoice, SalesInvoices};

    #[test]
    fn document_numbers_are_looked_up_normalized() {
        let audit = audit().with_sales_invoices(SalesInvoices::new(vec![Invoice::new(
            "FT A/7",
            InvoiceType::Invoice,
            day(3),
            at(3, 9),
            "C1",
        )]));
        findings(&audit, ValidationConfig::default(), |ctx| {
            assert_eq!(ctx.document_date("FT A/007"), Some(Some(day(3))));
            assert_eq!(ctx.document_date("FT A/8"), None);
            assert!(ctx.has_customer("C1"));
            assert!(!ctx.has_supplier("C1"));
            assert!(ctx.tax_entry(TaxType::Iva, "PT", "NOR").is_some());
            assert!(ctx.tax_entry(TaxType::Iva, "PT-AC", "NOR").is_none());
        });
    }
}
