//! Fixture file and signing helpers shared by the integration tests.

#![allow(dead_code)]

use std::sync::OnceLock;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{NaiveDate, NaiveDateTime};
use rsa::RsaPrivateKey;
use rsa::pkcs1v15::SigningKey;
use rsa::signature::{SignatureEncoding, Signer};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sha1::Sha1;

use saftpt_core::{InvoiceType, MovementType, TaxType, WorkType};
use saftpt_documents::{
    Address, AuditFile, Customer, DocumentTotals, Header, Invoice, Line, MasterFiles,
    MovementOfGoods, Product, SalesInvoices, ShippingPoint, StockMovement, Tax, TaxTableEntry,
    WorkDocument, WorkingDocuments,
};
use saftpt_validation::{PublicKey, canonical_message};

fn private_key() -> &'static RsaPrivateKey {
    static KEY: OnceLock<RsaPrivateKey> = OnceLock::new();
    KEY.get_or_init(|| {
        RsaPrivateKey::new(&mut rand::thread_rng(), 1024).expect("test key generation")
    })
}

pub fn public_key() -> PublicKey {
    PublicKey::from_rsa(private_key().to_public_key())
}

pub fn sign(message: &str) -> String {
    let key = SigningKey::<Sha1>::new(private_key().clone());
    STANDARD.encode(key.sign(message.as_bytes()).to_bytes())
}

pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
}

pub fn at(d: u32, h: u32) -> NaiveDateTime {
    day(d).and_hms_opt(h, 0, 0).unwrap()
}

pub fn iva() -> Tax {
    Tax::percentage(TaxType::Iva, "PT", "NOR", dec!(23))
}

fn totals_for(net: Decimal) -> DocumentTotals {
    let tax = net * dec!(23) / dec!(100);
    DocumentTotals::new(net, tax, net + tax)
}

fn address(city: &str) -> Address {
    Address::new("Rua Augusta 10", city, "1100-053", "PT")
}

/// Signs `(number, date, entry, gross)` tuples in order, feeding each hash
/// into the next message.
fn chain_hashes(items: &[(String, NaiveDate, NaiveDateTime, Decimal)]) -> Vec<String> {
    let mut previous = String::new();
    let mut hashes = Vec::with_capacity(items.len());
    for (number, date, entry, gross) in items {
        let hash = sign(&canonical_message(*date, *entry, number, *gross, &previous));
        previous = hash.clone();
        hashes.push(hash);
    }
    hashes
}

pub fn sign_work_documents(docs: &mut [WorkDocument]) {
    let items: Vec<_> = docs
        .iter()
        .map(|d| {
            (
                d.document_number.clone(),
                d.work_date.get().unwrap(),
                d.system_entry_date.get().unwrap(),
                d.document_totals.gross_total.get().unwrap(),
            )
        })
        .collect();
    for (doc, hash) in docs.iter_mut().zip(chain_hashes(&items)) {
        doc.hash = hash;
    }
}

pub fn sign_stock_movements(docs: &mut [StockMovement]) {
    let items: Vec<_> = docs
        .iter()
        .map(|d| {
            (
                d.document_number.clone(),
                d.movement_date.get().unwrap(),
                d.system_entry_date.get().unwrap(),
                d.document_totals.gross_total.get().unwrap(),
            )
        })
        .collect();
    for (doc, hash) in docs.iter_mut().zip(chain_hashes(&items)) {
        doc.hash = hash;
    }
}

pub fn sign_invoices(docs: &mut [Invoice]) {
    let items: Vec<_> = docs
        .iter()
        .map(|d| {
            (
                d.invoice_no.clone(),
                d.invoice_date.get().unwrap(),
                d.system_entry_date.get().unwrap(),
                d.document_totals.gross_total.get().unwrap(),
            )
        })
        .collect();
    for (doc, hash) in docs.iter_mut().zip(chain_hashes(&items)) {
        doc.hash = hash;
    }
}

/// Budget `OR A/n` with one debit line of `n * 10`.
pub fn work_document(n: u32) -> WorkDocument {
    let price = Decimal::from(n * 10);
    WorkDocument::new(format!("OR A/{n}"), WorkType::Budget, day(n), at(n, 10), "C1")
        .with_line(Line::debit(1, "P1", Decimal::ONE, price, iva()))
        .with_totals(totals_for(price))
}

/// Signed budget series `OR A/1..=count`.
pub fn signed_work_documents(count: u32) -> Vec<WorkDocument> {
    let mut docs: Vec<WorkDocument> = (1..=count).map(work_document).collect();
    sign_work_documents(&mut docs);
    docs
}

/// Transport guide `GT A/n` leaving an hour after it was recorded.
pub fn transport_guide(n: u32) -> StockMovement {
    StockMovement::new(format!("GT A/{n}"), MovementType::TransportGuide, day(n), at(n, 9))
        .for_customer("C1")
        .shipped(
            ShippingPoint::at(address("Lisboa")),
            ShippingPoint::at(address("Porto")),
            at(n, 10),
            Some(at(n, 16)),
        )
        .with_line(Line::debit(1, "P1", dec!(2), dec!(5), iva()))
        .with_totals(totals_for(dec!(10)))
}

/// Invoice `FT A/n` with one credit line of `n * 100`.
pub fn invoice(n: u32) -> Invoice {
    let price = Decimal::from(n * 100);
    Invoice::new(format!("FT A/{n}"), InvoiceType::Invoice, day(n), at(n, 11), "C1")
        .with_line(Line::credit(1, "P1", Decimal::ONE, price, iva()))
        .with_totals(totals_for(price))
}

pub fn header() -> Header {
    Header::new(
        "Padaria Central, Lda",
        "509999990",
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
    )
}

pub fn master_files() -> MasterFiles {
    MasterFiles {
        customers: vec![Customer::new("C1", "123456789", "Cliente Exemplo")],
        suppliers: Vec::new(),
        products: vec![Product::new("P1", "Pão de forma")],
        tax_table: vec![TaxTableEntry::percentage(TaxType::Iva, "PT", "NOR", dec!(23))],
    }
}

/// A file with no findings: three signed budgets and two signed guides.
pub fn clean_file() -> AuditFile {
    let mut guides = vec![transport_guide(1), transport_guide(2)];
    sign_stock_movements(&mut guides);
    AuditFile::new(header())
        .with_master_files(master_files())
        .with_working_documents(WorkingDocuments::new(signed_work_documents(3)))
        .with_movement_of_goods(MovementOfGoods::new(guides))
}

/// `clean_file` plus a signed sales-invoice series.
pub fn file_with_invoices(count: u32) -> AuditFile {
    let mut invoices: Vec<Invoice> = (1..=count).map(invoice).collect();
    sign_invoices(&mut invoices);
    clean_file().with_sales_invoices(SalesInvoices::new(invoices))
}

pub fn codes(audit: &AuditFile) -> Vec<String> {
    audit
        .error_register()
        .validation_errors()
        .into_iter()
        .map(|e| e.code)
        .collect()
}
