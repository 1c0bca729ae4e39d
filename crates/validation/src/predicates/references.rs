//! Counterparties, products and links between documents.

use chrono::NaiveDate;

use saftpt_core::InvoiceType;
use saftpt_documents::{PartyRule, SourceDocument};

use super::RuleContext;
use crate::rules::Rule;

pub fn check_document<D: SourceDocument>(ctx: &RuleContext<'_>, doc: &D) {
    check_parties(ctx, doc);
    check_products(ctx, doc);
    check_links(ctx, doc);
}

fn check_parties<D: SourceDocument>(ctx: &RuleContext<'_>, doc: &D) {
    let number = doc.document_number();
    let customer = doc.customer_id();
    let supplier = doc.supplier_id();

    match doc.party_rule() {
        PartyRule::Customer if customer.is_none() => {
            ctx.report(Rule::CustomerMissing, number, &[&number]);
        }
        PartyRule::CustomerOrSupplier if customer.is_some() == supplier.is_some() => {
            ctx.report(Rule::CounterpartyNotExclusive, number, &[&number]);
        }
        _ => {}
    }

    if let Some(id) = customer {
        if !ctx.has_customer(id) {
            ctx.report(Rule::CustomerUnknown, number, &[&number, &id]);
        }
    }
    if let Some(id) = supplier {
        if !ctx.has_supplier(id) {
            ctx.report(Rule::SupplierUnknown, number, &[&number, &id]);
        }
    }
}

fn check_products<D: SourceDocument>(ctx: &RuleContext<'_>, doc: &D) {
    let number = doc.document_number();
    for line in doc.lines() {
        if let Some(code) = line.product_code.as_deref() {
            if !ctx.has_product(code) {
                ctx.report(Rule::ProductUnknown, number, &[&number, &line.line_number, &code]);
            }
        }
    }
}

/// Order references, references and receipt source documents must name a
/// document of the file dated no later than the referencing one.
fn check_links<D: SourceDocument>(ctx: &RuleContext<'_>, doc: &D) {
    let number = doc.document_number();
    let date = doc.date().get();

    let mut has_reference = false;
    for line in doc.lines() {
        let targets = line
            .order_references
            .iter()
            .map(|r| r.originating_on.as_str())
            .chain(line.references.iter().map(|r| r.reference.as_str()))
            .chain(line.source_documents.iter().map(|s| s.originating_on.as_str()));

        for target in targets {
            has_reference = true;
            match ctx.document_date(target) {
                None => ctx.report(Rule::ReferenceUnknown, number, &[&number, &target]),
                Some(target_date) => check_precedes(ctx, number, target, target_date, date),
            }
        }
    }

    if doc.type_code() == InvoiceType::CreditNote.code() && !has_reference {
        ctx.report(Rule::CreditNoteWithoutReference, number, &[&number]);
    }
}

fn check_precedes(
    ctx: &RuleContext<'_>,
    number: &str,
    target: &str,
    target_date: Option<NaiveDate>,
    date: Option<NaiveDate>,
) {
    if let (Some(target_date), Some(date)) = (target_date, date) {
        if target_date > date {
            ctx.report(
                Rule::ReferenceNotPreceding,
                number,
                &[&number, &target, &target_date, &date],
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;
    use crate::config::ValidationConfig;
    use rust_decimal_macros::dec;
    use saftpt_core::{MovementType, PaymentType};
    use saftpt_documents::{Invoice, Line, Payment, Payments, SalesInvoices, StockMovement};

    fn invoice(number: &str, kind: InvoiceType, date: u32) -> Invoice {
        Invoice::new(number, kind, day(date), at(date, 9), "C1")
    }

    #[test]
    fn customer_must_exist() {
        let doc = invoice("FT A/1", InvoiceType::Invoice, 2);
        let unknown = Invoice::new("FT A/2", InvoiceType::Invoice, day(2), at(2, 9), "C9");
        let missing = Invoice::new("FT A/3", InvoiceType::Invoice, day(2), at(2, 9), "");

        let codes = findings(&audit(), ValidationConfig::default(), |ctx| {
            check_document(ctx, &doc);
            check_document(ctx, &unknown);
            check_document(ctx, &missing);
        });

        assert_eq!(codes, vec!["customer_unknown", "customer_missing"]);
    }

    #[test]
    fn movements_name_exactly_one_counterparty() {
        let neither = StockMovement::new("GT A/1", MovementType::TransportGuide, day(2), at(2, 9));
        let both = StockMovement::new("GT A/2", MovementType::TransportGuide, day(2), at(2, 9))
            .for_customer("C1")
            .for_supplier("S1");
        let supplier = StockMovement::new("GT A/3", MovementType::TransportGuide, day(2), at(2, 9))
            .for_supplier("S1");

        let codes = findings(&audit(), ValidationConfig::default(), |ctx| {
            check_document(ctx, &neither);
            check_document(ctx, &both);
            check_document(ctx, &supplier);
        });

        assert_eq!(codes, vec!["counterparty_not_exclusive", "counterparty_not_exclusive"]);
    }

    #[test]
    fn products_must_exist() {
        let doc = invoice("FT A/1", InvoiceType::Invoice, 2)
            .with_line(Line::credit(1, "P1", dec!(1), dec!(1), iva()))
            .with_line(Line::credit(2, "PX", dec!(1), dec!(1), iva()));
        let codes = findings(&audit(), ValidationConfig::default(), |ctx| {
            check_document(ctx, &doc)
        });
        assert_eq!(codes, vec!["product_unknown"]);
    }

    #[test]
    fn credit_note_references_an_earlier_invoice() {
        let original = invoice("FT A/1", InvoiceType::Invoice, 3);
        let later = invoice("FT A/2", InvoiceType::Invoice, 9);
        let audit = audit().with_sales_invoices(SalesInvoices::new(vec![original, later]));

        let good = invoice("NC A/1", InvoiceType::CreditNote, 5)
            .with_line(Line::debit(1, "P1", dec!(1), dec!(1), iva()).with_reference("FT A/1"));
        let future = invoice("NC A/2", InvoiceType::CreditNote, 5)
            .with_line(Line::debit(1, "P1", dec!(1), dec!(1), iva()).with_reference("FT A/2"));
        let dangling = invoice("NC A/3", InvoiceType::CreditNote, 5)
            .with_line(Line::debit(1, "P1", dec!(1), dec!(1), iva()).with_reference("FT Z/1"));
        let bare = invoice("NC A/4", InvoiceType::CreditNote, 5)
            .with_line(Line::debit(1, "P1", dec!(1), dec!(1), iva()));

        let codes = findings(&audit, ValidationConfig::default(), |ctx| {
            check_document(ctx, &good);
            check_document(ctx, &future);
            check_document(ctx, &dangling);
            check_document(ctx, &bare);
        });

        assert_eq!(
            codes,
            vec!["reference_not_preceding", "reference_unknown", "credit_note_without_reference"]
        );
    }

    #[test]
    fn receipts_settle_existing_documents() {
        let settled = invoice("FT A/1", InvoiceType::Invoice, 3);
        let receipt = Payment::new("RG A/1", PaymentType::Receipt, day(4), at(4, 9), "C1")
            .with_line(Line::new(1).with_source_document("FT A/1", day(3)).with_credit(dec!(12.3)))
            .with_line(Line::new(2).with_source_document("FT A/99", day(3)).with_credit(dec!(1)));
        let audit = audit()
            .with_sales_invoices(SalesInvoices::new(vec![settled]))
            .with_payments(Payments::new(vec![receipt.clone()]));

        let codes = findings(&audit, ValidationConfig::default(), |ctx| {
            check_document(ctx, &receipt)
        });

        assert_eq!(codes, vec!["reference_unknown"]);
    }

    #[test]
    fn references_group_can_be_disabled() {
        let doc = invoice("NC A/1", InvoiceType::CreditNote, 5);
        let config = ValidationConfig {
            references: false,
            ..ValidationConfig::default()
        };
        assert!(findings(&audit(), config, |ctx| check_document(ctx, &doc)).is_empty());
    }
}
