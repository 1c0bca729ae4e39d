//! Payment composition of receipts and invoice-receipts.

use saftpt_core::{approx_eq, checked_sum, format_money};
use saftpt_documents::SourceDocument;

use super::RuleContext;
use crate::rules::Rule;

pub fn check_document<D: SourceDocument>(ctx: &RuleContext<'_>, doc: &D) {
    let number = doc.document_number();
    let methods = doc.payment_methods();

    if methods.is_empty() && doc.requires_payment_methods() {
        ctx.report(Rule::PaymentMethodsMissing, number, &[&number]);
    }

    let Some(gross) = doc.totals().gross_total.get() else {
        return;
    };
    let withholding = checked_sum(doc.withholding_tax().iter().map(|w| w.withholding_tax_amount));
    let Some(withholding) = withholding else {
        ctx.report(Rule::AmountOverflow, number, &[&number, &"WithholdingTaxAmount"]);
        return;
    };

    if withholding > gross {
        ctx.report(Rule::WithholdingExceedsGross, number, &[&number, &withholding, &gross]);
    }

    if !methods.is_empty() {
        let paid = checked_sum(methods.iter().map(|m| m.payment_amount));
        let net = paid.and_then(|p| p.checked_sub(withholding));
        let (Some(paid), Some(net)) = (paid, net) else {
            ctx.report(Rule::AmountOverflow, number, &[&number, &"PaymentAmount"]);
            return;
        };
        if !approx_eq(net, gross) {
            ctx.report(
                Rule::PaymentSumMismatch,
                number,
                &[&number, &format_money(paid), &format_money(withholding), &gross],
            );
        }
    }
}
