//! Tax composition of each line and its agreement with the tax table.

use saftpt_core::TaxType;
use saftpt_documents::{Line, SourceDocument, TableKind};

use super::RuleContext;
use crate::rules::Rule;

/// Whether every line of a table must carry a tax block.
fn tax_required(kind: TableKind) -> bool {
    matches!(kind, TableKind::SalesInvoices | TableKind::WorkingDocuments)
}

pub fn check_document<D: SourceDocument>(ctx: &RuleContext<'_>, kind: TableKind, doc: &D) {
    let number = doc.document_number();
    for line in doc.lines() {
        check_line(ctx, kind, number, line);
    }
}

pub fn check_line(ctx: &RuleContext<'_>, kind: TableKind, document: &str, line: &Line) {
    let n = line.line_number;
    let has_exemption = line.tax_exemption_code.is_some() || line.tax_exemption_reason.is_some();

    let Some(tax) = &line.tax else {
        if tax_required(kind) {
            ctx.report(Rule::TaxMissing, document, &[&document, &n]);
        }
        return;
    };

    match (tax.tax_percentage, tax.tax_amount) {
        (Some(_), Some(_)) => ctx.report(Rule::TaxPercentageAndAmount, document, &[&document, &n]),
        (None, None) => ctx.report(Rule::TaxRateMissing, document, &[&document, &n]),
        (None, Some(_)) if tax.tax_type == TaxType::Iva => {
            ctx.report(Rule::IvaWithoutPercentage, document, &[&document, &n])
        }
        _ => {}
    }

    let zero_rate = tax.is_zero_rate();
    let full_exemption = line.tax_exemption_code.is_some() && line.tax_exemption_reason.is_some();
    if zero_rate && !full_exemption {
        ctx.report(Rule::ZeroRateWithoutExemption, document, &[&document, &n]);
    }
    if has_exemption && !zero_rate {
        ctx.report(Rule::ExemptionWithoutZeroRate, document, &[&document, &n]);
    }

    match ctx.tax_entry(tax.tax_type, &tax.tax_country_region, &tax.tax_code) {
        None => ctx.report(
            Rule::TaxCodeUnknown,
            document,
            &[&document, &n, &tax.tax_type, &tax.tax_country_region, &tax.tax_code],
        ),
        Some(entry) => {
            if let (Some(declared), Some(table)) = (tax.tax_percentage, entry.tax_percentage) {
                if declared != table {
                    ctx.report(
                        Rule::TaxPercentageMismatch,
                        document,
                        &[&document, &n, &declared, &table],
                    );
                }
            }
        }
    }
}
