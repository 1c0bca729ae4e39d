//! Required scalars and line numbering.

use saftpt_core::Field;
use saftpt_documents::SourceDocument;

use super::RuleContext;
use crate::rules::Rule;

fn required<T>(ctx: &RuleContext<'_>, document: &str, name: &str, field: &Field<T>) {
    match field {
        Field::Unset => ctx.report(Rule::FieldMissing, document, &[&document, &name]),
        Field::Invalid(raw) => ctx.report(Rule::FieldMalformed, document, &[&document, &name, raw]),
        Field::Valid(_) => {}
    }
}

/// Dates and declared totals. Missing is an error, malformed a warning.
pub fn check_required<D: SourceDocument>(ctx: &RuleContext<'_>, doc: &D) {
    let number = doc.document_number();
    let totals = doc.totals();
    required(ctx, number, "Date", doc.date());
    required(ctx, number, "SystemEntryDate", doc.system_entry_date());
    required(ctx, number, "NetTotal", &totals.net_total);
    required(ctx, number, "TaxPayable", &totals.tax_payable);
    required(ctx, number, "GrossTotal", &totals.gross_total);
}

/// Lines must be numbered `1..=N` in order.
pub fn check_line_numbers<D: SourceDocument>(ctx: &RuleContext<'_>, doc: &D) {
    let number = doc.document_number();
    for (position, line) in (1u32..).zip(doc.lines()) {
        if line.line_number != position {
            ctx.report(
                Rule::LineNumberSequence,
                number,
                &[&number, &position, &line.line_number, &position],
            );
        }
    }
}
