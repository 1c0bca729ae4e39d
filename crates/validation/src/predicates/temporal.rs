//! Date ordering inside a series, the file period and status dates.

use saftpt_core::StatusCode;
use saftpt_documents::SourceDocument;

use super::RuleContext;
use crate::rules::Rule;

pub fn check_header(ctx: &RuleContext<'_>) {
    let header = ctx.header;
    if header.start_date > header.end_date {
        ctx.reporter
            .report(Rule::HeaderPeriodInverted, None, &[&header.start_date, &header.end_date]);
    }
}

/// `Date` and `SystemEntryDate` never go backwards along a series given in
/// ascending number order. Documents without a usable value are skipped and
/// do not move the comparison point.
pub fn check_series<D: SourceDocument>(ctx: &RuleContext<'_>, docs: &[&D]) {
    let mut last_date = None;
    let mut last_entry = None;

    for &doc in docs {
        let number = doc.document_number();

        if let Some(date) = doc.date().get() {
            if let Some((prev, prev_doc)) = last_date {
                if date < prev {
                    ctx.report(Rule::DateOrder, number, &[&number, &date, &prev, &prev_doc]);
                }
            }
            last_date = Some((date, number));
        }

        if let Some(entry) = doc.system_entry_date().get() {
            if let Some((prev, prev_doc)) = last_entry {
                if entry < prev {
                    ctx.report(
                        Rule::SystemEntryDateOrder,
                        number,
                        &[&number, &entry, &prev, &prev_doc],
                    );
                }
            }
            last_entry = Some((entry, number));
        }
    }
}

pub fn check_document<D: SourceDocument>(ctx: &RuleContext<'_>, doc: &D) {
    let number = doc.document_number();
    let header = ctx.header;

    if let Some(date) = doc.date().get() {
        if !header.covers(date) {
            ctx.report(
                Rule::DateOutsidePeriod,
                number,
                &[&number, &date, &header.start_date, &header.end_date],
            );
        }
    }

    let status = doc.status();
    let has_reason = status.reason.as_deref().is_some_and(|r| !r.trim().is_empty());
    if status.status.is_cancelled() && !has_reason {
        ctx.report(Rule::CancelledWithoutReason, number, &[&number, &status.status_date]);
    }
}
