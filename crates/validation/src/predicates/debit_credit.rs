use saftpt_documents::{Column, SourceDocument};

use super::RuleContext;
use crate::rules::Rule;

fn amount_field(column: Column) -> &'static str {
    match column {
        Column::Debit => "DebitAmount",
        Column::Credit => "CreditAmount",
    }
}

/// Exactly one side per line, and the side the document type dictates.
pub fn check_document<D: SourceDocument>(ctx: &RuleContext<'_>, doc: &D) {
    let number = doc.document_number();
    let expected = doc.line_column();

    for line in doc.lines() {
        let n = line.line_number;
        let side = match (line.debit_amount, line.credit_amount) {
            (Some(_), Some(_)) => {
                ctx.report(Rule::DebitAndCredit, number, &[&number, &n]);
                continue;
            }
            (None, None) => {
                ctx.report(Rule::NeitherDebitNorCredit, number, &[&number, &n]);
                continue;
            }
            (Some(_), None) => Column::Debit,
            (None, Some(_)) => Column::Credit,
        };
        if let Some(expected) = expected {
            if side != expected {
                ctx.report(
                    Rule::WrongLineColumn,
                    number,
                    &[&number, &n, &doc.type_code(), &amount_field(expected)],
                );
            }
        }
    }
}
