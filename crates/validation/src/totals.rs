//! Bottom-up recomputation of line, document and table totals.

use core::fmt::Display;

use rust_decimal::Decimal;

use saftpt_core::{StatusCode, approx_eq, checked_sum, format_money};
use saftpt_documents::{Column, DeclaredTotals, Line, SourceDocument, SourceTable};

use crate::reporter::Reporter;
use crate::rules::Rule;

/// Totals re-derived from the lines of one document.
///
/// Line amounts are magnitudes: a line adds to the net whichever column it
/// declares. Which column a document type may use is checked by the
/// debit/credit rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComputedTotals {
    pub net_total: Decimal,
    pub tax_payable: Decimal,
    pub gross_total: Decimal,
}

impl ComputedTotals {
    /// `None` when an intermediate sum leaves the decimal range.
    pub fn of<D: SourceDocument>(doc: &D) -> Option<Self> {
        let mut net = Decimal::ZERO;
        let mut tax = Decimal::ZERO;
        for line in doc.lines() {
            let amount = line.amount().unwrap_or_default();
            net = net.checked_add(amount)?;
            tax = tax.checked_add(line_tax(line, amount)?)?;
        }
        let net = net.checked_sub(doc.totals().settlement_total()?)?;
        Some(Self {
            net_total: net,
            tax_payable: tax,
            gross_total: net.checked_add(tax)?,
        })
    }
}

fn line_tax(line: &Line, amount: Decimal) -> Option<Decimal> {
    match &line.tax {
        Some(tax) => match (tax.tax_percentage, tax.tax_amount) {
            (Some(pct), _) => amount.checked_mul(pct)?.checked_div(Decimal::ONE_HUNDRED),
            (None, Some(fixed)) => Some(fixed),
            (None, None) => Some(Decimal::ZERO),
        },
        None => Some(Decimal::ZERO),
    }
}

/// Sum of one column over the lines of a document.
fn column_sum<D: SourceDocument>(doc: &D, column: Column) -> Option<Decimal> {
    checked_sum(doc.lines().iter().filter_map(|l| match column {
        Column::Debit => l.debit_amount,
        Column::Credit => l.credit_amount,
    }))
}

/// Compares declared totals with the values re-derived from the lines.
///
/// Each comparison is reported on its own, so a document with a wrong net
/// and a wrong gross yields two findings. Sums that leave the decimal range
/// are reported as overflows instead of being compared.
pub struct TotalsReconciler<'a> {
    reporter: &'a Reporter<'a>,
}

impl<'a> TotalsReconciler<'a> {
    pub fn new(reporter: &'a Reporter<'a>) -> Self {
        Self { reporter }
    }

    /// `UnitPrice * Quantity` against the declared line amount.
    pub fn reconcile_line(&self, document: &str, line: &Line) {
        let (Some(price), Some(quantity), Some(amount)) =
            (line.unit_price, line.quantity, line.amount())
        else {
            return;
        };
        let Some(expected) = price.checked_mul(quantity) else {
            let what = format!("line {} unit price times quantity", line.line_number);
            self.overflow(Some(document), &document, &what);
            return;
        };
        if !approx_eq(expected, amount) {
            self.reporter.report(
                Rule::LineAmountMismatch,
                Some(document),
                &[&document, &line.line_number, &amount, &format_money(expected)],
            );
        }
    }

    /// Line amounts, then the three declared document totals.
    ///
    /// Totals that are missing or malformed are skipped here; the field
    /// checks report them.
    pub fn reconcile_document<D: SourceDocument>(&self, doc: &D) -> Option<ComputedTotals> {
        let number = doc.document_number();
        for line in doc.lines() {
            self.reconcile_line(number, line);
        }

        let declared = doc.totals();
        let computed = ComputedTotals::of(doc);
        match computed {
            Some(computed) => {
                let checks = [
                    (Rule::NetTotalMismatch, declared.net_total.get(), computed.net_total),
                    (Rule::TaxPayableMismatch, declared.tax_payable.get(), computed.tax_payable),
                    (Rule::GrossTotalMismatch, declared.gross_total.get(), computed.gross_total),
                ];
                for (rule, declared, computed) in checks {
                    if let Some(declared) = declared {
                        if !approx_eq(declared, computed) {
                            let computed = format_money(computed);
                            self.reporter
                                .report(rule, Some(number), &[&number, &declared, &computed]);
                        }
                    }
                }
            }
            None => self.overflow(Some(number), &number, &"the sum of its lines"),
        }

        if let (Some(net), Some(tax), Some(gross)) = (
            declared.net_total.get(),
            declared.tax_payable.get(),
            declared.gross_total.get(),
        ) {
            match net.checked_add(tax) {
                Some(sum) if approx_eq(gross, sum) => {}
                Some(sum) => self.reporter.report(
                    Rule::DeclaredGrossInconsistent,
                    Some(number),
                    &[&number, &gross, &sum],
                ),
                None => self.overflow(Some(number), &number, &"declared NetTotal + TaxPayable"),
            }
        }

        computed
    }

    /// Table aggregates and the table's zero column.
    pub fn reconcile_table<T: SourceTable>(&self, table: &T) {
        let kind = T::KIND;
        let docs = table.documents();
        let counted = || docs.iter().filter(|d| !d.status().status.excluded_from_totals());

        match table.declared_totals() {
            DeclaredTotals::Monetary {
                number_of_entries,
                total_debit,
                total_credit,
            } => {
                let entries = docs.len() as u64;
                if entries != number_of_entries {
                    self.reporter.report(
                        Rule::NumberOfEntriesMismatch,
                        None,
                        &[&kind, &number_of_entries, &entries],
                    );
                }
                let columns = [
                    (Rule::TotalDebitMismatch, Column::Debit, total_debit),
                    (Rule::TotalCreditMismatch, Column::Credit, total_credit),
                ];
                for (rule, column, declared) in columns {
                    let sum = counted().try_fold(Decimal::ZERO, |acc, d| {
                        acc.checked_add(column_sum(d, column)?)
                    });
                    match sum {
                        Some(sum) if approx_eq(sum, declared) => {}
                        Some(sum) => {
                            let sum = format_money(sum);
                            self.reporter.report(rule, None, &[&kind, &declared, &sum]);
                        }
                        None => self.overflow(None, &kind, &column),
                    }
                }
            }
            DeclaredTotals::Quantity {
                number_of_movement_lines,
                total_quantity_issued,
            } => {
                let lines: u64 = counted().map(|d| d.lines().len() as u64).sum();
                if lines != number_of_movement_lines {
                    self.reporter.report(
                        Rule::NumberOfMovementLinesMismatch,
                        None,
                        &[&kind, &number_of_movement_lines, &lines],
                    );
                }
                let quantity = checked_sum(
                    counted().flat_map(|d| d.lines().iter().filter_map(|l| l.quantity)),
                );
                match quantity {
                    Some(quantity) if quantity == total_quantity_issued => {}
                    Some(quantity) => self.reporter.report(
                        Rule::TotalQuantityIssuedMismatch,
                        None,
                        &[&kind, &total_quantity_issued, &quantity],
                    ),
                    None => self.overflow(None, &kind, &"TotalQuantityIssued"),
                }
            }
        }

        if let Some(column) = kind.zero_column() {
            for doc in counted() {
                let number = doc.document_number();
                match column_sum(doc, column) {
                    Some(amount) if amount.is_zero() => {}
                    Some(amount) => self.reporter.report(
                        Rule::ZeroColumnViolation,
                        Some(number),
                        &[&number, &amount, &column, &kind],
                    ),
                    None => self.overflow(Some(number), &number, &column),
                }
            }
        }

        tracing::debug!(table = %kind, documents = docs.len(), "table totals reconciled");
    }

    fn overflow(&self, document: Option<&str>, subject: &dyn Display, what: &dyn Display) {
        self.reporter.report(Rule::AmountOverflow, document, &[subject, what]);
    }
}
