//! Groups the documents of one table into `type → series → number` order.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use saftpt_core::{DocumentNumber, DomainError, SeriesKey};
use saftpt_documents::{SourceDocument, TableKind};

use crate::reporter::Reporter;
use crate::rules::Rule;

/// Ordered view over the documents of one table.
///
/// Documents whose number does not parse are reported and left out; a second
/// document on an occupied slot is reported and left out (the first one
/// wins, so totals and chains see a stable copy).
#[derive(Debug)]
pub struct DocumentIndex<'a, D> {
    series: BTreeMap<SeriesKey, BTreeMap<u64, &'a D>>,
    indexed: usize,
}

impl<'a, D: SourceDocument> DocumentIndex<'a, D> {
    pub fn build(table: TableKind, documents: &'a [D], reporter: &Reporter<'_>) -> Self {
        let mut series: BTreeMap<SeriesKey, BTreeMap<u64, &'a D>> = BTreeMap::new();
        let mut indexed = 0;

        for (index, doc) in documents.iter().enumerate() {
            let raw = doc.document_number();
            let number = match raw.parse::<DocumentNumber>() {
                Ok(n) => n,
                Err(err) => {
                    let rule = match err {
                        DomainError::DocumentNumberOutOfRange(_) => Rule::DocumentNumberOutOfRange,
                        _ => Rule::UnparsableDocumentNumber,
                    };
                    reporter.report(rule, None, &[&index, &table, &raw]);
                    continue;
                }
            };

            if number.doc_type != doc.type_code() {
                reporter.report(
                    Rule::DocumentTypeMismatch,
                    Some(raw),
                    &[&raw, &number.doc_type, &doc.type_code()],
                );
            }

            match series.entry(number.series_key()).or_default().entry(number.number) {
                Entry::Occupied(_) => {
                    reporter.report(
                        Rule::DuplicateDocumentNumber,
                        Some(raw),
                        &[&number, &table, &index],
                    );
                }
                Entry::Vacant(slot) => {
                    slot.insert(doc);
                    indexed += 1;
                }
            }
        }

        let index = Self { series, indexed };
        index.report_gaps(reporter);

        tracing::debug!(
            table = %table,
            documents = documents.len(),
            indexed,
            series = index.series.len(),
            "table indexed"
        );
        index
    }

    fn report_gaps(&self, reporter: &Reporter<'_>) {
        for (key, docs) in &self.series {
            let mut previous: Option<u64> = None;
            for &n in docs.keys() {
                if let Some(p) = previous {
                    if n > p + 1 {
                        let (first, last) = (p + 1, n - 1);
                        reporter.report(Rule::MissingDocumentNumber, None, &[key, &first, &last]);
                    }
                }
                previous = Some(n);
            }
        }
    }

    /// Number of documents that made it into the index.
    pub fn len(&self) -> usize {
        self.indexed
    }

    pub fn is_empty(&self) -> bool {
        self.indexed == 0
    }

    pub fn get(&self, number: &DocumentNumber) -> Option<&'a D> {
        self.series
            .get(&number.series_key())
            .and_then(|docs| docs.get(&number.number))
            .copied()
    }

    /// Every series with its documents in ascending number order.
    pub fn series(&self) -> impl Iterator<Item = (&SeriesKey, Vec<&'a D>)> + '_ {
        self.series
            .iter()
            .map(|(key, docs)| (key, docs.values().copied().collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValidationConfig;
    use crate::rules::BuiltinCatalog;
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use saftpt_core::{ErrorRegister, InvoiceType};
    use saftpt_documents::Invoice;

    fn invoice(number: &str) -> Invoice {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        Invoice::new(number, InvoiceType::Invoice, date, date.and_hms_opt(10, 0, 0).unwrap(), "C1")
    }

    fn codes(register: &ErrorRegister) -> Vec<String> {
        register.validation_errors().into_iter().map(|e| e.code).collect()
    }

    #[test]
    fn duplicate_number_keeps_first_and_reports_once() {
        let register = ErrorRegister::new();
        let reporter = Reporter::new(&register, &BuiltinCatalog, ValidationConfig::default());
        let mut first = invoice("FT FT/1");
        first.customer_id = "first".to_string();
        let mut second = invoice("FT FT/1");
        second.customer_id = "second".to_string();
        let docs = vec![first, second];

        let index = DocumentIndex::build(TableKind::SalesInvoices, &docs, &reporter);

        assert_eq!(codes(&register), vec!["duplicate_document_number".to_string()]);
        assert_eq!(index.len(), 1);
        let kept = index.get(&"FT FT/1".parse().unwrap()).unwrap();
        assert_eq!(kept.customer_id, "first");
    }

    #[test]
    fn unparsable_number_is_reported_with_its_index() {
        let register = ErrorRegister::new();
        let reporter = Reporter::new(&register, &BuiltinCatalog, ValidationConfig::default());
        let docs = vec![invoice("FT A/1"), invoice("FT-A-2"), invoice("FT A/2")];

        let index = DocumentIndex::build(TableKind::SalesInvoices, &docs, &reporter);

        let errors = register.validation_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, "unparsable_document_number");
        assert!(errors[0].message.contains("index 1"));
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn sequence_past_u64_gets_its_own_finding() {
        let register = ErrorRegister::new();
        let reporter = Reporter::new(&register, &BuiltinCatalog, ValidationConfig::default());
        let docs = vec![invoice("FT A/1"), invoice("FT A/99999999999999999999")];

        let index = DocumentIndex::build(TableKind::SalesInvoices, &docs, &reporter);

        let errors = register.validation_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, "document_number_out_of_range");
        assert_eq!(
            errors[0].message,
            "document at index 1 of SalesInvoices has number \"FT A/99999999999999999999\" \
             past the u64 sequence range"
        );
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn series_are_ordered_numerically_and_gaps_reported() {
        let register = ErrorRegister::new();
        let reporter = Reporter::new(&register, &BuiltinCatalog, ValidationConfig::default());
        let docs: Vec<Invoice> = ["FT B/10", "FT A/3", "FT B/2", "FT B/9", "FT A/4"]
            .into_iter()
            .map(invoice)
            .collect();

        let index = DocumentIndex::build(TableKind::SalesInvoices, &docs, &reporter);

        let series: Vec<(String, Vec<&str>)> = index
            .series()
            .map(|(k, docs)| (k.to_string(), docs.iter().map(|d| d.invoice_no.as_str()).collect()))
            .collect();
        assert_eq!(
            series,
            vec![
                ("FT A".to_string(), vec!["FT A/3", "FT A/4"]),
                ("FT B".to_string(), vec!["FT B/2", "FT B/9", "FT B/10"]),
            ]
        );
        let errors = register.validation_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, "missing_document_number");
        assert_eq!(errors[0].message, "series FT B skips numbers 3 to 8");
    }

    #[test]
    fn number_prefix_must_match_declared_type() {
        let register = ErrorRegister::new();
        let reporter = Reporter::new(&register, &BuiltinCatalog, ValidationConfig::default());
        let docs = vec![invoice("NC A/1")];

        DocumentIndex::build(TableKind::SalesInvoices, &docs, &reporter);

        assert_eq!(codes(&register), vec!["document_type_mismatch".to_string()]);
    }

    #[test]
    fn numbering_findings_follow_the_config() {
        let register = ErrorRegister::new();
        let config = ValidationConfig {
            numbering: false,
            ..ValidationConfig::default()
        };
        let reporter = Reporter::new(&register, &BuiltinCatalog, config);
        let docs = vec![invoice("FT A/1"), invoice("FT A/1"), invoice("bad")];

        let index = DocumentIndex::build(TableKind::SalesInvoices, &docs, &reporter);

        assert!(!register.has_errors());
        assert_eq!(index.len(), 1);
    }

    proptest! {
        #[test]
        fn each_distinct_number_is_indexed_once(
            numbers in prop::collection::vec(1u64..40u64, 1..60),
        ) {
            let register = ErrorRegister::new();
            let reporter = Reporter::new(
                &register,
                &BuiltinCatalog,
                ValidationConfig { numbering: true, ..ValidationConfig::default() },
            );
            let docs: Vec<Invoice> =
                numbers.iter().map(|n| invoice(&format!("FT A/{n}"))).collect();

            let index = DocumentIndex::build(TableKind::SalesInvoices, &docs, &reporter);

            let distinct: std::collections::BTreeSet<u64> = numbers.iter().copied().collect();
            prop_assert_eq!(index.len(), distinct.len());
            let duplicates = register
                .validation_errors()
                .iter()
                .filter(|e| e.code == "duplicate_document_number")
                .count();
            prop_assert_eq!(duplicates, numbers.len() - distinct.len());
        }
    }
}
