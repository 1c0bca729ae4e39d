use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use saftpt_core::{Field, WorkStatus, WorkType};

use crate::document::{
    DeclaredTotals, DocumentStatus, HashFields, SourceDocument, SourceTable, TableKind,
    monetary_totals,
};
use crate::line::Line;
use crate::totals::DocumentTotals;

/// Working (conference) document: orders, budgets, pro-formas, ...
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WorkDocument {
    pub document_number: String,
    #[serde(rename = "ATCUD")]
    pub atcud: Option<String>,
    pub document_status: DocumentStatus<WorkStatus>,
    pub hash: String,
    pub hash_control: String,
    pub period: Option<u8>,
    #[serde(default)]
    pub work_date: Field<NaiveDate>,
    pub work_type: WorkType,
    #[serde(rename = "SourceID")]
    pub source_id: String,
    #[serde(rename = "EACCode")]
    pub eac_code: Option<String>,
    #[serde(default)]
    pub system_entry_date: Field<NaiveDateTime>,
    #[serde(rename = "TransactionID", default)]
    pub transaction_ids: Vec<String>,
    #[serde(rename = "CustomerID")]
    pub customer_id: String,
    #[serde(rename = "Line", default)]
    pub lines: Vec<Line>,
    #[serde(default)]
    pub document_totals: DocumentTotals,
}

impl WorkDocument {
    pub fn new(
        document_number: impl Into<String>,
        work_type: WorkType,
        work_date: NaiveDate,
        system_entry_date: NaiveDateTime,
        customer_id: impl Into<String>,
    ) -> Self {
        Self {
            document_number: document_number.into(),
            atcud: None,
            document_status: DocumentStatus::new(WorkStatus::Normal, system_entry_date),
            hash: String::new(),
            hash_control: "1".to_string(),
            period: None,
            work_date: Field::Valid(work_date),
            work_type,
            source_id: "system".to_string(),
            eac_code: None,
            system_entry_date: Field::Valid(system_entry_date),
            transaction_ids: Vec::new(),
            customer_id: customer_id.into(),
            lines: Vec::new(),
            document_totals: DocumentTotals::default(),
        }
    }

    pub fn with_line(mut self, line: Line) -> Self {
        self.lines.push(line);
        self
    }

    pub fn with_totals(mut self, totals: DocumentTotals) -> Self {
        self.document_totals = totals;
        self
    }

    pub fn with_status(mut self, status: DocumentStatus<WorkStatus>) -> Self {
        self.document_status = status;
        self
    }
}

impl SourceDocument for WorkDocument {
    type Status = WorkStatus;

    fn document_number(&self) -> &str {
        &self.document_number
    }

    fn type_code(&self) -> &'static str {
        self.work_type.code()
    }

    fn date(&self) -> &Field<NaiveDate> {
        &self.work_date
    }

    fn system_entry_date(&self) -> &Field<NaiveDateTime> {
        &self.system_entry_date
    }

    fn status(&self) -> &DocumentStatus<WorkStatus> {
        &self.document_status
    }

    fn lines(&self) -> &[Line] {
        &self.lines
    }

    fn totals(&self) -> &DocumentTotals {
        &self.document_totals
    }

    fn hash_fields(&self) -> Option<HashFields<'_>> {
        Some(HashFields {
            hash: &self.hash,
            hash_control: &self.hash_control,
        })
    }

    fn customer_id(&self) -> Option<&str> {
        Some(self.customer_id.as_str()).filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WorkingDocuments {
    pub number_of_entries: u64,
    pub total_debit: Decimal,
    pub total_credit: Decimal,
    #[serde(rename = "WorkDocument", default)]
    pub work_documents: Vec<WorkDocument>,
}

impl WorkingDocuments {
    /// Table whose declared aggregates are computed from `work_documents`.
    pub fn new(work_documents: Vec<WorkDocument>) -> Self {
        let (number_of_entries, total_debit, total_credit) = monetary_totals(&work_documents);
        Self {
            number_of_entries,
            total_debit,
            total_credit,
            work_documents,
        }
    }
}

impl SourceTable for WorkingDocuments {
    type Document = WorkDocument;

    const KIND: TableKind = TableKind::WorkingDocuments;

    fn documents(&self) -> &[WorkDocument] {
        &self.work_documents
    }

    fn declared_totals(&self) -> DeclaredTotals {
        DeclaredTotals::Monetary {
            number_of_entries: self.number_of_entries,
            total_debit: self.total_debit,
            total_credit: self.total_credit,
        }
    }
}
