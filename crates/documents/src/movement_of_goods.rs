use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use saftpt_core::{Field, MovementStatus, MovementType, StatusCode};

use crate::document::{
    DeclaredTotals, DocumentStatus, HashFields, PartyRule, ShippingPoint, SourceDocument,
    SourceTable, TableKind,
};
use crate::line::Line;
use crate::totals::DocumentTotals;

/// Stock movement / transport document (`GR`, `GT`, `GA`, `GC`, `GD`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StockMovement {
    pub document_number: String,
    #[serde(rename = "ATCUD")]
    pub atcud: Option<String>,
    pub document_status: DocumentStatus<MovementStatus>,
    pub hash: String,
    pub hash_control: String,
    pub period: Option<u8>,
    #[serde(default)]
    pub movement_date: Field<NaiveDate>,
    pub movement_type: MovementType,
    #[serde(default)]
    pub system_entry_date: Field<NaiveDateTime>,
    #[serde(rename = "TransactionID", default)]
    pub transaction_ids: Vec<String>,
    #[serde(rename = "CustomerID")]
    pub customer_id: Option<String>,
    #[serde(rename = "SupplierID")]
    pub supplier_id: Option<String>,
    #[serde(rename = "SourceID")]
    pub source_id: String,
    #[serde(rename = "EACCode")]
    pub eac_code: Option<String>,
    pub movement_comments: Option<String>,
    pub ship_to: Option<ShippingPoint>,
    pub ship_from: Option<ShippingPoint>,
    pub movement_end_time: Option<NaiveDateTime>,
    pub movement_start_time: Option<NaiveDateTime>,
    #[serde(rename = "ATDocCodeID")]
    pub at_doc_code_id: Option<String>,
    #[serde(rename = "Line", default)]
    pub lines: Vec<Line>,
    #[serde(default)]
    pub document_totals: DocumentTotals,
}

impl StockMovement {
    pub fn new(
        document_number: impl Into<String>,
        movement_type: MovementType,
        movement_date: NaiveDate,
        system_entry_date: NaiveDateTime,
    ) -> Self {
        Self {
            document_number: document_number.into(),
            atcud: None,
            document_status: DocumentStatus::new(MovementStatus::Normal, system_entry_date),
            hash: String::new(),
            hash_control: "1".to_string(),
            period: None,
            movement_date: Field::Valid(movement_date),
            movement_type,
            system_entry_date: Field::Valid(system_entry_date),
            transaction_ids: Vec::new(),
            customer_id: None,
            supplier_id: None,
            source_id: "system".to_string(),
            eac_code: None,
            movement_comments: None,
            ship_to: None,
            ship_from: None,
            movement_end_time: None,
            movement_start_time: None,
            at_doc_code_id: None,
            lines: Vec::new(),
            document_totals: DocumentTotals::default(),
        }
    }

    pub fn for_customer(mut self, customer_id: impl Into<String>) -> Self {
        self.customer_id = Some(customer_id.into());
        self
    }

    pub fn for_supplier(mut self, supplier_id: impl Into<String>) -> Self {
        self.supplier_id = Some(supplier_id.into());
        self
    }

    pub fn shipped(
        mut self,
        from: ShippingPoint,
        to: ShippingPoint,
        start: NaiveDateTime,
        end: Option<NaiveDateTime>,
    ) -> Self {
        self.ship_from = Some(from);
        self.ship_to = Some(to);
        self.movement_start_time = Some(start);
        self.movement_end_time = end;
        self
    }

    pub fn with_line(mut self, line: Line) -> Self {
        self.lines.push(line);
        self
    }

    pub fn with_totals(mut self, totals: DocumentTotals) -> Self {
        self.document_totals = totals;
        self
    }
}

impl SourceDocument for StockMovement {
    type Status = MovementStatus;

    fn document_number(&self) -> &str {
        &self.document_number
    }

    fn type_code(&self) -> &'static str {
        self.movement_type.code()
    }

    fn date(&self) -> &Field<NaiveDate> {
        &self.movement_date
    }

    fn system_entry_date(&self) -> &Field<NaiveDateTime> {
        &self.system_entry_date
    }

    fn status(&self) -> &DocumentStatus<MovementStatus> {
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
        self.customer_id.as_deref().filter(|id| !id.is_empty())
    }

    fn supplier_id(&self) -> Option<&str> {
        self.supplier_id.as_deref().filter(|id| !id.is_empty())
    }

    fn party_rule(&self) -> PartyRule {
        PartyRule::CustomerOrSupplier
    }

    fn ship_from(&self) -> Option<&ShippingPoint> {
        self.ship_from.as_ref()
    }

    fn ship_to(&self) -> Option<&ShippingPoint> {
        self.ship_to.as_ref()
    }

    fn movement_start_time(&self) -> Option<NaiveDateTime> {
        self.movement_start_time
    }

    fn movement_end_time(&self) -> Option<NaiveDateTime> {
        self.movement_end_time
    }

    fn is_transport_document(&self) -> bool {
        self.movement_type.is_transport() || self.movement_start_time.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MovementOfGoods {
    pub number_of_movement_lines: u64,
    pub total_quantity_issued: Decimal,
    #[serde(rename = "StockMovement", default)]
    pub stock_movements: Vec<StockMovement>,
}

impl MovementOfGoods {
    /// Table whose declared aggregates are computed from `stock_movements`.
    pub fn new(stock_movements: Vec<StockMovement>) -> Self {
        let mut lines = 0u64;
        let mut quantity = Decimal::ZERO;
        for doc in stock_movements
            .iter()
            .filter(|d| !d.document_status.status.excluded_from_totals())
        {
            lines += doc.lines.len() as u64;
            for line_quantity in doc.lines.iter().filter_map(|l| l.quantity) {
                quantity = quantity.saturating_add(line_quantity);
            }
        }
        Self {
            number_of_movement_lines: lines,
            total_quantity_issued: quantity,
            stock_movements,
        }
    }
}

impl SourceTable for MovementOfGoods {
    type Document = StockMovement;

    const KIND: TableKind = TableKind::MovementOfGoods;

    fn documents(&self) -> &[StockMovement] {
        &self.stock_movements
    }

    fn declared_totals(&self) -> DeclaredTotals {
        DeclaredTotals::Quantity {
            number_of_movement_lines: self.number_of_movement_lines,
            total_quantity_issued: self.total_quantity_issued,
        }
    }
}
