use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use saftpt_core::TaxType;

/// Tax applied to a line: exactly one of percentage or fixed amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Tax {
    pub tax_type: TaxType,
    pub tax_country_region: String,
    pub tax_code: String,
    pub tax_percentage: Option<Decimal>,
    pub tax_amount: Option<Decimal>,
}

impl Tax {
    pub fn percentage(
        tax_type: TaxType,
        region: impl Into<String>,
        code: impl Into<String>,
        pct: Decimal,
    ) -> Self {
        Self {
            tax_type,
            tax_country_region: region.into(),
            tax_code: code.into(),
            tax_percentage: Some(pct),
            tax_amount: None,
        }
    }

    pub fn fixed_amount(
        tax_type: TaxType,
        region: impl Into<String>,
        code: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        Self {
            tax_type,
            tax_country_region: region.into(),
            tax_code: code.into(),
            tax_percentage: None,
            tax_amount: Some(amount),
        }
    }

    /// `true` when the effective rate is zero (percentage 0, or amount 0).
    pub fn is_zero_rate(&self) -> bool {
        match (self.tax_percentage, self.tax_amount) {
            (Some(p), _) => p.is_zero(),
            (None, Some(a)) => a.is_zero(),
            (None, None) => false,
        }
    }
}

/// Link from an invoice line to the order/document it originates on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OrderReference {
    #[serde(rename = "OriginatingON")]
    pub originating_on: String,
    pub order_date: Option<NaiveDate>,
}

/// Link from a correcting document (e.g. a credit note) to the corrected one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Reference {
    pub reference: String,
    pub reason: Option<String>,
}

/// Document settled by a receipt line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SourceDocumentRef {
    #[serde(rename = "OriginatingON")]
    pub originating_on: String,
    pub invoice_date: NaiveDate,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CustomsInformation {
    #[serde(rename = "ARCNo")]
    pub arc_no: Vec<String>,
    #[serde(rename = "IECAmount")]
    pub iec_amount: Option<Decimal>,
}

/// Document line, shared by the four tables.
///
/// Receipt lines use `source_documents` instead of product data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Line {
    pub line_number: u32,
    #[serde(rename = "OrderReferences")]
    pub order_references: Vec<OrderReference>,
    pub product_code: Option<String>,
    pub product_description: Option<String>,
    pub quantity: Option<Decimal>,
    pub unit_of_measure: Option<String>,
    pub unit_price: Option<Decimal>,
    pub tax_point_date: Option<NaiveDate>,
    #[serde(rename = "References")]
    pub references: Vec<Reference>,
    pub description: Option<String>,
    #[serde(rename = "SourceDocumentID")]
    pub source_documents: Vec<SourceDocumentRef>,
    pub debit_amount: Option<Decimal>,
    pub credit_amount: Option<Decimal>,
    pub tax: Option<Tax>,
    pub tax_exemption_reason: Option<String>,
    pub tax_exemption_code: Option<String>,
    pub settlement_amount: Option<Decimal>,
    pub customs_information: Option<CustomsInformation>,
}

impl Line {
    pub fn new(line_number: u32) -> Self {
        Self {
            line_number,
            ..Self::default()
        }
    }

    /// Product line with `amount = quantity * unit_price` on the credit side.
    ///
    /// The amount saturates at the decimal range.
    pub fn credit(
        line_number: u32,
        product_code: impl Into<String>,
        quantity: Decimal,
        unit_price: Decimal,
        tax: Tax,
    ) -> Self {
        Self::new(line_number)
            .with_product(product_code, quantity, unit_price)
            .with_credit(quantity.saturating_mul(unit_price))
            .with_tax(tax)
    }

    /// Product line with `amount = quantity * unit_price` on the debit side.
    ///
    /// The amount saturates at the decimal range.
    pub fn debit(
        line_number: u32,
        product_code: impl Into<String>,
        quantity: Decimal,
        unit_price: Decimal,
        tax: Tax,
    ) -> Self {
        Self::new(line_number)
            .with_product(product_code, quantity, unit_price)
            .with_debit(quantity.saturating_mul(unit_price))
            .with_tax(tax)
    }

    pub fn with_product(
        mut self,
        product_code: impl Into<String>,
        quantity: Decimal,
        unit_price: Decimal,
    ) -> Self {
        let code = product_code.into();
        self.product_description = Some(code.clone());
        self.product_code = Some(code);
        self.quantity = Some(quantity);
        self.unit_of_measure = Some("UN".to_string());
        self.unit_price = Some(unit_price);
        self
    }

    pub fn with_debit(mut self, amount: Decimal) -> Self {
        self.debit_amount = Some(amount);
        self
    }

    pub fn with_credit(mut self, amount: Decimal) -> Self {
        self.credit_amount = Some(amount);
        self
    }

    pub fn with_tax(mut self, tax: Tax) -> Self {
        self.tax = Some(tax);
        self
    }

    pub fn with_exemption(mut self, code: impl Into<String>, reason: impl Into<String>) -> Self {
        self.tax_exemption_code = Some(code.into());
        self.tax_exemption_reason = Some(reason.into());
        self
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.references.push(Reference {
            reference: reference.into(),
            reason: None,
        });
        self
    }

    pub fn with_order_reference(
        mut self,
        originating_on: impl Into<String>,
        order_date: Option<NaiveDate>,
    ) -> Self {
        self.order_references.push(OrderReference {
            originating_on: originating_on.into(),
            order_date,
        });
        self
    }

    pub fn with_source_document(
        mut self,
        originating_on: impl Into<String>,
        invoice_date: NaiveDate,
    ) -> Self {
        self.source_documents.push(SourceDocumentRef {
            originating_on: originating_on.into(),
            invoice_date,
            description: None,
        });
        self
    }

    /// The declared amount, whichever side it is on.
    pub fn amount(&self) -> Option<Decimal> {
        self.debit_amount.or(self.credit_amount)
    }
}
