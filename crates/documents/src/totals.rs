use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use saftpt_core::{Field, PaymentMechanism, checked_sum};

/// Amount in a foreign currency and the rate used to convert it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Currency {
    pub currency_code: String,
    pub currency_amount: Decimal,
    pub exchange_rate: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Settlement {
    pub settlement_discount: Option<String>,
    pub settlement_amount: Option<Decimal>,
    pub settlement_date: Option<NaiveDate>,
    pub payment_terms: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PaymentMethod {
    pub payment_mechanism: Option<PaymentMechanism>,
    pub payment_amount: Decimal,
    pub payment_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WithholdingTax {
    pub withholding_tax_type: Option<String>,
    pub withholding_tax_description: Option<String>,
    pub withholding_tax_amount: Decimal,
}

impl WithholdingTax {
    pub fn new(amount: Decimal) -> Self {
        Self {
            withholding_tax_type: None,
            withholding_tax_description: None,
            withholding_tax_amount: amount,
        }
    }
}

/// Declared document totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DocumentTotals {
    pub tax_payable: Field<Decimal>,
    pub net_total: Field<Decimal>,
    pub gross_total: Field<Decimal>,
    pub currency: Option<Currency>,
    #[serde(rename = "Settlement")]
    pub settlement: Vec<Settlement>,
    /// Payment mechanisms of an invoice-receipt.
    #[serde(rename = "Payment")]
    pub payment: Vec<PaymentMethod>,
}

impl DocumentTotals {
    pub fn new(net_total: Decimal, tax_payable: Decimal, gross_total: Decimal) -> Self {
        Self {
            tax_payable: Field::Valid(tax_payable),
            net_total: Field::Valid(net_total),
            gross_total: Field::Valid(gross_total),
            ..Self::default()
        }
    }

    /// Sum of the settlement amounts; `None` if it overflows.
    pub fn settlement_total(&self) -> Option<Decimal> {
        checked_sum(self.settlement.iter().filter_map(|s| s.settlement_amount))
    }
}
