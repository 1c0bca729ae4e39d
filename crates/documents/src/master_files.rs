use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use saftpt_core::TaxType;

/// Postal address. Every part is optional on input; rules decide which ones
/// a given use requires.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Address {
    pub building_number: Option<String>,
    pub street_name: Option<String>,
    pub address_detail: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
}

impl Address {
    pub fn new(
        address_detail: impl Into<String>,
        city: impl Into<String>,
        postal_code: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            address_detail: Some(address_detail.into()),
            city: Some(city.into()),
            postal_code: Some(postal_code.into()),
            country: Some(country.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Customer {
    #[serde(rename = "CustomerID")]
    pub customer_id: String,
    #[serde(rename = "AccountID")]
    pub account_id: String,
    #[serde(rename = "CustomerTaxID")]
    pub customer_tax_id: String,
    pub company_name: String,
    pub billing_address: Option<Address>,
    pub self_billing_indicator: bool,
}

impl Customer {
    pub fn new(
        customer_id: impl Into<String>,
        tax_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            customer_id: customer_id.into(),
            account_id: "Desconhecido".to_string(),
            customer_tax_id: tax_id.into(),
            company_name: name.into(),
            billing_address: None,
            self_billing_indicator: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Supplier {
    #[serde(rename = "SupplierID")]
    pub supplier_id: String,
    #[serde(rename = "AccountID")]
    pub account_id: String,
    #[serde(rename = "SupplierTaxID")]
    pub supplier_tax_id: String,
    pub company_name: String,
    pub billing_address: Option<Address>,
    pub self_billing_indicator: bool,
}

impl Supplier {
    pub fn new(
        supplier_id: impl Into<String>,
        tax_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            supplier_id: supplier_id.into(),
            account_id: "Desconhecido".to_string(),
            supplier_tax_id: tax_id.into(),
            company_name: name.into(),
            billing_address: None,
            self_billing_indicator: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Product {
    /// `P` product, `S` service, `O` other, `E` excise, `I` tax/levy.
    pub product_type: String,
    pub product_code: String,
    pub product_group: Option<String>,
    pub product_description: String,
    pub product_number_code: String,
}

impl Product {
    pub fn new(product_code: impl Into<String>, description: impl Into<String>) -> Self {
        let code = product_code.into();
        Self {
            product_type: "P".to_string(),
            product_number_code: code.clone(),
            product_code: code,
            product_group: None,
            product_description: description.into(),
        }
    }
}

/// One row of the tax table: a `(type, region, code)` and its rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TaxTableEntry {
    pub tax_type: TaxType,
    pub tax_country_region: String,
    pub tax_code: String,
    pub description: String,
    pub tax_expiration_date: Option<NaiveDate>,
    pub tax_percentage: Option<Decimal>,
    pub tax_amount: Option<Decimal>,
}

impl TaxTableEntry {
    pub fn percentage(
        tax_type: TaxType,
        region: impl Into<String>,
        code: impl Into<String>,
        percentage: Decimal,
    ) -> Self {
        let code = code.into();
        Self {
            tax_type,
            tax_country_region: region.into(),
            description: code.clone(),
            tax_code: code,
            tax_expiration_date: None,
            tax_percentage: Some(percentage),
            tax_amount: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct MasterFiles {
    #[serde(rename = "Customer")]
    pub customers: Vec<Customer>,
    #[serde(rename = "Supplier")]
    pub suppliers: Vec<Supplier>,
    #[serde(rename = "Product")]
    pub products: Vec<Product>,
    #[serde(rename = "TaxTable")]
    pub tax_table: Vec<TaxTableEntry>,
}

impl MasterFiles {
    pub fn customer(&self, id: &str) -> Option<&Customer> {
        self.customers.iter().find(|c| c.customer_id == id)
    }

    pub fn supplier(&self, id: &str) -> Option<&Supplier> {
        self.suppliers.iter().find(|s| s.supplier_id == id)
    }

    pub fn product(&self, code: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.product_code == code)
    }

    pub fn tax_entry(&self, tax_type: TaxType, region: &str, code: &str) -> Option<&TaxTableEntry> {
        self.tax_table
            .iter()
            .find(|t| {
                t.tax_type == tax_type && t.tax_country_region == region && t.tax_code == code
            })
    }
}
