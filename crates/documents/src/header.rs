use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::master_files::Address;

/// File header: who reports, for which period, with which certified software.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Header {
    pub audit_file_version: String,
    #[serde(rename = "CompanyID")]
    pub company_id: String,
    pub tax_registration_number: String,
    /// `F` invoicing, `C` accounting, `I` integrated, ...
    pub tax_accounting_basis: String,
    pub company_name: String,
    pub business_name: Option<String>,
    pub company_address: Option<Address>,
    pub fiscal_year: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub currency_code: String,
    pub date_created: NaiveDate,
    pub tax_entity: String,
    #[serde(rename = "ProductCompanyTaxID")]
    pub product_company_tax_id: String,
    pub software_certificate_number: String,
    #[serde(rename = "ProductID")]
    pub product_id: String,
    pub product_version: String,
    pub header_comment: Option<String>,
}

impl Header {
    /// Header for an invoicing export covering `start_date..=end_date`.
    pub fn new(
        company_name: impl Into<String>,
        tax_registration_number: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        let nif = tax_registration_number.into();
        Self {
            audit_file_version: "1.04_01".to_string(),
            company_id: nif.clone(),
            tax_registration_number: nif,
            tax_accounting_basis: "F".to_string(),
            company_name: company_name.into(),
            business_name: None,
            company_address: None,
            fiscal_year: chrono::Datelike::year(&start_date),
            start_date,
            end_date,
            currency_code: "EUR".to_string(),
            date_created: end_date,
            tax_entity: "Global".to_string(),
            product_company_tax_id: String::new(),
            software_certificate_number: "0".to_string(),
            product_id: String::new(),
            product_version: String::new(),
            header_comment: None,
        }
    }

    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}
