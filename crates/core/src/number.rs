//! Document numbers (`TYPE SERIES/NUMBER`).

use core::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

static DOCUMENT_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z]+) ([A-Za-z0-9]+)/([0-9]+)$").expect("document number regex is valid")
});

/// A parsed document number, e.g. `FT A/12`.
///
/// Ordering is `(type, series, number)` with the sequence compared numerically,
/// which is the order series are walked in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentNumber {
    pub doc_type: String,
    pub series: String,
    pub number: u64,
}

impl DocumentNumber {
    pub fn new(doc_type: impl Into<String>, series: impl Into<String>, number: u64) -> Self {
        Self {
            doc_type: doc_type.into(),
            series: series.into(),
            number,
        }
    }

    pub fn series_key(&self) -> SeriesKey {
        SeriesKey {
            doc_type: self.doc_type.clone(),
            series: self.series.clone(),
        }
    }
}

impl FromStr for DocumentNumber {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        let caps = DOCUMENT_NUMBER
            .captures(s)
            .ok_or_else(|| DomainError::invalid_document_number(s))?;
        let number = caps[3]
            .parse::<u64>()
            .map_err(|_| DomainError::document_number_out_of_range(s))?;
        Ok(Self::new(&caps[1], &caps[2], number))
    }
}

impl core::fmt::Display for DocumentNumber {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} {}/{}", self.doc_type, self.series, self.number)
    }
}

/// Identifies one independently numbered series: `(type, series-code)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeriesKey {
    pub doc_type: String,
    pub series: String,
}

impl core::fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} {}", self.doc_type, self.series)
    }
}
