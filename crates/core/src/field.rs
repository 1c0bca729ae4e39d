//! Tri-state field values.
//!
//! The entity layer that builds the document tree already validated each
//! scalar on assignment. What it hands over is one of three states, so rules
//! can tell a field that was never supplied apart from one that was supplied
//! but could not be parsed.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Wire format for `SystemEntryDate`-like values.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Wire format for `InvoiceDate`-like values.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A scalar that may be missing, malformed or valid.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Field<T> {
    #[default]
    Unset,
    /// The raw text as received, which failed to parse.
    Invalid(String),
    Valid(T),
}

impl<T> Field<T> {
    pub fn valid(&self) -> Option<&T> {
        match self {
            Field::Valid(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, Field::Unset)
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Field::Valid(_))
    }

    /// Raw text of a malformed value.
    pub fn invalid_raw(&self) -> Option<&str> {
        match self {
            Field::Invalid(raw) => Some(raw),
            _ => None,
        }
    }
}

impl<T: Copy> Field<T> {
    pub fn get(&self) -> Option<T> {
        self.valid().copied()
    }
}

impl<T: FieldValue> Field<T> {
    /// Parse raw wire text, keeping the text when it is malformed.
    pub fn parse(raw: &str) -> Self {
        match T::parse_field(raw) {
            Some(v) => Field::Valid(v),
            None => Field::Invalid(raw.to_string()),
        }
    }
}

impl<T> From<T> for Field<T> {
    fn from(value: T) -> Self {
        Field::Valid(value)
    }
}

impl<T> From<Option<T>> for Field<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Field::Valid(v),
            None => Field::Unset,
        }
    }
}

/// Scalars that have a canonical SAF-T text form.
pub trait FieldValue: Sized {
    fn parse_field(raw: &str) -> Option<Self>;
    fn render_field(&self) -> String;
}

impl FieldValue for NaiveDate {
    fn parse_field(raw: &str) -> Option<Self> {
        NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
    }

    fn render_field(&self) -> String {
        self.format(DATE_FORMAT).to_string()
    }
}

impl FieldValue for NaiveDateTime {
    fn parse_field(raw: &str) -> Option<Self> {
        NaiveDateTime::parse_from_str(raw.trim(), DATE_TIME_FORMAT).ok()
    }

    fn render_field(&self) -> String {
        self.format(DATE_TIME_FORMAT).to_string()
    }
}

impl FieldValue for Decimal {
    fn parse_field(raw: &str) -> Option<Self> {
        raw.trim().parse::<Decimal>().ok()
    }

    fn render_field(&self) -> String {
        self.to_string()
    }
}

impl<T: FieldValue> Serialize for Field<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Field::Unset => serializer.serialize_none(),
            Field::Invalid(raw) => serializer.serialize_str(raw),
            Field::Valid(v) => serializer.serialize_str(&v.render_field()),
        }
    }
}

/// Scalars accepted on input; numbers are tolerated for hand-written trees.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawScalar {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl<'de, T: FieldValue> Deserialize<'de> for Field<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<RawScalar>::deserialize(deserializer)?;
        Ok(match raw {
            None => Field::Unset,
            Some(RawScalar::Text(s)) => Field::parse(&s),
            Some(RawScalar::Integer(i)) => Field::parse(&i.to_string()),
            Some(RawScalar::Float(f)) => Field::parse(&f.to_string()),
        })
    }
}
