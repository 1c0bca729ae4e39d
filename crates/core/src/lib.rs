//! `saftpt-core`: domain primitives shared by the SAF-T (PT) document tree
//! and the validation engine.
//!
//! This crate contains **pure domain** primitives (no IO).

pub mod codes;
pub mod error;
pub mod field;
pub mod money;
pub mod number;
pub mod register;

pub use codes::{
    InvoiceStatus, InvoiceType, MovementStatus, MovementType, PaymentMechanism, PaymentStatus,
    PaymentType, SourceBilling, StatusCode, TaxType, WorkStatus, WorkType,
};
pub use error::{DomainError, DomainResult};
pub use field::{DATE_FORMAT, DATE_TIME_FORMAT, Field, FieldValue};
pub use money::{EPSILON, approx_eq, checked_sum, format_money};
pub use number::{DocumentNumber, SeriesKey};
pub use register::{ErrorRegister, ErrorReport, ValidationError};
