//! Validation and signature-chain integrity engine for SAF-T (PT) files.
//!
//! Given a populated [`AuditFile`](saftpt_documents::AuditFile) the engine
//! indexes each table by series, re-derives line/document/table totals,
//! verifies the per-series RSA hash chain and runs the business-rule battery.
//! Every finding goes to the file's shared register; only configuration
//! problems abort a run.

pub mod chain;
pub mod config;
pub mod error;
pub mod indexer;
pub mod predicates;
pub mod reporter;
pub mod rules;
pub mod schema;
pub mod totals;
pub mod validator;

pub use chain::{PublicKey, SignatureChainVerifier, canonical_message};
pub use config::ValidationConfig;
pub use error::FatalError;
pub use indexer::DocumentIndex;
pub use reporter::Reporter;
pub use rules::{BuiltinCatalog, MessageCatalog, Rule, RuleGroup, Severity, format_message};
pub use schema::SchemaValidator;
pub use totals::TotalsReconciler;
pub use validator::{BusinessRuleValidator, validate, validate_with_key};
