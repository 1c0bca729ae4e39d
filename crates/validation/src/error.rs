use std::path::PathBuf;

use thiserror::Error;

/// Configuration errors that abort a validation pass.
///
/// Data problems are never fatal; they are collected in the register.
#[derive(Debug, Error)]
pub enum FatalError {
    #[error("signature validation was requested but no public key was supplied")]
    MissingPublicKey,

    #[error("cannot read public key {path}: {source}")]
    PublicKeyUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid public key {origin}: {reason}")]
    InvalidPublicKey { origin: String, reason: String },
}
