//! Error types for the shared conventions

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpecError {
    #[error("invalid digest hex length: {0} chars, expected 64")]
    InvalidDigestLength(usize),

    #[error("invalid digest hex: {0}")]
    InvalidDigestHex(String),
}
