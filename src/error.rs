//! Error taxonomy for the kernel.
//!
//! A failed pattern match is not represented here: it is an expected,
//! in-band outcome (`Ok(None)`) rather than a variant of [`KernelError`].

use thiserror::Error;

/// The single error type returned by every fallible kernel operation.
#[derive(Debug, Error, PartialEq)]
pub enum KernelError {
    #[error("type error: {0}")]
    Type(String),

    #[error("cannot differentiate: {0}")]
    NonDifferentiable(String),

    #[error("evaluation error: {0}")]
    Evaluation(String),

    #[error("substitution error: {0}")]
    Substitution(String),

    #[error("match error: {0}")]
    Match(String),

    #[error("encode error: {0}")]
    Encode(String),

    #[error("decode error: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, KernelError>;
