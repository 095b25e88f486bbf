//! Fatal error taxonomy for the translator core.
//!
//! Matches the four fatal kinds of the error-handling design one-to-one:
//! I/O, structural, invalid side-car line, unknown capability. Allocation
//! failure isn't modeled as a fifth variant — Rust's global allocator
//! already aborts the process on OOM, so "treat as fatal" holds for free.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("structural error: {0}")]
    Structural(String),

    #[error("invalid {kind} line: {line}")]
    InvalidSideCarLine { kind: &'static str, line: String },

    #[error("unknown policy capability id: {0}")]
    UnknownCapability(u32),
}
