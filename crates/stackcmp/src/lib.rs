//! Stack comparison tool: interface-format parsing and report rendering
//! around the `stackcmp-core` analysis.

pub mod input;
pub mod report;

pub use stackcmp_core::{
    MatchOutcome, ReconciliationResult, StackComparison, SymbolTable, Verdict, classify,
    reconcile,
};

use thiserror::Error;

/// Tool-level errors.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("symbol table error: {0}")]
    Symbols(#[from] stackcmp_core::Error),
    #[error("malformed symbol record: {line:?}")]
    BadSymbolRecord { line: String },
}

pub type Result<T> = std::result::Result<T, Error>;
