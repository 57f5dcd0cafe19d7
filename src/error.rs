//! Engine-wide error type.
//!
//! Every fallible operation in this crate returns [`EngineError`]. The
//! variants are grouped by kind: parse/validation, catalog, transaction,
//! and storage. `IF [NOT] EXISTS` softening happens above this type, in
//! the operators that know whether the flag was present — this enum only
//! ever represents a real failure.

use thiserror::Error;

/// Errors that can surface out of any part of the engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    // ---------------------------------------------------------------- Parse / validation
    #[error("unknown statement")]
    UnknownStatement,

    #[error("unsupported statement kind: {0}")]
    UnsupportedStatement(String),

    #[error("malformed WHERE clause: {0}")]
    MalformedWhere(String),

    #[error("syntax error: {0}")]
    Syntax(String),

    // ---------------------------------------------------------------- Catalog
    #[error("table {0} did not exist")]
    TableNotFound(String),

    #[error("table {0} already existed")]
    TableAlreadyExists(String),

    #[error("schema {0} did not exist")]
    SchemaNotFound(String),

    #[error("index {0} already existed")]
    IndexAlreadyExists(String),

    #[error("index {0} did not exist")]
    IndexNotFound(String),

    #[error("column {0} did not exist")]
    ColumnNotFound(String),

    // ---------------------------------------------------------------- Transaction
    #[error("already in transaction")]
    AlreadyInTransaction,

    #[error("not in transaction")]
    NotInTransaction,

    // ---------------------------------------------------------------- Storage
    #[error("failed to allocate a tuple group of {0} slots")]
    AllocationFailure(usize),

    #[error("value does not fit column: {0}")]
    EncodingError(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
