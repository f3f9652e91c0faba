//! Error types for record mapping and storage access.
//!
//! Errors fall into three groups:
//!
//! - **Type errors**: a stored value cannot be converted to or from a field's
//!   Rust type. These always name the offending column or value.
//! - **Query errors**: the storage layer rejected a statement (constraint
//!   violations, syntax errors). Drivers produce these; this crate never
//!   reinterprets them.
//! - **Connection errors**: the handle itself failed.

use std::error::Error as StdError;
use std::fmt;

/// Result alias used throughout sqlrecord.
pub type Result<T> = std::result::Result<T, Error>;

/// The primary error type.
#[derive(Debug)]
pub enum Error {
    /// Connection-level failure (connect, disconnect, timeout)
    Connection(ConnectionError),
    /// Storage rejected or failed to run a statement
    Query(QueryError),
    /// Value encoding/decoding failure
    Type(TypeError),
    /// Free-form error raised by a driver or caller
    Custom(String),
}

#[derive(Debug)]
pub struct ConnectionError {
    pub kind: ConnectionErrorKind,
    pub message: String,
    pub source: Option<Box<dyn StdError + Send + Sync>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionErrorKind {
    /// Failed to establish the connection
    Connect,
    /// Remote refused the connection
    Refused,
    /// Connection dropped mid-operation
    Disconnected,
    /// Operation exceeded the handle's deadline
    Timeout,
}

#[derive(Debug)]
pub struct QueryError {
    pub kind: QueryErrorKind,
    /// The statement that failed, when known
    pub sql: Option<String>,
    pub message: String,
    pub source: Option<Box<dyn StdError + Send + Sync>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryErrorKind {
    /// Malformed SQL
    Syntax,
    /// Uniqueness, foreign-key, not-null or check constraint violation
    Constraint,
    /// A statement expected to return a row returned none
    NotFound,
    /// Any other storage-side failure
    Database,
}

/// A value could not be converted between its stored and in-memory forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeError {
    /// What the decoder expected (e.g. "BIGINT", "uuid")
    pub expected: &'static str,
    /// What it actually found
    pub actual: String,
    /// Column the value came from, when the failure happened during row decoding
    pub column: Option<String>,
}

impl TypeError {
    pub fn new(expected: &'static str, actual: impl Into<String>) -> Self {
        Self {
            expected,
            actual: actual.into(),
            column: None,
        }
    }

    /// Attach the column name the value was read from.
    #[must_use]
    pub fn in_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }
}

impl Error {
    /// Shorthand for a decode failure outside of any particular column.
    pub fn decode(expected: &'static str, actual: impl Into<String>) -> Self {
        Error::Type(TypeError::new(expected, actual))
    }

    /// Shorthand for a query error of the given kind.
    pub fn query(kind: QueryErrorKind, message: impl Into<String>) -> Self {
        Error::Query(QueryError {
            kind,
            sql: None,
            message: message.into(),
            source: None,
        })
    }

    /// True if storage rejected the statement because of a constraint.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            Error::Query(QueryError {
                kind: QueryErrorKind::Constraint,
                ..
            })
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Connection(e) => write!(f, "connection error: {}", e),
            Error::Query(e) => write!(f, "query error: {}", e),
            Error::Type(e) => write!(f, "type error: {}", e),
            Error::Custom(msg) => f.write_str(msg),
        }
    }
}

impl fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)?;
        if let Some(sql) = &self.sql {
            write!(f, " (sql: {})", sql)?;
        }
        Ok(())
    }
}

impl fmt::Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.column {
            Some(column) => write!(
                f,
                "column `{}`: expected {}, found {}",
                column, self.expected, self.actual
            ),
            None => write!(f, "expected {}, found {}", self.expected, self.actual),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Connection(e) => e.source.as_deref().map(|s| s as &(dyn StdError + 'static)),
            Error::Query(e) => e.source.as_deref().map(|s| s as &(dyn StdError + 'static)),
            Error::Type(_) | Error::Custom(_) => None,
        }
    }
}

impl StdError for TypeError {}

impl From<TypeError> for Error {
    fn from(e: TypeError) -> Self {
        Error::Type(e)
    }
}
