//! Core types and traits for sqlrecord.
//!
//! `sqlrecord-core` is the **foundation layer**: it defines the record
//! contract and the data types every other crate builds on.
//!
//! # Role In The Architecture
//!
//! - **Identifier binding**: [`Table`] ties a table name to its primary-key type
//!   and record type; [`Id`] is the typed identifier parameterized by the table.
//! - **Change tracking**: [`MetaBag`] is the per-record sidecar holding the
//!   touched-field set.
//! - **Record contract**: [`HasIdentifier`], [`HasMeta`] and [`Record`].
//! - **Storage boundary**: [`Connection`], [`Row`] and [`Value`].
//! - **Structured concurrency**: re-exports `Cx` and `Outcome` from asupersync so
//!   every storage round trip is cancel-correct.
//!
//! # Who Uses This Crate
//!
//! - `sqlrecord-macros` generates the record traits defined here.
//! - `sqlrecord-query` reads `Record` metadata and `MetaBag` to render SQL.
//! - `sqlrecord` executes rendered statements through `Connection`.

// Re-export asupersync primitives for structured concurrency
pub use asupersync::{Cx, Outcome};

pub mod connection;
pub mod error;
pub mod field;
pub mod id;
pub mod identifiers;
pub mod meta;
pub mod record;
pub mod row;
pub mod value;

pub use connection::Connection;
pub use error::{
    ConnectionError, ConnectionErrorKind, Error, QueryError, QueryErrorKind, Result, TypeError,
};
pub use field::FieldInfo;
pub use id::{Id, PrimaryKey, Table, parse_id};
pub use identifiers::{quote_ident, quote_ident_mysql};
pub use meta::MetaBag;
pub use record::{HasIdentifier, HasMeta, Record, did_change, did_change_record, is_new};
pub use row::{ColumnInfo, Row};
pub use value::{FromValue, Value};
