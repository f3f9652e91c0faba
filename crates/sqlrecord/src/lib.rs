//! Typed record mapping with dirty-field tracking.
//!
//! `sqlrecord` binds plain structs to relational tables and persists them
//! with minimal statements:
//!
//! - INSERT sends only the fields you set and lets the database fill in the
//!   rest (`DEFAULT`), then reads the stored row back into the record.
//! - UPDATE binds only the fields you set and assigns every other column to
//!   itself, so concurrent writers to other columns are not overwritten.
//! - DELETE works by record, by identifier, by identifier list or on the
//!   whole table.
//!
//! Identifiers are typed by their table (`Id<Users>` is not an `Id<Posts>`),
//! and every record carries a [`MetaBag`] recording which fields were touched.
//!
//! ```rust,ignore
//! use sqlrecord::prelude::*;
//!
//! #[derive(Debug, Default, Record)]
//! #[record(table = "users", primary_key = i64)]
//! pub struct User {
//!     id: Id<Users>,
//!     name: String,
//!     meta: MetaBag,
//! }
//!
//! let session = RecordSession::new(connection);
//! let mut user = User::default();
//! user.set_name("Ada");
//! session.create(&cx, &mut user).await;
//! assert!(!is_new(&user));
//! ```
//!
//! This facade re-exports the sub-crates:
//! - `sqlrecord-core`: identifiers, `MetaBag`, the record traits, values and errors
//! - `sqlrecord-query`: statement rendering and dialects
//! - `sqlrecord-macros`: `#[derive(Record)]`

pub mod config;
pub mod log;
pub mod session;

pub use sqlrecord_core::{
    ColumnInfo, Connection, ConnectionError, ConnectionErrorKind, Cx, Error, FieldInfo, FromValue,
    HasIdentifier, HasMeta, Id, MetaBag, Outcome, PrimaryKey, QueryError, QueryErrorKind, Record,
    Result, Row, Table, TypeError, Value, did_change, did_change_record, is_new, parse_id,
    quote_ident, quote_ident_mysql,
};
pub use sqlrecord_macros::Record;
pub use sqlrecord_query::{
    DefaultOr, DeleteBuilder, Dialect, InsertBatch, InsertBuilder, InsertManyBuilder, Materialize, NoOpOr,
    UpdateBuilder,
};

pub use config::SessionConfig;
pub use session::{RecordSession, RecordSessionBuilder};

/// Everything needed to declare and persist records.
pub mod prelude {
    pub use crate::{
        Connection, Cx, Dialect, Error, HasIdentifier, HasMeta, Id, MetaBag, Outcome, Record,
        RecordSession, Result, Row, SessionConfig, Table, Value, did_change, did_change_record,
        is_new, parse_id,
    };
}
