//! Statement rendering for sqlrecord.
//!
//! `sqlrecord-query` turns a record and its change-tracking state into SQL
//! text plus bound parameters. It performs no I/O.
//!
//! # Role In The Architecture
//!
//! - **Materialization**: [`materialize`] holds the per-column decision and its
//!   two renderings, [`DefaultOr`] for INSERT and [`NoOpOr`] for UPDATE.
//! - **Builders**: [`InsertBuilder`], [`InsertManyBuilder`], [`UpdateBuilder`]
//!   and [`DeleteBuilder`].
//! - **Dialects**: [`Dialect`] picks placeholder and identifier-quoting style,
//!   and whether untouched INSERT columns render as `DEFAULT` or are omitted.

pub mod builder;
pub mod dialect;
pub mod materialize;

#[cfg(test)]
mod test_support;

pub use builder::{DeleteBuilder, InsertBatch, InsertBuilder, InsertManyBuilder, UpdateBuilder};
pub use dialect::Dialect;
pub use materialize::{
    DefaultOr, Materialize, NoOpOr, decide, fields_with_default, fields_with_update,
};
