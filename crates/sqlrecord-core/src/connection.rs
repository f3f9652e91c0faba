//! The connection contract consumed by record operations.
//!
//! Drivers implement [`Connection`]. Every method takes the caller's `Cx`, so
//! cancellation and budgets follow the driver's own contract; sqlrecord never
//! retries or times out on its own.

use std::future::Future;

use asupersync::{Cx, Outcome};

use crate::error::Error;
use crate::row::Row;
use crate::value::Value;

/// A database connection handle.
///
/// A handle is used by one operation at a time; sharing it between concurrent
/// calls needs external synchronization unless the driver says otherwise.
pub trait Connection: Send + Sync {
    /// Run a statement that returns rows.
    fn query(
        &self,
        cx: &Cx,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = Outcome<Vec<Row>, Error>> + Send;

    /// Run a statement that returns at most one row.
    fn query_one(
        &self,
        cx: &Cx,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = Outcome<Option<Row>, Error>> + Send;

    /// Run a statement and return the number of rows affected.
    fn execute(
        &self,
        cx: &Cx,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = Outcome<u64, Error>> + Send;
}
