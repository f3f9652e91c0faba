//! Record mutations executed against a connection.
//!
//! [`RecordSession`] owns a connection and a [`SessionConfig`]. Each operation
//! renders its statement, logs it, awaits the round trip and then does its
//! bookkeeping: hydrating returned rows and clearing touched-sets.
//!
//! # Example
//!
//! ```rust,ignore
//! use sqlrecord::prelude::*;
//!
//! let session = RecordSession::builder()
//!     .dialect(Dialect::Sqlite)
//!     .build_with(connection);
//!
//! let mut user = User::default();
//! user.set_name("Ada");
//! session.create(&cx, &mut user).await;   // id and server defaults now filled in
//!
//! user.set_email("ada@example.com");
//! session.update(&cx, &mut user).await;   // only "email" is bound
//! ```

use std::marker::PhantomData;
use std::time::Instant;

use asupersync::{Cx, Outcome};
use sqlrecord_core::{
    Connection, Error, HasMeta, Id, QueryError, QueryErrorKind, Record, Result, Table, is_new,
};
use sqlrecord_query::{DeleteBuilder, Dialect, InsertBuilder, InsertManyBuilder, UpdateBuilder};

use crate::config::SessionConfig;
use crate::log::log_statement;

/// Move a freshly decoded row into `record`, keeping its annotations and
/// clearing its touched-set.
fn absorb<R: Record>(record: &mut R, stored: R) {
    let meta = std::mem::take(record.meta_mut());
    *record = stored;
    *record.meta_mut() = meta;
    record.meta_mut().reset_touched();
}

fn returned_row_error(sql: String, message: String) -> Error {
    Error::Query(QueryError {
        kind: QueryErrorKind::NotFound,
        sql: Some(sql),
        message,
        source: None,
    })
}

/// Executes record mutations on a single connection.
#[derive(Debug)]
pub struct RecordSession<C: Connection> {
    connection: C,
    config: SessionConfig,
}

impl<C: Connection> RecordSession<C> {
    /// Create a session with the default configuration.
    pub fn new(connection: C) -> Self {
        Self::with_config(connection, SessionConfig::default())
    }

    /// Create a session with an explicit configuration.
    pub fn with_config(connection: C, config: SessionConfig) -> Self {
        Self { connection, config }
    }

    /// Create a session builder.
    #[must_use]
    pub fn builder() -> RecordSessionBuilder<C> {
        RecordSessionBuilder::new()
    }

    /// The underlying connection.
    #[must_use]
    pub fn connection(&self) -> &C {
        &self.connection
    }

    /// Mutable access to the underlying connection.
    pub fn connection_mut(&mut self) -> &mut C {
        &mut self.connection
    }

    /// Consume the session and return the underlying connection.
    pub fn into_connection(self) -> C {
        self.connection
    }

    /// The configuration statements are rendered and logged with.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    // ========================================================================
    // Inserts
    // ========================================================================

    /// Insert `record` and hydrate it from the returned row.
    ///
    /// Untouched columns are sent as `DEFAULT` (left out under SQLite), so after a successful call the
    /// record holds the identifier and defaults the database assigned. A
    /// statement that returns no row fails with [`QueryErrorKind::NotFound`]
    /// and leaves the record as it was.
    #[tracing::instrument(level = "debug", skip(self, cx, record))]
    pub async fn create<R: Record>(&self, cx: &Cx, record: &mut R) -> Outcome<(), Error> {
        let start = Instant::now();
        let (sql, params) = InsertBuilder::new(&*record).build_with_dialect(self.config.dialect);
        log_statement(&self.config, R::TABLE_NAME, &sql, &params);

        let row = match self.connection.query_one(cx, &sql, &params).await {
            Outcome::Ok(Some(row)) => row,
            Outcome::Ok(None) => {
                return Outcome::Err(returned_row_error(
                    sql,
                    format!("INSERT into {} returned no row", R::TABLE_NAME),
                ));
            }
            Outcome::Err(e) => return Outcome::Err(e),
            Outcome::Cancelled(r) => return Outcome::Cancelled(r),
            Outcome::Panicked(p) => return Outcome::Panicked(p),
        };

        match R::from_row(&row) {
            Ok(stored) => absorb(record, stored),
            Err(e) => return Outcome::Err(e),
        }

        tracing::debug!(
            table = R::TABLE_NAME,
            elapsed_ms = start.elapsed().as_millis(),
            "Record created"
        );
        Outcome::Ok(())
    }

    /// Insert every record and hydrate them in order.
    ///
    /// The records go out as one multi-row statement. Under SQLite, which has
    /// no `DEFAULT` for VALUES entries, each run of consecutive records that
    /// touched the same columns is its own statement; those statements are
    /// not wrapped in a transaction. An empty slice performs no I/O. If any
    /// statement returns a different number of rows than records it sent, no
    /// record is hydrated.
    #[tracing::instrument(level = "debug", skip(self, cx, records))]
    pub async fn create_many<R: Record>(&self, cx: &Cx, records: &mut [R]) -> Outcome<(), Error> {
        if records.is_empty() {
            return Outcome::Ok(());
        }

        let start = Instant::now();
        let batches = InsertManyBuilder::new(&*records).build_with_dialect(self.config.dialect);

        let mut rows = Vec::with_capacity(records.len());
        for batch in batches {
            log_statement(&self.config, R::TABLE_NAME, &batch.sql, &batch.params);

            let returned = match self.connection.query(cx, &batch.sql, &batch.params).await {
                Outcome::Ok(returned) => returned,
                Outcome::Err(e) => return Outcome::Err(e),
                Outcome::Cancelled(r) => return Outcome::Cancelled(r),
                Outcome::Panicked(p) => return Outcome::Panicked(p),
            };

            if returned.len() != batch.records.len() {
                let message = format!(
                    "INSERT into {} returned {} rows for {} records",
                    R::TABLE_NAME,
                    returned.len(),
                    batch.records.len()
                );
                return Outcome::Err(Error::Query(QueryError {
                    kind: QueryErrorKind::Database,
                    sql: Some(batch.sql),
                    message,
                    source: None,
                }));
            }
            rows.extend(returned);
        }

        let stored = match rows.iter().map(R::from_row).collect::<Result<Vec<_>>>() {
            Ok(stored) => stored,
            Err(e) => return Outcome::Err(e),
        };
        for (record, stored) in records.iter_mut().zip(stored) {
            absorb(record, stored);
        }

        tracing::debug!(
            table = R::TABLE_NAME,
            count = records.len(),
            elapsed_ms = start.elapsed().as_millis(),
            "Records created"
        );
        Outcome::Ok(())
    }

    // ========================================================================
    // Updates
    // ========================================================================

    /// Write the touched fields of a persisted record.
    ///
    /// Untouched columns are assigned to themselves. Returns the number of rows
    /// affected; the touched-set is cleared whenever the statement succeeds.
    /// Calling this on a record that was never created is not detected and
    /// usually affects 0 rows.
    #[tracing::instrument(level = "debug", skip(self, cx, record))]
    pub async fn update<R: Record>(&self, cx: &Cx, record: &mut R) -> Outcome<u64, Error> {
        let (sql, params) = UpdateBuilder::new(&*record).build_with_dialect(self.config.dialect);
        if sql.is_empty() {
            tracing::debug!(table = R::TABLE_NAME, "No columns to update");
            return Outcome::Ok(0);
        }

        let start = Instant::now();
        log_statement(&self.config, R::TABLE_NAME, &sql, &params);

        match self.connection.execute(cx, &sql, &params).await {
            Outcome::Ok(rows_affected) => {
                record.meta_mut().reset_touched();
                tracing::debug!(
                    table = R::TABLE_NAME,
                    rows_affected,
                    elapsed_ms = start.elapsed().as_millis(),
                    "Record updated"
                );
                Outcome::Ok(rows_affected)
            }
            Outcome::Err(e) => Outcome::Err(e),
            Outcome::Cancelled(r) => Outcome::Cancelled(r),
            Outcome::Panicked(p) => Outcome::Panicked(p),
        }
    }

    /// Create a new record or update a persisted one.
    ///
    /// A record is new while its identifier is the key type's default. A
    /// create counts as one affected row.
    pub async fn save<R: Record>(&self, cx: &Cx, record: &mut R) -> Outcome<u64, Error>
    where
        <R::Table as Table>::PrimaryKey: Default,
    {
        if is_new(record) {
            self.create(cx, record).await.map(|()| 1)
        } else {
            self.update(cx, record).await
        }
    }

    // ========================================================================
    // Deletes
    // ========================================================================

    /// Delete the row backing `record`. The record itself is left intact.
    pub async fn delete<R: Record>(&self, cx: &Cx, record: &R) -> Outcome<u64, Error> {
        self.run_delete(cx, DeleteBuilder::from_record(record)).await
    }

    /// Delete the rows backing `records`. An empty slice emits no statement.
    pub async fn delete_many<R: Record>(&self, cx: &Cx, records: &[R]) -> Outcome<u64, Error> {
        self.run_delete(cx, DeleteBuilder::from_records(records)).await
    }

    /// Delete the row with identifier `id`.
    pub async fn delete_by_id<T>(&self, cx: &Cx, id: &Id<T>) -> Outcome<u64, Error>
    where
        T: Table,
        T::Record: Record<Table = T>,
    {
        self.run_delete(cx, DeleteBuilder::<T::Record>::by_id(id))
            .await
    }

    /// Delete the rows with these identifiers. An empty slice emits no
    /// statement.
    pub async fn delete_by_ids<T>(&self, cx: &Cx, ids: &[Id<T>]) -> Outcome<u64, Error>
    where
        T: Table,
        T::Record: Record<Table = T>,
    {
        self.run_delete(cx, DeleteBuilder::<T::Record>::by_ids(ids))
            .await
    }

    /// Delete every row of `R`'s table.
    pub async fn delete_all<R: Record>(&self, cx: &Cx) -> Outcome<u64, Error> {
        self.run_delete(cx, DeleteBuilder::<R>::all()).await
    }

    #[tracing::instrument(level = "debug", skip(self, cx, builder))]
    async fn run_delete<R: Record>(
        &self,
        cx: &Cx,
        builder: DeleteBuilder<R>,
    ) -> Outcome<u64, Error> {
        if builder.is_empty() {
            tracing::debug!(table = R::TABLE_NAME, "Nothing to delete");
            return Outcome::Ok(0);
        }

        let start = Instant::now();
        let (sql, params) = builder.build_with_dialect(self.config.dialect);
        log_statement(&self.config, R::TABLE_NAME, &sql, &params);

        match self.connection.execute(cx, &sql, &params).await {
            Outcome::Ok(rows_affected) => {
                tracing::debug!(
                    table = R::TABLE_NAME,
                    rows_affected,
                    elapsed_ms = start.elapsed().as_millis(),
                    "Rows deleted"
                );
                Outcome::Ok(rows_affected)
            }
            Outcome::Err(e) => Outcome::Err(e),
            Outcome::Cancelled(r) => Outcome::Cancelled(r),
            Outcome::Panicked(p) => Outcome::Panicked(p),
        }
    }
}

/// Builder for [`RecordSession`].
///
/// # Example
///
/// ```rust,ignore
/// let session = RecordSession::builder()
///     .dialect(Dialect::Mysql)
///     .log_param_limit(5)
///     .build_with(connection);
/// ```
#[derive(Debug)]
pub struct RecordSessionBuilder<C: Connection> {
    config: SessionConfig,
    _marker: PhantomData<C>,
}

impl<C: Connection> Default for RecordSessionBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Connection> RecordSessionBuilder<C> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: SessionConfig::default(),
            _marker: PhantomData,
        }
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.config.dialect = dialect;
        self
    }

    /// Number of parameters printed per logged statement.
    #[must_use]
    pub fn log_param_limit(mut self, limit: usize) -> Self {
        self.config.log_param_limit = limit;
        self
    }

    #[must_use]
    pub fn log_statements(mut self, enabled: bool) -> Self {
        self.config.log_statements = enabled;
        self
    }

    /// Build the session with the provided connection.
    pub fn build_with(self, connection: C) -> RecordSession<C> {
        RecordSession::with_config(connection, self.config)
    }
}
