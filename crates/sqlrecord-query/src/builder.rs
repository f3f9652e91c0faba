//! Statement builders for INSERT, UPDATE and DELETE.
//!
//! Builders only render; they never touch a connection. Each `build` returns
//! the SQL text together with the parameters it binds, in placeholder order.
//! Values are always bound, never interpolated into the text.

use std::marker::PhantomData;
use std::ops::Range;

use sqlrecord_core::{HasIdentifier, Id, Record, Value};

use crate::dialect::Dialect;
use crate::materialize::{DefaultOr, fields_with_default, fields_with_update};

fn insert_sql(dialect: Dialect, table: &str, columns: &[&'static str], groups: &[String]) -> String {
    if columns.is_empty() {
        return format!("INSERT INTO {} DEFAULT VALUES RETURNING *", dialect.quote(table));
    }

    let columns: Vec<_> = columns.iter().map(|c| dialect.quote(c)).collect();
    format!(
        "INSERT INTO {} ({}) VALUES {} RETURNING *",
        dialect.quote(table),
        columns.join(", "),
        groups.join(", ")
    )
}

fn all_columns<R: Record>() -> Vec<&'static str> {
    R::fields().iter().map(|f| f.column_name).collect()
}

/// Every column, with `DEFAULT` standing in for untouched ones.
fn values_group<R: Record>(record: &R, dialect: Dialect, params: &mut Vec<Value>) -> String {
    let rendered: Vec<_> = fields_with_default(record)
        .into_iter()
        .map(|(_, value)| value.render(dialect, params))
        .collect();
    format!("({})", rendered.join(", "))
}

/// Touched columns only, for dialects without `DEFAULT` in VALUES.
fn provided_columns<R: Record>(record: &R) -> (Vec<&'static str>, Vec<Value>) {
    fields_with_default(record)
        .into_iter()
        .filter_map(|(field, value)| match value {
            DefaultOr::Value(value) => Some((field.column_name, value)),
            DefaultOr::Default => None,
        })
        .unzip()
}

fn bound_group(values: &[Value], dialect: Dialect, params: &mut Vec<Value>) -> String {
    let rendered: Vec<_> = values
        .iter()
        .map(|value| DefaultOr::Value(value.clone()).render(dialect, params))
        .collect();
    format!("({})", rendered.join(", "))
}

/// INSERT builder for one record.
///
/// Touched fields bind their current value and `RETURNING *` hands the stored
/// row back so the caller can hydrate server-side defaults. Untouched columns
/// render as `DEFAULT`, or are left out entirely when the dialect has no
/// `DEFAULT` for VALUES entries. A record with nothing touched then becomes
/// `INSERT INTO "t" DEFAULT VALUES`.
///
/// # Example
///
/// ```ignore
/// let (sql, params) = InsertBuilder::new(&hero).build();
/// // INSERT INTO "heroes" ("id", "name", "hero_age") VALUES (DEFAULT, $1, DEFAULT) RETURNING *
///
/// let (sql, params) = InsertBuilder::new(&hero).build_with_dialect(Dialect::Sqlite);
/// // INSERT INTO "heroes" ("name") VALUES (?1) RETURNING *
/// ```
#[derive(Debug)]
pub struct InsertBuilder<'a, R: Record> {
    record: &'a R,
}

impl<'a, R: Record> InsertBuilder<'a, R> {
    pub fn new(record: &'a R) -> Self {
        Self { record }
    }

    /// Build the INSERT SQL and parameters with default dialect (Postgres).
    pub fn build(&self) -> (String, Vec<Value>) {
        self.build_with_dialect(Dialect::default())
    }

    /// Build the INSERT SQL and parameters with specific dialect.
    pub fn build_with_dialect(&self, dialect: Dialect) -> (String, Vec<Value>) {
        let mut params = Vec::new();

        let sql = if dialect.supports_default_in_values() {
            let group = values_group(self.record, dialect, &mut params);
            insert_sql(dialect, R::TABLE_NAME, &all_columns::<R>(), &[group])
        } else {
            let (columns, values) = provided_columns(self.record);
            let group = bound_group(&values, dialect, &mut params);
            insert_sql(dialect, R::TABLE_NAME, &columns, &[group])
        };

        (sql, params)
    }
}

/// One statement of a bulk insert.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertBatch {
    /// Indices of the input records this statement inserts, in order.
    pub records: Range<usize>,
    pub sql: String,
    pub params: Vec<Value>,
}

/// Bulk INSERT builder.
///
/// Each record gets its own VALUES group with its own DEFAULT-or-value
/// decisions, so two records in the same batch may differ in which columns
/// they provide. With `DEFAULT` available the whole input is one statement.
/// Otherwise consecutive records that touched the same columns share a
/// statement, and a record that touched nothing is inserted on its own.
#[derive(Debug)]
pub struct InsertManyBuilder<'a, R: Record> {
    records: &'a [R],
}

impl<'a, R: Record> InsertManyBuilder<'a, R> {
    pub fn new(records: &'a [R]) -> Self {
        Self { records }
    }

    /// Build the bulk INSERT statements with default dialect (Postgres).
    pub fn build(&self) -> Vec<InsertBatch> {
        self.build_with_dialect(Dialect::default())
    }

    /// Build the bulk INSERT statements with specific dialect.
    ///
    /// Batches cover the input in order. An empty input builds no batch.
    pub fn build_with_dialect(&self, dialect: Dialect) -> Vec<InsertBatch> {
        if self.records.is_empty() {
            return Vec::new();
        }

        if dialect.supports_default_in_values() {
            let mut params = Vec::new();
            let groups: Vec<_> = self
                .records
                .iter()
                .map(|record| values_group(record, dialect, &mut params))
                .collect();

            return vec![InsertBatch {
                records: 0..self.records.len(),
                sql: insert_sql(dialect, R::TABLE_NAME, &all_columns::<R>(), &groups),
                params,
            }];
        }

        let provided: Vec<_> = self.records.iter().map(provided_columns).collect();
        let mut next = 0;
        let batches: Vec<_> = provided
            .chunk_by(|(a, _), (b, _)| !a.is_empty() && a == b)
            .map(|run| {
                let records = next..next + run.len();
                next = records.end;

                let mut params = Vec::new();
                let groups: Vec<_> = run
                    .iter()
                    .map(|(_, values)| bound_group(values, dialect, &mut params))
                    .collect();
                InsertBatch {
                    records,
                    sql: insert_sql(dialect, R::TABLE_NAME, &run[0].0, &groups),
                    params,
                }
            })
            .collect();

        if batches.len() > 1 {
            tracing::debug!(
                table = R::TABLE_NAME,
                records = self.records.len(),
                batches = batches.len(),
                "Bulk insert split by provided columns"
            );
        }
        batches
    }
}

/// UPDATE builder for one persisted record.
///
/// Every non-key column appears in the SET list. Touched fields bind their
/// current value; untouched ones are assigned to themselves so concurrent
/// writers to other columns are not clobbered. The WHERE clause matches the
/// record's identifier.
#[derive(Debug)]
pub struct UpdateBuilder<'a, R: Record> {
    record: &'a R,
}

impl<'a, R: Record> UpdateBuilder<'a, R> {
    pub fn new(record: &'a R) -> Self {
        Self { record }
    }

    /// Build the UPDATE SQL and parameters with default dialect (Postgres).
    pub fn build(&self) -> (String, Vec<Value>) {
        self.build_with_dialect(Dialect::default())
    }

    /// Build the UPDATE SQL and parameters with specific dialect.
    ///
    /// A record whose only column is its key has nothing to set and renders an
    /// empty statement.
    pub fn build_with_dialect(&self, dialect: Dialect) -> (String, Vec<Value>) {
        let mut params = Vec::new();

        let set_clauses: Vec<_> = fields_with_update(self.record)
            .into_iter()
            .filter(|(field, _)| field.column_name != R::PRIMARY_KEY)
            .map(|(field, value)| {
                let column = dialect.quote(field.column_name);
                format!("{} = {}", column, value.render(dialect, &mut params))
            })
            .collect();

        if set_clauses.is_empty() {
            return (String::new(), Vec::new());
        }

        params.push(self.record.id().to_value());
        let sql = format!(
            "UPDATE {} SET {} WHERE {} = {}",
            dialect.quote(R::TABLE_NAME),
            set_clauses.join(", "),
            dialect.quote(R::PRIMARY_KEY),
            dialect.placeholder(params.len())
        );

        (sql, params)
    }
}

#[derive(Debug, Clone)]
enum DeleteTarget {
    All,
    One(Value),
    Many(Vec<Value>),
}

/// DELETE builder for the table backing `R`.
///
/// # Example
///
/// ```ignore
/// DeleteBuilder::from_record(&hero).build();
/// // DELETE FROM "heroes" WHERE "id" = $1
///
/// DeleteBuilder::<Hero>::by_ids(&ids).build();
/// // DELETE FROM "heroes" WHERE "id" IN ($1, $2, $3)
///
/// DeleteBuilder::<Hero>::all().build();
/// // DELETE FROM "heroes"
/// ```
#[derive(Debug)]
pub struct DeleteBuilder<R: Record> {
    target: DeleteTarget,
    _marker: PhantomData<fn() -> R>,
}

impl<R: Record> DeleteBuilder<R> {
    fn with_target(target: DeleteTarget) -> Self {
        Self {
            target,
            _marker: PhantomData,
        }
    }

    /// Delete every row of the table.
    pub fn all() -> Self {
        Self::with_target(DeleteTarget::All)
    }

    /// Delete the row with this identifier.
    pub fn by_id(id: &Id<R::Table>) -> Self {
        Self::with_target(DeleteTarget::One(id.to_value()))
    }

    /// Delete the rows with these identifiers. An empty list renders an empty
    /// statement.
    pub fn by_ids(ids: &[Id<R::Table>]) -> Self {
        Self::with_target(DeleteTarget::Many(ids.iter().map(Id::to_value).collect()))
    }

    /// Delete the row backing `record`.
    pub fn from_record(record: &R) -> Self {
        Self::by_id(record.id())
    }

    /// Delete the rows backing `records`.
    pub fn from_records(records: &[R]) -> Self {
        Self::with_target(DeleteTarget::Many(
            records.iter().map(|record| record.id().to_value()).collect(),
        ))
    }

    /// True if building would produce no statement.
    pub fn is_empty(&self) -> bool {
        matches!(&self.target, DeleteTarget::Many(ids) if ids.is_empty())
    }

    /// Build the DELETE SQL and parameters with default dialect (Postgres).
    pub fn build(&self) -> (String, Vec<Value>) {
        self.build_with_dialect(Dialect::default())
    }

    /// Build the DELETE SQL and parameters with specific dialect.
    pub fn build_with_dialect(&self, dialect: Dialect) -> (String, Vec<Value>) {
        let table = dialect.quote(R::TABLE_NAME);
        let pk = dialect.quote(R::PRIMARY_KEY);

        match &self.target {
            DeleteTarget::All => (format!("DELETE FROM {}", table), Vec::new()),
            DeleteTarget::One(id) => (
                format!("DELETE FROM {} WHERE {} = {}", table, pk, dialect.placeholder(1)),
                vec![id.clone()],
            ),
            DeleteTarget::Many(ids) if ids.is_empty() => (String::new(), Vec::new()),
            DeleteTarget::Many(ids) => {
                let placeholders: Vec<_> =
                    (1..=ids.len()).map(|i| dialect.placeholder(i)).collect();
                (
                    format!(
                        "DELETE FROM {} WHERE {} IN ({})",
                        table,
                        pk,
                        placeholders.join(", ")
                    ),
                    ids.clone(),
                )
            }
        }
    }
}
