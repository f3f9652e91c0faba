//! Per-column materialization for INSERT and UPDATE.
//!
//! Both statements ask the same question of every column: was its field
//! touched since the record was loaded? [`decide`] answers it. The answer is
//! then expressed two different ways:
//!
//! | decision        | INSERT ([`DefaultOr`]) | UPDATE ([`NoOpOr`])   |
//! |-----------------|------------------------|-----------------------|
//! | `Provided`      | bound current value    | `"col" = $n`          |
//! | `NotProvided`   | `DEFAULT`              | `"col" = "col"`       |
//!
//! SQLite has no `DEFAULT` keyword for VALUES entries, so under that dialect
//! the INSERT builders drop `NotProvided` columns from the statement instead
//! of rendering them.
//!
//! The decision depends only on touched-set membership at build time, never on
//! comparing old and new values, and nothing is cached between builds.

use sqlrecord_core::{FieldInfo, MetaBag, Record, Value};

use crate::dialect::Dialect;

/// Whether a column's in-memory value should be sent to storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Materialize {
    /// The field was touched: send its current value.
    Provided,
    /// The field was not touched: let storage decide.
    NotProvided,
}

/// Decide how to materialize `field` given the record's change-tracking state.
pub fn decide(meta: &MetaBag, field: &FieldInfo) -> Materialize {
    if meta.is_touched(field.name) {
        Materialize::Provided
    } else {
        Materialize::NotProvided
    }
}

/// INSERT-side value: the schema default, or a concrete value.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultOr<V> {
    /// Emit the SQL literal `DEFAULT`
    Default,
    Value(V),
}

impl<V> DefaultOr<V> {
    pub fn from_decision(decision: Materialize, value: V) -> Self {
        match decision {
            Materialize::Provided => DefaultOr::Value(value),
            Materialize::NotProvided => DefaultOr::Default,
        }
    }

    pub const fn is_default(&self) -> bool {
        matches!(self, DefaultOr::Default)
    }
}

impl DefaultOr<Value> {
    /// Render the VALUES-list entry, pushing a bound parameter if needed.
    pub fn render(self, dialect: Dialect, params: &mut Vec<Value>) -> String {
        match self {
            DefaultOr::Default => "DEFAULT".to_string(),
            DefaultOr::Value(value) => {
                params.push(value);
                dialect.placeholder(params.len())
            }
        }
    }
}

/// UPDATE-side value: leave the stored value alone, or set a new one.
#[derive(Debug, Clone, PartialEq)]
pub enum NoOpOr<V> {
    /// Assign the column to itself; carries the column name it refers back to
    NoOp(&'static str),
    Update(V),
}

impl<V> NoOpOr<V> {
    pub fn from_decision(decision: Materialize, column: &'static str, value: V) -> Self {
        match decision {
            Materialize::Provided => NoOpOr::Update(value),
            Materialize::NotProvided => NoOpOr::NoOp(column),
        }
    }

    pub const fn is_noop(&self) -> bool {
        matches!(self, NoOpOr::NoOp(_))
    }
}

impl NoOpOr<Value> {
    /// Render the right-hand side of a SET assignment, pushing a bound
    /// parameter if needed.
    pub fn render(self, dialect: Dialect, params: &mut Vec<Value>) -> String {
        match self {
            NoOpOr::NoOp(column) => dialect.quote(column),
            NoOpOr::Update(value) => {
                params.push(value);
                dialect.placeholder(params.len())
            }
        }
    }
}

/// INSERT materialization for every column of `record`, in column order.
pub fn fields_with_default<R: Record>(record: &R) -> Vec<(&'static FieldInfo, DefaultOr<Value>)> {
    let meta = record.meta();
    R::fields()
        .iter()
        .zip(record.to_values())
        .map(|(field, value)| (field, DefaultOr::from_decision(decide(meta, field), value)))
        .collect()
}

/// UPDATE materialization for every column of `record`, in column order.
pub fn fields_with_update<R: Record>(record: &R) -> Vec<(&'static FieldInfo, NoOpOr<Value>)> {
    let meta = record.meta();
    R::fields()
        .iter()
        .zip(record.to_values())
        .map(|(field, value)| {
            (
                field,
                NoOpOr::from_decision(decide(meta, field), field.column_name, value),
            )
        })
        .collect()
}
