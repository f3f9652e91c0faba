//! SQL dialect differences that affect rendered statements.

use sqlrecord_core::{quote_ident, quote_ident_mysql};

/// Target SQL dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// `$1, $2, ...` placeholders, double-quoted identifiers
    #[default]
    Postgres,
    /// `?1, ?2, ...` placeholders, double-quoted identifiers. No `DEFAULT` inside
    /// a VALUES list: untouched columns are left out of INSERTs instead.
    Sqlite,
    /// `?` placeholders, backtick identifiers. `INSERT ... RETURNING` needs MariaDB 10.5+.
    Mysql,
}

impl Dialect {
    /// Placeholder for the `index`-th (1-based) bound parameter.
    pub fn placeholder(self, index: usize) -> String {
        match self {
            Dialect::Postgres => format!("${}", index),
            Dialect::Sqlite => format!("?{}", index),
            Dialect::Mysql => "?".to_string(),
        }
    }

    /// Whether `DEFAULT` may stand for a value inside an INSERT's VALUES list.
    pub const fn supports_default_in_values(self) -> bool {
        !matches!(self, Dialect::Sqlite)
    }

    /// Quote a table or column name.
    pub fn quote(self, ident: &str) -> String {
        match self {
            Dialect::Postgres | Dialect::Sqlite => quote_ident(ident),
            Dialect::Mysql => quote_ident_mysql(ident),
        }
    }
}
