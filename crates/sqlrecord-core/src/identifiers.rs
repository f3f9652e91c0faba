//! SQL identifier quoting.
//!
//! Table and column names come from generated bindings, never from user input,
//! but they are still quoted so reserved words (`user`, `order`) work as names.

/// Quote an identifier with ANSI double quotes (Postgres, SQLite).
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Quote an identifier with MySQL backticks.
pub fn quote_ident_mysql(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}
