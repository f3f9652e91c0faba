//! Statement logging.
//!
//! Every statement a session executes is logged once, before it reaches the
//! connection. Long parameter lists are cut after the configured limit.

use sqlrecord_core::Value;

use crate::config::SessionConfig;

/// Render `params` for a log line, showing at most `limit` values.
///
/// ```
/// use sqlrecord::log::format_params;
/// use sqlrecord::Value;
///
/// let params = vec![Value::Int(1), Value::Int(2), Value::Int(3)];
/// assert_eq!(format_params(&params, 10), "[1, 2, 3]");
/// assert_eq!(format_params(&params, 2), "[1, 2, … (1 more)]");
/// ```
pub fn format_params(params: &[Value], limit: usize) -> String {
    let mut shown: Vec<String> = params.iter().take(limit).map(ToString::to_string).collect();
    if params.len() > limit {
        shown.push(format!("… ({} more)", params.len() - limit));
    }
    format!("[{}]", shown.join(", "))
}

/// Log a statement about to be executed against `table`.
pub fn log_statement(config: &SessionConfig, table: &str, sql: &str, params: &[Value]) {
    if !config.log_statements {
        return;
    }
    tracing::info!(
        table,
        sql,
        params = %format_params(params, config.log_param_limit),
        "Executing statement"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_params_within_limit() {
        let params = vec![Value::Text("Ada".into()), Value::Null, Value::Bool(true)];
        assert_eq!(format_params(&params, 3), "['Ada', NULL, true]");
    }

    #[test]
    fn test_format_params_elides_tail() {
        let params: Vec<Value> = (1..=12).map(Value::Int).collect();
        assert_eq!(
            format_params(&params, 10),
            "[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, … (2 more)]"
        );
    }

    #[test]
    fn test_format_params_zero_limit() {
        let params = vec![Value::Int(1), Value::Int(2)];
        assert_eq!(format_params(&params, 0), "[… (2 more)]");
        assert_eq!(format_params(&[], 0), "[]");
    }
}
