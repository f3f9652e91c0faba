//! Shared fixtures: a scripted in-memory connection and a few records.
#![allow(dead_code, clippy::manual_async_fn)]

use std::collections::VecDeque;
use std::sync::Mutex;

use asupersync::runtime::RuntimeBuilder;
use sqlrecord::prelude::*;
use sqlrecord::{QueryError, QueryErrorKind};

pub fn unwrap_outcome<T>(outcome: Outcome<T, Error>) -> T {
    match outcome {
        Outcome::Ok(v) => v,
        Outcome::Err(e) => panic!("unexpected error: {e}"),
        Outcome::Cancelled(r) => panic!("cancelled: {r:?}"),
        Outcome::Panicked(p) => panic!("panicked: {p:?}"),
    }
}

pub fn expect_err<T>(outcome: Outcome<T, Error>) -> Error {
    match outcome {
        Outcome::Ok(_) => panic!("expected an error, got Ok"),
        Outcome::Err(e) => e,
        Outcome::Cancelled(r) => panic!("cancelled: {r:?}"),
        Outcome::Panicked(p) => panic!("panicked: {p:?}"),
    }
}

/// Run `test` on a fresh single-threaded runtime.
pub fn run<F, Fut>(test: F)
where
    F: FnOnce(Cx) -> Fut,
    Fut: std::future::Future<Output = ()>,
{
    let rt = RuntimeBuilder::current_thread()
        .build()
        .expect("create asupersync runtime");
    let cx = Cx::for_testing();
    rt.block_on(test(cx));
}

/// Build a row from `(column, value)` pairs.
pub fn row(columns: &[(&str, Value)]) -> Row {
    Row::new(
        columns.iter().map(|(name, _)| (*name).to_string()).collect(),
        columns.iter().map(|(_, value)| value.clone()).collect(),
    )
}

/// What the next statement returns.
#[derive(Debug)]
pub enum Reply {
    Rows(Vec<Row>),
    Affected(u64),
    Fail(QueryErrorKind, &'static str),
}

/// Connection that records every statement and answers from a script.
///
/// With an empty script, queries return no rows and executes affect 0 rows.
#[derive(Debug, Default)]
pub struct MockConnection {
    replies: Mutex<VecDeque<Reply>>,
    log: Mutex<Vec<(String, Vec<Value>)>>,
}

impl MockConnection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, reply: Reply) -> Self {
        self.replies
            .lock()
            .expect("replies lock")
            .push_back(reply);
        self
    }

    /// Every `(sql, params)` pair executed so far.
    pub fn statements(&self) -> Vec<(String, Vec<Value>)> {
        self.log.lock().expect("log lock").clone()
    }

    pub fn last_sql(&self) -> String {
        self.statements()
            .last()
            .map(|(sql, _)| sql.clone())
            .expect("at least one statement")
    }

    fn next(&self, sql: &str, params: &[Value]) -> Option<Reply> {
        self.log
            .lock()
            .expect("log lock")
            .push((sql.to_string(), params.to_vec()));
        self.replies.lock().expect("replies lock").pop_front()
    }

    fn failure(kind: QueryErrorKind, message: &str, sql: &str) -> Error {
        Error::Query(QueryError {
            kind,
            sql: Some(sql.to_string()),
            message: message.to_string(),
            source: None,
        })
    }
}

impl Connection for MockConnection {
    fn query(
        &self,
        _cx: &Cx,
        sql: &str,
        params: &[Value],
    ) -> impl std::future::Future<Output = Outcome<Vec<Row>, Error>> + Send {
        let outcome = match self.next(sql, params) {
            Some(Reply::Rows(rows)) => Outcome::Ok(rows),
            Some(Reply::Affected(_)) | None => Outcome::Ok(Vec::new()),
            Some(Reply::Fail(kind, message)) => Outcome::Err(Self::failure(kind, message, sql)),
        };
        async move { outcome }
    }

    fn query_one(
        &self,
        _cx: &Cx,
        sql: &str,
        params: &[Value],
    ) -> impl std::future::Future<Output = Outcome<Option<Row>, Error>> + Send {
        let outcome = match self.next(sql, params) {
            Some(Reply::Rows(rows)) => Outcome::Ok(rows.into_iter().next()),
            Some(Reply::Affected(_)) | None => Outcome::Ok(None),
            Some(Reply::Fail(kind, message)) => Outcome::Err(Self::failure(kind, message, sql)),
        };
        async move { outcome }
    }

    fn execute(
        &self,
        _cx: &Cx,
        sql: &str,
        params: &[Value],
    ) -> impl std::future::Future<Output = Outcome<u64, Error>> + Send {
        let outcome = match self.next(sql, params) {
            Some(Reply::Affected(n)) => Outcome::Ok(n),
            Some(Reply::Rows(rows)) => Outcome::Ok(rows.len() as u64),
            None => Outcome::Ok(0),
            Some(Reply::Fail(kind, message)) => Outcome::Err(Self::failure(kind, message, sql)),
        };
        async move { outcome }
    }
}

// ============================================================================
// Records
// ============================================================================

#[derive(Debug, Default, Clone, Record)]
#[record(table = "users", primary_key = i64)]
pub struct User {
    pub id: Id<Users>,
    pub name: String,
    #[record(column = "email_address")]
    pub email: Option<String>,
    pub active: bool,
    pub meta: MetaBag,
}

/// A stored `users` row.
pub fn user_row(id: i64, name: &str, email: Option<&str>, active: bool) -> Row {
    row(&[
        ("id", Value::BigInt(id)),
        ("name", Value::Text(name.to_string())),
        (
            "email_address",
            email.map_or(Value::Null, |e| Value::Text(e.to_string())),
        ),
        ("active", Value::Bool(active)),
    ])
}

#[derive(Debug, Default, Clone, Record)]
#[record(table = "login_sessions", primary_key = uuid::Uuid)]
pub struct LoginSession {
    pub id: Id<LoginSessions>,
    #[record(column = "user_id")]
    pub user: Id<Users>,
    pub token: String,
    #[record(skip)]
    pub cached_user_name: Option<String>,
    pub meta: MetaBag,
}

/// Bound by hand: the derive only reads the marker off `Id<Tags>`.
pub struct Tags;

impl Table for Tags {
    const NAME: &'static str = "tags";
    type PrimaryKey = String;
    type Record = Tag;
}

#[derive(Debug, Default, Clone, Record)]
pub struct Tag {
    #[record(id, column = "slug")]
    pub key: Id<Tags>,
    pub label: String,
    #[record(meta)]
    pub tracking: MetaBag,
}
