mod support;

use std::io;
use std::sync::{Arc, Mutex};

use sqlrecord::prelude::*;
use sqlrecord::QueryErrorKind;
use support::{MockConnection, Reply, User, expect_err, run, unwrap_outcome, user_row};
use tracing_subscriber::fmt::MakeWriter;

/// In-memory log sink shared between the subscriber and the test.
#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().expect("sink lock")).into_owned()
    }
}

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("sink lock").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for Captured {
    type Writer = Captured;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run `test` with an INFO-level subscriber and return everything it logged.
fn capture(test: impl FnOnce()) -> String {
    let sink = Captured::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(sink.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::INFO)
        .finish();
    tracing::subscriber::with_default(subscriber, test);
    sink.contents()
}

fn persisted_users(count: i64) -> Vec<User> {
    (1..=count)
        .map(|id| User {
            id: Id::new(id),
            ..User::default()
        })
        .collect()
}

#[test]
fn delete_many_logs_statement_with_elided_params() {
    let output = capture(|| {
        run(|cx| async move {
            let conn = MockConnection::new().reply(Reply::Affected(12));
            let session = RecordSession::new(conn);

            let users = persisted_users(12);
            assert_eq!(unwrap_outcome(session.delete_many(&cx, &users).await), 12);
        });
    });

    assert_eq!(output.matches("Executing statement").count(), 1);
    assert!(output.contains("DELETE FROM"));
    assert!(output.contains("users"));
    assert!(output.contains("[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, … (2 more)]"));
    assert!(!output.contains("11, 12"));
}

#[test]
fn param_limit_follows_session_config() {
    let output = capture(|| {
        run(|cx| async move {
            let session = RecordSession::builder()
                .log_param_limit(2)
                .build_with(MockConnection::new().reply(Reply::Affected(4)));

            let users = persisted_users(4);
            unwrap_outcome(session.delete_many(&cx, &users).await);
        });
    });

    assert!(output.contains("[1, 2, … (2 more)]"));
}

#[test]
fn create_is_logged_before_it_reaches_the_connection() {
    let output = capture(|| {
        run(|cx| async move {
            let conn = MockConnection::new()
                .reply(Reply::Fail(QueryErrorKind::Constraint, "duplicate key"));
            let session = RecordSession::new(conn);

            let mut user = User::default();
            user.set_name("Ada");
            expect_err(session.create(&cx, &mut user).await);
        });
    });

    assert!(output.contains("Executing statement"));
    assert!(output.contains("INSERT INTO"));
    assert!(output.contains("['Ada']"));
}

#[test]
fn disabled_statement_logging_is_silent() {
    let output = capture(|| {
        run(|cx| async move {
            let conn = MockConnection::new()
                .reply(Reply::Rows(vec![user_row(1, "Ada", None, true)]))
                .reply(Reply::Affected(1));
            let session = RecordSession::builder()
                .log_statements(false)
                .build_with(conn);

            let mut user = User::default();
            user.set_name("Ada");
            unwrap_outcome(session.create(&cx, &mut user).await);
            unwrap_outcome(session.delete(&cx, &user).await);

            assert_eq!(session.connection().statements().len(), 2);
        });
    });

    assert!(!output.contains("Executing statement"));
}
