//! The record contract.
//!
//! A record is any struct exposing an identifier, a change-tracking sidecar,
//! and per-column readouts. There is no base type: each capability is its own
//! trait, implemented by `#[derive(Record)]` or by hand.

use crate::error::Result;
use crate::field::FieldInfo;
use crate::id::{Id, Table};
use crate::meta::MetaBag;
use crate::row::Row;
use crate::value::Value;

/// A record with a readable `id` field.
pub trait HasIdentifier {
    /// Table the identifier belongs to
    type Table: Table;

    fn id(&self) -> &Id<Self::Table>;
}

/// A record with a readable `meta` sidecar.
pub trait HasMeta {
    fn meta(&self) -> &MetaBag;

    fn meta_mut(&mut self) -> &mut MetaBag;
}

/// A record persisted as one row of [`HasIdentifier::Table`].
pub trait Record: HasIdentifier + HasMeta + Sized {
    /// Table name, taken from the table binding.
    const TABLE_NAME: &'static str = <Self::Table as Table>::NAME;

    /// Column holding the identifier.
    const PRIMARY_KEY: &'static str;

    /// Column-backed fields, in column order.
    fn fields() -> &'static [FieldInfo];

    /// Current values of every column-backed field, aligned with [`fields`](Record::fields).
    fn to_values(&self) -> Vec<Value>;

    /// Hydrate a record from a stored row. The result has an empty touched-set.
    #[allow(clippy::result_large_err)]
    fn from_row(row: &Row) -> Result<Self>;

    /// Current value of one field, by Rust field name.
    fn field_value(&self, field: &str) -> Option<Value> {
        let index = Self::fields().iter().position(|f| f.name == field)?;
        self.to_values().into_iter().nth(index)
    }

    /// Mark `field` as touched. Hand-written setters call this.
    fn touch(&mut self, field: &'static str) {
        self.meta_mut().touch(field);
    }
}

/// True if the record has not been persisted yet, i.e. its identifier is
/// still the primary-key type's default.
pub fn is_new<R: HasIdentifier>(record: &R) -> bool
where
    <R::Table as Table>::PrimaryKey: Default,
{
    record.id().is_default()
}

/// True if `field` was touched since the record was loaded or last written.
pub fn did_change<R: HasMeta>(record: &R, field: &str) -> bool {
    record.meta().is_touched(field)
}

/// True if any field was touched since the record was loaded or last written.
pub fn did_change_record<R: HasMeta>(record: &R) -> bool {
    record.meta().has_changes()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Posts;

    impl Table for Posts {
        const NAME: &'static str = "posts";
        type PrimaryKey = i64;
        type Record = Post;
    }

    #[derive(Debug, Default)]
    struct Post {
        id: Id<Posts>,
        title: String,
        meta: MetaBag,
    }

    impl Post {
        fn set_title(&mut self, title: &str) -> &mut Self {
            self.title = title.to_string();
            self.touch("title");
            self
        }
    }

    impl HasIdentifier for Post {
        type Table = Posts;

        fn id(&self) -> &Id<Posts> {
            &self.id
        }
    }

    impl HasMeta for Post {
        fn meta(&self) -> &MetaBag {
            &self.meta
        }

        fn meta_mut(&mut self) -> &mut MetaBag {
            &mut self.meta
        }
    }

    impl Record for Post {
        const PRIMARY_KEY: &'static str = "id";

        fn fields() -> &'static [FieldInfo] {
            static FIELDS: &[FieldInfo] = &[
                FieldInfo::new("id", "id").primary_key(true),
                FieldInfo::new("title", "title"),
            ];
            FIELDS
        }

        fn to_values(&self) -> Vec<Value> {
            vec![self.id.to_value(), Value::Text(self.title.clone())]
        }

        fn from_row(row: &Row) -> Result<Self> {
            Ok(Self {
                id: row.get_named("id")?,
                title: row.get_named("title")?,
                meta: MetaBag::default(),
            })
        }
    }

    #[test]
    fn test_table_name_comes_from_binding() {
        assert_eq!(Post::TABLE_NAME, "posts");
    }

    #[test]
    fn test_is_new_tracks_identifier() {
        let mut post = Post::default();
        assert!(is_new(&post));
        post.id = Id::new(3);
        assert!(!is_new(&post));
    }

    #[test]
    fn test_did_change() {
        let mut post = Post::default();
        assert!(!did_change_record(&post));

        post.set_title("Hello");
        assert!(did_change_record(&post));
        assert!(did_change(&post, "title"));
        assert!(!did_change(&post, "id"));
    }

    #[test]
    fn test_field_value_by_name() {
        let mut post = Post::default();
        post.set_title("Hello");
        assert_eq!(post.field_value("title"), Some(Value::Text("Hello".into())));
        assert_eq!(post.field_value("id"), Some(Value::BigInt(0)));
        assert_eq!(post.field_value("body"), None);
    }

    #[test]
    fn test_hydrated_record_is_unchanged() {
        let row = Row::new(
            vec!["id".into(), "title".into()],
            vec![Value::BigInt(8), Value::Text("Stored".into())],
        );
        let post = Post::from_row(&row).unwrap();
        assert_eq!(post.id, Id::new(8));
        assert!(!did_change_record(&post));
    }
}
