//! Table bindings and typed identifiers.
//!
//! Every table is represented by a zero-sized marker type implementing
//! [`Table`]. The marker, not the record struct, parameterizes [`Id`], so a
//! record can hold `Id<Self's table>` and other records can hold it as a
//! foreign key without the types referring to each other.
//!
//! ```
//! use sqlrecord_core::{Id, Table};
//!
//! struct Users;
//!
//! impl Table for Users {
//!     const NAME: &'static str = "users";
//!     type PrimaryKey = i64;
//!     type Record = ();
//! }
//!
//! let id: Id<Users> = "42".parse().unwrap();
//! assert_eq!(id, Id::new(42));
//! assert_eq!(id.to_string(), "42");
//! assert!(Id::<Users>::default().is_default());
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result, TypeError};
use crate::value::{FromValue, Value};

/// Static binding of a table name to its primary-key type and record type.
///
/// Implementations are generated (by `#[derive(Record)]` or schema tooling)
/// and are resolved entirely at compile time.
pub trait Table: 'static {
    /// Table name as it appears in SQL
    const NAME: &'static str;
    /// Type of the `id` column
    type PrimaryKey: PrimaryKey;
    /// Record type currently mapped to this table
    type Record;
}

/// A type usable as a table's primary key.
pub trait PrimaryKey:
    Clone + Eq + Hash + fmt::Debug + Send + Sync + FromValue + Into<Value> + 'static
{
    /// Canonical text form, suitable for URLs and hidden form fields.
    fn render(&self) -> String;

    /// Inverse of [`render`](PrimaryKey::render).
    #[allow(clippy::result_large_err)]
    fn parse(text: &str) -> Result<Self>;
}

macro_rules! impl_integer_primary_key {
    ($($ty:ty => $sql:literal),* $(,)?) => {
        $(
            impl PrimaryKey for $ty {
                fn render(&self) -> String {
                    self.to_string()
                }

                fn parse(text: &str) -> Result<Self> {
                    text.trim()
                        .parse()
                        .map_err(|_| Error::decode($sql, format!("'{}'", text)))
                }
            }
        )*
    };
}

impl_integer_primary_key! {
    i16 => "SMALLINT",
    i32 => "INTEGER",
    i64 => "BIGINT",
}

impl PrimaryKey for uuid::Uuid {
    fn render(&self) -> String {
        self.hyphenated().to_string()
    }

    fn parse(text: &str) -> Result<Self> {
        uuid::Uuid::parse_str(text.trim()).map_err(|_| Error::decode("UUID", format!("'{}'", text)))
    }
}

impl PrimaryKey for String {
    fn render(&self) -> String {
        self.clone()
    }

    fn parse(text: &str) -> Result<Self> {
        Ok(text.to_string())
    }
}

/// Typed identifier of a row in table `T`.
///
/// Equality, hashing, ordering, rendering and serialization all delegate to
/// the wrapped primary-key value; the table exists only in the type.
pub struct Id<T: Table> {
    value: T::PrimaryKey,
    _table: PhantomData<fn() -> T>,
}

impl<T: Table> Id<T> {
    /// Wrap a known primary-key value.
    pub fn new(value: T::PrimaryKey) -> Self {
        Self {
            value,
            _table: PhantomData,
        }
    }

    /// Borrow the wrapped primary-key value.
    pub fn get(&self) -> &T::PrimaryKey {
        &self.value
    }

    /// Unwrap into the primary-key value.
    pub fn into_inner(self) -> T::PrimaryKey {
        self.value
    }

    /// Encode as a bound-parameter value.
    pub fn to_value(&self) -> Value {
        self.value.clone().into()
    }

    /// Name of the table this identifier belongs to.
    pub const fn table_name(&self) -> &'static str {
        T::NAME
    }
}

impl<T: Table> Id<T>
where
    T::PrimaryKey: Default,
{
    /// True if this is the "not yet assigned" identifier.
    pub fn is_default(&self) -> bool {
        self.value == T::PrimaryKey::default()
    }
}

impl<T: Table> Default for Id<T>
where
    T::PrimaryKey: Default,
{
    fn default() -> Self {
        Self::new(T::PrimaryKey::default())
    }
}

impl<T: Table> Clone for Id<T> {
    fn clone(&self) -> Self {
        Self::new(self.value.clone())
    }
}

impl<T: Table> Copy for Id<T> where T::PrimaryKey: Copy {}

impl<T: Table> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T: Table> Eq for Id<T> {}

impl<T: Table> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T: Table> PartialOrd for Id<T>
where
    T::PrimaryKey: Ord,
{
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: Table> Ord for Id<T>
where
    T::PrimaryKey: Ord,
{
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl<T: Table> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id<{}>({:?})", T::NAME, self.value)
    }
}

impl<T: Table> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value.render())
    }
}

impl<T: Table> FromStr for Id<T> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        T::PrimaryKey::parse(s).map(Self::new)
    }
}

impl<T: Table> From<Id<T>> for Value {
    fn from(id: Id<T>) -> Self {
        id.value.into()
    }
}

impl<T: Table> FromValue for Id<T> {
    fn from_value(value: &Value) -> Result<Self> {
        T::PrimaryKey::from_value(value).map(Self::new)
    }
}

impl<T: Table> Serialize for Id<T>
where
    T::PrimaryKey: Serialize,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

impl<'de, T: Table> Deserialize<'de> for Id<T>
where
    T::PrimaryKey: Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        T::PrimaryKey::deserialize(deserializer).map(Self::new)
    }
}

/// Parse an identifier from untrusted text, reporting which table it was for.
#[allow(clippy::result_large_err)]
pub fn parse_id<T: Table>(text: &str) -> Result<Id<T>> {
    text.parse().map_err(|e| match e {
        Error::Type(t) => Error::Type(TypeError {
            column: Some(format!("{}.id", T::NAME)),
            ..t
        }),
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    struct Users;

    impl Table for Users {
        const NAME: &'static str = "users";
        type PrimaryKey = i64;
        type Record = ();
    }

    struct Sessions;

    impl Table for Sessions {
        const NAME: &'static str = "sessions";
        type PrimaryKey = uuid::Uuid;
        type Record = ();
    }

    #[test]
    fn test_equality_delegates_to_value() {
        assert_eq!(Id::<Users>::new(5), Id::new(5));
        assert_ne!(Id::<Users>::new(5), Id::new(6));

        let set: HashSet<Id<Users>> = [Id::new(1), Id::new(1), Id::new(2)].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_ordering_delegates_to_value() {
        let mut ids = vec![Id::<Users>::new(3), Id::new(1), Id::new(2)];
        ids.sort();
        assert_eq!(ids, vec![Id::new(1), Id::new(2), Id::new(3)]);
    }

    #[test]
    fn test_default_is_unassigned() {
        assert!(Id::<Users>::default().is_default());
        assert!(!Id::<Users>::new(1).is_default());
        assert!(Id::<Sessions>::default().is_default());
        assert_eq!(Id::<Sessions>::default().get(), &uuid::Uuid::nil());
    }

    #[test]
    fn test_integer_text_round_trip() {
        for raw in [0_i64, 1, -17, i64::MAX] {
            let id = Id::<Users>::new(raw);
            let parsed: Id<Users> = id.to_string().parse().unwrap();
            assert_eq!(parsed, id);
        }
    }

    #[test]
    fn test_uuid_text_round_trip() {
        let id = Id::<Sessions>::new(uuid::Uuid::new_v4());
        let text = id.to_string();
        assert_eq!(text.len(), 36);
        let parsed: Id<Sessions> = text.parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("abc".parse::<Id<Users>>().is_err());
        assert!("not-a-uuid".parse::<Id<Sessions>>().is_err());
    }

    #[test]
    fn test_parse_id_names_table() {
        match parse_id::<Users>("x1") {
            Err(Error::Type(e)) => assert_eq!(e.column.as_deref(), Some("users.id")),
            other => panic!("expected type error, got {other:?}"),
        }
    }

    #[test]
    fn test_value_encode_decode() {
        let id = Id::<Users>::new(9);
        let value: Value = id.into();
        assert_eq!(value, Value::BigInt(9));
        assert_eq!(Id::<Users>::from_value(&value).unwrap(), id);
        assert!(Id::<Users>::from_value(&Value::Null).is_err());
    }

    #[test]
    fn test_serializes_as_bare_value() {
        let id = Id::<Users>::new(12);
        assert_eq!(serde_json::to_string(&id).unwrap(), "12");
        let back: Id<Users> = serde_json::from_str("12").unwrap();
        assert_eq!(back, id);

        let uid = uuid::Uuid::nil();
        let sid = Id::<Sessions>::new(uid);
        assert_eq!(
            serde_json::to_string(&sid).unwrap(),
            format!("\"{}\"", uid)
        );
    }

    #[test]
    fn test_debug_includes_table() {
        assert_eq!(format!("{:?}", Id::<Users>::new(3)), "Id<users>(3)");
    }
}
