//! Procedural macros for sqlrecord.
//!
//! `#[derive(Record)]` turns a plain struct into a record:
//!
//! ```ignore
//! use sqlrecord::prelude::*;
//!
//! #[derive(Debug, Default, Record)]
//! #[record(table = "users", primary_key = i64)]
//! pub struct User {
//!     id: Id<Users>,
//!     name: String,
//!     #[record(column = "email_address")]
//!     email: Option<String>,
//!     meta: MetaBag,
//! }
//!
//! let mut user = User::default();
//! user.set_name("Ada");
//! assert!(did_change(&user, "name"));
//! ```
//!
//! Struct attributes:
//! - `table = "..."` and `primary_key = Type` together emit the marker named by
//!   the identifier field (`Users` above) and its `Table` impl. Leave both off
//!   when the marker is bound by hand.
//!
//! Field attributes:
//! - `id` marks the identifier field (default: the field named `id`)
//! - `meta` marks the `MetaBag` sidecar (default: the field named `meta`)
//! - `column = "..."` overrides the column name
//! - `skip` keeps the field out of every statement; hydration uses `Default`

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod record_derive;

/// Derive the record traits, the optional table binding and touching setters.
#[proc_macro_derive(Record, attributes(record))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match record_derive::parse_record(&input) {
        Ok(def) => record_derive::generate_record_impl(&def).into(),
        Err(err) => err.to_compile_error().into(),
    }
}
