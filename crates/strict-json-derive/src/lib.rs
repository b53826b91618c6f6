#![warn(clippy::pedantic)]

//! `#[derive(StrictDecode)]` — compile-time field tables for the
//! strict-json walker.
//!
//! The runtime crate validates object keys against a per-record table
//! of external field names. This derive emits that table (plus the
//! path-following field writer) for any struct with named fields,
//! reading the same `#[serde(...)]` attributes that drive serde's own
//! derive so the strict names and the fast-path names cannot drift:
//!
//! - `#[serde(rename = "...")]` replaces the external name,
//! - `#[serde(skip)]` / `#[serde(skip_deserializing)]` excludes the
//!   field entirely,
//! - `#[serde(flatten)]` marks an embedded sub-record (plain,
//!   `Option<T>`, or `Box<T>`).
//!
//! Other serde attributes are left to serde. Attributes that would
//! change key naming wholesale (`rename_all`) are rejected, as are
//! enums, tuple structs, and generic types.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod expand;

#[proc_macro_derive(StrictDecode, attributes(serde))]
pub fn derive_strict_decode(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand::derive(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
