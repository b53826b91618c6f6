#![warn(clippy::pedantic)]

//! Case-sensitive, strict-by-default JSON decoding on top of serde_json.
//!
//! serde's deserializer matches object keys against field names but, by
//! default, silently ignores keys it does not recognize — including keys
//! that differ from a real field only by case. This crate layers key
//! validation on top of the serde_json value tree: every object key must
//! exactly match a field's external name, at every nesting depth, through
//! nested records, sequences of records, and maps of records. Once the
//! keys at a level are validated, the actual value conversion is handed
//! back to serde (the fast path), so anything serde can decode, this
//! crate can decode.
//!
//! Decoding proceeds in three stages:
//!
//!   1. **Field map** ([`fields`]): a per-record table of external key
//!      names and the path to each field's storage slot, flattened
//!      sub-records included, built once per type and cached for the
//!      process lifetime.
//!   2. **Strict walk** ([`decode`]): a recursive descent over the parsed
//!      value that validates object keys against the field map and
//!      decides, per subtree, whether strict recursion is needed or the
//!      whole subtree can be delegated to serde.
//!   3. **Diagnostics** ([`suggest`]): on an unknown key, an optional
//!      "did you mean" suggestion from a case-insensitive match or an
//!      edit-distance search over the known names.
//!
//! # Example
//!
//! ```
//! use serde::Deserialize;
//! use strict_json::StrictDecode;
//!
//! #[derive(Debug, Default, Deserialize, StrictDecode)]
//! struct Person {
//!     name: String,
//!     age: i32,
//! }
//!
//! let person: Person = strict_json::from_slice(br#"{"name":"John","age":30}"#)?;
//! assert_eq!(person.name, "John");
//! assert_eq!(person.age, 30);
//!
//! // serde would accept this input; the strict decoder rejects it.
//! let err = strict_json::from_slice::<Person>(br#"{"Name":"John","age":30}"#).unwrap_err();
//! assert!(matches!(err, strict_json::Error::UnknownField { .. }));
//! # Ok::<(), strict_json::Error>(())
//! ```
//!
//! Derived types must also implement [`Default`] (the value every field
//! starts from, and the result of decoding a JSON `null`) and serde's
//! `Deserialize` (the fast path). Types with a hand-written `Deserialize`
//! impl opt out of key strictness entirely via [`opaque!`].

// Lets derive-generated `::strict_json::` paths resolve inside this
// crate's own tests.
extern crate self as strict_json;

pub mod decode;
pub mod decoder;
pub mod error;
pub mod fields;
pub mod suggest;

pub use decode::{StrictDecode, StrictRecord};
pub use decoder::Decoder;
pub use error::Error;
pub use fields::{FieldLocation, FieldMap, RawField, RawFieldKind, clear_cache, field_map};
pub use suggest::closest_match;

/// Derives [`StrictDecode`] (and the underlying [`StrictRecord`]) for a
/// struct with named fields. Reads the same `#[serde(...)]` attributes
/// that drive the fast path: `rename`, `flatten`, `skip`,
/// `skip_deserializing`.
pub use strict_json_derive::StrictDecode;

pub use serde_json;

/// Decode `data` with the default configuration: unknown fields are
/// rejected, suggestions are off.
///
/// Drop-in equivalent of `serde_json::from_slice` for [`StrictDecode`]
/// targets.
///
/// # Errors
///
/// See [`Error`]; malformed JSON surfaces as [`Error::Json`], a key that
/// matches no field as [`Error::UnknownField`], and an ambiguous
/// flattened field name as [`Error::FieldConflict`].
pub fn from_slice<T: StrictDecode>(data: &[u8]) -> Result<T, Error> {
    Decoder::new().from_slice(data)
}

/// Decode a string with the default configuration.
///
/// # Errors
///
/// Same conditions as [`from_slice`].
pub fn from_str<T: StrictDecode>(data: &str) -> Result<T, Error> {
    Decoder::new().from_str(data)
}

/// Decode an already-parsed value tree with the default configuration.
///
/// # Errors
///
/// Same conditions as [`from_slice`], minus the parse stage.
pub fn from_value<T: StrictDecode>(raw: &serde_json::Value) -> Result<T, Error> {
    Decoder::new().from_value(raw)
}
