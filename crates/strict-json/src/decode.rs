//! The strict walker: recursive descent over a parsed value tree,
//! validating object keys at every level that contains a record and
//! delegating everything else to serde.
//!
//! Decoding a value proceeds in four steps, at every recursion depth:
//!
//!   1. A literal `null` succeeds immediately and leaves the target at
//!      its zero value ([`Default`]).
//!   2. `Option` / `Box` indirection is resolved, allocating as needed.
//!   3. A type that opted out via [`opaque!`](crate::opaque) (or any
//!      manual impl with `HAS_STRICT_FIELDS = false` that delegates to
//!      its own `Deserialize`) receives the raw value verbatim — no
//!      strictness applies inside it.
//!   4. Otherwise dispatch on shape: records validate their keys
//!      against the cached [`FieldMap`](crate::FieldMap); sequences and
//!      maps recurse per element only when the element type can reach a
//!      record ([`HAS_STRICT_FIELDS`](StrictDecode::HAS_STRICT_FIELDS)),
//!      and are otherwise handed to serde wholesale; scalars always go
//!      to serde.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use std::str::FromStr;

use serde::de::{self, Deserialize, DeserializeOwned, Unexpected};
use serde_json::Value;

use crate::decoder::Decoder;
use crate::error::Error;
use crate::fields::{RawField, field_map};
use crate::suggest::closest_match;

/// A type that can be decoded with strict key validation.
///
/// Implemented by `#[derive(StrictDecode)]` for records, by this crate
/// for scalars and the standard containers, and by [`opaque!`](crate::opaque)
/// for types that handle their own decoding. The serde `Deserialize`
/// supertrait is the fast path: whenever a subtree cannot contain a
/// record, the walker hands the whole subtree to serde.
pub trait StrictDecode: DeserializeOwned {
    /// Whether this type's shape can reach, at any nesting depth, a
    /// record whose keys must be validated. `false` means the fast path
    /// fully covers the type.
    const HAS_STRICT_FIELDS: bool;

    /// Decode `raw` into a fresh value.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownField`] or [`Error::FieldConflict`] from key
    /// validation; [`Error::Json`] when the fast path rejects a value.
    fn decode_value(raw: &Value, decoder: &Decoder) -> Result<Self, Error>;

    /// Decode `raw` into an existing value.
    ///
    /// A literal `null` leaves the target untouched. For records this
    /// applies fields in place, so fields written before a failing key
    /// keep their new values — the caller sees the error, not a
    /// rollback.
    ///
    /// # Errors
    ///
    /// Same conditions as [`decode_value`](Self::decode_value).
    fn decode_into(&mut self, raw: &Value, decoder: &Decoder) -> Result<(), Error> {
        if raw.is_null() {
            return Ok(());
        }
        *self = Self::decode_value(raw, decoder)?;
        Ok(())
    }
}

/// A record with a derived field table.
///
/// Implemented only by `#[derive(StrictDecode)]`; the two methods are
/// the compile-time stand-in for runtime field reflection.
pub trait StrictRecord: Default + 'static {
    /// The record's directly declared fields, in declaration order.
    fn raw_fields() -> &'static [RawField];

    /// Write one raw value into the slot identified by `path` (a
    /// [`FieldLocation`](crate::FieldLocation) path), stepping through
    /// flattened sub-records and allocating intermediate `Option`
    /// storage on demand. A path that does not match the record's shape
    /// is silently skipped.
    ///
    /// # Errors
    ///
    /// Whatever the slot's own [`StrictDecode`] impl returns.
    fn apply_field(&mut self, path: &[usize], raw: &Value, decoder: &Decoder)
    -> Result<(), Error>;
}

/// Decode an object into a record, validating its keys first.
///
/// The order of checks matters and is part of the contract:
///
///   1. `null` succeeds without touching the target.
///   2. A non-object input is a fast-path-shaped type error.
///   3. A conflicted field map fails the decode outright, whatever keys
///      are present.
///   4. With `deny_unknown_fields`, every input key is checked before
///      any field is written; the first unresolvable key fails the
///      call, carrying a suggestion when `suggest_closest` is on.
///   5. Each resolvable key is applied through its location path; keys
///      that do not resolve are skipped (only reachable when rejection
///      is disabled).
///
/// # Errors
///
/// [`Error::FieldConflict`], [`Error::UnknownField`], [`Error::Json`],
/// or whatever a field's recursive decode returns.
pub fn decode_record_into<R: StrictRecord>(
    target: &mut R,
    raw: &Value,
    decoder: &Decoder,
) -> Result<(), Error> {
    if raw.is_null() {
        return Ok(());
    }
    let Value::Object(object) = raw else {
        return Err(shape_mismatch(raw, "a JSON object"));
    };

    let map = field_map::<R>();
    if let Some(name) = map.conflict() {
        return Err(Error::FieldConflict { name });
    }

    if decoder.deny_unknown_fields {
        for key in object.keys() {
            if !map.contains(key) {
                let suggestion = if decoder.suggest_closest {
                    closest_match(key, map.all_names()).map(str::to_owned)
                } else {
                    None
                };
                return Err(Error::UnknownField {
                    key: key.clone(),
                    suggestion,
                });
            }
        }
    }

    for (key, value) in object {
        if let Some(location) = map.location(key) {
            target.apply_field(location.path(), value, decoder)?;
        }
    }

    Ok(())
}

/// The fast path: hand the whole raw subtree to the type's own serde
/// `Deserialize` impl.
///
/// # Errors
///
/// The serde_json error, verbatim, as [`Error::Json`].
pub fn fast_path<T: DeserializeOwned>(raw: &Value) -> Result<T, Error> {
    T::deserialize(raw).map_err(Error::Json)
}

fn shape_mismatch(raw: &Value, expected: &'static str) -> Error {
    Error::Json(de::Error::invalid_type(unexpected(raw), &expected))
}

fn unexpected(value: &Value) -> Unexpected<'_> {
    match value {
        Value::Null => Unexpected::Unit,
        Value::Bool(b) => Unexpected::Bool(*b),
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                Unexpected::Unsigned(u)
            } else if let Some(i) = n.as_i64() {
                Unexpected::Signed(i)
            } else {
                Unexpected::Float(n.as_f64().unwrap_or(0.0))
            }
        }
        Value::String(s) => Unexpected::Str(s),
        Value::Array(_) => Unexpected::Seq,
        Value::Object(_) => Unexpected::Map,
    }
}

/// Declares that a type handles its own decoding: the strict walker
/// hands it the raw value verbatim and never looks at keys inside it.
///
/// The Rust rendition of "this type has a custom decode routine" — the
/// type's hand-written serde `Deserialize` impl is the routine. A
/// literal `null` still short-circuits to the zero value before the
/// custom impl runs, so `Default` is required.
///
/// ```
/// use serde::Deserialize;
///
/// #[derive(Debug, Default)]
/// struct Celsius(f64);
///
/// impl<'de> Deserialize<'de> for Celsius {
///     fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
///         f64::deserialize(d).map(Celsius)
///     }
/// }
///
/// strict_json::opaque!(Celsius);
///
/// let c: Celsius = strict_json::from_str("21.5")?;
/// assert!((c.0 - 21.5).abs() < f64::EPSILON);
/// # Ok::<(), strict_json::Error>(())
/// ```
#[macro_export]
macro_rules! opaque {
    ($($ty:ty),+ $(,)?) => {$(
        impl $crate::StrictDecode for $ty {
            const HAS_STRICT_FIELDS: bool = false;

            fn decode_value(
                raw: &$crate::serde_json::Value,
                _decoder: &$crate::Decoder,
            ) -> ::core::result::Result<Self, $crate::Error> {
                if raw.is_null() {
                    return ::core::result::Result::Ok(
                        <$ty as ::core::default::Default>::default(),
                    );
                }
                $crate::decode::fast_path(raw)
            }
        }
    )+};
}

// ── Scalars ───────────────────────────────────────────────────────────
//
// No structure below a scalar, so no strict work: null zeroes the
// value, everything else goes to serde.

macro_rules! impl_strict_scalar {
    ($($ty:ty),+ $(,)?) => {$(
        impl StrictDecode for $ty {
            const HAS_STRICT_FIELDS: bool = false;

            fn decode_value(raw: &Value, _decoder: &Decoder) -> Result<Self, Error> {
                if raw.is_null() {
                    return Ok(<$ty>::default());
                }
                fast_path(raw)
            }
        }
    )+};
}

impl_strict_scalar!(
    bool, char, String, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
);

// The "any" type: whatever was parsed, kept as-is.
impl StrictDecode for Value {
    const HAS_STRICT_FIELDS: bool = false;

    fn decode_value(raw: &Value, _decoder: &Decoder) -> Result<Self, Error> {
        Ok(raw.clone())
    }
}

// ── Indirection ───────────────────────────────────────────────────────

impl<T: StrictDecode> StrictDecode for Option<T> {
    const HAS_STRICT_FIELDS: bool = T::HAS_STRICT_FIELDS;

    fn decode_value(raw: &Value, decoder: &Decoder) -> Result<Self, Error> {
        if raw.is_null() {
            return Ok(None);
        }
        T::decode_value(raw, decoder).map(Some)
    }
}

impl<T: StrictDecode> StrictDecode for Box<T> {
    const HAS_STRICT_FIELDS: bool = T::HAS_STRICT_FIELDS;

    fn decode_value(raw: &Value, decoder: &Decoder) -> Result<Self, Error> {
        T::decode_value(raw, decoder).map(Box::new)
    }
}

// ── Sequences ─────────────────────────────────────────────────────────

impl<T: StrictDecode> StrictDecode for Vec<T> {
    const HAS_STRICT_FIELDS: bool = T::HAS_STRICT_FIELDS;

    fn decode_value(raw: &Value, decoder: &Decoder) -> Result<Self, Error> {
        if raw.is_null() {
            return Ok(Vec::new());
        }
        if !Self::HAS_STRICT_FIELDS {
            return fast_path(raw);
        }
        let Value::Array(items) = raw else {
            return Err(shape_mismatch(raw, "a JSON array"));
        };
        let mut out = Vec::with_capacity(items.len());
        for item in items {
            out.push(T::decode_value(item, decoder)?);
        }
        Ok(out)
    }
}

// ── Maps ──────────────────────────────────────────────────────────────
//
// JSON object keys are strings; non-string key types are converted from
// their string form, mirroring the fast path's own key handling.

fn parse_key<K: FromStr>(key: &str) -> Result<K, Error> {
    key.parse()
        .map_err(|_| Error::Json(de::Error::custom(format_args!("invalid map key \"{key}\""))))
}

impl<K, V> StrictDecode for HashMap<K, V>
where
    K: DeserializeOwned + FromStr + Eq + Hash,
    V: StrictDecode,
{
    const HAS_STRICT_FIELDS: bool = V::HAS_STRICT_FIELDS;

    fn decode_value(raw: &Value, decoder: &Decoder) -> Result<Self, Error> {
        if raw.is_null() {
            return Ok(HashMap::new());
        }
        if !Self::HAS_STRICT_FIELDS {
            return fast_path(raw);
        }
        let Value::Object(object) = raw else {
            return Err(shape_mismatch(raw, "a JSON object"));
        };
        let mut out = HashMap::with_capacity(object.len());
        for (key, value) in object {
            out.insert(parse_key(key)?, V::decode_value(value, decoder)?);
        }
        Ok(out)
    }

    // Merge semantics: input entries decode fresh and overwrite, keys
    // absent from the input keep their entries.
    fn decode_into(&mut self, raw: &Value, decoder: &Decoder) -> Result<(), Error> {
        if raw.is_null() {
            return Ok(());
        }
        let Value::Object(object) = raw else {
            return Err(shape_mismatch(raw, "a JSON object"));
        };
        self.reserve(object.len());
        for (key, value) in object {
            self.insert(parse_key(key)?, V::decode_value(value, decoder)?);
        }
        Ok(())
    }
}

impl<K, V> StrictDecode for BTreeMap<K, V>
where
    K: DeserializeOwned + FromStr + Ord,
    V: StrictDecode,
{
    const HAS_STRICT_FIELDS: bool = V::HAS_STRICT_FIELDS;

    fn decode_value(raw: &Value, decoder: &Decoder) -> Result<Self, Error> {
        if raw.is_null() {
            return Ok(BTreeMap::new());
        }
        if !Self::HAS_STRICT_FIELDS {
            return fast_path(raw);
        }
        let Value::Object(object) = raw else {
            return Err(shape_mismatch(raw, "a JSON object"));
        };
        let mut out = BTreeMap::new();
        for (key, value) in object {
            out.insert(parse_key(key)?, V::decode_value(value, decoder)?);
        }
        Ok(out)
    }

    // Same merge semantics as the HashMap impl.
    fn decode_into(&mut self, raw: &Value, decoder: &Decoder) -> Result<(), Error> {
        if raw.is_null() {
            return Ok(());
        }
        let Value::Object(object) = raw else {
            return Err(shape_mismatch(raw, "a JSON object"));
        };
        for (key, value) in object {
            self.insert(parse_key(key)?, V::decode_value(value, decoder)?);
        }
        Ok(())
    }
}
