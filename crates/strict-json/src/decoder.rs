//! Decoder configuration and entry points.

use serde_json::Value;

use crate::decode::StrictDecode;
use crate::error::Error;

/// A configured strict decoder.
///
/// Two independent switches, set builder-style and immutable once the
/// decoder is in use:
///
/// - `deny_unknown_fields` (default **on**): reject any object key that
///   does not exactly match a field name.
/// - `suggest_closest` (default **off**): attach a "did you mean"
///   suggestion to unknown-field errors. Off by default so the
///   fail-fast path never pays for edit-distance scans.
///
/// The decoder itself holds no per-call state; one instance can serve
/// any number of decode calls, concurrently. The only state shared
/// between calls is the process-wide field-map cache
/// ([`field_map`](crate::field_map)).
///
/// # Example
///
/// ```
/// use serde::Deserialize;
/// use strict_json::{Decoder, Error, StrictDecode};
///
/// #[derive(Debug, Default, Deserialize, StrictDecode)]
/// struct Task {
///     priority: i32,
/// }
///
/// let decoder = Decoder::new().suggest_closest(true);
/// let err = decoder.from_str::<Task>(r#"{"Priority": 3}"#).unwrap_err();
/// assert_eq!(
///     err.to_string(),
///     "unknown field \"Priority\" (did you mean \"priority\"?)"
/// );
/// # Ok::<(), Error>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Decoder {
    pub(crate) deny_unknown_fields: bool,
    pub(crate) suggest_closest: bool,
}

impl Decoder {
    /// A decoder with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Decoder {
            deny_unknown_fields: true,
            suggest_closest: false,
        }
    }

    /// Set whether unknown object keys fail the decode. When disabled,
    /// unknown keys are skipped and known keys still populate.
    #[must_use]
    pub fn deny_unknown_fields(mut self, deny: bool) -> Self {
        self.deny_unknown_fields = deny;
        self
    }

    /// Set whether unknown-field errors carry a closest-match
    /// suggestion.
    #[must_use]
    pub fn suggest_closest(mut self, suggest: bool) -> Self {
        self.suggest_closest = suggest;
        self
    }

    /// Decode a byte buffer into a fresh value.
    ///
    /// # Errors
    ///
    /// Malformed JSON is propagated verbatim as [`Error::Json`] before
    /// any strict work; key validation fails with
    /// [`Error::UnknownField`] or [`Error::FieldConflict`].
    pub fn from_slice<T: StrictDecode>(&self, data: &[u8]) -> Result<T, Error> {
        let raw: Value = serde_json::from_slice(data)?;
        T::decode_value(&raw, self)
    }

    /// Decode a string into a fresh value.
    ///
    /// # Errors
    ///
    /// Same conditions as [`from_slice`](Self::from_slice).
    pub fn from_str<T: StrictDecode>(&self, data: &str) -> Result<T, Error> {
        let raw: Value = serde_json::from_str(data)?;
        T::decode_value(&raw, self)
    }

    /// Decode an already-parsed value tree into a fresh value.
    ///
    /// # Errors
    ///
    /// Same conditions as [`from_slice`](Self::from_slice), minus the
    /// parse stage.
    pub fn from_value<T: StrictDecode>(&self, raw: &Value) -> Result<T, Error> {
        T::decode_value(raw, self)
    }

    /// Decode a byte buffer into an existing value, in place.
    ///
    /// Record fields update individually: a field absent from the input
    /// keeps its value, a literal `null` (at any depth, the top level
    /// included) leaves the corresponding slot untouched, nested records
    /// are entered rather than replaced, and maps merge new entries over
    /// old ones. On failure, fields that decoded before the failing key
    /// keep their new values — prior successful writes are not rolled
    /// back.
    ///
    /// # Errors
    ///
    /// Same conditions as [`from_slice`](Self::from_slice).
    pub fn decode_into<T: StrictDecode>(&self, data: &[u8], target: &mut T) -> Result<(), Error> {
        let raw: Value = serde_json::from_slice(data)?;
        target.decode_into(&raw, self)
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Decoder::new()
    }
}
