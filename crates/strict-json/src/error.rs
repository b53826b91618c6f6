/// Errors produced while strictly decoding a JSON value.
///
/// The kinds are mutually exclusive per failing call, and all of them
/// abort the decode — there is no partial-success mode. Fields written
/// before the failing key are left in place (see
/// [`Decoder::decode_into`](crate::Decoder::decode_into)).
///
/// Error hierarchy:
///
/// ```text
///   Error
///   ├── Json(serde_json::Error)  ← malformed input, or a value that the
///   │                              fast path cannot convert; propagated
///   │                              verbatim from serde_json
///   ├── UnknownField             ← object key matched no field name
///   └── FieldConflict            ← two flattened records at the same
///                                  depth claim the same external name
/// ```
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The raw bytes could not be parsed, or a validated value failed
    /// ordinary serde conversion (wrong shape, out-of-range number, and
    /// so on).
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// An object key did not exactly match any field's external name.
    ///
    /// `suggestion` is populated only when the decoder was built with
    /// [`suggest_closest`](crate::Decoder::suggest_closest) and a known
    /// name was close enough (case-insensitive match, or edit distance
    /// of at most 2).
    #[error("{}", render_unknown_field(.key, .suggestion.as_deref()))]
    UnknownField {
        key: String,
        suggestion: Option<String>,
    },

    /// The target type's field map is ambiguous: two records flattened
    /// at the same embedding depth both resolve a field to `name`.
    ///
    /// Any decode attempt on such a type fails, even when the input does
    /// not contain the colliding key.
    #[error("field conflict: \"{name}\" defined in multiple embedded structs")]
    FieldConflict { name: &'static str },
}

fn render_unknown_field(key: &str, suggestion: Option<&str>) -> String {
    match suggestion {
        Some(suggestion) => format!("unknown field \"{key}\" (did you mean \"{suggestion}\"?)"),
        None => format!("unknown or mis-cased field \"{key}\""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_field_without_suggestion() {
        let err = Error::UnknownField {
            key: "NAME".to_string(),
            suggestion: None,
        };
        assert_eq!(err.to_string(), "unknown or mis-cased field \"NAME\"");
    }

    #[test]
    fn unknown_field_with_suggestion() {
        let err = Error::UnknownField {
            key: "Name".to_string(),
            suggestion: Some("name".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "unknown field \"Name\" (did you mean \"name\"?)"
        );
    }

    #[test]
    fn field_conflict_names_the_key() {
        let err = Error::FieldConflict { name: "id" };
        assert_eq!(
            err.to_string(),
            "field conflict: \"id\" defined in multiple embedded structs"
        );
    }

    #[test]
    fn json_errors_pass_through_verbatim() {
        let inner = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let expected = inner.to_string();
        let err = Error::from(inner);
        assert_eq!(err.to_string(), expected);
    }
}
