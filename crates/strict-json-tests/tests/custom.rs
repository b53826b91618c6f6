//! Opting a type out of the strict walk with `opaque!`.
//!
//! A type with hand-written `Deserialize` logic gets the raw value
//! passed through untouched; the walker treats it as a leaf and resumes
//! strict validation around it.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::de::Deserializer;
use strict_json::{Error, StrictDecode};

/// Free-form key/value properties; accepts any object keys by design.
#[derive(Debug, Default, PartialEq)]
struct Properties {
    entries: BTreeMap<String, serde_json::Value>,
}

impl<'de> Deserialize<'de> for Properties {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = BTreeMap::deserialize(deserializer)?;
        Ok(Properties { entries })
    }
}

strict_json::opaque!(Properties);

#[derive(Debug, Default, PartialEq, Deserialize, StrictDecode)]
struct Resource {
    name: String,
    properties: Properties,
}

#[test]
fn opaque_value_accepts_arbitrary_keys() {
    let r: Resource = strict_json::from_str(
        r#"{"name": "vm-1", "properties": {"CPU": 4, "diskGb": 100, "Region": "us-east"}}"#,
    )
    .unwrap();

    assert_eq!(r.name, "vm-1");
    assert_eq!(r.properties.entries.len(), 3);
    assert_eq!(r.properties.entries["CPU"], serde_json::json!(4));
}

#[test]
fn strictness_resumes_around_the_opaque_leaf() {
    // The parent record is still validated even though its child is
    // not.
    let err = strict_json::from_str::<Resource>(
        r#"{"Name": "vm-1", "properties": {}}"#,
    )
    .unwrap_err();
    assert!(matches!(err, Error::UnknownField { ref key, .. } if key == "Name"));
}

#[test]
fn null_opaque_value_falls_back_to_default() {
    let r: Resource =
        strict_json::from_str(r#"{"name": "vm-1", "properties": null}"#).unwrap();
    assert_eq!(r.properties, Properties::default());
}

#[test]
fn opaque_types_report_no_strict_fields() {
    assert!(!<Properties as StrictDecode>::HAS_STRICT_FIELDS);
    assert!(<Resource as StrictDecode>::HAS_STRICT_FIELDS);
}

#[test]
fn collections_of_opaque_values_take_the_fast_path() {
    #[derive(Debug, Default, PartialEq, Deserialize, StrictDecode)]
    struct Fleet {
        resources: Vec<Resource>,
        tags: Vec<Properties>,
    }

    let f: Fleet = strict_json::from_str(
        r#"{"resources": [{"name": "a", "properties": {"x": 1}}],
            "tags": [{"Anything": "goes"}, {}]}"#,
    )
    .unwrap();

    assert_eq!(f.resources.len(), 1);
    assert_eq!(f.tags.len(), 2);
    assert_eq!(f.tags[0].entries["Anything"], serde_json::json!("goes"));
}
