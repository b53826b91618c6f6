#![no_main]

use std::collections::HashMap;

use libfuzzer_sys::fuzz_target;
use serde::Deserialize;
use strict_json::StrictDecode;

// Fuzz target: strict decoding of arbitrary bytes into a nested record.
//
// Catches bugs in:
// - Panics in the strict walker on unexpected value shapes
// - Recursion through records, arrays, and maps
// - Unknown-field detection on hostile key names (non-ASCII, empty,
//   very long)
#[derive(Debug, Default, Deserialize, StrictDecode)]
struct Inner {
    label: String,
    count: i64,
}

#[derive(Debug, Default, Deserialize, StrictDecode)]
struct Outer {
    id: u32,
    #[serde(rename = "innerValue")]
    inner: Inner,
    items: Vec<Inner>,
    lookup: HashMap<String, Inner>,
    #[serde(flatten)]
    extra: Option<Inner>,
}

fuzz_target!(|data: &[u8]| {
    // Must never panic; any outcome (value or error) is acceptable.
    let _ = strict_json::from_slice::<Outer>(data);
});
