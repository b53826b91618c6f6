#![no_main]

use libfuzzer_sys::fuzz_target;
use serde::Deserialize;
use strict_json::{Decoder, StrictDecode};

// Fuzz target: every switch combination over the same input, plus
// in-place decoding into a dirty target.
//
// Catches bugs in:
// - Divergent panics between strict and relaxed walks
// - decode_into leaving the target in a torn state that later decodes
//   trip over
#[derive(Debug, Default, Deserialize, StrictDecode)]
struct Record {
    name: String,
    value: f64,
    children: Vec<Record>,
}

fuzz_target!(|data: &[u8]| {
    let strict = Decoder::new();
    let relaxed = Decoder::new().deny_unknown_fields(false);
    let suggesting = Decoder::new().suggest_closest(true);

    let _ = strict.from_slice::<Record>(data);
    let _ = relaxed.from_slice::<Record>(data);

    // Errors must render without panicking.
    if let Err(err) = suggesting.from_slice::<Record>(data) {
        let _ = err.to_string();
    }

    let mut target = Record {
        name: "seed".to_string(),
        value: 1.0,
        children: vec![Record::default()],
    };
    let _ = strict.decode_into(data, &mut target);
    // The target must stay decodable regardless of the outcome.
    let _ = relaxed.decode_into(data, &mut target);
});
