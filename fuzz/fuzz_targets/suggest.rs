#![no_main]

use libfuzzer_sys::fuzz_target;
use strict_json::closest_match;

// Fuzz target: closest-match suggestion over arbitrary strings.
//
// Catches bugs in:
// - Byte-level distance DP on non-ASCII and empty strings
// - Case folding of multi-byte characters
fuzz_target!(|input: (String, Vec<String>)| {
    let (unknown, known) = input;
    let known: Vec<&str> = known.iter().map(String::as_str).collect();

    if let Some(suggestion) = closest_match(&unknown, &known) {
        // A suggestion must come from the candidate list.
        assert!(known.contains(&suggestion));
    }
});
