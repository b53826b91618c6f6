//! Decoder configuration: the two switches, their defaults, and the
//! exact diagnostics each combination produces.
//!
//! Error messages are part of the public contract (callers surface them
//! to users verbatim), so they are pinned with insta inline snapshots.

use insta::assert_snapshot;
use strict_json::{Decoder, Error};
use strict_json_tests::{Employee, valid_employee_json};

// ── deny_unknown_fields ───────────────────────────────────────────────────────

#[test]
fn strict_is_the_default() {
    let err = Decoder::new()
        .from_str::<Employee>(r#"{"id": 1, "nickname": "JD"}"#)
        .unwrap_err();
    assert!(matches!(err, Error::UnknownField { .. }));
}

#[test]
fn relaxed_decoder_accepts_unknown_and_mis_cased_keys() {
    let relaxed = Decoder::new().deny_unknown_fields(false);
    let emp: Employee = relaxed
        .from_str(r#"{"id": 1, "firstName": "John", "FIRSTNAME": "ignored", "extra": 42}"#)
        .unwrap();
    assert_eq!(emp.id, 1);
    assert_eq!(emp.first_name, "John");
}

#[test]
fn relaxed_decoder_skips_unknowns_at_depth_too() {
    let relaxed = Decoder::new().deny_unknown_fields(false);
    let emp: Employee = relaxed
        .from_str(
            r#"{"id": 1,
                "contact": {"email": "e", "fax": "+1-555-0000",
                    "address": {"city": "NYC", "PLANET": "Earth"}}}"#,
        )
        .unwrap();
    assert_eq!(emp.contact.email, "e");
    assert_eq!(emp.contact.address.city, "NYC");
}

#[test]
fn relaxed_decoder_still_rejects_malformed_json() {
    let err = Decoder::new()
        .deny_unknown_fields(false)
        .from_str::<Employee>(r#"{"id":"#)
        .unwrap_err();
    assert!(matches!(err, Error::Json(_)));
}

// ── suggest_closest ───────────────────────────────────────────────────────────

#[test]
fn suggestions_are_off_by_default() {
    let err = Decoder::new()
        .from_str::<Employee>(r#"{"FirstName": "John"}"#)
        .unwrap_err();

    let Error::UnknownField { suggestion, .. } = &err else {
        panic!("expected UnknownField, got {err:?}");
    };
    assert_eq!(suggestion.as_deref(), None);
    assert_snapshot!(err.to_string(), @r#"unknown or mis-cased field "FirstName""#);
}

#[test]
fn mis_cased_key_gets_the_exact_field_suggested() {
    let err = Decoder::new()
        .suggest_closest(true)
        .from_str::<Employee>(r#"{"FirstName": "John"}"#)
        .unwrap_err();
    assert_snapshot!(
        err.to_string(),
        @r#"unknown field "FirstName" (did you mean "firstName"?)"#
    );
}

#[test]
fn small_typo_gets_a_suggestion() {
    let err = Decoder::new()
        .suggest_closest(true)
        .from_str::<Employee>(r#"{"iid": 1}"#)
        .unwrap_err();
    assert_snapshot!(err.to_string(), @r#"unknown field "iid" (did you mean "id"?)"#);
}

#[test]
fn distant_key_stays_suggestionless_even_when_enabled() {
    let err = Decoder::new()
        .suggest_closest(true)
        .from_str::<Employee>(r#"{"favoriteColor": "blue"}"#)
        .unwrap_err();
    assert_snapshot!(err.to_string(), @r#"unknown or mis-cased field "favoriteColor""#);
}

#[test]
fn suggestions_reach_nested_records() {
    let err = Decoder::new()
        .suggest_closest(true)
        .from_str::<Employee>(
            r#"{"id": 1, "contact": {"address": {"zipcode": "10001"}}}"#,
        )
        .unwrap_err();
    assert_snapshot!(
        err.to_string(),
        @r#"unknown field "zipcode" (did you mean "zipCode"?)"#
    );
}

// ── Switch independence ───────────────────────────────────────────────────────

#[test]
fn suggest_without_deny_never_fires() {
    // With unknown keys allowed there is no error to attach a
    // suggestion to.
    let emp: Employee = Decoder::new()
        .deny_unknown_fields(false)
        .suggest_closest(true)
        .from_str(r#"{"id": 1, "FirstName": "ignored"}"#)
        .unwrap();
    assert_eq!(emp.id, 1);
    assert_eq!(emp.first_name, "");
}

#[test]
fn decoder_is_reusable_across_calls() {
    let decoder = Decoder::new().suggest_closest(true);

    let ok: Employee = decoder.from_str(valid_employee_json()).unwrap();
    assert_eq!(ok.first_name, "John");

    let err = decoder
        .from_str::<Employee>(r#"{"lastname": "Doe"}"#)
        .unwrap_err();
    assert_snapshot!(
        err.to_string(),
        @r#"unknown field "lastname" (did you mean "lastName"?)"#
    );

    // The earlier failure left no state behind.
    let ok_again: Employee = decoder.from_str(valid_employee_json()).unwrap();
    assert_eq!(ok_again, ok);
}
