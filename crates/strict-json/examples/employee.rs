//! A tour of the decoder over a nested employee record: a clean decode,
//! the failure modes, and both configuration switches.
//!
//! Run with `cargo run --example employee`.

use std::collections::HashMap;

use serde::Deserialize;
use strict_json::{Decoder, StrictDecode};

#[derive(Debug, Default, Deserialize, StrictDecode)]
struct Address {
    street: String,
    city: String,
    #[serde(rename = "zipCode")]
    zip_code: String,
    country: String,
}

#[derive(Debug, Default, Deserialize, StrictDecode)]
struct ContactInfo {
    email: String,
    phone: String,
    address: Address,
}

#[derive(Debug, Default, Deserialize, StrictDecode)]
struct Department {
    name: String,
    code: String,
    #[serde(rename = "isActive")]
    is_active: bool,
}

#[derive(Debug, Default, Deserialize, StrictDecode)]
struct Skill {
    name: String,
    level: i32,
    #[serde(rename = "isCertified")]
    is_certified: bool,
}

#[derive(Debug, Default, Deserialize, StrictDecode)]
struct Employee {
    id: i64,
    #[serde(rename = "firstName")]
    first_name: String,
    #[serde(rename = "lastName")]
    last_name: String,
    contact: ContactInfo,
    departments: Vec<Department>,
    metadata: HashMap<String, Skill>,
}

fn main() {
    // A valid document with every key correctly cased.
    let valid = r#"{
        "id": 1,
        "firstName": "John",
        "lastName": "Doe",
        "contact": {
            "email": "john.doe@example.com",
            "phone": "+1-555-0123",
            "address": {
                "street": "123 Main St",
                "city": "New York",
                "zipCode": "10001",
                "country": "USA"
            }
        },
        "departments": [
            {"name": "Engineering", "code": "ENG", "isActive": true},
            {"name": "Research", "code": "RND", "isActive": true}
        ],
        "metadata": {
            "primary": {"name": "Rust", "level": 5, "isCertified": true},
            "secondary": {"name": "Python", "level": 4, "isCertified": false}
        }
    }"#;

    println!("Valid document, correct case");
    println!("----------------------------");
    match strict_json::from_str::<Employee>(valid) {
        Ok(emp) => {
            println!("parsed {} {}", emp.first_name, emp.last_name);
            println!("  contact: {}, {}", emp.contact.email, emp.contact.address.city);
            println!("  departments: {}", emp.departments.len());
            println!("  skills: {}", emp.metadata.len());
        }
        Err(err) => println!("error: {err}"),
    }
    println!();

    // A mis-cased key three levels deep.
    let mis_cased = r#"{
        "id": 2,
        "firstName": "Jane",
        "lastName": "Smith",
        "contact": {
            "email": "jane.smith@example.com",
            "phone": "+1-555-0456",
            "address": {
                "street": "456 Oak Ave",
                "CITY": "Boston",
                "zipCode": "02101",
                "country": "USA"
            }
        },
        "departments": [],
        "metadata": {}
    }"#;

    println!("Mis-cased nested key (\"CITY\" vs \"city\")");
    println!("----------------------------------------");
    match strict_json::from_str::<Employee>(mis_cased) {
        Ok(_) => println!("unexpectedly succeeded"),
        Err(err) => println!("rejected: {err}"),
    }
    println!();

    // The same document through a decoder that suggests corrections.
    println!("Same document, suggestions enabled");
    println!("----------------------------------");
    let suggesting = Decoder::new().suggest_closest(true);
    match suggesting.from_str::<Employee>(mis_cased) {
        Ok(_) => println!("unexpectedly succeeded"),
        Err(err) => println!("rejected: {err}"),
    }
    println!();

    // And through a relaxed decoder that ignores unknown keys.
    println!("Same document, unknown keys allowed");
    println!("-----------------------------------");
    let relaxed = Decoder::new().deny_unknown_fields(false);
    match relaxed.from_str::<Employee>(mis_cased) {
        Ok(emp) => println!(
            "parsed {} {} (city left empty: {:?})",
            emp.first_name, emp.last_name, emp.contact.address.city
        ),
        Err(err) => println!("error: {err}"),
    }
}
