#![warn(clippy::pedantic)]

//! Shared fixture types for the strict-json integration tests and
//! benchmarks.
//!
//! One realistic domain model, an employee record, exercising every
//! shape the strict walker has to handle: nested records, records
//! inside arrays, records as map values, and renamed (camelCase)
//! external names.

use std::collections::HashMap;

use serde::Deserialize;
use strict_json::StrictDecode;

#[derive(Debug, Default, PartialEq, Deserialize, StrictDecode)]
pub struct Address {
    pub street: String,
    pub city: String,
    #[serde(rename = "zipCode")]
    pub zip_code: String,
    pub country: String,
}

#[derive(Debug, Default, PartialEq, Deserialize, StrictDecode)]
pub struct ContactInfo {
    pub email: String,
    pub phone: String,
    pub address: Address,
}

#[derive(Debug, Default, PartialEq, Deserialize, StrictDecode)]
pub struct Department {
    pub name: String,
    pub code: String,
    #[serde(rename = "isActive")]
    pub is_active: bool,
}

#[derive(Debug, Default, PartialEq, Deserialize, StrictDecode)]
pub struct Skill {
    pub name: String,
    pub level: i32,
    #[serde(rename = "isCertified")]
    pub is_certified: bool,
}

#[derive(Debug, Default, PartialEq, Deserialize, StrictDecode)]
pub struct Employee {
    pub id: i64,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub contact: ContactInfo,
    pub departments: Vec<Department>,
    pub metadata: HashMap<String, Skill>,
}

/// A fully populated, correctly cased employee document.
#[must_use]
pub fn valid_employee_json() -> &'static str {
    r#"{
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
    }"#
}
