//! Client-side form validation.
//!
//! Validators are pure functions from field values to `Result<(), String>`.
//! Form structs layer touched-field tracking on top: while the user is
//! editing, only fields they have already visited report errors; on submit
//! every field is touched and validated, and any error blocks the network
//! call entirely.

pub mod account;
pub mod search;
pub mod trip;

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeMap;

/// Minimum length for origin/destination fields.
pub const MIN_LOCATION_LEN: usize = 3;
/// Minimum lead time between now and a new trip's departure.
pub const MIN_LEAD_TIME_MINUTES: i64 = 30;
pub const MIN_PASSENGERS: u32 = 1;
pub const MAX_PASSENGERS: u32 = 8;
/// Sanity ceiling for the per-person fare, in rupees.
pub const MAX_PRICE: f64 = 10_000.0;
/// Sentinel substituted for an absent or zero search price ceiling.
pub const PRICE_NO_LIMIT: f64 = 999_999.0;
pub const MIN_PASSWORD_LEN: usize = 6;
pub const MAX_NAME_LEN: usize = 100;
pub const MAX_DESCRIPTION_LEN: usize = 500;

lazy_static! {
    static ref EMAIL_REGEX: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

/// Field-scoped validation errors, at most one per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<&'static str, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.insert(field, message.into());
    }

    pub fn remove(&mut self, field: &'static str) {
        self.errors.remove(field);
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.errors.iter().map(|(field, message)| (*field, message.as_str()))
    }

    /// Ok when clean, Err carrying the errors otherwise — the submit gate.
    pub fn finish(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, message) in self.errors.iter() {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

/// Validate an origin or destination value.
pub fn validate_location(label: &str, value: &str) -> Result<(), String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(format!("{} is required", label));
    }
    if trimmed.chars().count() < MIN_LOCATION_LEN {
        return Err(format!(
            "Location must be at least {} characters",
            MIN_LOCATION_LEN
        ));
    }
    Ok(())
}

/// A trip cannot start and end in the same place, compared
/// case-insensitively after trimming.
pub fn validate_distinct_route(from: &str, to: &str) -> Result<(), String> {
    let from = from.trim();
    let to = to.trim();
    if !from.is_empty() && !to.is_empty() && from.to_lowercase() == to.to_lowercase() {
        return Err("Destination must be different from departure location".to_string());
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), String> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Err("Email is required".to_string());
    }
    if !EMAIL_REGEX.is_match(trimmed) {
        return Err("Invalid email address".to_string());
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        ));
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Name is required".to_string());
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(format!("Name is too long (max {} characters)", MAX_NAME_LEN));
    }
    Ok(())
}

pub fn validate_phone(phone: &str) -> Result<(), String> {
    let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return Err("Phone number is required".to_string());
    }
    if !(10..=15).contains(&digits) {
        return Err("Phone number must have 10 to 15 digits".to_string());
    }
    Ok(())
}
