use super::error::ValidationError;
use super::model::{BookingFields, BookingRequest};
use chrono::{NaiveDate, NaiveTime};
use regex::Regex;
use std::sync::OnceLock;

/// `+49`, a 2-3 digit area code and a 6-8 digit subscriber number,
/// each group optionally separated by a single whitespace.
const PHONE_PATTERN: &str = r"^\+49\s?\d{2,3}\s?\d{6,8}$";

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

fn phone_regex() -> &'static Regex {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    PHONE.get_or_init(|| Regex::new(PHONE_PATTERN).expect("phone pattern is a valid regex"))
}

pub fn is_valid_phone(phone: &str) -> bool {
    phone_regex().is_match(phone)
}

/// Run the local checks in order and build the request.
///
/// Stops at the first failing check: blank required fields, the phone
/// format, then the appointment date and time.
pub fn validate(fields: &BookingFields) -> Result<BookingRequest, ValidationError> {
    let missing = fields.missing_required();
    if !missing.is_empty() {
        return Err(ValidationError::MissingFields(missing));
    }

    if !is_valid_phone(&fields.phone) {
        return Err(ValidationError::InvalidPhone);
    }

    if NaiveDate::parse_from_str(fields.date.trim(), DATE_FORMAT).is_err() {
        return Err(ValidationError::InvalidDate);
    }

    if NaiveTime::parse_from_str(fields.time.trim(), TIME_FORMAT).is_err() {
        return Err(ValidationError::InvalidTime);
    }

    Ok(BookingRequest::from(fields.clone()))
}
