//! Booking data types shared by the form, the submitter and the HTTP client.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The fields of a booking, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BookingField {
    Name,
    Phone,
    Master,
    Service,
    Date,
    Time,
    Comment,
}

impl BookingField {
    /// Fields that must be non-blank before a booking may be sent
    pub const REQUIRED: [BookingField; 6] = [
        BookingField::Name,
        BookingField::Phone,
        BookingField::Master,
        BookingField::Service,
        BookingField::Date,
        BookingField::Time,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            BookingField::Name => "Name",
            BookingField::Phone => "Phone",
            BookingField::Master => "Master",
            BookingField::Service => "Service",
            BookingField::Date => "Date",
            BookingField::Time => "Time",
            BookingField::Comment => "Comment",
        }
    }

    pub fn is_required(&self) -> bool {
        !matches!(self, BookingField::Comment)
    }
}

impl fmt::Display for BookingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raw, unvalidated snapshot of the booking form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingFields {
    pub name: String,
    pub phone: String,
    pub master_id: String,
    pub service: String,
    pub date: String,
    pub time: String,
    pub comment: String,
}

impl BookingFields {
    pub fn get(&self, field: BookingField) -> &str {
        match field {
            BookingField::Name => &self.name,
            BookingField::Phone => &self.phone,
            BookingField::Master => &self.master_id,
            BookingField::Service => &self.service,
            BookingField::Date => &self.date,
            BookingField::Time => &self.time,
            BookingField::Comment => &self.comment,
        }
    }

    /// Required fields that are empty once whitespace is trimmed
    pub fn missing_required(&self) -> Vec<BookingField> {
        BookingField::REQUIRED
            .into_iter()
            .filter(|field| self.get(*field).trim().is_empty())
            .collect()
    }
}

/// Payload of `POST /book`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub name: String,
    pub phone: String,
    pub master_id: String,
    pub service: String,
    pub date: String,
    pub time: String,
    pub comment: String,
}

impl From<BookingFields> for BookingRequest {
    fn from(fields: BookingFields) -> Self {
        Self {
            name: fields.name,
            phone: fields.phone,
            master_id: fields.master_id,
            service: fields.service,
            date: fields.date,
            time: fields.time,
            comment: fields.comment,
        }
    }
}

/// Reply body of the booking API.
///
/// The server answers `{status, message}` on both success and failure,
/// plus `booking_id` when a booking was created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub booking_id: Option<i64>,
}

impl BookingResponse {
    pub const SUCCESS: &'static str = "success";

    pub fn is_success(&self) -> bool {
        self.status == Self::SUCCESS
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStatus {
    Success,
    Failure,
}

/// Outcome of one submission attempt, as presented to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingResult {
    pub status: BookingStatus,
    pub message: String,
}

impl BookingResult {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: BookingStatus::Success,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: BookingStatus::Failure,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == BookingStatus::Success
    }
}

/// Lifecycle of a stored booking on the shop side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RecordStatus::Pending => "pending",
            RecordStatus::Confirmed => "confirmed",
            RecordStatus::Completed => "completed",
            RecordStatus::Cancelled => "cancelled",
        };
        f.write_str(label)
    }
}

/// A booking as listed by `GET /api/clients`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRecord {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub master_id: i64,
    pub service: String,
    pub date: String,
    pub time: String,
    #[serde(default)]
    pub comment: Option<String>,
    pub created_at: NaiveDateTime,
    pub status: RecordStatus,
}

/// Body of `PUT /api/clients/{id}/status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusUpdate {
    pub status: RecordStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> BookingFields {
        BookingFields {
            name: "Max Müller".to_string(),
            phone: "+49 30 12345678".to_string(),
            master_id: "3".to_string(),
            service: "haircut".to_string(),
            date: "2024-05-01".to_string(),
            time: "14:00".to_string(),
            comment: String::new(),
        }
    }

    #[test]
    fn test_missing_required_ignores_comment() {
        assert!(filled().missing_required().is_empty());
    }

    #[test]
    fn test_missing_required_treats_whitespace_as_blank() {
        let mut fields = filled();
        fields.name = "   ".to_string();
        fields.time = "\t".to_string();

        assert_eq!(
            fields.missing_required(),
            vec![BookingField::Name, BookingField::Time]
        );
    }

    #[test]
    fn test_request_serializes_with_snake_case_keys() {
        let request = BookingRequest::from(filled());
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "name": "Max Müller",
                "phone": "+49 30 12345678",
                "master_id": "3",
                "service": "haircut",
                "date": "2024-05-01",
                "time": "14:00",
                "comment": ""
            })
        );
    }

    #[test]
    fn test_response_without_message() {
        let response: BookingResponse = serde_json::from_str(r#"{"status":"error"}"#).unwrap();
        assert!(!response.is_success());
        assert_eq!(response.message, None);
        assert_eq!(response.booking_id, None);
    }

    #[test]
    fn test_record_parses_server_timestamp() {
        let record: BookingRecord = serde_json::from_value(serde_json::json!({
            "id": 7,
            "name": "Max",
            "phone": "+49 30 12345678",
            "master_id": 2,
            "service": "beard-trim",
            "date": "2024-05-01",
            "time": "10:30",
            "comment": null,
            "created_at": "2024-04-20T09:15:42.123456",
            "status": "confirmed"
        }))
        .unwrap();

        assert_eq!(record.status, RecordStatus::Confirmed);
        assert_eq!(record.comment, None);
        assert_eq!(record.created_at.to_string(), "2024-04-20 09:15:42.123456");
    }
}
