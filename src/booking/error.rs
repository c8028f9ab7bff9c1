//! Error taxonomy of the booking flow.
//!
//! Every variant maps to a message the user sees; none of them is fatal.

use super::model::{BookingField, BookingResult};

/// Message shown when the server gives no reason or never answers
pub const FALLBACK_MESSAGE: &str = "Something went wrong. Please try again.";

/// Local check failures. These never reach the network.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please fill all required fields")]
    MissingFields(Vec<BookingField>),

    #[error("Please enter a valid phone number in format +49 30 12345678")]
    InvalidPhone,

    #[error("Please enter the date as YYYY-MM-DD")]
    InvalidDate,

    #[error("Please enter the time as HH:MM")]
    InvalidTime,
}

impl ValidationError {
    /// Fields the user has to correct
    pub fn fields(&self) -> Vec<BookingField> {
        match self {
            ValidationError::MissingFields(missing) => missing.clone(),
            ValidationError::InvalidPhone => vec![BookingField::Phone],
            ValidationError::InvalidDate => vec![BookingField::Date],
            ValidationError::InvalidTime => vec![BookingField::Time],
        }
    }
}

/// The request did not produce a usable reply.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("response is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("booking rejected: {}", message.as_deref().unwrap_or("no reason given"))]
    Rejected { message: Option<String> },

    #[error("booking request failed: {0}")]
    Transport(#[from] TransportError),
}

impl BookingError {
    /// Text presented to the user for this failure
    pub fn user_message(&self) -> String {
        match self {
            BookingError::Validation(err) => err.to_string(),
            BookingError::Rejected { message } => match message.as_deref().map(str::trim) {
                Some(message) if !message.is_empty() => message.to_string(),
                _ => FALLBACK_MESSAGE.to_string(),
            },
            BookingError::Transport(_) => FALLBACK_MESSAGE.to_string(),
        }
    }
}

impl From<BookingError> for BookingResult {
    fn from(err: BookingError) -> Self {
        BookingResult::failure(err.user_message())
    }
}
