//! Booking domain: request model, shop catalog, validation and submission.

mod catalog;
mod client;
mod error;
mod model;
mod phone;
mod submitter;
mod validate;

pub use catalog::Catalog;
pub use client::HttpBookingClient;
pub use error::BookingError;
pub use model::{
    BookingField, BookingFields, BookingRecord, BookingRequest, BookingResult, RecordStatus,
};
pub use phone::{format_phone_number, is_phone_input_char};
pub use submitter::BookingSubmitter;

#[cfg(test)]
pub(crate) use error::FALLBACK_MESSAGE;
#[cfg(test)]
pub(crate) use submitter::testing;
