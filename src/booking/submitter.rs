//! Validation and submission of a booking.

use super::client::BookingEndpoint;
use super::error::{BookingError, ValidationError};
use super::model::{BookingFields, BookingRequest, BookingResult};
use super::validate::validate;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Shown when the server accepts a booking without saying anything
pub const SUCCESS_FALLBACK_MESSAGE: &str = "Your appointment is booked.";

/// Validates booking forms and sends them to the booking endpoint.
///
/// Cloning is cheap; clones share the endpoint.
#[derive(Clone)]
pub struct BookingSubmitter {
    endpoint: Arc<dyn BookingEndpoint>,
}

impl BookingSubmitter {
    pub fn new(endpoint: Arc<dyn BookingEndpoint>) -> Self {
        Self { endpoint }
    }

    /// Local checks only. No network traffic happens here.
    pub fn prepare(&self, fields: &BookingFields) -> Result<BookingRequest, ValidationError> {
        validate(fields).map_err(|err| {
            warn!(error = %err, "booking form failed validation");
            err
        })
    }

    /// Send one request and map the reply to what the user is told.
    ///
    /// Exactly one call is made; failures are not retried.
    pub async fn send(&self, request: BookingRequest) -> BookingResult {
        match self.try_send(&request).await {
            Ok(message) => {
                info!(master_id = %request.master_id, service = %request.service, "booking accepted");
                BookingResult::success(message)
            }
            Err(err) => {
                match &err {
                    BookingError::Transport(cause) => error!(error = %cause, "booking request failed"),
                    other => warn!(error = %other, "booking not accepted"),
                }
                BookingResult::from(err)
            }
        }
    }

    async fn try_send(&self, request: &BookingRequest) -> Result<String, BookingError> {
        let reply = self.endpoint.book(request).await?;
        if reply.is_success() {
            Ok(reply
                .message
                .filter(|message| !message.trim().is_empty())
                .unwrap_or_else(|| SUCCESS_FALLBACK_MESSAGE.to_string()))
        } else {
            Err(BookingError::Rejected {
                message: reply.message,
            })
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::booking::client::BookingEndpoint;
    use crate::booking::error::TransportError;
    use crate::booking::model::{BookingRequest, BookingResponse};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Endpoint double that records requests and answers with a canned reply
    pub struct MockEndpoint {
        reply: Option<BookingResponse>,
        pub requests: Mutex<Vec<BookingRequest>>,
    }

    impl MockEndpoint {
        pub fn replying(status: &str, message: Option<&str>) -> Self {
            Self {
                reply: Some(BookingResponse {
                    status: status.to_string(),
                    message: message.map(str::to_string),
                    booking_id: None,
                }),
                requests: Mutex::new(Vec::new()),
            }
        }

        /// Every call fails as if the connection dropped
        pub fn failing() -> Self {
            Self {
                reply: None,
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl BookingEndpoint for MockEndpoint {
        async fn book(&self, request: &BookingRequest) -> Result<BookingResponse, TransportError> {
            self.requests.lock().unwrap().push(request.clone());
            match &self.reply {
                Some(reply) => Ok(reply.clone()),
                None => Err(serde_json::from_str::<BookingResponse>("<html>Bad Gateway</html>")
                    .unwrap_err()
                    .into()),
            }
        }
    }
}
