//! One-shot booking without the interactive interface

use anyhow::{anyhow, Result};
use clap::Args;
use std::sync::Arc;
use tracing::{debug, info};

use crate::booking::{
    BookingError, BookingFields, BookingResult, BookingSubmitter, Catalog, HttpBookingClient,
};
use crate::config::Config;

/// Send one booking and print the shop's answer
#[derive(Debug, Args)]
pub struct BookCommand {
    /// Your name
    #[arg(long)]
    pub name: String,

    /// Phone number, e.g. "+49 30 12345678"
    #[arg(long)]
    pub phone: String,

    /// Master id (see `barbertime masters`)
    #[arg(short, long)]
    pub master: String,

    /// Service id (see `barbertime services`)
    #[arg(short, long)]
    pub service: String,

    /// Appointment date (YYYY-MM-DD)
    #[arg(long)]
    pub date: String,

    /// Appointment time (HH:MM)
    #[arg(long)]
    pub time: String,

    /// Optional wishes for the master
    #[arg(long, default_value = "")]
    pub comment: String,
}

impl BookCommand {
    pub async fn execute(&self, config: &Config) -> Result<()> {
        let client = HttpBookingClient::from_config(config)?;
        let submitter = BookingSubmitter::new(Arc::new(client));

        let result = self.submit(&Catalog::default(), &submitter).await?;
        if result.is_success() {
            println!("✓ {}", result.message);
            Ok(())
        } else {
            Err(anyhow!(result.message))
        }
    }

    /// Run the local checks, then make sure the master exists, then send
    async fn submit(&self, catalog: &Catalog, submitter: &BookingSubmitter) -> Result<BookingResult> {
        let request = match submitter.prepare(&self.fields()) {
            Ok(request) => request,
            Err(err) => return Ok(BookingError::from(err).into()),
        };

        let master = catalog.master(&request.master_id).ok_or_else(|| {
            anyhow!(
                "Unknown master {:?}. Run `barbertime masters` to see the available ids",
                self.master
            )
        })?;
        debug!(master = %master.name, service = %request.service, "Submitting booking");

        let result = submitter.send(request).await;
        info!(success = result.is_success(), "Booking finished");
        Ok(result)
    }

    fn fields(&self) -> BookingFields {
        BookingFields {
            name: self.name.clone(),
            phone: self.phone.clone(),
            master_id: self.master.trim().to_string(),
            service: self.service.clone(),
            date: self.date.clone(),
            time: self.time.clone(),
            comment: self.comment.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::testing::MockEndpoint;

    fn command(master: &str, phone: &str) -> BookCommand {
        BookCommand {
            name: "Max Müller".to_string(),
            phone: phone.to_string(),
            master: master.to_string(),
            service: "haircut".to_string(),
            date: "2024-05-01".to_string(),
            time: "14:00".to_string(),
            comment: String::new(),
        }
    }

    #[tokio::test]
    async fn test_valid_booking_is_sent_once() {
        let endpoint = Arc::new(MockEndpoint::replying("success", Some("Booked!")));
        let submitter = BookingSubmitter::new(endpoint.clone());

        let result = command("3", "+49 30 12345678")
            .submit(&Catalog::default(), &submitter)
            .await
            .unwrap();

        assert_eq!(result, BookingResult::success("Booked!"));
        assert_eq!(endpoint.calls(), 1);
        let requests = endpoint.requests.lock().unwrap();
        assert_eq!(requests[0].master_id, "3");
        assert_eq!(requests[0].comment, "");
    }

    #[tokio::test]
    async fn test_unknown_master_is_rejected_before_sending() {
        let endpoint = Arc::new(MockEndpoint::replying("success", None));
        let submitter = BookingSubmitter::new(endpoint.clone());

        let err = command("42", "+49 30 12345678")
            .submit(&Catalog::default(), &submitter)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Unknown master"));
        assert_eq!(endpoint.calls(), 0);
    }

    #[tokio::test]
    async fn test_blank_master_reports_required_fields() {
        let endpoint = Arc::new(MockEndpoint::replying("success", None));
        let submitter = BookingSubmitter::new(endpoint.clone());

        let result = command("  ", "+49 30 12345678")
            .submit(&Catalog::default(), &submitter)
            .await
            .unwrap();

        assert_eq!(result, BookingResult::failure("Please fill all required fields"));
        assert_eq!(endpoint.calls(), 0);
    }

    #[tokio::test]
    async fn test_invalid_phone_reports_format() {
        let endpoint = Arc::new(MockEndpoint::replying("success", None));
        let submitter = BookingSubmitter::new(endpoint.clone());

        let result = command("1", "030 123")
            .submit(&Catalog::default(), &submitter)
            .await
            .unwrap();

        assert!(!result.is_success());
        assert_eq!(
            result.message,
            "Please enter a valid phone number in format +49 30 12345678"
        );
        assert_eq!(endpoint.calls(), 0);
    }
}
