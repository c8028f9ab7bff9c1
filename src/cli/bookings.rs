//! Admin commands for stored bookings

use anyhow::{anyhow, Context, Result};
use clap::Args;
use tracing::info;

use crate::booking::{BookingRecord, Catalog, HttpBookingClient, RecordStatus};
use crate::config::Config;

/// List stored bookings
#[derive(Debug, Args)]
pub struct BookingsCommand {
    /// Only show bookings with this status
    #[arg(short, long, value_enum)]
    pub status: Option<RecordStatus>,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

impl BookingsCommand {
    pub async fn execute(&self, config: &Config) -> Result<()> {
        let client = HttpBookingClient::from_config(config)?;
        let records = client
            .list_bookings()
            .await
            .with_context(|| format!("Failed to list bookings from {}", client.base_url()))?;

        let records = self.select(records);
        if self.json {
            println!("{}", serde_json::to_string_pretty(&records)?);
        } else if records.is_empty() {
            println!("No bookings");
        } else {
            let catalog = Catalog::default();
            for record in &records {
                println!("{}", format_record(record, &catalog));
            }
        }
        Ok(())
    }

    /// Apply the status filter and order newest first
    fn select(&self, mut records: Vec<BookingRecord>) -> Vec<BookingRecord> {
        if let Some(status) = self.status {
            records.retain(|r| r.status == status);
        }
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records
    }
}

fn format_record(record: &BookingRecord, catalog: &Catalog) -> String {
    let master_id = record.master_id.to_string();
    let master = catalog
        .master(&master_id)
        .map(|m| m.name.as_str())
        .unwrap_or(master_id.as_str());

    let mut line = format!(
        "#{:<4} {} {}  {:<10} {:<20} {:<16} {:<14} {}",
        record.id,
        record.date,
        record.time,
        record.status.to_string(),
        record.name,
        record.phone,
        record.service,
        master
    );
    if let Some(comment) = record.comment.as_deref().filter(|c| !c.trim().is_empty()) {
        line.push_str(&format!("\n      “{}”", comment));
    }
    line
}

/// Change the status of a stored booking
#[derive(Debug, Args)]
pub struct SetStatusCommand {
    /// Booking id
    pub id: i64,

    /// New status
    #[arg(value_enum)]
    pub status: RecordStatus,
}

impl SetStatusCommand {
    pub async fn execute(&self, config: &Config) -> Result<()> {
        let client = HttpBookingClient::from_config(config)?;
        let reply = client
            .update_status(self.id, self.status)
            .await
            .with_context(|| format!("Failed to update booking #{}", self.id))?;

        if reply.is_success() {
            info!(id = self.id, status = %self.status, "Booking status updated");
            println!("Booking #{} is now {}", self.id, self.status);
            Ok(())
        } else {
            Err(anyhow!(
                "Booking #{} was not updated: {}",
                self.id,
                reply.message.unwrap_or_else(|| "no reason given".to_string())
            ))
        }
    }
}
