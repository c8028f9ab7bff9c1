use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

use super::{
    book::BookCommand,
    bookings::{BookingsCommand, SetStatusCommand},
    catalog::CatalogCommand,
};
use crate::config::Config;
use crate::tui;

/// BarberTime - book a barbershop appointment from your terminal ✂
#[derive(Parser)]
#[command(
    name = "barbertime",
    version,
    about = "Book a barbershop appointment from your terminal ✂",
    long_about = r#"BarberTime is a terminal client for the barbershop booking service.
Browse the masters and services, then book an appointment in the booking dialog.

Examples:
  barbertime                                        # Start interactive mode
  barbertime masters                                # List the masters
  barbertime book --name "Max Müller" --phone "+49 30 12345678" \
      --master 3 --service haircut --date 2024-05-01 --time 14:00
  barbertime --base-url https://shop.example bookings"#
)]
pub struct Cli {
    /// Base URL of the booking service
    #[arg(short = 'u', long = "base-url", global = true)]
    pub base_url: Option<String>,

    /// Configuration file to use instead of the default locations
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short = 'd', long = "debug", global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Send one booking without opening the interface
    Book(BookCommand),

    /// List the masters
    Masters(CatalogCommand),

    /// List the services and prices
    Services(CatalogCommand),

    /// List stored bookings, newest first
    Bookings(BookingsCommand),

    /// Change the status of a stored booking
    SetStatus(SetStatusCommand),
}

impl Cli {
    /// Whether this invocation runs the full-screen interface
    pub fn is_interactive(&self) -> bool {
        self.command.is_none()
    }

    /// Load configuration and apply command-line overrides on top of it
    pub async fn load_config(&self) -> Result<Config> {
        let mut config = Config::init(self.config.as_deref()).await?;
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        config.validate()?;
        Ok(config)
    }

    pub async fn execute(self, config: Config) -> Result<()> {
        debug!(base_url = %config.base_url, "Configuration initialized");

        match self.command {
            Some(Commands::Book(cmd)) => cmd.execute(&config).await,
            Some(Commands::Masters(cmd)) => cmd.masters(),
            Some(Commands::Services(cmd)) => cmd.services(),
            Some(Commands::Bookings(cmd)) => cmd.execute(&config).await,
            Some(Commands::SetStatus(cmd)) => cmd.execute(&config).await,
            None => tui::run(&config).await,
        }
    }
}
