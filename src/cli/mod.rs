mod book;
mod bookings;
mod catalog;
mod root;

pub use root::Cli;
