//! Version information for barbertime

/// The version of barbertime, set at build time
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The name of the application
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

/// Get the full version string
pub fn full_version() -> String {
    format!("{} v{}", APP_NAME, VERSION)
}

/// User agent sent with every API request
pub fn user_agent() -> String {
    format!("{}/{}", APP_NAME, VERSION)
}
