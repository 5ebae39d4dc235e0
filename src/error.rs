//! Error types and handling for Bookbot
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//! Every failure is classified at the boundary where it is detected and
//! propagated unchanged; a malformed provider response is never downgraded to
//! an empty occupancy snapshot.

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for Bookbot operations
#[derive(Error, Diagnostic, Debug)]
pub enum BookbotError {
    // Configuration errors
    #[error("Missing required configuration: {key}")]
    #[diagnostic(
        code(bookbot::config::missing),
        help(
            "Set the matching BOOKBOT_* environment variable or add the key to bookbot.json (run 'bookbot setup' for a template)"
        )
    )]
    ConfigMissing { key: String },

    #[error("Failed to parse configuration file: {path}")]
    #[diagnostic(code(bookbot::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(bookbot::config::invalid))]
    ConfigInvalid { message: String },

    #[error("Configuration file already exists: {path}")]
    #[diagnostic(
        code(bookbot::config::exists),
        help("Pass --force to replace the existing configuration template")
    )]
    ConfigExists { path: String },

    #[error("Unknown timezone: {name}")]
    #[diagnostic(
        code(bookbot::config::unknown_timezone),
        help("Use an IANA timezone name such as Australia/Melbourne or America/New_York")
    )]
    UnknownTimezone { name: String },

    #[error("Invalid booking window: {message}")]
    #[diagnostic(code(bookbot::config::invalid_window))]
    InvalidWindow { message: String },

    // Authentication errors
    #[error("Authentication expired or rejected by the provider")]
    #[diagnostic(
        code(bookbot::auth::expired),
        help("Refresh the session cookies and verification token from a logged-in browser session")
    )]
    AuthExpired,

    // Provider errors
    #[error("Booking conflict: {space} was taken before the request completed")]
    #[diagnostic(
        code(bookbot::provider::conflict),
        help("Another user booked the slot after the availability check; the next scheduled run will try again")
    )]
    BookingConflict { space: String },

    #[error("Booking rejected by the provider: {reason}")]
    #[diagnostic(code(bookbot::provider::rejected))]
    BookingRejected { reason: String },

    #[error("Unexpected provider response: {message}")]
    #[diagnostic(code(bookbot::provider::response))]
    ProviderResponse { message: String },

    // Transport errors
    #[error("Transport failure talking to the provider: {message}")]
    #[diagnostic(
        code(bookbot::transport::failed),
        help("Check network connectivity and that the base URL is reachable")
    )]
    Transport { message: String },

    // File system errors
    #[error("IO error: {message}")]
    #[diagnostic(code(bookbot::fs::io_error))]
    Io { message: String },
}

/// Result type alias for Bookbot operations
pub type Result<T> = std::result::Result<T, BookbotError>;

/// Creates an invalid config error
pub fn config_invalid(message: impl Into<String>) -> BookbotError {
    BookbotError::ConfigInvalid {
        message: message.into(),
    }
}

/// Creates a provider response error
pub fn provider_response(message: impl Into<String>) -> BookbotError {
    BookbotError::ProviderResponse {
        message: message.into(),
    }
}

/// Creates a transport error
pub fn transport(message: impl Into<String>) -> BookbotError {
    BookbotError::Transport {
        message: message.into(),
    }
}
