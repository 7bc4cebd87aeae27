//! Error handling for Prophet12
//!
//! Protocol errors (`OutOfRange`, `InvalidChannel`) are plain values returned to
//! the caller. Nothing in the library terminates the process.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for Prophet12 operations
pub type Result<T> = std::result::Result<T, P12Error>;

/// Main error type for Prophet12 operations
#[derive(Error, Debug)]
pub enum P12Error {
    // Protocol Errors
    #[error("{value} invalid value for {name} ({number}), expected {min}..={max}")]
    OutOfRange {
        name: String,
        number: u16,
        value: i64,
        min: u16,
        max: u16,
    },

    #[error("Invalid MIDI channel: {channel} (expected 0-15)")]
    InvalidChannel { channel: i64 },

    // Lookup Errors
    #[error("Nothing found for {target}")]
    NotFound { target: String },

    #[error("Nothing written to {target}: {failures} failed")]
    NothingWritten { target: String, failures: usize },

    // Bank Errors
    #[error("Could not parse {location}: {reason}")]
    ParseFailure { location: String, reason: String },

    #[error("Bank directory not found: {}", .path.display())]
    BanksDirNotFound { path: PathBuf },

    // Transport Errors
    #[error("MIDI transport failure: {reason}")]
    TransportFailure { reason: String },

    // Input Errors
    #[error("Invalid layer name: {reason}")]
    InvalidName { reason: String },

    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl P12Error {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            P12Error::OutOfRange { .. } => "OUT_OF_RANGE",
            P12Error::InvalidChannel { .. } => "INVALID_CHANNEL",
            P12Error::NotFound { .. } => "NOT_FOUND",
            P12Error::NothingWritten { .. } => "NOTHING_WRITTEN",
            P12Error::ParseFailure { .. } => "PARSE_FAILURE",
            P12Error::BanksDirNotFound { .. } => "BANKS_DIR_NOT_FOUND",
            P12Error::TransportFailure { .. } => "TRANSPORT_FAILURE",
            P12Error::InvalidName { .. } => "INVALID_NAME",
            P12Error::InvalidArgument { .. } => "INVALID_ARGUMENT",
            P12Error::Io(_) => "IO_ERROR",
            P12Error::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if a session can carry on after this error
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            P12Error::OutOfRange { .. }
                | P12Error::InvalidChannel { .. }
                | P12Error::NotFound { .. }
                | P12Error::NothingWritten { .. }
                | P12Error::ParseFailure { .. }
                | P12Error::TransportFailure { .. }
                | P12Error::InvalidName { .. }
                | P12Error::InvalidArgument { .. }
        )
    }

    /// Returns a user-friendly recovery suggestion.
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            P12Error::OutOfRange { .. } => Some("Use 'show <nrpn>' to see the legal range."),
            P12Error::InvalidChannel { .. } => Some("MIDI channels are numbered 0 to 15."),
            P12Error::NotFound { .. } => Some("Use 'ls' to list banks and their settings."),
            P12Error::NothingWritten { .. } => {
                Some("Use 'show <nrpn>' or 'ls <bank>' to check the target and its ranges.")
            }
            P12Error::BanksDirNotFound { .. } => {
                Some("Pass --banks-dir or set P12_BANKS_DIR to a directory of CSV banks.")
            }
            P12Error::TransportFailure { .. } => {
                Some("Check the device is connected, then pick a port with 'midi <port>'.")
            }
            P12Error::InvalidName { .. } => {
                Some("Names are at most 20 characters and cannot contain / : < > ? \\ |")
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = P12Error::InvalidChannel { channel: 16 };
        assert_eq!(err.error_code(), "INVALID_CHANNEL");

        let err = P12Error::NotFound {
            target: "bank 'osc'".to_string(),
        };
        assert_eq!(err.error_code(), "NOT_FOUND");
    }

    #[test]
    fn test_out_of_range_message() {
        let err = P12Error::OutOfRange {
            name: "LFO1 Rate".to_string(),
            number: 100,
            value: 128,
            min: 0,
            max: 127,
        };
        assert_eq!(
            err.to_string(),
            "128 invalid value for LFO1 Rate (100), expected 0..=127"
        );
        assert!(err.is_recoverable());
        assert!(err.recovery_suggestion().is_some());
    }

    #[test]
    fn test_nothing_written_message() {
        let err = P12Error::NothingWritten {
            target: "NRPN number 999".to_string(),
            failures: 1,
        };
        assert_eq!(err.to_string(), "Nothing written to NRPN number 999: 1 failed");
        assert_eq!(err.error_code(), "NOTHING_WRITTEN");
        assert!(err.recovery_suggestion().is_some());
    }

    #[test]
    fn test_startup_errors_not_recoverable() {
        let err = P12Error::BanksDirNotFound {
            path: PathBuf::from("missing"),
        };
        assert!(!err.is_recoverable());
    }
}
