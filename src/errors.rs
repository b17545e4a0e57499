// Error types for pitwall

use snafu::Snafu;
use std::io;

#[derive(Debug, Snafu)]
pub enum PitwallError {
    // Errors while reading lap archives
    #[snafu(display("Error loading lap archive {path}"))]
    LapArchiveLoadError { path: String, source: io::Error },
    #[snafu(display("Lap archive {path} has a record before any session: line {line_no}"))]
    OrphanRecord { path: String, line_no: usize },

    // Errors while selecting data from a loaded archive
    #[snafu(display("No session found for {year} {event} ({session_type})"))]
    SessionNotFound {
        year: u16,
        event: String,
        session_type: String,
    },
    #[snafu(display("Driver {driver} has no laps in {event} {year}"))]
    DriverNotFound {
        driver: String,
        event: String,
        year: u16,
    },

    // Errors for the stint writer
    #[snafu(display("Error writing stint file"))]
    WriterError { source: io::Error },
    #[snafu(display("Error serializing stint"))]
    StintSerializeError { source: serde_json::Error },

    // Config management errors
    #[snafu(display("Could not find application data directory to save config file"))]
    NoConfigDir,
    #[snafu(display("Error reading or writing config file"))]
    ConfigIOError { source: io::Error },
    #[snafu(display("Error serializing config file"))]
    ConfigSerializeError { source: serde_json::Error },

    // UI errors
    #[snafu(display("Could not start dashboard: {description}"))]
    DashboardError { description: String },

    // User input validation errors
    #[snafu(display("Invalid user input: {field} - {reason}"))]
    InvalidUserInput { field: String, reason: String },
}
