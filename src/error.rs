//! Error types for routecheck.

use std::io;
use thiserror::Error;

/// Main error type for routecheck operations.
///
/// Everything here is fatal for the device run it occurs in: transport
/// setup, configuration loading, registry construction and artifact I/O.
/// Per-command conditions (a parser that finds nothing, a command whose
/// output is too short) are never `Error`s — they are recorded on the
/// command entry and the pipeline keeps going.
#[derive(Error, Debug)]
pub enum Error {
    /// SSH transport-level errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Parser registry construction errors
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Configuration loading errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Report/artifact writing errors
    #[error("Report error: {0}")]
    Report(#[from] ReportError),
}

/// Transport layer errors (SSH connection, authentication, command I/O).
#[derive(Error, Debug)]
pub enum TransportError {
    /// SSH handshake or protocol error
    #[error("SSH error: {0}")]
    Ssh(#[from] russh::Error),

    /// Authentication failed
    #[error("Authentication failed for user '{user}'")]
    AuthenticationFailed { user: String },

    /// SSH key error
    #[error("SSH key error: {0}")]
    Key(String),

    /// Server host key differs from the recorded one
    #[error("Host key for {host}:{port} changed (known_hosts line {line})")]
    HostKeyChanged { host: String, port: u16, line: usize },

    /// Server host key not in known_hosts under strict checking
    #[error("Unknown host key for {host}:{port}")]
    HostKeyUnknown { host: String, port: u16 },

    /// known_hosts file could not be read or updated
    #[error("known_hosts error: {0}")]
    KnownHosts(String),

    /// Connection was closed while waiting for output
    #[error("Connection disconnected")]
    Disconnected,

    /// Operation timed out
    #[error("Operation timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// Device prompt was never matched in the reply
    #[error("Prompt not found within {0:?}")]
    PromptTimeout(std::time::Duration),

    /// Invalid prompt regex
    #[error("Invalid prompt pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Parser registry construction errors.
///
/// These only surface while building the fixed command table at startup;
/// a lookup miss at runtime is not an error.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Two table entries normalized to the same (vendor, command) key.
    #[error("Duplicate parser registration for ({vendor}, '{command}')")]
    DuplicateCommand { vendor: String, command: String },
}

/// Configuration loading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Could not read a configuration file
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    /// YAML deserialization failed
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// Inventory has no devices
    #[error("Inventory '{path}' contains no devices")]
    EmptyInventory { path: String },

    /// No command list for the resolved device key
    #[error("No command list for device key '{device_key}'")]
    MissingCommandList { device_key: String },

    /// Unrecognized vendor string
    #[error("Unknown vendor '{0}'")]
    UnknownVendor(String),
}

/// Report/artifact writing errors.
#[derive(Error, Debug)]
pub enum ReportError {
    /// Artifact file I/O failed
    #[error("Failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    /// An existing artifact could not be re-read for merging
    #[error("Failed to merge into {path}: {source}")]
    Merge {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type alias using routecheck's Error.
pub type Result<T> = std::result::Result<T, Error>;
