//! SSH transport layer wrapping russh.
//!
//! The pipeline only needs one thing from a device: send a CLI command,
//! get the text back. [`CliSession`] is that contract; [`SshSession`] is
//! the russh-backed implementation for real devices. Tests substitute a
//! scripted session.

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use crate::error::Result;

mod ssh;

pub use ssh::SshSession;

/// An interactive CLI session with a network device.
///
/// Implementations are expected to be stateful: one session, one device,
/// commands issued strictly one at a time.
pub trait CliSession: Send {
    /// Send a command and return the device's reply, echoed command and
    /// trailing prompt removed.
    fn send_command(&mut self, command: &str) -> impl Future<Output = Result<String>> + Send;

    /// Close the session.
    fn close(&mut self) -> impl Future<Output = Result<()>> + Send;
}

/// Host key verification mode, analogous to OpenSSH's `StrictHostKeyChecking`.
#[derive(Debug, Clone, Default)]
pub enum HostKeyVerification {
    /// Reject unknown and changed keys. Connection fails if the host
    /// is not already in known_hosts.
    Strict,

    /// Accept and auto-learn unknown keys, but reject changed keys.
    /// This is the default and matches common SSH client behavior.
    #[default]
    AcceptNew,

    /// Accept all keys without checking. For testing and lab use only.
    Disabled,
}

/// Authentication method for SSH connections.
#[derive(Debug, Clone)]
pub enum AuthMethod {
    /// No authentication (for testing only).
    None,

    /// Password authentication.
    Password(SecretString),

    /// Private key authentication.
    PrivateKey {
        /// Path to the private key file.
        path: PathBuf,
        /// Optional passphrase for encrypted keys.
        passphrase: Option<SecretString>,
    },
}

/// SSH connection configuration.
#[derive(Debug, Clone)]
pub struct SshConfig {
    /// Target host (hostname or IP address).
    pub host: String,

    /// SSH port (default: 22).
    pub port: u16,

    /// Username for authentication.
    pub username: String,

    /// Authentication method.
    pub auth: AuthMethod,

    /// Timeout applied to connection setup and to each prompt wait.
    pub timeout: Duration,

    /// Terminal width for PTY. Wide enough that Junos never wraps a
    /// table row.
    pub terminal_width: u32,

    /// Terminal height for PTY.
    pub terminal_height: u32,

    /// Host key verification mode.
    pub host_key_verification: HostKeyVerification,

    /// Path to known_hosts file. `None` uses the user default.
    pub known_hosts_path: Option<PathBuf>,

    /// Regex matched against the buffer tail to detect the CLI prompt.
    pub prompt_pattern: String,

    /// How many bytes from the end of the buffer to search for the prompt.
    pub search_depth: usize,
}

/// Matches the operational prompts of both supported CLIs:
/// `user@router>` on Junos, `RP/0/RP0/CPU0:router#` on IOS-XR.
pub const DEFAULT_PROMPT_PATTERN: &str = r"[\w.@:/-]+[$#>%]\s*$";

impl SshConfig {
    /// Create a configuration with defaults for everything but host and user.
    pub fn new(host: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: 22,
            username: username.into(),
            auth: AuthMethod::None,
            timeout: Duration::from_secs(30),
            terminal_width: 511,
            terminal_height: 24,
            host_key_verification: HostKeyVerification::default(),
            known_hosts_path: None,
            prompt_pattern: DEFAULT_PROMPT_PATTERN.to_string(),
            search_depth: 1000,
        }
    }

    /// Use password authentication.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.auth = AuthMethod::Password(SecretString::from(password.into()));
        self
    }

    /// Use an already-wrapped secret, e.g. one loaded from the inventory.
    pub fn with_secret(mut self, password: SecretString) -> Self {
        self.auth = AuthMethod::Password(password);
        self
    }

    /// Use private key authentication.
    pub fn with_private_key(mut self, path: impl Into<PathBuf>) -> Self {
        self.auth = AuthMethod::PrivateKey {
            path: path.into(),
            passphrase: None,
        };
        self
    }

    /// Set the SSH port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the connect / prompt-wait timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the host key verification mode.
    pub fn with_host_key_verification(mut self, mode: HostKeyVerification) -> Self {
        self.host_key_verification = mode;
        self
    }

    /// Override the prompt detection pattern.
    pub fn with_prompt_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.prompt_pattern = pattern.into();
        self
    }

    /// Get the socket address for connection.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
