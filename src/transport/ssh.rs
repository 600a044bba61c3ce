//! SSH session implementation using russh.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use log::{debug, warn};
use regex::bytes::Regex;
use russh::client::{self, Handle, Msg};
use russh::keys::{PrivateKeyWithHashAlg, PublicKey, load_secret_key};
use russh::{Channel, ChannelMsg};
use secrecy::ExposeSecret;

use super::{AuthMethod, CliSession, HostKeyVerification, SshConfig};
use crate::error::{Result, TransportError};

/// Interactive SSH CLI session over a PTY shell channel.
///
/// Prompt detection searches only the tail of the receive buffer, so large
/// outputs (full routing tables) stay cheap to scan.
pub struct SshSession {
    /// The russh session handle.
    session: Handle<SshHandler>,

    /// The PTY shell channel commands are written to.
    channel: Channel<Msg>,

    /// Compiled prompt pattern.
    prompt: Regex,

    /// Configuration used for this connection.
    config: SshConfig,
}

impl SshSession {
    /// Connect, authenticate, open a PTY shell and wait for the first prompt.
    pub async fn connect(config: SshConfig) -> Result<Self> {
        let prompt = Regex::new(&config.prompt_pattern).map_err(TransportError::InvalidPattern)?;

        let ssh_config = Arc::new(client::Config {
            inactivity_timeout: Some(config.timeout),
            ..Default::default()
        });

        let host_key_error: Arc<Mutex<Option<TransportError>>> = Arc::new(Mutex::new(None));

        let handler = SshHandler {
            host: config.host.clone(),
            port: config.port,
            host_key_verification: config.host_key_verification.clone(),
            known_hosts_path: config.known_hosts_path.clone(),
            host_key_error: host_key_error.clone(),
        };

        debug!("connecting to {}", config.socket_addr());
        let mut session = tokio::time::timeout(
            config.timeout,
            client::connect(ssh_config, (config.host.as_str(), config.port), handler),
        )
        .await
        .map_err(|_| TransportError::Timeout(config.timeout))?
        .map_err(|e| {
            // If check_server_key stored a detailed error, use that instead
            // of the generic russh::Error::UnknownKey
            if let Some(hk_err) = host_key_error.lock().unwrap().take() {
                hk_err
            } else {
                TransportError::Ssh(e)
            }
        })?;

        Self::authenticate(&mut session, &config).await?;

        let channel = session
            .channel_open_session()
            .await
            .map_err(TransportError::Ssh)?;

        channel
            .request_pty(
                true,
                "xterm",
                config.terminal_width,
                config.terminal_height,
                0,
                0,
                &[],
            )
            .await
            .map_err(TransportError::Ssh)?;

        channel
            .request_shell(true)
            .await
            .map_err(TransportError::Ssh)?;

        let mut this = Self {
            session,
            channel,
            prompt,
            config,
        };

        // Drain the login banner / MOTD up to the first prompt.
        let banner = this.read_until_prompt().await?;
        debug!(
            "connected to {}, drained {} banner bytes",
            this.config.host,
            banner.len()
        );

        Ok(this)
    }

    /// Authenticate with the server.
    async fn authenticate(session: &mut Handle<SshHandler>, config: &SshConfig) -> Result<()> {
        let success = match &config.auth {
            AuthMethod::None => session
                .authenticate_none(&config.username)
                .await
                .map_err(TransportError::Ssh)?
                .success(),
            AuthMethod::Password(password) => session
                .authenticate_password(&config.username, password.expose_secret())
                .await
                .map_err(TransportError::Ssh)?
                .success(),
            AuthMethod::PrivateKey { path, passphrase } => {
                let key = load_secret_key(path, passphrase.as_ref().map(|p| p.expose_secret()))
                    .map_err(|e| TransportError::Key(e.to_string()))?;

                // Get the best RSA hash algorithm supported by the server
                let hash_alg = session
                    .best_supported_rsa_hash()
                    .await
                    .map_err(TransportError::Ssh)?
                    .flatten();

                session
                    .authenticate_publickey(
                        &config.username,
                        PrivateKeyWithHashAlg::new(Arc::new(key), hash_alg),
                    )
                    .await
                    .map_err(TransportError::Ssh)?
                    .success()
            }
        };

        if !success {
            return Err(TransportError::AuthenticationFailed {
                user: config.username.clone(),
            }
            .into());
        }

        Ok(())
    }

    /// Accumulate channel data until the prompt pattern matches the buffer
    /// tail. Returns the output with the prompt itself cut off.
    async fn read_until_prompt(&mut self) -> Result<Vec<u8>> {
        let timeout = self.config.timeout;
        let deadline = tokio::time::Instant::now() + timeout;
        let mut buffer: Vec<u8> = Vec::with_capacity(4096);

        loop {
            if let Some(start) = self.find_prompt(&buffer) {
                buffer.truncate(start);
                return Ok(buffer);
            }

            let remaining = deadline
                .checked_duration_since(tokio::time::Instant::now())
                .ok_or(TransportError::PromptTimeout(timeout))?;

            let msg = tokio::time::timeout(remaining, self.channel.wait())
                .await
                .map_err(|_| TransportError::PromptTimeout(timeout))?;

            match msg {
                Some(ChannelMsg::Data { ref data }) => buffer.extend_from_slice(data),
                Some(ChannelMsg::ExtendedData { ref data, .. }) => buffer.extend_from_slice(data),
                Some(ChannelMsg::Eof) | Some(ChannelMsg::Close) | None => {
                    return Err(TransportError::Disconnected.into());
                }
                Some(_) => {}
            }
        }
    }

    /// Search the buffer tail for the prompt. Returns the absolute offset
    /// where the prompt starts.
    fn find_prompt(&self, buffer: &[u8]) -> Option<usize> {
        let base = buffer.len().saturating_sub(self.config.search_depth);
        self.prompt.find(&buffer[base..]).map(|m| base + m.start())
    }

    /// Drop the echoed command line and trailing whitespace from raw output.
    fn clean_output(raw: &[u8], command: &str) -> String {
        let text = String::from_utf8_lossy(raw).replace('\r', "");
        let body = match text.split_once('\n') {
            Some((first, rest)) if first.contains(command.trim()) => rest,
            _ => text.as_str(),
        };
        body.trim_end().to_string()
    }
}

impl CliSession for SshSession {
    async fn send_command(&mut self, command: &str) -> Result<String> {
        debug!("{}: sending {command:?}", self.config.host);
        let line = format!("{command}\n");
        self.channel
            .data(line.as_bytes())
            .await
            .map_err(TransportError::Ssh)?;

        let raw = self.read_until_prompt().await?;
        Ok(Self::clean_output(&raw, command))
    }

    async fn close(&mut self) -> Result<()> {
        self.session
            .disconnect(russh::Disconnect::ByApplication, "", "en")
            .await
            .map_err(TransportError::Ssh)?;
        Ok(())
    }
}

/// SSH client handler for russh.
struct SshHandler {
    host: String,
    port: u16,
    host_key_verification: HostKeyVerification,
    known_hosts_path: Option<PathBuf>,
    /// Stores a detailed host-key error so connect() can surface it
    /// instead of the generic russh::Error::UnknownKey.
    host_key_error: Arc<Mutex<Option<TransportError>>>,
}

impl SshHandler {
    /// Check the host key against known_hosts.
    ///
    /// Returns `Ok(true)` if matched, `Ok(false)` if host not found,
    /// `Err(TransportError::HostKeyChanged)` if key changed.
    fn check_known_hosts(&self, pubkey: &PublicKey) -> std::result::Result<bool, TransportError> {
        let result = if let Some(ref path) = self.known_hosts_path {
            russh::keys::check_known_hosts_path(&self.host, self.port, pubkey, path)
        } else {
            russh::keys::check_known_hosts(&self.host, self.port, pubkey)
        };

        match result {
            Ok(matched) => Ok(matched),
            Err(russh::keys::Error::KeyChanged { line }) => Err(TransportError::HostKeyChanged {
                host: self.host.clone(),
                port: self.port,
                line,
            }),
            Err(e) => Err(TransportError::KnownHosts(e.to_string())),
        }
    }

    /// Save a new host key to known_hosts.
    fn learn_host_key(&self, pubkey: &PublicKey) -> std::result::Result<(), TransportError> {
        let result = if let Some(ref path) = self.known_hosts_path {
            russh::keys::known_hosts::learn_known_hosts_path(&self.host, self.port, pubkey, path)
        } else {
            russh::keys::known_hosts::learn_known_hosts(&self.host, self.port, pubkey)
        };

        result.map_err(|e| TransportError::KnownHosts(e.to_string()))
    }
}

impl client::Handler for SshHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        server_public_key: &PublicKey,
    ) -> std::result::Result<bool, Self::Error> {
        match self.host_key_verification {
            HostKeyVerification::Disabled => Ok(true),

            HostKeyVerification::AcceptNew => match self.check_known_hosts(server_public_key) {
                Ok(true) => Ok(true),
                Ok(false) => {
                    // Unknown host — learn the key
                    if let Err(e) = self.learn_host_key(server_public_key) {
                        warn!("Failed to save host key: {}", e);
                    }
                    Ok(true)
                }
                Err(e) => {
                    // Key changed — store detailed error and reject
                    *self.host_key_error.lock().unwrap() = Some(e);
                    Ok(false)
                }
            },

            HostKeyVerification::Strict => match self.check_known_hosts(server_public_key) {
                Ok(true) => Ok(true),
                Ok(false) => {
                    *self.host_key_error.lock().unwrap() = Some(TransportError::HostKeyUnknown {
                        host: self.host.clone(),
                        port: self.port,
                    });
                    Ok(false)
                }
                Err(e) => {
                    *self.host_key_error.lock().unwrap() = Some(e);
                    Ok(false)
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_output_strips_echo_and_trailing() {
        let raw = b"show arp no-resolve | no-more\r\nMAC Address       Address\r\n00:11:22:33:44:55 10.0.0.1\r\n\r\n";
        let cleaned = SshSession::clean_output(raw, "show arp no-resolve | no-more");
        assert_eq!(
            cleaned,
            "MAC Address       Address\n00:11:22:33:44:55 10.0.0.1"
        );
    }

    #[test]
    fn test_clean_output_without_echo() {
        let cleaned = SshSession::clean_output(b"plain output\n", "show version");
        assert_eq!(cleaned, "plain output");
    }

    #[test]
    fn test_prompt_tail_offsets() {
        // find_prompt math: match offset is relative to the tail slice.
        let re = Regex::new(r"[\w.@:/-]+[$#>%]\s*$").unwrap();
        let mut buffer = vec![b'x'; 2000];
        buffer.extend_from_slice(b"\nlab@mx204> ");
        let base = buffer.len().saturating_sub(1000);
        let m = re.find(&buffer[base..]).unwrap();
        assert_eq!(&buffer[base + m.start()..], b"lab@mx204> ");
    }
}
