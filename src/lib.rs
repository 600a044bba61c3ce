//! # Routecheck
//!
//! Pre-upgrade health-check runner for network routers.
//!
//! Routecheck connects to a device over an interactive SSH CLI session, runs
//! an ordered list of vendor "show" commands, parses the free-text replies
//! into structured records through a per-(vendor, command) regex-parser
//! registry, and publishes the merged results to an in-memory workflow
//! tracker plus on-disk JSON artifacts.
//!
//! ## Pipeline
//!
//! ```text
//! collect ──► parse ──► publish
//! ```
//!
//! Each stage is failure-isolated per command: one bad command never
//! sacrifices the rest of the batch. Only connection establishment,
//! configuration loading and registry construction abort a device run.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use routecheck::{
//!     CliSession, ParserRegistry, Phase, RunContext, SshConfig, SshSession, Vendor,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), routecheck::Error> {
//!     let registry = Arc::new(ParserRegistry::build()?);
//!
//!     let config = SshConfig::new("192.168.1.1", "admin").with_password("secret");
//!     let mut session = SshSession::connect(config).await?;
//!
//!     let mut ctx = RunContext::new("juniper_mx204", Vendor::Juniper, "mx204");
//!     let commands = vec!["show arp no-resolve | no-more".to_string()];
//!
//!     let parse_ok =
//!         routecheck::run_pipeline(&mut session, &registry, &mut ctx, &commands, Phase::Pre)
//!             .await;
//!
//!     session.close().await?;
//!     println!("parse_ok = {parse_ok}");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod parsers;
pub mod pipeline;
pub mod registry;
pub mod report;
pub mod transport;

// Re-export main types for convenience
pub use config::{CommandLists, DeviceConfig, Inventory};
pub use error::Error;
pub use parsers::{ParseOutcome, Parser};
pub use pipeline::{CommandEntry, Phase, RunContext, run_pipeline, tracker::WorkflowTracker};
pub use registry::{ParserRegistry, Vendor, normalize};
pub use transport::{AuthMethod, CliSession, SshConfig, SshSession};
