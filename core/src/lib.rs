//! scport Core Library
//!
//! Locates the running StarCraft client and the loopback TCP port its
//! embedded web API answers on, so other tools on the host can talk to
//! that API. Discovery runs in three stages:
//! - find the PID by executable-path fragment in the process table
//! - list the loopback TCP ports that PID has open
//! - probe each candidate with a known API request until one answers 200
//!
//! # Platform Support
//! - macOS / Linux: `ps aux` and `lsof`
//! - Windows: `tasklist` and `netstat -on` (untested against a live client)

pub mod config;
pub mod discovery;
pub mod error;
pub mod models;
pub mod probe;
pub mod scanner;

// Re-export commonly used types
pub use config::{ConfigStore, DiscoveryConfig};
pub use discovery::{discover, DiscoveryEngine};
pub use error::{Error, Result};
pub use models::ProcessInfo;
pub use probe::PortProber;
pub use scanner::{Scanner, SystemScanner};
