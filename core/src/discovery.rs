//! The discovery pipeline.
//!
//! Three stages run in order: locate the process, enumerate its loopback
//! ports, probe the candidates. A missing process or PID-only mode
//! short-circuits after stage 1.

use tracing::debug;

use crate::config::DiscoveryConfig;
use crate::error::Result;
use crate::models::{ProcessInfo, NOT_FOUND};
use crate::probe::PortProber;
use crate::scanner::{Scanner, SystemScanner};

/// Runs the discovery stages against a [`Scanner`] and a [`PortProber`].
pub struct DiscoveryEngine<S> {
    scanner: S,
    prober: PortProber,
    config: DiscoveryConfig,
}

impl DiscoveryEngine<SystemScanner> {
    /// Create an engine for the current platform.
    pub fn new(config: DiscoveryConfig) -> Result<Self> {
        Self::with_scanner(SystemScanner::new(), config)
    }
}

impl<S: Scanner> DiscoveryEngine<S> {
    /// Create an engine backed by a custom scanner (for testing).
    pub fn with_scanner(scanner: S, config: DiscoveryConfig) -> Result<Self> {
        let prober = PortProber::new(config.probe_timeout())?;
        Ok(Self {
            scanner,
            prober,
            config,
        })
    }

    /// Find the client's PID and, unless `only_pid` is set, the loopback
    /// port its web API answers on.
    ///
    /// A missing process is not an error: the result carries `pid == -1`
    /// and no socket enumeration or probing happens. Stage failures
    /// (enumerator errors, no port answering the probe) are returned
    /// unchanged.
    pub async fn discover(&self, only_pid: bool) -> Result<ProcessInfo> {
        let pid = self.scanner.find_pid(&self.config.matchers).await?;

        if pid == NOT_FOUND || only_pid {
            return Ok(ProcessInfo::pid_only(pid));
        }

        let ports = self.scanner.loopback_ports(pid as u32).await?;
        debug!(pid, candidates = ports.len(), "probing candidate ports");

        let port = self.prober.probe(&ports).await?;
        Ok(ProcessInfo::found(pid, port))
    }
}

/// Discover with platform defaults.
///
/// Equivalent to building a [`DiscoveryEngine`] from
/// [`DiscoveryConfig::default`].
pub async fn discover(only_pid: bool) -> Result<ProcessInfo> {
    DiscoveryEngine::new(DiscoveryConfig::default())?
        .discover(only_pid)
        .await
}
