//! Process and socket table inspection with platform-specific implementations.

#[cfg(not(windows))]
mod posix;

#[cfg(windows)]
mod windows;

mod utils;

use std::collections::HashSet;

use crate::error::Result;

/// Trait for platform-specific process and socket table readers.
pub trait Scanner: Send + Sync {
    /// Find the PID of the first process whose command line contains any of
    /// the given path fragments (case-insensitive). Returns -1 when no
    /// process matches; the error channel is reserved for failures to obtain
    /// the process listing itself.
    fn find_pid(
        &self,
        matchers: &[String],
    ) -> impl std::future::Future<Output = Result<i32>> + Send;

    /// List the distinct loopback TCP local ports owned by `pid`.
    /// An empty set is a valid result.
    fn loopback_ports(
        &self,
        pid: u32,
    ) -> impl std::future::Future<Output = Result<HashSet<u16>>> + Send;
}

/// The scanner for the current platform.
pub struct SystemScanner {
    #[cfg(not(windows))]
    inner: posix::PosixScanner,

    #[cfg(windows)]
    inner: windows::WindowsScanner,
}

impl SystemScanner {
    /// Create a new scanner for the current platform.
    pub fn new() -> Self {
        Self {
            #[cfg(not(windows))]
            inner: posix::PosixScanner::new(),

            #[cfg(windows)]
            inner: windows::WindowsScanner::new(),
        }
    }
}

impl Default for SystemScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Scanner for SystemScanner {
    async fn find_pid(&self, matchers: &[String]) -> Result<i32> {
        self.inner.find_pid(matchers).await
    }

    async fn loopback_ports(&self, pid: u32) -> Result<HashSet<u16>> {
        self.inner.loopback_ports(pid).await
    }
}
