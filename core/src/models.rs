//! Data structures shared across the discovery pipeline.

use serde::{Deserialize, Serialize};

/// Sentinel value meaning "not found" / "not probed" in [`ProcessInfo`].
pub const NOT_FOUND: i32 = -1;

/// Result of a discovery run: the client's PID and the port its web API
/// answers on. Either field is `-1` when the corresponding stage did not
/// produce a value.
///
/// - process not running: `pid == -1`, `port == -1`
/// - PID-only mode (or no probe yet): `pid > 0`, `port == -1`
/// - full discovery: both positive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessInfo {
    /// Process ID of the client, or -1 when no matching process exists.
    pub pid: i32,

    /// Loopback TCP port that answered the API probe, or -1.
    pub port: i32,
}

impl ProcessInfo {
    /// The "process not running" result.
    pub fn not_found() -> Self {
        Self {
            pid: NOT_FOUND,
            port: NOT_FOUND,
        }
    }

    /// A result carrying only the PID (short-circuit modes).
    pub fn pid_only(pid: i32) -> Self {
        Self {
            pid,
            port: NOT_FOUND,
        }
    }

    /// A full result with both PID and verified port.
    pub fn found(pid: i32, port: u16) -> Self {
        Self {
            pid,
            port: i32::from(port),
        }
    }

    /// Whether a matching process was found at all.
    pub fn is_running(&self) -> bool {
        self.pid != NOT_FOUND
    }
}

impl std::fmt::Display for ProcessInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Process ID: {}, Port: {}", self.pid, self.port)
    }
}
