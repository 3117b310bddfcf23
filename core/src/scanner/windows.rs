//! Windows scanner implementation using tasklist and netstat.

use std::collections::HashSet;
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::{Error, Result};

use super::utils::Utils;
use super::Scanner;

/// Windows-specific scanner using `tasklist` and `netstat -on`.
pub struct WindowsScanner;

impl WindowsScanner {
    /// Create a new Windows scanner.
    pub fn new() -> Self {
        Self
    }

    /// Run `netstat -on` and return whatever it printed.
    ///
    /// netstat commonly emits useful output alongside a non-zero status,
    /// so the status is only logged and the captured stdout is parsed
    /// best-effort.
    async fn run_netstat() -> Result<String> {
        debug!("running netstat -on");

        let output = Command::new("netstat")
            .args(["-on"])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| Error::CommandFailed(format!("Failed to run netstat: {}", e)))?;

        if !output.status.success() {
            warn!(
                status = %output.status,
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "netstat exited non-zero; parsing its output anyway"
            );
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Parse netstat output into the set of loopback ports owned by `pid`.
    ///
    /// Expected netstat output format:
    /// ```text
    ///   Proto  Local Address          Foreign Address        State           PID
    ///   TCP    127.0.0.1:6119         0.0.0.0:0              LISTENING       4242
    /// ```
    ///
    /// The column layout varies between netstat versions, so rows are
    /// selected by containing the PID as a substring and only the local
    /// endpoint column is decoded.
    fn parse_socket_table(output: &str, pid: u32) -> HashSet<u16> {
        let pid_str = pid.to_string();
        let mut ports = HashSet::new();

        for line in output.lines() {
            if !line.contains(&pid_str) {
                continue;
            }

            // Columns: Proto, Local Address, Foreign Address, State, PID
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 5 {
                continue;
            }

            if let Some(port) = Utils::loopback_port(fields[1]) {
                ports.insert(port);
            }
        }

        ports
    }
}

impl Default for WindowsScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Scanner for WindowsScanner {
    /// Scan the process table with `tasklist`; rows carry the PID in the
    /// second whitespace-delimited field.
    async fn find_pid(&self, matchers: &[String]) -> Result<i32> {
        let output = Command::new("tasklist")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| Error::CommandFailed(format!("Failed to run tasklist: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::CommandFailed(format!(
                "tasklist exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Utils::find_pid_in_table(&stdout, matchers)
    }

    async fn loopback_ports(&self, pid: u32) -> Result<HashSet<u16>> {
        let output = Self::run_netstat().await?;
        Ok(Self::parse_socket_table(&output, pid))
    }
}
