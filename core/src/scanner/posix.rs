//! POSIX scanner implementation using ps and lsof.

use std::collections::HashSet;
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use crate::error::{Error, Result};

use super::utils::Utils;
use super::Scanner;

/// POSIX-specific scanner using `ps aux` and `lsof`.
pub struct PosixScanner;

impl PosixScanner {
    /// Create a new POSIX scanner.
    pub fn new() -> Self {
        Self
    }

    /// Run a command and return its stdout, surfacing non-zero exits.
    async fn run(program: &str, args: &[&str]) -> Result<String> {
        debug!(program, ?args, "running enumerator");

        let output = Command::new(program)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| Error::CommandFailed(format!("Failed to run {}: {}", program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::CommandFailed(format!(
                "{} exited with {}: {}",
                program,
                output.status,
                stderr.trim()
            )));
        }

        String::from_utf8(output.stdout)
            .map_err(|e| Error::ParseError(format!("Invalid UTF-8 in {} output: {}", program, e)))
    }

    /// Parse lsof output into the set of loopback ports owned by `pid`.
    ///
    /// Expected lsof output format:
    /// ```text
    /// COMMAND    PID  USER   FD   TYPE             DEVICE SIZE/OFF NODE NAME
    /// StarCraft 4242  user   19u  IPv4 0x3d8015e195af1f3f      0t0  TCP 127.0.0.1:6119 (LISTEN)
    /// ```
    ///
    /// Rows that cannot be decoded, belong to another PID, or are not bound
    /// to loopback are skipped.
    fn parse_socket_table(output: &str, pid: u32) -> HashSet<u16> {
        let mut ports = HashSet::new();

        for line in output.lines() {
            // Columns: COMMAND PID USER FD TYPE DEVICE SIZE/OFF NODE NAME
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 9 {
                continue;
            }

            let row_pid: u32 = match fields[1].parse() {
                Ok(p) => p,
                Err(_) => continue,
            };
            if row_pid != pid {
                continue;
            }

            if let Some(port) = Utils::loopback_port(fields[8]) {
                ports.insert(port);
            }
        }

        ports
    }
}

impl Default for PosixScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Scanner for PosixScanner {
    /// Scan the process table with `ps aux`; rows carry the PID in the
    /// second whitespace-delimited field.
    async fn find_pid(&self, matchers: &[String]) -> Result<i32> {
        let output = Self::run("ps", &["aux"]).await?;
        Utils::find_pid_in_table(&output, matchers)
    }

    /// List loopback TCP ports with `lsof -aPi -p <pid>`.
    ///
    /// Flags explained:
    /// - -a: AND the selection criteria together
    /// - -P: show port numbers (don't resolve to service names)
    /// - -i: show internet sockets only
    /// - -p: restrict to the given PID
    async fn loopback_ports(&self, pid: u32) -> Result<HashSet<u16>> {
        let pid_arg = pid.to_string();
        let output = Self::run("lsof", &["-aPi", "-p", &pid_arg]).await?;
        Ok(Self::parse_socket_table(&output, pid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "COMMAND    PID  USER   FD   TYPE             DEVICE SIZE/OFF NODE NAME\n";

    #[test]
    fn test_parse_socket_table() {
        let output = format!(
            "{}\
StarCraft 4242  user   19u  IPv4 0x3d8015e195af1f3f      0t0  TCP 127.0.0.1:6119 (LISTEN)
StarCraft 4242  user   20u  IPv4 0x3d8015e195af2a10      0t0  TCP 127.0.0.1:6120 (LISTEN)
StarCraft 4242  user   21u  IPv4 0x3d8015e195af3b21      0t0  TCP 192.168.1.5:443 (ESTABLISHED)",
            HEADER
        );

        let ports = PosixScanner::parse_socket_table(&output, 4242);
        assert_eq!(ports, HashSet::from([6119, 6120]));
    }

    #[test]
    fn test_other_pid_rows_skipped() {
        let output = format!(
            "{}\
StarCraft 4242  user   19u  IPv4 0x3d8015e195af1f3f      0t0  TCP 127.0.0.1:6119 (LISTEN)
other     9999  user    6u  IPv4 0x1234567890abcdef      0t0  TCP 127.0.0.1:8080 (LISTEN)",
            HEADER
        );

        let ports = PosixScanner::parse_socket_table(&output, 4242);
        assert_eq!(ports, HashSet::from([6119]));
    }

    #[test]
    fn test_duplicate_ports_collapse() {
        let output = format!(
            "{}\
StarCraft 77  user   19u  IPv4 0x01      0t0  TCP 127.0.0.1:6120 (LISTEN)
StarCraft 77  user   20u  IPv4 0x02      0t0  TCP 127.0.0.1:6120 (ESTABLISHED)
StarCraft 77  user   21u  IPv4 0x03      0t0  TCP localhost:6120 (LISTEN)",
            HEADER
        );

        let ports = PosixScanner::parse_socket_table(&output, 77);
        assert_eq!(ports, HashSet::from([6120]));
    }

    #[test]
    fn test_no_loopback_rows_yields_empty_set() {
        let output = format!(
            "{}\
StarCraft 77  user   19u  IPv4 0x01      0t0  TCP 10.0.0.1:6119 (ESTABLISHED)",
            HEADER
        );

        let ports = PosixScanner::parse_socket_table(&output, 77);
        assert!(ports.is_empty());
    }

    #[test]
    fn test_short_and_garbled_rows_skipped() {
        let output = format!(
            "{}\
garbage row
StarCraft notanumber user 19u IPv4 0x01 0t0 TCP 127.0.0.1:6119 (LISTEN)
StarCraft 77  user   19u  IPv6 0x02      0t0  TCP [::1]:6121 (LISTEN)
StarCraft 77  user   20u  IPv4 0x03      0t0  TCP 127.0.0.1:6119 (LISTEN)",
            HEADER
        );

        let ports = PosixScanner::parse_socket_table(&output, 77);
        assert_eq!(ports, HashSet::from([6119]));
    }
}
