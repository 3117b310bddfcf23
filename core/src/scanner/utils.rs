//! Row-parsing helpers shared by the platform scanners.

use crate::error::{Error, Result};

pub struct Utils;

impl Utils {
    /// Extract the port from a local endpoint if it is bound to loopback.
    ///
    /// The port is the last `:`-separated fragment; the rest must contain
    /// `127.0.0.1` or `localhost`. Returns `None` for anything else
    /// (IPv6 brackets, remote peers, endpoints without a numeric port),
    /// letting callers skip the row.
    pub fn loopback_port(endpoint: &str) -> Option<u16> {
        let (host, port) = endpoint.rsplit_once(':')?;
        if !host.contains("127.0.0.1") && !host.contains("localhost") {
            return None;
        }
        port.parse().ok()
    }

    /// Scan process-table rows for the first one containing any matcher
    /// substring (case-insensitive) and return its PID, taken from the
    /// second whitespace-delimited field. Returns -1 when nothing matches.
    ///
    /// A matched row whose PID field does not parse is a format mismatch
    /// with the enumerator, not absence of the process, so it is an error.
    pub fn find_pid_in_table(output: &str, matchers: &[String]) -> Result<i32> {
        let matchers_lc: Vec<String> = matchers.iter().map(|m| m.to_lowercase()).collect();

        for line in output.lines() {
            let line_lc = line.to_lowercase();
            if !matchers_lc.iter().any(|m| line_lc.contains(m.as_str())) {
                continue;
            }

            let pid_field = line.split_whitespace().nth(1).ok_or_else(|| {
                Error::ParseError(format!("matched process row has no PID field: {}", line))
            })?;
            return pid_field.parse().map_err(|_| {
                Error::ParseError(format!(
                    "invalid PID field '{}' in process row: {}",
                    pid_field, line
                ))
            });
        }

        Ok(-1)
    }
}
