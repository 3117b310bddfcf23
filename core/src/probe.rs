//! Concurrent HTTP probing of candidate ports.
//!
//! The socket table only says which loopback ports the client owns; it
//! cannot say which of them speaks the web API. So every candidate gets one
//! GET to a path only the API answers with 200, and the first port whose
//! response comes back 200 wins.

use std::collections::HashSet;
use std::time::Duration;

use reqwest::StatusCode;
use tokio::sync::mpsc;
use tracing::debug;

use crate::error::{Error, Result};

/// Request path only the client's web API answers with 200.
const PROBE_PATH: &str = "/web-api/v1/leaderboard/12931?offset=0&length=100";

/// Default per-port probe timeout.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Probes candidate loopback ports for the web API.
pub struct PortProber {
    client: reqwest::Client,
}

impl PortProber {
    /// Create a prober whose requests are bounded by `timeout`, so no
    /// probe outlives the discovery call by more than that window.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Probe(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Probe every candidate concurrently and return the first port whose
    /// server answered 200. Each port is requested exactly once; losers are
    /// abandoned. Fails with [`Error::NoWorkingPort`] when the set is empty
    /// or no candidate succeeds.
    pub async fn probe(&self, ports: &HashSet<u16>) -> Result<u16> {
        if ports.is_empty() {
            return Err(Error::NoWorkingPort);
        }

        // Capacity covers every worker, so a late success never blocks.
        let (tx, mut rx) = mpsc::channel(ports.len());

        for &port in ports {
            let client = self.client.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                if probe_one(&client, port).await {
                    let _ = tx.send(port).await;
                }
            });
        }
        drop(tx);

        // None means every worker finished without a success.
        match rx.recv().await {
            Some(port) => Ok(port),
            None => Err(Error::NoWorkingPort),
        }
    }
}

async fn probe_one(client: &reqwest::Client, port: u16) -> bool {
    let url = format!("http://127.0.0.1:{}{}", port, PROBE_PATH);
    debug!(port, "probing");

    match client.get(&url).send().await {
        Ok(resp) => resp.status() == StatusCode::OK,
        Err(e) => {
            debug!(port, error = %e, "probe failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn api_server(status: u16) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/web-api/v1/leaderboard/12931"))
            .and(query_param("offset", "0"))
            .and(query_param("length", "100"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&server)
            .await;
        server
    }

    fn prober() -> PortProber {
        PortProber::new(Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_empty_set_fails_without_requests() {
        let err = prober().probe(&HashSet::new()).await.unwrap_err();
        assert!(matches!(err, Error::NoWorkingPort));
    }

    #[tokio::test]
    async fn test_picks_the_port_that_answers_200() {
        let wrong = api_server(404).await;
        let right = api_server(200).await;

        let ports = HashSet::from([wrong.address().port(), right.address().port()]);
        let port = prober().probe(&ports).await.unwrap();
        assert_eq!(port, right.address().port());
    }

    #[tokio::test]
    async fn test_all_rejections_fail() {
        let a = api_server(404).await;
        let b = api_server(500).await;

        let ports = HashSet::from([a.address().port(), b.address().port()]);
        let err = prober().probe(&ports).await.unwrap_err();
        assert!(matches!(err, Error::NoWorkingPort));
    }

    #[tokio::test]
    async fn test_each_port_requested_exactly_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/web-api/v1/leaderboard/12931"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let ports = HashSet::from([server.address().port()]);
        let port = prober().probe(&ports).await.unwrap();
        assert_eq!(port, server.address().port());

        server.verify().await;
    }

    #[tokio::test]
    async fn test_fast_success_not_delayed_by_slow_port() {
        let fast = api_server(200).await;

        let slow = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/web-api/v1/leaderboard/12931"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(30)))
            .mount(&slow)
            .await;

        let ports = HashSet::from([fast.address().port(), slow.address().port()]);
        let start = Instant::now();
        let port = prober().probe(&ports).await.unwrap();

        assert_eq!(port, fast.address().port());
        assert!(start.elapsed() < Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_silent_port_bounded_by_timeout() {
        let slow = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/web-api/v1/leaderboard/12931"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(30)))
            .mount(&slow)
            .await;

        let ports = HashSet::from([slow.address().port()]);
        let start = Instant::now();
        let err = PortProber::new(Duration::from_secs(1))
            .unwrap()
            .probe(&ports)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::NoWorkingPort));
        assert!(start.elapsed() < Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_two_working_ports_yield_one_of_them() {
        let a = api_server(200).await;
        let b = api_server(200).await;

        let ports = HashSet::from([a.address().port(), b.address().port()]);
        let port = prober().probe(&ports).await.unwrap();
        assert!(ports.contains(&port));
    }
}
