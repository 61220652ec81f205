//! Liveness probing of registered services.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use futures_util::stream::{self, StreamExt};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::time;

use crate::config::HealthCheckConfig;
use crate::registry::ServiceRecord;

/// Issues one bounded-timeout GET per record and reports a per-key verdict.
///
/// Probes run concurrently with a bounded number in flight so a large
/// registry cannot fan out without limit, and a hung registrant cannot
/// stall a pass beyond its own timeout.
#[derive(Debug, Clone)]
pub struct HealthProber {
    client: Client<HttpConnector, Body>,
    config: HealthCheckConfig,
}

impl HealthProber {
    /// Create a prober with its own HTTP client.
    pub fn new(config: HealthCheckConfig) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Self { client, config }
    }

    /// Probe every record in the snapshot. The result maps each key to a
    /// healthy/unhealthy verdict; a timeout, transport error, or non-2xx
    /// status is a failure verdict, never an error for the pass itself.
    pub async fn probe_all(&self, records: &[ServiceRecord]) -> HashMap<String, bool> {
        let timeout = Duration::from_secs(self.config.timeout_secs);
        let max_in_flight = self.config.max_in_flight.max(1);

        stream::iter(records.to_vec())
            .map(|record| {
                let client = self.client.clone();
                let path = self.config.path.clone();
                async move {
                    let healthy = probe_one(&client, &record, &path, timeout).await;
                    (record.key, healthy)
                }
            })
            .buffer_unordered(max_in_flight)
            .collect()
            .await
    }
}

async fn probe_one(
    client: &Client<HttpConnector, Body>,
    record: &ServiceRecord,
    path: &str,
    timeout: Duration,
) -> bool {
    // SocketAddr's Display brackets IPv6 addresses for us.
    let target = SocketAddr::new(record.address, record.port);
    let uri = format!("http://{target}{path}");

    let request = match Request::builder()
        .method("GET")
        .uri(uri)
        .header("user-agent", "zonekeeper-health-probe")
        .body(Body::empty())
    {
        Ok(request) => request,
        Err(error) => {
            tracing::debug!(key = %record.key, %error, "failed to build probe request");
            return false;
        }
    };

    // An unreachable registrant is a verdict, not an application error.
    match time::timeout(timeout, client.request(request)).await {
        Ok(Ok(response)) => {
            let healthy = response.status().is_success();
            if !healthy {
                tracing::debug!(key = %record.key, %target, status = %response.status(), "probe returned non-success status");
            }
            healthy
        }
        Ok(Err(error)) => {
            tracing::debug!(key = %record.key, %target, %error, "probe connection error");
            false
        }
        Err(_) => {
            tracing::debug!(key = %record.key, %target, "probe timed out");
            false
        }
    }
}
