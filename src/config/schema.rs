//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service
//! directory. All types derive Serde traits for deserialization from config
//! files; every section has defaults so a minimal (or absent) config works.

use serde::{Deserialize, Serialize};

/// Root configuration for the service directory.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct Config {
    /// Listener configuration (bind address, request timeout).
    pub listener: ListenerConfig,

    /// Registry settings (default port, eviction threshold).
    pub registry: RegistryConfig,

    /// Health probe settings.
    pub health_check: HealthCheckConfig,

    /// Zone file output settings.
    pub zone: ZoneConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address for the registration endpoint (e.g., "0.0.0.0:3353").
    pub bind_address: String,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3353".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Registry settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Port assumed for registrants that omit (or send an unparsable) `port`.
    pub default_service_port: u16,

    /// Consecutive probe failures after which a record is evicted.
    pub error_threshold: u32,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            default_service_port: 8000,
            error_threshold: 5,
        }
    }
}

/// Health probe configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthCheckConfig {
    /// Reconciliation interval in milliseconds.
    pub interval_ms: u64,

    /// Per-probe timeout in seconds.
    pub timeout_secs: u64,

    /// Path to probe on each registrant.
    pub path: String,

    /// Maximum number of probes in flight at once.
    pub max_in_flight: usize,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            interval_ms: 15_000,
            timeout_secs: 5,
            path: "/health".to_string(),
            max_in_flight: 16,
        }
    }
}

/// Zone file output configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ZoneConfig {
    /// Path the rendered zone file is published to.
    pub output_path: String,

    /// Zone origin, with trailing dot (e.g., "example.net.").
    pub origin: String,

    /// TTL in seconds for the SOA and NS records.
    pub ttl: u32,

    /// SOA record settings.
    pub soa: SoaConfig,

    /// Nameserver hostnames for the fixed NS records, with trailing dots.
    pub nameservers: Vec<String>,
}

impl Default for ZoneConfig {
    fn default() -> Self {
        Self {
            output_path: "zones".to_string(),
            origin: "example.net.".to_string(),
            ttl: 3600,
            soa: SoaConfig::default(),
            nameservers: vec![
                "a.iana-servers.net.".to_string(),
                "b.iana-servers.net.".to_string(),
            ],
        }
    }
}

/// SOA (Start of Authority) record configuration.
///
/// The serial is computed from the wall clock at render time, not configured.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SoaConfig {
    /// Primary nameserver hostname, with trailing dot.
    pub mname: String,

    /// Admin mailbox in DNS form (e.g., "noc.dns.icann.org."), trailing dot.
    pub rname: String,

    /// Refresh interval in seconds.
    pub refresh: u32,

    /// Retry interval in seconds.
    pub retry: u32,

    /// Expire time in seconds.
    pub expire: u32,

    /// Minimum TTL in seconds.
    pub minimum: u32,
}

impl Default for SoaConfig {
    fn default() -> Self {
        Self {
            mname: "sns.dns.icann.org.".to_string(),
            rname: "noc.dns.icann.org.".to_string(),
            refresh: 7200,
            retry: 3600,
            expire: 1_209_600,
            minimum: 3600,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level filter (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines instead of the human-readable format.
    pub log_json: bool,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_json: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
