//! Configuration validation.
//!
//! Semantic checks on top of serde's syntactic ones: value ranges, address
//! parsability, zone naming conventions. Returns all violations, not just
//! the first, so a bad config can be fixed in one pass.

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::Config;

/// A single semantic violation found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The listener bind address does not parse as a socket address.
    #[error("listener.bind_address {0:?} is not a valid socket address")]
    BindAddress(String),

    /// The eviction threshold would evict records immediately.
    #[error("registry.error_threshold must be at least 1")]
    ErrorThreshold,

    /// A zero interval would spin the reconciler.
    #[error("health_check.interval_ms must be greater than zero")]
    Interval,

    /// Zero in-flight probes would stall every pass.
    #[error("health_check.max_in_flight must be greater than zero")]
    MaxInFlight,

    /// The probe path must be absolute.
    #[error("health_check.path must start with '/'")]
    ProbePath,

    /// No destination for the rendered zone.
    #[error("zone.output_path must not be empty")]
    OutputPath,

    /// Zone origins are absolute names in zone-file syntax.
    #[error("zone.origin {0:?} must end with a trailing dot")]
    Origin(String),

    /// A zone without NS records is not loadable.
    #[error("zone.nameservers must not be empty")]
    Nameservers,
}

/// Validate a configuration, collecting every violation.
pub fn validate_config(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }
    if config.registry.error_threshold == 0 {
        errors.push(ValidationError::ErrorThreshold);
    }
    if config.health_check.interval_ms == 0 {
        errors.push(ValidationError::Interval);
    }
    if config.health_check.max_in_flight == 0 {
        errors.push(ValidationError::MaxInFlight);
    }
    if !config.health_check.path.starts_with('/') {
        errors.push(ValidationError::ProbePath);
    }
    if config.zone.output_path.is_empty() {
        errors.push(ValidationError::OutputPath);
    }
    if !config.zone.origin.ends_with('.') {
        errors.push(ValidationError::Origin(config.zone.origin.clone()));
    }
    if config.zone.nameservers.is_empty() {
        errors.push(ValidationError::Nameservers);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
