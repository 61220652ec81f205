//! Health probing subsystem.
//!
//! # Data Flow
//! ```text
//! Reconciler tick:
//!     registry snapshot
//!     → prober.rs (bounded concurrent GETs, per-probe timeout)
//!     → verdict per key (healthy / unhealthy)
//!     → back to the registry via apply_probe_results
//! ```
//!
//! # Design Decisions
//! - Timeout, connection error, and non-2xx all count as one failure verdict
//! - An unreachable registrant never aborts the pass for the others
//! - Fan-out is capped so probe duration stays bounded on large registries

pub mod prober;

pub use prober::HealthProber;
