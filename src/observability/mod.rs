//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! registry / prober / reconciler / http handlers
//!     → tracing (structured log events, request spans)
//!     → metrics.rs (counters, gauges, histograms)
//!         → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - The core records events through injected helpers; it never owns the
//!   exporter's lifetime (main.rs installs it once at startup)
//! - Metric updates are cheap atomic operations, safe on hot paths

pub mod metrics;
