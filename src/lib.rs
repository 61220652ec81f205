//! Self-registering service directory published as a DNS zone file.
//!
//! Services announce themselves over HTTP; the directory probes their
//! health endpoints on a fixed cadence, evicts entries after consecutive
//! probe failures, and atomically rewrites a BIND-style zone file that an
//! external DNS server serves.

// Core subsystems
pub mod config;
pub mod http;
pub mod reconcile;
pub mod registry;
pub mod zone;

// Traffic management
pub mod health;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::Config;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use reconcile::Reconciler;
pub use registry::{Registry, ServiceRecord};
