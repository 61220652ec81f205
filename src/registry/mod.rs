//! Service registry subsystem.
//!
//! # Data Flow
//! ```text
//! HTTP /register
//!     → Registry::upsert (insert or replace, counter reset)
//!
//! Reconciler tick:
//!     Registry::snapshot → prober → Registry::apply_probe_results
//!     (increment/reset counters, then prune at threshold, atomically)
//! ```
//!
//! # Design Decisions
//! - One lock over the whole map: snapshots are consistent, apply+prune is
//!   a single critical section
//! - Callers only ever get owned snapshot copies, never references into
//!   the map
//! - Eviction happens exclusively inside apply_probe_results

pub mod store;

pub use store::{Registry, ServiceRecord};
