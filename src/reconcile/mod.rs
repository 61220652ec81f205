//! Reconciliation subsystem.
//!
//! # Data Flow
//! ```text
//! interval timer
//!     → Registry::snapshot
//!     → HealthProber::probe_all (concurrent, bounded)
//!     → Registry::apply_probe_results (count / evict)
//!     → zone::render (post-prune snapshot + now)
//!     → ZoneWriter::publish (atomic replace)
//! ```
//!
//! # Design Decisions
//! - Ticks never overlap: each cycle is awaited before the next fires,
//!   with MissedTickBehavior::Delay absorbing slow cycles
//! - Each cycle runs in its own task; a panic is caught at the join point
//!   and the loop continues on schedule
//! - A failed zone write is logged and retried implicitly next tick

pub mod reconciler;

pub use reconciler::Reconciler;
