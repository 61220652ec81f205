//! Zone file subsystem.
//!
//! # Data Flow
//! ```text
//! post-prune registry snapshot + wall-clock time
//!     → render.rs (pure text generation, time-derived SOA serial)
//!     → writer.rs (temp file + rename, atomic replace)
//!     → zone file on disk, consumed by an external DNS server
//! ```
//!
//! # Design Decisions
//! - Rendering is a pure function so output is reproducible in tests
//! - The file is a derived artifact, rewritten wholesale every cycle;
//!   the registry stays the only source of truth
//! - Per-registrant AAAA stays the legacy `::1` placeholder

pub mod render;
pub mod writer;

pub use render::{render, soa_serial};
pub use writer::ZoneWriter;
