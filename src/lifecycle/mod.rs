//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     load config → validate → init telemetry → spawn reconciler → serve
//!
//! Shutdown (shutdown.rs):
//!     Ctrl+C → broadcast → HTTP server drains, reconciler exits its loop
//! ```

pub mod shutdown;

pub use shutdown::Shutdown;
