//! HTTP transport subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum router, request ID, trace, timeout)
//!     → GET /health        → fixed {"status":"OK"}
//!     → GET|POST /register → Registry::upsert (address from ConnectInfo)
//! ```
//!
//! # Design Decisions
//! - Handlers return plain status codes / infallible responses; faults
//!   never unwind through the transport
//! - The registrant address is always the connection's remote IP, so a
//!   caller cannot register a record pointing at someone else

pub mod server;

pub use server::{AppState, HttpServer};
