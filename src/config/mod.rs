//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → env overrides (ZONEFILE, PORT, ...)
//!     → Config (immutable for the process lifetime)
//!     → shared by value/clone to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no hot reload
//! - All fields have defaults so the service runs with no config at all
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{apply_env_overrides, load_config, ConfigError};
pub use schema::{
    Config, HealthCheckConfig, ListenerConfig, ObservabilityConfig, RegistryConfig, SoaConfig,
    ZoneConfig,
};
pub use validation::{validate_config, ValidationError};
