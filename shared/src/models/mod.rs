//! Data models
//!
//! Shared between the server and API consumers. These are API-facing types;
//! DB row types live in the server's `db` modules and convert into these.
//! All IDs are UUIDv4 strings; timestamps are Unix milliseconds.

pub mod attendance;
pub mod employee;
pub mod leave;
pub mod profile;
pub mod user;

// Re-exports
pub use attendance::*;
pub use employee::*;
pub use leave::*;
pub use profile::*;
pub use user::*;
