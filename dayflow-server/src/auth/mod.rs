//! Session authentication and rate limiting

pub mod rate_limit;
pub mod session;

pub use session::SessionContext;
