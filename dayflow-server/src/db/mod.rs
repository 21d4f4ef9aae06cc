//! Database access layer
//!
//! Thin query modules over `sqlx::PgPool`. Rows are fetched into `FromRow`
//! structs with TEXT enum columns and converted to the shared domain types
//! at the edge; multi-table writes run inside a transaction.

pub mod attendance;
pub mod employees;
pub mod leaves;
pub mod profiles;
pub mod users;
