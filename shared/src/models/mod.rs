//! Data models
//!
//! Shared between the server and API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are snowflake `i64` values behind typed newtypes (see [`ids`]).

pub mod dining_table;
pub mod ids;
pub mod meal;
pub mod reservation;
pub mod restaurant;
pub mod serde_helpers;
pub mod user;

// Re-exports
pub use dining_table::*;
pub use ids::*;
pub use meal::*;
pub use reservation::*;
pub use restaurant::*;
pub use user::*;
