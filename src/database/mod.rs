pub mod connector;
pub mod models;
pub mod schema;
pub mod seed;
pub mod types;

// Re-export the primary DB types and connect helper for convenient access as `database::connect()`
pub use connector::{DB, connect, connect_with_settings, ping};
