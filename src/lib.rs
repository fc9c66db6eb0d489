pub mod api;
pub mod app_state;
pub mod config;
pub mod database;
pub mod errors;

#[cfg(test)]
pub(crate) mod test_utils;

pub use app_state::AppState;
