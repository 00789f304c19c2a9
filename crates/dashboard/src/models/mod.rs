//! Domain models for the dashboard.

pub mod session;

pub use session::{CurrentSeller, keys as session_keys};
