//! Core types for Sellah.
//!
//! This module provides the order status vocabulary and the order view used
//! by the display layer.

pub mod email;
pub mod order;
pub mod status;

pub use email::{Email, EmailError};
pub use order::{OrderDisplay, OrderSummary, order_display_status};
pub use status::*;
