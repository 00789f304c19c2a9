//! Sellah Core - order status mapping and session-invalidation protocol.
//!
//! This crate provides the pieces shared by every Sellah component:
//! - `dashboard` - Seller dashboard web server
//! - `cli` - Operator tooling
//!
//! # Architecture
//!
//! The core crate contains only types, pure functions and synchronous state
//! machines - no HTTP, no async runtime. Persistence is reached through the
//! [`session::FlagStorage`] trait so the same guard logic runs against request
//! cookies, server sessions or in-memory storage.
//!
//! # Modules
//!
//! - [`types`] - Backend order statuses, display buckets and the status table
//! - [`routes`] - The single public/protected route partition
//! - [`session`] - Logout flag store and the three session guards

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod routes;
pub mod session;
pub mod types;

pub use routes::{LOGIN_PATH, PUBLIC_ROUTES, RouteAccess, SESSION_EXPIRED_REDIRECT};
pub use session::{
    FlagError, FlagStorage, LOGOUT_COOKIE_NAME, LogoutFlag, LogoutFlagStore, MemoryStorage,
    StorageError,
};
pub use types::*;
