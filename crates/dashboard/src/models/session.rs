//! Session-related types.
//!
//! Types stored in the server session for authentication state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sellah_core::Email;

/// Session-stored seller identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentSeller {
    /// Seller's sign-in email.
    pub email: Email,
    /// When the seller signed in.
    pub signed_in_at: DateTime<Utc>,
}

impl CurrentSeller {
    #[must_use]
    pub fn signed_in_now(email: Email) -> Self {
        Self {
            email,
            signed_in_at: Utc::now(),
        }
    }
}

/// Session keys for dashboard data.
pub mod keys {
    /// Key for storing the signed-in seller.
    pub const CURRENT_SELLER: &str = "current_seller";

    /// Key for the client-side logout flags mirrored into the session.
    pub const LOGOUT_FLAGS: &str = "logout_flags";
}
