//! Order status vocabulary and the status display table.
//!
//! The backend stores order statuses as free-form strings with inconsistent
//! casing and underscore variants. This module turns them into a closed set:
//!
//! ```text
//! raw string --normalize_status--> canonical db string --BackendStatus--> DisplayBucket
//! ```
//!
//! Every [`BackendStatus`] maps to exactly one [`DisplayBucket`] through an
//! exhaustive `match`, so adding a backend status without deciding its bucket
//! is a compile error. Strings outside the table surface as
//! [`DisplayStatus::Unknown`] and render with neutral styling.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Color used for statuses that are not in the table.
pub const NEUTRAL_COLOR: &str = "#6b7280";

/// Label used when an unmapped status is empty or absent.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Alias spellings rewritten by [`normalize_status`].
///
/// Keys are matched after lower-casing and trimming.
///
/// Upper-case underscored forms such as `PAYMENT_SENT` lower-case to
/// `payment_sent`, which has no entry here and therefore stays unmapped.
const STATUS_ALIASES: &[(&str, &str)] = &[
    ("in_transit", "in transit"),
    ("ready_for_pickup", "ready for pickup"),
    ("order_received", "order received"),
    ("cancelled", "CANCELLED"),
    ("canceled", "CANCELLED"),
];

/// Order status as stored by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BackendStatus {
    #[serde(rename = "settle payment")]
    SettlePayment,
    #[serde(rename = "payment sent")]
    PaymentSent,
    #[serde(rename = "preparing")]
    Preparing,
    #[serde(rename = "in transit")]
    InTransit,
    #[serde(rename = "ready for pickup")]
    ReadyForPickup,
    #[serde(rename = "order received")]
    OrderReceived,
    #[serde(rename = "completed")]
    Completed,
    #[serde(rename = "CANCELLED")]
    Cancelled,
}

impl BackendStatus {
    /// Every backend status, in table order.
    pub const ALL: [Self; 8] = [
        Self::SettlePayment,
        Self::PaymentSent,
        Self::Preparing,
        Self::InTransit,
        Self::ReadyForPickup,
        Self::OrderReceived,
        Self::Completed,
        Self::Cancelled,
    ];

    /// The canonical string the backend stores for this status.
    #[must_use]
    pub const fn as_db_str(self) -> &'static str {
        match self {
            Self::SettlePayment => "settle payment",
            Self::PaymentSent => "payment sent",
            Self::Preparing => "preparing",
            Self::InTransit => "in transit",
            Self::ReadyForPickup => "ready for pickup",
            Self::OrderReceived => "order received",
            Self::Completed => "completed",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// The dashboard tab this status is listed under.
    #[must_use]
    pub const fn bucket(self) -> DisplayBucket {
        match self {
            Self::SettlePayment => DisplayBucket::Unpaid,
            Self::PaymentSent | Self::Preparing => DisplayBucket::ToShip,
            Self::InTransit | Self::ReadyForPickup => DisplayBucket::Shipping,
            Self::OrderReceived | Self::Completed => DisplayBucket::Completed,
            Self::Cancelled => DisplayBucket::Cancelled,
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SettlePayment => "Settle Payment",
            Self::PaymentSent => "Payment Sent",
            Self::Preparing => "Preparing",
            Self::InTransit => "In Transit",
            Self::ReadyForPickup => "Ready for Pickup",
            Self::OrderReceived => "Order Received",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Badge color (CSS hex).
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::SettlePayment => "#f59e0b",
            Self::PaymentSent => "#0ea5e9",
            Self::Preparing => "#3b82f6",
            Self::InTransit => "#8b5cf6",
            Self::ReadyForPickup => "#6366f1",
            Self::OrderReceived => "#14b8a6",
            Self::Completed => "#10b981",
            Self::Cancelled => "#ef4444",
        }
    }

    /// Look up an already-normalized status string, ignoring case.
    ///
    /// The first table entry that matches wins.
    #[must_use]
    pub fn from_db_str(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_db_str().eq_ignore_ascii_case(s))
    }

    /// Static display row for this status.
    #[must_use]
    pub fn display(self) -> StatusDisplay {
        StatusDisplay {
            label: self.label().to_string(),
            color: self.color(),
            display_status: DisplayStatus::Known(self.bucket()),
        }
    }
}

impl fmt::Display for BackendStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_db_str())
    }
}

/// Error returned when a string is not a recognized backend status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized order status: {0:?}")]
pub struct UnknownStatus(pub String);

impl FromStr for BackendStatus {
    type Err = UnknownStatus;

    /// Parses through [`normalize_status`], so alias spellings are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_status(s).ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// One of the five order tabs shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayBucket {
    Unpaid,
    ToShip,
    Shipping,
    Completed,
    Cancelled,
}

impl DisplayBucket {
    /// Every bucket, in tab order.
    pub const ALL: [Self; 5] = [
        Self::Unpaid,
        Self::ToShip,
        Self::Shipping,
        Self::Completed,
        Self::Cancelled,
    ];

    /// Stable identifier used in URLs and JSON.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unpaid => "unpaid",
            Self::ToShip => "to_ship",
            Self::Shipping => "shipping",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Tab heading.
    #[must_use]
    pub const fn tab_label(self) -> &'static str {
        match self {
            Self::Unpaid => "Unpaid",
            Self::ToShip => "To Ship",
            Self::Shipping => "Shipping",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Backend statuses listed under this tab.
    pub fn statuses(self) -> impl Iterator<Item = BackendStatus> {
        BackendStatus::ALL
            .into_iter()
            .filter(move |status| status.bucket() == self)
    }
}

impl fmt::Display for DisplayBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display category of a raw status: a known bucket or `unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "&'static str")]
pub enum DisplayStatus {
    Known(DisplayBucket),
    Unknown,
}

impl DisplayStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Known(bucket) => bucket.as_str(),
            Self::Unknown => "unknown",
        }
    }

    /// The bucket, if the status was recognized.
    #[must_use]
    pub const fn bucket(self) -> Option<DisplayBucket> {
        match self {
            Self::Known(bucket) => Some(bucket),
            Self::Unknown => None,
        }
    }
}

impl From<DisplayStatus> for &'static str {
    fn from(status: DisplayStatus) -> Self {
        status.as_str()
    }
}

impl fmt::Display for DisplayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label, color and category rendered for a status badge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusDisplay {
    pub label: String,
    pub color: &'static str,
    pub display_status: DisplayStatus,
}

/// Normalize a raw backend status string.
///
/// Lower-cases and trims, then rewrites known alias spellings. Strings
/// without an alias are returned lower-cased and trimmed; an absent status
/// normalizes to the empty string. Normalizing twice gives the same result
/// as normalizing once.
///
/// ```
/// use sellah_core::normalize_status;
///
/// assert_eq!(normalize_status(" In_Transit "), "in transit");
/// assert_eq!(normalize_status("cancelled"), "CANCELLED");
/// assert_eq!(normalize_status(None), "");
/// ```
#[must_use]
pub fn normalize_status<'a>(raw: impl Into<Option<&'a str>>) -> String {
    let lowered = raw.into().unwrap_or_default().trim().to_lowercase();

    STATUS_ALIASES
        .iter()
        .find(|(alias, _)| *alias == lowered)
        .map_or(lowered, |(_, canonical)| (*canonical).to_string())
}

/// Parse a raw status into the closed backend enum.
#[must_use]
pub fn parse_status<'a>(raw: impl Into<Option<&'a str>>) -> Option<BackendStatus> {
    BackendStatus::from_db_str(&normalize_status(raw))
}

/// Resolve the badge for a raw status string.
///
/// Never fails: statuses outside the table keep their raw text as the label
/// (or [`UNKNOWN_LABEL`] when blank), use [`NEUTRAL_COLOR`] and report
/// [`DisplayStatus::Unknown`].
#[must_use]
pub fn status_display<'a>(raw: impl Into<Option<&'a str>>) -> StatusDisplay {
    let raw = raw.into();
    if let Some(status) = parse_status(raw) {
        return status.display();
    }

    let trimmed = raw.unwrap_or_default().trim();
    let label = if trimmed.is_empty() {
        UNKNOWN_LABEL.to_string()
    } else {
        trimmed.to_string()
    };

    StatusDisplay {
        label,
        color: NEUTRAL_COLOR,
        display_status: DisplayStatus::Unknown,
    }
}
