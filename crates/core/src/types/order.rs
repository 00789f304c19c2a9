//! Order view used by the status display layer.

use serde::{Deserialize, Serialize};

use super::status::{BackendStatus, DisplayBucket, DisplayStatus, StatusDisplay, status_display};

/// The fields of an order that decide how its status is shown.
///
/// Field names follow the backend documents, so orders can be deserialized
/// straight from them; anything else on the document is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    /// Raw backend status string.
    #[serde(default)]
    pub status: Option<String>,
    /// Buyer collects the order instead of having it delivered.
    #[serde(default)]
    pub is_pickup: bool,
    /// Courier has the parcel on its final delivery run.
    #[serde(default)]
    pub out_of_delivery: bool,
}

impl OrderSummary {
    /// Build a delivery order with the given status.
    #[must_use]
    pub fn with_status(status: impl Into<String>) -> Self {
        Self {
            status: Some(status.into()),
            ..Self::default()
        }
    }

    /// The recognized backend status, if any.
    #[must_use]
    pub fn backend_status(&self) -> Option<BackendStatus> {
        super::status::parse_status(self.status.as_deref())
    }

    /// Tab this order is listed under.
    ///
    /// Depends only on the status; delivery progress never moves an order
    /// between tabs.
    #[must_use]
    pub fn display_status(&self) -> DisplayStatus {
        self.backend_status()
            .map_or(DisplayStatus::Unknown, |status| {
                DisplayStatus::Known(status.bucket())
            })
    }

    /// Micro-label shown on the shipping tab, `None` for other tabs.
    #[must_use]
    pub fn shipping_label(&self) -> Option<&'static str> {
        match self.backend_status()? {
            BackendStatus::InTransit if !self.is_pickup && self.out_of_delivery => {
                Some("out for delivery")
            }
            BackendStatus::InTransit => Some("in transit"),
            BackendStatus::ReadyForPickup => Some("ready for pickup"),
            status => {
                debug_assert_ne!(status.bucket(), DisplayBucket::Shipping);
                None
            }
        }
    }
}

/// Bucket an order for the dashboard tabs.
#[must_use]
pub fn order_display_status(order: &OrderSummary) -> DisplayStatus {
    order.display_status()
}

/// Everything the order list renders for one order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderDisplay {
    #[serde(flatten)]
    pub badge: StatusDisplay,
    pub shipping_label: Option<&'static str>,
}

impl OrderDisplay {
    #[must_use]
    pub fn of(order: &OrderSummary) -> Self {
        let badge = status_display(order.status.as_deref());
        debug_assert_eq!(badge.display_status, order.display_status());
        Self {
            badge,
            shipping_label: order.shipping_label(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_out_for_delivery_stays_in_shipping_tab() {
        let order = OrderSummary {
            status: Some("in transit".to_string()),
            is_pickup: false,
            out_of_delivery: true,
        };

        assert_eq!(
            order_display_status(&order),
            DisplayStatus::Known(DisplayBucket::Shipping)
        );
        assert_eq!(order.shipping_label(), Some("out for delivery"));
    }

    #[test]
    fn test_bucket_ignores_out_of_delivery() {
        for status in ["settle payment", "preparing", "in transit", "completed", "CANCELLED"] {
            let mut order = OrderSummary::with_status(status);
            let before = order.display_status();
            order.out_of_delivery = true;
            assert_eq!(order.display_status(), before, "{status}");
        }
    }

    #[test]
    fn test_pickup_orders_never_show_out_for_delivery() {
        let order = OrderSummary {
            status: Some("in_transit".to_string()),
            is_pickup: true,
            out_of_delivery: true,
        };
        assert_eq!(order.shipping_label(), Some("in transit"));

        let order = OrderSummary {
            status: Some("ready for pickup".to_string()),
            is_pickup: true,
            out_of_delivery: false,
        };
        assert_eq!(order.shipping_label(), Some("ready for pickup"));
    }

    #[test]
    fn test_non_shipping_orders_have_no_micro_label() {
        assert_eq!(
            OrderSummary::with_status("preparing").shipping_label(),
            None
        );
        assert_eq!(OrderSummary::default().shipping_label(), None);
    }

    #[test]
    fn test_unknown_order_status() {
        let order = OrderSummary::default();
        assert_eq!(order.display_status(), DisplayStatus::Unknown);

        let display = OrderDisplay::of(&order);
        assert_eq!(display.badge.label, "Unknown");
    }

    #[test]
    fn test_deserialize_backend_document() {
        let order: OrderSummary = serde_json::from_str(
            r#"{"status": "In_Transit", "out_of_delivery": true, "total": 120}"#,
        )
        .unwrap();

        assert!(!order.is_pickup);
        let display = serde_json::to_value(OrderDisplay::of(&order)).unwrap();
        assert_eq!(display["display_status"], "shipping");
        assert_eq!(display["label"], "In Transit");
        assert_eq!(display["shipping_label"], "out for delivery");
    }
}
