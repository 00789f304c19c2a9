//! Order status API.
//!
//! Lets client-side order lists render badges and tabs from the same table
//! the server uses.

use axum::{Json, extract::Query};
use sellah_core::{OrderDisplay, OrderSummary, StatusDisplay, normalize_status, status_display};
use serde::{Deserialize, Serialize};

use super::ApiError;
use crate::middleware::RequireSeller;

/// Largest batch accepted by [`display_orders`].
pub const MAX_ORDERS_PER_REQUEST: usize = 500;

/// Query of `GET /api/orders/status`.
#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub status: Option<String>,
}

/// Badge for one raw status plus its normalized form.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub normalized: String,
    #[serde(flatten)]
    pub display: StatusDisplay,
}

/// Resolve a single status.
///
/// GET /api/orders/status?status=
pub async fn status(
    RequireSeller(_seller): RequireSeller,
    Query(query): Query<StatusQuery>,
) -> Json<StatusResponse> {
    let raw = query.status.as_deref();
    Json(StatusResponse {
        normalized: normalize_status(raw),
        display: status_display(raw),
    })
}

/// Resolve badges, tabs and shipping labels for a batch of orders.
///
/// POST /api/orders/display
///
/// # Errors
///
/// Returns `ApiError` if the batch is larger than [`MAX_ORDERS_PER_REQUEST`].
pub async fn display_orders(
    RequireSeller(_seller): RequireSeller,
    Json(orders): Json<Vec<OrderSummary>>,
) -> Result<Json<Vec<OrderDisplay>>, ApiError> {
    if orders.len() > MAX_ORDERS_PER_REQUEST {
        return Err(ApiError::new(format!(
            "at most {MAX_ORDERS_PER_REQUEST} orders per request"
        )));
    }

    Ok(Json(orders.iter().map(OrderDisplay::of).collect()))
}
