//! Seller dashboard overview.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;
use sellah_core::{DisplayBucket, StatusDisplay};

use crate::middleware::RequireSeller;

/// One order tab with the statuses listed under it.
pub struct BucketLegend {
    pub key: &'static str,
    pub tab_label: &'static str,
    pub statuses: Vec<StatusDisplay>,
}

impl BucketLegend {
    fn of(bucket: DisplayBucket) -> Self {
        Self {
            key: bucket.as_str(),
            tab_label: bucket.tab_label(),
            statuses: bucket
                .statuses()
                .map(|status| status.display())
                .collect(),
        }
    }
}

/// Build the legend for every tab, in tab order.
#[must_use]
pub fn status_legend() -> Vec<BucketLegend> {
    DisplayBucket::ALL
        .into_iter()
        .map(BucketLegend::of)
        .collect()
}

/// Dashboard overview template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub seller_email: String,
    pub signed_in_at: String,
    pub legend: Vec<BucketLegend>,
}

/// Dashboard overview.
pub async fn index(RequireSeller(seller): RequireSeller) -> impl IntoResponse {
    DashboardTemplate {
        seller_email: seller.email.to_string(),
        signed_in_at: seller.signed_in_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        legend: status_legend(),
    }
}
