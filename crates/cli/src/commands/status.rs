//! Status mapping commands.

use sellah_core::{BackendStatus, StatusDisplay, normalize_status, status_display};
use serde_json::json;

/// Every known backend status, in table order.
#[must_use]
pub fn known_statuses() -> Vec<String> {
    BackendStatus::ALL
        .into_iter()
        .map(|status| status.as_db_str().to_string())
        .collect()
}

/// One row per raw status: raw, normalized, tab, label and color.
#[must_use]
pub fn render_table(raw: &[String]) -> String {
    let rows: Vec<[String; 5]> = raw
        .iter()
        .map(|raw| {
            let StatusDisplay {
                label,
                color,
                display_status,
            } = status_display(raw.as_str());
            [
                format!("{raw:?}"),
                format!("{:?}", normalize_status(raw.as_str())),
                display_status.to_string(),
                label,
                color.to_string(),
            ]
        })
        .collect();

    let header = ["RAW", "NORMALIZED", "TAB", "LABEL", "COLOR"].map(str::to_string);
    let mut widths = header.clone().map(|h| h.len());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    std::iter::once(&header)
        .chain(&rows)
        .map(|row| {
            row.iter()
                .zip(widths)
                .map(|(cell, width)| format!("{cell:<width$}"))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// JSON array with one object per raw status.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render_json(raw: &[String]) -> Result<String, serde_json::Error> {
    let items: Vec<_> = raw
        .iter()
        .map(|raw| {
            json!({
                "raw": raw,
                "normalized": normalize_status(raw.as_str()),
                "display": status_display(raw.as_str()),
            })
        })
        .collect();
    serde_json::to_string_pretty(&items)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_known_statuses_cover_table() {
        let statuses = known_statuses();
        assert_eq!(statuses.len(), BackendStatus::ALL.len());
        assert!(statuses.contains(&"CANCELLED".to_string()));
    }

    #[test]
    fn test_render_table_rows() {
        let output = render_table(&["in_transit".to_string(), "PAYMENT_SENT".to_string()]);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("RAW"));
        assert!(lines[1].contains("\"in transit\""));
        assert!(lines[1].contains("shipping"));
        assert!(lines[2].contains("unknown"));
    }

    #[test]
    fn test_render_json() {
        let output = render_json(&["cancelled".to_string()]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value[0]["normalized"], "CANCELLED");
        assert_eq!(value[0]["display"]["display_status"], "cancelled");
    }
}
