//! Route classification command.

use sellah_core::RouteAccess;

/// One line per path: `<access>  <path>`.
#[must_use]
pub fn render(paths: &[String]) -> String {
    paths
        .iter()
        .map(|path| format!("{:<9}  {path}", RouteAccess::classify(path).as_str()))
        .collect::<Vec<_>>()
        .join("\n")
}
