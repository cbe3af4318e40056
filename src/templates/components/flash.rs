use maud::{html, Markup};
use std::collections::HashMap;

/// One-shot banner carried across a redirect in the query string.
/// Renders nothing when no `message` is present.
pub fn flash_alert(query: &HashMap<String, String>) -> Markup {
    let Some(message) = query.get("message") else {
        return html! {};
    };

    let tone = match query.get("tone").map(String::as_str) {
        Some("error") => "error",
        _ => "success",
    };

    html! {
        div class=(format!("alert {tone}")) { (message) }
    }
}
