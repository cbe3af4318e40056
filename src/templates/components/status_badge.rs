use crate::domain::status::Status;
use maud::{html, Markup};

pub fn status_badge(status: Status) -> Markup {
    html! {
        span class="badge" style=(format!("background: {};", status.badge_color())) {
            (status.label())
        }
    }
}
