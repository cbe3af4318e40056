use crate::domain::options::Role;
use maud::{html, Markup};

/// Small gray chip for a stored role value.
pub fn role_tag(role: &str) -> Markup {
    let label = Role::parse(role).map(|r| r.label()).unwrap_or("User");

    html! {
        span style="background: #e5e7eb; padding: 2px 6px; border-radius: 4px; font-size: 0.8em;" {
            (label)
        }
    }
}
