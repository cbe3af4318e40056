use crate::db::complaints::ComplaintRow;
use crate::db::transitions::TransitionRow;
use crate::domain::status::{Status, ALL_STATUSES};
use crate::domain::timefmt::time_ago;
use crate::templates::components::{flash_alert, role_tag, status_badge};
use crate::templates::desktop_layout;
use chrono::NaiveDateTime;
use maud::{html, Markup};
use std::collections::HashMap;

pub struct TrackingVm {
    pub complaint: ComplaintRow,
    pub transitions: Vec<TransitionRow>,
    pub users: Vec<(i64, String)>,
    pub query: HashMap<String, String>,
    pub now: NaiveDateTime,
}

pub fn tracking_page(vm: &TrackingVm) -> Markup {
    let current = Status::parse(&vm.complaint.current_status).ok();

    desktop_layout(
        "Status tracking",
        html! {
            main class="container" {
                (flash_alert(&vm.query))

                div style="display: flex; justify-content: space-between; align-items: center; flex-wrap: wrap; gap: 8px;" {
                    h1 style="margin-bottom: 0.25rem;" { (vm.complaint.title) }
                    @if let Some(status) = current {
                        (status_badge(status))
                    }
                }
                p style="color: #6b7280; margin-top: 0.25rem;" {
                    "Reported by " (vm.complaint.user_name)
                    " · " (vm.complaint.category_name)
                    " · " (time_ago(vm.complaint.created_at, vm.now))
                }
                p {
                    a href=(format!("/complaints/{}/edit", vm.complaint.id)) { "Edit complaint" }
                    " · "
                    a href=(format!("/complaints/{}/comments", vm.complaint.id)) { "Comments" }
                    " · "
                    a href=(format!("/complaints/{}/attachments", vm.complaint.id)) { "Attachments" }
                }

                div class="card" {
                    h3 { "Record a status change" }
                    form action=(format!("/complaints/{}/tracking", vm.complaint.id)) method="post"
                        style="display: flex; flex-direction: column; gap: 10px; max-width: 560px;"
                    {
                        div style="display: flex; gap: 10px; flex-wrap: wrap;" {
                            div {
                                label for="new_status" { "New status" }
                                br;
                                select name="new_status" id="new_status" required {
                                    @for status in ALL_STATUSES {
                                        @if current != Some(status) {
                                            option value=(status.as_str()) { (status.label()) }
                                        }
                                    }
                                }
                            }
                            div {
                                label for="acting_user_id" { "Acting as" }
                                br;
                                select name="acting_user_id" id="acting_user_id" required {
                                    @for (id, name) in &vm.users {
                                        option value=(id) { (name) }
                                    }
                                }
                            }
                        }
                        div {
                            label for="comment" { "Note (optional)" }
                            br;
                            textarea name="comment" id="comment" rows="2" style="width: 100%; box-sizing: border-box;"
                                placeholder="What changed and why" {}
                        }
                        div {
                            button type="submit" class="btn" { "Record change" }
                        }
                    }
                }

                div class="card" {
                    h3 { "History" }

                    @if vm.transitions.is_empty() {
                        p style="color: #6b7280;" { "No status changes recorded yet." }
                    }

                    @for (idx, entry) in vm.transitions.iter().enumerate() {
                        div style="padding: 12px 0; border-bottom: 1px solid #f3f4f6;" {
                            div style="display: flex; align-items: center; gap: 10px; flex-wrap: wrap;" {
                                @if let Ok(status) = Status::parse(&entry.new_status) {
                                    (status_badge(status))
                                } @else {
                                    (entry.new_status)
                                }
                                span style="color: #6b7280; font-size: 0.88em;" {
                                    @match entry.previous_status.as_deref().and_then(|p| Status::parse(p).ok()) {
                                        Some(previous) => { "from " (previous.label()) },
                                        None => "initial record",
                                    }
                                }
                                span style="color: #6b7280; font-size: 0.88em;" title=(entry.created_at.format("%Y-%m-%d %H:%M").to_string()) {
                                    (time_ago(entry.created_at, vm.now))
                                }
                            }

                            p style="margin: 6px 0 0; font-size: 0.92em;" {
                                "by " strong { (entry.user_name) }
                                " " (role_tag(&entry.user_role))
                            }

                            @if let Some(comment) = &entry.comment {
                                p style="margin: 6px 0 0; color: #374151;" { (comment) }
                            }

                            div style="margin-top: 6px; display: flex; gap: 1rem;" {
                                details {
                                    summary style="cursor: pointer; color: #047857; font-size: 0.88em;" { "Edit note" }
                                    form action=(format!("/transitions/{}/comment", entry.id)) method="post"
                                        style="display: flex; gap: 8px; align-items: center; margin-top: 6px; flex-wrap: wrap;"
                                    {
                                        input type="text" name="comment" style="min-width: 240px;"
                                            value=(entry.comment.as_deref().unwrap_or(""));
                                        select name="acting_user_id" required {
                                            @for (id, name) in &vm.users {
                                                option value=(id) selected[*id == entry.user_id] { (name) }
                                            }
                                        }
                                        button type="submit" class="btn secondary" { "Save note" }
                                    }
                                }

                                // Only the newest entry can be removed.
                                @if idx == 0 {
                                    details {
                                        summary style="cursor: pointer; color: #dc2626; font-size: 0.88em;" { "Undo this change" }
                                        form action=(format!("/transitions/{}/delete", entry.id)) method="post"
                                            onsubmit="return confirm('Remove this entry and restore the previous status?');"
                                            style="display: flex; gap: 8px; align-items: center; margin-top: 6px;"
                                        {
                                            select name="acting_user_id" required {
                                                @for (id, name) in &vm.users {
                                                    option value=(id) selected[*id == entry.user_id] { (name) }
                                                }
                                            }
                                            button type="submit" class="btn danger" { "Remove entry" }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}
