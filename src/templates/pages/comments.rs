use crate::db::comments::{CommentOrder, CommentRow};
use crate::db::complaints::ComplaintRow;
use crate::domain::timefmt::time_ago;
use crate::templates::components::{flash_alert, role_tag};
use crate::templates::desktop_layout;
use chrono::NaiveDateTime;
use maud::{html, Markup};
use std::collections::HashMap;

pub struct CommentsVm {
    pub complaint: ComplaintRow,
    pub comments: Vec<CommentRow>,
    pub users: Vec<(i64, String)>,
    pub order: CommentOrder,
    pub query: HashMap<String, String>,
    pub now: NaiveDateTime,
}

pub fn comments_page(vm: &CommentsVm) -> Markup {
    let base = format!("/complaints/{}/comments", vm.complaint.id);

    desktop_layout(
        "Comments",
        html! {
            main class="container" {
                (flash_alert(&vm.query))

                h1 { "Comments" }
                p style="color: #6b7280; margin-top: 0.25rem;" {
                    "On " a href=(format!("/complaints/{}/tracking", vm.complaint.id)) { (vm.complaint.title) }
                    " · " (vm.comments.len()) " so far"
                }

                div class="card" {
                    h3 { "Add a comment" }
                    form action=(base) method="post" style="display: flex; flex-direction: column; gap: 10px; max-width: 560px;" {
                        textarea name="body" rows="3" required style="width: 100%; box-sizing: border-box;"
                            placeholder="Share an update or ask a question" {}
                        div style="display: flex; gap: 10px; align-items: flex-end;" {
                            div {
                                label for="user_id" { "Comment as" }
                                br;
                                select name="user_id" id="user_id" required {
                                    @for (id, name) in &vm.users {
                                        option value=(id) { (name) }
                                    }
                                }
                            }
                            button type="submit" class="btn" { "Post comment" }
                        }
                    }
                }

                div class="card" {
                    div style="display: flex; justify-content: space-between; align-items: center;" {
                        h3 { "Thread" }
                        @match vm.order {
                            CommentOrder::OldestFirst => a href=(format!("{base}?order=desc")) { "Newest first" },
                            CommentOrder::NewestFirst => a href=(base.as_str()) { "Oldest first" },
                        }
                    }

                    @if vm.comments.is_empty() {
                        p style="color: #6b7280;" { "No comments yet." }
                    }

                    @for comment in &vm.comments {
                        div style="padding: 12px 0; border-bottom: 1px solid #f3f4f6;" {
                            p style="margin: 0; font-size: 0.92em;" {
                                strong { (comment.user_name) }
                                " " (role_tag(&comment.user_role))
                                " "
                                span style="color: #6b7280;" title=(comment.created_at.format("%Y-%m-%d %H:%M").to_string()) {
                                    (time_ago(comment.created_at, vm.now))
                                }
                                @if comment.edited {
                                    " "
                                    span style="color: #6b7280; font-size: 0.85em; font-style: italic;" { "(edited)" }
                                }
                            }
                            p style="margin: 6px 0 0; color: #374151; white-space: pre-wrap;" { (comment.body) }

                            div style="margin-top: 6px; display: flex; gap: 1rem;" {
                                details {
                                    summary style="cursor: pointer; color: #047857; font-size: 0.88em;" { "Edit" }
                                    form action=(format!("/comments/{}", comment.id)) method="post"
                                        style="display: flex; gap: 8px; align-items: center; margin-top: 6px; flex-wrap: wrap;"
                                    {
                                        input type="text" name="body" required style="min-width: 240px;" value=(comment.body);
                                        select name="acting_user_id" required {
                                            @for (id, name) in &vm.users {
                                                option value=(id) selected[*id == comment.user_id] { (name) }
                                            }
                                        }
                                        button type="submit" class="btn secondary" { "Save" }
                                    }
                                }
                                details {
                                    summary style="cursor: pointer; color: #dc2626; font-size: 0.88em;" { "Delete" }
                                    form action=(format!("/comments/{}/delete", comment.id)) method="post"
                                        onsubmit="return confirm('Delete this comment?');"
                                        style="display: flex; gap: 8px; align-items: center; margin-top: 6px;"
                                    {
                                        select name="acting_user_id" required {
                                            @for (id, name) in &vm.users {
                                                option value=(id) selected[*id == comment.user_id] { (name) }
                                            }
                                        }
                                        button type="submit" class="btn danger" { "Delete comment" }
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
