use crate::db::complaints::{ComplaintFilters, ComplaintRow};
use crate::domain::status::{Status, ALL_STATUSES};
use crate::domain::timefmt::time_ago;
use crate::templates::components::{flash_alert, status_badge};
use crate::templates::desktop_layout;
use chrono::NaiveDateTime;
use maud::{html, Markup};
use std::collections::HashMap;

pub struct ComplaintListVm {
    pub complaints: Vec<ComplaintRow>,
    pub categories: Vec<(i64, String)>,
    pub users: Vec<(i64, String)>,
    pub filters: ComplaintFilters,
    pub query: HashMap<String, String>,
    pub now: NaiveDateTime,
}

pub fn complaints_list_page(vm: &ComplaintListVm) -> Markup {
    desktop_layout(
        "Complaints",
        html! {
            main class="container" {
                (flash_alert(&vm.query))

                div style="display: flex; justify-content: space-between; align-items: center;" {
                    h1 { "Complaints" }
                    a href="/complaints/new" class="btn" { "New complaint" }
                }

                div class="card" {
                    form action="/complaints" method="get" style="display: flex; gap: 10px; flex-wrap: wrap; align-items: flex-end;" {
                        div {
                            label for="status" { "Status" }
                            br;
                            select name="status" id="status" {
                                option value="" { "All" }
                                @for status in ALL_STATUSES {
                                    option value=(status.as_str()) selected[vm.filters.status == Some(status)] {
                                        (status.label())
                                    }
                                }
                            }
                        }
                        div {
                            label for="category_id" { "Category" }
                            br;
                            select name="category_id" id="category_id" {
                                option value="" { "All" }
                                @for (id, name) in &vm.categories {
                                    option value=(id) selected[vm.filters.category_id == Some(*id)] { (name) }
                                }
                            }
                        }
                        div {
                            label for="user_id" { "Reporter" }
                            br;
                            select name="user_id" id="user_id" {
                                option value="" { "All" }
                                @for (id, name) in &vm.users {
                                    option value=(id) selected[vm.filters.user_id == Some(*id)] { (name) }
                                }
                            }
                        }
                        div style="flex: 1; min-width: 180px;" {
                            label for="search" { "Search" }
                            br;
                            input type="text" name="search" id="search" style="width: 100%; box-sizing: border-box;"
                                value=(vm.filters.search.as_deref().unwrap_or("")) placeholder="title or description";
                        }
                        button type="submit" class="btn" { "Filter" }
                        a href="/complaints" class="btn secondary" { "Clear" }
                    }
                }

                div class="card" {
                    @if vm.complaints.is_empty() {
                        p style="color: #6b7280;" { "No complaints match." }
                    } @else {
                        table style="width: 100%; border-collapse: collapse;" {
                            thead {
                                tr {
                                    th style="padding: 8px; border-bottom: 2px solid #e5e7eb; text-align: left;" { "Title" }
                                    th style="padding: 8px; border-bottom: 2px solid #e5e7eb; text-align: left;" { "Category" }
                                    th style="padding: 8px; border-bottom: 2px solid #e5e7eb; text-align: left;" { "Reporter" }
                                    th style="padding: 8px; border-bottom: 2px solid #e5e7eb; text-align: left;" { "Status" }
                                    th style="padding: 8px; border-bottom: 2px solid #e5e7eb; text-align: left;" { "Reported" }
                                    th style="padding: 8px; border-bottom: 2px solid #e5e7eb; text-align: left;" { "Actions" }
                                }
                            }
                            tbody {
                                @for complaint in &vm.complaints {
                                    tr {
                                        td style="padding: 8px; border-bottom: 1px solid #f3f4f6;" {
                                            a href=(format!("/complaints/{}/tracking", complaint.id)) { (complaint.title) }
                                            @if complaint.privacy == "private" {
                                                " "
                                                span style="color: #6b7280; font-size: 0.8em;" { "(private)" }
                                            }
                                        }
                                        td style="padding: 8px; border-bottom: 1px solid #f3f4f6;" { (complaint.category_name) }
                                        td style="padding: 8px; border-bottom: 1px solid #f3f4f6;" { (complaint.user_name) }
                                        td style="padding: 8px; border-bottom: 1px solid #f3f4f6;" {
                                            @if let Ok(status) = Status::parse(&complaint.current_status) {
                                                (status_badge(status))
                                            } @else {
                                                (complaint.current_status)
                                            }
                                        }
                                        td style="padding: 8px; border-bottom: 1px solid #f3f4f6; color: #6b7280;" {
                                            (time_ago(complaint.created_at, vm.now))
                                        }
                                        td style="padding: 8px; border-bottom: 1px solid #f3f4f6; white-space: nowrap;" {
                                            a href=(format!("/complaints/{}/edit", complaint.id)) { "Edit" }
                                            " · "
                                            a href=(format!("/complaints/{}/comments", complaint.id)) { "Comments" }
                                            " · "
                                            a href=(format!("/complaints/{}/attachments", complaint.id)) { "Files" }
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
