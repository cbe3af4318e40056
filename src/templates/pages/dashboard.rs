use crate::db::complaints::ComplaintRow;
use crate::domain::status::{Status, ALL_STATUSES};
use crate::domain::timefmt::time_ago;
use crate::templates::components::status_badge;
use crate::templates::desktop_layout;
use chrono::NaiveDateTime;
use maud::{html, Markup};

pub struct DashboardVm {
    pub total: i64,
    pub status_counts: Vec<(String, i64)>,
    pub recent: Vec<ComplaintRow>,
    pub now: NaiveDateTime,
}

impl DashboardVm {
    fn count_for(&self, status: Status) -> i64 {
        self.status_counts
            .iter()
            .find(|(value, _)| value == status.as_str())
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }
}

pub fn dashboard_page(vm: &DashboardVm) -> Markup {
    desktop_layout(
        "Dashboard",
        html! {
            main class="container" {
                h1 { "Dashboard" }
                p { strong { (vm.total) } " complaints on file" }

                div style="display: flex; gap: 1rem; flex-wrap: wrap; margin-bottom: 1.5rem;" {
                    @for status in ALL_STATUSES {
                        a href=(format!("/complaints?status={}", status.as_str()))
                            class="card"
                            style=(format!("flex: 1; min-width: 140px; text-decoration: none; color: inherit; border-left: 4px solid {}; margin-bottom: 0;", status.badge_color()))
                        {
                            div style="font-size: 1.6em; font-weight: 600;" { (vm.count_for(status)) }
                            div style="color: #6b7280; font-size: 0.9em;" { (status.label()) }
                        }
                    }
                }

                div class="card" {
                    div style="display: flex; justify-content: space-between; align-items: center;" {
                        h3 { "Recent complaints" }
                        a href="/complaints/new" class="btn" { "New complaint" }
                    }

                    @if vm.recent.is_empty() {
                        p style="color: #6b7280;" { "Nothing reported yet." }
                    } @else {
                        table style="width: 100%; border-collapse: collapse; margin-top: 1rem;" {
                            thead {
                                tr {
                                    th style="padding: 8px; border-bottom: 2px solid #e5e7eb; text-align: left;" { "Title" }
                                    th style="padding: 8px; border-bottom: 2px solid #e5e7eb; text-align: left;" { "Category" }
                                    th style="padding: 8px; border-bottom: 2px solid #e5e7eb; text-align: left;" { "Reporter" }
                                    th style="padding: 8px; border-bottom: 2px solid #e5e7eb; text-align: left;" { "Status" }
                                    th style="padding: 8px; border-bottom: 2px solid #e5e7eb; text-align: left;" { "Reported" }
                                }
                            }
                            tbody {
                                @for complaint in &vm.recent {
                                    tr {
                                        td style="padding: 8px; border-bottom: 1px solid #f3f4f6;" {
                                            a href=(format!("/complaints/{}/tracking", complaint.id)) { (complaint.title) }
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
