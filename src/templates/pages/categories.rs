use crate::db::categories::CategoryRow;
use crate::domain::options::{Priority, ALL_PRIORITIES};
use crate::templates::components::flash_alert;
use crate::templates::desktop_layout;
use maud::{html, Markup};
use std::collections::HashMap;

pub struct CategoriesVm {
    pub categories: Vec<CategoryRow>,
    /// Set when the form should edit an existing row instead of creating.
    pub editing: Option<CategoryRow>,
    pub users: Vec<(i64, String)>,
    pub query: HashMap<String, String>,
}

pub fn categories_page(vm: &CategoriesVm) -> Markup {
    let (form_title, action) = match &vm.editing {
        Some(category) => ("Edit category", format!("/categories/{}", category.id)),
        None => ("New category", "/categories".to_string()),
    };

    let selected_priority = vm
        .editing
        .as_ref()
        .and_then(|c| Priority::parse(&c.priority).ok())
        .unwrap_or(Priority::Medium);

    desktop_layout(
        "Categories",
        html! {
            main class="container" {
                (flash_alert(&vm.query))

                h1 { "Categories" }
                p style="color: #6b7280; margin-top: 0.25rem;" {
                    "Changes here require an administrator account."
                }

                div class="card" {
                    h3 { (form_title) }
                    form action=(action) method="post" style="display: flex; flex-direction: column; gap: 10px; max-width: 560px;" {
                        div {
                            label for="name" { "Name" }
                            br;
                            input type="text" name="name" id="name" required style="width: 100%; box-sizing: border-box;"
                                value=(vm.editing.as_ref().map(|c| c.name.as_str()).unwrap_or(""));
                        }
                        div {
                            label for="description" { "Description" }
                            br;
                            input type="text" name="description" id="description" style="width: 100%; box-sizing: border-box;"
                                value=(vm.editing.as_ref().and_then(|c| c.description.as_deref()).unwrap_or(""));
                        }
                        div style="display: flex; gap: 10px; align-items: flex-end; flex-wrap: wrap;" {
                            div {
                                label for="priority" { "Priority" }
                                br;
                                select name="priority" id="priority" {
                                    @for priority in ALL_PRIORITIES {
                                        option value=(priority.as_str()) selected[priority == selected_priority] {
                                            (priority.label())
                                        }
                                    }
                                }
                            }
                            @if vm.editing.is_some() {
                                label style="font-weight: normal;" {
                                    input type="checkbox" name="active" value="1"
                                        checked[vm.editing.as_ref().map(|c| c.active).unwrap_or(true)];
                                    " Active"
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
                            button type="submit" class="btn" {
                                @if vm.editing.is_some() { "Save" } @else { "Create" }
                            }
                            @if vm.editing.is_some() {
                                a href="/categories" class="btn secondary" { "Cancel" }
                            }
                        }
                    }
                }

                div class="card" {
                    table style="width: 100%; border-collapse: collapse;" {
                        thead {
                            tr {
                                th style="padding: 8px; border-bottom: 2px solid #e5e7eb; text-align: left;" { "Name" }
                                th style="padding: 8px; border-bottom: 2px solid #e5e7eb; text-align: left;" { "Description" }
                                th style="padding: 8px; border-bottom: 2px solid #e5e7eb; text-align: left;" { "Priority" }
                                th style="padding: 8px; border-bottom: 2px solid #e5e7eb; text-align: left;" { "Active" }
                                th style="padding: 8px; border-bottom: 2px solid #e5e7eb; text-align: left;" { "Actions" }
                            }
                        }
                        tbody {
                            @for category in &vm.categories {
                                tr {
                                    td style="padding: 8px; border-bottom: 1px solid #f3f4f6;" { (category.name) }
                                    td style="padding: 8px; border-bottom: 1px solid #f3f4f6; color: #6b7280;" {
                                        (category.description.as_deref().unwrap_or(""))
                                    }
                                    td style="padding: 8px; border-bottom: 1px solid #f3f4f6;" { (priority_tag(&category.priority)) }
                                    td style="padding: 8px; border-bottom: 1px solid #f3f4f6;" {
                                        @if category.active { "Yes" } @else {
                                            span style="color: #6b7280;" { "No" }
                                        }
                                    }
                                    td style="padding: 8px; border-bottom: 1px solid #f3f4f6;" {
                                        a href=(format!("/categories?edit={}", category.id)) { "Edit" }
                                        " "
                                        details style="display: inline-block;" {
                                            summary style="cursor: pointer; color: #dc2626; font-size: 0.88em;" { "Delete" }
                                            form action=(format!("/categories/{}/delete", category.id)) method="post"
                                                onsubmit="return confirm('Delete this category?');"
                                                style="display: flex; gap: 8px; align-items: center; margin-top: 6px;"
                                            {
                                                select name="acting_user_id" required {
                                                    @for (id, name) in &vm.users {
                                                        option value=(id) { (name) }
                                                    }
                                                }
                                                button type="submit" class="btn danger" { "Delete" }
                                            }
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

fn priority_tag(priority: &str) -> Markup {
    let (label, color) = match Priority::parse(priority) {
        Ok(p) => (
            p.label(),
            match p {
                Priority::Low => "#6b7280",
                Priority::Medium => "#b45309",
                Priority::High => "#b91c1c",
            },
        ),
        Err(_) => ("Medium", "#b45309"),
    };

    html! {
        span class="badge" style=(format!("background: {color};")) { (label) }
    }
}
