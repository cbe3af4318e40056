use crate::db::users::UserRow;
use crate::domain::options::{Role, ALL_ROLES};
use crate::domain::timefmt::time_ago;
use crate::templates::components::{flash_alert, role_tag};
use crate::templates::desktop_layout;
use chrono::NaiveDateTime;
use maud::{html, Markup};
use std::collections::HashMap;

pub struct UsersVm {
    pub accounts: Vec<UserRow>,
    /// Set when the form should edit an existing account instead of creating.
    pub editing: Option<UserRow>,
    pub users: Vec<(i64, String)>,
    pub query: HashMap<String, String>,
    pub now: NaiveDateTime,
}

pub fn users_page(vm: &UsersVm) -> Markup {
    let (form_title, action) = match &vm.editing {
        Some(user) => ("Edit account", format!("/users/{}", user.id)),
        None => ("New account", "/users".to_string()),
    };

    let selected_role = vm
        .editing
        .as_ref()
        .and_then(|u| Role::parse(&u.role).ok())
        .unwrap_or(Role::User);

    desktop_layout(
        "Users",
        html! {
            main class="container" {
                (flash_alert(&vm.query))

                h1 { "Users" }
                p style="color: #6b7280; margin-top: 0.25rem;" {
                    "Changes here require an administrator account. Accounts are deactivated, never removed."
                }

                div class="card" {
                    h3 { (form_title) }
                    form action=(action) method="post" style="display: flex; flex-direction: column; gap: 10px; max-width: 560px;" {
                        div {
                            label for="name" { "Name" }
                            br;
                            input type="text" name="name" id="name" required style="width: 100%; box-sizing: border-box;"
                                value=(vm.editing.as_ref().map(|u| u.name.as_str()).unwrap_or(""));
                        }
                        div {
                            label for="email" { "Email" }
                            br;
                            input type="email" name="email" id="email" required style="width: 100%; box-sizing: border-box;"
                                value=(vm.editing.as_ref().map(|u| u.email.as_str()).unwrap_or(""));
                        }
                        div {
                            label for="phone" { "Phone" }
                            br;
                            input type="text" name="phone" id="phone"
                                value=(vm.editing.as_ref().and_then(|u| u.phone.as_deref()).unwrap_or(""));
                        }
                        div style="display: flex; gap: 10px; align-items: flex-end; flex-wrap: wrap;" {
                            div {
                                label for="role" { "Role" }
                                br;
                                select name="role" id="role" {
                                    @for role in ALL_ROLES {
                                        option value=(role.as_str()) selected[role == selected_role] { (role.label()) }
                                    }
                                }
                            }
                            @if vm.editing.is_none() {
                                div {
                                    label for="password" { "Password" }
                                    br;
                                    input type="password" name="password" id="password" required;
                                }
                            } @else {
                                label style="font-weight: normal;" {
                                    input type="checkbox" name="active" value="1"
                                        checked[vm.editing.as_ref().map(|u| u.active).unwrap_or(true)];
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
                                a href="/users" class="btn secondary" { "Cancel" }
                            }
                        }
                    }

                    @if let Some(user) = &vm.editing {
                        details style="margin-top: 0.75rem;" {
                            summary style="cursor: pointer; color: #047857; font-size: 0.9em;" { "Set a new password" }
                            form action=(format!("/users/{}/password", user.id)) method="post"
                                style="display: flex; gap: 8px; align-items: center; margin-top: 6px; flex-wrap: wrap;"
                            {
                                input type="password" name="password" required placeholder="New password";
                                select name="acting_user_id" required {
                                    @for (id, name) in &vm.users {
                                        option value=(id) { (name) }
                                    }
                                }
                                button type="submit" class="btn secondary" { "Set password" }
                            }
                        }
                    }
                }

                div class="card" {
                    table style="width: 100%; border-collapse: collapse;" {
                        thead {
                            tr {
                                th style="padding: 8px; border-bottom: 2px solid #e5e7eb; text-align: left;" { "Name" }
                                th style="padding: 8px; border-bottom: 2px solid #e5e7eb; text-align: left;" { "Email" }
                                th style="padding: 8px; border-bottom: 2px solid #e5e7eb; text-align: left;" { "Phone" }
                                th style="padding: 8px; border-bottom: 2px solid #e5e7eb; text-align: left;" { "Role" }
                                th style="padding: 8px; border-bottom: 2px solid #e5e7eb; text-align: left;" { "Joined" }
                                th style="padding: 8px; border-bottom: 2px solid #e5e7eb; text-align: left;" { "Actions" }
                            }
                        }
                        tbody {
                            @for user in &vm.accounts {
                                tr style=(if user.active { "" } else { "opacity: 0.5;" }) {
                                    td style="padding: 8px; border-bottom: 1px solid #f3f4f6;" {
                                        (user.name)
                                        @if !user.active {
                                            " "
                                            span style="color: #6b7280; font-size: 0.8em;" { "(inactive)" }
                                        }
                                    }
                                    td style="padding: 8px; border-bottom: 1px solid #f3f4f6;" { (user.email) }
                                    td style="padding: 8px; border-bottom: 1px solid #f3f4f6; color: #6b7280;" {
                                        (user.phone.as_deref().unwrap_or(""))
                                    }
                                    td style="padding: 8px; border-bottom: 1px solid #f3f4f6;" { (role_tag(&user.role)) }
                                    td style="padding: 8px; border-bottom: 1px solid #f3f4f6; color: #6b7280;" {
                                        (time_ago(user.created_at, vm.now))
                                    }
                                    td style="padding: 8px; border-bottom: 1px solid #f3f4f6;" {
                                        a href=(format!("/users?edit={}", user.id)) { "Edit" }
                                        @if user.active {
                                            " "
                                            details style="display: inline-block;" {
                                                summary style="cursor: pointer; color: #dc2626; font-size: 0.88em;" { "Deactivate" }
                                                form action=(format!("/users/{}/deactivate", user.id)) method="post"
                                                    onsubmit="return confirm('Deactivate this account?');"
                                                    style="display: flex; gap: 8px; align-items: center; margin-top: 6px;"
                                                {
                                                    select name="acting_user_id" required {
                                                        @for (id, name) in &vm.users {
                                                            option value=(id) { (name) }
                                                        }
                                                    }
                                                    button type="submit" class="btn danger" { "Deactivate" }
                                                }
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
