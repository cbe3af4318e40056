use crate::db::complaints::ComplaintRow;
use crate::domain::options::{Privacy, ALL_PRIVACIES};
use crate::templates::components::flash_alert;
use crate::templates::desktop_layout;
use maud::{html, Markup, PreEscaped};
use std::collections::HashMap;

// Wires the two lookup buttons to the /geocode proxy.
const GEOCODE_JS: &str = r#"
function lookupAddress() {
  const q = document.getElementById('address').value.trim();
  if (!q) return;
  fetch('/geocode?q=' + encodeURIComponent(q))
    .then(r => { if (!r.ok) throw new Error('lookup failed'); return r.json(); })
    .then(places => {
      if (!places.length) { alert('Address not found'); return; }
      document.getElementById('latitude').value = places[0].lat;
      document.getElementById('longitude').value = places[0].lon;
      document.getElementById('address').value = places[0].display_name;
    })
    .catch(() => alert('Address lookup failed'));
}
function lookupCoordinates() {
  const lat = document.getElementById('latitude').value.trim();
  const lon = document.getElementById('longitude').value.trim();
  if (!lat || !lon) return;
  fetch('/geocode?lat=' + encodeURIComponent(lat) + '&lon=' + encodeURIComponent(lon))
    .then(r => { if (!r.ok) throw new Error('lookup failed'); return r.json(); })
    .then(place => { document.getElementById('address').value = place.display_name; })
    .catch(() => alert('No address found for these coordinates'));
}
"#;

pub struct ComplaintFormVm {
    /// None renders the create form, Some the edit form.
    pub complaint: Option<ComplaintRow>,
    pub categories: Vec<(i64, String)>,
    pub users: Vec<(i64, String)>,
    pub query: HashMap<String, String>,
}

pub fn complaint_form_page(vm: &ComplaintFormVm) -> Markup {
    let (title, action) = match &vm.complaint {
        Some(c) => ("Edit complaint".to_string(), format!("/complaints/{}", c.id)),
        None => ("New complaint".to_string(), "/complaints".to_string()),
    };

    let privacy = vm
        .complaint
        .as_ref()
        .and_then(|c| Privacy::parse(&c.privacy).ok())
        .unwrap_or(Privacy::Public);

    desktop_layout(
        &title,
        html! {
            main class="container" {
                (flash_alert(&vm.query))

                h1 { (title) }

                @if let Some(complaint) = &vm.complaint {
                    p {
                        a href=(format!("/complaints/{}/tracking", complaint.id)) { "Status tracking" }
                        " · "
                        a href=(format!("/complaints/{}/comments", complaint.id)) { "Comments" }
                        " · "
                        a href=(format!("/complaints/{}/attachments", complaint.id)) { "Attachments" }
                    }
                }

                div class="card" {
                    form action=(action) method="post" style="display: flex; flex-direction: column; gap: 12px; max-width: 640px;" {
                        div {
                            label for="title" { "Title" }
                            br;
                            input type="text" name="title" id="title" required style="width: 100%; box-sizing: border-box;"
                                value=(vm.complaint.as_ref().map(|c| c.title.as_str()).unwrap_or(""));
                        }

                        div {
                            label for="description" { "Description" }
                            br;
                            textarea name="description" id="description" rows="5" required style="width: 100%; box-sizing: border-box;" {
                                (vm.complaint.as_ref().map(|c| c.description.as_str()).unwrap_or(""))
                            }
                        }

                        div {
                            label for="category_id" { "Category" }
                            br;
                            select name="category_id" id="category_id" required {
                                @for (id, name) in &vm.categories {
                                    option value=(id) selected[vm.complaint.as_ref().map(|c| c.category_id) == Some(*id)] { (name) }
                                }
                            }
                        }

                        @match &vm.complaint {
                            Some(complaint) => div {
                                label { "Reporter" }
                                br;
                                span { (complaint.user_name) }
                            },
                            None => div {
                                label for="user_id" { "Reporter" }
                                br;
                                select name="user_id" id="user_id" required {
                                    @for (id, name) in &vm.users {
                                        option value=(id) { (name) }
                                    }
                                }
                            },
                        }

                        div {
                            label for="address" { "Address" }
                            br;
                            div style="display: flex; gap: 8px;" {
                                input type="text" name="address" id="address" style="flex: 1;"
                                    value=(vm.complaint.as_ref().and_then(|c| c.address.as_deref()).unwrap_or(""));
                                button type="button" class="btn secondary" onclick="lookupAddress()" { "Look up" }
                            }
                        }

                        div style="display: flex; gap: 8px; align-items: flex-end;" {
                            div {
                                label for="latitude" { "Latitude" }
                                br;
                                input type="text" name="latitude" id="latitude" inputmode="decimal"
                                    value=(vm.complaint.as_ref().and_then(|c| c.latitude).map(|v| v.to_string()).unwrap_or_default());
                            }
                            div {
                                label for="longitude" { "Longitude" }
                                br;
                                input type="text" name="longitude" id="longitude" inputmode="decimal"
                                    value=(vm.complaint.as_ref().and_then(|c| c.longitude).map(|v| v.to_string()).unwrap_or_default());
                            }
                            button type="button" class="btn secondary" onclick="lookupCoordinates()" { "Address from coordinates" }
                        }

                        div {
                            label { "Privacy" }
                            br;
                            @for option in ALL_PRIVACIES {
                                label style="margin-right: 1rem; font-weight: normal;" {
                                    input type="radio" name="privacy" value=(option.as_str()) checked[privacy == option];
                                    " " (option.label())
                                }
                            }
                        }

                        @if let Some(complaint) = &vm.complaint {
                            div {
                                label for="acting_user_id" { "Acting as" }
                                br;
                                select name="acting_user_id" id="acting_user_id" required {
                                    @for (id, name) in &vm.users {
                                        option value=(id) selected[*id == complaint.user_id] { (name) }
                                    }
                                }
                                p style="color: #6b7280; font-size: 0.85em; margin: 4px 0 0;" {
                                    "Only the reporter or an administrator can change a complaint."
                                }
                            }
                        }

                        div {
                            button type="submit" class="btn" {
                                @if vm.complaint.is_some() { "Save changes" } @else { "Create complaint" }
                            }
                            " "
                            a href="/complaints" class="btn secondary" { "Cancel" }
                        }
                    }
                }

                @if let Some(complaint) = &vm.complaint {
                    div class="card" style="border-color: #fecaca;" {
                        h3 { "Delete complaint" }
                        p style="color: #6b7280;" {
                            "Removes the complaint with its status history, comments and attachments."
                        }
                        form action=(format!("/complaints/{}/delete", complaint.id)) method="post"
                            onsubmit="return confirm('Delete this complaint and all its history?');"
                            style="display: flex; gap: 8px; align-items: center;"
                        {
                            label for="delete_acting_user_id" { "Acting as" }
                            select name="acting_user_id" id="delete_acting_user_id" required {
                                @for (id, name) in &vm.users {
                                    option value=(id) selected[*id == complaint.user_id] { (name) }
                                }
                            }
                            button type="submit" class="btn danger" { "Delete" }
                        }
                    }
                }

                script { (PreEscaped(GEOCODE_JS)) }
            }
        },
    )
}
