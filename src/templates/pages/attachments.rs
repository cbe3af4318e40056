use crate::db::attachments::AttachmentRow;
use crate::db::complaints::ComplaintRow;
use crate::domain::timefmt::time_ago;
use crate::templates::components::flash_alert;
use crate::templates::desktop_layout;
use chrono::NaiveDateTime;
use maud::{html, Markup, PreEscaped};
use std::collections::HashMap;

// Posts the picked file as the raw request body; name, type and actor
// travel in the query string and headers.
const UPLOAD_JS: &str = r#"
function uploadFile() {
  const card = document.getElementById('upload-card');
  const input = document.getElementById('file');
  const file = input.files[0];
  if (!file) { alert('Pick a file first'); return; }

  const actor = document.getElementById('acting_user_id').value;
  const url = '/complaints/' + card.dataset.complaint + '/attachments'
    + '?filename=' + encodeURIComponent(file.name)
    + '&acting_user_id=' + encodeURIComponent(actor);

  fetch(url, {
    method: 'POST',
    headers: { 'Content-Type': file.type || 'application/octet-stream' },
    body: file
  }).then(r => {
    if (r.redirected) { window.location = r.url; }
    else { alert('Upload failed'); }
  }).catch(() => alert('Upload failed'));
}
"#;

pub struct AttachmentsVm {
    pub complaint: ComplaintRow,
    pub attachments: Vec<AttachmentRow>,
    pub users: Vec<(i64, String)>,
    pub query: HashMap<String, String>,
    pub now: NaiveDateTime,
}

pub fn attachments_page(vm: &AttachmentsVm) -> Markup {
    desktop_layout(
        "Attachments",
        html! {
            main class="container" {
                (flash_alert(&vm.query))

                h1 { "Attachments" }
                p style="color: #6b7280; margin-top: 0.25rem;" {
                    "On " a href=(format!("/complaints/{}/tracking", vm.complaint.id)) { (vm.complaint.title) }
                }

                div class="card" id="upload-card" data-complaint=(vm.complaint.id) {
                    h3 { "Upload a file" }
                    p style="color: #6b7280; font-size: 0.9em;" {
                        "Images, PDF and Office documents up to 5 MB."
                    }
                    div style="display: flex; gap: 10px; align-items: flex-end; flex-wrap: wrap;" {
                        input type="file" id="file";
                        div {
                            label for="acting_user_id" { "Uploading as" }
                            br;
                            select id="acting_user_id" required {
                                @for (id, name) in &vm.users {
                                    option value=(id) { (name) }
                                }
                            }
                        }
                        button type="button" class="btn" onclick="uploadFile()" { "Upload" }
                    }
                }

                div class="card" {
                    h3 { "Files" }

                    @if vm.attachments.is_empty() {
                        p style="color: #6b7280;" { "Nothing attached yet." }
                    } @else {
                        table style="width: 100%; border-collapse: collapse;" {
                            thead {
                                tr {
                                    th style="padding: 8px; border-bottom: 2px solid #e5e7eb; text-align: left;" { "Name" }
                                    th style="padding: 8px; border-bottom: 2px solid #e5e7eb; text-align: left;" { "Type" }
                                    th style="padding: 8px; border-bottom: 2px solid #e5e7eb; text-align: left;" { "Size" }
                                    th style="padding: 8px; border-bottom: 2px solid #e5e7eb; text-align: left;" { "Uploaded" }
                                    th style="padding: 8px; border-bottom: 2px solid #e5e7eb; text-align: left;" { "Actions" }
                                }
                            }
                            tbody {
                                @for attachment in &vm.attachments {
                                    tr {
                                        td style="padding: 8px; border-bottom: 1px solid #f3f4f6;" {
                                            a href=(format!("/attachments/{}", attachment.id)) { (attachment.original_name) }
                                        }
                                        td style="padding: 8px; border-bottom: 1px solid #f3f4f6; color: #6b7280;" {
                                            (attachment.content_type)
                                        }
                                        td style="padding: 8px; border-bottom: 1px solid #f3f4f6;" { (attachment.size_label()) }
                                        td style="padding: 8px; border-bottom: 1px solid #f3f4f6; color: #6b7280;" {
                                            (time_ago(attachment.created_at, vm.now))
                                        }
                                        td style="padding: 8px; border-bottom: 1px solid #f3f4f6;" {
                                            details {
                                                summary style="cursor: pointer; color: #dc2626; font-size: 0.88em;" { "Delete" }
                                                form action=(format!("/attachments/{}/delete", attachment.id)) method="post"
                                                    onsubmit="return confirm('Delete this file?');"
                                                    style="display: flex; gap: 8px; align-items: center; margin-top: 6px;"
                                                {
                                                    select name="acting_user_id" required {
                                                        @for (id, name) in &vm.users {
                                                            option value=(id) selected[*id == vm.complaint.user_id] { (name) }
                                                        }
                                                    }
                                                    button type="submit" class="btn danger" { "Delete file" }
                                                }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }

                script { (PreEscaped(UPLOAD_JS)) }
            }
        },
    )
}
