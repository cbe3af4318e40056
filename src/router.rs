// src/router.rs

use std::collections::HashMap;
use std::fs;
use std::io::Read;

use astra::Request;
use chrono::Utc;
use rusqlite::Connection;
use url::form_urlencoded;

use crate::db::comments::CommentOrder;
use crate::db::complaints::{ComplaintFilters, ComplaintRow, ComplaintUpdate, NewComplaint};
use crate::db::{attachments, categories, comments, complaints, transitions, users, Database};
use crate::domain::authz;
use crate::domain::options::{Priority, Privacy, Role};
use crate::domain::status::Status;
use crate::domain::uploads::UploadPolicy;
use crate::errors::ServerError;
use crate::geocode::GeocodeClient;
use crate::responses::{download_response, flash_redirect, html_response, json_response, ResultResp};
use crate::templates::pages::{
    attachments_page, categories_page, comments_page, complaint_form_page, complaints_list_page,
    dashboard_page, tracking_page, users_page, AttachmentsVm, CategoriesVm, CommentsVm,
    ComplaintFormVm, ComplaintListVm, DashboardVm, TrackingVm, UsersVm,
};

/// Where uploaded evidence files land. main() creates it at startup.
pub const UPLOAD_DIR: &str = "uploads";

/// How many complaints the dashboard lists.
const RECENT_LIMIT: i64 = 8;

pub fn handle(req: Request, db: &Database) -> ResultResp {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let query = parse_query(&req);

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    match (method.as_str(), segments.as_slice()) {
        ("GET", []) => dashboard(db),

        ("GET", ["complaints"]) => complaints_index(db, &query),
        ("GET", ["complaints", "new"]) => new_complaint(db, &query),
        ("POST", ["complaints"]) => create_complaint(req, db),
        ("GET", ["complaints", id, "edit"]) => edit_complaint(db, parse_id(id)?, &query),
        ("POST", ["complaints", id]) => update_complaint(req, db, parse_id(id)?),
        ("POST", ["complaints", id, "delete"]) => delete_complaint(req, db, parse_id(id)?),

        ("GET", ["complaints", id, "tracking"]) => tracking(db, parse_id(id)?, &query),
        ("POST", ["complaints", id, "tracking"]) => record_status_change(req, db, parse_id(id)?),
        ("POST", ["transitions", id, "delete"]) => undo_status_change(req, db, parse_id(id)?),
        ("POST", ["transitions", id, "comment"]) => edit_status_note(req, db, parse_id(id)?),

        ("GET", ["complaints", id, "comments"]) => comments_screen(db, parse_id(id)?, &query),
        ("POST", ["complaints", id, "comments"]) => add_comment(req, db, parse_id(id)?),
        ("POST", ["comments", id]) => edit_comment(req, db, parse_id(id)?),
        ("POST", ["comments", id, "delete"]) => remove_comment(req, db, parse_id(id)?),

        ("GET", ["complaints", id, "attachments"]) => attachments_screen(db, parse_id(id)?, &query),
        ("POST", ["complaints", id, "attachments"]) => {
            upload_attachment(req, db, parse_id(id)?, &query)
        }
        ("GET", ["attachments", id]) => download_attachment(db, parse_id(id)?),
        ("POST", ["attachments", id, "delete"]) => remove_attachment(req, db, parse_id(id)?),

        ("GET", ["categories"]) => categories_screen(db, &query),
        ("POST", ["categories"]) => save_category(req, db, None),
        ("POST", ["categories", id]) => save_category(req, db, Some(parse_id(id)?)),
        ("POST", ["categories", id, "delete"]) => remove_category(req, db, parse_id(id)?),

        ("GET", ["users"]) => users_screen(db, &query),
        ("POST", ["users"]) => save_user(req, db, None),
        ("POST", ["users", id]) => save_user(req, db, Some(parse_id(id)?)),
        ("POST", ["users", id, "deactivate"]) => deactivate_account(req, db, parse_id(id)?),
        ("POST", ["users", id, "password"]) => change_password(req, db, parse_id(id)?),

        ("GET", ["geocode"]) => geocode_lookup(&query),

        _ => Err(ServerError::NotFound),
    }
}

fn dashboard(db: &Database) -> ResultResp {
    let (status_counts, recent) = db.with_conn(|conn| {
        Ok((
            complaints::status_counts(conn)?,
            complaints::recent_complaints(conn, RECENT_LIMIT)?,
        ))
    })?;

    let total = status_counts.iter().map(|(_, n)| *n).sum();

    html_response(dashboard_page(&DashboardVm {
        total,
        status_counts,
        recent,
        now: Utc::now().naive_utc(),
    }))
}

fn complaints_index(db: &Database, query: &HashMap<String, String>) -> ResultResp {
    let filters = ComplaintFilters {
        status: match query.get("status").filter(|v| !v.is_empty()) {
            Some(raw) => Some(Status::parse(raw)?),
            None => None,
        },
        category_id: optional_id_param(query, "category_id")?,
        user_id: optional_id_param(query, "user_id")?,
        search: query
            .get("search")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
    };

    let (rows, category_opts, user_opts) = db.with_conn(|conn| {
        Ok((
            complaints::list_complaints(conn, &filters)?,
            categories::category_options(conn)?,
            users::user_options(conn)?,
        ))
    })?;

    html_response(complaints_list_page(&ComplaintListVm {
        complaints: rows,
        categories: category_opts,
        users: user_opts,
        filters,
        query: query.clone(),
        now: Utc::now().naive_utc(),
    }))
}

fn new_complaint(db: &Database, query: &HashMap<String, String>) -> ResultResp {
    let (category_opts, user_opts) = db.with_conn(|conn| {
        Ok((
            categories::category_options(conn)?,
            users::user_options(conn)?,
        ))
    })?;

    html_response(complaint_form_page(&ComplaintFormVm {
        complaint: None,
        categories: category_opts,
        users: user_opts,
        query: query.clone(),
    }))
}

fn edit_complaint(db: &Database, id: i64, query: &HashMap<String, String>) -> ResultResp {
    let (complaint, category_opts, user_opts) = db.with_conn(|conn| {
        Ok((
            require_complaint(conn, id)?,
            categories::category_options(conn)?,
            users::user_options(conn)?,
        ))
    })?;

    html_response(complaint_form_page(&ComplaintFormVm {
        complaint: Some(complaint),
        categories: category_opts,
        users: user_opts,
        query: query.clone(),
    }))
}

fn create_complaint(req: Request, db: &Database) -> ResultResp {
    let form = read_form(req)?;

    let attempt = db.with_conn(|conn| {
        let user_id = require_id_field(&form, "user_id")?;
        known_user_role(conn, user_id)?;

        let new = NewComplaint {
            title: require_field(&form, "title")?.to_string(),
            description: require_field(&form, "description")?.to_string(),
            user_id,
            category_id: require_id_field(&form, "category_id")?,
            address: optional_field(&form, "address").map(str::to_string),
            latitude: optional_f64(&form, "latitude")?,
            longitude: optional_f64(&form, "longitude")?,
            privacy: Privacy::parse(require_field(&form, "privacy")?)?,
        };

        complaints::insert_complaint(conn, &new, Utc::now().naive_utc())
    });

    match attempt {
        Ok(id) => flash_redirect(
            &format!("/complaints/{id}/edit"),
            &format!("Complaint #{id} created"),
            "success",
        ),
        Err(err) => form_failure(err, "/complaints/new"),
    }
}

fn update_complaint(req: Request, db: &Database, id: i64) -> ResultResp {
    let form = read_form(req)?;
    let existing = db.with_conn(|conn| require_complaint(conn, id))?;
    let back = format!("/complaints/{id}/edit");

    let attempt = db.with_conn(|conn| {
        require_owner_or_admin(
            conn,
            &form,
            existing.user_id,
            "Only the reporter or an administrator can change a complaint",
        )?;

        let update = ComplaintUpdate {
            title: require_field(&form, "title")?.to_string(),
            description: require_field(&form, "description")?.to_string(),
            category_id: require_id_field(&form, "category_id")?,
            address: optional_field(&form, "address").map(str::to_string),
            latitude: optional_f64(&form, "latitude")?,
            longitude: optional_f64(&form, "longitude")?,
            privacy: Privacy::parse(require_field(&form, "privacy")?)?,
        };

        complaints::update_complaint(conn, id, &update, Utc::now().naive_utc())
    });

    match attempt {
        Ok(()) => flash_redirect(&back, "Changes saved", "success"),
        Err(err) => form_failure(err, &back),
    }
}

fn delete_complaint(req: Request, db: &Database, id: i64) -> ResultResp {
    let form = read_form(req)?;
    let existing = db.with_conn(|conn| require_complaint(conn, id))?;
    let back = format!("/complaints/{id}/edit");

    let attempt = db.with_conn(|conn| {
        require_owner_or_admin(
            conn,
            &form,
            existing.user_id,
            "Only the reporter or an administrator can delete a complaint",
        )?;
        complaints::delete_complaint(conn, id)
    });

    match attempt {
        Ok(stored_paths) => {
            // Rows are gone; orphaned files are only worth a log line.
            for path in stored_paths {
                if let Err(e) = fs::remove_file(&path) {
                    eprintln!("Failed to unlink {path}: {e}");
                }
            }
            flash_redirect(
                "/complaints",
                &format!("Deleted \"{}\"", existing.title),
                "success",
            )
        }
        Err(err) => form_failure(err, &back),
    }
}

fn tracking(db: &Database, complaint_id: i64, query: &HashMap<String, String>) -> ResultResp {
    let (complaint, rows, user_opts) = db.with_conn(|conn| {
        Ok((
            require_complaint(conn, complaint_id)?,
            transitions::list_transitions(conn, complaint_id)?,
            users::user_options(conn)?,
        ))
    })?;

    html_response(tracking_page(&TrackingVm {
        complaint,
        transitions: rows,
        users: user_opts,
        query: query.clone(),
        now: Utc::now().naive_utc(),
    }))
}

fn record_status_change(req: Request, db: &Database, complaint_id: i64) -> ResultResp {
    let form = read_form(req)?;
    db.with_conn(|conn| require_complaint(conn, complaint_id))?;
    let back = format!("/complaints/{complaint_id}/tracking");

    let attempt = db.with_conn(|conn| {
        let (acting_user_id, _) = acting_role(conn, &form)?;
        let new_status = require_field(&form, "new_status")?;
        let comment = optional_field(&form, "comment");

        transitions::record_transition(
            conn,
            complaint_id,
            acting_user_id,
            new_status,
            comment,
            Utc::now().naive_utc(),
        )
    });

    match attempt {
        Ok(_) => flash_redirect(&back, "Status updated", "success"),
        Err(err) => form_failure(err, &back),
    }
}

fn undo_status_change(req: Request, db: &Database, transition_id: i64) -> ResultResp {
    let form = read_form(req)?;

    let (complaint_id, owner_id) = db
        .with_conn(|conn| transitions::transition_owner(conn, transition_id))?
        .ok_or(ServerError::NotFound)?;
    let back = format!("/complaints/{complaint_id}/tracking");

    let attempt = db.with_conn(|conn| {
        require_owner_or_admin(
            conn,
            &form,
            owner_id,
            "Only the recorder or an administrator can undo an entry",
        )?;
        transitions::delete_latest_transition(conn, transition_id, Utc::now().naive_utc())
    });

    match attempt {
        Ok(()) => flash_redirect(&back, "Status entry removed", "success"),
        Err(err) => form_failure(err, &back),
    }
}

fn edit_status_note(req: Request, db: &Database, transition_id: i64) -> ResultResp {
    let form = read_form(req)?;

    let (complaint_id, owner_id) = db
        .with_conn(|conn| transitions::transition_owner(conn, transition_id))?
        .ok_or(ServerError::NotFound)?;
    let back = format!("/complaints/{complaint_id}/tracking");

    let attempt = db.with_conn(|conn| {
        require_owner_or_admin(
            conn,
            &form,
            owner_id,
            "Only the recorder or an administrator can edit this note",
        )?;
        transitions::update_transition_comment(conn, transition_id, optional_field(&form, "comment"))
    });

    match attempt {
        Ok(()) => flash_redirect(&back, "Note updated", "success"),
        Err(err) => form_failure(err, &back),
    }
}

fn comments_screen(db: &Database, complaint_id: i64, query: &HashMap<String, String>) -> ResultResp {
    let order = CommentOrder::from_query(query.get("order").map(String::as_str));

    let (complaint, rows, user_opts) = db.with_conn(|conn| {
        Ok((
            require_complaint(conn, complaint_id)?,
            comments::list_comments(conn, complaint_id, order)?,
            users::user_options(conn)?,
        ))
    })?;

    html_response(comments_page(&CommentsVm {
        complaint,
        comments: rows,
        users: user_opts,
        order,
        query: query.clone(),
        now: Utc::now().naive_utc(),
    }))
}

fn add_comment(req: Request, db: &Database, complaint_id: i64) -> ResultResp {
    let form = read_form(req)?;
    db.with_conn(|conn| require_complaint(conn, complaint_id))?;
    let back = format!("/complaints/{complaint_id}/comments");

    let attempt = db.with_conn(|conn| {
        let user_id = require_id_field(&form, "user_id")?;
        known_user_role(conn, user_id)?;
        let body = require_field(&form, "body")?;

        comments::insert_comment(conn, complaint_id, user_id, body, Utc::now().naive_utc())
    });

    match attempt {
        Ok(_) => flash_redirect(&back, "Comment posted", "success"),
        Err(err) => form_failure(err, &back),
    }
}

fn edit_comment(req: Request, db: &Database, comment_id: i64) -> ResultResp {
    let form = read_form(req)?;

    let existing = db
        .with_conn(|conn| comments::get_comment(conn, comment_id))?
        .ok_or(ServerError::NotFound)?;
    let back = format!("/complaints/{}/comments", existing.complaint_id);

    let attempt = db.with_conn(|conn| {
        require_owner_or_admin(
            conn,
            &form,
            existing.user_id,
            "Only the author or an administrator can edit a comment",
        )?;
        let body = require_field(&form, "body")?;
        comments::update_comment(conn, comment_id, body, Utc::now().naive_utc())
    });

    match attempt {
        Ok(()) => flash_redirect(&back, "Comment updated", "success"),
        Err(err) => form_failure(err, &back),
    }
}

fn remove_comment(req: Request, db: &Database, comment_id: i64) -> ResultResp {
    let form = read_form(req)?;

    let existing = db
        .with_conn(|conn| comments::get_comment(conn, comment_id))?
        .ok_or(ServerError::NotFound)?;
    let back = format!("/complaints/{}/comments", existing.complaint_id);

    let attempt = db.with_conn(|conn| {
        require_owner_or_admin(
            conn,
            &form,
            existing.user_id,
            "Only the author or an administrator can delete a comment",
        )?;
        comments::delete_comment(conn, comment_id)
    });

    match attempt {
        Ok(()) => flash_redirect(&back, "Comment deleted", "success"),
        Err(err) => form_failure(err, &back),
    }
}

fn attachments_screen(
    db: &Database,
    complaint_id: i64,
    query: &HashMap<String, String>,
) -> ResultResp {
    let (complaint, rows, user_opts) = db.with_conn(|conn| {
        Ok((
            require_complaint(conn, complaint_id)?,
            attachments::list_attachments(conn, complaint_id)?,
            users::user_options(conn)?,
        ))
    })?;

    html_response(attachments_page(&AttachmentsVm {
        complaint,
        attachments: rows,
        users: user_opts,
        query: query.clone(),
        now: Utc::now().naive_utc(),
    }))
}

fn upload_attachment(
    req: Request,
    db: &Database,
    complaint_id: i64,
    query: &HashMap<String, String>,
) -> ResultResp {
    let back = format!("/complaints/{complaint_id}/attachments");

    match store_upload(req, db, complaint_id, query) {
        Ok(original_name) => {
            flash_redirect(&back, &format!("Uploaded {original_name}"), "success")
        }
        Err(err) => form_failure(err, &back),
    }
}

/// The page script posts the picked file as the raw body; filename and
/// actor arrive as query parameters. The file hits disk first and is
/// removed again if the metadata row cannot be inserted.
fn store_upload(
    req: Request,
    db: &Database,
    complaint_id: i64,
    query: &HashMap<String, String>,
) -> Result<String, ServerError> {
    let original_name = match query.get("filename").map(String::as_str) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => {
            return Err(ServerError::BadRequest(
                "The upload is missing its filename".to_string(),
            ))
        }
    };
    let acting_user_id: i64 = match query.get("acting_user_id").and_then(|v| v.parse().ok()) {
        Some(v) => v,
        None => {
            return Err(ServerError::BadRequest(
                "Missing required field: acting_user_id".to_string(),
            ))
        }
    };
    let content_type = match req.headers().get("content-type").and_then(|v| v.to_str().ok()) {
        Some(v) => v.to_string(),
        None => {
            return Err(ServerError::BadRequest(
                "The upload needs a Content-Type header".to_string(),
            ))
        }
    };

    let mut data = Vec::new();
    req.into_body()
        .reader()
        .read_to_end(&mut data)
        .map_err(|e| ServerError::BadRequest(format!("unreadable upload body: {e}")))?;

    let policy = UploadPolicy::new(UPLOAD_DIR);
    let mime = policy.validate(&content_type, data.len())?;

    db.with_conn(|conn| {
        require_complaint(conn, complaint_id)?;
        known_user_role(conn, acting_user_id)?;
        Ok(())
    })?;

    let stored_name = policy.storage_name_default(complaint_id, &original_name);
    let stored_path = policy.storage_path(&stored_name);
    fs::write(&stored_path, &data).map_err(|e| {
        eprintln!("Failed to write upload {}: {e}", stored_path.display());
        ServerError::InternalError
    })?;

    let inserted = db.with_conn(|conn| {
        attachments::insert_attachment(
            conn,
            complaint_id,
            &original_name,
            &stored_path.to_string_lossy(),
            mime.essence_str(),
            data.len() as i64,
            Utc::now().naive_utc(),
        )
    });

    if let Err(err) = inserted {
        if let Err(unlink_err) = fs::remove_file(&stored_path) {
            eprintln!(
                "Failed to remove orphaned upload {}: {unlink_err}",
                stored_path.display()
            );
        }
        return Err(err);
    }

    Ok(original_name)
}

fn download_attachment(db: &Database, id: i64) -> ResultResp {
    let row = db
        .with_conn(|conn| attachments::get_attachment(conn, id))?
        .ok_or(ServerError::NotFound)?;

    let data = fs::read(&row.stored_path).map_err(|e| {
        eprintln!("Missing stored file {}: {e}", row.stored_path);
        ServerError::NotFound
    })?;

    download_response(data, &row.content_type, &row.original_name)
}

fn remove_attachment(req: Request, db: &Database, id: i64) -> ResultResp {
    let form = read_form(req)?;

    let (row, complaint) = db.with_conn(|conn| {
        let row = attachments::get_attachment(conn, id)?.ok_or(ServerError::NotFound)?;
        let complaint = require_complaint(conn, row.complaint_id)?;
        Ok((row, complaint))
    })?;
    let back = format!("/complaints/{}/attachments", complaint.id);

    let attempt = db.with_conn(|conn| {
        require_owner_or_admin(
            conn,
            &form,
            complaint.user_id,
            "Only the reporter or an administrator can remove files",
        )?;
        attachments::delete_attachment(conn, id)
    });

    match attempt {
        Ok(stored_path) => {
            if let Err(e) = fs::remove_file(&stored_path) {
                eprintln!("Failed to unlink {stored_path}: {e}");
            }
            flash_redirect(&back, &format!("Removed {}", row.original_name), "success")
        }
        Err(err) => form_failure(err, &back),
    }
}

fn categories_screen(db: &Database, query: &HashMap<String, String>) -> ResultResp {
    let edit_id = match query.get("edit") {
        Some(raw) => Some(parse_id(raw)?),
        None => None,
    };

    let (rows, editing, user_opts) = db.with_conn(|conn| {
        let rows = categories::list_categories(conn)?;
        let editing = match edit_id {
            Some(id) => Some(categories::get_category(conn, id)?.ok_or(ServerError::NotFound)?),
            None => None,
        };
        Ok((rows, editing, users::user_options(conn)?))
    })?;

    html_response(categories_page(&CategoriesVm {
        categories: rows,
        editing,
        users: user_opts,
        query: query.clone(),
    }))
}

fn save_category(req: Request, db: &Database, id: Option<i64>) -> ResultResp {
    let form = read_form(req)?;
    let back = match id {
        Some(id) => format!("/categories?edit={id}"),
        None => "/categories".to_string(),
    };

    let attempt = db.with_conn(|conn| {
        require_admin(conn, &form, "Only an administrator can manage categories")?;
        let name = require_field(&form, "name")?;
        let description = optional_field(&form, "description");
        let priority = Priority::parse(require_field(&form, "priority")?)?;

        match id {
            Some(id) => {
                let active = form.contains_key("active");
                categories::update_category(conn, id, name, description, priority, active)?;
                Ok("Category updated".to_string())
            }
            None => {
                let new_id = categories::insert_category(conn, name, description, priority)?;
                Ok(format!("Category #{new_id} created"))
            }
        }
    });

    match attempt {
        Ok(message) => flash_redirect("/categories", &message, "success"),
        Err(err) => form_failure(err, &back),
    }
}

fn remove_category(req: Request, db: &Database, id: i64) -> ResultResp {
    let form = read_form(req)?;

    let attempt = db.with_conn(|conn| {
        require_admin(conn, &form, "Only an administrator can manage categories")?;
        categories::delete_category(conn, id)
    });

    match attempt {
        Ok(()) => flash_redirect("/categories", "Category deleted", "success"),
        Err(err) => form_failure(err, "/categories"),
    }
}

fn users_screen(db: &Database, query: &HashMap<String, String>) -> ResultResp {
    let edit_id = match query.get("edit") {
        Some(raw) => Some(parse_id(raw)?),
        None => None,
    };

    let (accounts, editing, user_opts) = db.with_conn(|conn| {
        let accounts = users::list_users(conn)?;
        let editing = match edit_id {
            Some(id) => Some(users::get_user(conn, id)?.ok_or(ServerError::NotFound)?),
            None => None,
        };
        Ok((accounts, editing, users::user_options(conn)?))
    })?;

    html_response(users_page(&UsersVm {
        accounts,
        editing,
        users: user_opts,
        query: query.clone(),
        now: Utc::now().naive_utc(),
    }))
}

fn save_user(req: Request, db: &Database, id: Option<i64>) -> ResultResp {
    let form = read_form(req)?;
    let back = match id {
        Some(id) => format!("/users?edit={id}"),
        None => "/users".to_string(),
    };

    let attempt = db.with_conn(|conn| {
        require_admin(conn, &form, "Only an administrator can manage accounts")?;
        let name = require_field(&form, "name")?;
        let email = require_field(&form, "email")?;
        let phone = optional_field(&form, "phone");
        let role = Role::parse(require_field(&form, "role")?)?;

        match id {
            Some(id) => {
                let active = form.contains_key("active");
                users::update_user(conn, id, name, email, phone, role, active)?;
                Ok("Account updated".to_string())
            }
            None => {
                let password = require_field(&form, "password")?;
                let new_id = users::insert_user(conn, name, email, phone, password, role)?;
                Ok(format!("Account #{new_id} created"))
            }
        }
    });

    match attempt {
        Ok(message) => flash_redirect("/users", &message, "success"),
        Err(err) => form_failure(err, &back),
    }
}

fn deactivate_account(req: Request, db: &Database, user_id: i64) -> ResultResp {
    let form = read_form(req)?;

    let attempt = db.with_conn(|conn| {
        require_admin(conn, &form, "Only an administrator can deactivate accounts")?;
        users::deactivate_user(conn, user_id)
    });

    match attempt {
        Ok(()) => flash_redirect("/users", "Account deactivated", "success"),
        Err(err) => form_failure(err, "/users"),
    }
}

fn change_password(req: Request, db: &Database, user_id: i64) -> ResultResp {
    let form = read_form(req)?;

    let attempt = db.with_conn(|conn| {
        require_owner_or_admin(
            conn,
            &form,
            user_id,
            "Only the account holder or an administrator can set a password",
        )?;
        let password = require_field(&form, "password")?;
        users::set_password(conn, user_id, password)
    });

    match attempt {
        Ok(()) => flash_redirect("/users", "Password updated", "success"),
        Err(err) => form_failure(err, "/users"),
    }
}

/// Proxies the complaint form's lookup buttons. `q` searches an
/// address; `lat` + `lon` name a point. Answers JSON either way.
fn geocode_lookup(query: &HashMap<String, String>) -> ResultResp {
    let client = GeocodeClient::new()?;

    if let Some(q) = query.get("q").map(|v| v.trim()).filter(|v| !v.is_empty()) {
        let places = client.search(q, 1)?;
        return json_response(&places);
    }

    match (query.get("lat"), query.get("lon")) {
        (Some(lat), Some(lon)) => {
            let lat: f64 = lat
                .parse()
                .map_err(|_| ServerError::BadRequest("Invalid latitude".to_string()))?;
            let lon: f64 = lon
                .parse()
                .map_err(|_| ServerError::BadRequest("Invalid longitude".to_string()))?;
            let place = client.reverse(lat, lon)?;
            json_response(&place)
        }
        _ => Err(ServerError::BadRequest(
            "Provide q for a search or lat and lon for a reverse lookup".to_string(),
        )),
    }
}

/// Expected form mistakes go back to the page as a flash banner;
/// everything else bubbles to the error page.
fn form_failure(err: ServerError, back: &str) -> ResultResp {
    match err {
        ServerError::BadRequest(msg) | ServerError::Unauthorized(msg) => {
            flash_redirect(back, &msg, "error")
        }
        ServerError::InvalidStatus(_) | ServerError::NotLatest => {
            flash_redirect(back, &err.to_string(), "error")
        }
        other => Err(other),
    }
}

fn require_complaint(conn: &Connection, complaint_id: i64) -> Result<ComplaintRow, ServerError> {
    complaints::get_complaint(conn, complaint_id)?.ok_or(ServerError::NotFound)
}

/// Forms name their actor explicitly. An unknown id is an authorization
/// problem, not a missing page.
fn known_user_role(conn: &Connection, user_id: i64) -> Result<Role, ServerError> {
    match users::user_role(conn, user_id) {
        Ok(role) => Ok(role),
        Err(ServerError::NotFound) => Err(ServerError::Unauthorized(
            "Unknown acting user".to_string(),
        )),
        Err(e) => Err(e),
    }
}

fn acting_role(
    conn: &Connection,
    form: &HashMap<String, String>,
) -> Result<(i64, Role), ServerError> {
    let acting_user_id = require_id_field(form, "acting_user_id")?;
    Ok((acting_user_id, known_user_role(conn, acting_user_id)?))
}

fn require_admin(
    conn: &Connection,
    form: &HashMap<String, String>,
    denial: &str,
) -> Result<i64, ServerError> {
    let (acting_user_id, role) = acting_role(conn, form)?;
    if role != Role::Admin {
        return Err(ServerError::Unauthorized(denial.to_string()));
    }
    Ok(acting_user_id)
}

fn require_owner_or_admin(
    conn: &Connection,
    form: &HashMap<String, String>,
    owner_id: i64,
    denial: &str,
) -> Result<i64, ServerError> {
    let (acting_user_id, role) = acting_role(conn, form)?;
    if !authz::can_modify(acting_user_id, role, owner_id) {
        return Err(ServerError::Unauthorized(denial.to_string()));
    }
    Ok(acting_user_id)
}

fn parse_id(segment: &str) -> Result<i64, ServerError> {
    segment.parse().map_err(|_| ServerError::NotFound)
}

fn require_field<'a>(
    form: &'a HashMap<String, String>,
    name: &str,
) -> Result<&'a str, ServerError> {
    match form.get(name).map(|v| v.trim()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ServerError::BadRequest(format!(
            "Missing required field: {name}"
        ))),
    }
}

fn require_id_field(form: &HashMap<String, String>, name: &str) -> Result<i64, ServerError> {
    require_field(form, name)?
        .parse()
        .map_err(|_| ServerError::BadRequest(format!("Invalid value for {name}")))
}

fn optional_field<'a>(form: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    form.get(name).map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn optional_f64(form: &HashMap<String, String>, name: &str) -> Result<Option<f64>, ServerError> {
    match optional_field(form, name) {
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| ServerError::BadRequest(format!("Invalid number for {name}"))),
        None => Ok(None),
    }
}

fn optional_id_param(
    query: &HashMap<String, String>,
    name: &str,
) -> Result<Option<i64>, ServerError> {
    match query.get(name).map(String::as_str).filter(|v| !v.is_empty()) {
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| ServerError::BadRequest(format!("Invalid value for {name}"))),
        None => Ok(None),
    }
}

fn parse_query(req: &Request) -> HashMap<String, String> {
    match req.uri().query() {
        Some(raw) => form_urlencoded::parse(raw.as_bytes()).into_owned().collect(),
        None => HashMap::new(),
    }
}

/// A urlencoded form body. Astra bodies read like any `io::Read`.
fn read_form(req: Request) -> Result<HashMap<String, String>, ServerError> {
    let mut raw = String::new();
    req.into_body()
        .reader()
        .read_to_string(&mut raw)
        .map_err(|e| ServerError::BadRequest(format!("unreadable request body: {e}")))?;

    Ok(form_urlencoded::parse(raw.as_bytes()).into_owned().collect())
}
