// src/db/complaints.rs

use chrono::NaiveDateTime;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};

use crate::domain::options::Privacy;
use crate::domain::status::Status;
use crate::errors::ServerError;

/// A complaint joined with its reporter and category names.
#[derive(Debug, Clone)]
pub struct ComplaintRow {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub user_id: i64,
    pub category_id: i64,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub current_status: String,
    pub privacy: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub user_name: String,
    pub category_name: String,
}

/// Fields a reporter fills in. Status is absent on purpose: complaints
/// always start at pending and only the status ledger moves them.
#[derive(Debug, Clone)]
pub struct NewComplaint {
    pub title: String,
    pub description: String,
    pub user_id: i64,
    pub category_id: i64,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub privacy: Privacy,
}

/// Fields the edit form may change. The reporter and the status stay
/// fixed; status changes go through the ledger.
#[derive(Debug, Clone)]
pub struct ComplaintUpdate {
    pub title: String,
    pub description: String,
    pub category_id: i64,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub privacy: Privacy,
}

/// Optional list filters, combined with AND.
#[derive(Debug, Clone, Default)]
pub struct ComplaintFilters {
    pub status: Option<Status>,
    pub category_id: Option<i64>,
    pub user_id: Option<i64>,
    pub search: Option<String>,
}

pub fn insert_complaint(
    conn: &Connection,
    new: &NewComplaint,
    now: NaiveDateTime,
) -> Result<i64, ServerError> {
    conn.execute(
        "insert into complaints
           (title, description, user_id, category_id, address, latitude, longitude,
            current_status, privacy, created_at, updated_at)
         values (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        params![
            new.title,
            new.description,
            new.user_id,
            new.category_id,
            new.address,
            new.latitude,
            new.longitude,
            Status::Pending.as_str(),
            new.privacy.as_str(),
            now,
            now,
        ],
    )
    .map_err(|e| ServerError::DbError(format!("insert complaint failed: {e}")))?;

    Ok(conn.last_insert_rowid())
}

pub fn get_complaint(conn: &Connection, id: i64) -> Result<Option<ComplaintRow>, ServerError> {
    conn.query_row(
        "select d.id, d.title, d.description, d.user_id, d.category_id, d.address,
                d.latitude, d.longitude, d.current_status, d.privacy, d.created_at,
                d.updated_at, u.name, c.name
         from complaints d
         join users u on d.user_id = u.id
         join categories c on d.category_id = c.id
         where d.id = ?",
        params![id],
        map_complaint_row,
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("select complaint failed: {e}")))
}

/// Filtered listing for the index table, newest first.
pub fn list_complaints(
    conn: &Connection,
    filters: &ComplaintFilters,
) -> Result<Vec<ComplaintRow>, ServerError> {
    let mut sql = String::from(
        "select d.id, d.title, d.description, d.user_id, d.category_id, d.address,
                d.latitude, d.longitude, d.current_status, d.privacy, d.created_at,
                d.updated_at, u.name, c.name
         from complaints d
         join users u on d.user_id = u.id
         join categories c on d.category_id = c.id
         where 1=1",
    );
    let mut binds: Vec<Value> = Vec::new();

    if let Some(status) = filters.status {
        sql.push_str(" and d.current_status = ?");
        binds.push(Value::from(status.as_str().to_string()));
    }
    if let Some(category_id) = filters.category_id {
        sql.push_str(" and d.category_id = ?");
        binds.push(Value::from(category_id));
    }
    if let Some(user_id) = filters.user_id {
        sql.push_str(" and d.user_id = ?");
        binds.push(Value::from(user_id));
    }
    if let Some(search) = &filters.search {
        sql.push_str(" and (d.title like ? or d.description like ?)");
        let needle = format!("%{search}%");
        binds.push(Value::from(needle.clone()));
        binds.push(Value::from(needle));
    }

    sql.push_str(" order by d.created_at desc, d.id desc");

    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| ServerError::DbError(format!("prepare complaints failed: {e}")))?;

    let rows = stmt
        .query_map(params_from_iter(binds), map_complaint_row)
        .map_err(|e| ServerError::DbError(format!("query complaints failed: {e}")))?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(|e| ServerError::DbError(format!("read complaint failed: {e}")))?);
    }
    Ok(out)
}

pub fn update_complaint(
    conn: &Connection,
    id: i64,
    update: &ComplaintUpdate,
    now: NaiveDateTime,
) -> Result<(), ServerError> {
    let updated = conn
        .execute(
            "update complaints
             set title = ?, description = ?, category_id = ?, address = ?,
                 latitude = ?, longitude = ?, privacy = ?, updated_at = ?
             where id = ?",
            params![
                update.title,
                update.description,
                update.category_id,
                update.address,
                update.latitude,
                update.longitude,
                update.privacy.as_str(),
                now,
                id,
            ],
        )
        .map_err(|e| ServerError::DbError(format!("update complaint failed: {e}")))?;

    if updated == 0 {
        return Err(ServerError::NotFound);
    }
    Ok(())
}

/// Delete a complaint and everything hanging off it. Returns the stored
/// paths of its attachments so the caller can remove the files once the
/// transaction has committed.
pub fn delete_complaint(conn: &mut Connection, id: i64) -> Result<Vec<String>, ServerError> {
    let tx = conn
        .transaction()
        .map_err(|e| ServerError::DbError(format!("begin tx failed: {e}")))?;

    let paths: Vec<String> = {
        let mut stmt = tx
            .prepare("select stored_path from attachments where complaint_id = ?")
            .map_err(|e| ServerError::DbError(format!("prepare attachment paths failed: {e}")))?;
        let rows = stmt
            .query_map(params![id], |r| r.get(0))
            .map_err(|e| ServerError::DbError(format!("query attachment paths failed: {e}")))?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row.map_err(|e| {
                ServerError::DbError(format!("read attachment path failed: {e}"))
            })?);
        }
        out
    };

    for table in ["attachments", "comments", "transitions"] {
        tx.execute(
            &format!("delete from {table} where complaint_id = ?"),
            params![id],
        )
        .map_err(|e| ServerError::DbError(format!("delete {table} failed: {e}")))?;
    }

    let deleted = tx
        .execute("delete from complaints where id = ?", params![id])
        .map_err(|e| ServerError::DbError(format!("delete complaint failed: {e}")))?;

    if deleted == 0 {
        tx.rollback().ok();
        return Err(ServerError::NotFound);
    }

    tx.commit()
        .map_err(|e| ServerError::DbError(format!("commit tx failed: {e}")))?;

    Ok(paths)
}

/// Complaint counts per status for the dashboard tiles. Statuses with
/// no complaints are absent; the caller fills in zeros.
pub fn status_counts(conn: &Connection) -> Result<Vec<(String, i64)>, ServerError> {
    let mut stmt = conn
        .prepare("select current_status, count(*) from complaints group by current_status")
        .map_err(|e| ServerError::DbError(format!("prepare status counts failed: {e}")))?;

    let rows = stmt
        .query_map([], |r| Ok((r.get(0)?, r.get(1)?)))
        .map_err(|e| ServerError::DbError(format!("query status counts failed: {e}")))?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(|e| ServerError::DbError(format!("read status count failed: {e}")))?);
    }
    Ok(out)
}

/// Most recent complaints for the dashboard preview.
pub fn recent_complaints(conn: &Connection, limit: i64) -> Result<Vec<ComplaintRow>, ServerError> {
    let mut stmt = conn
        .prepare(
            "select d.id, d.title, d.description, d.user_id, d.category_id, d.address,
                    d.latitude, d.longitude, d.current_status, d.privacy, d.created_at,
                    d.updated_at, u.name, c.name
             from complaints d
             join users u on d.user_id = u.id
             join categories c on d.category_id = c.id
             order by d.created_at desc, d.id desc
             limit ?",
        )
        .map_err(|e| ServerError::DbError(format!("prepare recent complaints failed: {e}")))?;

    let rows = stmt
        .query_map(params![limit], map_complaint_row)
        .map_err(|e| ServerError::DbError(format!("query recent complaints failed: {e}")))?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(|e| ServerError::DbError(format!("read complaint failed: {e}")))?);
    }
    Ok(out)
}

fn map_complaint_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<ComplaintRow> {
    Ok(ComplaintRow {
        id: r.get(0)?,
        title: r.get(1)?,
        description: r.get(2)?,
        user_id: r.get(3)?,
        category_id: r.get(4)?,
        address: r.get(5)?,
        latitude: r.get(6)?,
        longitude: r.get(7)?,
        current_status: r.get(8)?,
        privacy: r.get(9)?,
        created_at: r.get(10)?,
        updated_at: r.get(11)?,
        user_name: r.get(12)?,
        category_name: r.get(13)?,
    })
}
