// src/db/attachments.rs
//
// Metadata rows for uploaded evidence. The bytes live on disk under the
// upload directory; rows carry the original filename for display and
// the stored path for serving and cleanup.

use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};

use crate::errors::ServerError;

#[derive(Debug, Clone)]
pub struct AttachmentRow {
    pub id: i64,
    pub complaint_id: i64,
    pub original_name: String,
    pub stored_path: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub created_at: NaiveDateTime,
}

impl AttachmentRow {
    /// "312.4 KB" / "1.2 MB" style label for the file list.
    pub fn size_label(&self) -> String {
        if self.size_bytes < 1024 * 1024 {
            format!("{:.1} KB", self.size_bytes as f64 / 1024.0)
        } else {
            format!("{:.1} MB", self.size_bytes as f64 / (1024.0 * 1024.0))
        }
    }
}

pub fn insert_attachment(
    conn: &Connection,
    complaint_id: i64,
    original_name: &str,
    stored_path: &str,
    content_type: &str,
    size_bytes: i64,
    now: NaiveDateTime,
) -> Result<i64, ServerError> {
    conn.execute(
        "insert into attachments
           (complaint_id, original_name, stored_path, content_type, size_bytes, created_at)
         values (?, ?, ?, ?, ?, ?)",
        params![complaint_id, original_name, stored_path, content_type, size_bytes, now],
    )
    .map_err(|e| ServerError::DbError(format!("insert attachment failed: {e}")))?;

    Ok(conn.last_insert_rowid())
}

/// Evidence for one complaint, newest upload first.
pub fn list_attachments(
    conn: &Connection,
    complaint_id: i64,
) -> Result<Vec<AttachmentRow>, ServerError> {
    let mut stmt = conn
        .prepare(
            "select id, complaint_id, original_name, stored_path, content_type, size_bytes, created_at
             from attachments
             where complaint_id = ?
             order by created_at desc, id desc",
        )
        .map_err(|e| ServerError::DbError(format!("prepare attachments failed: {e}")))?;

    let rows = stmt
        .query_map(params![complaint_id], map_attachment_row)
        .map_err(|e| ServerError::DbError(format!("query attachments failed: {e}")))?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(|e| ServerError::DbError(format!("read attachment failed: {e}")))?);
    }
    Ok(out)
}

pub fn get_attachment(conn: &Connection, id: i64) -> Result<Option<AttachmentRow>, ServerError> {
    conn.query_row(
        "select id, complaint_id, original_name, stored_path, content_type, size_bytes, created_at
         from attachments where id = ?",
        params![id],
        map_attachment_row,
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("select attachment failed: {e}")))
}

/// Remove the metadata row. Returns the stored path so the caller can
/// unlink the file after the row is gone.
pub fn delete_attachment(conn: &Connection, id: i64) -> Result<String, ServerError> {
    let row = get_attachment(conn, id)?.ok_or(ServerError::NotFound)?;

    conn.execute("delete from attachments where id = ?", params![id])
        .map_err(|e| ServerError::DbError(format!("delete attachment failed: {e}")))?;

    Ok(row.stored_path)
}

fn map_attachment_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<AttachmentRow> {
    Ok(AttachmentRow {
        id: r.get(0)?,
        complaint_id: r.get(1)?,
        original_name: r.get(2)?,
        stored_path: r.get(3)?,
        content_type: r.get(4)?,
        size_bytes: r.get(5)?,
        created_at: r.get(6)?,
    })
}
