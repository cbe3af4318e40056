// src/db/comments.rs

use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};

use crate::errors::ServerError;

#[derive(Debug, Clone)]
pub struct CommentRow {
    pub id: i64,
    pub complaint_id: i64,
    pub user_id: i64,
    pub body: String,
    pub edited: bool,
    pub edited_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub user_name: String,
    pub user_role: String,
    pub user_email: String,
}

/// Display order for a complaint's comment thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentOrder {
    OldestFirst,
    NewestFirst,
}

impl CommentOrder {
    /// The thread defaults to conversation order.
    pub fn from_query(value: Option<&str>) -> CommentOrder {
        match value {
            Some("desc") => CommentOrder::NewestFirst,
            _ => CommentOrder::OldestFirst,
        }
    }

    fn sql(&self) -> &'static str {
        match self {
            CommentOrder::OldestFirst => "asc",
            CommentOrder::NewestFirst => "desc",
        }
    }
}

pub fn insert_comment(
    conn: &Connection,
    complaint_id: i64,
    user_id: i64,
    body: &str,
    now: NaiveDateTime,
) -> Result<i64, ServerError> {
    conn.execute(
        "insert into comments (complaint_id, user_id, body, created_at) values (?, ?, ?, ?)",
        params![complaint_id, user_id, body, now],
    )
    .map_err(|e| ServerError::DbError(format!("insert comment failed: {e}")))?;

    Ok(conn.last_insert_rowid())
}

pub fn list_comments(
    conn: &Connection,
    complaint_id: i64,
    order: CommentOrder,
) -> Result<Vec<CommentRow>, ServerError> {
    let dir = order.sql();
    let sql = format!(
        "select c.id, c.complaint_id, c.user_id, c.body, c.edited, c.edited_at,
                c.created_at, u.name, u.role, u.email
         from comments c
         join users u on c.user_id = u.id
         where c.complaint_id = ?
         order by c.created_at {dir}, c.id {dir}"
    );

    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| ServerError::DbError(format!("prepare comments failed: {e}")))?;

    let rows = stmt
        .query_map(params![complaint_id], map_comment_row)
        .map_err(|e| ServerError::DbError(format!("query comments failed: {e}")))?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(|e| ServerError::DbError(format!("read comment failed: {e}")))?);
    }
    Ok(out)
}

pub fn get_comment(conn: &Connection, id: i64) -> Result<Option<CommentRow>, ServerError> {
    conn.query_row(
        "select c.id, c.complaint_id, c.user_id, c.body, c.edited, c.edited_at,
                c.created_at, u.name, u.role, u.email
         from comments c
         join users u on c.user_id = u.id
         where c.id = ?",
        params![id],
        map_comment_row,
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("select comment failed: {e}")))
}

/// Rewrite a comment's text and mark it as edited. Who may do this is
/// the caller's decision; the thread itself does not care.
pub fn update_comment(
    conn: &Connection,
    id: i64,
    body: &str,
    now: NaiveDateTime,
) -> Result<(), ServerError> {
    let updated = conn
        .execute(
            "update comments set body = ?, edited = 1, edited_at = ? where id = ?",
            params![body, now, id],
        )
        .map_err(|e| ServerError::DbError(format!("update comment failed: {e}")))?;

    if updated == 0 {
        return Err(ServerError::NotFound);
    }
    Ok(())
}

pub fn delete_comment(conn: &Connection, id: i64) -> Result<(), ServerError> {
    let deleted = conn
        .execute("delete from comments where id = ?", params![id])
        .map_err(|e| ServerError::DbError(format!("delete comment failed: {e}")))?;

    if deleted == 0 {
        return Err(ServerError::NotFound);
    }
    Ok(())
}

/// Comment total shown in the thread header.
pub fn count_comments(conn: &Connection, complaint_id: i64) -> Result<i64, ServerError> {
    conn.query_row(
        "select count(*) from comments where complaint_id = ?",
        params![complaint_id],
        |r| r.get(0),
    )
    .map_err(|e| ServerError::DbError(format!("count comments failed: {e}")))
}

fn map_comment_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<CommentRow> {
    Ok(CommentRow {
        id: r.get(0)?,
        complaint_id: r.get(1)?,
        user_id: r.get(2)?,
        body: r.get(3)?,
        edited: r.get(4)?,
        edited_at: r.get(5)?,
        created_at: r.get(6)?,
        user_name: r.get(7)?,
        user_role: r.get(8)?,
        user_email: r.get(9)?,
    })
}
