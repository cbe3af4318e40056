// src/db/categories.rs

use rusqlite::{params, Connection, OptionalExtension};

use crate::domain::options::Priority;
use crate::errors::ServerError;

#[derive(Debug, Clone)]
pub struct CategoryRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub priority: String,
    pub active: bool,
}

pub fn insert_category(
    conn: &Connection,
    name: &str,
    description: Option<&str>,
    priority: Priority,
) -> Result<i64, ServerError> {
    conn.execute(
        "insert into categories (name, description, priority) values (?, ?, ?)",
        params![name, description, priority.as_str()],
    )
    .map_err(|e| ServerError::DbError(format!("insert category failed: {e}")))?;

    Ok(conn.last_insert_rowid())
}

pub fn list_categories(conn: &Connection) -> Result<Vec<CategoryRow>, ServerError> {
    let mut stmt = conn
        .prepare(
            "select id, name, description, priority, active from categories order by name",
        )
        .map_err(|e| ServerError::DbError(format!("prepare categories failed: {e}")))?;

    let rows = stmt
        .query_map([], map_category_row)
        .map_err(|e| ServerError::DbError(format!("query categories failed: {e}")))?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(|e| ServerError::DbError(format!("read category failed: {e}")))?);
    }
    Ok(out)
}

pub fn get_category(conn: &Connection, id: i64) -> Result<Option<CategoryRow>, ServerError> {
    conn.query_row(
        "select id, name, description, priority, active from categories where id = ?",
        params![id],
        map_category_row,
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("select category failed: {e}")))
}

pub fn update_category(
    conn: &Connection,
    id: i64,
    name: &str,
    description: Option<&str>,
    priority: Priority,
    active: bool,
) -> Result<(), ServerError> {
    let updated = conn
        .execute(
            "update categories set name = ?, description = ?, priority = ?, active = ? where id = ?",
            params![name, description, priority.as_str(), active, id],
        )
        .map_err(|e| ServerError::DbError(format!("update category failed: {e}")))?;

    if updated == 0 {
        return Err(ServerError::NotFound);
    }
    Ok(())
}

/// Remove a category, refusing while complaints still point at it.
pub fn delete_category(conn: &Connection, id: i64) -> Result<(), ServerError> {
    let in_use: i64 = conn
        .query_row(
            "select count(*) from complaints where category_id = ?",
            params![id],
            |r| r.get(0),
        )
        .map_err(|e| ServerError::DbError(format!("count category usage failed: {e}")))?;

    if in_use > 0 {
        return Err(ServerError::BadRequest(
            "The category still has complaints assigned to it".to_string(),
        ));
    }

    let deleted = conn
        .execute("delete from categories where id = ?", params![id])
        .map_err(|e| ServerError::DbError(format!("delete category failed: {e}")))?;

    if deleted == 0 {
        return Err(ServerError::NotFound);
    }
    Ok(())
}

/// Active categories for the complaint form dropdown.
pub fn category_options(conn: &Connection) -> Result<Vec<(i64, String)>, ServerError> {
    let mut stmt = conn
        .prepare("select id, name from categories where active = 1 order by name")
        .map_err(|e| ServerError::DbError(format!("prepare category options failed: {e}")))?;

    let rows = stmt
        .query_map([], |r| Ok((r.get(0)?, r.get(1)?)))
        .map_err(|e| ServerError::DbError(format!("query category options failed: {e}")))?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(|e| ServerError::DbError(format!("read category option failed: {e}")))?);
    }
    Ok(out)
}

fn map_category_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<CategoryRow> {
    Ok(CategoryRow {
        id: r.get(0)?,
        name: r.get(1)?,
        description: r.get(2)?,
        priority: r.get(3)?,
        active: r.get(4)?,
    })
}
