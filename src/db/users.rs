// src/db/users.rs

use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};

use crate::domain::options::Role;
use crate::domain::passwords;
use crate::errors::ServerError;

#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: String,
    pub active: bool,
    pub created_at: NaiveDateTime,
}

/// True when another account already uses this email. `exclude_id`
/// lets the edit form keep its own address.
pub fn email_exists(
    conn: &Connection,
    email: &str,
    exclude_id: Option<i64>,
) -> Result<bool, ServerError> {
    let count: i64 = match exclude_id {
        Some(id) => conn
            .query_row(
                "select count(*) from users where email = ? and id != ?",
                params![email, id],
                |r| r.get(0),
            )
            .map_err(|e| ServerError::DbError(format!("count emails failed: {e}")))?,
        None => conn
            .query_row(
                "select count(*) from users where email = ?",
                params![email],
                |r| r.get(0),
            )
            .map_err(|e| ServerError::DbError(format!("count emails failed: {e}")))?,
    };
    Ok(count > 0)
}

pub fn insert_user(
    conn: &Connection,
    name: &str,
    email: &str,
    phone: Option<&str>,
    password: &str,
    role: Role,
) -> Result<i64, ServerError> {
    if email_exists(conn, email, None)? {
        return Err(ServerError::BadRequest(
            "That email address is already registered".to_string(),
        ));
    }

    let hash = passwords::hash_password_default(password);

    conn.execute(
        "insert into users (name, email, phone, password_hash, role) values (?, ?, ?, ?, ?)",
        params![name, email, phone, hash, role.as_str()],
    )
    .map_err(|e| ServerError::DbError(format!("insert user failed: {e}")))?;

    Ok(conn.last_insert_rowid())
}

pub fn list_users(conn: &Connection) -> Result<Vec<UserRow>, ServerError> {
    let mut stmt = conn
        .prepare(
            "select id, name, email, phone, role, active, created_at
             from users order by id desc",
        )
        .map_err(|e| ServerError::DbError(format!("prepare users failed: {e}")))?;

    let rows = stmt
        .query_map([], map_user_row)
        .map_err(|e| ServerError::DbError(format!("query users failed: {e}")))?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(|e| ServerError::DbError(format!("read user failed: {e}")))?);
    }
    Ok(out)
}

pub fn get_user(conn: &Connection, id: i64) -> Result<Option<UserRow>, ServerError> {
    conn.query_row(
        "select id, name, email, phone, role, active, created_at from users where id = ?",
        params![id],
        map_user_row,
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("select user failed: {e}")))
}

/// The stored role of an account, parsed. Authorization checks go
/// through this so an unknown id surfaces as NotFound, not as a
/// quietly-false admin flag.
pub fn user_role(conn: &Connection, id: i64) -> Result<Role, ServerError> {
    let role: Option<String> = conn
        .query_row("select role from users where id = ?", params![id], |r| {
            r.get(0)
        })
        .optional()
        .map_err(|e| ServerError::DbError(format!("select role failed: {e}")))?;

    match role {
        Some(value) => Role::parse(&value),
        None => Err(ServerError::NotFound),
    }
}

pub fn update_user(
    conn: &Connection,
    id: i64,
    name: &str,
    email: &str,
    phone: Option<&str>,
    role: Role,
    active: bool,
) -> Result<(), ServerError> {
    if email_exists(conn, email, Some(id))? {
        return Err(ServerError::BadRequest(
            "That email address is already registered".to_string(),
        ));
    }

    let updated = conn
        .execute(
            "update users set name = ?, email = ?, phone = ?, role = ?, active = ? where id = ?",
            params![name, email, phone, role.as_str(), active, id],
        )
        .map_err(|e| ServerError::DbError(format!("update user failed: {e}")))?;

    if updated == 0 {
        return Err(ServerError::NotFound);
    }
    Ok(())
}

/// Accounts are never removed, only switched off, so their name keeps
/// resolving in old complaints and ledger entries.
pub fn deactivate_user(conn: &Connection, id: i64) -> Result<(), ServerError> {
    let updated = conn
        .execute("update users set active = 0 where id = ?", params![id])
        .map_err(|e| ServerError::DbError(format!("deactivate user failed: {e}")))?;

    if updated == 0 {
        return Err(ServerError::NotFound);
    }
    Ok(())
}

pub fn set_password(conn: &Connection, id: i64, password: &str) -> Result<(), ServerError> {
    let hash = passwords::hash_password_default(password);

    let updated = conn
        .execute(
            "update users set password_hash = ? where id = ?",
            params![hash, id],
        )
        .map_err(|e| ServerError::DbError(format!("set password failed: {e}")))?;

    if updated == 0 {
        return Err(ServerError::NotFound);
    }
    Ok(())
}

/// Check a password attempt for an account. Accounts without a stored
/// hash (seed rows) never verify.
pub fn check_password(conn: &Connection, id: i64, attempt: &str) -> Result<bool, ServerError> {
    let stored: Option<Vec<u8>> = conn
        .query_row(
            "select password_hash from users where id = ?",
            params![id],
            |r| r.get(0),
        )
        .optional()
        .map_err(|e| ServerError::DbError(format!("select password hash failed: {e}")))?
        .flatten();

    Ok(match stored {
        Some(hash) => passwords::verify_password(&hash, attempt),
        None => false,
    })
}

/// Every account for the reporter and acting-user dropdowns.
pub fn user_options(conn: &Connection) -> Result<Vec<(i64, String)>, ServerError> {
    let mut stmt = conn
        .prepare("select id, name from users order by name")
        .map_err(|e| ServerError::DbError(format!("prepare user options failed: {e}")))?;

    let rows = stmt
        .query_map([], |r| Ok((r.get(0)?, r.get(1)?)))
        .map_err(|e| ServerError::DbError(format!("query user options failed: {e}")))?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(|e| ServerError::DbError(format!("read user option failed: {e}")))?);
    }
    Ok(out)
}

fn map_user_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: r.get(0)?,
        name: r.get(1)?,
        email: r.get(2)?,
        phone: r.get(3)?,
        role: r.get(4)?,
        active: r.get(5)?,
        created_at: r.get(6)?,
    })
}
