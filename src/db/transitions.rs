// src/db/transitions.rs
//
// The status ledger. Every status change is one immutable row here plus
// an update of the complaint's denormalized current_status, written in
// the same transaction. Only comments may be edited afterwards, and only
// the newest row of a complaint may be removed.

use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};

use crate::domain::status::Status;
use crate::errors::ServerError;

/// One ledger entry, joined with the acting user for display.
#[derive(Debug, Clone)]
pub struct TransitionRow {
    pub id: i64,
    pub complaint_id: i64,
    pub user_id: i64,
    pub previous_status: Option<String>,
    pub new_status: String,
    pub comment: Option<String>,
    pub created_at: NaiveDateTime,
    pub user_name: String,
    pub user_role: String,
}

/// Record a status change:
/// - the complaint must exist
/// - new_status must be a known status value
/// If valid, inserts the ledger row with the complaint's status at this
/// moment as previous_status, then moves current_status to new_status.
/// Returns the new row's id.
///
/// Uses a transaction so the ledger row and the denormalized status can
/// never be observed apart.
pub fn record_transition(
    conn: &mut Connection,
    complaint_id: i64,
    acting_user_id: i64,
    new_status: &str,
    comment: Option<&str>,
    now: NaiveDateTime,
) -> Result<i64, ServerError> {
    let status = Status::parse(new_status)?;

    let tx = conn
        .transaction()
        .map_err(|e| ServerError::DbError(format!("begin tx failed: {e}")))?;

    let previous: Option<String> = tx
        .query_row(
            "select current_status from complaints where id = ?",
            params![complaint_id],
            |r| r.get(0),
        )
        .optional()
        .map_err(|e| ServerError::DbError(format!("select complaint status failed: {e}")))?;

    let Some(previous) = previous else {
        tx.rollback().ok();
        return Err(ServerError::NotFound);
    };

    tx.execute(
        "insert into transitions (complaint_id, user_id, previous_status, new_status, comment, created_at)
         values (?, ?, ?, ?, ?, ?)",
        params![complaint_id, acting_user_id, previous, status.as_str(), comment, now],
    )
    .map_err(|e| ServerError::DbError(format!("insert transition failed: {e}")))?;

    let transition_id = tx.last_insert_rowid();

    tx.execute(
        "update complaints set current_status = ?, updated_at = ? where id = ?",
        params![status.as_str(), now, complaint_id],
    )
    .map_err(|e| ServerError::DbError(format!("update complaint status failed: {e}")))?;

    tx.commit()
        .map_err(|e| ServerError::DbError(format!("commit tx failed: {e}")))?;

    Ok(transition_id)
}

/// Full history of a complaint, newest first. Rows sharing a timestamp
/// fall back to id order so the display never flips between loads.
pub fn list_transitions(
    conn: &Connection,
    complaint_id: i64,
) -> Result<Vec<TransitionRow>, ServerError> {
    let mut stmt = conn
        .prepare(
            "select s.id, s.complaint_id, s.user_id, s.previous_status, s.new_status,
                    s.comment, s.created_at, u.name, u.role
             from transitions s
             join users u on s.user_id = u.id
             where s.complaint_id = ?
             order by s.created_at desc, s.id desc",
        )
        .map_err(|e| ServerError::DbError(format!("prepare transitions failed: {e}")))?;

    let rows = stmt
        .query_map(params![complaint_id], |r| {
            Ok(TransitionRow {
                id: r.get(0)?,
                complaint_id: r.get(1)?,
                user_id: r.get(2)?,
                previous_status: r.get(3)?,
                new_status: r.get(4)?,
                comment: r.get(5)?,
                created_at: r.get(6)?,
                user_name: r.get(7)?,
                user_role: r.get(8)?,
            })
        })
        .map_err(|e| ServerError::DbError(format!("query transitions failed: {e}")))?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(|e| ServerError::DbError(format!("read transition failed: {e}")))?);
    }
    Ok(out)
}

/// (complaint_id, user_id) of one entry, for permission checks and
/// redirect targets without pulling the joined row.
pub fn transition_owner(
    conn: &Connection,
    transition_id: i64,
) -> Result<Option<(i64, i64)>, ServerError> {
    conn.query_row(
        "select complaint_id, user_id from transitions where id = ?",
        params![transition_id],
        |r| Ok((r.get(0)?, r.get(1)?)),
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("select transition failed: {e}")))
}

/// Remove a ledger entry:
/// - must exist
/// - must be the newest entry of its complaint
/// If valid, deletes the row and puts the complaint back on the entry's
/// previous_status (pending when that was null). Older entries are
/// refused so the trail stays append-only.
pub fn delete_latest_transition(
    conn: &mut Connection,
    transition_id: i64,
    now: NaiveDateTime,
) -> Result<(), ServerError> {
    let tx = conn
        .transaction()
        .map_err(|e| ServerError::DbError(format!("begin tx failed: {e}")))?;

    let row: Option<(i64, Option<String>)> = tx
        .query_row(
            "select complaint_id, previous_status from transitions where id = ?",
            params![transition_id],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .optional()
        .map_err(|e| ServerError::DbError(format!("select transition failed: {e}")))?;

    let Some((complaint_id, previous_status)) = row else {
        tx.rollback().ok();
        return Err(ServerError::NotFound);
    };

    let latest_id: i64 = tx
        .query_row(
            "select id from transitions
             where complaint_id = ?
             order by created_at desc, id desc
             limit 1",
            params![complaint_id],
            |r| r.get(0),
        )
        .map_err(|e| ServerError::DbError(format!("select latest transition failed: {e}")))?;

    if latest_id != transition_id {
        tx.rollback().ok();
        return Err(ServerError::NotLatest);
    }

    tx.execute(
        "delete from transitions where id = ?",
        params![transition_id],
    )
    .map_err(|e| ServerError::DbError(format!("delete transition failed: {e}")))?;

    let restored = previous_status.unwrap_or_else(|| Status::Pending.as_str().to_string());

    tx.execute(
        "update complaints set current_status = ?, updated_at = ? where id = ?",
        params![restored, now, complaint_id],
    )
    .map_err(|e| ServerError::DbError(format!("restore complaint status failed: {e}")))?;

    tx.commit()
        .map_err(|e| ServerError::DbError(format!("commit tx failed: {e}")))?;

    Ok(())
}

/// The complaint's denormalized status. Always equals the newest ledger
/// entry's new_status, or pending when the ledger is empty.
pub fn current_status(conn: &Connection, complaint_id: i64) -> Result<Status, ServerError> {
    let value: Option<String> = conn
        .query_row(
            "select current_status from complaints where id = ?",
            params![complaint_id],
            |r| r.get(0),
        )
        .optional()
        .map_err(|e| ServerError::DbError(format!("select complaint status failed: {e}")))?;

    match value {
        Some(v) => Status::parse(&v),
        None => Err(ServerError::NotFound),
    }
}

/// Edit the free-text comment of an entry. Status fields and timestamps
/// stay frozen; the comment is the one mutable part of the trail.
pub fn update_transition_comment(
    conn: &Connection,
    transition_id: i64,
    comment: Option<&str>,
) -> Result<(), ServerError> {
    let updated = conn
        .execute(
            "update transitions set comment = ? where id = ?",
            params![comment, transition_id],
        )
        .map_err(|e| ServerError::DbError(format!("update transition comment failed: {e}")))?;

    if updated == 0 {
        return Err(ServerError::NotFound);
    }
    Ok(())
}
