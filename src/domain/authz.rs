// src/domain/authz.rs

use crate::domain::options::Role;

/// Decides whether an acting user may edit or remove a record that
/// belongs to someone else. Owners can always touch their own records;
/// anyone else needs the admin role. Moderators review and advance
/// complaints but do not rewrite other people's words.
pub fn can_modify(acting_user_id: i64, acting_role: Role, owner_id: i64) -> bool {
    acting_user_id == owner_id || acting_role == Role::Admin
}
