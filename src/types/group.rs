use chrono::{DateTime, Utc};
use entity::group_member::Role;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::error::AppError;

pub const GROUP_NAME_MAX_LEN: usize = 200;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RGroupCreate {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct GroupCreateRes {
    pub id: Uuid,
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GroupSummary {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub created_by: Uuid,
}

impl From<entity::bug_group::Model> for GroupSummary {
    fn from(g: entity::bug_group::Model) -> Self {
        GroupSummary {
            id: g.id,
            name: g.name,
            description: g.description,
            created_by: g.created_by,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MemberView {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
    pub is_admin: bool,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct GroupDetailRes {
    pub group: GroupSummary,
    pub created_at: DateTime<Utc>,
    pub members: Vec<MemberView>,
    pub is_admin: bool,
    pub is_creator: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RSetRole {
    pub role: Role,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct MessageRes {
    pub message: String,
}

/// What the caller may do inside one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Membership {
    pub role: Role,
    pub is_admin: bool,
    pub is_creator: bool,
}

impl Membership {
    /// Admins and developers triage; reporters may touch their own bugs.
    pub fn can_triage(&self) -> bool {
        self.is_admin || self.role == Role::Developer
    }
}

pub fn validate_group_name(name: &str) -> Result<String, AppError> {
    let name = name.trim();
    if name.is_empty() || name.chars().count() > GROUP_NAME_MAX_LEN {
        return Err(AppError::Validation(format!(
            "group name must be 1 to {GROUP_NAME_MAX_LEN} characters"
        )));
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_name_is_trimmed() {
        assert_eq!(validate_group_name("  Backend  ").unwrap(), "Backend");
    }

    #[test]
    fn blank_group_name_is_rejected() {
        assert!(validate_group_name("   ").is_err());
    }

    #[test]
    fn developers_and_admins_can_triage() {
        let dev = Membership { role: Role::Developer, is_admin: false, is_creator: false };
        let admin = Membership { role: Role::Member, is_admin: true, is_creator: false };
        let plain = Membership { role: Role::Member, is_admin: false, is_creator: false };
        assert!(dev.can_triage());
        assert!(admin.can_triage());
        assert!(!plain.can_triage());
    }
}
