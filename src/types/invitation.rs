use chrono::{DateTime, Utc};
use entity::group_invitation::InvitationStatus;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RGroupInviteUser {
    pub username: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct InviteRes {
    pub id: Uuid,
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct InvitationView {
    pub id: Uuid,
    pub group_id: Uuid,
    pub group_name: String,
    pub invited_by: Uuid,
    pub invited_by_name: String,
    pub invited_user: Uuid,
    pub invited_user_name: String,
    pub status: InvitationStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvitationAction {
    Accept,
    Reject,
}

impl InvitationAction {
    pub fn resulting_status(self) -> InvitationStatus {
        match self {
            InvitationAction::Accept => InvitationStatus::Accepted,
            InvitationAction::Reject => InvitationStatus::Rejected,
        }
    }
}
