use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::error::AppError;
use crate::types::group::GroupSummary;
use crate::types::subscription::SubscriptionRes;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RUserSignup {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RUserLogin {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct UserSignupRes {
    pub id: Uuid,
    pub username: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct UserLoginRes {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct MeRes {
    pub id: Uuid,
    pub username: String,
    pub groups: Vec<GroupSummary>,
    pub pending_invitations: u64,
    pub subscription: SubscriptionRes,
}

pub struct DBUserCreate {
    pub username: String,
    pub password_hash: String,
}

/// The caller behind a validated bearer token, stashed in request extensions.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub username: String,
    pub session_id: Uuid,
}

pub const USERNAME_MAX_LEN: usize = 150;
pub const PASSWORD_MIN_LEN: usize = 8;

pub fn validate_username(username: &str) -> Result<(), AppError> {
    if username.is_empty() || username.chars().count() > USERNAME_MAX_LEN {
        return Err(AppError::Validation(format!(
            "username must be 1 to {USERNAME_MAX_LEN} characters"
        )));
    }
    let allowed = |c: char| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_');
    if !username.chars().all(allowed) {
        return Err(AppError::Validation(
            "username may only contain letters, digits and @.+-_".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.chars().count() < PASSWORD_MIN_LEN {
        return Err(AppError::Validation(format!(
            "password must be at least {PASSWORD_MIN_LEN} characters"
        )));
    }
    Ok(())
}
