use crate::db::database_service::DatabaseService;
use crate::types::{error::AppError, user::AuthUser};
use crate::utils::token::{self, construct_token, encrypt, extract_token_parts, new_secret, verify};
use chrono::{DateTime, Duration, Utc};
use entity::session::{ActiveModel as SessionActive, Entity as Session};
use entity::user::Entity as User;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Set};
use tracing::{debug, info};
use uuid::Uuid;

impl DatabaseService {
    /// Opens a session and returns the bearer token for it. Only a hash of the
    /// secret half is stored.
    pub async fn create_session(
        &self,
        user_id: Uuid,
        ttl: Duration,
    ) -> Result<(String, DateTime<Utc>), AppError> {
        let session_id = token::new_id();
        let secret = new_secret();
        let token_hash = encrypt(&secret)
            .map_err(|e| AppError::Internal(format!("hash session secret: {e}")))?;
        let now = Utc::now();
        let expires_at = now + ttl;

        Session::insert(SessionActive {
            id: Set(session_id),
            user_id: Set(user_id),
            token_hash: Set(token_hash),
            expires_at: Set(expires_at),
            created_at: Set(now),
        })
        .exec(&self.database_connection)
        .await?;

        info!(%user_id, %session_id, "session opened");
        Ok((construct_token(&session_id, &secret), expires_at))
    }

    /// Resolves a bearer token to its user. Expired sessions are removed on sight.
    pub async fn authenticate(&self, bearer: &str) -> Result<AuthUser, AppError> {
        let (session_id, secret) = extract_token_parts(bearer).ok_or(AppError::Unauthorized)?;

        let Some((session, user)) = Session::find_by_id(session_id)
            .find_also_related(User)
            .one(&self.database_connection)
            .await?
        else {
            return Err(AppError::Unauthorized);
        };

        if session.expires_at <= Utc::now() {
            debug!(%session_id, "session expired");
            Session::delete_by_id(session_id)
                .exec(&self.database_connection)
                .await?;
            return Err(AppError::Unauthorized);
        }

        if !verify(&secret, &session.token_hash).unwrap_or(false) {
            return Err(AppError::Unauthorized);
        }

        let user = user.ok_or(AppError::Unauthorized)?;
        Ok(AuthUser {
            id: user.id,
            username: user.username,
            session_id,
        })
    }

    pub async fn delete_session(&self, session_id: Uuid) -> Result<(), AppError> {
        Session::delete_by_id(session_id)
            .exec(&self.database_connection)
            .await?;
        info!(%session_id, "session closed");
        Ok(())
    }

    /// Hard-delete all expired sessions.
    pub async fn purge_expired_sessions(&self) -> Result<u64, AppError> {
        let res = Session::delete_many()
            .filter(entity::session::Column::ExpiresAt.lte(Utc::now()))
            .exec(&self.database_connection)
            .await?;
        Ok(res.rows_affected)
    }
}
