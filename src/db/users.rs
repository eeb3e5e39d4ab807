use crate::db::database_service::DatabaseService;
use crate::{
    types::{error::AppError, user::DBUserCreate},
    utils::token::{self, verify},
};
use chrono::Utc;
use entity::user::{ActiveModel as UserActive, Entity as User, Model as UserModel};
use sea_orm::{ColumnTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter, Set};
use tracing::{info, warn};
use uuid::Uuid;

impl DatabaseService {
    pub async fn user_exists_by_username(&self, username: &str) -> Result<bool, AppError> {
        Ok(User::find()
            .filter(entity::user::Column::Username.eq(username))
            .count(&self.database_connection)
            .await?
            > 0)
    }

    pub async fn get_user_by_id(&self, id: &Uuid) -> Result<UserModel, AppError> {
        Ok(User::find_by_id(*id)
            .one(&self.database_connection)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound("User does not exist".into()))?)
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<UserModel, AppError> {
        Ok(User::find()
            .filter(entity::user::Column::Username.eq(username))
            .one(&self.database_connection)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound("User does not exist".into()))?)
    }

    /// Signup: create user.
    pub async fn create_user(&self, payload: DBUserCreate) -> Result<Uuid, AppError> {
        if self.user_exists_by_username(&payload.username).await? {
            return Err(AppError::AlreadyExists);
        }
        let uid = token::new_id();
        let now = Utc::now();

        User::insert(UserActive {
            id: Set(uid),
            username: Set(payload.username.clone()),
            password_hash: Set(payload.password_hash),
            created_at: Set(now),
            updated_at: Set(now),
        })
        .exec(&self.database_connection)
        .await?;

        info!(user_id = %uid, username = %payload.username, "user created");
        Ok(uid)
    }

    /// Looks the user up and checks the password. Both failure modes give the
    /// same `Unauthorized`.
    pub async fn verify_credentials(&self, username: &str, password: &str) -> Result<UserModel, AppError> {
        let user = match self.get_user_by_username(username).await {
            Ok(user) => user,
            Err(AppError::NotFound) => {
                warn!(%username, "login for unknown user");
                return Err(AppError::Unauthorized);
            }
            Err(e) => return Err(e),
        };

        match verify(password, &user.password_hash) {
            Ok(true) => Ok(user),
            Ok(false) => {
                warn!(user_id = %user.id, "login with wrong password");
                Err(AppError::Unauthorized)
            }
            Err(e) => Err(AppError::Internal(format!("stored password hash unreadable: {e}"))),
        }
    }
}
