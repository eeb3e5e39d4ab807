use crate::db::database_service::DatabaseService;
use crate::db::subscriptions::consume_quota;
use crate::types::bug::NewBug;
use crate::types::error::AppError;
use crate::types::user::AuthUser;
use crate::utils::media::MediaStore;
use chrono::Utc;
use entity::bug::{ActiveModel as BugActive, BugStatus, Entity as Bug, Model as BugModel};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::{info, warn};
use uuid::Uuid;

/// An uploaded file held in memory until the bug row is written.
pub struct Upload {
    pub file_name: String,
    pub content: Vec<u8>,
}

impl DatabaseService {
    pub async fn list_bugs(&self, group_id: Uuid) -> Result<Vec<BugModel>, AppError> {
        Ok(Bug::find()
            .filter(entity::bug::Column::GroupId.eq(group_id))
            .order_by_desc(entity::bug::Column::CreatedAt)
            .all(&self.database_connection)
            .await?)
    }

    /// Fetches a bug, treating a bug from another group as missing.
    pub async fn get_bug(&self, group_id: Uuid, bug_id: Uuid) -> Result<BugModel, AppError> {
        Bug::find_by_id(bug_id)
            .one(&self.database_connection)
            .await?
            .filter(|b| b.group_id == group_id)
            .ok_or(AppError::NotFound)
    }

    /// Files a bug against the reporter's daily quota.
    ///
    /// Quota, attachment and row are one unit: if anything after the quota
    /// check fails the transaction rolls back and the stored file is removed.
    pub async fn create_bug(
        &self,
        group_id: Uuid,
        reporter: &AuthUser,
        bug: NewBug,
        upload: Option<Upload>,
        media: &MediaStore,
    ) -> Result<(BugModel, i32), AppError> {
        let now = Utc::now();
        let txn = self.database_connection.begin().await?;

        let remaining = match consume_quota(&txn, reporter.id, now).await {
            Ok(r) => r,
            Err(e) => {
                txn.rollback().await?;
                return Err(e);
            }
        };

        let attachment = match upload {
            Some(upload) => match media.save_bug_attachment(&upload.file_name, &upload.content).await {
                Ok(path) => Some(path),
                Err(e) => {
                    txn.rollback().await?;
                    return Err(e);
                }
            },
            None => None,
        };

        let inserted = BugActive {
            id: Set(Uuid::new_v4()),
            group_id: Set(group_id),
            title: Set(bug.title),
            description: Set(bug.description),
            status: Set(bug.status),
            created_by: Set(reporter.id),
            created_by_name: Set(reporter.username.clone()),
            start_date: Set(bug.start_date),
            due_date: Set(bug.due_date),
            estimated_hours: Set(bug.estimated_hours),
            attachment: Set(attachment.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await;

        let committed = match inserted {
            Ok(model) => txn.commit().await.map(|_| model),
            Err(e) => Err(e),
        };

        match committed {
            Ok(model) => {
                info!(bug_id = %model.id, %group_id, reporter = %reporter.id, remaining, "bug filed");
                Ok((model, remaining))
            }
            Err(e) => {
                if let Some(path) = attachment {
                    if let Err(cleanup) = media.remove(&path).await {
                        warn!(%path, error = %cleanup, "orphaned attachment left behind");
                    }
                }
                Err(e.into())
            }
        }
    }

    pub async fn update_bug_status(
        &self,
        group_id: Uuid,
        bug_id: Uuid,
        status: BugStatus,
    ) -> Result<BugModel, AppError> {
        let bug = self.get_bug(group_id, bug_id).await?;
        if bug.status == status {
            return Ok(bug);
        }
        let mut am: BugActive = bug.into();
        am.status = Set(status);
        am.updated_at = Set(Utc::now());
        let updated = am.update(&self.database_connection).await?;
        info!(%bug_id, ?status, "bug status changed");
        Ok(updated)
    }

    /// Deletes the row and returns its attachment path, if any.
    pub async fn delete_bug(&self, group_id: Uuid, bug_id: Uuid) -> Result<Option<String>, AppError> {
        let bug = self.get_bug(group_id, bug_id).await?;
        let res = Bug::delete_by_id(bug.id).exec(&self.database_connection).await?;
        if res.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        info!(%bug_id, %group_id, "bug deleted");
        Ok(bug.attachment)
    }
}
