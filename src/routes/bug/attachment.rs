use crate::db::database_service::DatabaseService;
use crate::types::error::AppError;
use crate::types::user::AuthUser;
use crate::utils::media::MediaStore;
use actix_files::NamedFile;
use actix_web::{get, web};
use std::sync::Arc;
use uuid::Uuid;

#[get("/{group}/bugs/{bug}/attachment")]
pub async fn download_attachment(
    db: web::Data<Arc<DatabaseService>>,
    media: web::Data<MediaStore>,
    user: web::ReqData<AuthUser>,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<NamedFile, AppError> {
    let (group_id, bug_id) = path.into_inner();
    let (group, _) = db.require_member(group_id, user.id).await?;
    let bug = db.get_bug(group.id, bug_id).await?;

    let stored = bug.attachment.ok_or(AppError::NotFound)?;
    let file = match NamedFile::open_async(media.resolve(&stored)?).await {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(AppError::NotFound),
        Err(e) => return Err(e.into()),
    };
    Ok(file)
}
