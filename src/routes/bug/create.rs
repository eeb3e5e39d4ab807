use crate::db::bugs::Upload;
use crate::db::database_service::DatabaseService;
use crate::types::bug::{BugCreateRes, RBugForm};
use crate::types::error::AppError;
use crate::types::response::{ApiResponse, ApiResult};
use crate::types::user::AuthUser;
use crate::utils::media::MediaStore;
use actix_multipart::{Field, Multipart};
use actix_web::{post, web};
use futures_util::StreamExt;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

const ATTACHMENT_FIELD: &str = "attachment";
const TEXT_FIELD_LIMIT: usize = 64 * 1024;

async fn read_field(field: &mut Field, limit: usize) -> Result<Vec<u8>, AppError> {
    let mut buf = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(|e| AppError::BadRequest(format!("malformed upload: {e}")))?;
        if buf.len() + chunk.len() > limit {
            return Err(AppError::Validation(format!("field exceeds {limit} bytes")));
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(buf)
}

/// Splits the multipart body into the text form and the optional file part.
async fn read_form(
    mut payload: Multipart,
    max_upload: usize,
) -> Result<(RBugForm, Option<Upload>), AppError> {
    let mut form = RBugForm::default();
    let mut upload = None;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| AppError::BadRequest(format!("malformed upload: {e}")))?;
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        if name == ATTACHMENT_FIELD {
            let file_name = field
                .content_disposition()
                .and_then(|cd| cd.get_filename())
                .map(str::to_owned)
                .unwrap_or_default();
            let content = read_field(&mut field, max_upload).await?;
            // Browsers send an empty part when no file was picked.
            if !file_name.is_empty() || !content.is_empty() {
                upload = Some(Upload { file_name, content });
            }
        } else {
            let raw = read_field(&mut field, TEXT_FIELD_LIMIT).await?;
            let value = String::from_utf8(raw)
                .map_err(|_| AppError::BadRequest(format!("field {name} is not valid UTF-8")))?;
            form.set(&name, value);
        }
    }

    Ok((form, upload))
}

#[post("/{group}/bugs")]
pub async fn create_bug(
    db: web::Data<Arc<DatabaseService>>,
    media: web::Data<MediaStore>,
    user: web::ReqData<AuthUser>,
    path: web::Path<Uuid>,
    payload: Multipart,
) -> ApiResult<BugCreateRes> {
    let (group, _) = db.require_member(path.into_inner(), user.id).await?;

    let (form, upload) = read_form(payload, media.max_bytes()).await?;
    let new_bug = form.validate()?;
    debug!(group_id = %group.id, has_attachment = upload.is_some(), "bug form parsed");

    let (bug, bugs_remaining) = db
        .create_bug(group.id, &user, new_bug, upload, &media)
        .await?;

    Ok(ApiResponse::Created(BugCreateRes { bug, bugs_remaining }))
}
