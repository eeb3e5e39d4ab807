use crate::db::database_service::DatabaseService;
use crate::types::group::{validate_group_name, GroupCreateRes, RGroupCreate};
use crate::types::response::{ApiResponse, ApiResult};
use crate::types::user::AuthUser;
use actix_web::{post, web};
use std::sync::Arc;

#[post("")]
pub async fn create_group(
    db: web::Data<Arc<DatabaseService>>,
    user: web::ReqData<AuthUser>,
    data: web::Json<RGroupCreate>,
) -> ApiResult<GroupCreateRes> {
    let data = data.into_inner();
    let name = validate_group_name(&data.name)?;
    let group = db.create_group(user.id, name, data.description).await?;

    Ok(ApiResponse::Created(GroupCreateRes {
        id: group.id,
        message: format!("Group {} has been successfully created.", group.name),
    }))
}
