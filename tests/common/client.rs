#![allow(dead_code)]

use actix_web::{test, web, App};
use bugnest::types::error::AppError;
use bugnest::types::invitation::InvitationAction;
use bugnest::types::user::DBUserCreate;
use bugnest::utils::token::encrypt;
use chrono::Duration;
use uuid::Uuid;

use super::TestContext;

pub const PASSWORD: &str = "correct-horse-battery";
pub const BOUNDARY: &str = "----bugnestTestBoundary";

pub struct TestClient<'a> {
    pub ctx: &'a TestContext,
}

/// A signed-up and logged-in user.
pub struct TestUser {
    pub id: Uuid,
    pub username: String,
    pub token: String,
}

impl TestUser {
    pub fn bearer(&self) -> (&'static str, String) {
        ("Authorization", format!("Bearer {}", self.token))
    }
}

impl<'a> TestClient<'a> {
    pub fn new(ctx: &'a TestContext) -> Self {
        TestClient { ctx }
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(self.ctx.db.clone()))
            .app_data(web::Data::new(self.ctx.config.clone()))
            .app_data(web::Data::new(self.ctx.media.clone()))
            .app_data(web::Data::new(self.ctx.gateway.clone()))
            .configure(bugnest::routes::configure_routes)
    }

    /// Creates a user and opens a session for them, the same way signup and
    /// login do.
    pub async fn create_test_user(&self, username: &str) -> Result<TestUser, AppError> {
        let password_hash = encrypt(PASSWORD).expect("Failed to hash password");
        let id = self
            .ctx
            .db
            .create_user(DBUserCreate {
                username: username.to_string(),
                password_hash,
            })
            .await?;
        let (token, _) = self.ctx.db.create_session(id, Duration::hours(1)).await?;

        Ok(TestUser {
            id,
            username: username.to_string(),
            token,
        })
    }

    pub async fn create_group(&self, owner: &TestUser, name: &str) -> Uuid {
        self.ctx
            .db
            .create_group(owner.id, name.to_string(), "test group".to_string())
            .await
            .expect("Failed to create group")
            .id
    }

    /// Invites `member` into `group` and accepts on their behalf.
    pub async fn add_to_group(&self, admin: &TestUser, member: &TestUser, group: Uuid) {
        let invite = self
            .ctx
            .db
            .create_invitation(group, admin.id, &member.username)
            .await
            .expect("Failed to invite");
        self.ctx
            .db
            .respond_to_invitation(invite.id, member.id, InvitationAction::Accept)
            .await
            .expect("Failed to accept");
    }
}

/// Builds a multipart/form-data body. Each file is `(field, filename, bytes)`.
pub fn multipart_body(fields: &[(&str, &str)], files: &[(&str, &str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    for (name, filename, content) in files {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn multipart_request(uri: &str, user: &TestUser, body: Vec<u8>) -> test::TestRequest {
    test::TestRequest::post()
        .uri(uri)
        .insert_header(user.bearer())
        .insert_header((
            "Content-Type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(body)
}
