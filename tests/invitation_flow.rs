use actix_web::{http::StatusCode, test};
use serde_json::{json, Value};

mod common;
use common::{client::TestClient, TestContext};
use entity::group_invitation::InvitationStatus;

#[tokio::test]
async fn test_invite_accept_flow_success() {
    let ctx = TestContext::new().await;
    let client = TestClient::new(&ctx);
    let app = test::init_service(client.create_app()).await;

    let owner = client.create_test_user("owner").await.unwrap();
    let target = client.create_test_user("target").await.unwrap();
    let group = client.create_group(&owner, "Frontend").await;

    let req = test::TestRequest::post()
        .uri(&format!("/group/{}/invitations", group))
        .insert_header(owner.bearer())
        .set_json(json!({ "username": "target" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let invitation = body["id"].as_str().unwrap().to_string();

    // Admins see it on the group, the invitee on their own list.
    let req = test::TestRequest::get()
        .uri(&format!("/group/{}/invitations", group))
        .insert_header(owner.bearer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    let pending: Value = test::read_body_json(resp).await;
    assert_eq!(pending.as_array().unwrap().len(), 1);

    let req = test::TestRequest::get()
        .uri("/invitation")
        .insert_header(target.bearer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let mine: Value = test::read_body_json(resp).await;
    assert_eq!(mine[0]["group_name"], "Frontend");
    assert_eq!(mine[0]["invited_by_name"], "owner");
    assert_eq!(mine[0]["status"], "pending");
    assert_eq!(ctx.db.count_pending_invitations(target.id).await.unwrap(), 1);

    let req = test::TestRequest::post()
        .uri(&format!("/invitation/{}/accept", invitation))
        .insert_header(target.bearer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let inv = ctx
        .db
        .get_invitation(uuid::Uuid::parse_str(&invitation).unwrap())
        .await
        .unwrap();
    assert_eq!(inv.status, InvitationStatus::Accepted);
    assert_eq!(ctx.db.count_pending_invitations(target.id).await.unwrap(), 0);

    let (_, membership) = ctx.db.require_member(group, target.id).await.unwrap();
    assert_eq!(membership.role, entity::group_member::Role::Member);
    assert!(!membership.is_admin);

    // Answering twice is a conflict.
    let req = test::TestRequest::post()
        .uri(&format!("/invitation/{}/reject", invitation))
        .insert_header(target.bearer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_reject_leaves_membership_untouched() {
    let ctx = TestContext::new().await;
    let client = TestClient::new(&ctx);
    let app = test::init_service(client.create_app()).await;

    let owner = client.create_test_user("owner").await.unwrap();
    let target = client.create_test_user("target").await.unwrap();
    let group = client.create_group(&owner, "Ops").await;
    let invite = ctx
        .db
        .create_invitation(group, owner.id, "target")
        .await
        .unwrap();

    let req = test::TestRequest::post()
        .uri(&format!("/invitation/{}/reject", invite.id))
        .insert_header(target.bearer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let inv = ctx.db.get_invitation(invite.id).await.unwrap();
    assert_eq!(inv.status, InvitationStatus::Rejected);
    assert!(ctx.db.require_member(group, target.id).await.is_err());

    // A fresh invitation is allowed once the old one is answered.
    assert!(ctx.db.create_invitation(group, owner.id, "target").await.is_ok());
}

#[tokio::test]
async fn test_invite_rejections() {
    let ctx = TestContext::new().await;
    let client = TestClient::new(&ctx);
    let app = test::init_service(client.create_app()).await;

    let owner = client.create_test_user("owner").await.unwrap();
    let member = client.create_test_user("member").await.unwrap();
    let target = client.create_test_user("target").await.unwrap();
    let group = client.create_group(&owner, "QA").await;
    client.add_to_group(&owner, &member, group).await;

    let invite = |user: &common::client::TestUser, username: &str| {
        test::TestRequest::post()
            .uri(&format!("/group/{}/invitations", group))
            .insert_header(user.bearer())
            .set_json(json!({ "username": username }))
            .to_request()
    };

    // Not an admin.
    let resp = test::call_service(&app, invite(&member, "target")).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // Unknown user.
    let resp = test::call_service(&app, invite(&owner, "ghost")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // Already a member.
    let resp = test::call_service(&app, invite(&owner, "member")).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // Pending twice.
    let resp = test::call_service(&app, invite(&owner, "target")).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let resp = test::call_service(&app, invite(&owner, "target")).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let pending = ctx.db.list_pending_invitations_for_user(target.id).await.unwrap();
    assert_eq!(pending.len(), 1);
}

#[tokio::test]
async fn test_only_invitee_may_answer() {
    let ctx = TestContext::new().await;
    let client = TestClient::new(&ctx);
    let app = test::init_service(client.create_app()).await;

    let owner = client.create_test_user("owner").await.unwrap();
    let target = client.create_test_user("target").await.unwrap();
    let intruder = client.create_test_user("intruder").await.unwrap();
    let group = client.create_group(&owner, "Core").await;
    let invite = ctx
        .db
        .create_invitation(group, owner.id, &target.username)
        .await
        .unwrap();

    let req = test::TestRequest::post()
        .uri(&format!("/invitation/{}/accept", invite.id))
        .insert_header(intruder.bearer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let inv = ctx.db.get_invitation(invite.id).await.unwrap();
    assert_eq!(inv.status, InvitationStatus::Pending);
    assert!(ctx.db.require_member(group, intruder.id).await.is_err());
}

#[tokio::test]
async fn test_cancel_invitation() {
    let ctx = TestContext::new().await;
    let client = TestClient::new(&ctx);
    let app = test::init_service(client.create_app()).await;

    let owner = client.create_test_user("owner").await.unwrap();
    let target = client.create_test_user("target").await.unwrap();
    let group = client.create_group(&owner, "Mobile").await;
    let invite = ctx
        .db
        .create_invitation(group, owner.id, &target.username)
        .await
        .unwrap();

    let req = test::TestRequest::delete()
        .uri(&format!("/group/{}/invitations/{}", group, invite.id))
        .insert_header(owner.bearer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    assert_eq!(ctx.db.count_pending_invitations(target.id).await.unwrap(), 0);

    let req = test::TestRequest::delete()
        .uri(&format!("/group/{}/invitations/{}", group, invite.id))
        .insert_header(owner.bearer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
