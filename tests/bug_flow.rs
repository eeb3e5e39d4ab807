use actix_web::{http::StatusCode, test};
use serde_json::{json, Value};

mod common;
use common::client::{multipart_body, multipart_request, TestClient};
use common::TestContext;
use bugnest::types::bug::RBugForm;
use bugnest::types::error::AppError;
use bugnest::types::user::AuthUser;

#[tokio::test]
async fn test_bug_report_with_attachment() {
    let ctx = TestContext::new().await;
    let client = TestClient::new(&ctx);
    let app = test::init_service(client.create_app()).await;

    let owner = client.create_test_user("owner").await.unwrap();
    let group = client.create_group(&owner, "Backend").await;

    let body = multipart_body(
        &[
            ("title", "Login button does nothing"),
            ("description", "Clicking it has no effect"),
            ("start_date", "2025-01-10"),
            ("due_date", "2025-01-12T17:30"),
            ("estimated_hours", "3"),
        ],
        &[("attachment", "../../etc/screen shot.png", b"PNGDATA")],
    );
    let req = multipart_request(&format!("/group/{}/bugs", group), &owner, body).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["bugs_remaining"], 4);
    assert_eq!(created["bug"]["status"], "Open");
    assert_eq!(created["bug"]["created_by_name"], "owner");
    assert_eq!(created["bug"]["estimated_hours"], 3);

    let attachment = created["bug"]["attachment"].as_str().unwrap();
    assert!(attachment.starts_with("bugs/"));
    assert!(attachment.ends_with("_screen_shot.png"), "{attachment}");
    assert!(ctx.media_root.join(attachment).exists());

    let bug_id = created["bug"]["id"].as_str().unwrap();
    let req = test::TestRequest::get()
        .uri(&format!("/group/{}/bugs/{}/attachment", group, bug_id))
        .insert_header(owner.bearer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = test::read_body(resp).await;
    assert_eq!(&bytes[..], b"PNGDATA");

    let req = test::TestRequest::get()
        .uri(&format!("/group/{}/bugs", group))
        .insert_header(owner.bearer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    let bugs: Value = test::read_body_json(resp).await;
    assert_eq!(bugs.as_array().unwrap().len(), 1);

    // Deleting the bug takes the file with it.
    let req = test::TestRequest::delete()
        .uri(&format!("/group/{}/bugs/{}", group, bug_id))
        .insert_header(owner.bearer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(!ctx.media_root.join(attachment).exists());
}

#[tokio::test]
async fn test_bug_form_validation() {
    let ctx = TestContext::new().await;
    let client = TestClient::new(&ctx);
    let app = test::init_service(client.create_app()).await;

    let owner = client.create_test_user("owner").await.unwrap();
    let group = client.create_group(&owner, "Backend").await;
    let uri = format!("/group/{}/bugs", group);

    let cases: Vec<Vec<(&str, &str)>> = vec![
        vec![("description", "no title")],
        vec![("title", "t"), ("start_date", "2025-02-10"), ("due_date", "2025-02-01")],
        vec![("title", "t"), ("estimated_hours", "-2")],
        vec![("title", "t"), ("status", "Reopened")],
        vec![("title", "t"), ("due_date", "next tuesday")],
    ];
    for fields in cases {
        let req = multipart_request(&uri, &owner, multipart_body(&fields, &[])).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "fields: {fields:?}");
    }

    // Rejected forms cost nothing.
    let sub = ctx.db.get_subscription(owner.id).await.unwrap();
    assert_eq!(sub.bugs_remaining, 5);
}

#[tokio::test]
async fn test_oversized_attachment_spends_no_quota() {
    let ctx = TestContext::new().await;
    let client = TestClient::new(&ctx);
    let app = test::init_service(client.create_app()).await;

    let owner = client.create_test_user("owner").await.unwrap();
    let group = client.create_group(&owner, "Backend").await;

    let big = vec![0u8; ctx.config.max_upload_bytes + 1];
    let body = multipart_body(&[("title", "huge")], &[("attachment", "dump.bin", &big)]);
    let req = multipart_request(&format!("/group/{}/bugs", group), &owner, body).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    assert!(ctx.db.list_bugs(group).await.unwrap().is_empty());
    let sub = ctx.db.get_subscription(owner.id).await.unwrap();
    assert_eq!(sub.bugs_remaining, 5);
}

#[tokio::test]
async fn test_daily_quota_is_enforced() {
    let ctx = TestContext::new().await;
    let client = TestClient::new(&ctx);
    let app = test::init_service(client.create_app()).await;

    let owner = client.create_test_user("owner").await.unwrap();
    let group = client.create_group(&owner, "Backend").await;
    let uri = format!("/group/{}/bugs", group);

    for expected_left in (0..5).rev() {
        let body = multipart_body(&[("title", "flaky test")], &[]);
        let req = multipart_request(&uri, &owner, body).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: Value = test::read_body_json(resp).await;
        assert_eq!(created["bugs_remaining"], expected_left);
    }

    let body = multipart_body(&[("title", "one too many")], &[]);
    let req = multipart_request(&uri, &owner, body).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    let err: Value = test::read_body_json(resp).await;
    assert_eq!(err["error"], "QUOTA_EXCEEDED");

    assert_eq!(ctx.db.list_bugs(group).await.unwrap().len(), 5);

    // Tomorrow the quota is back.
    let tomorrow = chrono::Utc::now() + chrono::Duration::days(1);
    let sub = ctx.db.get_subscription_at(owner.id, tomorrow).await.unwrap();
    assert_eq!(sub.bugs_remaining, 5);
}

#[tokio::test]
async fn test_bug_status_permissions() {
    let ctx = TestContext::new().await;
    let client = TestClient::new(&ctx);
    let app = test::init_service(client.create_app()).await;

    let owner = client.create_test_user("owner").await.unwrap();
    let reporter = client.create_test_user("reporter").await.unwrap();
    let bystander = client.create_test_user("bystander").await.unwrap();
    let dev = client.create_test_user("dev").await.unwrap();
    let group = client.create_group(&owner, "Backend").await;
    for user in [&reporter, &bystander, &dev] {
        client.add_to_group(&owner, user, group).await;
    }
    ctx.db
        .set_member_role(group, dev.id, entity::group_member::Role::Developer)
        .await
        .unwrap();

    let body = multipart_body(&[("title", "crash on save")], &[]);
    let req = multipart_request(&format!("/group/{}/bugs", group), &reporter, body).to_request();
    let resp = test::call_service(&app, req).await;
    let created: Value = test::read_body_json(resp).await;
    let bug_uri = format!("/group/{}/bugs/{}", group, created["bug"]["id"].as_str().unwrap());

    let patch = |user: &common::client::TestUser, status: &str| {
        test::TestRequest::patch()
            .uri(&bug_uri)
            .insert_header(user.bearer())
            .set_json(json!({ "status": status }))
            .to_request()
    };

    let resp = test::call_service(&app, patch(&bystander, "Closed")).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = test::call_service(&app, patch(&dev, "Closed")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let bug: Value = test::read_body_json(resp).await;
    assert_eq!(bug["status"], "Closed");

    let resp = test::call_service(&app, patch(&reporter, "Open")).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(&app, patch(&owner, "Closed")).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // Developers triage but do not delete.
    let req = test::TestRequest::delete()
        .uri(&bug_uri)
        .insert_header(dev.bearer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::delete()
        .uri(&bug_uri)
        .insert_header(owner.bearer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_bug_is_scoped_to_its_group() {
    let ctx = TestContext::new().await;
    let client = TestClient::new(&ctx);
    let app = test::init_service(client.create_app()).await;

    let owner = client.create_test_user("owner").await.unwrap();
    let outsider = client.create_test_user("outsider").await.unwrap();
    let group_a = client.create_group(&owner, "A").await;
    let group_b = client.create_group(&owner, "B").await;

    let body = multipart_body(&[("title", "in A")], &[]);
    let req = multipart_request(&format!("/group/{}/bugs", group_a), &owner, body).to_request();
    let resp = test::call_service(&app, req).await;
    let created: Value = test::read_body_json(resp).await;
    let bug_id = created["bug"]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::delete()
        .uri(&format!("/group/{}/bugs/{}", group_b, bug_id))
        .insert_header(owner.bearer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri(&format!("/group/{}/bugs", group_a))
        .insert_header(outsider.bearer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // No attachment to download.
    let req = test::TestRequest::get()
        .uri(&format!("/group/{}/bugs/{}/attachment", group_a, bug_id))
        .insert_header(owner.bearer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_submissions_share_the_quota() {
    let ctx = TestContext::new().await;
    let client = TestClient::new(&ctx);

    let busy = client.create_test_user("busy").await.unwrap();
    let quiet = client.create_test_user("quiet").await.unwrap();
    let group_a = client.create_group(&busy, "A").await;
    let group_b = client.create_group(&quiet, "B").await;

    let as_auth = |u: &common::client::TestUser| AuthUser {
        id: u.id,
        username: u.username.clone(),
        session_id: uuid::Uuid::new_v4(),
    };
    let new_bug = RBugForm {
        title: Some("race".to_string()),
        ..Default::default()
    }
    .validate()
    .unwrap();

    // 10 attempts against a quota of 5, interleaved with 3 from another user.
    let mut handles = Vec::new();
    for i in 0..13 {
        let (group, reporter) = if i % 4 == 3 {
            (group_b, as_auth(&quiet))
        } else {
            (group_a, as_auth(&busy))
        };
        let db = ctx.db.clone();
        let media = ctx.media.clone();
        let bug = new_bug.clone();
        handles.push(tokio::spawn(async move {
            (reporter.id, db.create_bug(group, &reporter, bug, None, &media).await)
        }));
    }

    let (mut busy_ok, mut busy_quota, mut quiet_ok) = (0, 0, 0);
    for handle in handles {
        match handle.await.unwrap() {
            (id, Ok(_)) if id == busy.id => busy_ok += 1,
            (_, Ok(_)) => quiet_ok += 1,
            (id, Err(AppError::QuotaExceeded)) if id == busy.id => busy_quota += 1,
            (_, Err(e)) => panic!("unexpected error: {e:?}"),
        }
    }

    assert_eq!(busy_ok, 5);
    assert_eq!(busy_quota, 5);
    assert_eq!(quiet_ok, 3);

    let filed = ctx.db.list_bugs(group_a).await.unwrap().len() as i32;
    let left = ctx.db.get_subscription(busy.id).await.unwrap().bugs_remaining;
    assert_eq!(filed + left, 5);
    assert_eq!(ctx.db.list_bugs(group_b).await.unwrap().len(), 3);
}
