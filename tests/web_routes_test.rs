//! HTTP routes driven in-process through the router.
//!
//! Run with: cargo test --test web_routes_test

mod common;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use common::TestEnvironment;
use jobboard::core::types::{Job, JobStatus, Preference, Subscription, UserCategory};
use jobboard::core::web_server::create_router;
use jobboard::storage::subscriptions;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;

const EMPLOYER: i64 = 3001;

async fn call(router: Router, method: Method, uri: &str, body: Body) -> (StatusCode, Vec<u8>) {
    let request = Request::builder().method(method).uri(uri).body(body).unwrap();
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

async fn get(env: &TestEnvironment, uri: &str) -> (StatusCode, Vec<u8>) {
    call(create_router(env.deps.clone()), Method::GET, uri, Body::empty()).await
}

fn opened_job(env: &TestEnvironment, employer_id: &str) -> Job {
    let mut job = Job::new("JB-web", employer_id, "Accountant");
    job.status = JobStatus::Opened;
    job.sector = "Health".into();
    job.job_type = "FullTime".into();
    job.education_level = "BA".into();
    job.experience = "1 year".into();
    job.description = "Books and payroll".into();
    job.contact_type = "Via Telegram Account".into();
    env.add_job(&job);
    job
}

#[tokio::test]
async fn test_health() {
    let env = TestEnvironment::new();
    let (status, body) = get(&env, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_slice::<Value>(&body).unwrap(), json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_unparseable_webhook_is_acknowledged() {
    let env = TestEnvironment::new();
    let (status, _) = call(
        create_router(env.deps.clone()),
        Method::POST,
        "/",
        Body::from("not json"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(env.messenger.calls().is_empty());
}

#[tokio::test]
async fn test_webhook_starts_registration() {
    let env = TestEnvironment::new();
    let update = json!({
        "update_id": 10,
        "message": {
            "text": "/start",
            "chat": { "id": 4242 },
            "from": { "id": 4242, "language_code": "en" }
        }
    });

    let (status, _) = call(
        create_router(env.deps.clone()),
        Method::POST,
        "/",
        Body::from(update.to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        env.messenger.texts_to(4242)[0],
        "Welcome 👋 to አሰሪ, please register first!"
    );
}

#[tokio::test]
async fn test_approval_for_missing_job_is_bad_request() {
    let env = TestEnvironment::new();
    let (status, body) = get(&env, "/approval/result/JB-missing").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert!(body["error"].as_str().unwrap().contains("JB-missing"));
}

#[tokio::test]
async fn test_approval_result_reaches_employer() {
    let env = TestEnvironment::new();
    let employer = env.register(EMPLOYER, "Acme", "+251911000301", UserCategory::Employer);
    let job = opened_job(&env, &employer.id);

    let (status, _) = get(&env, &format!("/approval/result/{}", job.id)).await;

    assert_eq!(status, StatusCode::OK);
    let texts = env.messenger.texts_to(EMPLOYER);
    assert_eq!(texts.len(), 1);
    assert!(texts[0].starts_with("------------- <b>Approved</b> -------------\n\n<b>Job Title</b>:  Accountant"));
}

#[tokio::test]
async fn test_pending_job_approval_is_refused() {
    let env = TestEnvironment::new();
    let employer = env.register(EMPLOYER, "Acme", "+251911000301", UserCategory::Employer);
    let mut job = Job::new("JB-pending", employer.id.as_str(), "Accountant");
    job.status = JobStatus::Pending;
    env.add_job(&job);

    let (status, body) = get(&env, "/approval/result/JB-pending").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        serde_json::from_slice::<Value>(&body).unwrap(),
        json!({ "error": "unable to perform operation" })
    );
}

#[tokio::test]
async fn test_channel_post_falls_back_to_local_phone() {
    let env = TestEnvironment::new();
    let employer = env.register(EMPLOYER, "Acme", "+251911000301", UserCategory::Employer);
    let job = opened_job(&env, &employer.id);

    let (status, _) = get(&env, &format!("/push/notification/channel/{}", job.id)).await;

    assert_eq!(status, StatusCode::OK);
    let posts = env.messenger.channel_posts();
    assert_eq!(posts.len(), 1);
    assert!(posts[0].contains("<b>አሰሪ</b>:  Acme"));
    assert!(posts[0].contains("<b>Contact</b>: 0911000301"));
    assert!(posts[0].contains("#Health"));
}

#[tokio::test]
async fn test_subscriber_route_queues_alerts() {
    let env = TestEnvironment::new();
    let employer = env.register(EMPLOYER, "Acme", "+251911000301", UserCategory::Employer);
    let seeker = env.register(3002, "Abebe", "+251911000302", UserCategory::JobSeeker);
    subscriptions::add_subscription(
        &env.conn(),
        &Subscription {
            id: "SB-web".into(),
            user_id: seeker.id.clone(),
            sector: "Health".into(),
            job_type: Preference::Any,
            education_level: Preference::Any,
            experience: Preference::Any,
        },
    )
    .unwrap();
    let job = opened_job(&env, &employer.id);

    let (status, _) = get(&env, &format!("/push/notification/subscriber/{}", job.id)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(env.push_queue.len().await, 1);
}
