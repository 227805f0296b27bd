//! Webhook and job-notification HTTP server.
//!
//! `POST /` receives Telegram updates. The three `GET` routes are called by
//! the job board's web side once an admin has decided on a job.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::telegram::handlers::{handle_update, HandlerDeps};
use crate::telegram::notifications::{self, NotifyError};
use crate::telegram::types::Update;

/// Builds the router. Split from [`start_web_server`] so tests can drive it in-process.
pub fn create_router(deps: HandlerDeps) -> Router {
    Router::new()
        .route("/", post(webhook_handler))
        .route("/approval/result/{id}", get(approval_result_handler))
        .route("/push/notification/channel/{id}", get(channel_notification_handler))
        .route("/push/notification/subscriber/{id}", get(subscriber_notification_handler))
        .route("/health", get(health_handler))
        .with_state(deps)
}

/// Start the web server.
pub async fn start_web_server(port: u16, deps: HandlerDeps) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = create_router(deps);

    log::info!("Starting web server on http://{}", addr);
    log::info!("  POST /                                  - Telegram webhook");
    log::info!("  GET  /approval/result/{{id}}              - Approval result to the employer");
    log::info!("  GET  /push/notification/channel/{{id}}    - Post an opened job to the channel");
    log::info!("  GET  /push/notification/subscriber/{{id}} - Queue an opened job for subscribers");
    log::info!("  GET  /health                            - Health check");

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Always answers 200 so Telegram does not redeliver an update it cannot parse.
async fn webhook_handler(State(deps): State<HandlerDeps>, body: Bytes) -> StatusCode {
    let update: Update = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(e) => {
            log::error!("Unable to parse webhook update: {}", e);
            return StatusCode::OK;
        }
    };

    log::debug!("Update {} from {}", update.update_id, update.sender_id());
    handle_update(&deps, &update).await;
    StatusCode::OK
}

fn notification_response<T>(result: Result<T, NotifyError>, route: &str, id: &str) -> Response {
    match result {
        Ok(_) => StatusCode::OK.into_response(),
        Err(e) => {
            log::warn!("{} for job {} failed: {}", route, id, e);
            (StatusCode::BAD_REQUEST, Json(json!({ "error": e.to_string() }))).into_response()
        }
    }
}

async fn approval_result_handler(Path(id): Path<String>, State(deps): State<HandlerDeps>) -> Response {
    let result = notifications::send_approval_result(&deps, &id).await;
    notification_response(result, "Approval result", &id)
}

async fn channel_notification_handler(Path(id): Path<String>, State(deps): State<HandlerDeps>) -> Response {
    let result = notifications::push_to_channel(&deps, &id).await;
    notification_response(result, "Channel notification", &id)
}

async fn subscriber_notification_handler(Path(id): Path<String>, State(deps): State<HandlerDeps>) -> Response {
    let result = notifications::push_to_subscribers(&deps, &id).await;
    if let Ok(queued) = &result {
        log::info!("Queued {} notifications for job {}", queued, id);
    }
    notification_response(result, "Subscriber notification", &id)
}

async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}
