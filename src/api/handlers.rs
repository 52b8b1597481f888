//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::Json,
};
use tracing::{error, info};

use crate::{commands::dispatch_command, state::AppState};
use super::responses::{AdjustResponse, HealthResponse, StatusResponse};

/// Handle GET /status - Report the countdown and latch state
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let snapshot = state.get_timer_snapshot().map_err(|e| {
        error!("Failed to read timer state: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    let (last_command, last_command_time) = state.get_last_command();

    Ok(Json(StatusResponse {
        remaining_seconds: snapshot.remaining_seconds,
        max_seconds: snapshot.max_seconds,
        latch_energized: snapshot.latch_energized,
        uptime: state.get_uptime(),
        last_command,
        last_command_time,
    }))
}

/// Handle GET /health - Health check
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

/// Handle POST /adjust - Apply the body as a timer command
pub async fn adjust_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<AdjustResponse>, (StatusCode, Json<AdjustResponse>)> {
    let internal_error = |e: String| {
        error!("Failed to apply HTTP command: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(AdjustResponse::new("error", e, 0)),
        )
    };

    match dispatch_command(&state, "POST /adjust", &body).map_err(internal_error)? {
        Some(adjustment) => {
            info!("Adjust endpoint called - timer moved from {} to {}", adjustment.before, adjustment.after);
            Ok(Json(AdjustResponse::applied(
                format!("Applied {:+} seconds", adjustment.delta),
                adjustment.after,
            )))
        }
        None => {
            let snapshot = state.get_timer_snapshot().map_err(internal_error)?;
            Err((
                StatusCode::BAD_REQUEST,
                Json(AdjustResponse::ignored(
                    "Body must be empty or a signed number of seconds".to_string(),
                    snapshot.remaining_seconds,
                )),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    use super::*;
    use crate::{
        api::create_router,
        hardware::Latch,
        state::CountdownTimer,
    };

    #[derive(Default)]
    struct FlagLatch(bool);

    impl Latch for FlagLatch {
        fn activate(&mut self) {
            self.0 = true;
        }

        fn deactivate(&mut self) {
            self.0 = false;
        }

        fn is_energized(&self) -> bool {
            self.0
        }
    }

    fn state() -> Arc<AppState> {
        let timer = CountdownTimer::new(600, Box::new(FlagLatch::default()));
        Arc::new(AppState::new(Arc::new(timer), 300))
    }

    async fn post_adjust(state: &Arc<AppState>, body: &'static str) -> (StatusCode, AdjustResponse) {
        let request = Request::builder()
            .method("POST")
            .uri("/adjust")
            .body(Body::from(body))
            .unwrap();
        let response = create_router(Arc::clone(state)).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn empty_body_adds_default() {
        let state = state();
        let (status, body) = post_adjust(&state, "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.status, "applied");
        assert_eq!(body.remaining_seconds, 300);
    }

    #[tokio::test]
    async fn malformed_body_is_rejected_without_change() {
        let state = state();
        post_adjust(&state, "120").await;
        let (status, body) = post_adjust(&state, "two minutes").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.status, "ignored");
        assert_eq!(body.remaining_seconds, 120);
    }

    #[tokio::test]
    async fn status_reports_timer() {
        let state = state();
        post_adjust(&state, "1000").await;

        let request = Request::builder().uri("/status").body(Body::empty()).unwrap();
        let response = create_router(Arc::clone(&state)).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let status: StatusResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(status.remaining_seconds, 600);
        assert_eq!(status.max_seconds, 600);
        assert!(status.latch_energized);
        assert_eq!(status.last_command.as_deref(), Some("POST /adjust +1000 seconds"));
    }

    #[tokio::test]
    async fn health_is_ok() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = create_router(state()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
