use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use std::sync::Arc;
use tracing::warn;

use crate::app_state::AppState;
use crate::pipeline::handle_push;

/// `POST /readme` — the merge pipeline entry point.
///
/// Always answers 200 with a plain-text verdict: the GitLab dispatcher
/// retries on 5xx and a retry storm is worse than a dropped message. The
/// pipeline is spawned onto the runtime so a webhook client hanging up does
/// not cancel an in-flight merge; only the response can be lost.
pub async fn readme_hook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Some(expected) = state.webhook_token.as_deref() {
        let given = headers
            .get("X-Gitlab-Token")
            .and_then(|value| value.to_str().ok());
        if given != Some(expected) {
            warn!("webhook token mismatch");
            return (StatusCode::UNAUTHORIZED, "invalid webhook token").into_response();
        }
    }

    let task = tokio::spawn(async move { handle_push(&state, &body).await });
    match task.await {
        Ok(text) => (StatusCode::OK, text).into_response(),
        Err(err) => {
            warn!(%err, "pipeline task failed");
            (StatusCode::OK, "internal error".to_string()).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_state::MergePolicy;
    use crate::pipeline::testing::{FakeNotifier, FakeScm};
    use axum::http::HeaderValue;

    fn state(token: Option<&str>) -> Arc<AppState> {
        Arc::new(AppState {
            scm: Arc::new(FakeScm::new()),
            notifier: Arc::new(FakeNotifier::new()),
            policy: MergePolicy {
                target_branch: "main".to_string(),
                blocked_suffixes: vec![".go".to_string()],
                readme_check: false,
            },
            webhook_token: token.map(str::to_string),
        })
    }

    #[tokio::test]
    async fn token_mismatch_is_unauthorized_before_the_pipeline_runs() {
        let state = state(Some("secret"));
        let mut headers = HeaderMap::new();
        headers.insert("X-Gitlab-Token", HeaderValue::from_static("wrong"));

        let response = readme_hook(State(state), headers, Bytes::from_static(b"{}")).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn missing_token_header_is_unauthorized_when_secret_is_set() {
        let state = state(Some("secret"));
        let response =
            readme_hook(State(state), HeaderMap::new(), Bytes::from_static(b"{}")).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn verdicts_come_back_as_200_text() {
        let state = state(None);
        let body = Bytes::from_static(b"{\"event_name\":\"tag_push\"}");
        let response = readme_hook(State(state), HeaderMap::new(), body).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
