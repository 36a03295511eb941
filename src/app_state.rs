use std::env;
use std::sync::Arc;

use crate::gitlab::client::GitlabClient;
use crate::gitlab::ScmApi;
use crate::notify::{Notifier, WeComNotifier};

/// Shared, read-only service state. Built once at startup; request handlers
/// only ever borrow it through an `Arc`.
pub struct AppState {
    pub scm: Arc<dyn ScmApi>,
    pub notifier: Arc<dyn Notifier>,
    pub policy: MergePolicy,
    /// Optional shared secret checked against `X-Gitlab-Token`.
    pub webhook_token: Option<String>,
}

/// The safety policy applied before any merge.
#[derive(Debug, Clone)]
pub struct MergePolicy {
    /// Merge target, `main` unless overridden.
    pub target_branch: String,
    /// File suffixes that must not appear in a documentation diff.
    pub blocked_suffixes: Vec<String>,
    /// Enables the stricter readme-existence check on the doc tree.
    pub readme_check: bool,
}

pub fn build_app_state() -> Result<AppState, Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let gitlab_url = env::var("GITLAB_URL")?;
    let gitlab_token = env::var("GITLAB_TOKEN")?;
    let notify_url = env::var("NOTIFY_URL")?;

    let target_branch = env::var("TARGET_BRANCH").unwrap_or_else(|_| "main".to_string());
    let blocked_suffixes = env::var("BLOCKED_EXTENSIONS")
        .unwrap_or_else(|_| ".go".to_string())
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    let readme_check = env::var("README_CHECK_ENABLED")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    Ok(AppState {
        scm: Arc::new(GitlabClient::new(gitlab_url, gitlab_token)?),
        notifier: Arc::new(WeComNotifier::new(notify_url)?),
        policy: MergePolicy {
            target_branch,
            blocked_suffixes,
            readme_check,
        },
        webhook_token: env::var("GITLAB_WEBHOOK_TOKEN").ok(),
    })
}

/// Listen address from `HOST`/`PORT`, defaulting to the hook port the GitLab
/// side is configured with.
pub fn listen_addr() -> String {
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "8888".to_string());
    format!("{host}:{port}")
}
