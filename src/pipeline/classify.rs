use crate::gitlab::models::PushHook;
use crate::pipeline::verdict::Rejection;

const ZERO_SHA: &str = "0000000000000000000000000000000000000000";

/// Normalized push event. Constructed only by [`classify`]; downstream
/// stages rely on every field being present and validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushEvent {
    pub event_name: String,
    pub reference: String,
    pub user_name: String,
    pub user_email: String,
    pub project_id: u64,
    pub project_name: String,
    pub path_with_namespace: String,
    pub description: String,
    pub before: String,
    pub after: String,
    pub checkout_sha: Option<String>,
}

/// Parse and validate a raw webhook body into a [`PushEvent`].
///
/// Rejects non-push events, payloads missing the reference or the
/// project/repository blocks, and branch deletions (all-zero `after` with no
/// checkout SHA), which must never trigger a merge attempt.
pub fn classify(raw_body: &[u8]) -> Result<PushEvent, Rejection> {
    let hook: PushHook =
        serde_json::from_slice(raw_body).map_err(|_| Rejection::InvalidPayload)?;

    if hook.event_name.as_deref() != Some("push") {
        return Err(Rejection::WrongEventKind);
    }
    let reference = hook.reference.ok_or(Rejection::MissingReference)?;
    let project = hook.project.ok_or(Rejection::MissingProject)?;
    let project_id = hook.project_id.ok_or(Rejection::MissingProject)?;
    let repository = hook.repository.ok_or(Rejection::MissingRepository)?;

    let after = hook.after.unwrap_or_default();
    let checkout_missing = hook
        .checkout_sha
        .as_deref()
        .is_none_or(|sha| sha.is_empty());
    if after == ZERO_SHA && checkout_missing {
        return Err(Rejection::BranchDeleted);
    }

    Ok(PushEvent {
        event_name: "push".to_string(),
        reference,
        user_name: hook.user_name.unwrap_or_default(),
        user_email: hook.user_email.unwrap_or_default(),
        project_id,
        project_name: project.name.unwrap_or_default(),
        path_with_namespace: project.path_with_namespace.unwrap_or_default(),
        description: repository.description.unwrap_or_default(),
        before: hook.before.unwrap_or_default(),
        after,
        checkout_sha: hook.checkout_sha,
    })
}
