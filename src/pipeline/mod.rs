pub mod branch;
pub mod classify;
pub mod inspect;
pub mod merge;
pub mod verdict;

use tracing::{debug, info, warn};

use crate::app_state::AppState;
use crate::notify::Notifier;
use crate::pipeline::classify::PushEvent;
use crate::pipeline::verdict::Rejection;

/// Run the whole merge-decision pipeline for one webhook body, returning the
/// plain-text outcome for the HTTP response.
///
/// Fixed sequence with short-circuit on the first failing stage: classify,
/// branch policy, change inspection, merge, success notification. Classifier
/// and policy failures answer without notifying (no merge intent existed
/// yet); everything from inspection onward notifies the pusher on failure.
pub async fn handle_push(state: &AppState, raw_body: &[u8]) -> String {
    let event = match classify::classify(raw_body) {
        Ok(event) => event,
        Err(rejection) => {
            debug!(%rejection, "event not applicable");
            return rejection.to_string();
        }
    };

    // Ordinary pushes land here constantly; a mismatch is a silent ignore,
    // not an error.
    if !branch::is_doc_readme(&event.reference) {
        debug!(reference = %event.reference, "not a documentation branch");
        return Rejection::NotDocBranch.to_string();
    }
    // the gate above guarantees a match; still fail closed if it somehow vanished
    let Some(branch) = branch::doc_readme_token(&event.reference).map(str::to_string) else {
        return Rejection::NotDocBranch.to_string();
    };
    info!(
        event = %event.event_name,
        project = %event.path_with_namespace,
        project_name = %event.project_name,
        description = %event.description,
        branch = %branch,
        user = %event.user_name,
        before = %event.before,
        checkout_sha = ?event.checkout_sha,
        "documentation push received"
    );

    let scm = state.scm.as_ref();
    match scm.get_project(event.project_id).await {
        Ok(project) => debug!(
            project_id = project.id,
            project = %project.name,
            default_branch = ?project.default_branch,
            "resolved project"
        ),
        Err(err) => {
            let rejection = Rejection::upstream(err);
            warn!(%rejection, project_id = event.project_id, "project lookup failed");
            notify_user(state, &event, &rejection.to_string()).await;
            return rejection.to_string();
        }
    }

    if let Err(rejection) =
        inspect::inspect_changes(scm, &state.policy, event.project_id, &branch).await
    {
        debug!(%rejection, branch = %branch, "change inspection rejected the push");
        notify_user(state, &event, &rejection.to_string()).await;
        return rejection.to_string();
    }

    if let Err(rejection) =
        merge::merge_doc_branch(scm, &state.policy, event.project_id, &branch).await
    {
        warn!(%rejection, branch = %branch, "merge attempt failed");
        notify_user(state, &event, &merge_failure_notice(&rejection)).await;
        return rejection.to_string();
    }

    match send_notice(
        state.notifier.as_ref(),
        &event.user_email,
        &event.path_with_namespace,
        &event.reference,
        "Merged Successfully",
    )
    .await
    {
        Ok(()) => "notify success".to_string(),
        Err(rejection) => rejection.to_string(),
    }
}

/// Pick the notification text for a failed merge stage. Known conflict codes
/// get a tailored message; anything unrecognized gets the generic one.
fn merge_failure_notice(rejection: &Rejection) -> String {
    match rejection {
        Rejection::MergeConflict { status: 405 } => rejection.to_string(),
        Rejection::MergeConflict { status: 409 } => {
            "409: This merge request already exists".to_string()
        }
        _ => "merge failed".to_string(),
    }
}

/// Format and post one notification. Failures are reported to the caller as
/// a verdict, never back into the merge logic.
pub async fn send_notice(
    notifier: &dyn Notifier,
    recipient: &str,
    project_path: &str,
    reference: &str,
    message: &str,
) -> Result<(), Rejection> {
    let branch = branch::doc_readme_token(reference).unwrap_or(reference);
    let content = format!(
        "Project: {project_path}\n\nBranch: {branch}\nMessage: {message}\n\nTime: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    notifier
        .post_notification(recipient, &content)
        .await
        .map_err(|err| {
            warn!(%err, recipient, "notification delivery failed");
            Rejection::NotifyFailed
        })
}

async fn notify_user(state: &AppState, event: &PushEvent, message: &str) {
    if let Err(rejection) = send_notice(
        state.notifier.as_ref(),
        &event.user_email,
        &event.path_with_namespace,
        &event.reference,
        message,
    )
    .await
    {
        warn!(%rejection, "failure notification was not delivered");
    }
}
