use tracing::info;

use crate::app_state::MergePolicy;
use crate::gitlab::{ScmApi, ScmError};
use crate::pipeline::verdict::Rejection;

const MR_TITLE: &str = "merge readme";

/// Create a merge request for `branch` into the target branch and merge it
/// immediately. Two remote calls with no transaction between them: a crash
/// after creation leaves an open MR behind, which a later push resolves as a
/// conflict verdict. No retry at any point.
pub async fn merge_doc_branch(
    scm: &dyn ScmApi,
    policy: &MergePolicy,
    project_id: u64,
    branch: &str,
) -> Result<(), Rejection> {
    let mr = scm
        .create_merge_request(project_id, branch, &policy.target_branch, MR_TITLE)
        .await
        .map_err(|err| match err {
            ScmError::Status { status, .. } => Rejection::MergeConflict { status },
            other => Rejection::upstream(other),
        })?;

    scm.merge(project_id, mr.iid)
        .await
        .map_err(|err| match err {
            ScmError::Status { message, .. } => Rejection::MergeRejected { detail: message },
            other => Rejection::upstream(other),
        })?;

    info!(
        project_id,
        branch,
        mr_iid = mr.iid,
        url = ?mr.web_url,
        "merged documentation branch"
    );
    Ok(())
}
