pub mod client;
pub mod models;

use async_trait::async_trait;
use thiserror::Error;

use crate::gitlab::models::{DiffEntry, MergeRequest, Project, TreeEntry};

/// Errors from the GitLab collaborator, normalized so callers can
/// discriminate on the upstream status without parsing reqwest errors.
#[derive(Debug, Error)]
pub enum ScmError {
    #[error("upstream request timed out")]
    Timeout,
    #[error("gitlab returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("gitlab transport error: {0}")]
    Transport(String),
    #[error("gitlab response could not be decoded: {0}")]
    Decode(String),
}

/// The narrow slice of the GitLab API this service consumes. Injected as a
/// trait object so tests can substitute a recording fake.
#[async_trait]
pub trait ScmApi: Send + Sync {
    /// Resolve a project handle by numeric id.
    async fn get_project(&self, project_id: u64) -> Result<Project, ScmError>;

    /// Diff `to` against `from`, returning the changed-file list in order.
    async fn compare_branches(
        &self,
        project_id: u64,
        from: &str,
        to: &str,
    ) -> Result<Vec<DiffEntry>, ScmError>;

    async fn create_merge_request(
        &self,
        project_id: u64,
        source_branch: &str,
        target_branch: &str,
        title: &str,
    ) -> Result<MergeRequest, ScmError>;

    /// Merge an open merge request. A refusal (not mergeable, closed)
    /// comes back as `ScmError::Status` with the upstream message.
    async fn merge(&self, project_id: u64, mr_iid: u64) -> Result<(), ScmError>;

    /// List the repository tree under `path` at `reference`.
    async fn repository_tree(
        &self,
        project_id: u64,
        path: &str,
        reference: &str,
    ) -> Result<Vec<TreeEntry>, ScmError>;

    /// Size in bytes of the file at `path` on `reference`.
    async fn file_size(
        &self,
        project_id: u64,
        path: &str,
        reference: &str,
    ) -> Result<u64, ScmError>;
}
