use thiserror::Error;

use crate::gitlab::ScmError;

/// Fail side of a pipeline verdict. Every stage returns `Result<_, Rejection>`
/// and the pipeline inspects these explicitly; nothing unwinds across stage
/// boundaries. The `Display` text is what the webhook caller receives.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum Rejection {
    #[error("Invalid JSON payload")]
    InvalidPayload,
    #[error("The event is not push")]
    WrongEventKind,
    #[error("No ref updates")]
    MissingReference,
    #[error("No project updates")]
    MissingProject,
    #[error("No repository updates")]
    MissingRepository,
    #[error("Delete project branches")]
    BranchDeleted,
    #[error("No readme update")]
    NotDocBranch,
    #[error("no change")]
    NoChange,
    #[error("{branch} branch contains \"{suffix}\" source file changes")]
    DisallowedChange { branch: String, suffix: String },
    #[error("File check does not pass")]
    ReadmeTreeMismatch,
    #[error("Filename check failed")]
    ReadmeNameMismatch,
    #[error("File is Empty")]
    ReadmeEmpty,
    /// Merge-request creation refused; carries the upstream status so the
    /// pipeline can pick a tailored notification for known conflict codes.
    #[error("{status}")]
    MergeConflict { status: u16 },
    /// Merge call refused after a successful creation; upstream message
    /// passed through verbatim.
    #[error("{detail}")]
    MergeRejected { detail: String },
    #[error("upstream request timed out")]
    UpstreamTimeout,
    #[error("upstream error: {detail}")]
    Upstream { detail: String },
    #[error("notify failed")]
    NotifyFailed,
}

impl Rejection {
    /// Normalize collaborator errors outside the merge stage, where status
    /// codes carry no special meaning. Timeouts stay distinct.
    pub fn upstream(err: ScmError) -> Self {
        match err {
            ScmError::Timeout => Rejection::UpstreamTimeout,
            other => Rejection::Upstream {
                detail: other.to_string(),
            },
        }
    }
}
