use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::app_state::MergePolicy;
use crate::gitlab::ScmApi;
use crate::pipeline::verdict::Rejection;

static README_FILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)readme\.md$").expect("valid pattern"));

/// Guard against auto-merging a documentation branch that carries code
/// changes. Path-based filtering only; no content analysis.
pub async fn inspect_changes(
    scm: &dyn ScmApi,
    policy: &MergePolicy,
    project_id: u64,
    branch: &str,
) -> Result<(), Rejection> {
    let diffs = scm
        .compare_branches(project_id, &policy.target_branch, branch)
        .await
        .map_err(Rejection::upstream)?;

    if diffs.is_empty() {
        return Err(Rejection::NoChange);
    }
    for diff in &diffs {
        for suffix in &policy.blocked_suffixes {
            if diff.new_path.contains(suffix.as_str()) {
                debug!(
                    path = %diff.new_path,
                    kind = diff.change_kind(),
                    suffix = %suffix,
                    "blocked path in diff"
                );
                return Err(Rejection::DisallowedChange {
                    branch: branch.to_string(),
                    suffix: suffix.clone(),
                });
            }
        }
    }

    if policy.readme_check {
        check_readme_file(scm, project_id, branch).await?;
    }
    Ok(())
}

/// Optional stricter check: the branch's doc directory must hold exactly one
/// non-empty file named `readme.md` (any casing). Off by default.
async fn check_readme_file(
    scm: &dyn ScmApi,
    project_id: u64,
    branch: &str,
) -> Result<(), Rejection> {
    // "doc/readme" -> directory "doc"
    let dir = branch.split('/').next().unwrap_or(branch);
    let entries = scm
        .repository_tree(project_id, dir, branch)
        .await
        .map_err(Rejection::upstream)?;

    let [entry] = entries.as_slice() else {
        return Err(Rejection::ReadmeTreeMismatch);
    };
    if entry.kind != "blob" {
        return Err(Rejection::ReadmeTreeMismatch);
    }
    if !README_FILE.is_match(&entry.name) {
        return Err(Rejection::ReadmeNameMismatch);
    }

    let size = scm
        .file_size(project_id, &entry.path, branch)
        .await
        .map_err(Rejection::upstream)?;
    if size == 0 {
        return Err(Rejection::ReadmeEmpty);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::testing::FakeScm;

    fn policy(readme_check: bool) -> MergePolicy {
        MergePolicy {
            target_branch: "main".to_string(),
            blocked_suffixes: vec![".go".to_string()],
            readme_check,
        }
    }

    #[tokio::test]
    async fn empty_diff_is_no_change() {
        let scm = FakeScm::new();
        let verdict = inspect_changes(&scm, &policy(false), 42, "doc/readme").await;
        assert_eq!(verdict, Err(Rejection::NoChange));
    }

    #[tokio::test]
    async fn blocked_suffix_anywhere_in_diff_is_rejected() {
        let scm = FakeScm::new().with_diff_paths(&["README.md", "cmd/server/main.go"]);
        let verdict = inspect_changes(&scm, &policy(false), 42, "doc/readme").await;
        assert_eq!(
            verdict,
            Err(Rejection::DisallowedChange {
                branch: "doc/readme".to_string(),
                suffix: ".go".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn clean_docs_only_diff_passes() {
        let scm = FakeScm::new().with_diff_paths(&["README.md"]);
        let verdict = inspect_changes(&scm, &policy(false), 42, "doc/readme").await;
        assert_eq!(verdict, Ok(()));
    }

    #[tokio::test]
    async fn readme_check_rejects_multi_entry_tree() {
        let scm = FakeScm::new()
            .with_diff_paths(&["doc/README.md"])
            .with_tree(&[("README.md", "blob"), ("notes.txt", "blob")]);
        let verdict = inspect_changes(&scm, &policy(true), 42, "doc/readme").await;
        assert_eq!(verdict, Err(Rejection::ReadmeTreeMismatch));
    }

    #[tokio::test]
    async fn readme_check_rejects_wrong_filename() {
        let scm = FakeScm::new()
            .with_diff_paths(&["doc/intro.md"])
            .with_tree(&[("intro.md", "blob")]);
        let verdict = inspect_changes(&scm, &policy(true), 42, "doc/readme").await;
        assert_eq!(verdict, Err(Rejection::ReadmeNameMismatch));
    }

    #[tokio::test]
    async fn readme_check_rejects_empty_file() {
        let scm = FakeScm::new()
            .with_diff_paths(&["doc/README.md"])
            .with_tree(&[("README.md", "blob")])
            .with_file_size(0);
        let verdict = inspect_changes(&scm, &policy(true), 42, "doc/readme").await;
        assert_eq!(verdict, Err(Rejection::ReadmeEmpty));
    }

    #[tokio::test]
    async fn readme_check_accepts_single_readme_blob() {
        let scm = FakeScm::new()
            .with_diff_paths(&["doc/ReadMe.md"])
            .with_tree(&[("ReadMe.md", "blob")])
            .with_file_size(120);
        let verdict = inspect_changes(&scm, &policy(true), 42, "doc/readme").await;
        assert_eq!(verdict, Ok(()));
    }
}
