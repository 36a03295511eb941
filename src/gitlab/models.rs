use serde::Deserialize;

/// Raw system-hook push payload as GitLab sends it. Everything is optional
/// here; the classifier decides which absences are fatal.
#[derive(Deserialize, Debug)]
pub struct PushHook {
    pub event_name: Option<String>,
    #[serde(rename = "ref")]
    pub reference: Option<String>,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub project_id: Option<u64>,
    pub project: Option<ProjectBlock>,
    pub repository: Option<RepositoryBlock>,
    pub before: Option<String>,
    pub after: Option<String>,
    pub checkout_sha: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct ProjectBlock {
    pub name: Option<String>,
    pub path_with_namespace: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct RepositoryBlock {
    pub description: Option<String>,
}

/// Project handle resolved through the API, confirming the hook's
/// `project_id` is visible to our token before anything is mutated.
#[derive(Deserialize, Debug)]
pub struct Project {
    pub id: u64,
    pub name: String,
    pub path_with_namespace: String,
    #[serde(default)]
    pub default_branch: Option<String>,
}

/// One entry of a `repository/compare` diff list.
#[derive(Deserialize, Debug, Clone)]
pub struct DiffEntry {
    pub new_path: String,
    #[serde(default)]
    pub new_file: bool,
    #[serde(default)]
    pub renamed_file: bool,
    #[serde(default)]
    pub deleted_file: bool,
}

impl DiffEntry {
    pub fn change_kind(&self) -> &'static str {
        if self.new_file {
            "added"
        } else if self.deleted_file {
            "deleted"
        } else if self.renamed_file {
            "renamed"
        } else {
            "modified"
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct CompareResult {
    pub diffs: Vec<DiffEntry>,
}

#[derive(Deserialize, Debug)]
pub struct MergeRequest {
    pub iid: u64,
    #[serde(default)]
    pub web_url: Option<String>,
}

/// Entry of a `repository/tree` listing. `kind` is "blob" for files.
#[derive(Deserialize, Debug, Clone)]
pub struct TreeEntry {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Deserialize, Debug)]
pub struct RepoFile {
    pub file_name: String,
    pub size: u64,
}
