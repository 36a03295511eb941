use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::json;
use tracing::debug;

use crate::gitlab::models::{CompareResult, DiffEntry, MergeRequest, Project, RepoFile, TreeEntry};
use crate::gitlab::{ScmApi, ScmError};

/// Per-request timeout on all GitLab calls.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// GitLab v4 API client authenticated with a private token.
pub struct GitlabClient {
    client: Client,
    base_url: String,
    token: String,
}

impl GitlabClient {
    pub fn new(base_url: String, token: String) -> Result<Self, ScmError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ScmError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api/v4{}", self.base_url, path)
    }

    /// Map a non-success response into `ScmError::Status`, keeping the body
    /// text so merge refusals can be surfaced verbatim.
    async fn check(resp: Response) -> Result<Response, ScmError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let message = resp.text().await.unwrap_or_default();
        Err(ScmError::Status {
            status: status.as_u16(),
            message,
        })
    }

    fn send_err(err: reqwest::Error) -> ScmError {
        if err.is_timeout() {
            ScmError::Timeout
        } else {
            ScmError::Transport(err.to_string())
        }
    }

    async fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<Response, ScmError> {
        let resp = self
            .client
            .get(url)
            .header("PRIVATE-TOKEN", &self.token)
            .query(query)
            .send()
            .await
            .map_err(Self::send_err)?;
        Self::check(resp).await
    }
}

#[async_trait]
impl ScmApi for GitlabClient {
    async fn get_project(&self, project_id: u64) -> Result<Project, ScmError> {
        let url = self.api_url(&format!("/projects/{project_id}"));
        let project: Project = self
            .get(&url, &[])
            .await?
            .json()
            .await
            .map_err(|e| ScmError::Decode(e.to_string()))?;
        debug!(project_id, path = %project.path_with_namespace, "resolved project");
        Ok(project)
    }

    async fn compare_branches(
        &self,
        project_id: u64,
        from: &str,
        to: &str,
    ) -> Result<Vec<DiffEntry>, ScmError> {
        let url = self.api_url(&format!("/projects/{project_id}/repository/compare"));
        let result: CompareResult = self
            .get(&url, &[("from", from), ("to", to)])
            .await?
            .json()
            .await
            .map_err(|e| ScmError::Decode(e.to_string()))?;
        debug!(project_id, from, to, diffs = result.diffs.len(), "compared branches");
        Ok(result.diffs)
    }

    async fn create_merge_request(
        &self,
        project_id: u64,
        source_branch: &str,
        target_branch: &str,
        title: &str,
    ) -> Result<MergeRequest, ScmError> {
        let url = self.api_url(&format!("/projects/{project_id}/merge_requests"));
        let resp = self
            .client
            .post(&url)
            .header("PRIVATE-TOKEN", &self.token)
            .json(&json!({
                "source_branch": source_branch,
                "target_branch": target_branch,
                "title": title,
            }))
            .send()
            .await
            .map_err(Self::send_err)?;
        let mr: MergeRequest = Self::check(resp)
            .await?
            .json()
            .await
            .map_err(|e| ScmError::Decode(e.to_string()))?;
        debug!(project_id, mr_iid = mr.iid, source_branch, "created merge request");
        Ok(mr)
    }

    async fn merge(&self, project_id: u64, mr_iid: u64) -> Result<(), ScmError> {
        let url = self.api_url(&format!(
            "/projects/{project_id}/merge_requests/{mr_iid}/merge"
        ));
        let resp = self
            .client
            .put(&url)
            .header("PRIVATE-TOKEN", &self.token)
            .send()
            .await
            .map_err(Self::send_err)?;
        Self::check(resp).await?;
        debug!(project_id, mr_iid, "merged merge request");
        Ok(())
    }

    async fn repository_tree(
        &self,
        project_id: u64,
        path: &str,
        reference: &str,
    ) -> Result<Vec<TreeEntry>, ScmError> {
        let url = self.api_url(&format!("/projects/{project_id}/repository/tree"));
        self.get(&url, &[("path", path), ("ref", reference)])
            .await?
            .json()
            .await
            .map_err(|e| ScmError::Decode(e.to_string()))
    }

    async fn file_size(
        &self,
        project_id: u64,
        path: &str,
        reference: &str,
    ) -> Result<u64, ScmError> {
        let encoded = urlencoding::encode(path);
        let url = self.api_url(&format!(
            "/projects/{project_id}/repository/files/{encoded}"
        ));
        let file: RepoFile = self
            .get(&url, &[("ref", reference)])
            .await?
            .json()
            .await
            .map_err(|e| ScmError::Decode(e.to_string()))?;
        debug!(project_id, file = %file.file_name, size = file.size, "fetched file metadata");
        Ok(file.size)
    }
}
