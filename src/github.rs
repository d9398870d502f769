//! Minimal GitHub REST client for listing commits and their changed files.

use log::debug;
use serde::{Deserialize, de::DeserializeOwned};

use crate::error::{BotError, Result};

pub const GITHUB_API_URL: &str = "https://api.github.com";

const USER_AGENT: &str = concat!("docsbot/", env!("CARGO_PKG_VERSION"));

/// Entry of `GET /repos/{owner}/{repo}/commits`.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitSummary {
    pub sha: String,
}

/// Response of `GET /repos/{owner}/{repo}/commits/{sha}`.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitDetail {
    pub sha: String,
    pub html_url: String,
    pub commit: CommitInfo,
    #[serde(default)]
    pub files: Vec<ChangedFile>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitInfo {
    pub author: Option<CommitAuthor>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitAuthor {
    pub date: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangedFile {
    pub filename: String,
}

impl CommitDetail {
    /// Author date of the commit, or an empty string when GitHub omits it.
    #[must_use]
    pub fn date(&self) -> &str {
        self.commit
            .author
            .as_ref()
            .and_then(|author| author.date.as_deref())
            .unwrap_or_default()
    }
}

pub struct GitHubClient {
    client: reqwest::Client,
    token: Option<String>,
    api_base: String,
}

impl GitHubClient {
    pub fn new(token: Option<String>) -> Result<Self> {
        Self::with_base_url(token, GITHUB_API_URL.to_string())
    }

    /// Create a client against a custom API root (no trailing slash).
    pub fn with_base_url(token: Option<String>, api_base: String) -> Result<Self> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            client,
            token,
            api_base,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!("GitHub GET {url}");

        let mut request = self
            .client
            .get(url)
            .header("Accept", "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .text()
                .await
                .unwrap_or_else(|e| format!("Failed to read error response: {e}"));
            return Err(BotError::GitHubApi { status, message });
        }

        Ok(response.json().await?)
    }

    /// List the `per_page` most recent commits on the default branch.
    pub async fn list_commits(
        &self,
        owner: &str,
        repo: &str,
        per_page: u8,
    ) -> Result<Vec<CommitSummary>> {
        let url = format!(
            "{}/repos/{owner}/{repo}/commits?per_page={per_page}",
            self.api_base
        );
        self.get_json(&url).await
    }

    /// Fetch a single commit including its changed files.
    pub async fn get_commit(&self, owner: &str, repo: &str, sha: &str) -> Result<CommitDetail> {
        let url = format!("{}/repos/{owner}/{repo}/commits/{sha}", self.api_base);
        self.get_json(&url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn lists_commits_with_token() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/acme/docs/commits"))
            .and(query_param("per_page", "3"))
            .and(header("Authorization", "Bearer ghp-test"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([{ "sha": "a1" }, { "sha": "b2" }])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client =
            GitHubClient::with_base_url(Some("ghp-test".to_string()), server.uri()).unwrap();
        let commits = client.list_commits("acme", "docs", 3).await.unwrap();
        let shas: Vec<_> = commits.iter().map(|c| c.sha.as_str()).collect();
        assert_eq!(shas, ["a1", "b2"]);
    }

    #[tokio::test]
    async fn commit_detail_without_files_or_author() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/acme/docs/commits/a1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "sha": "a1",
                "html_url": "https://github.com/acme/docs/commit/a1",
                "commit": { "author": null }
            })))
            .mount(&server)
            .await;

        let client = GitHubClient::with_base_url(None, server.uri()).unwrap();
        let detail = client.get_commit("acme", "docs", "a1").await.unwrap();
        assert!(detail.files.is_empty());
        assert_eq!(detail.date(), "");
    }

    #[tokio::test]
    async fn not_found_is_api_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
            .mount(&server)
            .await;

        let client = GitHubClient::with_base_url(None, server.uri()).unwrap();
        let result = client.list_commits("acme", "missing", 3).await;
        assert!(matches!(result, Err(BotError::GitHubApi { status, .. }) if status.as_u16() == 404));
    }
}
