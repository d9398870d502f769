//! Documentation change reports for configured GitHub repositories.

use std::sync::LazyLock;

use chrono::DateTime;
use futures::future::join_all;
use log::{debug, info, warn};
use regex::Regex;

use crate::error::Result;
use crate::github::GitHubClient;
use crate::types::CommitReport;

/// Only changes below this path count as documentation changes.
pub const DOCS_PREFIX: &str = "docs/";

/// Number of recent commits inspected per repository.
const COMMITS_PER_REPO: u8 = 3;

pub const NOT_CONFIGURED: &str = "No repositories are configured for commit notifications.";
pub const NO_CHANGES: &str = "No recent documentation changes found.";

static REPO_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"github\.com/([^/\s?#]+)/([^/\s?#]+)").expect("repository URL pattern is valid")
});

/// Extract `(owner, repo)` from a GitHub repository URL.
#[must_use]
pub fn parse_repo_url(url: &str) -> Option<(String, String)> {
    let captures = REPO_URL.captures(url)?;
    let owner = captures[1].to_string();
    let repo = captures[2].trim_end_matches(".git").to_string();
    if repo.is_empty() {
        return None;
    }
    Some((owner, repo))
}

/// Collects recent documentation commits across repositories.
pub struct CommitNotifier {
    github: GitHubClient,
}

impl CommitNotifier {
    #[must_use]
    pub fn new(github: GitHubClient) -> Self {
        Self { github }
    }

    /// Render the documentation change report for `repos`.
    ///
    /// Returns [`NOT_CONFIGURED`] for an empty list and [`NO_CHANGES`] when no
    /// inspected commit touched documentation.
    pub async fn build_report(&self, repos: &[String]) -> String {
        if repos.is_empty() {
            return NOT_CONFIGURED.to_string();
        }

        let reports = self.collect_reports(repos).await;
        info!(
            "Found {} documentation commits across {} repositories",
            reports.len(),
            repos.len()
        );
        format_reports(&reports)
    }

    /// Fetch reports for every repository concurrently, flattened in input order.
    pub async fn collect_reports(&self, repos: &[String]) -> Vec<CommitReport> {
        join_all(repos.iter().map(|url| self.repo_reports(url)))
            .await
            .into_iter()
            .flatten()
            .collect()
    }

    async fn repo_reports(&self, url: &str) -> Vec<CommitReport> {
        let Some((owner, repo)) = parse_repo_url(url) else {
            debug!("Skipping non-GitHub repository URL: {url}");
            return Vec::new();
        };

        match self.try_repo_reports(&owner, &repo).await {
            Ok(reports) => reports,
            Err(e) => {
                warn!("Failed to fetch commits for {owner}/{repo}: {e}");
                Vec::new()
            }
        }
    }

    async fn try_repo_reports(&self, owner: &str, repo: &str) -> Result<Vec<CommitReport>> {
        let commits = self
            .github
            .list_commits(owner, repo, COMMITS_PER_REPO)
            .await?;
        debug!("{owner}/{repo}: inspecting {} commits", commits.len());

        let reports = join_all(
            commits
                .iter()
                .map(|commit| self.commit_report(owner, repo, &commit.sha)),
        )
        .await;

        Ok(reports.into_iter().flatten().collect())
    }

    async fn commit_report(&self, owner: &str, repo: &str, sha: &str) -> Option<CommitReport> {
        let detail = match self.github.get_commit(owner, repo, sha).await {
            Ok(detail) => detail,
            Err(e) => {
                warn!("Failed to fetch commit {sha} of {owner}/{repo}: {e}");
                return None;
            }
        };

        let changed_files: Vec<String> = detail
            .files
            .iter()
            .filter(|file| file.filename.starts_with(DOCS_PREFIX))
            .map(|file| file.filename.clone())
            .collect();

        if changed_files.is_empty() {
            return None;
        }

        Some(CommitReport {
            repository: format!("{owner}/{repo}"),
            timestamp: detail.date().to_string(),
            url: detail.html_url.clone(),
            changed_files,
        })
    }
}

fn display_timestamp(timestamp: &str) -> String {
    DateTime::parse_from_rfc3339(timestamp).map_or_else(
        |_| timestamp.to_string(),
        |date| date.to_utc().format("%Y-%m-%d %H:%M UTC").to_string(),
    )
}

/// Render one report as a text block.
#[must_use]
pub fn format_report(report: &CommitReport) -> String {
    let files = report
        .changed_files
        .iter()
        .map(|file| format!("- {file}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Repo: {}\nDate: {}\nURL: {}\nFiles:\n{files}",
        report.repository,
        display_timestamp(&report.timestamp),
        report.url
    )
}

/// Join report blocks with a blank line, or [`NO_CHANGES`] when there are none.
#[must_use]
pub fn format_reports(reports: &[CommitReport]) -> String {
    if reports.is_empty() {
        return NO_CHANGES.to_string();
    }

    reports
        .iter()
        .map(format_report)
        .collect::<Vec<_>>()
        .join("\n\n")
}
