//! Common types used throughout the docsbot bot.

use serde::Serialize;

/// Role of a message in the conversation.
///
/// Maps to OpenRouter API message roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Message from the human user
    User,
}

/// A commit that touched documentation files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitReport {
    /// `owner/repo`
    pub repository: String,
    /// Commit author date as returned by GitHub
    pub timestamp: String,
    /// Link to the commit on GitHub
    pub url: String,
    /// Changed documentation paths, in the order GitHub lists them
    pub changed_files: Vec<String>,
}

/// The latest post found on a configured blog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogPost {
    pub title: String,
    /// Absolute (best-effort) link to the post
    pub link: String,
    /// Hostname of the blog the post was found on
    pub source_host: String,
}
