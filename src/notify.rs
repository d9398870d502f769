//! Update notifications for documentation commits and blog posts.

mod blogs;
mod commands;
mod commits;

pub use blogs::{BlogNotifier, NO_POSTS, extract_first_post, normalize_link};
pub use commands::{blog_reply, notify_commands};
pub use commits::{
    CommitNotifier, DOCS_PREFIX, NO_CHANGES, NOT_CONFIGURED, format_report, format_reports,
    parse_repo_url,
};
