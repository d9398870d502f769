//! Poise slash commands for update notifications.

use log::info;

use crate::bot::{Context, Data};
use crate::error::{BotError, Result};
use crate::reply::{EmbedReply, Reply, send_reply};
use crate::types::BlogPost;
use crate::url_list::load_url_list;

use super::blogs::NO_POSTS;
use super::commits::NOT_CONFIGURED;

const BLOG_TITLE: &str = "Latest blog posts";

/// Present scraped posts, or a fixed notice when there are none.
#[must_use]
pub fn blog_reply(posts: Vec<BlogPost>) -> Reply {
    if posts.is_empty() {
        return Reply::Text(NO_POSTS.to_string());
    }

    Reply::Embed(EmbedReply {
        title: BLOG_TITLE.to_string(),
        fields: posts
            .into_iter()
            .map(|post| {
                let value = format!("[{}]({})", post.source_host, post.link);
                let name = if post.title.trim().is_empty() {
                    post.link
                } else {
                    post.title
                };
                (name, value)
            })
            .collect(),
    })
}

/// Check for documentation and blog updates.
#[poise::command(slash_command, subcommands("commit", "blog"), subcommand_required)]
pub async fn noti(_ctx: Context<'_>) -> Result<()> {
    Ok(())
}

/// Show recent documentation commits in the configured repositories.
#[poise::command(slash_command)]
pub async fn commit(ctx: Context<'_>) -> Result<()> {
    ctx.defer().await?;
    info!("/noti commit from {}", ctx.author().tag());

    let data = ctx.data();
    let report = match load_url_list(&data.repos_path).await {
        Ok(repos) => data.commits.build_report(&repos).await,
        Err(BotError::ConfigurationMissing(_)) => NOT_CONFIGURED.to_string(),
        Err(e) => return Err(e),
    };

    send_reply(ctx, Reply::paginated(&report)).await
}

/// Show the newest post of every configured blog.
#[poise::command(slash_command)]
pub async fn blog(ctx: Context<'_>) -> Result<()> {
    ctx.defer().await?;
    info!("/noti blog from {}", ctx.author().tag());

    let data = ctx.data();
    let links = load_url_list(&data.links_path).await?;
    let posts = data.blogs.latest_posts(&links).await;

    send_reply(ctx, blog_reply(posts)).await
}

/// Get available notification commands.
#[must_use]
pub fn notify_commands() -> Vec<poise::Command<Data, BotError>> {
    vec![noti()]
}
