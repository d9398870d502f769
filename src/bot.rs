//! Discord bot setup, shared state and command error handling.

use std::path::PathBuf;
use std::sync::atomic::Ordering;

use log::{debug, error, info, warn};
use poise::{
    CreateReply, Framework, FrameworkError, FrameworkOptions, builtins,
    serenity_prelude::{ClientBuilder, GatewayIntents, GuildId},
};

use crate::ask::{AiResponder, ask_commands};
use crate::config::Config;
use crate::error::{BotError, Result};
use crate::github::GitHubClient;
use crate::notify::{BlogNotifier, CommitNotifier, notify_commands};
use crate::openrouter::OpenRouterClient;

/// Context type shared by all commands.
pub type Context<'a> = poise::Context<'a, Data, BotError>;

/// Service handles available to every command.
pub struct Data {
    pub(crate) responder: AiResponder,
    pub(crate) commits: CommitNotifier,
    pub(crate) blogs: BlogNotifier,
    pub(crate) repos_path: PathBuf,
    pub(crate) links_path: PathBuf,
}

/// Where an interaction stands when a failure has to be reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionStage {
    /// Nothing sent yet; the failure must be the initial response.
    Received,
    /// Deferred or already answered; the failure must be a follow-up.
    Acknowledged,
}

impl InteractionStage {
    fn of(ctx: Context<'_>) -> Self {
        match ctx {
            poise::Context::Application(app)
                if app.has_sent_initial_response.load(Ordering::SeqCst) =>
            {
                InteractionStage::Acknowledged
            }
            _ => InteractionStage::Received,
        }
    }

    /// Failure reply for this stage. Only an initial response may be
    /// ephemeral; a follow-up to a deferred public reply must stay public.
    #[must_use]
    pub fn failure_reply(self, message: String) -> CreateReply {
        let reply = CreateReply::default().content(message);
        match self {
            InteractionStage::Received => reply.ephemeral(true),
            InteractionStage::Acknowledged => reply,
        }
    }
}

async fn on_error(error: FrameworkError<'_, Data, BotError>) {
    match error {
        FrameworkError::Command { error, ctx, .. } => {
            error!(
                "Command /{} from {} failed: {error:?}",
                ctx.command().qualified_name,
                ctx.author().tag()
            );

            let stage = InteractionStage::of(ctx);
            debug!("Reporting failure at stage {stage:?}");
            if let Err(e) = ctx.send(stage.failure_reply(error.user_message())).await {
                error!("Failed to send error reply: {e}");
            }
        }
        other => {
            if let Err(e) = builtins::on_error(other).await {
                error!("Error while handling framework error: {e}");
            }
        }
    }
}

/// Run the Discord bot.
pub async fn run() -> Result<()> {
    info!("Initializing bot");
    let config = Config::from_env()?;

    debug!("Initializing service clients");
    let responder = AiResponder::new(OpenRouterClient::new(
        config.openrouter_api_key.clone(),
        config.openrouter_model.clone(),
    ));
    let commits = CommitNotifier::new(GitHubClient::new(config.github_token.clone())?);
    let blogs = BlogNotifier::new()?;
    let data = Data {
        responder,
        commits,
        blogs,
        repos_path: config.repos_path.clone(),
        links_path: config.links_path.clone(),
    };

    let intents = GatewayIntents::non_privileged();
    let guild_id = GuildId::new(config.guild_id);
    let client_id = config.client_id;

    let mut commands = ask_commands();
    commands.extend(notify_commands());

    debug!("Building framework");
    let framework = Framework::builder()
        .options(FrameworkOptions {
            commands,
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Bot is ready and connected to Discord as {}", ready.user.name);
                if ready.application.id.get() != client_id {
                    warn!(
                        "CLIENT_ID {client_id} does not match the connected application {}",
                        ready.application.id
                    );
                }
                debug!("Registering commands in guild {guild_id}");
                builtins::register_in_guild(ctx, &framework.options().commands, guild_id).await?;
                info!("Commands registered successfully");
                Ok(data)
            })
        })
        .build();

    debug!("Creating Discord client");
    let mut client = ClientBuilder::new(config.discord_token, intents)
        .framework(framework)
        .await?;

    info!("Starting Discord client");

    tokio::select! {
        result = client.start() => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received, shutting down...");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unacknowledged_failure_is_ephemeral_initial_response() {
        let reply = InteractionStage::Received.failure_reply("oops".to_string());
        assert_eq!(reply.ephemeral, Some(true));
        assert_eq!(reply.content.as_deref(), Some("oops"));
    }

    #[test]
    fn acknowledged_failure_is_plain_follow_up() {
        let reply = InteractionStage::Acknowledged.failure_reply("oops".to_string());
        assert_eq!(reply.ephemeral, None);
    }
}
