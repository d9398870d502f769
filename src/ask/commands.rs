//! Poise slash command for asking the AI a question.

use log::{error, info, warn};

use crate::bot::{Context, Data};
use crate::error::{BotError, Result};
use crate::reply::{EMBED_FIELD_LIMIT, EmbedReply, Reply, send_reply, truncate_with_ellipsis};

const ANSWER_TITLE: &str = "AI answer";

const EMPTY_ANSWER: &str =
    "The AI returned an empty answer. Please try rephrasing your question.";

const GENERIC_FAILURE: &str =
    "Sorry, something went wrong while asking the AI. Please try again later.";

/// Turn the responder outcome into what the user sees.
#[must_use]
pub fn ask_reply(question: &str, outcome: Result<String>) -> Reply {
    match outcome {
        Ok(answer) if answer.trim().is_empty() => {
            warn!("AI returned an empty answer");
            Reply::Text(EMPTY_ANSWER.to_string())
        }
        Ok(answer) => Reply::Embed(EmbedReply {
            title: ANSWER_TITLE.to_string(),
            fields: vec![
                ("Question".to_string(), question.to_string()),
                (
                    "Answer".to_string(),
                    truncate_with_ellipsis(&answer, EMBED_FIELD_LIMIT),
                ),
            ],
        }),
        Err(e) if e.is_timeout() => Reply::Text(e.user_message()),
        Err(e) => {
            error!("AI request failed: {e}");
            Reply::Text(GENERIC_FAILURE.to_string())
        }
    }
}

/// Ask the AI a question.
#[poise::command(slash_command)]
pub async fn ask(
    ctx: Context<'_>,
    #[description = "Your question"]
    #[min_length = 3]
    #[max_length = 2000]
    question: String,
) -> Result<()> {
    ctx.defer().await?;
    info!(
        "/ask from {}: {} characters",
        ctx.author().tag(),
        question.chars().count()
    );

    let outcome = ctx.data().responder.answer(&question).await;
    send_reply(ctx, ask_reply(&question, outcome)).await
}

/// Get available AI commands.
#[must_use]
pub fn ask_commands() -> Vec<poise::Command<Data, BotError>> {
    vec![ask()]
}
