//! Reply shaping and delivery for slash commands.

use log::{debug, info, warn};
use poise::CreateReply;
use poise::serenity_prelude::{Colour, CreateEmbed};

use crate::bot::Context;
use crate::error::Result;

/// Longest message sent in one piece; leaves headroom under Discord's 2000.
pub const MESSAGE_CHUNK_LIMIT: usize = 1900;

/// Discord embed field value limit.
pub const EMBED_FIELD_LIMIT: usize = 1024;

/// Discord embed field name limit.
pub const EMBED_FIELD_NAME_LIMIT: usize = 256;

/// Discord allows at most 25 fields per embed.
pub const EMBED_MAX_FIELDS: usize = 25;

/// Discord rejects embeds whose title, field names and values exceed this in total.
pub const EMBED_TOTAL_LIMIT: usize = 6000;

/// Zero-width space; Discord rejects empty field names and values.
const BLANK_FIELD: &str = "\u{200b}";

const ELLIPSIS: &str = "...";

const EMBED_COLOUR: Colour = Colour::BLURPLE;

/// A titled embed with `(name, value)` fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedReply {
    pub title: String,
    pub fields: Vec<(String, String)>,
}

/// Everything a command can answer with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// A single short message.
    Text(String),
    /// Ordered pieces of a long message; the first is the primary reply.
    Chunks(Vec<String>),
    Embed(EmbedReply),
}

impl Reply {
    /// Plain text, split into [`MESSAGE_CHUNK_LIMIT`]-sized chunks when too long.
    #[must_use]
    pub fn paginated(text: &str) -> Self {
        if text.chars().count() <= MESSAGE_CHUNK_LIMIT {
            Reply::Text(text.to_string())
        } else {
            Reply::Chunks(split_chunks(text, MESSAGE_CHUNK_LIMIT))
        }
    }
}

/// Split `text` into consecutive pieces of at most `limit` characters.
#[must_use]
pub fn split_chunks(text: &str, limit: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(limit.max(1))
        .map(|chunk| chunk.iter().collect())
        .collect()
}

/// Cap `text` at `limit` characters, marking a cut with `...`.
#[must_use]
pub fn truncate_with_ellipsis(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let keep = limit.saturating_sub(ELLIPSIS.len());
    let mut truncated: String = text.chars().take(keep).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}

fn field_text(text: &str, limit: usize) -> String {
    if text.trim().is_empty() {
        BLANK_FIELD.to_string()
    } else {
        truncate_with_ellipsis(text, limit)
    }
}

/// Cap an embed to Discord's limits.
///
/// Names and values are truncated and never empty. Fields past
/// [`EMBED_MAX_FIELDS`], or that would push the embed past
/// [`EMBED_TOTAL_LIMIT`], are dropped with a warning.
#[must_use]
pub fn fit_embed(embed: EmbedReply) -> EmbedReply {
    let total = embed.fields.len();
    let title = truncate_with_ellipsis(&embed.title, EMBED_FIELD_NAME_LIMIT);
    let mut used = title.chars().count();
    let mut fields = Vec::with_capacity(total.min(EMBED_MAX_FIELDS));

    for (name, value) in embed.fields {
        if fields.len() == EMBED_MAX_FIELDS {
            warn!("Embed has {total} fields, only the first {EMBED_MAX_FIELDS} are sent");
            break;
        }
        let name = field_text(&name, EMBED_FIELD_NAME_LIMIT);
        let value = field_text(&value, EMBED_FIELD_LIMIT);
        let size = name.chars().count() + value.chars().count();
        if used + size > EMBED_TOTAL_LIMIT {
            warn!(
                "Embed would exceed {EMBED_TOTAL_LIMIT} characters, sending {} of {total} fields",
                fields.len()
            );
            break;
        }
        used += size;
        fields.push((name, value));
    }

    EmbedReply { title, fields }
}

fn build_embed(embed: EmbedReply) -> CreateEmbed {
    let embed = fit_embed(embed);
    embed.fields.into_iter().fold(
        CreateEmbed::new().title(embed.title).colour(EMBED_COLOUR),
        |builder, (name, value)| builder.field(name, value, false),
    )
}

/// Deliver `reply` for a deferred interaction.
///
/// The first message completes the deferred response; any further chunks
/// go out as follow-ups in order.
pub async fn send_reply(ctx: Context<'_>, reply: Reply) -> Result<()> {
    match reply {
        Reply::Text(text) => {
            ctx.say(text).await?;
        }
        Reply::Chunks(chunks) => {
            let count = chunks.len();
            for (index, chunk) in chunks.into_iter().enumerate() {
                debug!("Sending chunk {}/{count}", index + 1);
                ctx.say(chunk).await?;
            }
        }
        Reply::Embed(embed) => {
            ctx.send(CreateReply::default().embed(build_embed(embed)))
                .await?;
        }
    }

    info!(
        "Replied to /{} from {}",
        ctx.command().qualified_name,
        ctx.author().tag()
    );
    Ok(())
}
