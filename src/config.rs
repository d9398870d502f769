use std::env;
use std::path::PathBuf;

use log::{debug, error, info};

use crate::error::{BotError, Result};

const DEFAULT_OPENROUTER_MODEL: &str = "openai/gpt-4o-mini";
const DEFAULT_REPOS_PATH: &str = "repos.json";
const DEFAULT_LINKS_PATH: &str = "links.json";

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub client_id: u64,
    pub guild_id: u64,
    pub openrouter_api_key: String,
    pub openrouter_model: String,
    pub github_token: Option<String>,
    pub repos_path: PathBuf,
    pub links_path: PathBuf,
}

fn required(name: &str) -> Result<String> {
    env::var(name).map_err(|e| {
        error!("Failed to load {name} from environment: {e}");
        BotError::from(e)
    })
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

/// Parse a Discord snowflake ID from an environment value.
fn parse_snowflake(name: &str, value: &str) -> Result<u64> {
    match value.trim().parse::<u64>() {
        Ok(id) if id != 0 => Ok(id),
        Ok(_) => {
            error!("{name} must not be zero");
            Err(BotError::Config(format!("{name} must be a non-zero Discord ID")))
        }
        Err(e) => {
            error!("{name} is not a valid Discord ID: {e}");
            Err(BotError::Config(format!("{name} must be a numeric Discord ID")))
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        debug!("Loading configuration from environment");
        dotenvy::dotenv().ok();

        let discord_token = required("DISCORD_TOKEN")?;
        let client_id = parse_snowflake("CLIENT_ID", &required("CLIENT_ID")?)?;
        let guild_id = parse_snowflake("GUILD_ID", &required("GUILD_ID")?)?;
        let openrouter_api_key = required("OPENROUTER_API_KEY")?;

        let openrouter_model =
            optional("OPENROUTER_MODEL").unwrap_or_else(|| DEFAULT_OPENROUTER_MODEL.to_string());
        let github_token = optional("GITHUB_TOKEN");
        let repos_path =
            PathBuf::from(optional("REPOS_PATH").unwrap_or_else(|| DEFAULT_REPOS_PATH.to_string()));
        let links_path =
            PathBuf::from(optional("LINKS_PATH").unwrap_or_else(|| DEFAULT_LINKS_PATH.to_string()));

        info!("Configuration loaded successfully");
        debug!("Discord token length: {} characters", discord_token.len());
        debug!("Client ID: {client_id}, guild ID: {guild_id}");
        debug!(
            "OpenRouter API key length: {} characters",
            openrouter_api_key.len()
        );
        debug!("OpenRouter model: {openrouter_model}");
        if github_token.is_none() {
            info!("GITHUB_TOKEN not set, using unauthenticated GitHub requests");
        }
        debug!(
            "Repository list: {}, blog list: {}",
            repos_path.display(),
            links_path.display()
        );

        Ok(Self {
            discord_token,
            client_id,
            guild_id,
            openrouter_api_key,
            openrouter_model,
            github_token,
            repos_path,
            links_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numeric_snowflake() {
        assert_eq!(
            parse_snowflake("GUILD_ID", " 123456789012345678 ").ok(),
            Some(123_456_789_012_345_678)
        );
    }

    #[test]
    fn rejects_non_numeric_snowflake() {
        let result = parse_snowflake("CLIENT_ID", "my-app");
        assert!(matches!(result, Err(BotError::Config(_))));
        assert!(matches!(
            parse_snowflake("GUILD_ID", "0"),
            Err(BotError::Config(_))
        ));
    }
}
