use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("Serenity error: {0}")]
    Serenity(Box<poise::serenity_prelude::Error>),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("No entries configured in {0}")]
    ConfigurationMissing(String),

    #[error("OpenRouter API error ({status}): {message}")]
    OpenRouterApi {
        status: reqwest::StatusCode,
        message: String,
    },

    #[error("OpenRouter response error: {0}")]
    OpenRouterResponse(String),

    #[error("AI request timed out")]
    AiTimeout,

    #[error("GitHub API error ({status}): {message}")]
    GitHubApi {
        status: reqwest::StatusCode,
        message: String,
    },

    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

impl From<poise::serenity_prelude::Error> for BotError {
    fn from(err: poise::serenity_prelude::Error) -> Self {
        BotError::Serenity(Box::new(err))
    }
}

impl BotError {
    /// Returns a user-friendly error message suitable for displaying in Discord
    pub fn user_message(&self) -> String {
        match self {
            BotError::Serenity(_) => {
                "Sorry, I'm having trouble communicating with Discord right now. Please try again later.".to_string()
            }
            BotError::Config(_) | BotError::EnvVar(_) => {
                "Sorry, there's a configuration issue on my end. Please contact the bot administrator.".to_string()
            }
            BotError::ConfigurationMissing(_) => {
                "Nothing is configured for this command yet. Please contact the bot administrator.".to_string()
            }
            BotError::OpenRouterApi { status, .. } => match *status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    "Sorry, I'm having authentication issues with my AI service. Please contact the bot administrator.".to_string()
                }
                StatusCode::TOO_MANY_REQUESTS => {
                    "Sorry, I've hit my rate limit. Please try again in a few moments.".to_string()
                }
                _ => "Sorry, the AI service could not answer right now. Please try again later."
                    .to_string(),
            },
            BotError::OpenRouterResponse(_) => {
                "Sorry, I received an unexpected response from my AI service. Please try again.".to_string()
            }
            BotError::AiTimeout => {
                "The AI is taking too long to answer. Please try again in a moment.".to_string()
            }
            BotError::GitHubApi { .. } => {
                "Sorry, I couldn't reach GitHub right now. Please try again later.".to_string()
            }
            BotError::Reqwest(_) => {
                "Sorry, I'm having network issues. Please try again in a moment.".to_string()
            }
        }
    }

    /// True when the error is the AI timeout rather than a service failure.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, BotError::AiTimeout)
    }
}

pub type Result<T> = std::result::Result<T, BotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_message_differs_from_service_error() {
        let timeout = BotError::AiTimeout;
        let service = BotError::OpenRouterApi {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "boom".to_string(),
        };
        assert!(timeout.is_timeout());
        assert!(!service.is_timeout());
        assert_ne!(timeout.user_message(), service.user_message());
    }

    #[test]
    fn rate_limit_has_dedicated_message() {
        let err = BotError::OpenRouterApi {
            status: StatusCode::TOO_MANY_REQUESTS,
            message: String::new(),
        };
        assert!(err.user_message().contains("rate limit"));
    }
}
