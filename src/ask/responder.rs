//! Time-bounded question answering through OpenRouter.

use std::future::Future;
use std::time::Duration;

use log::{debug, warn};

use crate::error::{BotError, Result};
use crate::openrouter::OpenRouterClient;

/// How long the AI gets before the user is told it is taking too long.
pub const ASK_TIMEOUT: Duration = Duration::from_secs(15);

/// Race `request` against `limit`, mapping expiry to [`BotError::AiTimeout`].
///
/// The losing request future is dropped.
pub async fn race_timeout<T>(
    limit: Duration,
    request: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::time::timeout(limit, request).await.map_err(|_| {
        warn!("AI request exceeded {}s", limit.as_secs_f32());
        BotError::AiTimeout
    })?
}

pub struct AiResponder {
    client: OpenRouterClient,
    timeout: Duration,
}

impl AiResponder {
    #[must_use]
    pub fn new(client: OpenRouterClient) -> Self {
        Self {
            client,
            timeout: ASK_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Ask `question`, returning the completion text unmodified.
    ///
    /// # Errors
    ///
    /// [`BotError::AiTimeout`] when the bound expires, otherwise whatever the
    /// OpenRouter client reported.
    pub async fn answer(&self, question: &str) -> Result<String> {
        debug!("Answering question of {} characters", question.chars().count());
        race_timeout(self.timeout, self.client.complete(question)).await
    }
}
