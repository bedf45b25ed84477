use crate::error::{AppResult, CompletionErrorKind, Error};
use rig::completion::{Chat, Message};
use rig::providers::openai::Client as OpenAiClient;
use tracing::info;

/// Instruction for the news briefing summaries
const ARTICLE_PROMPT: &str = "Summarize the key points of this article in three to four lines.";

/// Instruction for reformatting raw meeting notes into structured minutes
const MEETING_NOTES_PROMPT: &str = "Reorganize the following raw meeting notes into structured \
minutes with these sections:

1. Overview
2. Discussion
3. Decisions
4. Action items
5. Follow-ups

Use only information stated in the notes. Do not invent content, names or \
dates that are not present in the input.";

const PREAMBLE: &str = "You are a helpful assistant that summarizes text accurately and concisely.";

/// Classify an opaque provider failure into a structured kind. This is the
/// single place the message text is inspected; callers only see the kind.
fn classify(message: &str) -> CompletionErrorKind {
    let lower = message.to_lowercase();
    if lower.contains("api_key") || lower.contains("api key") || lower.contains("unauthorized") {
        CompletionErrorKind::Auth
    } else if lower.contains("timeout") || lower.contains("timed out") {
        CompletionErrorKind::Timeout
    } else if lower.contains("rate limit") || lower.contains("429") {
        CompletionErrorKind::RateLimited
    } else {
        CompletionErrorKind::Unknown
    }
}

/// Adapter over the completion provider. One request, one response; no
/// retries, no streaming.
#[derive(Clone)]
pub struct Summarizer {
    client: OpenAiClient,
    model: String,
}

impl Summarizer {
    pub fn new(api_key: &str, model: &str) -> Self {
        Self {
            client: OpenAiClient::new(api_key),
            model: model.to_string(),
        }
    }

    /// Short 3-4 line article summary
    pub async fn summarize_article(&self, text: &str) -> AppResult<String> {
        self.complete(ARTICLE_PROMPT, text, 0.5, 300).await
    }

    /// Reformat free-form meeting notes into structured minutes. Blank input
    /// is rejected before any provider call.
    pub async fn format_meeting_notes(&self, text: &str) -> AppResult<String> {
        if text.trim().is_empty() {
            return Err(Error::EmptyInput);
        }
        self.complete(MEETING_NOTES_PROMPT, text, 0.3, 800).await
    }

    async fn complete(
        &self,
        instruction: &str,
        text: &str,
        temperature: f64,
        max_tokens: u64,
    ) -> AppResult<String> {
        let agent = self
            .client
            .agent(&self.model)
            .preamble(PREAMBLE)
            .temperature(temperature)
            .max_tokens(max_tokens)
            .build();

        let prompt = format!("{}\n\n{}", instruction, text);

        let response = agent.chat(prompt, Vec::<Message>::new()).await.map_err(|err| {
            let message = err.to_string();
            Error::Completion {
                kind: classify(&message),
                message,
            }
        })?;

        info!("Completion returned {} characters", response.len());
        Ok(response.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_auth() {
        assert_eq!(classify("Invalid api_key provided"), CompletionErrorKind::Auth);
        assert_eq!(classify("401 Unauthorized"), CompletionErrorKind::Auth);
    }

    #[test]
    fn test_classify_timeout() {
        assert_eq!(classify("request timed out"), CompletionErrorKind::Timeout);
        assert_eq!(classify("connection Timeout"), CompletionErrorKind::Timeout);
    }

    #[test]
    fn test_classify_rate_limit() {
        assert_eq!(
            classify("HTTP 429 Too Many Requests"),
            CompletionErrorKind::RateLimited
        );
        assert_eq!(
            classify("You hit your rate limit"),
            CompletionErrorKind::RateLimited
        );
    }

    #[test]
    fn test_classify_unknown() {
        assert_eq!(classify("connection reset by peer"), CompletionErrorKind::Unknown);
    }

    /// Blank notes are rejected up front; the guard fires before any
    /// provider call, so a dummy key never gets used
    #[tokio::test]
    async fn test_blank_notes_rejected_before_provider_call() {
        let summarizer = Summarizer::new("dummy", "gpt-3.5-turbo");

        assert!(matches!(
            summarizer.format_meeting_notes("").await,
            Err(Error::EmptyInput)
        ));
        assert!(matches!(
            summarizer.format_meeting_notes("   \n\t ").await,
            Err(Error::EmptyInput)
        ));
    }
}
