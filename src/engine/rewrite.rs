use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use super::{FailureKind, RewriteError, Rewriter};
use crate::generator::{GenerationParams, Generator, TokenUsage};
use crate::prompts::rewrite::build_rewrite_prompt;

/// Single-shot rewrite dispatcher. Wraps the text in the fixed prompt,
/// calls the generator once, and classifies the outcome.
pub struct RewriteEngine {
    generator: Arc<dyn Generator>,
    params: GenerationParams,
    usage: Mutex<TokenUsage>,
}

impl RewriteEngine {
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self {
            generator,
            params: GenerationParams::default(),
            usage: Mutex::new(TokenUsage::default()),
        }
    }

    /// Tokens spent by every rewrite dispatched through this engine.
    pub fn session_usage(&self) -> TokenUsage {
        *self.usage.lock().unwrap()
    }
}

#[async_trait]
impl Rewriter for RewriteEngine {
    async fn rewrite(&self, text: &str) -> Result<String, RewriteError> {
        if text.trim().is_empty() {
            return Ok(String::new());
        }

        let prompt = build_rewrite_prompt(text);
        tracing::debug!(input_chars = text.chars().count(), "dispatching rewrite");

        let generation = match self.generator.generate(&prompt, &self.params).await {
            Ok(generation) => generation,
            Err(e) => {
                tracing::error!(error = %e, "rewrite request failed");
                return Err(RewriteError::new(FailureKind::Transport));
            }
        };

        if let Some(usage) = generation.usage {
            self.usage.lock().unwrap().add(usage);
        }

        match generation.text {
            Some(text) if !text.is_empty() => Ok(text.trim().to_string()),
            _ => {
                tracing::error!("rewrite request returned an empty response");
                Err(RewriteError::new(FailureKind::EmptyResponse))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::Generation;
    use crate::generator::mock::{MockGenerator, MockReply};

    #[tokio::test]
    async fn usage_starts_at_zero() {
        let engine = RewriteEngine::new(Arc::new(MockGenerator::new(vec![])));
        assert_eq!(engine.session_usage().total(), 0);
    }

    #[tokio::test]
    async fn usage_accumulates_across_rewrites() {
        let usage = TokenUsage {
            input_tokens: 100,
            output_tokens: 20,
        };
        let reply = MockReply::Raw(Generation {
            text: Some("done".to_string()),
            usage: Some(usage),
        });
        let engine = RewriteEngine::new(Arc::new(MockGenerator::new(vec![reply.clone(), reply])));

        engine.rewrite("one").await.unwrap();
        engine.rewrite("two").await.unwrap();

        assert_eq!(engine.session_usage().input_tokens, 200);
        assert_eq!(engine.session_usage().output_tokens, 40);
    }

    #[tokio::test]
    async fn exhausted_mock_is_a_transport_failure() {
        let engine = RewriteEngine::new(Arc::new(MockGenerator::new(vec![])));
        let err = engine.rewrite("hello").await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::Transport);
    }

    #[tokio::test]
    async fn whitespace_only_reply_is_returned_trimmed() {
        // Non-empty payload passes the emptiness check before trimming.
        let engine = RewriteEngine::new(Arc::new(MockGenerator::new(vec![MockReply::Text(
            "  \n".to_string(),
        )])));
        assert_eq!(engine.rewrite("hello").await.unwrap(), "");
    }
}
