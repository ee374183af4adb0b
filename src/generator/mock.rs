use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{Generation, GenerationError, GenerationParams, Generator};

/// One scripted outcome for [`MockGenerator`].
#[derive(Debug, Clone)]
pub enum MockReply {
    Text(String),
    Empty,
    Raw(Generation),
    Fail(String),
}

/// A scripted generator for tests. Returns pre-defined replies in order
/// and records every prompt it was asked to complete.
pub struct MockGenerator {
    replies: Vec<MockReply>,
    index: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl MockGenerator {
    pub fn new(replies: Vec<MockReply>) -> Self {
        Self {
            replies,
            index: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(text: &str) -> Self {
        Self::new(vec![MockReply::Text(text.to_string())])
    }

    /// Number of times `generate` was called.
    pub fn calls(&self) -> usize {
        self.index.load(Ordering::SeqCst)
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Generator for MockGenerator {
    async fn generate(
        &self,
        prompt: &str,
        _params: &GenerationParams,
    ) -> Result<Generation, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let i = self.index.fetch_add(1, Ordering::SeqCst);
        let reply = self.replies.get(i).ok_or_else(|| {
            GenerationError::Other(format!("MockGenerator: no more replies (called {} times)", i + 1))
        })?;
        match reply {
            MockReply::Text(text) => Ok(Generation::text(text.clone())),
            MockReply::Empty => Ok(Generation::empty()),
            MockReply::Raw(generation) => Ok(generation.clone()),
            MockReply::Fail(reason) => Err(GenerationError::Other(reason.clone())),
        }
    }
}
