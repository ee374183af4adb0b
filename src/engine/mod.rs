pub mod rewrite;

use async_trait::async_trait;
use thiserror::Error;

/// The one message users see for any failed rewrite.
pub const REWRITE_FAILED_MESSAGE: &str =
    "Failed to rewrite content. Please check your connection or API key.";

/// Why a rewrite failed. Only used for diagnostics; users get one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The generation call itself failed (network, auth, API status, decoding).
    Transport,
    /// The call succeeded but carried no text.
    EmptyResponse,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", REWRITE_FAILED_MESSAGE)]
pub struct RewriteError {
    kind: FailureKind,
}

impl RewriteError {
    pub fn new(kind: FailureKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> FailureKind {
        self.kind
    }
}

/// The outermost boundary. The UI only knows this trait.
#[async_trait]
pub trait Rewriter: Send + Sync {
    async fn rewrite(&self, text: &str) -> Result<String, RewriteError>;
}
