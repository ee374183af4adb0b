//! In-memory session state and the transitions that drive the UI.
//!
//! [`Session`] owns the input text, the four-state [`Status`], and the
//! self-clearing "copied" indicator. It is the only mutator of that state;
//! the dispatcher never touches it directly.

use std::time::{Duration, Instant};

use crate::clipboard::{Clipboard, ClipboardError};
use crate::consts::{COPIED_FEEDBACK, MAX_INPUT_LENGTH};
use crate::engine::{RewriteError, Rewriter};

/// Where the session is in the rewrite lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Idle,
    Loading,
    Success(String),
    Error(String),
}

impl Status {
    pub fn label(&self) -> &'static str {
        match self {
            Status::Idle => "idle",
            Status::Loading => "loading",
            Status::Success(_) => "success",
            Status::Error(_) => "error",
        }
    }
}

/// The text captured from the session at dispatch time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteRequest {
    pub original_text: String,
}

/// A one-shot deadline. Re-arming replaces the previous deadline, so only
/// the most recent arm can ever fire.
#[derive(Debug, Clone, Copy, Default)]
pub struct OneShotTimer {
    deadline: Option<Instant>,
}

impl OneShotTimer {
    pub fn arm(&mut self, now: Instant, delay: Duration) {
        self.deadline = Some(now + delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns true exactly once, on the first call at or after the deadline.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[derive(Debug)]
pub struct Session {
    input: String,
    status: Status,
    copied: bool,
    copied_timer: OneShotTimer,
    max_len: usize,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self::with_limit(MAX_INPUT_LENGTH)
    }

    pub fn with_limit(max_len: usize) -> Self {
        Self {
            input: String::new(),
            status: Status::Idle,
            copied: false,
            copied_timer: OneShotTimer::default(),
            max_len,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn copied(&self) -> bool {
        self.copied
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    pub fn char_count(&self) -> usize {
        self.input.chars().count()
    }

    /// Display-only flag; edits past the limit are rejected, so this stays false.
    pub fn is_over_limit(&self) -> bool {
        self.char_count() > self.max_len
    }

    pub fn is_loading(&self) -> bool {
        self.status == Status::Loading
    }

    /// Text edits are disabled while a rewrite is in flight.
    pub fn can_edit(&self) -> bool {
        !self.is_loading()
    }

    /// The only guard against overlapping requests.
    pub fn can_rewrite(&self) -> bool {
        !self.is_loading() && !self.input.trim().is_empty()
    }

    pub fn can_copy(&self) -> bool {
        matches!(self.status, Status::Success(_))
    }

    /// The rewritten text, present only on success.
    pub fn rewritten_text(&self) -> Option<&str> {
        match &self.status {
            Status::Success(text) => Some(text),
            _ => None,
        }
    }

    /// The user-facing error, present only on failure.
    pub fn error_message(&self) -> Option<&str> {
        match &self.status {
            Status::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Replace the input. Rejected (input unchanged) if it would exceed the
    /// limit or a rewrite is in flight.
    pub fn set_input(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        if !self.can_edit() || text.chars().count() > self.max_len {
            return false;
        }
        self.input = text;
        true
    }

    pub fn insert_char(&mut self, c: char) -> bool {
        if !self.can_edit() || self.char_count() >= self.max_len {
            return false;
        }
        self.input.push(c);
        true
    }

    /// Append pasted text. A paste that would overflow is rejected whole.
    pub fn insert_str(&mut self, text: &str) -> bool {
        if !self.can_edit() || self.char_count() + text.chars().count() > self.max_len {
            return false;
        }
        self.input.push_str(text);
        true
    }

    pub fn backspace(&mut self) -> bool {
        if !self.can_edit() {
            return false;
        }
        self.input.pop().is_some()
    }

    pub fn clear_input(&mut self) -> bool {
        if !self.can_edit() {
            return false;
        }
        self.input.clear();
        true
    }

    /// Enter Loading and hand back the request to dispatch. Returns `None`
    /// (state untouched) for blank input or while already loading.
    pub fn begin_rewrite(&mut self) -> Option<RewriteRequest> {
        if !self.can_rewrite() {
            return None;
        }
        self.status = Status::Loading;
        self.copied = false;
        self.copied_timer.cancel();
        tracing::info!(chars = self.char_count(), "rewrite started");
        Some(RewriteRequest {
            original_text: self.input.clone(),
        })
    }

    /// Apply the dispatcher's outcome. Ignored unless a rewrite is in flight.
    pub fn finish_rewrite(&mut self, outcome: Result<String, RewriteError>) {
        if !self.is_loading() {
            tracing::warn!(status = self.status.label(), "ignoring rewrite outcome outside of loading");
            return;
        }
        self.status = match outcome {
            Ok(text) => {
                tracing::info!(chars = text.chars().count(), "rewrite succeeded");
                Status::Success(text)
            }
            Err(e) => {
                tracing::info!(kind = ?e.kind(), "rewrite failed");
                Status::Error(e.to_string())
            }
        };
    }

    /// Run a full rewrite inline: begin, await the dispatcher, finish.
    /// Returns false if the rewrite was not started.
    pub async fn rewrite(&mut self, rewriter: &dyn Rewriter) -> bool {
        let Some(request) = self.begin_rewrite() else {
            return false;
        };
        let outcome = rewriter.rewrite(&request.original_text).await;
        self.finish_rewrite(outcome);
        true
    }

    /// Copy the rewritten text and raise the "copied" indicator for
    /// [`COPIED_FEEDBACK`]. A no-op returning false unless the last rewrite
    /// succeeded.
    pub fn copy(
        &mut self,
        clipboard: &mut dyn Clipboard,
        now: Instant,
    ) -> Result<bool, ClipboardError> {
        let Status::Success(text) = &self.status else {
            return Ok(false);
        };
        clipboard.write_text(text)?;
        self.copied = true;
        self.copied_timer.arm(now, COPIED_FEEDBACK);
        Ok(true)
    }

    /// Advance time-based state. Clears the copied indicator once due.
    pub fn tick(&mut self, now: Instant) {
        if self.copied_timer.fire_if_due(now) {
            self.copied = false;
        }
    }
}
