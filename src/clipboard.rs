//! Write-only clipboard access.
//!
//! The terminal implementation emits crossterm's OSC 52 command, which most
//! modern terminals (and tmux with `set-clipboard on`) forward to the system
//! clipboard, including over SSH.

use std::io::{self, Write};

use crossterm::{clipboard::CopyToClipboard, execute};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("failed to write to clipboard: {0}")]
    Io(#[from] io::Error),
}

/// Somewhere text can be copied to.
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Clipboard writes via the terminal's OSC 52 support.
pub struct TerminalClipboard<W: Write> {
    out: W,
}

impl TerminalClipboard<io::Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> TerminalClipboard<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Clipboard for TerminalClipboard<W> {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        execute!(self.out, CopyToClipboard::to_clipboard_from(text))?;
        Ok(())
    }
}

/// Keeps the last copied text in memory. Used by tests and headless runs.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Option<String>,
    writes: usize,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }

    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.contents = Some(text.to_string());
        self.writes += 1;
        Ok(())
    }
}
