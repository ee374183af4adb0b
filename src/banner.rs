//! Header copy and the end-of-session summary.

use crate::consts::{AUTHOR, REPO, format_number};
use crate::generator::TokenUsage;

pub const TITLE: &str = "AI Content Rewriter";
pub const TAGLINE: &str = "Transform robotic AI scripts into captivating content for your YouTube videos.";

/// One-line footer credit shown under the panels.
pub fn credits() -> String {
    format!("recast {} · {} · {}", env!("CARGO_PKG_VERSION"), AUTHOR, REPO)
}

/// The session summary line, or `None` when no tokens were spent.
pub fn session_summary(usage: TokenUsage) -> Option<String> {
    if usage.total() == 0 {
        return None;
    }
    Some(format!(
        "session: {:>6} input + {:>6} output = {:>6} tokens",
        format_number(usage.input_tokens),
        format_number(usage.output_tokens),
        format_number(usage.total()),
    ))
}

/// Print the session summary to stderr, keeping stdout for rewritten text.
pub fn print_session_summary(usage: TokenUsage) {
    if let Some(line) = session_summary(usage) {
        eprintln!("{line}");
    }
}
