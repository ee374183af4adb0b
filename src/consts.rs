//! Project-wide constants.

use std::time::Duration;

pub const AUTHOR: &str = env!("CARGO_PKG_AUTHORS");
pub const HOMEPAGE: &str = env!("CARGO_PKG_HOMEPAGE");
pub const REPO: &str = env!("CARGO_PKG_REPOSITORY");

/// Default Gemini model when none is specified.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Sampling temperature sent with every rewrite.
pub const TEMPERATURE: f32 = 0.7;

/// Nucleus-sampling threshold sent with every rewrite.
pub const TOP_P: f32 = 0.95;

/// Maximum number of characters accepted in the input panel.
pub const MAX_INPUT_LENGTH: usize = 5000;

/// How long the "Copied!" indicator stays up after a copy.
pub const COPIED_FEEDBACK: Duration = Duration::from_secs(2);

/// Environment variables checked for the API key, in order.
pub const API_KEY_ENV_VARS: &[&str] = &["API_KEY", "GEMINI_API_KEY"];

/// Format a number with comma separators (e.g. 1,234,567).
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i).is_multiple_of(3) {
            result.push(',');
        }
        result.push(c);
    }
    result
}
