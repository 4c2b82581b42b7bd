//! Helpers for agents (formatting, simple rules). Not CLI scripts.

/// Default limit for [`safe_trim`].
pub const DEFAULT_TRIM_LIMIT: usize = 800;

/// Strips surrounding whitespace and keeps at most `limit` characters.
pub fn safe_trim(text: &str, limit: usize) -> String {
    text.trim().chars().take(limit).collect()
}
