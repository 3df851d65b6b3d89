//! Error types for the state-tracking core.
//!
//! Malformed protocol input never produces an error here: the parser and the
//! interpreters degrade instead (see [`crate::message`]). The only error the
//! store surfaces is a lookup against a channel it does not track.

use thiserror::Error;

/// Convenience alias for Results using [`StateError`].
pub type Result<T, E = StateError> = std::result::Result<T, E>;

/// Errors signaled by read accessors on the channel store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StateError {
    /// The queried channel is not tracked by this store.
    #[error("no such channel: {0}")]
    NoSuchChannel(String),
}

/// Errors from the internal line tokenizer.
///
/// These never escape [`Message::parse`], which falls back to a degraded
/// single-argument form instead of failing; they exist so the tokenizer can
/// report *why* it bailed when used directly.
///
/// [`Message::parse`]: crate::Message::parse
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MessageParseError {
    /// The line was empty after stripping line endings.
    #[error("empty message")]
    EmptyMessage,

    /// No command token could be extracted.
    #[error("invalid command")]
    InvalidCommand,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_channel_name() {
        let err = StateError::NoSuchChannel("#nowhere".to_string());
        assert_eq!(err.to_string(), "no such channel: #nowhere");
    }
}
