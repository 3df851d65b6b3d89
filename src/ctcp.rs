//! CTCP framing.
//!
//! CTCP payloads ride inside PRIVMSG/NOTICE trailing arguments, wrapped in
//! the 0x01 delimiter byte at both ends: `\x01ACTION waves\x01`. This module
//! only detects and unwraps the framing; interpreting the CTCP command is the
//! consumer's business.

/// The CTCP delimiter character (byte 0x01).
pub const CTCP_DELIMITER: char = '\u{1}';

/// Unwrap a CTCP-framed trailing argument.
///
/// Returns the CTCP command word and the remaining payload text when `text`
/// is delimited by 0x01 at both ends, `None` otherwise. A payload with no
/// text after the command word yields an empty payload; degenerate inputs
/// (`"\x01"`, `"\x01\x01"`) yield an empty command and payload.
pub fn unwrap(text: &str) -> Option<(String, String)> {
    if text.len() < 2 || !text.starts_with(CTCP_DELIMITER) || !text.ends_with(CTCP_DELIMITER) {
        return None;
    }
    let inner = &text[1..text.len() - 1];
    match inner.split_once(' ') {
        Some((cmd, rest)) => Some((cmd.to_string(), rest.to_string())),
        None => Some((inner.to_string(), String::new())),
    }
}
