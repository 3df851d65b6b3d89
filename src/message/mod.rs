//! Protocol line parsing.
//!
//! [`Message::parse`] turns one complete, newline-stripped protocol line into
//! a structured [`Message`]. It never fails: IRC has no formal grammar and
//! servers deviate from what grammar there is, so malformed input degrades to
//! partial structure instead of erroring.

mod nom_parser;
mod types;

pub use self::nom_parser::RawLine;
pub use self::types::Message;
