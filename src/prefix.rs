//! Message prefix (source) classification.
//!
//! The prefix is the optional `:`-led first token of a protocol line naming
//! the originator. It arrives in several shapes: a full `nick!user@host`, a
//! partial `nick!user`, a bare server hostname, or a bare nick. Servers are
//! sloppy here, so classification is heuristic and never fails.

/// The classified originator of a message.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Prefix {
    /// A user prefix: `nick!user@host`, `nick!user`, or a bare nick.
    User {
        /// The originating nick.
        nick: String,
        /// The ident/username, when the prefix carried a `!` segment.
        user: Option<String>,
        /// The host, when the prefix carried an `@` segment.
        host: Option<String>,
    },
    /// A bare server hostname.
    Server(String),
}

impl Prefix {
    /// Classify a raw prefix token (leading `:` already stripped).
    ///
    /// Splits at the `!` and at the *last* `@` after it, so idents that
    /// themselves contain `@` or `!` survive. A token with no `!`, no `@`,
    /// and at least one `.` is taken to be a server name; a token with an
    /// `@` but no `!` degrades to nick-plus-host.
    pub fn parse(raw: &str) -> Prefix {
        if let Some((nick, rest)) = raw.split_once('!') {
            let (user, host) = match rest.rfind('@') {
                Some(at) => (&rest[..at], Some(rest[at + 1..].to_string())),
                None => (rest, None),
            };
            return Prefix::User {
                nick: nick.to_string(),
                user: Some(user.to_string()),
                host,
            };
        }
        if !raw.contains('@') && raw.contains('.') {
            return Prefix::Server(raw.to_string());
        }
        if let Some(at) = raw.rfind('@') {
            return Prefix::User {
                nick: raw[..at].to_string(),
                user: None,
                host: Some(raw[at + 1..].to_string()),
            };
        }
        Prefix::User {
            nick: raw.to_string(),
            user: None,
            host: None,
        }
    }

    /// The nick, for user-form prefixes.
    pub fn nick(&self) -> Option<&str> {
        match self {
            Prefix::User { nick, .. } => Some(nick),
            Prefix::Server(_) => None,
        }
    }
}
