//! The owned, parsed message type.

use crate::ctcp;
use crate::prefix::Prefix;

use super::nom_parser::RawLine;

/// One parsed protocol line.
///
/// Constructed once per line by [`Message::parse`]; immutable thereafter.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Message {
    /// The classified originator, when the line carried a prefix.
    pub prefix: Option<Prefix>,
    /// The command word or 3-digit numeric code, possibly normalized
    /// (CTCP rewrite, empty-topic remap).
    pub cmd: String,
    /// Positional parameters plus the trailing parameter, in protocol order.
    pub args: Vec<String>,
    /// True when the message body was CTCP-framed.
    pub ctcp: bool,
}

impl Message {
    /// Parse one complete protocol line (trailing newline already stripped
    /// by the transport; stray `\r`/`\n` are tolerated anyway).
    ///
    /// Never fails. Malformed input degrades: optional fields stay empty
    /// and, in the worst case, the first whitespace-delimited token becomes
    /// `cmd` with the rest of the line as a single trailing argument.
    pub fn parse(line: &str) -> Message {
        let line = line.trim_end_matches(['\r', '\n']);

        let mut msg = match RawLine::tokenize(line) {
            Ok(raw) => Message {
                prefix: raw.prefix.map(Prefix::parse),
                cmd: raw.command.to_string(),
                args: raw.params.iter().map(|p| p.to_string()).collect(),
                ctcp: false,
            },
            Err(_) => Message::degraded(line),
        };

        // CTCP framing lives in the trailing argument. Unwrapping it rewrites
        // the command to the CTCP word (e.g. ACTION) and leaves the payload
        // text as the trailing argument.
        if let Some(last) = msg.args.last_mut() {
            if let Some((word, payload)) = ctcp::unwrap(last) {
                msg.cmd = word;
                *last = payload;
                msg.ctcp = true;
            }
        }

        // Some servers answer a topic query for a topicless channel with an
        // empty-trailing 332 (RPL_TOPIC) instead of 331 (RPL_NOTOPIC).
        // Normalize to the 331 shape: the addressed nick moves into the
        // prefix position and the trailing becomes the standard 331 text.
        if msg.cmd == "332" && msg.args.len() >= 3 && msg.args.last().is_some_and(|t| t.is_empty()) {
            let target = msg.args.remove(0);
            msg.prefix = Some(Prefix::User {
                nick: target,
                user: None,
                host: None,
            });
            msg.cmd = "331".to_string();
            if let Some(last) = msg.args.last_mut() {
                *last = "No topic is set".to_string();
            }
        }

        msg
    }

    fn degraded(line: &str) -> Message {
        match line.split_once(' ') {
            Some((cmd, rest)) => Message {
                prefix: None,
                cmd: cmd.to_string(),
                args: vec![rest.to_string()],
                ctcp: false,
            },
            None => Message {
                prefix: None,
                cmd: line.to_string(),
                args: Vec::new(),
                ctcp: false,
            },
        }
    }

    /// The originating nick, for user-form prefixes.
    pub fn nick(&self) -> Option<&str> {
        self.prefix.as_ref().and_then(Prefix::nick)
    }

    /// The originating ident/username, when the prefix carried one.
    pub fn user(&self) -> Option<&str> {
        match &self.prefix {
            Some(Prefix::User { user, .. }) => user.as_deref(),
            _ => None,
        }
    }

    /// The originating host, when the prefix carried one.
    pub fn host(&self) -> Option<&str> {
        match &self.prefix {
            Some(Prefix::User { host, .. }) => host.as_deref(),
            _ => None,
        }
    }

    /// The originating server name, for server-form prefixes.
    ///
    /// Mutually exclusive with [`nick`](Message::nick).
    pub fn server(&self) -> Option<&str> {
        match &self.prefix {
            Some(Prefix::Server(s)) => Some(s),
            _ => None,
        }
    }

    /// The trailing (last) argument, if any.
    pub fn trailing(&self) -> Option<&str> {
        self.args.last().map(String::as_str)
    }
}
