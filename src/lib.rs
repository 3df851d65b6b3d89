//! # irctrack
//!
//! The message-parsing and state-tracking core of an IRC client: raw
//! protocol lines in, structured messages and a consistent channel/user
//! model out. Everything here is pure and deterministic; sockets, line
//! framing, reconnects, and event delivery live in the surrounding client.
//!
//! ## Features
//!
//! - Infallible line parsing with prefix classification, CTCP unwrapping,
//!   and normalization of known server deviations
//! - RPL_ISUPPORT (005) interpretation into a merged capability table
//! - Channel mode-string interpretation with ISUPPORT-derived argument arity
//! - Channel/user store: topics, channel kinds, rosters, status modes
//! - A sans-IO [`Session`] dispatcher wiring the pieces together
//!
//! ## Quick start
//!
//! ```rust
//! use irctrack::{Message, Session};
//!
//! let mut session = Session::new("mynick");
//!
//! for line in [
//!     ":irc.example.net 005 mynick PREFIX=(ov)@+ CHANTYPES=# :are supported by this server",
//!     ":mynick!user@host JOIN #rust",
//!     ":irc.example.net 353 mynick = #rust :mynick @oper +helper",
//! ] {
//!     let msg = Message::parse(line);
//!     session.apply(&msg);
//! }
//!
//! assert!(session.channels.has_user("#rust", "oper").unwrap());
//! ```
//!
//! Parsing alone works without a session:
//!
//! ```rust
//! use irctrack::Message;
//!
//! let msg = Message::parse(":nick!user@host PRIVMSG #chan :\u{1}ACTION waves\u{1}");
//! assert_eq!(msg.cmd, "ACTION");
//! assert!(msg.ctcp);
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod casemap;
pub mod ctcp;
pub mod error;
pub mod isupport;
pub mod message;
pub mod mode;
pub mod prefix;
pub mod session;
pub mod state;

pub use self::casemap::{irc_eq, irc_to_lower};
pub use self::error::{MessageParseError, StateError};
pub use self::isupport::Isupport;
pub use self::message::{Message, RawLine};
pub use self::mode::{parse_channel_modes, ModeCategory, ModeChange};
pub use self::prefix::Prefix;
pub use self::session::Session;
pub use self::state::{Channel, ChannelKind, ChannelList, ChannelSnapshot, ChannelUser, NO_TOPIC};
