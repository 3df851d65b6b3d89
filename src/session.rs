//! Sans-IO session dispatcher.
//!
//! [`Session`] owns one capability table and one channel store per
//! connection and routes parsed messages to them. It performs no I/O and
//! holds no locks; the transport is expected to feed it one connection's
//! lines sequentially. Multiple connections get independent sessions.
//!
//! Routing is the conventional client-side table: 005 feeds the capability
//! interpreter, MODE on a channel target runs the mode interpreter and
//! applies the result, and JOIN/PART/KICK/QUIT/NICK/TOPIC/332/353/324 map to
//! their store operations. Everything else passes through untouched; event
//! delivery to subscribers is the caller's concern.

use tracing::{debug, trace};

use crate::casemap::irc_eq;
use crate::isupport::Isupport;
use crate::message::Message;
use crate::mode::{parse_channel_modes, ModeChange};
use crate::state::ChannelList;

/// Per-connection protocol state: capability table plus channel store.
#[derive(Clone, Debug)]
pub struct Session {
    nick: String,
    /// The accumulated RPL_ISUPPORT capability table.
    pub isupport: Isupport,
    /// The channel/user store.
    pub channels: ChannelList,
}

impl Session {
    /// Create a session for a connection registered under `nick`.
    ///
    /// The session tracks its own nick so it can tell "we joined" apart from
    /// "someone joined"; it follows server-forced renames via NICK.
    pub fn new(nick: &str) -> Session {
        Session {
            nick: nick.to_string(),
            isupport: Isupport::default(),
            channels: ChannelList::new(),
        }
    }

    /// The client's current nick.
    pub fn nick(&self) -> &str {
        &self.nick
    }

    /// Route one parsed message into the session state.
    ///
    /// Returns the classified mode changes when the message was a channel
    /// MODE, so callers can surface them to subscribers; empty otherwise.
    pub fn apply(&mut self, msg: &Message) -> Vec<ModeChange> {
        trace!(cmd = %msg.cmd, args = ?msg.args, "dispatching");
        match msg.cmd.as_str() {
            "005" => self.isupport.update(&msg.args),
            "MODE" => return self.apply_mode_message(msg),
            "JOIN" => self.apply_join(msg),
            "PART" => self.apply_part(msg),
            "KICK" => {
                if let [chan, kicked, ..] = msg.args.as_slice() {
                    if irc_eq(kicked, &self.nick) {
                        debug!(channel = %chan, "kicked from channel");
                        self.channels.part(chan);
                    } else {
                        self.channels.user_part(chan, kicked);
                    }
                }
            }
            "QUIT" => {
                if let Some(nick) = msg.nick() {
                    self.channels.user_quit(nick);
                }
            }
            "NICK" => {
                if let (Some(old), Some(new)) = (msg.nick(), msg.args.first()) {
                    self.channels.user_rename(old, new);
                    if irc_eq(old, &self.nick) {
                        debug!(from = old, to = %new, "own nick changed");
                        self.nick = new.to_string();
                    }
                }
            }
            "TOPIC" => {
                if let [chan, topic, ..] = msg.args.as_slice() {
                    self.channels.set_topic(chan, topic);
                }
            }
            // RPL_TOPIC: <target> <channel> :<topic>. The empty-topic variant
            // was already remapped to 331 by the parser, which leaves the
            // topic at its unset default.
            "332" => {
                if let [_, chan, topic, ..] = msg.args.as_slice() {
                    self.channels.set_topic(chan, topic);
                }
            }
            // RPL_NAMREPLY: <target> <symbol> <channel> :<names>
            "353" => {
                if let [_, symbol, chan, names, ..] = msg.args.as_slice() {
                    if let Some(sym) = symbol.chars().next() {
                        self.channels.set_kind(chan, sym);
                    }
                    let nicks: Vec<&str> = names.split_whitespace().collect();
                    self.channels.users_join(chan, &nicks, Some(&self.isupport));
                }
            }
            // RPL_CHANNELMODEIS: <target> <channel> <modes> [args...]
            "324" => {
                if let [_, chan, rest @ ..] = msg.args.as_slice() {
                    if !rest.is_empty() {
                        self.channels.set_modes(chan, &rest.join(" "));
                    }
                }
            }
            _ => {}
        }
        Vec::new()
    }

    fn apply_mode_message(&mut self, msg: &Message) -> Vec<ModeChange> {
        let [target, delta, args @ ..] = msg.args.as_slice() else {
            return Vec::new();
        };
        if !self.isupport.is_channel_name(target) {
            // User-mode change for ourselves; not tracked here.
            return Vec::new();
        }
        let changes = parse_channel_modes(delta, args, &self.isupport);
        for change in &changes {
            self.channels.apply_mode(target, change);
        }
        changes
    }

    fn apply_join(&mut self, msg: &Message) {
        let (Some(nick), Some(chan)) = (msg.nick(), msg.args.first()) else {
            return;
        };
        if irc_eq(nick, &self.nick) {
            debug!(channel = %chan, "joined channel");
            self.channels.join(chan);
        } else {
            self.channels.user_join(chan, nick);
        }
    }

    fn apply_part(&mut self, msg: &Message) {
        let (Some(nick), Some(chan)) = (msg.nick(), msg.args.first()) else {
            return;
        };
        if irc_eq(nick, &self.nick) {
            debug!(channel = %chan, "parted channel");
            self.channels.part(chan);
        } else {
            self.channels.user_part(chan, nick);
        }
    }
}
