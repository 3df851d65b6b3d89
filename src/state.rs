//! Channel and user state tracking.
//!
//! [`ChannelList`] is the in-memory model of every channel the client is in:
//! topic, channel kind, raw channel modes, and the per-channel user roster
//! with status modes. Notifications arrive from the network asynchronously
//! and out of order, so every mutator is forgiving: operations against an
//! untracked channel are silent no-ops, and only read accessors whose
//! contract requires a channel signal [`StateError::NoSuchChannel`].
//!
//! Channels are keyed by their RFC 1459 case-folded name and iterate in
//! ascending key order. Rosters keep insertion order and deduplicate by
//! case-folded nick.

use std::collections::BTreeMap;

use tracing::trace;

use crate::casemap::{irc_eq, irc_to_lower};
use crate::error::{Result, StateError};
use crate::isupport::Isupport;
use crate::mode::{ModeCategory, ModeChange};

/// Topic text reported for channels whose topic is unset.
pub const NO_TOPIC: &str = "no topic";

/// Status symbols stripped from NAMES entries before any 005 has supplied a
/// real PREFIX table.
const FALLBACK_STATUS_SYMBOLS: [char; 5] = ['@', '+', '%', '&', '~'];

/// Channel visibility, from the NAMES-reply symbol.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChannelKind {
    /// `=`: a public channel.
    Public,
    /// `*`: a private channel.
    Private,
    /// `@`: a secret channel.
    Secret,
    /// No NAMES reply seen yet.
    #[default]
    Unknown,
}

impl ChannelKind {
    /// Map the NAMES-reply symbol to a kind. Anything unrecognized is
    /// [`ChannelKind::Unknown`].
    pub fn from_symbol(symbol: char) -> ChannelKind {
        match symbol {
            '=' => ChannelKind::Public,
            '*' => ChannelKind::Private,
            '@' => ChannelKind::Secret,
            _ => ChannelKind::Unknown,
        }
    }
}

/// One member of a channel roster.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelUser {
    /// The member's nick.
    pub nick: String,
    /// Ident, when learned from a message prefix.
    pub user: Option<String>,
    /// Host, when learned from a message prefix.
    pub host: Option<String>,
    /// Status mode letters currently held in this channel (e.g. `"o"`).
    pub modes: String,
}

impl ChannelUser {
    fn new(nick: &str, modes: String) -> ChannelUser {
        ChannelUser {
            nick: nick.to_string(),
            user: None,
            host: None,
            modes,
        }
    }
}

/// One tracked channel.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Channel {
    /// The channel name as first seen (case preserved for display).
    pub name: String,
    /// The topic, unset until a TOPIC/332 arrives.
    pub topic: Option<String>,
    /// Channel visibility.
    pub kind: ChannelKind,
    /// Raw channel-attribute mode string, as reported by a 324 reply.
    pub modes: String,
    /// The roster, insertion-ordered, unique by case-folded nick.
    pub users: Vec<ChannelUser>,
}

impl Channel {
    fn new(name: &str) -> Channel {
        Channel {
            name: name.to_string(),
            topic: None,
            kind: ChannelKind::Unknown,
            modes: String::new(),
            users: Vec::new(),
        }
    }

    fn user_mut(&mut self, nick: &str) -> Option<&mut ChannelUser> {
        self.users.iter_mut().find(|u| irc_eq(&u.nick, nick))
    }

    fn has_user(&self, nick: &str) -> bool {
        self.users.iter().any(|u| irc_eq(&u.nick, nick))
    }

    /// Drop later duplicates after an operation that may have collided two
    /// roster entries (rename, bulk join). First occurrence wins.
    fn dedup_users(&mut self) {
        let mut seen = Vec::with_capacity(self.users.len());
        self.users.retain(|u| {
            let key = irc_to_lower(&u.nick);
            if seen.contains(&key) {
                false
            } else {
                seen.push(key);
                true
            }
        });
    }
}

/// Full-state export of one channel, for snapshot consumers.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelSnapshot {
    /// Channel display name.
    pub name: String,
    /// Roster nicks in roster order.
    pub users: Vec<String>,
    /// Topic, or the [`NO_TOPIC`] sentinel.
    pub topic: String,
    /// Channel visibility.
    pub kind: ChannelKind,
}

/// The channel store: case-folded channel name → [`Channel`].
///
/// All mutators fold the channel name before lookup and are no-ops for
/// untracked channels; the store never auto-creates a channel as a side
/// effect of, say, a mode update.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelList {
    channels: BTreeMap<String, Channel>,
}

impl ChannelList {
    /// Create an empty store.
    pub fn new() -> ChannelList {
        ChannelList::default()
    }

    /// Start tracking `name`. No-op when already tracked.
    pub fn join(&mut self, name: &str) {
        let key = irc_to_lower(name);
        if !self.channels.contains_key(&key) {
            trace!(channel = name, "tracking channel");
            self.channels.insert(key, Channel::new(name));
        }
    }

    /// Stop tracking `name`. No-op when untracked.
    pub fn part(&mut self, name: &str) {
        if self.channels.remove(&irc_to_lower(name)).is_some() {
            trace!(channel = name, "dropped channel");
        }
    }

    /// Set the topic of a tracked channel.
    pub fn set_topic(&mut self, name: &str, topic: &str) {
        if let Some(chan) = self.channels.get_mut(&irc_to_lower(name)) {
            chan.topic = Some(topic.to_string());
        }
    }

    /// Set the kind of a tracked channel from the NAMES-reply symbol
    /// (`=` public, `*` private, `@` secret).
    pub fn set_kind(&mut self, name: &str, symbol: char) {
        if let Some(chan) = self.channels.get_mut(&irc_to_lower(name)) {
            chan.kind = ChannelKind::from_symbol(symbol);
        }
    }

    /// Set the raw channel-attribute mode string (from a 324 reply).
    pub fn set_modes(&mut self, name: &str, modes: &str) {
        if let Some(chan) = self.channels.get_mut(&irc_to_lower(name)) {
            chan.modes = modes.to_string();
        }
    }

    /// Add one user to a tracked channel's roster.
    pub fn user_join(&mut self, name: &str, nick: &str) {
        self.users_join(name, &[nick], None);
    }

    /// Add users to a tracked channel's roster, deduplicating by nick.
    ///
    /// With an [`Isupport`] table, leading status symbols on each nick (all
    /// of them, for multi-prefix servers) become the user's initial mode
    /// string. Without one, any of the conventional rank symbols
    /// `@ + % & ~` are stripped and no modes are recorded; this is the
    /// fallback used before capabilities are learned.
    pub fn users_join<S: AsRef<str>>(&mut self, name: &str, nicks: &[S], isupport: Option<&Isupport>) {
        let Some(chan) = self.channels.get_mut(&irc_to_lower(name)) else {
            return;
        };
        for nick in nicks {
            let raw = nick.as_ref();
            let (nick, modes) = match isupport {
                Some(isup) => {
                    let mut modes = String::new();
                    let mut rest = raw;
                    while let Some((sym, m)) = rest
                        .chars()
                        .next()
                        .and_then(|c| isup.status_mode_for_symbol(c).map(|m| (c, m)))
                    {
                        modes.push(m);
                        // Symbols need not be ASCII; step over the whole
                        // code point.
                        rest = &rest[sym.len_utf8()..];
                    }
                    (rest, modes)
                }
                None => (raw.trim_start_matches(FALLBACK_STATUS_SYMBOLS), String::new()),
            };
            if !nick.is_empty() && !chan.has_user(nick) {
                chan.users.push(ChannelUser::new(nick, modes));
            }
        }
        chan.dedup_users();
    }

    /// Remove `nick` from the named channel's roster only.
    pub fn user_part(&mut self, name: &str, nick: &str) {
        if let Some(chan) = self.channels.get_mut(&irc_to_lower(name)) {
            chan.users.retain(|u| !irc_eq(&u.nick, nick));
        }
    }

    /// Remove `nick` from every tracked channel's roster.
    pub fn user_quit(&mut self, nick: &str) {
        for chan in self.channels.values_mut() {
            chan.users.retain(|u| !irc_eq(&u.nick, nick));
        }
    }

    /// Rename a user in every tracked channel where present.
    pub fn user_rename(&mut self, old_nick: &str, new_nick: &str) {
        for chan in self.channels.values_mut() {
            if let Some(user) = chan.user_mut(old_nick) {
                user.nick = new_nick.to_string();
                chan.dedup_users();
            }
        }
    }

    /// Apply one classified mode change to a tracked channel.
    ///
    /// Only [`ModeCategory::Status`] changes act on the roster; adding is
    /// idempotent (a held letter is never duplicated). Other categories are
    /// channel-attribute modes and are no-ops here.
    pub fn apply_mode(&mut self, name: &str, change: &ModeChange) {
        if change.category != ModeCategory::Status {
            return;
        }
        let Some(target) = change.arg.as_deref() else {
            return;
        };
        let Some(chan) = self.channels.get_mut(&irc_to_lower(name)) else {
            return;
        };
        if let Some(user) = chan.user_mut(target) {
            user.modes.retain(|c| c != change.mode);
            if change.add {
                user.modes.push(change.mode);
            }
            trace!(
                channel = name,
                nick = target,
                modes = %user.modes,
                "status modes updated"
            );
        }
    }

    /// Shared lookup for accessors that signal on an untracked channel.
    fn channel(&self, name: &str) -> Result<&Channel> {
        self.channels
            .get(&irc_to_lower(name))
            .ok_or_else(|| StateError::NoSuchChannel(name.to_string()))
    }

    /// Whether `name` is tracked.
    pub fn contains(&self, name: &str) -> bool {
        self.channels.contains_key(&irc_to_lower(name))
    }

    /// Number of tracked channels.
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// Whether no channels are tracked.
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Display names of all tracked channels, in ascending folded-key order.
    pub fn channels(&self) -> Vec<&str> {
        self.channels.values().map(|c| c.name.as_str()).collect()
    }

    /// Roster nicks of a tracked channel, in roster order.
    pub fn channel_users(&self, name: &str) -> Result<Vec<&str>> {
        Ok(self.channel(name)?.users.iter().map(|u| u.nick.as_str()).collect())
    }

    /// `(nick, status modes)` pairs of a tracked channel's roster.
    pub fn channel_user_modes(&self, name: &str) -> Result<Vec<(&str, &str)>> {
        Ok(self
            .channel(name)?
            .users
            .iter()
            .map(|u| (u.nick.as_str(), u.modes.as_str()))
            .collect())
    }

    /// The channel topic, or [`NO_TOPIC`] when unset *or* when the channel
    /// is untracked. This accessor never errors.
    pub fn channel_topic(&self, name: &str) -> &str {
        self.channel(name)
            .ok()
            .and_then(|c| c.topic.as_deref())
            .unwrap_or(NO_TOPIC)
    }

    /// The channel kind, [`ChannelKind::Unknown`] when unset or untracked.
    /// This accessor never errors.
    pub fn channel_kind(&self, name: &str) -> ChannelKind {
        self.channel(name).map(|c| c.kind).unwrap_or_default()
    }

    /// The raw channel-attribute mode string of a tracked channel.
    pub fn channel_modes(&self, name: &str) -> Result<&str> {
        Ok(self.channel(name)?.modes.as_str())
    }

    /// Whether `nick` is on the named channel's roster.
    pub fn has_user(&self, name: &str, nick: &str) -> Result<bool> {
        Ok(self.channel(name)?.has_user(nick))
    }

    /// Export the full store state, one entry per channel in key order.
    pub fn snapshot(&self) -> Vec<ChannelSnapshot> {
        self.channels
            .values()
            .map(|c| ChannelSnapshot {
                name: c.name.clone(),
                users: c.users.iter().map(|u| u.nick.clone()).collect(),
                topic: c.topic.clone().unwrap_or_else(|| NO_TOPIC.to_string()),
                kind: c.kind,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::parse_channel_modes;

    fn store_with(name: &str) -> ChannelList {
        let mut list = ChannelList::new();
        list.join(name);
        list
    }

    #[test]
    fn join_is_idempotent_and_part_round_trips() {
        let mut list = ChannelList::new();
        list.join("#Rust");
        list.join("#rust");
        assert_eq!(list.len(), 1);
        assert_eq!(list.channels(), vec!["#Rust"]);

        list.part("#RUST");
        assert!(list.is_empty());
        // Parting again is a no-op.
        list.part("#rust");
        assert!(list.is_empty());
    }

    #[test]
    fn channels_iterate_in_ascending_key_order() {
        let mut list = ChannelList::new();
        list.join("#zebra");
        list.join("#Alpha");
        list.join("&local");
        assert_eq!(list.channels(), vec!["#Alpha", "#zebra", "&local"]);
    }

    #[test]
    fn mutators_never_auto_create_channels() {
        let mut list = ChannelList::new();
        list.set_topic("#ghost", "boo");
        list.user_join("#ghost", "casper");
        list.set_kind("#ghost", '=');
        list.apply_mode(
            "#ghost",
            &ModeChange {
                add: true,
                mode: 'o',
                arg: Some("casper".to_string()),
                category: ModeCategory::Status,
            },
        );
        assert!(list.is_empty());
    }

    #[test]
    fn topic_and_kind_defaults_do_not_error() {
        let list = store_with("#chan");
        assert_eq!(list.channel_topic("#chan"), NO_TOPIC);
        assert_eq!(list.channel_topic("#untracked"), NO_TOPIC);
        assert_eq!(list.channel_kind("#chan"), ChannelKind::Unknown);
        assert_eq!(list.channel_kind("#untracked"), ChannelKind::Unknown);
    }

    #[test]
    fn error_signaling_accessors_flag_untracked_channels() {
        let list = ChannelList::new();
        assert_eq!(
            list.channel_users("#nowhere"),
            Err(StateError::NoSuchChannel("#nowhere".to_string()))
        );
        assert_eq!(
            list.has_user("#nowhere", "nick"),
            Err(StateError::NoSuchChannel("#nowhere".to_string()))
        );
    }

    #[test]
    fn roster_joins_dedup_and_keep_insertion_order() {
        let mut list = store_with("#chan");
        list.users_join("#chan", &["carol", "alice", "Carol", "bob"], None);
        assert_eq!(
            list.channel_users("#chan").unwrap(),
            vec!["carol", "alice", "bob"]
        );
    }

    #[test]
    fn names_symbols_parse_against_prefix_table() {
        let mut isup = Isupport::default();
        isup.update(&["nick", "PREFIX=(qaohv)~&@%+"]);
        let mut list = store_with("#chan");
        list.users_join("#chan", &["@op", "+voiced", "~&qa", "plain"], Some(&isup));
        assert_eq!(
            list.channel_user_modes("#chan").unwrap(),
            vec![("op", "o"), ("voiced", "v"), ("qa", "qa"), ("plain", "")]
        );
    }

    #[test]
    fn names_symbols_may_be_multibyte() {
        // Nothing stops a server advertising a non-ASCII prefix symbol.
        let mut isup = Isupport::default();
        isup.update(&["nick", "PREFIX=(ov)★+"]);
        let mut list = store_with("#chan");
        list.users_join("#chan", &["★oper", "+voiced", "plain"], Some(&isup));
        assert_eq!(
            list.channel_user_modes("#chan").unwrap(),
            vec![("oper", "o"), ("voiced", "v"), ("plain", "")]
        );
    }

    #[test]
    fn names_symbols_strip_without_prefix_table() {
        let mut list = store_with("#chan");
        list.users_join("#chan", &["@op", "+voiced", "%half"], None);
        assert_eq!(
            list.channel_user_modes("#chan").unwrap(),
            vec![("op", ""), ("voiced", ""), ("half", "")]
        );
    }

    #[test]
    fn quit_removes_from_every_channel() {
        let mut list = ChannelList::new();
        list.join("#a");
        list.join("#b");
        list.join("#c");
        list.users_join("#a", &["alice", "bob"], None);
        list.users_join("#b", &["Alice"], None);
        // #c never had alice; quit must be a no-op there.
        list.user_quit("alice");
        assert_eq!(list.channel_users("#a").unwrap(), vec!["bob"]);
        assert!(list.channel_users("#b").unwrap().is_empty());
        assert!(list.channel_users("#c").unwrap().is_empty());
    }

    #[test]
    fn rename_propagates_and_folds_collisions() {
        let mut list = ChannelList::new();
        list.join("#a");
        list.join("#b");
        list.users_join("#a", &["alice", "bob"], None);
        list.users_join("#b", &["alice"], None);
        list.user_rename("alice", "alicia");
        assert_eq!(list.channel_users("#a").unwrap(), vec!["alicia", "bob"]);
        assert_eq!(list.channel_users("#b").unwrap(), vec!["alicia"]);

        // Renaming onto an existing roster entry collapses the duplicate.
        list.user_rename("bob", "ALICIA");
        assert_eq!(list.channel_users("#a").unwrap(), vec!["alicia"]);
    }

    #[test]
    fn status_mode_application_is_idempotent() {
        let mut list = store_with("#chan");
        list.user_join("#chan", "alice");
        let op = ModeChange {
            add: true,
            mode: 'o',
            arg: Some("alice".to_string()),
            category: ModeCategory::Status,
        };
        list.apply_mode("#chan", &op);
        list.apply_mode("#chan", &op);
        assert_eq!(list.channel_user_modes("#chan").unwrap(), vec![("alice", "o")]);

        let deop = ModeChange { add: false, ..op };
        list.apply_mode("#chan", &deop);
        assert_eq!(list.channel_user_modes("#chan").unwrap(), vec![("alice", "")]);
    }

    #[test]
    fn non_status_changes_do_not_touch_the_roster() {
        let mut isup = Isupport::default();
        isup.update(&["nick", "CHANMODES=beI,k,l,imnpst"]);
        let mut list = store_with("#chan");
        list.user_join("#chan", "alice");
        for change in parse_channel_modes("+kl", &["alice", "10"], &isup) {
            list.apply_mode("#chan", &change);
        }
        assert_eq!(list.channel_user_modes("#chan").unwrap(), vec![("alice", "")]);
    }

    #[test]
    fn has_user_is_case_insensitive() {
        let mut list = store_with("#chan");
        list.user_join("#chan", "Alice[1]");
        assert!(list.has_user("#chan", "alice{1}").unwrap());
        assert!(!list.has_user("#chan", "bob").unwrap());
    }

    #[test]
    fn snapshot_exports_full_state() {
        let mut list = ChannelList::new();
        list.join("#b");
        list.join("#a");
        list.set_topic("#a", "first!");
        list.set_kind("#a", '=');
        list.users_join("#a", &["alice", "bob"], None);

        let snap = list.snapshot();
        assert_eq!(snap.len(), 2);
        assert_eq!(snap[0].name, "#a");
        assert_eq!(snap[0].topic, "first!");
        assert_eq!(snap[0].kind, ChannelKind::Public);
        assert_eq!(snap[0].users, vec!["alice", "bob"]);
        assert_eq!(snap[1].name, "#b");
        assert_eq!(snap[1].topic, NO_TOPIC);
    }
}
