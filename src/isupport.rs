//! RPL_ISUPPORT (numeric 005) interpretation.
//!
//! Servers advertise their dialect through 005 tokens, usually spread across
//! several lines. [`Isupport`] is the accumulated capability table: each
//! recognized token updates exactly its own field, unknown tokens are
//! ignored, and nothing is ever reset wholesale. The table feeds the mode
//! interpreter (argument arity cannot be decided without it) and the roster
//! code (status-prefix symbols on NAMES entries).

use tracing::debug;

use crate::mode::ModeCategory;

/// Accumulated server capability table.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Isupport {
    /// Characters that mark a channel-type target, from CHANTYPES.
    pub chantypes: Vec<char>,
    /// (mode letter, prefix symbol) pairs, most privileged first, from
    /// PREFIX=(letters)symbols. Pairing is positional.
    pub prefixes: Vec<(char, char)>,
    /// The four CHANMODES groups in A,B,C,D order.
    pub chanmodes: [String; 4],
    /// Network name from the NETWORK token.
    pub network: Option<String>,
}

impl Default for Isupport {
    /// The RFC 1459 baseline a client must assume before any 005 arrives:
    /// `#`/`&` channels, op and voice prefixes, no mode-category knowledge.
    fn default() -> Self {
        Isupport {
            chantypes: vec!['#', '&'],
            prefixes: vec![('o', '@'), ('v', '+')],
            chanmodes: Default::default(),
            network: None,
        }
    }
}

impl Isupport {
    /// Apply the arguments of one 005 message.
    ///
    /// `args` is the full argument list as parsed, so the leading addressed
    /// nick is skipped, as is the trailing `are supported by this server`
    /// text (any token containing a space). Fields not named by a token keep
    /// their previous values.
    pub fn update<S: AsRef<str>>(&mut self, args: &[S]) {
        for token in args.iter().skip(1) {
            let token = token.as_ref();
            if token.is_empty() || token.contains(' ') {
                continue;
            }
            self.apply_token(token);
        }
    }

    fn apply_token(&mut self, token: &str) {
        let (key, value) = match token.split_once('=') {
            Some((k, v)) => (k, v),
            None => (token, ""),
        };
        if key.eq_ignore_ascii_case("NETWORK") && !value.is_empty() {
            debug!(network = value, "learned network name");
            self.network = Some(value.to_string());
        } else if key.eq_ignore_ascii_case("CHANTYPES") && !value.is_empty() {
            self.chantypes = value.chars().collect();
        } else if key.eq_ignore_ascii_case("PREFIX") {
            if let Some(pairs) = parse_prefix_value(value) {
                self.prefixes = pairs;
            }
        } else if key.eq_ignore_ascii_case("CHANMODES") && !value.is_empty() {
            // Fewer than four groups still assign what is present.
            self.chanmodes = Default::default();
            for (slot, group) in self.chanmodes.iter_mut().zip(value.split(',')) {
                *slot = group.to_string();
            }
        }
    }

    /// Whether `target` names a channel under the current CHANTYPES.
    pub fn is_channel_name(&self, target: &str) -> bool {
        target
            .chars()
            .next()
            .is_some_and(|c| self.chantypes.contains(&c))
    }

    /// Whether `letter` is a status (user-privilege) mode like `o` or `v`.
    pub fn is_status_mode(&self, letter: char) -> bool {
        self.prefixes.iter().any(|&(m, _)| m == letter)
    }

    /// The status mode letter for a roster prefix symbol (`@` → `o`).
    pub fn status_mode_for_symbol(&self, symbol: char) -> Option<char> {
        self.prefixes
            .iter()
            .find(|&&(_, s)| s == symbol)
            .map(|&(m, _)| m)
    }

    /// Classify a channel mode letter by argument arity.
    ///
    /// Status letters classify as [`ModeCategory::Status`]; letters in none
    /// of the tables default to [`ModeCategory::D`] so unknown modes never
    /// stall argument consumption.
    pub fn mode_category(&self, letter: char) -> ModeCategory {
        if self.is_status_mode(letter) {
            return ModeCategory::Status;
        }
        for (group, category) in self.chanmodes.iter().zip([
            ModeCategory::A,
            ModeCategory::B,
            ModeCategory::C,
            ModeCategory::D,
        ]) {
            if group.contains(letter) {
                return category;
            }
        }
        ModeCategory::D
    }
}

/// Parse a PREFIX value of the form `(letters)symbols` into positional pairs.
fn parse_prefix_value(value: &str) -> Option<Vec<(char, char)>> {
    let rest = value.strip_prefix('(')?;
    let (letters, symbols) = rest.split_once(')')?;
    if letters.is_empty() || symbols.is_empty() {
        return None;
    }
    Some(letters.chars().zip(symbols.chars()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(tokens: &[&str]) -> Vec<String> {
        let mut v = vec!["mynick".to_string()];
        v.extend(tokens.iter().map(|t| t.to_string()));
        v.push("are supported by this server".to_string());
        v
    }

    #[test]
    fn recognized_keys_update_their_fields() {
        let mut isup = Isupport::default();
        isup.update(&args(&["NETWORK=Freenode", "PREFIX=(ov)@+", "CHANTYPES=#&"]));
        assert_eq!(isup.network.as_deref(), Some("Freenode"));
        assert_eq!(isup.prefixes, vec![('o', '@'), ('v', '+')]);
        assert_eq!(isup.chantypes, vec!['#', '&']);
    }

    #[test]
    fn chanmodes_groups_in_order() {
        let mut isup = Isupport::default();
        isup.update(&args(&["CHANMODES=beI,kLf,l,psmn"]));
        assert_eq!(isup.chanmodes[0], "beI");
        assert_eq!(isup.chanmodes[1], "kLf");
        assert_eq!(isup.chanmodes[2], "l");
        assert_eq!(isup.chanmodes[3], "psmn");
    }

    #[test]
    fn short_chanmodes_assigns_what_is_present() {
        let mut isup = Isupport::default();
        isup.update(&args(&["CHANMODES=beI,k"]));
        assert_eq!(isup.chanmodes[0], "beI");
        assert_eq!(isup.chanmodes[1], "k");
        assert_eq!(isup.chanmodes[2], "");
        assert_eq!(isup.chanmodes[3], "");
    }

    #[test]
    fn partial_updates_merge_across_lines() {
        let mut isup = Isupport::default();
        isup.update(&args(&["NETWORK=OFTC"]));
        isup.update(&args(&["CHANTYPES=#"]));
        assert_eq!(isup.network.as_deref(), Some("OFTC"));
        assert_eq!(isup.chantypes, vec!['#']);
    }

    #[test]
    fn unknown_and_malformed_tokens_are_ignored() {
        let mut isup = Isupport::default();
        let before = isup.clone();
        isup.update(&args(&["WHOX", "MONITOR=100", "PREFIX=no-parens", "SAFELIST"]));
        assert_eq!(isup, before);
    }

    #[test]
    fn five_level_prefix_pairs_positionally() {
        let mut isup = Isupport::default();
        isup.update(&args(&["PREFIX=(qaohv)~&@%+"]));
        assert_eq!(
            isup.prefixes,
            vec![('q', '~'), ('a', '&'), ('o', '@'), ('h', '%'), ('v', '+')]
        );
        assert_eq!(isup.status_mode_for_symbol('%'), Some('h'));
        assert!(isup.is_status_mode('a'));
        assert!(!isup.is_status_mode('b'));
    }

    #[test]
    fn channel_name_detection_follows_chantypes() {
        let mut isup = Isupport::default();
        assert!(isup.is_channel_name("#rust"));
        assert!(isup.is_channel_name("&local"));
        assert!(!isup.is_channel_name("nick"));
        isup.update(&args(&["CHANTYPES=!"]));
        assert!(isup.is_channel_name("!weird"));
        assert!(!isup.is_channel_name("#rust"));
    }
}
