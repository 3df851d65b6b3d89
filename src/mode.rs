//! Channel mode-change interpretation.
//!
//! A MODE notification carries a terse delta string (`+bilk-plsoL`) and a
//! flat argument list; which letters consume an argument depends entirely on
//! the server-advertised CHANMODES/PREFIX tables, so interpretation takes the
//! current [`Isupport`] table as context.

use crate::isupport::Isupport;

/// ISUPPORT argument-arity classification of a mode letter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModeCategory {
    /// List modes (bans and friends): an argument on both add and remove.
    A,
    /// An argument on both add and remove (e.g. channel key).
    B,
    /// An argument only when adding (e.g. user limit).
    C,
    /// Never an argument. Unknown letters default here.
    D,
    /// A per-user status mode (op, voice, ...): always a nick argument.
    Status,
}

/// One classified mode change, in delta-string encounter order.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModeChange {
    /// True for `+`, false for `-`.
    pub add: bool,
    /// The mode letter.
    pub mode: char,
    /// The consumed argument, present only per the category's arity rule.
    pub arg: Option<String>,
    /// The arity classification under the table in effect.
    pub category: ModeCategory,
}

/// Interpret a mode delta string against the capability table.
///
/// Scans `delta` left to right; `+`/`-` flip the direction for subsequent
/// letters. Arguments are consumed from the front of `args` exactly when a
/// letter's category requires one in the current direction. An exhausted
/// argument queue yields `arg: None` rather than an error, and unknown
/// letters classify as [`ModeCategory::D`], so interpretation always
/// consumes the whole delta string.
///
/// With a default table (no 005 seen yet) every non-status letter falls back
/// to category D; fidelity improves as ISUPPORT lines arrive.
pub fn parse_channel_modes<S: AsRef<str>>(
    delta: &str,
    args: &[S],
    isupport: &Isupport,
) -> Vec<ModeChange> {
    let mut changes = Vec::new();
    let mut add = true;
    let mut queue = args.iter();

    for c in delta.chars() {
        match c {
            '+' => add = true,
            '-' => add = false,
            letter => {
                let category = isupport.mode_category(letter);
                let wants_arg = match category {
                    ModeCategory::A | ModeCategory::B | ModeCategory::Status => true,
                    ModeCategory::C => add,
                    ModeCategory::D => false,
                };
                let arg = if wants_arg {
                    queue.next().map(|a| a.as_ref().to_string())
                } else {
                    None
                };
                changes.push(ModeChange { add, mode: letter, arg, category });
            }
        }
    }

    changes
}
