//! IRC case folding.
//!
//! Channel names and nicks compare case-insensitively on IRC, and under the
//! common `rfc1459` casemapping the characters `[]\~` are the uppercase forms
//! of `{}|^`. Every keyed lookup in the channel store goes through these
//! functions so that folding is an explicit step rather than a side effect.

fn fold(c: char) -> char {
    match c {
        '[' => '{',
        ']' => '}',
        '\\' => '|',
        '~' => '^',
        'A'..='Z' => c.to_ascii_lowercase(),
        _ => c,
    }
}

/// Fold a string to IRC lowercase using the RFC 1459 casemapping.
pub fn irc_to_lower(s: &str) -> String {
    s.chars().map(fold).collect()
}

/// Compare two strings under the RFC 1459 casemapping.
pub fn irc_eq(a: &str, b: &str) -> bool {
    let mut ia = a.chars();
    let mut ib = b.chars();
    loop {
        match (ia.next(), ib.next()) {
            (None, None) => return true,
            (Some(ca), Some(cb)) if fold(ca) == fold(cb) => {}
            _ => return false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_ascii_and_specials() {
        assert_eq!(irc_to_lower("#Rust"), "#rust");
        assert_eq!(irc_to_lower("nick[away]~"), "nick{away}^");
        assert_eq!(irc_to_lower("back\\slash"), "back|slash");
    }

    #[test]
    fn eq_ignores_case_and_specials() {
        assert!(irc_eq("StrayLight", "straylight"));
        assert!(irc_eq("nick[1]", "NICK{1}"));
        assert!(!irc_eq("alpha", "beta"));
        assert!(!irc_eq("short", "shorter"));
    }
}
