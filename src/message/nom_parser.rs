//! Nom-based line tokenizer.
//!
//! Splits a raw line into its lexical pieces (tags, prefix, command,
//! parameters) without interpreting any of them. Borrowed slices throughout;
//! the owned [`Message`](crate::Message) layer sits on top.

use nom::{
    bytes::complete::{take_until, take_while1},
    character::complete::{char, space0},
    combinator::opt,
    error::{context, VerboseError},
    sequence::preceded,
    IResult,
};

use crate::error::MessageParseError;

type ParseResult<I, O> = IResult<I, O, VerboseError<I>>;

/// IRCv3 tags token: everything between `@` and the first space.
fn tags(input: &str) -> ParseResult<&str, &str> {
    context("message tags", preceded(char('@'), take_until(" ")))(input)
}

/// Prefix token: everything between `:` and the first space.
fn prefix(input: &str) -> ParseResult<&str, &str> {
    context("message prefix", preceded(char(':'), take_while1(|c| c != ' ')))(input)
}

/// Command token: a command word or numeric reply code.
fn command(input: &str) -> ParseResult<&str, &str> {
    context("command", take_while1(|c: char| c.is_alphanumeric()))(input)
}

/// One tokenized protocol line, borrowing from the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine<'a> {
    /// Raw IRCv3 tags (without the leading `@`), if present.
    pub tags: Option<&'a str>,
    /// Raw prefix (without the leading `:`), if present.
    pub prefix: Option<&'a str>,
    /// The command word or numeric code.
    pub command: &'a str,
    /// Positional parameters; the trailing parameter, if any, is last.
    pub params: Vec<&'a str>,
}

impl<'a> RawLine<'a> {
    /// Tokenize one protocol line.
    ///
    /// Fails only when no command token can be found; the infallible entry
    /// point is [`Message::parse`](crate::Message::parse), which degrades on
    /// failure instead.
    pub fn tokenize(input: &'a str) -> Result<RawLine<'a>, MessageParseError> {
        if input.is_empty() {
            return Err(MessageParseError::EmptyMessage);
        }
        match line(input) {
            Ok((_rest, raw)) => Ok(raw),
            Err(_) => Err(MessageParseError::InvalidCommand),
        }
    }
}

fn line(input: &str) -> ParseResult<&str, RawLine<'_>> {
    let (input, tags) = opt(tags)(input)?;
    let (input, _) = space0(input)?;
    let (input, prefix) = opt(prefix)(input)?;
    let (input, _) = space0(input)?;
    let (input, command) = command(input)?;

    let mut params = Vec::new();
    let mut rest = input;

    while let Some(stripped) = rest.strip_prefix(' ') {
        rest = stripped;
        if let Some(trailing) = rest.strip_prefix(':') {
            // Trailing parameter: the rest of the line verbatim, spaces and
            // all, colon stripped. May legitimately be empty.
            let end = trailing.find(['\r', '\n']).unwrap_or(trailing.len());
            params.push(&trailing[..end]);
            rest = &trailing[end..];
            break;
        }
        let end = rest
            .find([' ', '\r', '\n'])
            .unwrap_or(rest.len());
        if end == 0 {
            break;
        }
        params.push(&rest[..end]);
        rest = &rest[end..];
    }

    Ok((rest, RawLine { tags, prefix, command, params }))
}
