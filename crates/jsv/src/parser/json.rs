//! JSON pull parser.
//!
//! Tokens (strings, numbers, literals) are recognized by winnow parsers;
//! the grammar between tokens is a small state machine over a container
//! stack so events can be handed out one at a time.

use std::borrow::Cow;

use winnow::ascii::{digit0, digit1};
use winnow::combinator::{alt, delimited, opt, preceded, repeat};
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::{one_of, take_while};

use super::error::ParseError;
use crate::types::{Event, Location};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    Object,
    Array,
}

/// What the parser accepts next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    /// Any value.
    Value,
    /// A member name or `}` right after `{`.
    FirstMember,
    /// A member name after `,`.
    Member,
    /// A value or `]` right after `[`.
    FirstElement,
    /// `,` or the closing bracket of the innermost container.
    Separator,
    /// Nothing but whitespace.
    End,
    /// An error was reported; no more events.
    Failed,
}

/// A pull parser producing [`Event`]s from JSON text.
///
/// The parser yields `Ok(event)` items in document order and stops after the
/// first `Err`. [`JsonParser::location`] reports where the most recently
/// returned event starts.
///
/// # Example
///
/// ```
/// use jsv::Event;
/// use jsv::parser::JsonParser;
///
/// let mut parser = JsonParser::new(r#"{"a": [1, true]}"#);
/// assert_eq!(parser.next(), Some(Ok(Event::StartObject)));
/// assert_eq!(parser.next(), Some(Ok(Event::Key("a".into()))));
/// assert_eq!(parser.next(), Some(Ok(Event::StartArray)));
/// assert_eq!(parser.location().column, 7);
/// ```
pub struct JsonParser<'a> {
    input: &'a str,
    remaining: &'a str,
    containers: Vec<Container>,
    expect: Expect,
    line: usize,
    line_start: usize,
    scanned: usize,
    location: Location,
}

impl<'a> JsonParser<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            remaining: input,
            containers: Vec::new(),
            expect: Expect::Value,
            line: 1,
            line_start: 0,
            scanned: 0,
            location: Location::default(),
        }
    }

    /// Location of the most recently returned event or error.
    pub fn location(&self) -> Location {
        self.location
    }

    /// Number of containers currently open.
    pub fn depth(&self) -> usize {
        self.containers.len()
    }

    fn next_event(&mut self) -> Result<Option<Event<'a>>, ParseError> {
        loop {
            skip_ws(&mut self.remaining);
            self.location = self.position();
            let expect = self.expect;
            match expect {
                Expect::Failed => return Ok(None),
                Expect::End if self.remaining.is_empty() => return Ok(None),
                Expect::End => return Err(self.syntax("unexpected content after the document")),
                _ if self.remaining.is_empty() => {
                    return Err(ParseError::UnexpectedEof {
                        location: self.location,
                    });
                }
                Expect::Value => return self.value().map(Some),
                Expect::FirstMember if self.eat('}') => {
                    return Ok(Some(self.close(Container::Object)));
                }
                Expect::FirstMember | Expect::Member => return self.key().map(Some),
                Expect::FirstElement if self.eat(']') => {
                    return Ok(Some(self.close(Container::Array)));
                }
                Expect::FirstElement => return self.value().map(Some),
                Expect::Separator => {
                    let Some(&top) = self.containers.last() else {
                        return Err(self.syntax("unexpected separator"));
                    };
                    if self.eat(',') {
                        self.expect = match top {
                            Container::Object => Expect::Member,
                            Container::Array => Expect::Value,
                        };
                        continue;
                    }
                    let closing = match top {
                        Container::Object => '}',
                        Container::Array => ']',
                    };
                    if self.eat(closing) {
                        return Ok(Some(self.close(top)));
                    }
                    return Err(self.syntax(&format!("expected ',' or '{closing}'")));
                }
            }
        }
    }

    fn value(&mut self) -> Result<Event<'a>, ParseError> {
        let event = value_token
            .parse_next(&mut self.remaining)
            .map_err(|_| self.unexpected())?;
        match event {
            Event::StartObject => {
                self.containers.push(Container::Object);
                self.expect = Expect::FirstMember;
            }
            Event::StartArray => {
                self.containers.push(Container::Array);
                self.expect = Expect::FirstElement;
            }
            _ => self.after_value(),
        }
        Ok(event)
    }

    fn key(&mut self) -> Result<Event<'a>, ParseError> {
        let name = string_literal
            .parse_next(&mut self.remaining)
            .map_err(|_| self.syntax("expected a member name"))?;
        skip_ws(&mut self.remaining);
        if !self.eat(':') {
            let location = self.position();
            if self.remaining.is_empty() {
                return Err(ParseError::UnexpectedEof { location });
            }
            return Err(ParseError::Syntax {
                location,
                message: "expected ':'".to_string(),
            });
        }
        self.expect = Expect::Value;
        Ok(Event::Key(name))
    }

    fn close(&mut self, container: Container) -> Event<'a> {
        self.containers.pop();
        self.after_value();
        match container {
            Container::Object => Event::EndObject,
            Container::Array => Event::EndArray,
        }
    }

    fn after_value(&mut self) {
        self.expect = if self.containers.is_empty() {
            Expect::End
        } else {
            Expect::Separator
        };
    }

    fn eat(&mut self, c: char) -> bool {
        match self.remaining.strip_prefix(c) {
            Some(rest) => {
                self.remaining = rest;
                true
            }
            None => false,
        }
    }

    /// Advance line bookkeeping to the current offset.
    fn position(&mut self) -> Location {
        let offset = self.input.len() - self.remaining.len();
        for (i, c) in self.input[self.scanned..offset].char_indices() {
            if c == '\n' {
                self.line += 1;
                self.line_start = self.scanned + i + 1;
            }
        }
        self.scanned = offset;
        let column = self.input[self.line_start..offset].chars().count() + 1;
        Location::new(self.line, column, offset)
    }

    fn syntax(&self, message: &str) -> ParseError {
        ParseError::Syntax {
            location: self.location,
            message: message.to_string(),
        }
    }

    fn unexpected(&self) -> ParseError {
        match self.remaining.chars().next() {
            Some(c) => self.syntax(&format!("unexpected character '{c}'")),
            None => ParseError::UnexpectedEof {
                location: self.location,
            },
        }
    }
}

impl<'a> Iterator for JsonParser<'a> {
    type Item = Result<Event<'a>, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_event() {
            Ok(Some(event)) => Some(Ok(event)),
            Ok(None) => None,
            Err(error) => {
                self.expect = Expect::Failed;
                Some(Err(error))
            }
        }
    }
}

/// Parse a complete document into its event sequence.
pub fn parse_events(input: &str) -> Result<Vec<Event<'_>>, ParseError> {
    JsonParser::new(input).collect()
}

fn skip_ws(input: &mut &str) {
    let _: ModalResult<&str> = take_while(0.., [' ', '\t', '\n', '\r']).parse_next(input);
}

/// Parse the token that begins a value.
fn value_token<'i>(input: &mut &'i str) -> ModalResult<Event<'i>> {
    alt((
        '{'.value(Event::StartObject),
        '['.value(Event::StartArray),
        string_literal.map(Event::String),
        number_literal.map(Event::Number),
        "true".value(Event::Bool(true)),
        "false".value(Event::Bool(false)),
        "null".value(Event::Null),
    ))
    .parse_next(input)
}

/// Parse a number, returning its source text.
fn number_literal<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        opt('-'),
        alt(('0'.void(), (one_of('1'..='9'), digit0).void())),
        opt(('.', digit1)),
        opt((one_of(['e', 'E']), opt(one_of(['+', '-'])), digit1)),
    )
        .take()
        .parse_next(input)
}

/// Parse a string literal, borrowing when it has no escapes.
fn string_literal<'i>(input: &mut &'i str) -> ModalResult<Cow<'i, str>> {
    alt((
        delimited('"', take_while(0.., is_plain), '"').map(Cow::Borrowed),
        escaped_string.map(Cow::Owned),
    ))
    .parse_next(input)
}

/// Characters allowed unescaped inside a string.
fn is_plain(c: char) -> bool {
    c != '"' && c != '\\' && c >= ' '
}

enum Fragment<'i> {
    Plain(&'i str),
    Escaped(char),
}

fn escaped_string(input: &mut &str) -> ModalResult<String> {
    delimited(
        '"',
        repeat(0.., fragment).fold(String::new, |mut acc, fragment| {
            match fragment {
                Fragment::Plain(s) => acc.push_str(s),
                Fragment::Escaped(c) => acc.push(c),
            }
            acc
        }),
        '"',
    )
    .parse_next(input)
}

fn fragment<'i>(input: &mut &'i str) -> ModalResult<Fragment<'i>> {
    alt((
        take_while(1.., is_plain).map(Fragment::Plain),
        preceded('\\', escape).map(Fragment::Escaped),
    ))
    .parse_next(input)
}

fn escape(input: &mut &str) -> ModalResult<char> {
    alt((
        '"'.value('"'),
        '\\'.value('\\'),
        '/'.value('/'),
        'b'.value('\u{08}'),
        'f'.value('\u{0C}'),
        'n'.value('\n'),
        'r'.value('\r'),
        't'.value('\t'),
        preceded('u', unicode_escape),
    ))
    .parse_next(input)
}

/// Parse the digits of a `\u` escape, joining surrogate pairs.
fn unicode_escape(input: &mut &str) -> ModalResult<char> {
    let high = hex4(input)?;
    let code = if (0xD800..0xDC00).contains(&high) {
        let low = preceded("\\u", hex4).parse_next(input)?;
        if !(0xDC00..0xE000).contains(&low) {
            return Err(ErrMode::Cut(ContextError::new()));
        }
        0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
    } else {
        high
    };
    char::from_u32(code).ok_or_else(|| ErrMode::Cut(ContextError::new()))
}

fn hex4(input: &mut &str) -> ModalResult<u32> {
    take_while(4, |c: char| c.is_ascii_hexdigit())
        .try_map(|digits: &str| u32::from_str_radix(digits, 16))
        .parse_next(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_strings_are_borrowed() {
        let events = parse_events(r#"["plain", "esc\"aped"]"#).unwrap();
        assert!(matches!(&events[1], Event::String(Cow::Borrowed("plain"))));
        assert!(matches!(&events[2], Event::String(Cow::Owned(s)) if s == "esc\"aped"));
    }

    #[test]
    fn empty_containers_close_immediately() {
        let events = parse_events(r#"{"a": [], "b": {}}"#).unwrap();
        assert_eq!(
            events,
            vec![
                Event::StartObject,
                Event::Key("a".into()),
                Event::StartArray,
                Event::EndArray,
                Event::Key("b".into()),
                Event::StartObject,
                Event::EndObject,
                Event::EndObject,
            ]
        );
    }

    #[test]
    fn surrogate_pairs_are_joined() {
        let events = parse_events(r#""\ud83d\ude00 and 😀""#).unwrap();
        assert_eq!(events, vec![Event::String("😀 and 😀".into())]);
    }

    #[test]
    fn unpaired_high_surrogate_is_rejected() {
        assert!(parse_events(r#""\ud83dA""#).is_err());
        assert!(parse_events(r#""\ud83d\u0041""#).is_err());
    }

    #[test]
    fn lone_low_surrogate_is_rejected() {
        assert!(parse_events(r#""\ude00""#).is_err());
    }

    #[test]
    fn location_tracks_lines_and_columns() {
        let mut parser = JsonParser::new("{\n  \"a\":\n    1\n}");
        let mut locations = Vec::new();
        while let Some(Ok(_)) = parser.next() {
            locations.push((parser.location().line, parser.location().column));
        }
        assert_eq!(locations, vec![(1, 1), (2, 3), (3, 5), (4, 1)]);
    }
}
