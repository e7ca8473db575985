//! Splits a raw command line into arguments.
//!
//! The rules are deliberately small:
//!
//! - a space outside quotes separates arguments, runs of spaces yield nothing;
//! - `"` toggles quoted mode and is dropped from the token;
//! - `\"` is a literal `"` and does not toggle quoted mode;
//! - any other `\` is kept as is;
//! - an unterminated quote swallows the rest of the line without failing.

use std::iter::Peekable;
use std::str::CharIndices;

use miette::SourceSpan;

/// One argument together with the byte range it was read from.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Token {
    pub value: String,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum State {
    Normal,
    InQuotes,
    /// A backslash was read and the next character decides what it means.
    Escaped { resume: Resume },
}

/// Where to go back to once an escape has been resolved.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum Resume {
    Normal,
    InQuotes,
}

impl From<Resume> for State {
    fn from(resume: Resume) -> Self {
        match resume {
            Resume::Normal => State::Normal,
            Resume::InQuotes => State::InQuotes,
        }
    }
}

/// Iterator over the [`Token`]s of a command line.
pub struct Tokenizer<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
    state: State,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
            state: State::Normal,
        }
    }

    fn flush(&self, value: &mut String, start: Option<usize>, end: usize) -> Option<Token> {
        let start = start?;
        if value.is_empty() {
            return None;
        }

        Some(Token {
            value: std::mem::take(value),
            span: (start..end).into(),
        })
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let mut value = String::new();
        let mut start = None;

        while let Some((offset, c)) = self.chars.next() {
            let resume = match self.state {
                State::InQuotes => Resume::InQuotes,
                _ => Resume::Normal,
            };

            match (self.state, c) {
                (State::Escaped { resume }, c) => {
                    // Only reachable after `\"`, see below.
                    value.push(c);
                    self.state = resume.into();
                }
                (_, '\\') => {
                    start.get_or_insert(offset);
                    if matches!(self.chars.peek(), Some((_, '"'))) {
                        self.state = State::Escaped { resume };
                    } else {
                        value.push('\\');
                    }
                }
                (_, '"') => {
                    start.get_or_insert(offset);
                    self.state = match self.state {
                        State::InQuotes => State::Normal,
                        _ => State::InQuotes,
                    };
                }
                (State::Normal, ' ') => {
                    if let Some(token) = self.flush(&mut value, start, offset) {
                        return Some(token);
                    }
                    start = None;
                }
                (_, c) => {
                    start.get_or_insert(offset);
                    value.push(c);
                }
            }
        }

        self.flush(&mut value, start, self.input.len())
    }
}

/// Split `line` into its arguments, in the order they appear.
pub fn tokenize(line: &str) -> Vec<String> {
    Tokenizer::new(line).map(|token| token.value).collect()
}
