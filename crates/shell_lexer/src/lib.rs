//! Headless command-line lexer for the arcade shell.
//!
//! This crate implements only the small subset the shell needs: line tokenization with
//! quoting/escaping, and splitting the resulting words into a command word, positional arguments,
//! and raw flags. Flag validation against a command's recognized options lives in the engine.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raw flag exactly as written on the command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum RawFlag {
    /// `--name`
    Long {
        /// Flag name without the leading dashes.
        name: String,
    },
    /// `--name=value`
    LongValued {
        /// Flag name without the leading dashes.
        name: String,
        /// Text after the first `=`; may be empty.
        value: String,
    },
    /// `-x`
    Short {
        /// Flag letter.
        letter: char,
    },
}

impl RawFlag {
    /// Returns the flag as the user typed it, for error messages.
    pub fn display(&self) -> String {
        match self {
            Self::Long { name } => format!("--{name}"),
            Self::LongValued { name, value } => format!("--{name}={value}"),
            Self::Short { letter } => format!("-{letter}"),
        }
    }
}

/// A tokenized command line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedLine {
    /// First word of the line; `None` for blank input.
    pub command: Option<String>,
    /// Positional arguments in input order.
    pub args: Vec<String>,
    /// Flags in input order.
    pub flags: Vec<RawFlag>,
}

impl ParsedLine {
    /// Returns whether the line contained no words.
    pub fn is_empty(&self) -> bool {
        self.command.is_none()
    }
}

/// Tokenization failure.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum LexError {
    /// A backslash ended the line.
    #[error("dangling escape sequence")]
    DanglingEscape,
    /// A quote was opened and never closed.
    #[error("unterminated quoted string")]
    UnterminatedQuote,
}

/// Parses one input line into command word, positional arguments, and flags.
///
/// # Errors
///
/// Returns [`LexError`] when quoting or escaping is malformed.
pub fn parse_line(line: &str) -> Result<ParsedLine, LexError> {
    let mut words = tokenize(line)?.into_iter();
    let Some(command) = words.next() else {
        return Ok(ParsedLine::default());
    };
    let (args, flags) = split_arguments(words);
    Ok(ParsedLine {
        command: Some(command),
        args,
        flags,
    })
}

/// Splits argument words into positional arguments and flags.
///
/// `--name` and `--name=value` are long flags, `-x` with a single ASCII letter is a short flag,
/// and every other word (including `-`, `--`, and `-10`) is positional.
pub fn split_arguments<I>(words: I) -> (Vec<String>, Vec<RawFlag>)
where
    I: IntoIterator<Item = String>,
{
    let mut args = Vec::new();
    let mut flags = Vec::new();
    for word in words {
        match classify(&word) {
            Some(flag) => flags.push(flag),
            None => args.push(word),
        }
    }
    (args, flags)
}

fn classify(word: &str) -> Option<RawFlag> {
    if let Some(rest) = word.strip_prefix("--") {
        return match rest.split_once('=') {
            Some((name, _)) if name.is_empty() => None,
            Some((name, value)) => Some(RawFlag::LongValued {
                name: name.to_string(),
                value: value.to_string(),
            }),
            None if rest.is_empty() => None,
            None => Some(RawFlag::Long {
                name: rest.to_string(),
            }),
        };
    }

    let mut chars = word.strip_prefix('-')?.chars();
    match (chars.next(), chars.next()) {
        (Some(letter), None) if letter.is_ascii_alphabetic() => Some(RawFlag::Short { letter }),
        _ => None,
    }
}

/// Splits a line into words, honoring single/double quotes and backslash escapes.
///
/// # Errors
///
/// Returns [`LexError`] for a trailing backslash or an unterminated quote.
pub fn tokenize(line: &str) -> Result<Vec<String>, LexError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut chars = line.chars();
    let mut quote = None::<char>;

    while let Some(ch) = chars.next() {
        match quote {
            Some(active) if ch == active => quote = None,
            Some(_) | None if ch == '\\' => {
                current.push(chars.next().ok_or(LexError::DanglingEscape)?);
                in_token = true;
            }
            Some(_) => current.push(ch),
            None if ch == '"' || ch == '\'' => {
                quote = Some(ch);
                in_token = true;
            }
            None if ch.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            None => {
                current.push(ch);
                in_token = true;
            }
        }
    }

    if quote.is_some() {
        return Err(LexError::UnterminatedQuote);
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}
