//! Compiles rule text into [`Rule`] values.
//!
//! The format is line oriented only in that comments run from a `#` in the
//! first column to the end of the line; everywhere else whitespace is
//! insignificant. A rule is one or more matcher groups, separated by commas,
//! followed by a single body whose settings apply to every group:
//!
//! ```text
//! # dim terminals, whether plain or tabbed
//! WM_CLASS(xterm), WM_CLASS(tabbed) WM_NAME(dev) {
//!     focus: 0.9;
//!     normal: 0.6;
//! }
//! ```
//!
//! Parsing is all or nothing: the first error aborts the whole input and no
//! rules are kept.

use std::fmt;
use std::str::Chars;

use thiserror::Error;

use super::{Matcher, Rule};

/// The longest a single string token (property name, value or body
/// parameter) may be, in characters.
pub const MAX_TOKEN_LEN: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    TokenTooLong(usize),
    ExpectedToken { found: Option<char> },
    ExpectedChar { expected: char, found: Option<char> },
    ExpectedDigit { found: Option<char> },
    UnknownParameter(String),
    UnterminatedString { quote: char },
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn found(c: Option<char>) -> String {
            match c {
                Some(c) => format!("'{c}'"),
                None => "end of input".to_string(),
            }
        }
        match self {
            Self::TokenTooLong(max) => {
                write!(f, "string token exceeded maximum length of {max}")
            }
            Self::ExpectedToken { found: c } => {
                write!(f, "expected string token but found {}", found(*c))
            }
            Self::ExpectedChar { expected, found: c } => {
                write!(f, "expected '{expected}' but found {}", found(*c))
            }
            Self::ExpectedDigit { found: c } => {
                write!(f, "expected digit but found {}", found(*c))
            }
            Self::UnknownParameter(name) => write!(f, "unknown rule parameter '{name}'"),
            Self::UnterminatedString { quote } => {
                write!(f, "expected '{quote}' but found end of input")
            }
        }
    }
}

/// A rule-text error, positioned at the 1-based line and column where
/// parsing stopped.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("failed to parse rules at line {line}, column {column}: {kind}")]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub kind: ParseErrorKind,
}

/// Parses rules from the given text, in source order.
///
/// # Errors
///
/// Returns the first [`ParseError`] encountered; no rules from the input
/// are retained in that case.
pub fn parse_rules(input: &str) -> Result<Vec<Rule>, ParseError> {
    Parser::new(input).parse()
}

fn is_token_char(c: char) -> bool {
    c == '_' || c.is_ascii_alphanumeric()
}

struct Parser<'a> {
    input: Chars<'a>,
    line: usize,
    column: usize,
    newline: bool,
    done: bool,
    lookahead: Option<Option<char>>,
    max_token_len: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input: input.chars(),
            line: 1,
            column: 0,
            newline: false,
            done: false,
            lookahead: None,
            max_token_len: MAX_TOKEN_LEN,
        }
    }

    fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError {
            line: self.line,
            column: self.column,
            kind,
        }
    }

    /// Takes the next character from the input and updates the position
    /// counters. A newline only advances the line counter once the first
    /// character past it is read, so errors on a line boundary report the
    /// line that actually contains the problem.
    fn read_input(&mut self) -> Option<char> {
        if self.done {
            return None;
        }
        if self.newline {
            self.newline = false;
            self.line += 1;
            self.column = 0;
        }
        let c = self.input.next();
        self.column += 1;
        match c {
            Some('\n') => self.newline = true,
            None => self.done = true,
            Some(_) => {}
        }
        c
    }

    /// Takes the next character, skipping comment lines. A comment is a `#`
    /// in the first column and runs to the end of the line.
    fn get_char(&mut self) -> Option<char> {
        if let Some(c) = self.lookahead.take() {
            return c;
        }
        let mut c = self.read_input();
        while self.column == 1 && c == Some('#') {
            loop {
                c = self.read_input();
                if c == Some('\n') || c.is_none() {
                    break;
                }
            }
            if c == Some('\n') {
                c = self.read_input();
            }
        }
        c
    }

    fn peek_char(&mut self) -> Option<char> {
        let c = self.get_char();
        self.lookahead = Some(c);
        c
    }

    fn consume_space(&mut self) {
        while self.peek_char().is_some_and(char::is_whitespace) {
            self.get_char();
        }
    }

    /// Reads a string token, ignoring leading whitespace. A token is either
    /// a quoted run (any characters up to the matching quote) or a run of
    /// alphanumeric/underscore characters. Returns an empty string when the
    /// next character cannot start a token.
    fn read_str_token(&mut self) -> Result<String, ParseError> {
        self.consume_space();

        let mut quote = None;
        if let Some(c) = self.peek_char() {
            if c == '"' || c == '\'' {
                quote = Some(c);
                self.get_char();
            }
        }

        let mut token = String::new();
        let mut len = 0;
        while let Some(c) = self.peek_char() {
            match quote {
                Some(q) if c == q => {
                    self.get_char();
                    quote = None;
                    break;
                }
                Some(_) => {}
                None if !is_token_char(c) => break,
                None => {}
            }
            if len >= self.max_token_len {
                return Err(self.error(ParseErrorKind::TokenTooLong(self.max_token_len)));
            }
            token.push(self.get_char().unwrap_or_default());
            len += 1;
        }

        if let Some(q) = quote {
            return Err(self.error(ParseErrorKind::UnterminatedString { quote: q }));
        }
        Ok(token)
    }

    /// Whether the next non-whitespace character looks like the start of a
    /// string token.
    fn has_str_token(&mut self) -> bool {
        self.consume_space();
        matches!(self.peek_char(), Some(c) if c == '"' || c == '\'' || is_token_char(c))
    }

    fn match_str_token(&mut self) -> Result<String, ParseError> {
        let token = self.read_str_token()?;
        if token.is_empty() {
            let found = self.peek_char();
            return Err(self.error(ParseErrorKind::ExpectedToken { found }));
        }
        Ok(token)
    }

    /// Consumes the expected character, skipping leading whitespace.
    fn match_char(&mut self, expected: char) -> Result<(), ParseError> {
        self.consume_space();
        match self.peek_char() {
            Some(c) if c == expected => {
                self.get_char();
                Ok(())
            }
            found => Err(self.error(ParseErrorKind::ExpectedChar { expected, found })),
        }
    }

    /// Same as `match_char` but a mismatch is not an error and consumes
    /// nothing.
    fn match_optional_char(&mut self, optional: char) -> bool {
        self.consume_space();
        if self.peek_char() == Some(optional) {
            self.get_char();
            return true;
        }
        false
    }

    /// Reads a number: at least one digit, optionally a decimal point and
    /// fraction. Parsing ends at the first character that fits neither.
    fn read_number(&mut self) -> Result<f64, ParseError> {
        self.consume_space();

        match self.peek_char() {
            Some(c) if c.is_ascii_digit() => {}
            found => return Err(self.error(ParseErrorKind::ExpectedDigit { found })),
        }

        let mut buf = String::new();
        buf.push(self.get_char().unwrap_or_default());
        let mut found_decimal = false;
        while let Some(c) = self.peek_char() {
            if c.is_ascii_digit() || (c == '.' && !found_decimal) {
                if c == '.' {
                    found_decimal = true;
                }
                if buf.len() >= self.max_token_len {
                    return Err(self.error(ParseErrorKind::TokenTooLong(self.max_token_len)));
                }
                buf.push(self.get_char().unwrap_or_default());
            } else {
                break;
            }
        }

        Ok(buf.parse().unwrap_or(0.0))
    }

    /// matcher = <strtoken> ( <strtoken> )
    fn read_matcher(&mut self) -> Result<Matcher, ParseError> {
        let property = self.match_str_token()?;
        self.match_char('(')?;
        let value = self.match_str_token()?;
        self.match_char(')')?;
        Ok(Matcher { property, value })
    }

    /// matcher_list = <matcher>+
    fn read_matcher_list(&mut self) -> Result<Vec<Matcher>, ParseError> {
        let mut matchers = vec![self.read_matcher()?];
        while self.has_str_token() {
            matchers.push(self.read_matcher()?);
        }
        Ok(matchers)
    }

    /// rule_body = { ((focus|f|normal|n) : <number> ;)* }
    ///
    /// Parameter names are case-insensitive; settings not present keep the
    /// opaque default. Values are clamped into `[0, 1]`.
    fn read_rule_body(&mut self) -> Result<(f32, f32), ParseError> {
        let mut focus = Rule::DEFAULT_OPACITY;
        let mut normal = Rule::DEFAULT_OPACITY;

        self.match_char('{')?;
        while self.has_str_token() {
            let name = self.match_str_token()?;
            let setting = if name.eq_ignore_ascii_case("focus") || name.eq_ignore_ascii_case("f")
            {
                &mut focus
            } else if name.eq_ignore_ascii_case("normal") || name.eq_ignore_ascii_case("n") {
                &mut normal
            } else {
                return Err(self.error(ParseErrorKind::UnknownParameter(name)));
            };

            self.match_char(':')?;
            let value = self.read_number()?;
            self.match_char(';')?;

            *setting = (value as f32).clamp(0.0, 1.0);
        }
        self.match_char('}')?;

        Ok((focus, normal))
    }

    /// rule_list = (matcher_list (, matcher_list)* rule_body)*
    ///
    /// Every matcher group before a body becomes its own rule carrying that
    /// body's settings, so `a(1), b(2) { ... }` produces two rules.
    fn parse(mut self) -> Result<Vec<Rule>, ParseError> {
        let mut rules = Vec::new();
        while self.has_str_token() {
            let mut groups = vec![self.read_matcher_list()?];
            while self.match_optional_char(',') {
                groups.push(self.read_matcher_list()?);
            }
            let (focus_opacity, normal_opacity) = self.read_rule_body()?;

            for matchers in groups {
                tracing::debug!(
                    ?matchers,
                    focus_opacity,
                    normal_opacity,
                    "adding rule"
                );
                rules.push(Rule {
                    matchers,
                    focus_opacity,
                    normal_opacity,
                });
            }
        }
        Ok(rules)
    }
}
