//! Narsese parser
//!
//! Parses the Narsese surface syntax into tasks:
//!
//! - statements `<subj copula pred>` with copula `-->`, `<->`, `==>`, `<=>`
//! - compounds `(op, c1, ..., cn)` with op `&&`, `*`, `&`, `|`, `-`, `~`, `--`
//! - punctuation `.` belief, `!` goal, `?` question
//! - truth suffix `%f;c%` or `%f c%`
//! - variables `$x`, `#x`, `?x`
//!
//! The canonical `Display` form of every term parses back to the same
//! interned term.

use crate::stamp::OccurrenceTime;
use crate::task::{Punctuation, Task, TaskBuilder, TaskError};
use crate::term::{Op, Term, TermError, TermFactory, VarKind};
use crate::truth::Truth;
use thiserror::Error;

/// Parse failures, positioned where possible.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("unexpected character '{0}' at position {1}")]
    UnexpectedChar(char, usize),
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("empty input")]
    Empty,
    #[error("trailing input at position {0}")]
    Trailing(usize),
    #[error("invalid truth value: {0}")]
    InvalidTruth(String),
    #[error("missing punctuation")]
    MissingPunctuation,
    #[error("questions cannot carry a truth value")]
    TruthOnQuestion,
    #[error("invalid term: {0}")]
    Term(#[from] TermError),
}

impl From<TaskError> for ParseError {
    fn from(e: TaskError) -> Self {
        match e {
            TaskError::UnexpectedTruth => ParseError::TruthOnQuestion,
            other => ParseError::InvalidTruth(other.to_string()),
        }
    }
}

/// Parse a full Narsese sentence into a task.
pub fn parse_task(input: &str, factory: &TermFactory, now: i64) -> Result<Task, ParseError> {
    let mut p = Parser::new(input, factory);
    p.skip_ws();
    if p.at_end() {
        return Err(ParseError::Empty);
    }
    let term = p.parse_term()?;
    p.skip_ws();

    let punct_char = p.next_char().ok_or(ParseError::MissingPunctuation)?;
    let punctuation =
        Punctuation::from_symbol(punct_char).ok_or(ParseError::UnexpectedChar(punct_char, p.pos - 1))?;
    p.skip_ws();

    let truth = if p.peek() == Some('%') {
        Some(p.parse_truth()?)
    } else {
        None
    };
    p.skip_ws();
    if !p.at_end() {
        return Err(ParseError::Trailing(p.pos));
    }

    if punctuation == Punctuation::Question && truth.is_some() {
        return Err(ParseError::TruthOnQuestion);
    }
    let mut builder = TaskBuilder::new()
        .term(term)
        .punctuation(punctuation)
        .occurrence(OccurrenceTime::Eternal)
        .creation_time(now);
    if punctuation.needs_truth() {
        builder = builder.truth(truth.unwrap_or_else(Truth::default_judgment));
    }
    Ok(builder.build()?)
}

/// Parse a bare term, requiring the whole input to be consumed.
pub fn parse_term(input: &str, factory: &TermFactory) -> Result<Term, ParseError> {
    let mut p = Parser::new(input, factory);
    p.skip_ws();
    if p.at_end() {
        return Err(ParseError::Empty);
    }
    let term = p.parse_term()?;
    p.skip_ws();
    if !p.at_end() {
        return Err(ParseError::Trailing(p.pos));
    }
    Ok(term)
}

struct Parser<'a> {
    chars: Vec<char>,
    pos: usize,
    factory: &'a TermFactory,
}

impl<'a> Parser<'a> {
    fn new(input: &str, factory: &'a TermFactory) -> Self {
        Parser {
            chars: input.chars().collect(),
            pos: 0,
            factory,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn next_char(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), ParseError> {
        match self.next_char() {
            Some(c) if c == expected => Ok(()),
            Some(c) => Err(ParseError::UnexpectedChar(c, self.pos - 1)),
            None => Err(ParseError::UnexpectedEnd),
        }
    }

    fn parse_term(&mut self) -> Result<Term, ParseError> {
        self.skip_ws();
        match self.peek() {
            Some('<') => self.parse_statement(),
            Some('(') => self.parse_compound(),
            Some(c) if VarKind::from_prefix(c).is_some() => self.parse_variable(),
            Some(c) if is_atom_char(c) => self.parse_atom(),
            Some(c) => Err(ParseError::UnexpectedChar(c, self.pos)),
            None => Err(ParseError::UnexpectedEnd),
        }
    }

    fn parse_statement(&mut self) -> Result<Term, ParseError> {
        self.expect('<')?;
        let subject = self.parse_term()?;
        self.skip_ws();
        let copula = self.parse_copula()?;
        let predicate = self.parse_term()?;
        self.skip_ws();
        self.expect('>')?;
        Ok(self.factory.statement(copula, subject, predicate)?)
    }

    fn parse_copula(&mut self) -> Result<Op, ParseError> {
        for symbol in ["-->", "<->", "==>", "<=>"] {
            if self.matches(symbol) {
                self.pos += symbol.len();
                return Op::from_symbol(symbol).ok_or(ParseError::UnexpectedEnd);
            }
        }
        match self.peek() {
            Some(c) => Err(ParseError::UnexpectedChar(c, self.pos)),
            None => Err(ParseError::UnexpectedEnd),
        }
    }

    fn parse_compound(&mut self) -> Result<Term, ParseError> {
        self.expect('(')?;
        self.skip_ws();
        let op = self.parse_operator()?;
        let mut components = Vec::new();
        loop {
            self.skip_ws();
            match self.peek() {
                Some(',') => {
                    self.pos += 1;
                    components.push(self.parse_term()?);
                }
                Some(')') => {
                    self.pos += 1;
                    break;
                }
                Some(c) => return Err(ParseError::UnexpectedChar(c, self.pos)),
                None => return Err(ParseError::UnexpectedEnd),
            }
        }
        Ok(self.factory.compound(op, components)?)
    }

    fn parse_operator(&mut self) -> Result<Op, ParseError> {
        // Longest symbols first so `-->` beats `--` beats `-`, and `&&`
        // beats `&`. Copulas are accepted here too: `(==>, p, q)` is the
        // prefix form of `<p ==> q>`.
        for symbol in [
            "-->", "<->", "==>", "<=>", "&&", "--", "*", "&", "|", "-", "~",
        ] {
            if self.matches(symbol) {
                self.pos += symbol.len();
                return Op::from_symbol(symbol).ok_or(ParseError::UnexpectedEnd);
            }
        }
        match self.peek() {
            Some(c) => Err(ParseError::UnexpectedChar(c, self.pos)),
            None => Err(ParseError::UnexpectedEnd),
        }
    }

    fn parse_variable(&mut self) -> Result<Term, ParseError> {
        let prefix = self.next_char().ok_or(ParseError::UnexpectedEnd)?;
        let kind = VarKind::from_prefix(prefix).expect("checked by caller");
        let name = self.read_ident();
        if name.is_empty() {
            return Err(ParseError::UnexpectedChar(prefix, self.pos - 1));
        }
        Ok(self.factory.variable(kind, &name))
    }

    fn parse_atom(&mut self) -> Result<Term, ParseError> {
        let name = self.read_ident();
        if name.is_empty() {
            match self.peek() {
                Some(c) => return Err(ParseError::UnexpectedChar(c, self.pos)),
                None => return Err(ParseError::UnexpectedEnd),
            }
        }
        Ok(self.factory.atom(&name))
    }

    fn read_ident(&mut self) -> String {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if is_atom_char(c)) {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    fn parse_truth(&mut self) -> Result<Truth, ParseError> {
        self.expect('%')?;
        let start = self.pos;
        while !matches!(self.peek(), Some('%') | None) {
            self.pos += 1;
        }
        let body: String = self.chars[start..self.pos].iter().collect();
        self.expect('%')?;

        let parts: Vec<&str> = body
            .split(|c| c == ';' || c == ' ')
            .filter(|s| !s.is_empty())
            .collect();
        let (f, c) = match parts.as_slice() {
            [f] => (parse_component(f, &body)?, 0.9),
            [f, c] => (parse_component(f, &body)?, parse_component(c, &body)?),
            _ => return Err(ParseError::InvalidTruth(body)),
        };
        if !(0.0..=1.0).contains(&f) || !(0.0..=1.0).contains(&c) {
            return Err(ParseError::InvalidTruth(body));
        }
        Ok(Truth::new(f, c))
    }

    fn matches(&self, symbol: &str) -> bool {
        symbol
            .chars()
            .enumerate()
            .all(|(i, c)| self.chars.get(self.pos + i) == Some(&c))
    }
}

fn is_atom_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn parse_component(s: &str, body: &str) -> Result<f32, ParseError> {
    s.parse::<f32>()
        .map_err(|_| ParseError::InvalidTruth(body.to_string()))
}
