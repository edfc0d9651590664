//! Filter string parser
//!
//! Grammar, informally:
//!
//! ```text
//! filter  := token (WS token)*
//! token   := ["-"] field ":" value
//! field   := [A-Za-z0-9_] ([A-Za-z0-9_-]* [A-Za-z0-9_])?
//! value   := '"' any-but-quote* '"' | non-ws-chars ("," non-ws-chars)*
//! ```
//!
//! Parsing never fails. Tokens that do not fit the grammar are skipped.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// One `field:value[,value...]` constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterClause {
    /// Lowercased field name
    pub field: String,
    pub negated: bool,
    /// Lowercased, deduplicated, in first-seen order
    pub values: Vec<String>,
}

/// Parsed filter: clauses in first-seen order, one per (field, negated) pair
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSet {
    clauses: Vec<FilterClause>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn clauses(&self) -> &[FilterClause] {
        &self.clauses
    }

    /// Clause for `field` with the given polarity
    pub fn get(&self, field: &str, negated: bool) -> Option<&FilterClause> {
        let field = field.to_lowercase();
        self.clauses
            .iter()
            .find(|c| c.field == field && c.negated == negated)
    }

    /// Add values to the (field, negated) clause, creating it if needed
    pub fn push<I, S>(&mut self, field: &str, negated: bool, values: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let field = field.to_lowercase();
        let values: Vec<String> = values
            .into_iter()
            .map(|v| v.as_ref().trim().to_lowercase())
            .filter(|v| !v.is_empty())
            .collect();
        if values.is_empty() {
            return;
        }

        let index = match self
            .clauses
            .iter()
            .position(|c| c.field == field && c.negated == negated)
        {
            Some(index) => index,
            None => {
                self.clauses.push(FilterClause {
                    field,
                    negated,
                    values: Vec::new(),
                });
                self.clauses.len() - 1
            }
        };

        let clause = &mut self.clauses[index];
        for value in values {
            if !clause.values.contains(&value) {
                clause.values.push(value);
            }
        }
    }
}

/// Parse a filter string such as `status:"In Progress" -label:wontfix`
pub fn parse_filter(input: &str) -> FilterSet {
    let mut set = FilterSet::new();

    for token in tokenize(input) {
        match parse_token(&token) {
            Some((field, negated, values)) => set.push(field, negated, values),
            None => debug!(token = %token.text, "Skipping malformed filter token"),
        }
    }

    set
}

/// Whitespace-delimited token; `quoted` marks values that were quoted
#[derive(Debug)]
struct Token {
    text: String,
    quoted: bool,
}

fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        let mut text = String::new();
        let mut quoted = false;
        while let Some(&c) = chars.peek() {
            if c.is_whitespace() {
                break;
            }
            chars.next();
            if c == '"' {
                quoted = true;
                // Quoted section runs to the closing quote or end of input
                for inner in chars.by_ref() {
                    if inner == '"' {
                        break;
                    }
                    text.push(inner);
                }
            } else {
                text.push(c);
            }
        }
        tokens.push(Token { text, quoted });
    }

    tokens
}

fn parse_token(token: &Token) -> Option<(&str, bool, Vec<&str>)> {
    let (negated, body) = match token.text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token.text.as_str()),
    };

    let (field, value) = body.split_once(':')?;
    if !is_valid_field(field) {
        return None;
    }

    let values: Vec<&str> = if token.quoted {
        vec![value.trim()]
    } else {
        value
            .split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .collect()
    };
    if values.iter().all(|v| v.is_empty()) {
        return None;
    }

    Some((field, negated, values))
}

fn is_valid_field(field: &str) -> bool {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    !field.is_empty()
        && field.chars().all(|c| is_word(c) || c == '-')
        && field.chars().next().is_some_and(is_word)
        && field.chars().last().is_some_and(is_word)
}
