//! Query parser.
//!
//! Parses a token stream into a query chain using recursive descent.
//!
//! # Grammar
//!
//! ```text
//! query   → clause*
//! clause  → ("+" | "-")? primary weight?
//! primary → FIELD_PREFIX atom | atom
//! atom    → TERM | PHRASE window? | "{" TERM* "}"
//! weight  → "^" NUMBER
//! window  → "~" INTEGER
//! ```
//!
//! A quoted phrase of a single word without a window is a plain term.

use std::mem;

use crate::{
    ast::{Clause, DEFAULT_WEIGHT, Query},
    error::{ParseError, QueryError},
    lexer::{Spanned, Token, tokenize_spanned},
};

/// Recursive descent parser for query chains.
struct Parser<'a> {
    /// The original input, for error fragments.
    input: &'a str,
    /// Token stream with byte positions.
    tokens: Vec<Spanned>,
    /// Current position in token stream.
    position: usize,
}

impl<'a> Parser<'a> {
    /// Creates a new parser from a token stream.
    fn new(input: &'a str, tokens: Vec<Spanned>) -> Self {
        Self {
            input,
            tokens,
            position: 0,
        }
    }

    /// Parses the token stream into a query chain.
    fn parse(mut self) -> Result<Query, ParseError> {
        let mut query = Query::new();
        while self.peek().is_some() {
            query.push(self.parse_clause()?);
        }
        Ok(query)
    }

    /// Parses: clause → ("+" | "-")? primary weight?
    fn parse_clause(&mut self) -> Result<Clause, ParseError> {
        let required = match self.peek() {
            Some(Token::Required) => Some(true),
            Some(Token::Prohibited) => Some(false),
            _ => None,
        };
        if required.is_some() {
            self.advance();
        }

        let clause = self.parse_primary()?;
        let clause = self.maybe_apply_weight(clause);

        Ok(match required {
            Some(required) => Clause::required(clause, required),
            None => clause,
        })
    }

    /// Parses: primary → FIELD_PREFIX atom | atom
    fn parse_primary(&mut self) -> Result<Clause, ParseError> {
        if let Some(Token::FieldPrefix(name)) = self.peek().cloned() {
            self.advance();
            if !self.can_start_atom() {
                return Err(self.error(format!(
                    "expected term, phrase or synonym group after '{name}:'"
                )));
            }
            let atom = self.parse_atom()?;
            return Ok(Clause::field(name, atom));
        }
        self.parse_atom()
    }

    /// Parses: atom → TERM | PHRASE window? | "{" TERM* "}"
    fn parse_atom(&mut self) -> Result<Clause, ParseError> {
        match self.peek().cloned() {
            Some(Token::Term(text)) => {
                self.advance();
                Ok(Clause::term(text))
            }
            Some(Token::Phrase(text)) => self.parse_phrase(&text),
            Some(Token::LBrace) => self.parse_synonym(),
            Some(Token::RBrace) => Err(self.error("unexpected '}' without opening brace")),
            Some(Token::Required | Token::Prohibited) => {
                Err(self.error("expected term after requirement prefix"))
            }
            Some(Token::Weight(_)) => {
                Err(self.error("unexpected weight (needs a term before it)"))
            }
            Some(Token::Window(_)) => {
                Err(self.error("unexpected window (only phrases take '~N')"))
            }
            Some(Token::FieldPrefix(name)) => {
                Err(self.error(format!("unexpected field prefix '{name}:'")))
            }
            None => Err(self.error("unexpected end of query")),
        }
    }

    /// Parses a quoted phrase and its optional window.
    fn parse_phrase(&mut self, text: &str) -> Result<Clause, ParseError> {
        let words: Vec<String> = text.split_whitespace().map(String::from).collect();
        if words.is_empty() {
            return Err(self.error("empty phrase"));
        }
        self.advance();

        let window = match self.peek() {
            Some(Token::Window(size)) => Some(*size),
            _ => None,
        };
        if window.is_some() {
            self.advance();
        }

        if window.is_none() && words.len() == 1 {
            return Ok(Clause::term(words.concat()));
        }
        Ok(Clause::Phrase {
            terms: words,
            window,
            weight: DEFAULT_WEIGHT,
        })
    }

    /// Parses a brace-delimited synonym group, consuming both braces.
    fn parse_synonym(&mut self) -> Result<Clause, ParseError> {
        let open = self.position;
        self.advance(); // consume {

        let mut terms = Vec::new();
        while let Some(Token::Term(text)) = self.peek().cloned() {
            terms.push(text);
            self.advance();
        }

        if !self.check(&Token::RBrace) {
            let last = self.position.saturating_sub(1).max(open);
            return Err(self.error_over_tokens(open, last, "expected closing brace"));
        }
        if terms.is_empty() {
            return Err(self.error_over_tokens(open, self.position, "empty synonym group"));
        }
        self.advance(); // consume }

        Ok(Clause::synonym(terms))
    }

    /// Checks if the current token can start an atom.
    fn can_start_atom(&self) -> bool {
        matches!(
            self.peek(),
            Some(Token::Term(_) | Token::Phrase(_) | Token::LBrace)
        )
    }

    /// Checks if the current token is a weight and applies it if so.
    fn maybe_apply_weight(&mut self, clause: Clause) -> Clause {
        if let Some(Token::Weight(factor)) = self.peek().cloned() {
            self.advance();
            clause.with_weight(factor)
        } else {
            clause
        }
    }

    /// Creates an error at the current token.
    fn error(&self, message: impl Into<String>) -> ParseError {
        self.error_at_token(self.position, message)
    }

    /// Creates an error at the token with index `index`.
    ///
    /// Past the last token, the error points at the end of the input.
    fn error_at_token(&self, index: usize, message: impl Into<String>) -> ParseError {
        self.error_over_tokens(index, index, message)
    }

    /// Creates an error covering tokens `first` through `last`.
    fn error_over_tokens(
        &self,
        first: usize,
        last: usize,
        message: impl Into<String>,
    ) -> ParseError {
        let Some((_, span)) = self.tokens.get(first) else {
            return ParseError::new(message, Some(self.input.len()), None);
        };
        let end = self.tokens.get(last).map_or(span.end, |(_, last)| last.end);
        ParseError::new(
            message,
            Some(span.start),
            self.input.get(span.start..end).map(str::to_string),
        )
    }

    /// Returns the current token without consuming it.
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position).map(|(token, _)| token)
    }

    /// Checks if the current token matches the given token.
    fn check(&self, token: &Token) -> bool {
        self.peek()
            .is_some_and(|t| mem::discriminant(t) == mem::discriminant(token))
    }

    /// Advances to the next token.
    fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }
}

/// Parses a query string into a chain of clauses.
///
/// Empty and whitespace-only input parses to an empty [`Query`].
pub fn parse(input: &str) -> Result<Query, QueryError> {
    let tokens = tokenize_spanned(input).map_err(QueryError::from)?;
    Parser::new(input, tokens)
        .parse()
        .map_err(|err| QueryError::from(err).with_query(input))
}
