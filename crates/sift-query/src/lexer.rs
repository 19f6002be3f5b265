//! Query lexer (tokenizer).
//!
//! Converts a query string into a stream of tokens for the parser.

use std::{iter::Peekable, ops::Range, str::Chars};

use crate::error::LexError;

/// A token in the query language.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A bare word (search term).
    Term(String),

    /// A quoted phrase (the quotes are stripped, content preserved).
    Phrase(String),

    /// Required prefix (+).
    Required,

    /// Prohibited prefix (-).
    Prohibited,

    /// Opening brace of a synonym group.
    LBrace,

    /// Closing brace of a synonym group.
    RBrace,

    /// Field prefix (e.g., "title:" produces FieldPrefix("title")).
    FieldPrefix(String),

    /// Weight operator with factor (e.g., "^0.5" produces Weight(0.5)).
    Weight(f64),

    /// Proximity window of a phrase (e.g., "~8" produces Window(8)).
    Window(u32),
}

/// A token with the byte range it was read from.
pub(crate) type Spanned = (Token, Range<usize>);

/// Tokenizes a query string.
struct Lexer<'a> {
    /// The original input string.
    input: &'a str,
    /// Character iterator with one-character lookahead.
    chars: Peekable<Chars<'a>>,
    /// Current byte position in input.
    position: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.chars().peekable(),
            position: 0,
        }
    }

    /// Creates an error spanning from `position` to the current position.
    fn error_at(&self, message: impl Into<String>, position: usize) -> LexError {
        LexError::new(message, position..self.position, self.input)
    }

    /// Returns the input consumed since byte `start`.
    fn consumed_since(&self, start: usize) -> &'a str {
        self.input.get(start..self.position).unwrap_or_default()
    }

    /// Tokenizes the entire input, returning all tokens with their positions.
    fn tokenize(mut self) -> Result<Vec<Spanned>, LexError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace();
            if self.chars.peek().is_none() {
                break;
            }
            let start = self.position;
            // A stray colon yields no token but still consumes input
            if let Some(token) = self.next_token()? {
                tokens.push((token, start..self.position));
            }
        }

        Ok(tokens)
    }

    /// Returns the next token, or None if at end of input.
    fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        let Some(&ch) = self.chars.peek() else {
            return Ok(None);
        };

        match ch {
            '"' => self.read_phrase(),
            '{' => {
                self.advance();
                Ok(Some(Token::LBrace))
            }
            '}' => {
                self.advance();
                Ok(Some(Token::RBrace))
            }
            '+' => {
                self.advance();
                Ok(Some(Token::Required))
            }
            '-' => {
                self.advance();
                Ok(Some(Token::Prohibited))
            }
            '^' => self.read_weight(),
            '~' => self.read_window(),
            _ => self.read_term(),
        }
    }

    /// Reads a quoted phrase.
    fn read_phrase(&mut self) -> Result<Option<Token>, LexError> {
        let start_pos = self.position;
        self.advance(); // consume opening quote

        let mut content = String::new();

        loop {
            match self.chars.peek() {
                Some(&'"') => {
                    self.advance(); // consume closing quote
                    return Ok(Some(Token::Phrase(content)));
                }
                Some(&ch) => {
                    content.push(ch);
                    self.advance();
                }
                None => {
                    return Err(self.error_at("unclosed quote", start_pos));
                }
            }
        }
    }

    /// Reads a term or a field prefix.
    fn read_term(&mut self) -> Result<Option<Token>, LexError> {
        let mut word = String::new();

        while let Some(&ch) = self.chars.peek() {
            if ch.is_whitespace() || matches!(ch, '{' | '}' | '"' | '^' | '~') {
                break;
            }

            // Check for field prefix (word ending in colon)
            if ch == ':' {
                self.advance(); // consume the colon
                if word.is_empty() {
                    // Bare colon, treat as part of next term
                    continue;
                }
                return Ok(Some(Token::FieldPrefix(word)));
            }

            word.push(ch);
            self.advance();
        }

        if word.is_empty() {
            return Ok(None);
        }

        Ok(Some(Token::Term(word)))
    }

    /// Reads a weight operator (^N or ^N.N).
    fn read_weight(&mut self) -> Result<Option<Token>, LexError> {
        let start_pos = self.position;
        self.advance(); // consume '^'

        let number = self.read_number(true);
        if number.is_empty() {
            self.skip_run();
            return Err(self.error_at("expected number after '^'", start_pos));
        }

        let weight = number.parse::<f64>().ok();
        match weight {
            Some(weight) if self.at_boundary(&['}']) => Ok(Some(Token::Weight(weight))),
            _ => {
                self.skip_run();
                let text = self.consumed_since(start_pos + 1);
                Err(self.error_at(format!("invalid weight: {text}"), start_pos))
            }
        }
    }

    /// Reads a proximity window (~N).
    fn read_window(&mut self) -> Result<Option<Token>, LexError> {
        let start_pos = self.position;
        self.advance(); // consume '~'

        let number = self.read_number(false);
        if number.is_empty() {
            self.skip_run();
            return Err(self.error_at("expected window size after '~'", start_pos));
        }

        let size = number.parse::<u32>().ok();
        match size {
            Some(size) if self.at_boundary(&['}', '^']) => Ok(Some(Token::Window(size))),
            _ => {
                self.skip_run();
                let text = self.consumed_since(start_pos + 1);
                Err(self.error_at(format!("invalid window size: {text}"), start_pos))
            }
        }
    }

    /// Reads digits and, if allowed, a single decimal point.
    fn read_number(&mut self, allow_decimal: bool) -> String {
        let mut number = String::new();
        while let Some(&ch) = self.chars.peek() {
            if ch.is_ascii_digit() || (allow_decimal && ch == '.' && !number.contains('.')) {
                number.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        number
    }

    /// Returns true at end of input, at whitespace, or before one of `allowed`.
    fn at_boundary(&mut self, allowed: &[char]) -> bool {
        self.chars
            .peek()
            .is_none_or(|ch| ch.is_whitespace() || allowed.contains(ch))
    }

    /// Consumes the rest of a malformed token, up to whitespace or `}`.
    fn skip_run(&mut self) {
        while let Some(&ch) = self.chars.peek() {
            if ch.is_whitespace() || ch == '}' {
                break;
            }
            self.advance();
        }
    }

    /// Skips whitespace characters.
    fn skip_whitespace(&mut self) {
        while let Some(&ch) = self.chars.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Advances to the next character.
    fn advance(&mut self) {
        if let Some(ch) = self.chars.next() {
            self.position += ch.len_utf8();
        }
    }
}

/// Tokenizes a query string, keeping the byte position of every token.
pub(crate) fn tokenize_spanned(input: &str) -> Result<Vec<Spanned>, LexError> {
    Lexer::new(input).tokenize()
}

/// Convenience function to tokenize a query string.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    Ok(tokenize_spanned(input)?
        .into_iter()
        .map(|(token, _)| token)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(s: &str) -> Token {
        Token::Term(s.into())
    }

    #[test]
    fn empty_input() {
        assert_eq!(tokenize("").unwrap(), vec![]);
        assert_eq!(tokenize("   ").unwrap(), vec![]);
    }

    #[test]
    fn multiple_terms() {
        assert_eq!(
            tokenize("zebra crossing").unwrap(),
            vec![term("zebra"), term("crossing")]
        );
    }

    #[test]
    fn weights() {
        assert_eq!(
            tokenize("zebra^0.1 crossing^2").unwrap(),
            vec![
                term("zebra"),
                Token::Weight(0.1),
                term("crossing"),
                Token::Weight(2.0)
            ]
        );
    }

    #[test]
    fn weight_missing_number() {
        let err = tokenize("zebra^").unwrap_err();
        assert!(err.message.contains("expected number"));
        assert_eq!(err.position, 5);
    }

    #[test]
    fn weight_invalid_number() {
        let err = tokenize("zebra^abc").unwrap_err();
        assert!(err.message.contains("expected number"));
    }

    #[test]
    fn weight_lone_dot() {
        let err = tokenize("zebra^.").unwrap_err();
        assert!(err.message.contains("invalid weight"));
    }

    #[test]
    fn requirement_prefixes() {
        assert_eq!(
            tokenize("+zebra -crossing").unwrap(),
            vec![
                Token::Required,
                term("zebra"),
                Token::Prohibited,
                term("crossing")
            ]
        );
    }

    #[test]
    fn hyphen_inside_term() {
        assert_eq!(tokenize("x-ray").unwrap(), vec![term("x-ray")]);
    }

    #[test]
    fn field_prefix() {
        assert_eq!(
            tokenize("title:zebra").unwrap(),
            vec![Token::FieldPrefix("title".into()), term("zebra")]
        );
    }

    #[test]
    fn stray_colon_is_skipped() {
        assert_eq!(tokenize("a : b").unwrap(), vec![term("a"), term("b")]);
    }

    #[test]
    fn synonym_braces() {
        assert_eq!(
            tokenize("{term1 term2}").unwrap(),
            vec![Token::LBrace, term("term1"), term("term2"), Token::RBrace]
        );
    }

    #[test]
    fn quoted_phrase_with_window() {
        assert_eq!(
            tokenize("\"zebra crossing\"~5").unwrap(),
            vec![Token::Phrase("zebra crossing".into()), Token::Window(5)]
        );
    }

    #[test]
    fn window_requires_integer() {
        let err = tokenize("\"a b\"~").unwrap_err();
        assert!(err.message.contains("window size"));
    }

    #[test]
    fn weight_must_end_the_token() {
        for (input, fragment) in [
            ("zebra^0.5x", "^0.5x"),
            ("zebra^1.2.3", "^1.2.3"),
            ("zebra^2abc crossing", "^2abc"),
        ] {
            let err = tokenize(input).unwrap_err();
            assert!(err.message.contains("invalid weight"), "{input}");
            assert_eq!(err.position, 5, "{input}");
            assert_eq!(err.input.get(err.position..err.end), Some(fragment), "{input}");
        }
    }

    #[test]
    fn weight_followed_by_brace_or_space() {
        assert_eq!(
            tokenize("a^2 b^3}").unwrap(),
            vec![
                term("a"),
                Token::Weight(2.0),
                term("b"),
                Token::Weight(3.0),
                Token::RBrace
            ]
        );
    }

    #[test]
    fn window_must_end_the_token() {
        let err = tokenize("\"a b\"~3x").unwrap_err();
        assert!(err.message.contains("invalid window size"));
        assert_eq!(err.position, 5);
        assert_eq!(err.end, 8);
    }

    #[test]
    fn window_then_weight() {
        assert_eq!(
            tokenize("\"a b\"~3^2").unwrap(),
            vec![Token::Phrase("a b".into()), Token::Window(3), Token::Weight(2.0)]
        );
    }

    #[test]
    fn unclosed_quote_error() {
        let err = tokenize("\"hello world").unwrap_err();
        assert_eq!(err.position, 0);
        assert!(err.message.contains("unclosed"));
    }

    #[test]
    fn spans_are_byte_positions() {
        let spanned = tokenize_spanned("  zébra +b^2").unwrap();
        let spans: Vec<Range<usize>> = spanned.into_iter().map(|(_, span)| span).collect();
        assert_eq!(spans, vec![2..8, 9..10, 10..11, 11..13]);
    }
}
