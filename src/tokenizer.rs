//! The lexer splits raw configuration text into tokens and owns every
//! character class decision: whitespace, comment starts, quoting, escapes and
//! the reserved punctuation sets. Key position and value position have
//! different priorities, so the tokenizer exposes two entry points,
//! [`Tokenizer::pull_next`] and [`Tokenizer::pull_value`], plus a family of
//! lookahead predicates that never consume input.

use crate::error::{Error, Result};

/// Characters that terminate an unquoted key. The set includes the dot so
/// that dotted paths lex as separate key tokens.
const NOT_IN_UNQUOTED_KEY: &str = "$\"{}[]:=+,#`^?!@*&\\.";

/// Characters that terminate an unquoted value. Unlike keys, values may
/// contain dots.
const NOT_IN_UNQUOTED_TEXT: &str = "$\"{}[]:=+,#`^?!@*&\\";

const INCLUDE_KEYWORD: &str = "include";

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Token {
    Key(String),
    Literal(String),
    Assign,
    PlusAssign,
    ObjectStart,
    ObjectEnd,
    ArrayStart,
    ArrayEnd,
    Dot,
    Comma,
    Include(String),
    Substitution { path: String, optional: bool },
    Eof,
}

impl Token {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Token::Key(_) => "key",
            Token::Literal(_) => "literal",
            Token::Assign => "assignment",
            Token::PlusAssign => "plus assignment",
            Token::ObjectStart => "object start",
            Token::ObjectEnd => "object end",
            Token::ArrayStart => "array start",
            Token::ArrayEnd => "array end",
            Token::Dot => "dot",
            Token::Comma => "comma",
            Token::Include(_) => "include",
            Token::Substitution { .. } => "substitution",
            Token::Eof => "end of input",
        }
    }
}

/// Similar to the Lightbend implementation, the whitespace set extends the
/// Unicode space separators with the BOM, which is accepted as a zero width
/// non breaking space.
fn is_whitespace_char(c: char) -> bool {
    matches!(
        c,
        ' ' | '\t'
            | '\n'
            | '\r'
            | '\u{000B}'
            | '\u{000C}'
            | '\u{00A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{2060}'
            | '\u{3000}'
            | '\u{FEFF}'
    )
}

/// Character cursor over the input text. The `checkpoint`/`reset` pair gives
/// the bounded lookahead needed to decide whether `include` starts a
/// directive or is just an unquoted key; a failed lookahead rolls the cursor
/// back fully.
#[derive(Debug)]
pub(crate) struct Tokenizer<'a> {
    text: &'a str,
    index: usize,
}

impl<'a> Tokenizer<'a> {
    pub(crate) fn new(text: &'a str) -> Tokenizer<'a> {
        Tokenizer { text, index: 0 }
    }

    pub(crate) fn eof(&self) -> bool {
        self.index >= self.text.len()
    }

    fn checkpoint(&self) -> usize {
        self.index
    }

    fn reset(&mut self, checkpoint: usize) {
        self.index = checkpoint;
    }

    fn rest(&self) -> &'a str {
        &self.text[self.index..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn matches(&self, pattern: &str) -> bool {
        self.rest().starts_with(pattern)
    }

    fn take_one(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.index += c.len_utf8();
        Some(c)
    }

    /// Advance over `len` bytes. Only called after a `matches` check against
    /// an ASCII pattern of the same length, so the cursor stays on a char
    /// boundary.
    fn take(&mut self, len: usize) {
        self.index = (self.index + len).min(self.text.len());
    }

    fn pull_whitespace(&mut self) {
        while self.peek().map(is_whitespace_char).unwrap_or(false) {
            self.take_one();
        }
    }

    fn pull_rest_of_line(&mut self) {
        while let Some(c) = self.take_one() {
            if c == '\n' {
                break;
            }
        }
    }

    pub(crate) fn pull_whitespace_and_comments(&mut self) {
        loop {
            self.pull_whitespace();
            while self.is_start_of_comment() {
                self.pull_rest_of_line();
            }
            if !self.is_whitespace() {
                break;
            }
        }
    }

    pub(crate) fn is_whitespace(&self) -> bool {
        self.peek().map(is_whitespace_char).unwrap_or(false)
    }

    pub(crate) fn is_start_of_comment(&self) -> bool {
        self.matches("#") || self.matches("//")
    }

    pub(crate) fn is_dot(&self) -> bool {
        self.matches(".")
    }

    pub(crate) fn is_object_start(&self) -> bool {
        self.matches("{")
    }

    pub(crate) fn is_object_end(&self) -> bool {
        self.matches("}")
    }

    pub(crate) fn is_array_start(&self) -> bool {
        self.matches("[")
    }

    pub(crate) fn is_array_end(&self) -> bool {
        self.matches("]")
    }

    pub(crate) fn is_assignment(&self) -> bool {
        self.matches("=") || self.matches(":")
    }

    pub(crate) fn is_plus_assignment(&self) -> bool {
        self.matches("+=")
    }

    pub(crate) fn is_comma(&self) -> bool {
        self.matches(",")
    }

    pub(crate) fn is_newline(&self) -> bool {
        self.matches("\n") || self.matches("\r\n")
    }

    pub(crate) fn pull_newline(&mut self) {
        if self.matches("\r\n") {
            self.take(2);
        } else if self.matches("\n") {
            self.take(1);
        }
    }

    pub(crate) fn pull_comma(&mut self) {
        if self.is_comma() {
            self.take(1);
        }
    }

    pub(crate) fn pull_array_end(&mut self) {
        if self.is_array_end() {
            self.take(1);
        }
    }

    pub(crate) fn is_start_of_quoted_text(&self) -> bool {
        self.matches("\"")
    }

    pub(crate) fn is_start_of_triple_quoted_text(&self) -> bool {
        self.matches("\"\"\"")
    }

    pub(crate) fn is_substitution_start(&self) -> bool {
        self.matches("${")
    }

    pub(crate) fn is_space_or_tab(&self) -> bool {
        self.matches(" ") || self.matches("\t")
    }

    fn in_set(&self, set: &str) -> bool {
        self.peek().map(|c| set.contains(c)).unwrap_or(false)
    }

    pub(crate) fn is_unquoted_key_start(&self) -> bool {
        !self.eof() && !self.is_whitespace() && !self.is_start_of_comment() && !self.in_set(NOT_IN_UNQUOTED_KEY)
    }

    /// Continuation test for an unquoted key. Interior whitespace is allowed
    /// and trimmed from the ends afterwards.
    fn is_unquoted_key(&self) -> bool {
        !self.eof() && !self.is_start_of_comment() && !self.in_set(NOT_IN_UNQUOTED_KEY)
    }

    pub(crate) fn is_unquoted_text(&self) -> bool {
        !self.eof() && !self.is_whitespace() && !self.is_start_of_comment() && !self.in_set(NOT_IN_UNQUOTED_TEXT)
    }

    pub(crate) fn is_value_start(&self) -> bool {
        self.is_array_start()
            || self.is_object_start()
            || self.is_start_of_triple_quoted_text()
            || self.is_substitution_start()
            || self.is_start_of_quoted_text()
            || self.is_unquoted_text()
    }

    /// `include` only counts as a directive when the word is followed by
    /// whitespace or comments and then a quoted string. The lookahead pulls
    /// the whole candidate and rolls back whatever the outcome.
    pub(crate) fn is_include(&mut self) -> bool {
        let checkpoint = self.checkpoint();
        let mut found = false;
        if self.matches(INCLUDE_KEYWORD) {
            self.take(INCLUDE_KEYWORD.len());
            if self.is_whitespace() || self.is_start_of_comment() {
                self.pull_whitespace_and_comments();
                if self.is_start_of_quoted_text() {
                    found = self.pull_quoted_run().is_ok();
                }
            }
        }
        self.reset(checkpoint);
        found
    }

    /// Key position tokens, in a fixed priority order. Whitespace and
    /// comment runs are discarded first.
    pub(crate) fn pull_next(&mut self) -> Result<Token> {
        self.pull_whitespace_and_comments();

        if self.is_dot() {
            self.take(1);
            return Ok(Token::Dot);
        }
        if self.is_object_start() {
            self.take(1);
            return Ok(Token::ObjectStart);
        }
        if self.is_object_end() {
            self.take(1);
            return Ok(Token::ObjectEnd);
        }
        if self.is_assignment() {
            self.take(1);
            return Ok(Token::Assign);
        }
        if self.is_plus_assignment() {
            self.take(2);
            return Ok(Token::PlusAssign);
        }
        if self.is_comma() {
            self.take(1);
            return Ok(Token::Comma);
        }
        if self.is_include() {
            return self.pull_include();
        }
        if self.is_start_of_quoted_text() {
            return self.pull_quoted_run().map(Token::Key);
        }
        if self.is_unquoted_key_start() {
            return Ok(self.pull_unquoted_key());
        }
        if self.is_array_start() {
            self.take(1);
            return Ok(Token::ArrayStart);
        }
        if self.is_array_end() {
            self.take(1);
            return Ok(Token::ArrayEnd);
        }
        if self.eof() {
            return Ok(Token::Eof);
        }
        Err(Error::UnknownToken { offset: self.index })
    }

    /// Value position tokens, with their own priority order.
    pub(crate) fn pull_value(&mut self) -> Result<Token> {
        if self.is_object_start() {
            self.take(1);
            return Ok(Token::ObjectStart);
        }
        if self.is_start_of_triple_quoted_text() {
            return self.pull_triple_quoted_text();
        }
        if self.is_start_of_quoted_text() {
            return self.pull_quoted_run().map(Token::Literal);
        }
        if self.is_unquoted_text() {
            return Ok(self.pull_unquoted_text());
        }
        if self.is_array_start() {
            self.take(1);
            return Ok(Token::ArrayStart);
        }
        if self.is_array_end() {
            self.take(1);
            return Ok(Token::ArrayEnd);
        }
        if self.is_substitution_start() {
            return Ok(self.pull_substitution());
        }
        if self.eof() {
            Err(Error::UnexpectedEof)
        } else {
            Err(Error::UnknownToken { offset: self.index })
        }
    }

    fn pull_unquoted_key(&mut self) -> Token {
        let mut buf = String::new();
        while self.is_unquoted_key() {
            if let Some(c) = self.take_one() {
                buf.push(c);
            }
        }
        Token::Key(buf.trim().to_string())
    }

    fn pull_unquoted_text(&mut self) -> Token {
        let mut buf = String::new();
        while self.is_unquoted_text() {
            if let Some(c) = self.take_one() {
                buf.push(c);
            }
        }
        Token::Literal(buf)
    }

    /// Whitespace between value chunks is kept as a literal so that string
    /// concatenation preserves interior spacing.
    pub(crate) fn pull_space_or_tab(&mut self) -> Token {
        let mut buf = String::new();
        while self.is_space_or_tab() {
            if let Some(c) = self.take_one() {
                buf.push(c);
            }
        }
        Token::Literal(buf)
    }

    fn pull_include(&mut self) -> Result<Token> {
        self.take(INCLUDE_KEYWORD.len());
        self.pull_whitespace_and_comments();
        self.pull_quoted_run().map(Token::Include)
    }

    /// The body of a quoted run with escape interpretation, shared between
    /// quoted keys and quoted values.
    fn pull_quoted_run(&mut self) -> Result<String> {
        let mut buf = String::new();
        self.take(1);
        while !self.eof() && !self.matches("\"") {
            if self.matches("\\") {
                buf.push(self.pull_escape_sequence()?);
            } else if let Some(c) = self.take_one() {
                buf.push(c);
            }
        }
        if !self.matches("\"") {
            return Err(Error::UnterminatedString);
        }
        self.take(1);
        Ok(buf)
    }

    /// Triple quoted text is taken verbatim up to the next `"""`, escapes
    /// included.
    fn pull_triple_quoted_text(&mut self) -> Result<Token> {
        let mut buf = String::new();
        self.take(3);
        while !self.eof() && !self.matches("\"\"\"") {
            if let Some(c) = self.take_one() {
                buf.push(c);
            }
        }
        if !self.matches("\"\"\"") {
            return Err(Error::UnterminatedTripleQuotedText);
        }
        self.take(3);
        Ok(Token::Literal(buf))
    }

    fn pull_escape_sequence(&mut self) -> Result<char> {
        self.take(1);
        let escaped = self.take_one().ok_or(Error::UnterminatedString)?;
        match escaped {
            '"' => Ok('"'),
            '\\' => Ok('\\'),
            '/' => Ok('/'),
            'b' => Ok('\u{0008}'),
            'f' => Ok('\u{000C}'),
            'n' => Ok('\n'),
            'r' => Ok('\r'),
            't' => Ok('\t'),
            'u' => {
                let hex: String = (0..4).filter_map(|_| self.take_one()).collect();
                if hex.len() != 4 {
                    return Err(Error::InvalidUnicodeEscape(hex));
                }
                let code = u32::from_str_radix(&hex, 16).map_err(|_| Error::InvalidUnicodeEscape(hex.clone()))?;
                char::from_u32(code).ok_or(Error::InvalidUnicodeEscape(hex))
            }
            other => Err(Error::UnknownEscape(other)),
        }
    }

    fn pull_substitution(&mut self) -> Token {
        self.take(2);
        let optional = if self.peek() == Some('?') {
            self.take(1);
            true
        } else {
            false
        };
        let mut buf = String::new();
        while self.is_unquoted_text() {
            if let Some(c) = self.take_one() {
                buf.push(c);
            }
        }
        self.take_one();
        Token::Substitution { path: buf, optional }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pull_tokens(text: &str) -> Vec<Token> {
        let mut tokenizer = Tokenizer::new(text);
        let mut tokens = Vec::new();
        loop {
            let token = tokenizer.pull_next().expect("tokenization failed");
            let done = token == Token::Eof;
            tokens.push(token);
            if done {
                break;
            }
        }
        tokens
    }

    fn key(s: &str) -> Token {
        Token::Key(s.to_string())
    }

    #[test]
    fn recognizes_simple_tokens() {
        assert_eq!(pull_tokens("{"), vec![Token::ObjectStart, Token::Eof]);
        assert_eq!(pull_tokens("}"), vec![Token::ObjectEnd, Token::Eof]);
        assert_eq!(pull_tokens("["), vec![Token::ArrayStart, Token::Eof]);
        assert_eq!(pull_tokens("]"), vec![Token::ArrayEnd, Token::Eof]);
        assert_eq!(pull_tokens("."), vec![Token::Dot, Token::Eof]);
        assert_eq!(pull_tokens(","), vec![Token::Comma, Token::Eof]);
        assert_eq!(pull_tokens("="), vec![Token::Assign, Token::Eof]);
        assert_eq!(pull_tokens(":"), vec![Token::Assign, Token::Eof]);
        assert_eq!(pull_tokens("+="), vec![Token::PlusAssign, Token::Eof]);
    }

    #[test]
    fn skips_whitespace_and_comments() {
        assert_eq!(pull_tokens("  \t\r\n  "), vec![Token::Eof]);
        assert_eq!(pull_tokens("# comment\n// another\n{"), vec![Token::ObjectStart, Token::Eof]);
        assert_eq!(pull_tokens("a = 1 # trailing"), vec![key("a"), Token::Assign, key("1"), Token::Eof]);
    }

    #[test]
    fn recognizes_keys() {
        assert_eq!(pull_tokens("akka"), vec![key("akka"), Token::Eof]);
        assert_eq!(pull_tokens("a.b"), vec![key("a"), Token::Dot, key("b"), Token::Eof]);
        assert_eq!(pull_tokens(r#""a.b""#), vec![key("a.b"), Token::Eof]);
        assert_eq!(pull_tokens("some key ="), vec![key("some key"), Token::Assign, Token::Eof]);
    }

    #[test]
    fn recognizes_quoted_values() {
        let mut tokenizer = Tokenizer::new(r#""quoted value""#);
        assert_eq!(tokenizer.pull_value().unwrap(), Token::Literal("quoted value".to_string()));

        let mut tokenizer = Tokenizer::new("\"\"\"triple \"quoted\" value\"\"\"");
        assert_eq!(tokenizer.pull_value().unwrap(), Token::Literal("triple \"quoted\" value".to_string()));
    }

    #[test]
    fn interprets_escape_sequences() {
        let mut tokenizer = Tokenizer::new(r#""a\tb\ncA""#);
        assert_eq!(tokenizer.pull_value().unwrap(), Token::Literal("a\tb\nc\u{0041}".to_string()));
    }

    #[test]
    fn rejects_unknown_escape_sequences() {
        let mut tokenizer = Tokenizer::new(r#""bad \x""#);
        assert!(matches!(tokenizer.pull_value(), Err(Error::UnknownEscape('x'))));
    }

    #[test]
    fn rejects_unterminated_strings() {
        let mut tokenizer = Tokenizer::new(r#""never closed"#);
        assert!(matches!(tokenizer.pull_value(), Err(Error::UnterminatedString)));

        let mut tokenizer = Tokenizer::new(r#""""still open"#);
        assert!(matches!(tokenizer.pull_value(), Err(Error::UnterminatedTripleQuotedText)));
    }

    #[test]
    fn numbers_are_plain_literals() {
        let mut tokenizer = Tokenizer::new("128M");
        assert_eq!(tokenizer.pull_value().unwrap(), Token::Literal("128M".to_string()));

        let mut tokenizer = Tokenizer::new("2.5e3 rest");
        assert_eq!(tokenizer.pull_value().unwrap(), Token::Literal("2.5e3".to_string()));
    }

    #[test]
    fn recognizes_substitutions() {
        let mut tokenizer = Tokenizer::new("${a.b.c}");
        assert_eq!(
            tokenizer.pull_value().unwrap(),
            Token::Substitution {
                path: "a.b.c".to_string(),
                optional: false
            }
        );

        let mut tokenizer = Tokenizer::new("${?maybe}");
        assert_eq!(
            tokenizer.pull_value().unwrap(),
            Token::Substitution {
                path: "maybe".to_string(),
                optional: true
            }
        );
    }

    #[test]
    fn recognizes_include_directives() {
        assert_eq!(
            pull_tokens(r#"include "other.conf""#),
            vec![Token::Include("other.conf".to_string()), Token::Eof]
        );
    }

    #[test]
    fn include_without_quoted_path_is_a_key() {
        assert_eq!(pull_tokens("include = 1"), vec![key("include"), Token::Assign, key("1"), Token::Eof]);
        assert_eq!(pull_tokens("includes"), vec![key("includes"), Token::Eof]);
    }

    #[test]
    fn include_lookahead_does_not_consume() {
        let mut tokenizer = Tokenizer::new("include bare");
        assert!(!tokenizer.is_include());
        assert_eq!(tokenizer.pull_next().unwrap(), key("include bare"));
    }
}
