//! The lexer turns a stream of `char`s into a [TokenStream]. Quoted strings are fully
//! validated and unescaped here, but any other run of characters (keywords, numbers, or
//! plain garbage) is passed through as a [Token::Value] so that the node parsers decide what
//! it means, and so that trailing junk surfaces as a token rather than as a lexical failure.
use std::collections::VecDeque;
use std::fmt::{Display, Formatter};
use std::io::BufRead;
use std::iter::Peekable;

use tracing::trace;

use crate::coords::{Coords, Span};
use crate::decoders::{chars_from_reader, read_input, Encoding};
use crate::errors::JsonOutcome;
use crate::lexer_error;

/// Enumeration of valid JSON tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    StartObject,
    EndObject,
    StartArray,
    EndArray,
    Colon,
    Comma,
    /// A quoted string, with escapes already decoded
    Str(String),
    /// Any unquoted run of characters
    Value(String),
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::StartObject => write!(f, "{{"),
            Token::EndObject => write!(f, "}}"),
            Token::StartArray => write!(f, "["),
            Token::EndArray => write!(f, "]"),
            Token::Colon => write!(f, ":"),
            Token::Comma => write!(f, ","),
            Token::Str(s) => write!(f, "\"{}\"", s),
            Token::Value(v) => write!(f, "{}", v),
        }
    }
}

/// A packed token consists of a [Token] and the [Span] associated with it
pub type PackedToken = (Token, Span);

/// Convenience macro for packing tokens along with their positional information
macro_rules! packed_token {
    ($t:expr, $s:expr, $e:expr) => {
        ($t, Span { start: $s, end: $e })
    };
    ($t:expr, $s:expr) => {
        ($t, Span::point($s))
    };
}

/// Checks whether a char is insignificant whitespace, as defined by RFC 8259
fn is_json_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

/// Checks whether a char terminates an unquoted value
fn is_delimiter(c: char) -> bool {
    is_json_whitespace(c) || matches!(c, '{' | '}' | '[' | ']' | ':' | ',' | '"')
}

/// A forward-only cursor over the tokens lexed from some input. The cursor never moves
/// backwards; once a token has been consumed it's gone.
#[derive(Debug, Clone, Default)]
pub struct TokenStream {
    /// Tokens not yet consumed
    tokens: VecDeque<PackedToken>,
    /// Coordinates of the final character of the input
    end: Coords,
}

impl TokenStream {
    /// Checks whether there are any tokens left to consume
    pub fn has_next(&self) -> bool {
        !self.tokens.is_empty()
    }

    /// A view of the next token, without consuming it
    pub fn peek(&self) -> Option<&PackedToken> {
        self.tokens.front()
    }

    /// Consume the next token only if it satisfies `predicate`
    pub fn next_if(&mut self, predicate: impl FnOnce(&Token) -> bool) -> Option<PackedToken> {
        let matched = self
            .tokens
            .front()
            .map_or(false, |(token, _)| predicate(token));
        if matched {
            self.tokens.pop_front()
        } else {
            None
        }
    }

    /// The absolute character position of the next token. Once the stream has been exhausted,
    /// this is the position immediately after the final character of the input.
    pub fn position(&self) -> usize {
        match self.tokens.front() {
            Some((_, span)) => span.start.absolute,
            None => self.end.absolute + 1,
        }
    }

    /// The number of tokens left to consume
    pub fn remaining(&self) -> usize {
        self.tokens.len()
    }
}

impl Iterator for TokenStream {
    type Item = PackedToken;

    fn next(&mut self) -> Option<Self::Item> {
        self.tokens.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.tokens.len(), Some(self.tokens.len()))
    }
}

/// A lexer implementation which will consume a stream of `char`s and produce [Token]s
pub struct Lexer<Chars: Iterator<Item = char>> {
    /// The source of characters
    chars: Peekable<Chars>,
    /// Coordinates of the most recently consumed character
    coords: Coords,
}

impl<Chars: Iterator<Item = char>> Lexer<Chars> {
    pub fn new(chars: Chars) -> Self {
        Lexer {
            chars: chars.peekable(),
            coords: Coords::default(),
        }
    }

    /// Consume the entire input, producing a [TokenStream] or the first lexical failure
    pub fn tokenize(mut self) -> JsonOutcome<TokenStream> {
        let mut tokens = VecDeque::new();
        while let Some(packed) = self.consume()? {
            tokens.push_back(packed);
        }
        trace!(
            tokens = tokens.len(),
            characters = self.coords.absolute,
            "tokenized input"
        );
        Ok(TokenStream {
            tokens,
            end: self.coords,
        })
    }

    /// Consume the next token from the input, [None] once the input is exhausted
    pub fn consume(&mut self) -> JsonOutcome<Option<PackedToken>> {
        while let Some(c) = self.chars.next_if(|c| is_json_whitespace(*c)) {
            self.coords = self.coords.advance(c);
        }
        let (c, start) = match self.advance() {
            Some(next) => next,
            None => return Ok(None),
        };
        let packed = match c {
            '{' => packed_token!(Token::StartObject, start),
            '}' => packed_token!(Token::EndObject, start),
            '[' => packed_token!(Token::StartArray, start),
            ']' => packed_token!(Token::EndArray, start),
            ':' => packed_token!(Token::Colon, start),
            ',' => packed_token!(Token::Comma, start),
            '"' => self.match_string(start)?,
            c => self.match_value(c, start),
        };
        Ok(Some(packed))
    }

    /// Take the next char from the input along with its coordinates
    fn advance(&mut self) -> Option<(char, Coords)> {
        let c = self.chars.next()?;
        self.coords = self.coords.advance(c);
        Some((c, self.coords))
    }

    /// Gather an unquoted run of characters, up to (but not including) the next delimiter
    fn match_value(&mut self, first: char, start: Coords) -> PackedToken {
        let mut buffer = String::new();
        buffer.push(first);
        while let Some(c) = self.chars.next_if(|c| !is_delimiter(*c)) {
            self.coords = self.coords.advance(c);
            buffer.push(c);
        }
        packed_token!(Token::Value(buffer), start, self.coords)
    }

    /// Match a quoted string, translating any escape sequences found along the way. The
    /// opening quote has already been consumed.
    fn match_string(&mut self, start: Coords) -> JsonOutcome<PackedToken> {
        let mut buffer = String::new();
        loop {
            match self.advance() {
                Some(('"', end)) => return Ok(packed_token!(Token::Str(buffer), start, end)),
                Some(('\\', coords)) => buffer.push(self.match_escape_sequence(coords)?),
                Some((c, coords)) if (c as u32) < 0x20 => {
                    return lexer_error!(
                        coords.absolute,
                        format!("unescaped control character {:?} in string", c)
                    )
                }
                Some((c, _)) => buffer.push(c),
                None => return lexer_error!(start.absolute, "unterminated string"),
            }
        }
    }

    /// Match a valid string escape sequence, the backslash has already been consumed
    fn match_escape_sequence(&mut self, coords: Coords) -> JsonOutcome<char> {
        match self.advance() {
            Some(('"', _)) => Ok('"'),
            Some(('\\', _)) => Ok('\\'),
            Some(('/', _)) => Ok('/'),
            Some(('b', _)) => Ok('\u{8}'),
            Some(('f', _)) => Ok('\u{c}'),
            Some(('n', _)) => Ok('\n'),
            Some(('r', _)) => Ok('\r'),
            Some(('t', _)) => Ok('\t'),
            Some(('u', _)) => self.match_unicode_escape_sequence(coords),
            Some((c, _)) => lexer_error!(
                coords.absolute,
                format!("invalid escape sequence '\\{}'", c)
            ),
            None => lexer_error!(coords.absolute, "unterminated escape sequence"),
        }
    }

    /// Match a unicode escape sequence in the form uXXXX, where each X is a valid hex digit.
    /// High surrogates must be followed by an escaped low surrogate.
    fn match_unicode_escape_sequence(&mut self, coords: Coords) -> JsonOutcome<char> {
        let high = self.match_hex_quad(coords)?;
        let code = match high {
            0xD800..=0xDBFF => {
                let low = match (self.advance(), self.advance()) {
                    (Some(('\\', _)), Some(('u', _))) => self.match_hex_quad(coords)?,
                    _ => return lexer_error!(coords.absolute, "unpaired surrogate in escape"),
                };
                if !(0xDC00..=0xDFFF).contains(&low) {
                    return lexer_error!(coords.absolute, "unpaired surrogate in escape");
                }
                0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
            }
            0xDC00..=0xDFFF => {
                return lexer_error!(coords.absolute, "unpaired surrogate in escape")
            }
            code => code,
        };
        match char::from_u32(code) {
            Some(c) => Ok(c),
            None => lexer_error!(coords.absolute, "invalid unicode escape sequence"),
        }
    }

    /// Match exactly four hex digits
    fn match_hex_quad(&mut self, coords: Coords) -> JsonOutcome<u32> {
        let mut code = 0;
        for _ in 0..4 {
            match self.advance().and_then(|(c, _)| c.to_digit(16)) {
                Some(digit) => code = code * 16 + digit,
                None => return lexer_error!(coords.absolute, "invalid unicode escape sequence"),
            }
        }
        Ok(code)
    }
}

/// Tokenize a complete string slice
pub fn tokenize(text: &str) -> JsonOutcome<TokenStream> {
    Lexer::new(text.chars()).tokenize()
}

/// Tokenize the complete contents of a reader, decoding bytes using the given [Encoding].
/// Read failures and bytes which aren't valid for the encoding are reported as lexical errors.
pub fn tokenize_reader<Buffer: BufRead>(
    reader: &mut Buffer,
    encoding: Encoding,
) -> JsonOutcome<TokenStream> {
    let bytes = read_input(reader, encoding)?;
    let mut input = bytes.as_slice();
    Lexer::new(chars_from_reader(&mut input, encoding)).tokenize()
}

#[cfg(test)]
mod tests {
    use super::{tokenize, Token};
    use crate::errors::ErrorKind;

    fn tokens_of(text: &str) -> Vec<Token> {
        tokenize(text).unwrap().map(|(t, _)| t).collect()
    }

    #[test]
    fn should_handle_empty_input() {
        let stream = tokenize("   \n ").unwrap();
        assert!(!stream.has_next());
        assert_eq!(stream.position(), 6);
    }

    #[test]
    fn should_lex_structural_tokens() {
        assert_eq!(
            tokens_of("{ } [ ] , :"),
            vec![
                Token::StartObject,
                Token::EndObject,
                Token::StartArray,
                Token::EndArray,
                Token::Comma,
                Token::Colon,
            ]
        );
    }

    #[test]
    fn values_should_stop_at_delimiters() {
        assert_eq!(
            tokens_of("[true,-12.5e3]null\"x\""),
            vec![
                Token::StartArray,
                Token::Value("true".to_string()),
                Token::Comma,
                Token::Value("-12.5e3".to_string()),
                Token::EndArray,
                Token::Value("null".to_string()),
                Token::Str("x".to_string()),
            ]
        );
    }

    #[test]
    fn should_decode_escapes() {
        assert_eq!(
            tokens_of(r#""a\"b\\c\/d\n\té😀""#),
            vec![Token::Str("a\"b\\c/d\n\té\u{1F600}".to_string())]
        );
    }

    #[test]
    fn should_report_token_spans() {
        let mut stream = tokenize("{\n  \"key\": 12}").unwrap();
        let (_, brace) = stream.next().unwrap();
        assert_eq!(brace.start.absolute, 1);
        let (token, span) = stream.next().unwrap();
        assert_eq!(token, Token::Str("key".to_string()));
        assert_eq!(span.start.line, 1);
        assert_eq!(span.start.column, 3);
        assert_eq!(span.len(), 5);
        assert_eq!(stream.position(), 10);
    }

    #[test]
    fn should_reject_unterminated_strings() {
        let err = tokenize("{\"open").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Lexical);
        assert_eq!(err.reason(), "at position 2: unterminated string");
    }

    #[test]
    fn should_reject_bad_escapes() {
        assert!(tokenize(r#""\q""#).is_err());
        assert!(tokenize(r#""\u12""#).is_err());
        assert!(tokenize(r#""\ud83d""#).is_err());
        assert!(tokenize(r#""\ude00""#).is_err());
    }

    #[test]
    fn should_reject_raw_control_characters() {
        let err = tokenize("\"a\tb\"").unwrap_err();
        assert!(err.reason().starts_with("at position 3: unescaped control character"));
    }
}
