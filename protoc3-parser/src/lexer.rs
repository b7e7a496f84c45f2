//! Wraps the `logos`-generated [`RawToken`] stream into the richer
//! [`Token`] stream the parser consumes: numbers classified and parsed,
//! comments accumulated and attached to the token they describe, and the
//! dot-qualified-name exception applied to keyword-shaped words.

use logos::Logos;
use thiserror::Error;

use crate::span::{LineIndex, Span};
use crate::token::{keyword, Comment, RawLexErrorKind, RawToken, Token, TokenKind};

#[derive(Debug, Error, PartialEq)]
pub enum LexError {
    #[error("unexpected character {ch:?} at {pos}", pos = .span.start)]
    InvalidCharacter { ch: char, span: Span },
    #[error("unterminated string literal at {pos}", pos = .span.start)]
    UnterminatedString { span: Span },
    #[error("invalid escape sequence at {pos}", pos = .span.start)]
    InvalidEscape { span: Span },
    #[error("unterminated block comment at {pos}", pos = .span.start)]
    UnterminatedBlockComment { span: Span },
    #[error("a `/*` block comment cannot be nested, at {pos}", pos = .span.start)]
    NestedBlockComment { span: Span },
    #[error("invalid number literal {text:?} at {pos}", pos = .span.start)]
    InvalidNumber { text: String, span: Span },
}

impl LexError {
    pub fn span(&self) -> Span {
        match self {
            LexError::InvalidCharacter { span, .. }
            | LexError::UnterminatedString { span, .. }
            | LexError::InvalidEscape { span, .. }
            | LexError::UnterminatedBlockComment { span, .. }
            | LexError::NestedBlockComment { span, .. }
            | LexError::InvalidNumber { span, .. } => *span,
        }
    }
}

/// A classified numeric literal, prior to being wrapped in a [`TokenKind`].
enum NumberLiteral {
    Int(u64),
    Float(f64),
}

/// Parses the maximal numeric run `logos` captured in [`RawToken::Number`]
/// into a decimal/hex/octal integer or a float, per §4.1. Any shape that
/// doesn't match one of those four forms (most commonly a trailing
/// identifier character glued onto a decimal run, e.g. `123abc`) is a hard
/// lexical error.
fn classify_number(raw: &str) -> Result<NumberLiteral, ()> {
    if let Some(hex) = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        return u64::from_str_radix(hex, 16)
            .map(NumberLiteral::Int)
            .map_err(|_| ());
    }
    if let Some(bin) = raw.strip_prefix("0b").or_else(|| raw.strip_prefix("0B")) {
        return u64::from_str_radix(bin, 2).map(NumberLiteral::Int).map_err(|_| ());
    }
    if raw.contains('.') || raw.contains('e') || raw.contains('E') {
        if raw.chars().all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-')) {
            return raw.parse::<f64>().map(NumberLiteral::Float).map_err(|_| ());
        }
        return Err(());
    }
    if raw.len() > 1 && raw.starts_with('0') {
        if raw.bytes().all(|b| (b'0'..=b'7').contains(&b)) {
            return u64::from_str_radix(raw, 8)
                .map(NumberLiteral::Int)
                .map_err(|_| ());
        }
        return Err(());
    }
    if raw.bytes().all(|b| b.is_ascii_digit()) {
        return raw.parse::<u64>().map(NumberLiteral::Int).map_err(|_| ());
    }
    Err(())
}

/// Scans an entire proto3 source buffer into a flat `Vec<Token>` terminated
/// by a single `TokenKind::Eof` token. The parser works off this vector
/// rather than pulling tokens one at a time, since lookahead in the grammar
/// (distinguishing `map<K, V>` from a plain type name, deciding whether
/// `optional` starts a field or introduces proto3-optional) is easier
/// against a random-access slice than a streaming iterator.
pub fn lex(source: &str) -> Result<Vec<Token>, LexError> {
    let line_index = LineIndex::new(source);
    let mut raw = RawToken::lexer(source);
    let mut tokens = Vec::new();
    let mut pending_comments: Vec<Comment> = Vec::new();
    let mut prev_was_dot = false;

    while let Some(result) = raw.next() {
        let raw_span = raw.span();
        let start = line_index.position(raw_span.start);
        let len = (raw_span.end - raw_span.start) as u32;
        let span = Span::new(start, len);
        let literal = raw.slice().to_string();

        let kind = match result {
            Ok(RawToken::LineComment(text)) => {
                attach_trailing_or_push_leading(
                    &mut tokens,
                    &mut pending_comments,
                    Comment { text, block: false, span },
                );
                continue;
            }
            Ok(RawToken::BlockComment(text)) => {
                attach_trailing_or_push_leading(
                    &mut tokens,
                    &mut pending_comments,
                    Comment { text, block: true, span },
                );
                continue;
            }
            Ok(RawToken::Word(word)) => {
                if !prev_was_dot {
                    if let Some(kw) = keyword(&word) {
                        TokenKind::Keyword(kw)
                    } else if word == "true" {
                        TokenKind::BoolLiteral(true)
                    } else if word == "false" {
                        TokenKind::BoolLiteral(false)
                    } else {
                        TokenKind::Ident
                    }
                } else {
                    TokenKind::Ident
                }
            }
            Ok(RawToken::Number(raw_text)) => match classify_number(&raw_text) {
                Ok(NumberLiteral::Int(v)) => TokenKind::IntLiteral(v),
                Ok(NumberLiteral::Float(v)) => TokenKind::FloatLiteral(v),
                Err(()) => {
                    return Err(LexError::InvalidNumber { text: raw_text, span });
                }
            },
            Ok(RawToken::QuotedString(text)) => TokenKind::StringLiteral(text),
            Ok(RawToken::Eq) => TokenKind::Punct('='),
            Ok(RawToken::Colon) => TokenKind::Punct(':'),
            Ok(RawToken::Semi) => TokenKind::Punct(';'),
            Ok(RawToken::LBrace) => TokenKind::Punct('{'),
            Ok(RawToken::RBrace) => TokenKind::Punct('}'),
            Ok(RawToken::LParen) => TokenKind::Punct('('),
            Ok(RawToken::RParen) => TokenKind::Punct(')'),
            Ok(RawToken::LBracket) => TokenKind::Punct('['),
            Ok(RawToken::RBracket) => TokenKind::Punct(']'),
            Ok(RawToken::Lt) => TokenKind::Punct('<'),
            Ok(RawToken::Gt) => TokenKind::Punct('>'),
            Ok(RawToken::Comma) => TokenKind::Punct(','),
            Ok(RawToken::Dot) => TokenKind::Punct('.'),
            Ok(RawToken::Plus) => TokenKind::Punct('+'),
            Ok(RawToken::Minus) => TokenKind::Punct('-'),
            Err(kind) => {
                return Err(match kind {
                    RawLexErrorKind::InvalidCharacter => LexError::InvalidCharacter {
                        ch: literal.chars().next().unwrap_or('\u{0}'),
                        span,
                    },
                    RawLexErrorKind::UnterminatedString => {
                        LexError::UnterminatedString { span }
                    }
                    RawLexErrorKind::InvalidEscape => LexError::InvalidEscape { span },
                    RawLexErrorKind::UnterminatedBlockComment => {
                        LexError::UnterminatedBlockComment { span }
                    }
                    RawLexErrorKind::NestedBlockComment => {
                        LexError::NestedBlockComment { span }
                    }
                })
            }
        };

        prev_was_dot = matches!(kind, TokenKind::Punct('.'));

        tokens.push(Token {
            kind,
            literal,
            span,
            leading_comments: std::mem::take(&mut pending_comments),
            trailing_comment: None,
        });
    }

    let eof_pos = line_index.position(source.len());
    tokens.push(Token {
        kind: TokenKind::Eof,
        literal: String::new(),
        span: Span::new(eof_pos, 0),
        leading_comments: std::mem::take(&mut pending_comments),
        trailing_comment: None,
    });

    Ok(tokens)
}

/// A comment is "trailing" for the previous token when it starts on the
/// same source line that token ended on; otherwise it becomes a leading
/// comment for whatever token comes next.
fn attach_trailing_or_push_leading(
    tokens: &mut [Token],
    pending: &mut Vec<Comment>,
    comment: Comment,
) {
    if let Some(last) = tokens.last_mut() {
        if last.trailing_comment.is_none()
            && pending.is_empty()
            && last.span.start.line == comment.span.start.line
        {
            last.trailing_comment = Some(comment);
            return;
        }
    }
    pending.push(comment);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        lex(src).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn lexes_keywords_and_punctuation() {
        let toks = kinds("message Foo { int32 bar = 1; }");
        assert!(matches!(toks[0], TokenKind::Keyword(_)));
        assert!(matches!(toks[1], TokenKind::Ident));
        assert_eq!(toks[2], TokenKind::Punct('{'));
        assert!(matches!(toks[3], TokenKind::Keyword(_)));
        assert_eq!(toks[5], TokenKind::Punct('='));
        assert_eq!(toks[6], TokenKind::IntLiteral(1));
    }

    #[test]
    fn dot_suppresses_keyword_classification() {
        let toks = kinds("a.message");
        assert!(matches!(toks[0], TokenKind::Ident));
        assert_eq!(toks[1], TokenKind::Punct('.'));
        assert!(matches!(toks[2], TokenKind::Ident));
    }

    #[test]
    fn decodes_string_escapes() {
        let toks = kinds(r#""a\nb\"c""#);
        assert_eq!(toks[0], TokenKind::StringLiteral("a\nb\"c".to_string()));
    }

    #[test]
    fn classifies_hex_and_octal() {
        let toks = kinds("0x1F 017 42");
        assert_eq!(toks[0], TokenKind::IntLiteral(0x1F));
        assert_eq!(toks[1], TokenKind::IntLiteral(0o17));
        assert_eq!(toks[2], TokenKind::IntLiteral(42));
    }

    #[test]
    fn classifies_binary() {
        let toks = kinds("0b1011");
        assert_eq!(toks[0], TokenKind::IntLiteral(0b1011));
    }

    #[test]
    fn classifies_float() {
        let toks = kinds("3.14");
        assert_eq!(toks[0], TokenKind::FloatLiteral(3.14));
    }

    #[test]
    fn rejects_trailing_identifier_char_on_number() {
        let err = lex("123abc").unwrap_err();
        assert!(matches!(err, LexError::InvalidNumber { .. }));
    }

    #[test]
    fn attaches_trailing_comment_same_line() {
        let toks = lex("int32 x = 1; // the x field\n").unwrap();
        let semi = toks.iter().find(|t| t.kind == TokenKind::Punct(';')).unwrap();
        assert!(semi.trailing_comment.is_some());
    }

    #[test]
    fn attaches_leading_comment_next_line() {
        let toks = lex("// a message\nmessage Foo {}\n").unwrap();
        let message_tok = &toks[0];
        assert_eq!(message_tok.leading_comments.len(), 1);
    }

    #[test]
    fn rejects_unterminated_string() {
        assert!(matches!(
            lex("\"abc"),
            Err(LexError::UnterminatedString { .. })
        ));
    }

    #[test]
    fn rejects_nested_block_comment() {
        assert!(matches!(
            lex("/* outer /* inner */ */"),
            Err(LexError::NestedBlockComment { .. })
        ));
    }
}
