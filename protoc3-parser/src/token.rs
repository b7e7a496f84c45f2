//! Token vocabulary.
//!
//! [`RawToken`] is what `logos` recognizes directly from the character
//! stream — coarse lexical shapes only (an identifier-shaped run, a
//! number-shaped run, a quoted run, punctuation). [`lexer::Lexer`] wraps the
//! `logos::Lexer<RawToken>` iterator and does the proto-specific work the
//! spec requires on top: classifying a numeric run into int/float/radix,
//! decoding string escapes, attaching comments to the following token, and
//! re-classifying keyword-shaped identifiers that follow a `.` as plain
//! identifiers.
//!
//! [`lexer::Lexer`]: crate::lexer::Lexer

use logos::Logos;

use crate::span::Span;

/// Lexical error reported by a `logos` callback. Spans are resolved by the
/// wrapping [`crate::lexer::Lexer`], which has access to the source and a
/// [`crate::span::LineIndex`]; callbacks only know the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RawLexErrorKind {
    #[default]
    InvalidCharacter,
    UnterminatedString,
    InvalidEscape,
    UnterminatedBlockComment,
    NestedBlockComment,
}

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(error = RawLexErrorKind)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum RawToken {
    /// An identifier- or keyword-shaped run. Keyword vs. identifier
    /// classification happens in the wrapping lexer, not here, because it
    /// depends on the preceding token (the dot-qualified-name exception).
    #[regex("[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Word(String),

    /// A maximal numeric run: digits plus any immediately-following
    /// alphanumeric/`.` characters. Deliberately over-permissive — the
    /// wrapping lexer classifies this into a decimal/hex/octal/binary
    /// integer or a float, and raises "invalid number format" for anything
    /// that doesn't fit one of those shapes (e.g. a trailing identifier
    /// character).
    #[regex(r"[0-9][0-9A-Za-z_.]*", |lex| lex.slice().to_string())]
    Number(String),

    #[token("\"", |lex| lex_quoted(lex, '"'))]
    #[token("'", |lex| lex_quoted(lex, '\''))]
    QuotedString(String),

    #[token("//", lex_line_comment)]
    LineComment(String),

    #[token("/*", lex_block_comment)]
    BlockComment(String),

    #[token("=")]
    Eq,
    #[token(":")]
    Colon,
    #[token(";")]
    Semi,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
}

/// Scans a quoted string body (after the opening quote has been consumed by
/// `logos`), decoding escapes per §4.1: `\a \b \f \n \r \t \v \\ \' \"`,
/// `\xHH`, `\uHHHH`, and three-digit octal `\NNN`.
fn lex_quoted(
    lex: &mut logos::Lexer<RawToken>,
    quote: char,
) -> Result<String, RawLexErrorKind> {
    let remainder = lex.remainder();
    let mut chars = remainder.char_indices().peekable();
    let mut out = String::new();
    let mut consumed = 0usize;

    while let Some((idx, ch)) = chars.next() {
        consumed = idx + ch.len_utf8();
        match ch {
            c if c == quote => {
                lex.bump(consumed);
                return Ok(out);
            }
            '\n' => return Err(RawLexErrorKind::UnterminatedString),
            '\\' => {
                let (_, esc) = chars.next().ok_or(RawLexErrorKind::UnterminatedString)?;
                match esc {
                    'a' => out.push('\u{07}'),
                    'b' => out.push('\u{08}'),
                    'f' => out.push('\u{0C}'),
                    'n' => out.push('\n'),
                    'r' => out.push('\r'),
                    't' => out.push('\t'),
                    'v' => out.push('\u{0B}'),
                    '\\' => out.push('\\'),
                    '\'' => out.push('\''),
                    '"' => out.push('"'),
                    'x' => {
                        let mut hex = String::new();
                        for _ in 0..2 {
                            match chars.peek() {
                                Some((_, h)) if h.is_ascii_hexdigit() => {
                                    hex.push(*h);
                                    chars.next();
                                }
                                _ => break,
                            }
                        }
                        if hex.is_empty() {
                            return Err(RawLexErrorKind::InvalidEscape);
                        }
                        let byte = u8::from_str_radix(&hex, 16)
                            .map_err(|_| RawLexErrorKind::InvalidEscape)?;
                        out.push(byte as char);
                    }
                    'u' => {
                        let mut hex = String::new();
                        for _ in 0..4 {
                            match chars.next() {
                                Some((_, h)) if h.is_ascii_hexdigit() => hex.push(h),
                                _ => return Err(RawLexErrorKind::InvalidEscape),
                            }
                        }
                        let code = u32::from_str_radix(&hex, 16)
                            .map_err(|_| RawLexErrorKind::InvalidEscape)?;
                        out.push(char::from_u32(code).ok_or(RawLexErrorKind::InvalidEscape)?);
                    }
                    d if d.is_digit(8) => {
                        let mut oct = String::from(d);
                        for _ in 0..2 {
                            match chars.peek() {
                                Some((_, o)) if o.is_digit(8) => {
                                    oct.push(*o);
                                    chars.next();
                                }
                                _ => break,
                            }
                        }
                        let byte = u8::from_str_radix(&oct, 8)
                            .map_err(|_| RawLexErrorKind::InvalidEscape)?;
                        out.push(byte as char);
                    }
                    _ => return Err(RawLexErrorKind::InvalidEscape),
                }
                if let Some((next_idx, next_ch)) = chars.peek() {
                    consumed = *next_idx;
                    let _ = next_ch;
                } else {
                    consumed = remainder.len();
                }
            }
            _ => out.push(ch),
        }
    }

    Err(RawLexErrorKind::UnterminatedString)
}

fn lex_line_comment(lex: &mut logos::Lexer<RawToken>) -> String {
    let remainder = lex.remainder();
    let end = remainder.find('\n').unwrap_or(remainder.len());
    lex.bump(end);
    remainder[..end].to_string()
}

fn lex_block_comment(
    lex: &mut logos::Lexer<RawToken>,
) -> Result<String, RawLexErrorKind> {
    let remainder = lex.remainder();
    if remainder.starts_with("*/") {
        lex.bump(2);
        return Ok(String::new());
    }
    let mut i = 0;
    let bytes = remainder.as_bytes();
    while i < bytes.len() {
        if bytes[i..].starts_with(b"/*") {
            return Err(RawLexErrorKind::NestedBlockComment);
        }
        if bytes[i..].starts_with(b"*/") {
            lex.bump(i + 2);
            return Ok(remainder[..i].to_string());
        }
        i += 1;
    }
    Err(RawLexErrorKind::UnterminatedBlockComment)
}

/// The proto3 keyword table (§4.1). Matched only when a word-shaped token
/// does *not* immediately follow a `.` (the dotted-qualified-name
/// exception).
pub fn keyword(word: &str) -> Option<Keyword> {
    use Keyword::*;
    Some(match word {
        "syntax" => Syntax,
        "import" => Import,
        "weak" => Weak,
        "public" => Public,
        "package" => Package,
        "option" => Option_,
        "message" => Message,
        "enum" => Enum,
        "service" => Service,
        "rpc" => Rpc,
        "returns" => Returns,
        "stream" => Stream,
        "repeated" => Repeated,
        "optional" => Optional,
        "required" => Required,
        "reserved" => Reserved,
        "to" => To,
        "map" => Map,
        "oneof" => Oneof,
        "extend" => Extend,
        "extensions" => Extensions,
        "double" => Double,
        "float" => Float,
        "int32" => Int32,
        "int64" => Int64,
        "uint32" => Uint32,
        "uint64" => Uint64,
        "sint32" => Sint32,
        "sint64" => Sint64,
        "fixed32" => Fixed32,
        "fixed64" => Fixed64,
        "sfixed32" => Sfixed32,
        "sfixed64" => Sfixed64,
        "bool" => Bool,
        "string" => String_,
        "bytes" => Bytes,
        _ => return None,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Syntax,
    Import,
    Weak,
    Public,
    Package,
    Option_,
    Message,
    Enum,
    Service,
    Rpc,
    Returns,
    Stream,
    Repeated,
    Optional,
    Required,
    Reserved,
    To,
    Map,
    Oneof,
    Extend,
    Extensions,
    Double,
    Float,
    Int32,
    Int64,
    Uint32,
    Uint64,
    Sint32,
    Sint64,
    Fixed32,
    Fixed64,
    Sfixed32,
    Sfixed64,
    Bool,
    String_,
    Bytes,
}

impl Keyword {
    /// `true` for the 15 scalar-type keywords — used by the parser to decide
    /// whether a keyword token can start a field type.
    pub fn is_scalar_type(self) -> bool {
        use Keyword::*;
        matches!(
            self,
            Double | Float | Int32 | Int64 | Uint32 | Uint64 | Sint32 | Sint64 | Fixed32
                | Fixed64 | Sfixed32 | Sfixed64 | Bool | String_ | Bytes
        )
    }

    pub fn as_str(self) -> &'static str {
        use Keyword::*;
        match self {
            Syntax => "syntax",
            Import => "import",
            Weak => "weak",
            Public => "public",
            Package => "package",
            Option_ => "option",
            Message => "message",
            Enum => "enum",
            Service => "service",
            Rpc => "rpc",
            Returns => "returns",
            Stream => "stream",
            Repeated => "repeated",
            Optional => "optional",
            Required => "required",
            Reserved => "reserved",
            To => "to",
            Map => "map",
            Oneof => "oneof",
            Extend => "extend",
            Extensions => "extensions",
            Double => "double",
            Float => "float",
            Int32 => "int32",
            Int64 => "int64",
            Uint32 => "uint32",
            Uint64 => "uint64",
            Sint32 => "sint32",
            Sint64 => "sint64",
            Fixed32 => "fixed32",
            Fixed64 => "fixed64",
            Sfixed32 => "sfixed32",
            Sfixed64 => "sfixed64",
            Bool => "bool",
            String_ => "string",
            Bytes => "bytes",
        }
    }
}

/// A single leading or trailing comment, attached to the token that follows
/// (or, for a trailing comment, the token it follows on the same line).
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub text: String,
    pub block: bool,
    pub span: Span,
}

/// A fully classified, positioned token (§3.1).
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
    pub span: Span,
    pub leading_comments: Vec<Comment>,
    pub trailing_comment: Option<Comment>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Keyword(Keyword),
    Ident,
    IntLiteral(u64),
    FloatLiteral(f64),
    StringLiteral(String),
    BoolLiteral(bool),
    /// `= : ; { } ( ) [ ] < > , . + -`
    Punct(char),
    Eof,
    /// Never produced by this lexer (§9 open question); kept for
    /// completeness with the token-kind taxonomy in §3.1.
    #[allow(dead_code)]
    Illegal,
}
