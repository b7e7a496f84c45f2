//! Recursive-descent parser: `Vec<Token>` → [`crate::ast::FileNode`] (§4.2).
//!
//! The original `protobuf-parser` crate this workspace grew out of drove
//! everything off `nom` combinators in a single pass over the source text.
//! This parser instead walks the token vector `lexer::lex` already
//! produced, the same two-stage split `protox` and `rust-protobuf` use —
//! lookahead here is "peek the next token kind", not "try an alternative
//! combinator and backtrack over raw text".

mod enum_;
mod field;
mod message;
mod option_;
mod service;

use thiserror::Error;

use crate::ast::FileNode;
use crate::span::Span;
use crate::token::{Keyword, Token, TokenKind};

#[derive(Debug, Error, PartialEq)]
pub enum SyntaxError {
    #[error("expected {expected}, found {found:?} at {pos}", pos = .span.start)]
    Unexpected {
        expected: String,
        found: String,
        span: Span,
    },
    #[error("unexpected end of file, expected {expected}")]
    UnexpectedEof { expected: String },
    #[error("missing `syntax = \"proto3\";` declaration")]
    MissingSyntax,
    #[error("unsupported syntax {found:?} at {pos} — only \"proto3\" is accepted", pos = .span.start)]
    UnsupportedSyntax { found: String, span: Span },
    #[error("`group` fields are not supported at {pos}", pos = .span.start)]
    GroupFieldUnsupported { span: Span },
    #[error("`required` fields are not supported in proto3 at {pos}", pos = .span.start)]
    RequiredFieldUnsupported { span: Span },
    #[error("a single `reserved` statement at {pos} cannot mix field-number ranges and quoted names", pos = .span.start)]
    MixedReservedStatement { span: Span },
}

impl SyntaxError {
    pub fn span(&self) -> Option<Span> {
        match self {
            SyntaxError::Unexpected { span, .. }
            | SyntaxError::UnsupportedSyntax { span, .. }
            | SyntaxError::GroupFieldUnsupported { span }
            | SyntaxError::RequiredFieldUnsupported { span }
            | SyntaxError::MixedReservedStatement { span } => Some(*span),
            SyntaxError::UnexpectedEof { .. } | SyntaxError::MissingSyntax => None,
        }
    }
}

/// A cursor over the flat token vector. `logos`/the lexer already resolved
/// spans and comments; the cursor's only job is lookahead and consumption.
pub(crate) struct Cursor<'t> {
    tokens: &'t [Token],
    pos: usize,
}

impl<'t> Cursor<'t> {
    fn new(tokens: &'t [Token]) -> Self {
        Cursor { tokens, pos: 0 }
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_at(&self, offset: usize) -> &Token {
        let idx = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[idx]
    }

    fn at_eof(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eof)
    }

    fn bump(&mut self) -> Token {
        let tok = self.tokens[self.pos.min(self.tokens.len() - 1)].clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    fn describe(tok: &Token) -> String {
        match &tok.kind {
            TokenKind::Eof => "end of file".to_string(),
            _ if !tok.literal.is_empty() => format!("{:?}", tok.literal),
            _ => format!("{:?}", tok.kind),
        }
    }

    fn expect_punct(&mut self, c: char) -> Result<Span, SyntaxError> {
        if self.peek().kind == TokenKind::Punct(c) {
            Ok(self.bump().span)
        } else {
            let tok = self.peek().clone();
            Err(SyntaxError::Unexpected {
                expected: format!("`{c}`"),
                found: Self::describe(&tok),
                span: tok.span,
            })
        }
    }

    fn eat_punct(&mut self, c: char) -> Option<Span> {
        if self.peek().kind == TokenKind::Punct(c) {
            Some(self.bump().span)
        } else {
            None
        }
    }

    fn expect_keyword(&mut self, kw: Keyword) -> Result<Span, SyntaxError> {
        if self.peek().kind == TokenKind::Keyword(kw) {
            Ok(self.bump().span)
        } else {
            let tok = self.peek().clone();
            Err(SyntaxError::Unexpected {
                expected: format!("`{}`", kw.as_str()),
                found: Self::describe(&tok),
                span: tok.span,
            })
        }
    }

    fn eat_keyword(&mut self, kw: Keyword) -> Option<Span> {
        if self.peek().kind == TokenKind::Keyword(kw) {
            Some(self.bump().span)
        } else {
            None
        }
    }

    fn expect_ident(&mut self) -> Result<crate::ast::Ident, SyntaxError> {
        let tok = self.peek().clone();
        match tok.kind {
            TokenKind::Ident => {
                self.bump();
                Ok(crate::ast::Ident { text: tok.literal, span: tok.span })
            }
            TokenKind::Keyword(kw) => {
                // Keywords are reserved words, not usable as identifiers;
                // report the more specific "not a valid name" message.
                Err(SyntaxError::Unexpected {
                    expected: "an identifier".to_string(),
                    found: format!("keyword `{}`", kw.as_str()),
                    span: tok.span,
                })
            }
            _ => Err(SyntaxError::Unexpected {
                expected: "an identifier".to_string(),
                found: Self::describe(&tok),
                span: tok.span,
            }),
        }
    }

    fn expect_string(&mut self) -> Result<(String, Span), SyntaxError> {
        let tok = self.peek().clone();
        match tok.kind {
            TokenKind::StringLiteral(s) => {
                self.bump();
                Ok((s, tok.span))
            }
            _ => Err(SyntaxError::Unexpected {
                expected: "a string literal".to_string(),
                found: Self::describe(&tok),
                span: tok.span,
            }),
        }
    }

    /// Parses a type reference: an optional leading `.`, then one or more
    /// dot-separated identifiers.
    fn parse_type_name(&mut self) -> Result<crate::ast::TypeName, SyntaxError> {
        let start = self.peek().span;
        let leading_dot = self.eat_punct('.').is_some();
        let mut parts = vec![self.expect_ident()?];
        while self.eat_punct('.').is_some() {
            parts.push(self.expect_ident()?);
        }
        let end = parts.last().unwrap().span;
        Ok(crate::ast::TypeName {
            leading_dot,
            parts,
            span: join(start, end),
        })
    }

    /// Parses a field/enum-value number: optional sign then an integer
    /// literal. Proto3 field numbers are always positive but enum values
    /// may be negative, so the sign is accepted here and range-checked
    /// later by the semantic analyzer.
    fn parse_signed_int(&mut self) -> Result<(i64, Span), SyntaxError> {
        let start = self.peek().span;
        let negative = self.eat_punct('-').is_some();
        if !negative {
            self.eat_punct('+');
        }
        let tok = self.peek().clone();
        match tok.kind {
            TokenKind::IntLiteral(v) => {
                self.bump();
                let value = if negative { -(v as i64) } else { v as i64 };
                Ok((value, join(start, tok.span)))
            }
            _ => Err(SyntaxError::Unexpected {
                expected: "an integer".to_string(),
                found: Self::describe(&tok),
                span: tok.span,
            }),
        }
    }
}

/// Shared between the message-body and enum-body `reserved` parsers: a
/// single `reserved` statement may list field-number ranges *or* quoted
/// names, never both (§4.2's "Reserved" production).
pub(crate) fn reject_if_mixed_reserved(
    items: &[crate::ast::ReservedNode],
    span: Span,
) -> Result<(), SyntaxError> {
    use crate::ast::ReservedNode;
    let has_range = items.iter().any(|i| matches!(i, ReservedNode::Range { .. }));
    let has_name = items.iter().any(|i| matches!(i, ReservedNode::Name { .. }));
    if has_range && has_name {
        return Err(SyntaxError::MixedReservedStatement { span });
    }
    Ok(())
}

pub(crate) fn join(a: Span, b: Span) -> Span {
    let len = if b.start.line == a.start.line {
        (b.start.column - a.start.column) as u32 + b.len
    } else {
        b.len
    };
    Span::new(a.start, len.max(a.len))
}

/// Parses a complete file. The token vector must include the trailing
/// `TokenKind::Eof` `lexer::lex` always appends.
pub fn parse(tokens: &[Token]) -> Result<FileNode, SyntaxError> {
    let mut cursor = Cursor::new(tokens);

    let syntax_span = cursor.expect_keyword(Keyword::Syntax).map_err(|_| SyntaxError::MissingSyntax)?;
    cursor.expect_punct('=')?;
    let (syntax_text, syntax_value_span) = cursor.expect_string()?;
    if syntax_text != "proto3" {
        return Err(SyntaxError::UnsupportedSyntax {
            found: syntax_text,
            span: syntax_value_span,
        });
    }
    cursor.expect_punct(';')?;

    let mut items = Vec::new();
    while !cursor.at_eof() {
        items.push(parse_top_level_item(&mut cursor)?);
    }

    let trailing_comments = cursor.tokens.last().map(|t| t.leading_comments.clone()).unwrap_or_default();

    Ok(FileNode {
        syntax: crate::ast::Syntax::Proto3,
        syntax_span: join(syntax_span, syntax_value_span),
        items,
        trailing_comments,
    })
}

fn parse_top_level_item(cursor: &mut Cursor) -> Result<crate::ast::TopLevelItem, SyntaxError> {
    use crate::ast::TopLevelItem;

    if cursor.eat_punct(';').is_some() {
        return parse_top_level_item(cursor);
    }

    let leading_comments = cursor.peek().leading_comments.clone();

    if let Some(start) = cursor.eat_keyword(Keyword::Import) {
        let weak = cursor.eat_keyword(Keyword::Weak).is_some();
        let public = if !weak { cursor.eat_keyword(Keyword::Public).is_some() } else { false };
        let (path, path_span) = cursor.expect_string()?;
        let end = cursor.expect_punct(';')?;
        return Ok(TopLevelItem::Import(crate::ast::ImportNode {
            path,
            weak,
            public,
            span: join(start, end).max_with(path_span),
        }));
    }

    if let Some(start) = cursor.eat_keyword(Keyword::Package) {
        let name = cursor.parse_type_name()?;
        let end = cursor.expect_punct(';')?;
        let _ = join(start, end);
        return Ok(TopLevelItem::Package(name));
    }

    if cursor.peek().kind == TokenKind::Keyword(Keyword::Option_) {
        let opt = option_::parse_option_statement(cursor)?;
        return Ok(TopLevelItem::Option(opt));
    }

    if cursor.peek().kind == TokenKind::Keyword(Keyword::Message) {
        let mut node = message::parse_message(cursor)?;
        node.leading_comments = leading_comments;
        return Ok(TopLevelItem::Message(node));
    }

    if cursor.peek().kind == TokenKind::Keyword(Keyword::Enum) {
        let mut node = enum_::parse_enum(cursor)?;
        node.leading_comments = leading_comments;
        return Ok(TopLevelItem::Enum(node));
    }

    if cursor.peek().kind == TokenKind::Keyword(Keyword::Service) {
        let mut node = service::parse_service(cursor)?;
        node.leading_comments = leading_comments;
        return Ok(TopLevelItem::Service(node));
    }

    if cursor.peek().kind == TokenKind::Keyword(Keyword::Extend) {
        let mut node = message::parse_extend(cursor)?;
        node.leading_comments = leading_comments;
        return Ok(TopLevelItem::Extend(node));
    }

    let tok = cursor.peek().clone();
    Err(SyntaxError::Unexpected {
        expected: "`import`, `package`, `option`, `message`, `enum`, `service`, or `extend`".to_string(),
        found: Cursor::describe(&tok),
        span: tok.span,
    })
}

impl Span {
    /// Widens this span to also cover `other`, used when a node's span is
    /// built up piecemeal across several `expect_*` calls.
    fn max_with(self, other: Span) -> Span {
        join(self, other)
    }
}
