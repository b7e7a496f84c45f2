//! Option statements and values (§4.2 "Option" and "Constant" productions).

use crate::ast::{ConstantValue, Ident, OptionNamePart, OptionNode};
use crate::token::{Keyword, TokenKind};

use super::{join, Cursor, SyntaxError};

/// `option foo.bar = value;` — the statement form, used at file, message,
/// enum, service, and oneof scope.
pub(super) fn parse_option_statement(cursor: &mut Cursor) -> Result<OptionNode, SyntaxError> {
    let leading_comments = cursor.peek().leading_comments.clone();
    let start = cursor.expect_keyword(Keyword::Option_)?;
    let name_parts = parse_option_name(cursor)?;
    cursor.expect_punct('=')?;
    let value = parse_constant(cursor)?;
    let end = cursor.expect_punct(';')?;
    Ok(OptionNode {
        name_parts,
        value,
        span: join(start, end),
        leading_comments,
    })
}

/// `[foo = 1, (bar.baz) = "x"]` — the bracketed field-option-list form.
pub(super) fn parse_option_list(cursor: &mut Cursor) -> Result<Vec<OptionNode>, SyntaxError> {
    let mut options = Vec::new();
    cursor.expect_punct('[')?;
    loop {
        let start = cursor.peek().span;
        let name_parts = parse_option_name(cursor)?;
        cursor.expect_punct('=')?;
        let value = parse_constant(cursor)?;
        options.push(OptionNode {
            name_parts,
            value,
            span: join(start, cursor.peek_at(0).span),
            leading_comments: Vec::new(),
        });
        if cursor.eat_punct(',').is_none() {
            break;
        }
    }
    cursor.expect_punct(']')?;
    Ok(options)
}

fn parse_option_name(cursor: &mut Cursor) -> Result<Vec<OptionNamePart>, SyntaxError> {
    let mut parts = vec![parse_option_name_part(cursor)?];
    while cursor.eat_punct('.').is_some() {
        parts.push(parse_option_name_part(cursor)?);
    }
    Ok(parts)
}

fn parse_option_name_part(cursor: &mut Cursor) -> Result<OptionNamePart, SyntaxError> {
    if cursor.eat_punct('(').is_some() {
        let name = cursor.parse_type_name()?;
        cursor.expect_punct(')')?;
        Ok(OptionNamePart { name, is_extension: true })
    } else {
        let ident = cursor.expect_ident()?;
        Ok(OptionNamePart {
            name: crate::ast::TypeName {
                leading_dot: false,
                span: ident.span,
                parts: vec![ident],
            },
            is_extension: false,
        })
    }
}

fn parse_constant(cursor: &mut Cursor) -> Result<ConstantValue, SyntaxError> {
    let tok = cursor.peek().clone();
    match &tok.kind {
        TokenKind::StringLiteral(_) => {
            let (value, span) = cursor.expect_string()?;
            Ok(ConstantValue::String { value, span })
        }
        TokenKind::BoolLiteral(b) => {
            let value = *b;
            cursor.bump();
            Ok(ConstantValue::Bool { value, span: tok.span })
        }
        TokenKind::IntLiteral(_) => {
            let (value, span) = cursor.parse_signed_int()?;
            Ok(ConstantValue::Int { value, span })
        }
        TokenKind::Punct('-') | TokenKind::Punct('+') => {
            if matches!(cursor.peek_at(1).kind, TokenKind::FloatLiteral(_)) {
                let negative = tok.kind == TokenKind::Punct('-');
                cursor.bump();
                let f_tok = cursor.bump();
                let value = match f_tok.kind {
                    TokenKind::FloatLiteral(v) => if negative { -v } else { v },
                    _ => unreachable!(),
                };
                Ok(ConstantValue::Float { value, span: join(tok.span, f_tok.span) })
            } else {
                let (value, span) = cursor.parse_signed_int()?;
                Ok(ConstantValue::Int { value, span })
            }
        }
        TokenKind::FloatLiteral(v) => {
            let value = *v;
            cursor.bump();
            Ok(ConstantValue::Float { value, span: tok.span })
        }
        TokenKind::Ident | TokenKind::Keyword(_) => {
            let name = cursor.parse_type_name()?;
            Ok(ConstantValue::Ident(name))
        }
        TokenKind::Punct('{') => parse_aggregate(cursor),
        _ => Err(SyntaxError::Unexpected {
            expected: "an option value".to_string(),
            found: super::Cursor::describe(&tok),
            span: tok.span,
        }),
    }
}

fn parse_aggregate(cursor: &mut Cursor) -> Result<ConstantValue, SyntaxError> {
    let start = cursor.expect_punct('{')?;
    let mut fields = Vec::new();
    while cursor.eat_punct('}').is_none() {
        let name = parse_aggregate_field_name(cursor)?;
        if cursor.eat_punct(':').is_none() {
            // Aggregate message-typed fields may omit `:` before `{`.
        }
        let value = parse_constant(cursor)?;
        fields.push((name, value));
        cursor.eat_punct(',');
        cursor.eat_punct(';');
    }
    let end = cursor.peek_at(0).span;
    Ok(ConstantValue::Aggregate { fields, span: join(start, end) })
}

fn parse_aggregate_field_name(cursor: &mut Cursor) -> Result<Ident, SyntaxError> {
    if cursor.eat_punct('[').is_some() {
        let name = cursor.parse_type_name()?;
        cursor.expect_punct(']')?;
        Ok(Ident { text: name.to_dotted_string(), span: name.span })
    } else {
        cursor.expect_ident()
    }
}
