//! Enum declarations (§4.2 "Enum").

use crate::ast::{EnumMember, EnumNode, EnumValueNode, ReservedEnd, ReservedNode};
use crate::token::{Keyword, TokenKind};

use super::option_::parse_option_list;
use super::option_::parse_option_statement;
use super::{join, Cursor, SyntaxError};

pub(super) fn parse_enum(cursor: &mut Cursor) -> Result<EnumNode, SyntaxError> {
    let start = cursor.expect_keyword(Keyword::Enum)?;
    let name = cursor.expect_ident()?;
    cursor.expect_punct('{')?;

    let mut members = Vec::new();
    while cursor.eat_punct('}').is_none() {
        if cursor.eat_punct(';').is_some() {
            continue;
        }
        members.extend(parse_enum_member(cursor)?);
    }
    let end = cursor.peek_at(0).span;

    Ok(EnumNode {
        name,
        members,
        span: join(start, end),
        leading_comments: Vec::new(),
    })
}

fn parse_enum_member(cursor: &mut Cursor) -> Result<Vec<EnumMember>, SyntaxError> {
    match cursor.peek().kind {
        TokenKind::Keyword(Keyword::Option_) => {
            Ok(vec![EnumMember::Option(parse_option_statement(cursor)?)])
        }
        TokenKind::Keyword(Keyword::Reserved) => Ok(parse_reserved(cursor)?
            .into_iter()
            .map(EnumMember::Reserved)
            .collect()),
        _ => Ok(vec![EnumMember::Value(parse_enum_value(cursor)?)]),
    }
}

fn parse_enum_value(cursor: &mut Cursor) -> Result<EnumValueNode, SyntaxError> {
    let leading_comments = cursor.peek().leading_comments.clone();
    let start = cursor.peek().span;
    let name = cursor.expect_ident()?;
    cursor.expect_punct('=')?;
    let (value, number_span) = cursor.parse_signed_int()?;
    let options = if cursor.peek().kind == TokenKind::Punct('[') {
        parse_option_list(cursor)?
    } else {
        Vec::new()
    };
    let end = cursor.expect_punct(';')?;
    Ok(EnumValueNode {
        name,
        number: (value as i32, number_span),
        options,
        span: join(start, end),
        leading_comments,
    })
}

fn parse_reserved(cursor: &mut Cursor) -> Result<Vec<ReservedNode>, SyntaxError> {
    let start = cursor.expect_keyword(Keyword::Reserved)?;
    let mut items = vec![parse_reserved_item(cursor)?];
    while cursor.eat_punct(',').is_some() {
        items.push(parse_reserved_item(cursor)?);
    }
    let end = cursor.expect_punct(';')?;
    super::reject_if_mixed_reserved(&items, join(start, end))?;
    Ok(items)
}

fn parse_reserved_item(cursor: &mut Cursor) -> Result<ReservedNode, SyntaxError> {
    if let TokenKind::StringLiteral(_) = cursor.peek().kind {
        let (name, span) = cursor.expect_string()?;
        return Ok(ReservedNode::Name { name, span });
    }
    let (start_val, start_span) = cursor.parse_signed_int()?;
    if cursor.eat_keyword(Keyword::To).is_some() {
        let end = if cursor.peek().kind == TokenKind::Ident && cursor.peek().literal == "max" {
            cursor.bump();
            ReservedEnd::Max
        } else {
            let (v, _) = cursor.parse_signed_int()?;
            ReservedEnd::Int(v)
        };
        Ok(ReservedNode::Range { start: start_val, end: Some(end), span: start_span })
    } else {
        Ok(ReservedNode::Range { start: start_val, end: None, span: start_span })
    }
}
