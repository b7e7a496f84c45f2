//! Message and extend declarations (§4.2 "Message", "Extend").

use crate::ast::{
    ExtendNode, ExtensionsRangeNode, MessageMember, MessageNode, OneofNode, ReservedEnd,
    ReservedNode,
};
use crate::token::{Keyword, TokenKind};

use super::field::parse_field;
use super::option_::parse_option_statement;
use super::{join, Cursor, SyntaxError};

pub(super) fn parse_message(cursor: &mut Cursor) -> Result<MessageNode, SyntaxError> {
    let start = cursor.expect_keyword(Keyword::Message)?;
    let name = cursor.expect_ident()?;
    cursor.expect_punct('{')?;

    let mut members = Vec::new();
    while cursor.eat_punct('}').is_none() {
        if cursor.eat_punct(';').is_some() {
            continue;
        }
        members.extend(parse_message_member(cursor)?);
    }
    let end = cursor.peek_at(0).span;

    Ok(MessageNode {
        name,
        members,
        span: join(start, end),
        leading_comments: Vec::new(),
    })
}

/// Most members are one statement, one `MessageMember`. `reserved` is the
/// exception — `reserved 2, 15, 9 to 11;` is one statement but declares
/// three separate reserved items — so this returns a `Vec` instead of
/// forcing every caller to flatten.
fn parse_message_member(cursor: &mut Cursor) -> Result<Vec<MessageMember>, SyntaxError> {
    match cursor.peek().kind {
        TokenKind::Keyword(Keyword::Message) => {
            Ok(vec![MessageMember::Message(parse_message(cursor)?)])
        }
        TokenKind::Keyword(Keyword::Enum) => {
            Ok(vec![MessageMember::Enum(super::enum_::parse_enum(cursor)?)])
        }
        TokenKind::Keyword(Keyword::Oneof) => Ok(vec![MessageMember::Oneof(parse_oneof(cursor)?)]),
        TokenKind::Keyword(Keyword::Option_) => {
            Ok(vec![MessageMember::Option(parse_option_statement(cursor)?)])
        }
        TokenKind::Keyword(Keyword::Reserved) => Ok(parse_reserved(cursor)?
            .into_iter()
            .map(MessageMember::Reserved)
            .collect()),
        TokenKind::Keyword(Keyword::Extensions) => {
            Ok(vec![MessageMember::Extensions(parse_extensions(cursor)?)])
        }
        TokenKind::Keyword(Keyword::Extend) => Ok(vec![MessageMember::Extend(parse_extend(cursor)?)]),
        _ => Ok(vec![MessageMember::Field(parse_field(cursor)?)]),
    }
}

pub(super) fn parse_extend(cursor: &mut Cursor) -> Result<ExtendNode, SyntaxError> {
    let start = cursor.expect_keyword(Keyword::Extend)?;
    let extendee = cursor.parse_type_name()?;
    cursor.expect_punct('{')?;
    let mut fields = Vec::new();
    while cursor.eat_punct('}').is_none() {
        if cursor.eat_punct(';').is_some() {
            continue;
        }
        fields.push(parse_field(cursor)?);
    }
    let end = cursor.peek_at(0).span;
    Ok(ExtendNode {
        extendee,
        fields,
        span: join(start, end),
        leading_comments: Vec::new(),
    })
}

fn parse_oneof(cursor: &mut Cursor) -> Result<OneofNode, SyntaxError> {
    let start = cursor.expect_keyword(Keyword::Oneof)?;
    let name = cursor.expect_ident()?;
    cursor.expect_punct('{')?;
    let mut fields = Vec::new();
    let mut options = Vec::new();
    while cursor.eat_punct('}').is_none() {
        if cursor.eat_punct(';').is_some() {
            continue;
        }
        if cursor.peek().kind == TokenKind::Keyword(Keyword::Option_) {
            options.push(parse_option_statement(cursor)?);
        } else {
            fields.push(parse_field(cursor)?);
        }
    }
    let end = cursor.peek_at(0).span;
    Ok(OneofNode {
        name,
        fields,
        options,
        span: join(start, end),
        leading_comments: Vec::new(),
    })
}

/// `reserved 1, 2 to 5, "foo";` — each comma-separated item is classified
/// independently, but §4.2 forbids mixing number ranges and quoted names
/// within a single statement, so this checks that once the whole statement
/// is in hand (`reserved 1, "foo";` is two legal *statements*' worth of
/// content squeezed into one, which is exactly what's disallowed).
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

fn parse_extensions(cursor: &mut Cursor) -> Result<ExtensionsRangeNode, SyntaxError> {
    let start = cursor.expect_keyword(Keyword::Extensions)?;
    let (start_val, _) = cursor.parse_signed_int()?;
    let end = if cursor.eat_keyword(Keyword::To).is_some() {
        if cursor.peek().kind == TokenKind::Ident && cursor.peek().literal == "max" {
            cursor.bump();
            Some(ReservedEnd::Max)
        } else {
            let (v, _) = cursor.parse_signed_int()?;
            Some(ReservedEnd::Int(v))
        }
    } else {
        None
    };
    let options = if cursor.peek().kind == TokenKind::Punct('[') {
        super::option_::parse_option_list(cursor)?
    } else {
        Vec::new()
    };
    let semi = cursor.expect_punct(';')?;
    Ok(ExtensionsRangeNode {
        start: start_val,
        end,
        options,
        span: join(start, semi),
    })
}
