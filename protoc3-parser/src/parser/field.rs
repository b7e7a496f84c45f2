//! Field declarations, including `map<K, V>` fields (§4.2 "Field",
//! "MapField").

use crate::ast::{FieldLabel, FieldNode, FieldType, MapType, ScalarType};
use crate::token::{Keyword, TokenKind};

use super::option_::parse_option_list;
use super::{join, Cursor, SyntaxError};

fn scalar_keyword(kw: Keyword) -> Option<ScalarType> {
    use Keyword::*;
    Some(match kw {
        Double => ScalarType::Double,
        Float => ScalarType::Float,
        Int32 => ScalarType::Int32,
        Int64 => ScalarType::Int64,
        Uint32 => ScalarType::Uint32,
        Uint64 => ScalarType::Uint64,
        Sint32 => ScalarType::Sint32,
        Sint64 => ScalarType::Sint64,
        Fixed32 => ScalarType::Fixed32,
        Fixed64 => ScalarType::Fixed64,
        Sfixed32 => ScalarType::Sfixed32,
        Sfixed64 => ScalarType::Sfixed64,
        Bool => ScalarType::Bool,
        String_ => ScalarType::String,
        Bytes => ScalarType::Bytes,
        _ => return None,
    })
}

/// `message`-body field, or `extend`-body field. `group` is recognized and
/// rejected explicitly (`GroupFieldUnsupported`) rather than falling
/// through to a generic "unexpected token", since group fields are a
/// deliberate proto2-only Non-goal, not a grammar mistake.
pub(super) fn parse_field(cursor: &mut Cursor) -> Result<FieldNode, SyntaxError> {
    let leading_comments = cursor.peek().leading_comments.clone();
    let start = cursor.peek().span;

    if let Some(span) = cursor.eat_keyword(Keyword::Required) {
        return Err(SyntaxError::RequiredFieldUnsupported { span });
    }

    let label = if cursor.eat_keyword(Keyword::Repeated).is_some() {
        FieldLabel::Repeated
    } else if cursor.eat_keyword(Keyword::Optional).is_some() {
        FieldLabel::Optional
    } else {
        FieldLabel::Implicit
    };

    if cursor.peek().kind == TokenKind::Ident
        && cursor.peek().literal == "group"
        && matches!(cursor.peek_at(1).kind, TokenKind::Ident)
        && cursor.peek_at(2).kind == TokenKind::Punct('{')
    {
        return Err(SyntaxError::GroupFieldUnsupported { span: cursor.peek().span });
    }

    let ty = if cursor.eat_keyword(Keyword::Map).is_some() {
        FieldType::Map(Box::new(parse_map_type(cursor)?))
    } else if let Some(kw) = keyword_if_scalar(cursor) {
        cursor.bump();
        FieldType::Scalar(scalar_keyword(kw).unwrap())
    } else {
        FieldType::Named(cursor.parse_type_name()?)
    };

    let name = cursor.expect_ident()?;
    cursor.expect_punct('=')?;
    let (number, number_span) = cursor.parse_signed_int()?;

    let options = if cursor.peek().kind == TokenKind::Punct('[') {
        parse_option_list(cursor)?
    } else {
        Vec::new()
    };

    let end = cursor.expect_punct(';')?;

    Ok(FieldNode {
        label,
        ty,
        name,
        number: (number, number_span),
        options,
        span: join(start, end),
        leading_comments,
    })
}

fn keyword_if_scalar(cursor: &Cursor) -> Option<Keyword> {
    match cursor.peek().kind {
        TokenKind::Keyword(kw) if kw.is_scalar_type() => Some(kw),
        _ => None,
    }
}

fn parse_map_type(cursor: &mut Cursor) -> Result<MapType, SyntaxError> {
    let start = cursor.expect_punct('<')?;
    let key_tok = cursor.peek().clone();
    let key = match key_tok.kind {
        TokenKind::Keyword(kw) => scalar_keyword(kw).ok_or_else(|| SyntaxError::Unexpected {
            expected: "a map key type (an integral, bool, or string scalar type)".to_string(),
            found: Cursor::describe(&key_tok),
            span: key_tok.span,
        })?,
        _ => {
            return Err(SyntaxError::Unexpected {
                expected: "a map key type (an integral, bool, or string scalar type)".to_string(),
                found: Cursor::describe(&key_tok),
                span: key_tok.span,
            })
        }
    };
    cursor.bump();
    let key_span = key_tok.span;
    cursor.expect_punct(',')?;

    // A map's value type is a scalar or message/enum type name — never
    // `map` itself. proto3's `type` production (unlike a field's type
    // position) has no "map" alternative, so `map<K, map<K2, V2>>` is
    // rejected here rather than accepted and panicking later in
    // `descriptor::map_entry`, which assumes this can't happen.
    if cursor.peek().kind == TokenKind::Keyword(Keyword::Map) {
        let tok = cursor.peek().clone();
        return Err(SyntaxError::Unexpected {
            expected: "a map value type (a scalar, message, or enum type — not another `map`)".to_string(),
            found: Cursor::describe(&tok),
            span: tok.span,
        });
    }

    let value = if let Some(kw) = keyword_if_scalar(cursor) {
        cursor.bump();
        FieldType::Scalar(scalar_keyword(kw).unwrap())
    } else {
        FieldType::Named(cursor.parse_type_name()?)
    };

    let end = cursor.expect_punct('>')?;
    Ok(MapType { key, key_span, value, span: join(start, end) })
}
