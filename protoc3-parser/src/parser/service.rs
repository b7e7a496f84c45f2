//! Service declarations (§4.2 "Service", "Rpc"). The teacher's original
//! parser skipped service bodies wholesale (`service_ignore`, matching
//! balanced braces and discarding the contents) — this parser builds real
//! `RpcNode`s, including the streaming flags, since the descriptor builder
//! needs a `ServiceDescriptorProto`/`MethodDescriptorProto` for every RPC.

use crate::ast::{RpcNode, ServiceMember, ServiceNode};
use crate::token::{Keyword, TokenKind};

use super::option_::parse_option_statement;
use super::{join, Cursor, SyntaxError};

pub(super) fn parse_service(cursor: &mut Cursor) -> Result<ServiceNode, SyntaxError> {
    let start = cursor.expect_keyword(Keyword::Service)?;
    let name = cursor.expect_ident()?;
    cursor.expect_punct('{')?;

    let mut members = Vec::new();
    while cursor.eat_punct('}').is_none() {
        if cursor.eat_punct(';').is_some() {
            continue;
        }
        members.push(parse_service_member(cursor)?);
    }
    let end = cursor.peek_at(0).span;

    Ok(ServiceNode {
        name,
        members,
        span: join(start, end),
        leading_comments: Vec::new(),
    })
}

fn parse_service_member(cursor: &mut Cursor) -> Result<ServiceMember, SyntaxError> {
    if cursor.peek().kind == TokenKind::Keyword(Keyword::Option_) {
        return Ok(ServiceMember::Option(parse_option_statement(cursor)?));
    }
    Ok(ServiceMember::Rpc(parse_rpc(cursor)?))
}

fn parse_rpc(cursor: &mut Cursor) -> Result<RpcNode, SyntaxError> {
    let leading_comments = cursor.peek().leading_comments.clone();
    let start = cursor.expect_keyword(Keyword::Rpc)?;
    let name = cursor.expect_ident()?;

    cursor.expect_punct('(')?;
    let request_stream = cursor.eat_keyword(Keyword::Stream).is_some();
    let request_type = cursor.parse_type_name()?;
    cursor.expect_punct(')')?;

    cursor.expect_keyword(Keyword::Returns)?;

    cursor.expect_punct('(')?;
    let response_stream = cursor.eat_keyword(Keyword::Stream).is_some();
    let response_type = cursor.parse_type_name()?;
    cursor.expect_punct(')')?;

    let (options, end) = if cursor.eat_punct('{').is_some() {
        let mut options = Vec::new();
        while cursor.eat_punct('}').is_none() {
            if cursor.eat_punct(';').is_some() {
                continue;
            }
            options.push(parse_option_statement(cursor)?);
        }
        (options, cursor.peek_at(0).span)
    } else {
        let end = cursor.expect_punct(';')?;
        (Vec::new(), end)
    };

    Ok(RpcNode {
        name,
        request_type,
        request_stream,
        response_type,
        response_stream,
        options,
        span: join(start, end),
        leading_comments,
    })
}
