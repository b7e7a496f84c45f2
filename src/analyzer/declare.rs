//! Declaration pass (§4.4.1): walks a file's AST in lexical order and
//! inserts every message, enum, enum value, service, rpc, oneof, and field
//! into the shared [`SymbolTable`], collecting duplicate-symbol errors
//! rather than stopping at the first one (fields/numbers are individually
//! duplicate-checked by `analyzer::rules`, which runs per message rather
//! than through the symbol table, since field numbers are scoped to a
//! message, not globally qualified).

use protoc3_parser::ast::{EnumMember, EnumNode, FileNode, MessageMember, MessageNode, ServiceNode, TopLevelItem};

use crate::error::SemanticError;
use crate::symbol_table::{SymbolKind, SymbolTable};

pub fn declare_file(
    table: &mut SymbolTable,
    file: &FileNode,
    package: Option<&str>,
    max_depth: usize,
    errors: &mut Vec<SemanticError>,
) {
    for item in &file.items {
        match item {
            TopLevelItem::Message(m) => declare_message(table, m, package, 1, max_depth, errors),
            TopLevelItem::Enum(e) => declare_enum(table, e, package, errors),
            TopLevelItem::Service(s) => declare_service(table, s, package, errors),
            TopLevelItem::Extend(_) | TopLevelItem::Import(_) | TopLevelItem::Package(_) | TopLevelItem::Option(_) => {}
        }
    }
}

fn push_duplicate(errors: &mut Vec<SemanticError>, err: crate::symbol_table::DuplicateSymbol, span: protoc3_parser::span::Span) {
    errors.push(SemanticError::DuplicateSymbol {
        name: err.name,
        span,
        first_span: err.first_span,
    });
}

fn declare_message(
    table: &mut SymbolTable,
    node: &MessageNode,
    parent: Option<&str>,
    depth: usize,
    max_depth: usize,
    errors: &mut Vec<SemanticError>,
) {
    if depth > max_depth {
        errors.push(SemanticError::RecursionLimitExceeded { limit: max_depth });
        return;
    }

    let fqn = match table.enter(parent, SymbolKind::Message, &node.name.text, node.span) {
        Ok(fqn) => fqn,
        Err(e) => {
            push_duplicate(errors, e, node.span);
            // Even on a duplicate, keep walking under the would-be FQN so a
            // single duplicate-name mistake doesn't cascade into spurious
            // "unresolved type" errors for everything nested inside it.
            match parent {
                Some(p) if !p.is_empty() => format!("{p}.{}", node.name.text),
                _ => node.name.text.clone(),
            }
        }
    };

    for member in &node.members {
        match member {
            MessageMember::Field(f) => {
                if let Err(e) = table.enter(Some(&fqn), SymbolKind::Field, &f.name.text, f.span) {
                    push_duplicate(errors, e, f.span);
                }
            }
            MessageMember::Oneof(o) => {
                if let Err(e) = table.enter(Some(&fqn), SymbolKind::Oneof, &o.name.text, o.span) {
                    push_duplicate(errors, e, o.span);
                }
                for f in &o.fields {
                    if let Err(e) = table.enter(Some(&fqn), SymbolKind::Field, &f.name.text, f.span) {
                        push_duplicate(errors, e, f.span);
                    }
                }
            }
            MessageMember::Message(inner) => declare_message(table, inner, Some(&fqn), depth + 1, max_depth, errors),
            MessageMember::Enum(inner) => declare_enum(table, inner, Some(&fqn), errors),
            MessageMember::Extend(_) | MessageMember::Option(_) | MessageMember::Reserved(_) | MessageMember::Extensions(_) => {}
        }
    }
}

/// Enum *values* are registered as siblings of the enum itself (at the
/// enum's enclosing scope), matching real proto scoping: an unqualified
/// reference to an enum constant does not go through the enum's own name.
fn declare_enum(table: &mut SymbolTable, node: &EnumNode, parent: Option<&str>, errors: &mut Vec<SemanticError>) {
    if let Err(e) = table.enter(parent, SymbolKind::Enum, &node.name.text, node.span) {
        push_duplicate(errors, e, node.span);
    }

    for member in &node.members {
        if let EnumMember::Value(v) = member {
            if let Err(e) = table.enter(parent, SymbolKind::EnumValue, &v.name.text, v.span) {
                push_duplicate(errors, e, v.span);
            }
        }
    }
}

fn declare_service(table: &mut SymbolTable, node: &ServiceNode, parent: Option<&str>, errors: &mut Vec<SemanticError>) {
    let fqn = match table.enter(parent, SymbolKind::Service, &node.name.text, node.span) {
        Ok(fqn) => fqn,
        Err(e) => {
            push_duplicate(errors, e, node.span);
            match parent {
                Some(p) if !p.is_empty() => format!("{p}.{}", node.name.text),
                _ => node.name.text.clone(),
            }
        }
    };
    for member in &node.members {
        if let protoc3_parser::ast::ServiceMember::Rpc(rpc) = member {
            if let Err(e) = table.enter(Some(&fqn), SymbolKind::Rpc, &rpc.name.text, rpc.span) {
                push_duplicate(errors, e, rpc.span);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use protoc3_parser::ast::Ident;
    use protoc3_parser::span::Span;

    fn nest(depth: usize) -> MessageNode {
        let leaf = MessageNode {
            name: Ident { text: "Leaf".to_string(), span: Span::default() },
            members: Vec::new(),
            span: Span::default(),
            leading_comments: Vec::new(),
        };
        (0..depth).fold(leaf, |inner, i| MessageNode {
            name: Ident { text: format!("M{i}"), span: Span::default() },
            members: vec![MessageMember::Message(inner)],
            span: Span::default(),
            leading_comments: Vec::new(),
        })
    }

    #[test]
    fn nesting_within_the_limit_declares_cleanly() {
        let mut table = SymbolTable::new();
        let mut errors = Vec::new();
        declare_message(&mut table, &nest(3), None, 1, 10, &mut errors);
        assert!(errors.is_empty());
    }

    #[test]
    fn nesting_past_the_limit_raises_recursion_limit_exceeded() {
        let mut table = SymbolTable::new();
        let mut errors = Vec::new();
        declare_message(&mut table, &nest(10), None, 1, 5, &mut errors);
        assert!(errors.iter().any(|e| matches!(e, SemanticError::RecursionLimitExceeded { limit: 5 })));
    }
}
