//! Resolution pass (§4.4.2): resolves every plain/qualified type reference
//! against the symbol table and records, for each one, whether it denotes
//! a message or an enum — the disambiguation the parser alone cannot make
//! (§9 "Open question — enum-field-type disambiguation during parse").
//!
//! AST nodes aren't mutated in place (the parser crate's `ast` module has
//! no notion of "resolved" field types); instead this pass builds a side
//! table keyed by the referring `TypeName`'s span, which `descriptor`
//! consults when it needs a field's `TYPE_MESSAGE`/`TYPE_ENUM` tag and
//! fully-qualified `type_name`.

use std::collections::HashMap;

use protoc3_parser::ast::{
    ExtendNode, FieldNode, FieldType, FileNode, MessageMember, MessageNode, RpcNode,
    ServiceMember, ServiceNode, TopLevelItem, TypeName,
};
use protoc3_parser::span::Span;

use crate::error::SemanticError;
use crate::symbol_table::{SymbolKind, SymbolTable};
use crate::well_known::OPTIONS_MESSAGES;

#[derive(Debug, Clone)]
pub struct ResolvedType {
    pub fully_qualified_name: String,
    pub is_enum: bool,
}

pub type ResolvedTypes = HashMap<Span, ResolvedType>;

struct Ctx<'a> {
    table: &'a SymbolTable,
    scope_chain: Vec<String>,
    resolved: ResolvedTypes,
    errors: Vec<SemanticError>,
    allow_extensions: bool,
}

pub fn resolve_file(
    table: &SymbolTable,
    file: &FileNode,
    package: Option<&str>,
    allow_extensions: bool,
) -> (ResolvedTypes, Vec<SemanticError>) {
    let mut ctx = Ctx {
        table,
        scope_chain: package.into_iter().map(str::to_string).collect(),
        resolved: HashMap::new(),
        errors: Vec::new(),
        allow_extensions,
    };

    for item in &file.items {
        match item {
            TopLevelItem::Message(m) => ctx.resolve_message(m),
            TopLevelItem::Enum(_) => {}
            TopLevelItem::Service(s) => ctx.resolve_service(s),
            TopLevelItem::Extend(e) => ctx.resolve_extend(e),
            TopLevelItem::Import(_) | TopLevelItem::Package(_) | TopLevelItem::Option(_) => {}
        }
    }

    (ctx.resolved, ctx.errors)
}

impl<'a> Ctx<'a> {
    fn resolve_type_name(&mut self, name: &TypeName) {
        let dotted = name.to_dotted_string();
        match self.table.lookup(&self.scope_chain, &dotted) {
            Some(sym) if sym.kind == SymbolKind::Message => {
                self.resolved.insert(
                    name.span,
                    ResolvedType { fully_qualified_name: sym.fully_qualified_name.clone(), is_enum: false },
                );
            }
            Some(sym) if sym.kind == SymbolKind::Enum => {
                self.resolved.insert(
                    name.span,
                    ResolvedType { fully_qualified_name: sym.fully_qualified_name.clone(), is_enum: true },
                );
            }
            _ => {
                self.errors.push(SemanticError::UnresolvedType { name: dotted, span: name.span });
            }
        }
    }

    fn resolve_field(&mut self, field: &FieldNode) {
        match &field.ty {
            FieldType::Named(name) => self.resolve_type_name(name),
            FieldType::Map(map) => {
                if let FieldType::Named(name) = &map.value {
                    self.resolve_type_name(name);
                }
            }
            FieldType::Scalar(_) => {}
        }
    }

    /// Pushes the message's own fully-qualified name onto the scope chain
    /// before resolving its members, so a field can reference a sibling
    /// nested type by its short name (e.g. `message M { message Inner {}
    /// Inner i = 1; }`) — not just types declared in an enclosing scope.
    fn resolve_message(&mut self, node: &MessageNode) {
        let fqn = self.qualify(&node.name.text);
        self.scope_chain.push(fqn);
        for member in &node.members {
            match member {
                MessageMember::Field(f) => self.resolve_field(f),
                MessageMember::Oneof(o) => {
                    for f in &o.fields {
                        self.resolve_field(f);
                    }
                }
                MessageMember::Message(inner) => self.resolve_message(inner),
                MessageMember::Enum(_) => {}
                MessageMember::Extend(e) => self.resolve_extend(e),
                MessageMember::Option(_) | MessageMember::Reserved(_) | MessageMember::Extensions(_) => {}
            }
        }
        self.scope_chain.pop();
    }

    fn resolve_service(&mut self, node: &ServiceNode) {
        for member in &node.members {
            if let ServiceMember::Rpc(rpc) = member {
                self.resolve_rpc(rpc);
            }
        }
    }

    fn resolve_rpc(&mut self, rpc: &RpcNode) {
        self.resolve_type_name(&rpc.request_type);
        self.resolve_type_name(&rpc.response_type);
    }

    fn resolve_extend(&mut self, extend: &ExtendNode) {
        if !self.allow_extensions {
            self.errors.push(SemanticError::ExtensionsDisabled { span: extend.span });
            return;
        }
        let dotted = extend.extendee.to_dotted_string();
        let resolved = self.table.lookup(&self.scope_chain, &dotted);
        match resolved {
            Some(sym) if OPTIONS_MESSAGES.contains(&sym.fully_qualified_name.as_str()) => {
                self.resolved.insert(
                    extend.extendee.span,
                    ResolvedType { fully_qualified_name: sym.fully_qualified_name.clone(), is_enum: false },
                );
            }
            Some(sym) => {
                self.errors.push(SemanticError::ExtendNonOptionsMessage {
                    extendee: sym.fully_qualified_name.clone(),
                    span: extend.span,
                });
            }
            None => {
                self.errors.push(SemanticError::UnresolvedType { name: dotted, span: extend.extendee.span });
            }
        }
        for f in &extend.fields {
            self.resolve_field(f);
        }
    }

    fn qualify(&self, short: &str) -> String {
        match self.scope_chain.last() {
            Some(scope) if !scope.is_empty() => format!("{scope}.{short}"),
            _ => short.to_string(),
        }
    }
}
