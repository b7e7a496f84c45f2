//! `EnumDescriptorProto` construction (§4.6). Enum values are registered
//! as siblings of the enum in the symbol table (`analyzer::declare`), but
//! in the descriptor they nest inside `EnumDescriptorProto.value[]` same
//! as protoc emits — the symbol-table shape and the descriptor shape are
//! deliberately different views of the same declarations.

use prost_types::{EnumDescriptorProto, EnumValueDescriptorProto};
use protoc3_parser::ast::{EnumMember, EnumNode, ReservedNode};

use super::options::{build_enum_options, build_enum_value_options};
use super::reserved::enum_reserved;

pub fn build_enum(node: &EnumNode) -> EnumDescriptorProto {
    let values = node
        .members
        .iter()
        .filter_map(|m| match m {
            EnumMember::Value(v) => Some(EnumValueDescriptorProto {
                name: Some(v.name.text.clone()),
                number: Some(v.number.0),
                options: build_enum_value_options(&v.options),
            }),
            _ => None,
        })
        .collect();

    let reserved_nodes: Vec<ReservedNode> = node
        .members
        .iter()
        .filter_map(|m| match m {
            EnumMember::Reserved(r) => Some(r.clone()),
            _ => None,
        })
        .collect();
    let (reserved_range, reserved_name) = enum_reserved(&reserved_nodes);

    let option_nodes: Vec<_> = node
        .members
        .iter()
        .filter_map(|m| match m {
            EnumMember::Option(o) => Some(o.clone()),
            _ => None,
        })
        .collect();

    EnumDescriptorProto {
        name: Some(node.name.text.clone()),
        value: values,
        options: build_enum_options(&option_nodes),
        reserved_range,
        reserved_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use protoc3_parser::ast::{EnumValueNode, Ident};
    use protoc3_parser::span::Span;

    #[test]
    fn builds_values_in_declaration_order() {
        let node = EnumNode {
            name: Ident { text: "Status".to_string(), span: Span::default() },
            members: vec![
                EnumMember::Value(EnumValueNode {
                    name: Ident { text: "UNKNOWN".to_string(), span: Span::default() },
                    number: (0, Span::default()),
                    options: Vec::new(),
                    span: Span::default(),
                    leading_comments: Vec::new(),
                }),
                EnumMember::Value(EnumValueNode {
                    name: Ident { text: "ACTIVE".to_string(), span: Span::default() },
                    number: (1, Span::default()),
                    options: Vec::new(),
                    span: Span::default(),
                    leading_comments: Vec::new(),
                }),
            ],
            span: Span::default(),
            leading_comments: Vec::new(),
        };
        let descriptor = build_enum(&node);
        assert_eq!(descriptor.value.len(), 2);
        assert_eq!(descriptor.value[0].name.as_deref(), Some("UNKNOWN"));
        assert_eq!(descriptor.value[1].number, Some(1));
    }
}
