//! `DescriptorProto` construction (§4.6) — the central transform the rest
//! of `descriptor` hangs off of. Grounded on the `to_message_descriptor`/
//! `to_field_descriptor` shape in
//! `examples/other_examples/692f22c6_andrewhickman-protox__src-ast-convert.rs.rs`,
//! filled in with the map/oneof/reserved-range handling that reference
//! left stubbed.

use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::{DescriptorProto, FieldDescriptorProto};
use protoc3_parser::ast::{ExtendNode, FieldNode, FieldType, MessageMember, MessageNode};

use crate::analyzer::resolve::ResolvedTypes;

use super::enums::build_enum;
use super::map_entry::build_map_entry;
use super::naming::to_json_name;
use super::oneof::{plan_oneofs, OneofPlan};
use super::options::{build_field_options, build_message_options};
use super::reserved::{extension_ranges, message_reserved};
use super::scalar::scalar_to_proto_type;

/// `parent_fqn` is the fully-qualified name of the *enclosing* scope
/// (package, or containing message) without a leading dot — `""` at the
/// file's top level with no package.
pub fn build_message(node: &MessageNode, parent_fqn: &str, resolved: &ResolvedTypes) -> DescriptorProto {
    let fqn = qualify(parent_fqn, &node.name.text);
    let oneof_plan = plan_oneofs(node);

    let mut fields = Vec::new();
    let mut nested_types = Vec::new();
    let mut enum_types = Vec::new();
    let mut extensions = Vec::new();
    let mut reserved_nodes = Vec::new();
    let mut extensions_ranges = Vec::new();
    let mut option_nodes = Vec::new();

    for member in &node.members {
        match member {
            MessageMember::Field(f) => {
                fields.push(build_field_descriptor(f, &fqn, resolved, &oneof_plan, &mut nested_types));
            }
            MessageMember::Oneof(o) => {
                for f in &o.fields {
                    fields.push(build_field_descriptor(f, &fqn, resolved, &oneof_plan, &mut nested_types));
                }
            }
            MessageMember::Message(inner) => nested_types.push(build_message(inner, &fqn, resolved)),
            MessageMember::Enum(inner) => enum_types.push(build_enum(inner)),
            MessageMember::Extend(e) => extensions.extend(build_extension_fields(e, resolved)),
            MessageMember::Option(o) => option_nodes.push(o.clone()),
            MessageMember::Reserved(r) => reserved_nodes.push(r.clone()),
            MessageMember::Extensions(ext) => extensions_ranges.push(ext.clone()),
        }
    }

    let (reserved_range, reserved_name) = message_reserved(&reserved_nodes);

    DescriptorProto {
        name: Some(node.name.text.clone()),
        field: fields,
        extension: extensions,
        nested_type: nested_types,
        enum_type: enum_types,
        extension_range: extension_ranges(&extensions_ranges),
        oneof_decl: oneof_plan.oneofs,
        options: build_message_options(&option_nodes),
        reserved_range,
        reserved_name,
        ..Default::default()
    }
}

fn build_field_descriptor(
    f: &FieldNode,
    parent_fqn: &str,
    resolved: &ResolvedTypes,
    oneof_plan: &OneofPlan,
    nested_types: &mut Vec<DescriptorProto>,
) -> FieldDescriptorProto {
    let (r#type, type_name, label) = match &f.ty {
        FieldType::Scalar(s) => (scalar_to_proto_type(s) as i32, None, field_label(f.label)),
        FieldType::Named(name) => {
            let resolved_ty = resolved
                .get(&name.span)
                .expect("field type was resolved by the analyzer before descriptor building ran");
            let ty = if resolved_ty.is_enum { Type::Enum } else { Type::Message };
            (ty as i32, Some(format!(".{}", resolved_ty.fully_qualified_name)), field_label(f.label))
        }
        FieldType::Map(map) => {
            let (entry, entry_fqn) = build_map_entry(f, map, parent_fqn, resolved);
            nested_types.push(entry);
            (Type::Message as i32, Some(entry_fqn), Label::Repeated)
        }
    };

    let is_synthetic_optional = oneof_plan.is_synthetic(f.span);

    FieldDescriptorProto {
        name: Some(f.name.text.clone()),
        number: Some(f.number.0 as i32),
        label: Some(label as i32),
        r#type: Some(r#type),
        type_name,
        json_name: Some(to_json_name(&f.name.text)),
        oneof_index: oneof_plan.oneof_index_for(f.span),
        options: build_field_options(&f.options),
        proto3_optional: if is_synthetic_optional { Some(true) } else { None },
        ..Default::default()
    }
}

fn field_label(label: protoc3_parser::ast::FieldLabel) -> Label {
    use protoc3_parser::ast::FieldLabel::*;
    match label {
        Repeated => Label::Repeated,
        Optional | Implicit => Label::Optional,
    }
}

/// `extend` blocks nested in a message contribute to that message's own
/// `extension[]` list rather than the file's (descriptor.proto models
/// nested extends this way so generated code can scope accessors to the
/// declaring message).
pub fn build_extension_fields(node: &ExtendNode, resolved: &ResolvedTypes) -> Vec<FieldDescriptorProto> {
    let extendee = resolved
        .get(&node.extendee.span)
        .map(|r| format!(".{}", r.fully_qualified_name))
        .unwrap_or_else(|| node.extendee.to_dotted_string());

    node.fields
        .iter()
        .map(|f| {
            let (r#type, type_name) = match &f.ty {
                FieldType::Scalar(s) => (scalar_to_proto_type(s) as i32, None),
                FieldType::Named(name) => {
                    let resolved_ty = resolved
                        .get(&name.span)
                        .expect("extension field type was resolved by the analyzer before descriptor building ran");
                    let ty = if resolved_ty.is_enum { Type::Enum } else { Type::Message };
                    (ty as i32, Some(format!(".{}", resolved_ty.fully_qualified_name)))
                }
                FieldType::Map(_) => unreachable!("map fields cannot appear in an `extend` block (§3.2 grammar)"),
            };
            FieldDescriptorProto {
                name: Some(f.name.text.clone()),
                number: Some(f.number.0 as i32),
                label: Some(field_label(f.label) as i32),
                r#type: Some(r#type),
                type_name,
                extendee: Some(extendee.clone()),
                json_name: Some(to_json_name(&f.name.text)),
                options: build_field_options(&f.options),
                ..Default::default()
            }
        })
        .collect()
}

pub fn qualify(parent_fqn: &str, short: &str) -> String {
    if parent_fqn.is_empty() {
        short.to_string()
    } else {
        format!("{parent_fqn}.{short}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use protoc3_parser::ast::{FieldLabel, Ident, ScalarType};
    use protoc3_parser::span::Span;

    fn scalar_field(name: &str, number: i64, label: FieldLabel) -> FieldNode {
        FieldNode {
            label,
            ty: FieldType::Scalar(ScalarType::Int32),
            name: Ident { text: name.to_string(), span: Span::default() },
            number: (number, Span::default()),
            options: Vec::new(),
            span: Span::default(),
            leading_comments: Vec::new(),
        }
    }

    #[test]
    fn builds_a_flat_message() {
        let node = MessageNode {
            name: Ident { text: "Point".to_string(), span: Span::default() },
            members: vec![
                MessageMember::Field(scalar_field("x", 1, FieldLabel::Implicit)),
                MessageMember::Field(scalar_field("y", 2, FieldLabel::Implicit)),
            ],
            span: Span::default(),
            leading_comments: Vec::new(),
        };
        let resolved = ResolvedTypes::new();
        let descriptor = build_message(&node, "pkg", &resolved);
        assert_eq!(descriptor.name.as_deref(), Some("Point"));
        assert_eq!(descriptor.field.len(), 2);
        assert_eq!(descriptor.field[0].json_name.as_deref(), Some("x"));
        assert_eq!(descriptor.field[0].label, Some(Label::Optional as i32));
    }

    #[test]
    fn proto3_optional_field_gets_synthetic_oneof() {
        let node = MessageNode {
            name: Ident { text: "M".to_string(), span: Span::default() },
            members: vec![MessageMember::Field(scalar_field("maybe", 1, FieldLabel::Optional))],
            span: Span::default(),
            leading_comments: Vec::new(),
        };
        let resolved = ResolvedTypes::new();
        let descriptor = build_message(&node, "", &resolved);
        assert_eq!(descriptor.oneof_decl.len(), 1);
        assert_eq!(descriptor.oneof_decl[0].name.as_deref(), Some("_maybe"));
        assert_eq!(descriptor.field[0].oneof_index, Some(0));
        assert_eq!(descriptor.field[0].proto3_optional, Some(true));
    }
}
