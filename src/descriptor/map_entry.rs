//! Map field synthesis (§4.6 "Map field synthesis"): `map<K, V> m = N;`
//! desugars to a repeated message field of a synthesized nested
//! `<PascalCase(m)>Entry` message with `key = 1`, `value = 2`, and
//! `MessageOptions.map_entry = true` — the same rewrite protoc performs
//! before a `.proto` file's descriptor ever reaches a code generator.
//! `examples/other_examples/95c056df_tottoto-protox__src-check-mod.rs.rs`
//! leaves this exact synthesis as a `todo!()`; this is the filled-in form.

use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::{DescriptorProto, FieldDescriptorProto};
use protoc3_parser::ast::{FieldNode, FieldType, MapType};

use super::naming::to_pascal_case;
use super::options::map_entry_options;
use super::scalar::scalar_to_proto_type;
use crate::analyzer::resolve::ResolvedTypes;

/// Builds the synthesized entry message for one map field, plus the
/// fully-qualified (leading-dot) name the map field itself should carry as
/// its `type_name`.
pub fn build_map_entry(
    field: &FieldNode,
    map: &MapType,
    parent_fqn: &str,
    resolved: &ResolvedTypes,
) -> (DescriptorProto, String) {
    let entry_name = format!("{}Entry", to_pascal_case(&field.name.text));

    let key_field = FieldDescriptorProto {
        name: Some("key".to_string()),
        number: Some(1),
        label: Some(Label::Optional as i32),
        r#type: Some(scalar_to_proto_type(&map.key) as i32),
        json_name: Some("key".to_string()),
        ..Default::default()
    };

    let (value_type, value_type_name) = match &map.value {
        FieldType::Scalar(s) => (scalar_to_proto_type(s) as i32, None),
        FieldType::Named(name) => {
            let resolved_ty = resolved
                .get(&name.span)
                .expect("map value type was resolved by the analyzer before descriptor building ran");
            let ty = if resolved_ty.is_enum { Type::Enum } else { Type::Message };
            (ty as i32, Some(format!(".{}", resolved_ty.fully_qualified_name)))
        }
        FieldType::Map(_) => unreachable!("`map<K, map<..>>` is rejected by the grammar (§3.2)"),
    };
    let value_field = FieldDescriptorProto {
        name: Some("value".to_string()),
        number: Some(2),
        label: Some(Label::Optional as i32),
        r#type: Some(value_type),
        type_name: value_type_name,
        json_name: Some("value".to_string()),
        ..Default::default()
    };

    let entry = DescriptorProto {
        name: Some(entry_name.clone()),
        field: vec![key_field, value_field],
        options: Some(map_entry_options()),
        ..Default::default()
    };

    let fqn = if parent_fqn.is_empty() {
        format!(".{entry_name}")
    } else {
        format!(".{parent_fqn}.{entry_name}")
    };
    (entry, fqn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use protoc3_parser::ast::{FieldLabel, Ident, ScalarType};
    use protoc3_parser::span::Span;

    fn field(name: &str) -> FieldNode {
        FieldNode {
            label: FieldLabel::Repeated,
            ty: FieldType::Map(Box::new(MapType {
                key: ScalarType::String,
                key_span: Span::default(),
                value: FieldType::Scalar(ScalarType::Int32),
                span: Span::default(),
            })),
            name: Ident { text: name.to_string(), span: Span::default() },
            number: (1, Span::default()),
            options: Vec::new(),
            span: Span::default(),
            leading_comments: Vec::new(),
        }
    }

    #[test]
    fn synthesizes_entry_with_scalar_value() {
        let f = field("counts");
        let FieldType::Map(map) = &f.ty else { unreachable!() };
        let resolved = ResolvedTypes::new();
        let (entry, fqn) = build_map_entry(&f, map, "pkg.Outer", &resolved);
        assert_eq!(entry.name.as_deref(), Some("CountsEntry"));
        assert_eq!(fqn, ".pkg.Outer.CountsEntry");
        assert_eq!(entry.options.unwrap().map_entry, Some(true));
        assert_eq!(entry.field[0].name.as_deref(), Some("key"));
        assert_eq!(entry.field[1].r#type, Some(Type::Int32 as i32));
    }
}
