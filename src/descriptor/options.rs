//! Option packing (§4.6 "Options mapping"): each declared `option` is
//! either one of the standard fields enumerated in §4.6, in which case it
//! is set directly on the typed `*Options` struct, or it falls through to
//! `uninterpreted_option[]` — exactly the same two-path split `protox`'s
//! `ast::Option::to_file_options` (etc.) document with `todo!()` stubs in
//! `examples/other_examples/…-protox__src-ast-convert.rs.rs`; this module
//! is the filled-in version of those stubs, generalized to every option
//! scope in the descriptor schema rather than just `FileOptions`.

use log::warn;
use prost_types::{
    field_options, file_options, method_options, uninterpreted_option, EnumOptions,
    EnumValueOptions, FieldOptions, FileOptions, MessageOptions, MethodOptions, OneofOptions,
    ServiceOptions, UninterpretedOption,
};
use protoc3_parser::ast::{ConstantValue, OptionNode};

/// An option name is "plain" (eligible for standard-field lookup) only
/// when it is a single, non-parenthesized, undotted identifier — anything
/// else (an extension part, or a dotted path like `foo.bar`) can only ever
/// name a custom option and always falls through to `uninterpreted_option`.
fn plain_name(node: &OptionNode) -> Option<&str> {
    match node.name_parts.as_slice() {
        [part] if !part.is_extension && part.name.parts.len() == 1 => Some(&part.name.parts[0].text),
        _ => None,
    }
}

fn as_bool(value: &ConstantValue) -> Option<bool> {
    match value {
        ConstantValue::Bool { value, .. } => Some(*value),
        _ => None,
    }
}

fn as_string(value: &ConstantValue) -> Option<String> {
    match value {
        ConstantValue::String { value, .. } => Some(value.clone()),
        _ => None,
    }
}

fn as_i32(value: &ConstantValue) -> Option<i32> {
    match value {
        ConstantValue::Int { value, .. } => i32::try_from(*value).ok(),
        _ => None,
    }
}

fn as_identifier(value: &ConstantValue) -> Option<String> {
    match value {
        ConstantValue::Ident(name) => Some(name.to_dotted_string()),
        _ => None,
    }
}

fn name_parts(node: &OptionNode) -> Vec<uninterpreted_option::NamePart> {
    node.name_parts
        .iter()
        .map(|part| uninterpreted_option::NamePart {
            name_part: part.name.to_dotted_string(),
            is_extension: part.is_extension,
        })
        .collect()
}

/// Builds the catch-all record for an option this front end doesn't map to
/// a typed field — either a genuine custom/extension option, or a
/// recognized name given a value of the wrong shape (e.g. `deprecated =
/// "yes"`, a string where a bool belongs); the latter is logged rather than
/// silently dropped or hard-failed, matching the builder's "pure
/// AST-to-descriptor transform" contract (§4.6) of never erroring on
/// option content the static semantic pass already let through.
fn to_uninterpreted(node: &OptionNode) -> UninterpretedOption {
    let mut out = UninterpretedOption {
        name: name_parts(node),
        identifier_value: None,
        positive_int_value: None,
        negative_int_value: None,
        double_value: None,
        string_value: None,
        aggregate_value: None,
    };
    match &node.value {
        ConstantValue::Ident(name) => out.identifier_value = Some(name.to_dotted_string()),
        ConstantValue::Int { value, .. } => {
            if *value >= 0 {
                out.positive_int_value = Some(*value as u64);
            } else {
                out.negative_int_value = Some(*value);
            }
        }
        ConstantValue::Float { value, .. } => out.double_value = Some(*value),
        ConstantValue::String { value, .. } => out.string_value = Some(value.clone().into_bytes()),
        ConstantValue::Bool { value, .. } => {
            out.identifier_value = Some(if *value { "true" } else { "false" }.to_string())
        }
        ConstantValue::Aggregate { .. } => {
            out.aggregate_value = Some(render_aggregate(&node.value));
        }
    }
    out
}

/// Renders an aggregate option value (`{ k: v, k: v }`) back to the
/// text-proto-like form `UninterpretedOption.aggregate_value` carries.
fn render_aggregate(value: &ConstantValue) -> String {
    match value {
        ConstantValue::Aggregate { fields, .. } => {
            let body = fields
                .iter()
                .map(|(k, v)| format!("{}: {}", k.text, render_scalar(v)))
                .collect::<Vec<_>>()
                .join(" ");
            format!("{{ {body} }}")
        }
        other => render_scalar(other),
    }
}

fn render_scalar(value: &ConstantValue) -> String {
    match value {
        ConstantValue::Ident(name) => name.to_dotted_string(),
        ConstantValue::Int { value, .. } => value.to_string(),
        ConstantValue::Float { value, .. } => value.to_string(),
        ConstantValue::String { value, .. } => format!("{value:?}"),
        ConstantValue::Bool { value, .. } => value.to_string(),
        ConstantValue::Aggregate { .. } => render_aggregate(value),
    }
}

macro_rules! set_or_fall_through {
    ($node:expr, $target:expr, $coerce:expr, $uninterpreted:expr) => {
        match $coerce(&$node.value) {
            Some(v) => $target = Some(v),
            None => {
                warn!("option `{}` had an unexpected value shape; keeping it uninterpreted", plain_name($node).unwrap_or("?"));
                $uninterpreted.push(to_uninterpreted($node));
            }
        }
    };
}

pub fn build_file_options(nodes: &[OptionNode]) -> Option<FileOptions> {
    if nodes.is_empty() {
        return None;
    }
    let mut opts = FileOptions::default();
    let mut uninterpreted = Vec::new();
    for node in nodes {
        match plain_name(node) {
            Some("java_package") => set_or_fall_through!(node, opts.java_package, as_string, uninterpreted),
            Some("java_outer_classname") => set_or_fall_through!(node, opts.java_outer_classname, as_string, uninterpreted),
            Some("java_multiple_files") => set_or_fall_through!(node, opts.java_multiple_files, as_bool, uninterpreted),
            Some("java_generate_equals_and_hash") => {
                set_or_fall_through!(node, opts.java_generate_equals_and_hash, as_bool, uninterpreted)
            }
            Some("java_string_check_utf8") => set_or_fall_through!(node, opts.java_string_check_utf8, as_bool, uninterpreted),
            Some("optimize_for") => match as_identifier(&node.value).as_deref() {
                Some("SPEED") => opts.optimize_for = Some(file_options::OptimizeMode::Speed as i32),
                Some("CODE_SIZE") => opts.optimize_for = Some(file_options::OptimizeMode::CodeSize as i32),
                Some("LITE_RUNTIME") => opts.optimize_for = Some(file_options::OptimizeMode::LiteRuntime as i32),
                _ => uninterpreted.push(to_uninterpreted(node)),
            },
            Some("go_package") => set_or_fall_through!(node, opts.go_package, as_string, uninterpreted),
            Some("cc_generic_services") => set_or_fall_through!(node, opts.cc_generic_services, as_bool, uninterpreted),
            Some("java_generic_services") => set_or_fall_through!(node, opts.java_generic_services, as_bool, uninterpreted),
            Some("py_generic_services") => set_or_fall_through!(node, opts.py_generic_services, as_bool, uninterpreted),
            Some("deprecated") => set_or_fall_through!(node, opts.deprecated, as_bool, uninterpreted),
            Some("cc_enable_arenas") => set_or_fall_through!(node, opts.cc_enable_arenas, as_bool, uninterpreted),
            Some("objc_class_prefix") => set_or_fall_through!(node, opts.objc_class_prefix, as_string, uninterpreted),
            Some("csharp_namespace") => set_or_fall_through!(node, opts.csharp_namespace, as_string, uninterpreted),
            Some("swift_prefix") => set_or_fall_through!(node, opts.swift_prefix, as_string, uninterpreted),
            Some("php_class_prefix") => set_or_fall_through!(node, opts.php_class_prefix, as_string, uninterpreted),
            Some("php_namespace") => set_or_fall_through!(node, opts.php_namespace, as_string, uninterpreted),
            Some("php_metadata_namespace") => set_or_fall_through!(node, opts.php_metadata_namespace, as_string, uninterpreted),
            Some("ruby_package") => set_or_fall_through!(node, opts.ruby_package, as_string, uninterpreted),
            _ => uninterpreted.push(to_uninterpreted(node)),
        }
    }
    opts.uninterpreted_option = uninterpreted;
    Some(opts)
}

pub fn build_message_options(nodes: &[OptionNode]) -> Option<MessageOptions> {
    if nodes.is_empty() {
        return None;
    }
    let mut opts = MessageOptions::default();
    let mut uninterpreted = Vec::new();
    for node in nodes {
        match plain_name(node) {
            Some("deprecated") => set_or_fall_through!(node, opts.deprecated, as_bool, uninterpreted),
            Some("map_entry") => set_or_fall_through!(node, opts.map_entry, as_bool, uninterpreted),
            Some("message_set_wire_format") => {
                set_or_fall_through!(node, opts.message_set_wire_format, as_bool, uninterpreted)
            }
            Some("no_standard_descriptor_accessor") => {
                set_or_fall_through!(node, opts.no_standard_descriptor_accessor, as_bool, uninterpreted)
            }
            _ => uninterpreted.push(to_uninterpreted(node)),
        }
    }
    opts.uninterpreted_option = uninterpreted;
    Some(opts)
}

/// `map_entry = true` is never user-written in this front end's input — it
/// is a descriptor-only marker the builder sets on a *synthesized* entry
/// message (§4.6 "Map field synthesis") — so this bypasses option parsing
/// entirely rather than round-tripping through an `OptionNode`.
pub fn map_entry_options() -> MessageOptions {
    MessageOptions { map_entry: Some(true), ..Default::default() }
}

/// `proto3_optional` lives on `FieldDescriptorProto` itself, not on
/// `FieldOptions` — the caller sets that flag directly; this only ever
/// packs the `[option = value]` list attached to the field.
pub fn build_field_options(nodes: &[OptionNode]) -> Option<FieldOptions> {
    if nodes.is_empty() {
        return None;
    }
    let mut opts = FieldOptions::default();
    let mut uninterpreted = Vec::new();
    for node in nodes {
        match plain_name(node) {
            Some("deprecated") => set_or_fall_through!(node, opts.deprecated, as_bool, uninterpreted),
            Some("packed") => set_or_fall_through!(node, opts.packed, as_bool, uninterpreted),
            Some("lazy") => set_or_fall_through!(node, opts.lazy, as_bool, uninterpreted),
            Some("weak") => set_or_fall_through!(node, opts.weak, as_bool, uninterpreted),
            Some("jstype") => match as_identifier(&node.value).as_deref() {
                Some("JS_NORMAL") => opts.jstype = Some(field_options::JsType::JsNormal as i32),
                Some("JS_STRING") => opts.jstype = Some(field_options::JsType::JsString as i32),
                Some("JS_NUMBER") => opts.jstype = Some(field_options::JsType::JsNumber as i32),
                _ => uninterpreted.push(to_uninterpreted(node)),
            },
            Some("ctype") => match as_identifier(&node.value).as_deref() {
                Some("STRING") => opts.ctype = Some(field_options::CType::String as i32),
                Some("CORD") => opts.ctype = Some(field_options::CType::Cord as i32),
                Some("STRING_PIECE") => opts.ctype = Some(field_options::CType::StringPiece as i32),
                _ => uninterpreted.push(to_uninterpreted(node)),
            },
            // `default` is rejected by `analyzer::rules` before the builder
            // ever runs; `required`/`group` never parse at all (§4.2).
            _ => uninterpreted.push(to_uninterpreted(node)),
        }
    }
    opts.uninterpreted_option = uninterpreted;
    Some(opts)
}

pub fn build_enum_options(nodes: &[OptionNode]) -> Option<EnumOptions> {
    if nodes.is_empty() {
        return None;
    }
    let mut opts = EnumOptions::default();
    let mut uninterpreted = Vec::new();
    for node in nodes {
        match plain_name(node) {
            Some("allow_alias") => set_or_fall_through!(node, opts.allow_alias, as_bool, uninterpreted),
            Some("deprecated") => set_or_fall_through!(node, opts.deprecated, as_bool, uninterpreted),
            _ => uninterpreted.push(to_uninterpreted(node)),
        }
    }
    opts.uninterpreted_option = uninterpreted;
    Some(opts)
}

pub fn build_enum_value_options(nodes: &[OptionNode]) -> Option<EnumValueOptions> {
    if nodes.is_empty() {
        return None;
    }
    let mut opts = EnumValueOptions::default();
    let mut uninterpreted = Vec::new();
    for node in nodes {
        match plain_name(node) {
            Some("deprecated") => set_or_fall_through!(node, opts.deprecated, as_bool, uninterpreted),
            _ => uninterpreted.push(to_uninterpreted(node)),
        }
    }
    opts.uninterpreted_option = uninterpreted;
    Some(opts)
}

pub fn build_service_options(nodes: &[OptionNode]) -> Option<ServiceOptions> {
    if nodes.is_empty() {
        return None;
    }
    let mut opts = ServiceOptions::default();
    let mut uninterpreted = Vec::new();
    for node in nodes {
        match plain_name(node) {
            Some("deprecated") => set_or_fall_through!(node, opts.deprecated, as_bool, uninterpreted),
            _ => uninterpreted.push(to_uninterpreted(node)),
        }
    }
    opts.uninterpreted_option = uninterpreted;
    Some(opts)
}

pub fn build_method_options(nodes: &[OptionNode]) -> Option<MethodOptions> {
    if nodes.is_empty() {
        return None;
    }
    let mut opts = MethodOptions::default();
    let mut uninterpreted = Vec::new();
    for node in nodes {
        match plain_name(node) {
            Some("deprecated") => set_or_fall_through!(node, opts.deprecated, as_bool, uninterpreted),
            Some("idempotency_level") => match as_identifier(&node.value).as_deref() {
                Some("IDEMPOTENCY_UNKNOWN") => {
                    opts.idempotency_level = Some(method_options::IdempotencyLevel::IdempotencyUnknown as i32)
                }
                Some("NO_SIDE_EFFECTS") => {
                    opts.idempotency_level = Some(method_options::IdempotencyLevel::NoSideEffects as i32)
                }
                Some("IDEMPOTENT") => {
                    opts.idempotency_level = Some(method_options::IdempotencyLevel::Idempotent as i32)
                }
                _ => uninterpreted.push(to_uninterpreted(node)),
            },
            _ => uninterpreted.push(to_uninterpreted(node)),
        }
    }
    opts.uninterpreted_option = uninterpreted;
    Some(opts)
}

/// `oneof` carries no standard options in `descriptor.proto` — every
/// `option` written inside a `oneof { ... }` block is necessarily a custom
/// extension.
pub fn build_oneof_options(nodes: &[OptionNode]) -> Option<OneofOptions> {
    if nodes.is_empty() {
        return None;
    }
    Some(OneofOptions { uninterpreted_option: nodes.iter().map(to_uninterpreted).collect() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use protoc3_parser::ast::{Ident, OptionNamePart, TypeName};
    use protoc3_parser::span::Span;

    fn plain_option(name: &str, value: ConstantValue) -> OptionNode {
        OptionNode {
            name_parts: vec![OptionNamePart {
                name: TypeName { leading_dot: false, parts: vec![Ident { text: name.to_string(), span: Span::default() }], span: Span::default() },
                is_extension: false,
            }],
            value,
            span: Span::default(),
            leading_comments: Vec::new(),
        }
    }

    #[test]
    fn recognized_file_option_sets_typed_field() {
        let nodes = vec![plain_option("java_package", ConstantValue::String { value: "com.example".to_string(), span: Span::default() })];
        let opts = build_file_options(&nodes).unwrap();
        assert_eq!(opts.java_package.as_deref(), Some("com.example"));
        assert!(opts.uninterpreted_option.is_empty());
    }

    #[test]
    fn custom_option_falls_through_to_uninterpreted() {
        let part = OptionNamePart {
            name: TypeName { leading_dot: false, parts: vec![Ident { text: "my.custom.opt".to_string(), span: Span::default() }], span: Span::default() },
            is_extension: true,
        };
        let node = OptionNode {
            name_parts: vec![part],
            value: ConstantValue::Int { value: 42, span: Span::default() },
            span: Span::default(),
            leading_comments: Vec::new(),
        };
        let opts = build_message_options(std::slice::from_ref(&node)).unwrap();
        assert_eq!(opts.uninterpreted_option.len(), 1);
        assert!(opts.uninterpreted_option[0].name[0].is_extension);
        assert_eq!(opts.uninterpreted_option[0].positive_int_value, Some(42));
    }

    #[test]
    fn mismatched_value_shape_falls_through() {
        let nodes = vec![plain_option("deprecated", ConstantValue::String { value: "yes".to_string(), span: Span::default() })];
        let opts = build_message_options(&nodes).unwrap();
        assert!(opts.deprecated.is_none());
        assert_eq!(opts.uninterpreted_option.len(), 1);
    }
}
