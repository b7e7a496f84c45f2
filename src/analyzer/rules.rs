//! Proto3-specific static checks that aren't simple name resolution
//! (§4.4 "Proto3-specific checks").

use std::collections::HashMap;

use protoc3_parser::ast::{
    ConstantValue, EnumMember, EnumNode, ExtendNode, FieldLabel, FieldNode, FieldType, FileNode,
    MessageMember, MessageNode, OptionNode, ScalarType, TopLevelItem,
};

use crate::config::Config;
use crate::error::SemanticError;

const MIN_FIELD_NUMBER: i64 = 1;
const MAX_FIELD_NUMBER: i64 = 536_870_911;
const RESERVED_RANGE_START: i64 = 19_000;
const RESERVED_RANGE_END: i64 = 19_999;

fn is_legal_field_number(n: i64) -> bool {
    (MIN_FIELD_NUMBER..=MAX_FIELD_NUMBER).contains(&n)
        && !(RESERVED_RANGE_START..=RESERVED_RANGE_END).contains(&n)
}

pub fn check_file(file: &FileNode, config: &Config, errors: &mut Vec<SemanticError>) {
    for item in &file.items {
        match item {
            TopLevelItem::Message(m) => check_message(m, config, errors),
            TopLevelItem::Enum(e) => check_enum(e, config, errors),
            TopLevelItem::Service(s) if !config.allow_services => {
                errors.push(SemanticError::ServicesDisabled { span: s.span });
            }
            TopLevelItem::Extend(e) => check_extend(e, config, errors),
            _ => {}
        }
    }
}

/// `extend` blocks (whether at file or message scope) still carry fields
/// declared by *this* proto3 file, so the same field-level rules apply:
/// legal number range and no `[default = ...]` (§4.4 last bullet covers the
/// extendee restriction; this covers the fields themselves).
fn check_extend(node: &ExtendNode, config: &Config, errors: &mut Vec<SemanticError>) {
    for f in &node.fields {
        let (number, span) = f.number;
        if !is_legal_field_number(number) {
            errors.push(SemanticError::InvalidFieldNumber { number, span });
        }
        check_field_shape(f, false, errors);
        check_field_options(f, config, errors);
    }
}

fn check_message(node: &MessageNode, config: &Config, errors: &mut Vec<SemanticError>) {
    let mut seen_numbers: HashMap<i64, protoc3_parser::span::Span> = HashMap::new();

    let mut check_field_number = |f: &FieldNode, errors: &mut Vec<SemanticError>| {
        let (number, span) = f.number;
        if !is_legal_field_number(number) {
            errors.push(SemanticError::InvalidFieldNumber { number, span });
        } else if seen_numbers.insert(number, span).is_some() {
            errors.push(SemanticError::DuplicateFieldNumber {
                message: node.name.text.clone(),
                number,
                span,
            });
        }
    };

    for member in &node.members {
        match member {
            MessageMember::Field(f) => {
                check_field_number(f, errors);
                check_field_shape(f, false, errors);
                check_field_options(f, config, errors);
            }
            MessageMember::Oneof(o) => {
                for f in &o.fields {
                    check_field_number(f, errors);
                    check_field_shape(f, true, errors);
                    check_field_options(f, config, errors);
                }
            }
            MessageMember::Message(inner) => check_message(inner, config, errors),
            MessageMember::Enum(inner) => check_enum(inner, config, errors),
            MessageMember::Extend(e) => check_extend(e, config, errors),
            MessageMember::Extensions(ext) => {
                errors.push(SemanticError::ExtensionRangeForbidden { span: ext.span });
            }
            MessageMember::Option(_) | MessageMember::Reserved(_) => {}
        }
    }

    if config.naming_options.enforce_conventions {
        check_message_naming(node, config, errors);
    }
}

fn check_field_shape(field: &FieldNode, in_oneof: bool, errors: &mut Vec<SemanticError>) {
    if in_oneof {
        if field.label == FieldLabel::Repeated {
            errors.push(SemanticError::OneofFieldRepeated { field: field.name.text.clone(), span: field.span });
        }
        if matches!(field.ty, FieldType::Map(_)) {
            errors.push(SemanticError::OneofFieldMap { field: field.name.text.clone(), span: field.span });
        }
    }

    if let FieldType::Map(map) = &field.ty {
        if !is_legal_map_key(&map.key) {
            errors.push(SemanticError::InvalidMapKeyType {
                found: format!("{:?}", map.key),
                span: map.key_span,
            });
        }
    }
}

fn is_legal_map_key(key: &ScalarType) -> bool {
    !matches!(key, ScalarType::Float | ScalarType::Double | ScalarType::Bytes)
}

fn check_field_options(field: &FieldNode, config: &Config, errors: &mut Vec<SemanticError>) {
    if !config.validate_defaults {
        return;
    }
    for opt in &field.options {
        if is_default_option(opt) {
            errors.push(SemanticError::DefaultValueForbidden { span: opt.span });
        }
    }
}

fn is_default_option(opt: &OptionNode) -> bool {
    matches!(opt.name_parts.as_slice(), [part] if !part.is_extension && part.name.parts.len() == 1 && part.name.parts[0].text == "default")
}

fn check_enum(node: &EnumNode, config: &Config, errors: &mut Vec<SemanticError>) {
    let allow_alias = enum_allow_alias(node).unwrap_or(config.allow_aliases);

    let mut first = true;
    let mut seen_numbers: HashMap<i32, protoc3_parser::span::Span> = HashMap::new();
    for member in &node.members {
        let EnumMember::Value(v) = member else { continue };
        let (number, span) = v.number;
        if first {
            if number != 0 {
                errors.push(SemanticError::EnumFirstValueNotZero {
                    enum_name: node.name.text.clone(),
                    number,
                    span,
                });
            }
            first = false;
        }
        if !allow_alias {
            if seen_numbers.insert(number, span).is_some() {
                errors.push(SemanticError::DuplicateEnumNumber {
                    enum_name: node.name.text.clone(),
                    number,
                    span,
                });
            }
        } else {
            seen_numbers.insert(number, span);
        }
    }
}

fn enum_allow_alias(node: &EnumNode) -> Option<bool> {
    for member in &node.members {
        let EnumMember::Option(opt) = member else { continue };
        if let [part] = opt.name_parts.as_slice() {
            if !part.is_extension && part.name.parts.len() == 1 && part.name.parts[0].text == "allow_alias" {
                if let ConstantValue::Bool { value, .. } = opt.value {
                    return Some(value);
                }
            }
        }
    }
    None
}

fn check_message_naming(node: &MessageNode, config: &Config, errors: &mut Vec<SemanticError>) {
    if !is_upper_camel_case(&node.name.text, config.naming_options.allow_underscores_in_types) {
        errors.push(SemanticError::NamingConvention {
            name: node.name.text.clone(),
            reason: "message names should be UpperCamelCase".to_string(),
            span: node.name.span,
        });
    }
    for member in &node.members {
        if let MessageMember::Field(f) = member {
            if !is_lower_snake_case(&f.name.text, config.naming_options.allow_underscores_in_fields) {
                errors.push(SemanticError::NamingConvention {
                    name: f.name.text.clone(),
                    reason: "field names should be lower_snake_case".to_string(),
                    span: f.name.span,
                });
            }
        }
    }
}

fn is_upper_camel_case(name: &str, allow_underscores: bool) -> bool {
    if !allow_underscores && name.contains('_') {
        return false;
    }
    name.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}

fn is_lower_snake_case(name: &str, allow_underscores: bool) -> bool {
    if !allow_underscores && name.contains('_') {
        return !name.chars().any(|c| c.is_ascii_uppercase());
    }
    name.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}
