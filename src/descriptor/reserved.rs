//! Reserved-range coalescing (§4.6 "Reserved ranges") and extension-range
//! emission. protoc stores each `reserved`/`extensions` statement verbatim
//! as its own `[start, end)` entry rather than merging adjacent ones — the
//! descriptor is a record of what was *written*, not a minimized interval
//! set — so this is a straight AST-to-descriptor map, not an interval-tree
//! merge.

use prost_types::{descriptor_proto, enum_descriptor_proto};
use protoc3_parser::ast::{ExtensionsRangeNode, ReservedEnd, ReservedNode};

/// The exclusive upper bound protoc uses for a message's reserved/extension
/// field numbers (`max` means "through the legal field number ceiling").
const MAX_MESSAGE_FIELD_NUMBER: i32 = 536_870_911;

fn range_end(start: i64, end: Option<ReservedEnd>, max_exclusive: i32) -> i32 {
    match end {
        None => start as i32 + 1,
        Some(ReservedEnd::Int(v)) => v as i32 + 1,
        Some(ReservedEnd::Max) => max_exclusive,
    }
}

/// Builds `DescriptorProto.reserved_range[]` and `.reserved_name[]` from a
/// message's `reserved` statements. Ranges are emitted sorted by `start`
/// (matching protoc's own normalization, §8 scenario 5) rather than
/// declaration order; names keep declaration order.
pub fn message_reserved(nodes: &[ReservedNode]) -> (Vec<descriptor_proto::ReservedRange>, Vec<String>) {
    let mut ranges = Vec::new();
    let mut names = Vec::new();
    for node in nodes {
        match node {
            ReservedNode::Range { start, end, .. } => {
                let end = range_end(*start, *end, MAX_MESSAGE_FIELD_NUMBER + 1);
                ranges.push(descriptor_proto::ReservedRange { start: Some(*start as i32), end: Some(end) });
            }
            ReservedNode::Name { name, .. } => names.push(name.clone()),
        }
    }
    ranges.sort_by_key(|r| r.start);
    (ranges, names)
}

/// Same as [`message_reserved`] but for `EnumDescriptorProto`, whose
/// reserved range end is *inclusive* of `max` (enum value numbers are
/// `i32`, with no protobuf-internal reserved band to dodge).
pub fn enum_reserved(
    nodes: &[ReservedNode],
) -> (Vec<enum_descriptor_proto::EnumReservedRange>, Vec<String>) {
    let mut ranges = Vec::new();
    let mut names = Vec::new();
    for node in nodes {
        match node {
            ReservedNode::Range { start, end, .. } => {
                let end = match end {
                    None => *start as i32,
                    Some(ReservedEnd::Int(v)) => *v as i32,
                    Some(ReservedEnd::Max) => i32::MAX,
                };
                ranges.push(enum_descriptor_proto::EnumReservedRange { start: Some(*start as i32), end: Some(end) });
            }
            ReservedNode::Name { name, .. } => names.push(name.clone()),
        }
    }
    ranges.sort_by_key(|r| r.start);
    (ranges, names)
}

/// Builds `DescriptorProto.extension_range[]` from `extensions N to M;`
/// statements. Reached only when `config.allow_extensions` permits the
/// statement to exist at all (`analyzer::rules::check_message` otherwise
/// raises `ExtensionRangeForbidden` before the builder ever runs).
pub fn extension_ranges(nodes: &[ExtensionsRangeNode]) -> Vec<descriptor_proto::ExtensionRange> {
    nodes
        .iter()
        .map(|node| descriptor_proto::ExtensionRange {
            start: Some(node.start as i32),
            end: Some(range_end(node.start, node.end, MAX_MESSAGE_FIELD_NUMBER + 1)),
            options: None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use protoc3_parser::span::Span;

    fn range(start: i64, end: Option<ReservedEnd>) -> ReservedNode {
        ReservedNode::Range { start, end, span: Span::default() }
    }

    #[test]
    fn coalesces_scenario_five_from_spec() {
        let nodes = vec![
            range(2, None),
            range(15, None),
            range(9, Some(ReservedEnd::Int(11))),
            ReservedNode::Name { name: "foo".to_string(), span: Span::default() },
        ];
        let (ranges, names) = message_reserved(&nodes);
        assert_eq!(
            ranges,
            vec![
                descriptor_proto::ReservedRange { start: Some(2), end: Some(3) },
                descriptor_proto::ReservedRange { start: Some(9), end: Some(12) },
                descriptor_proto::ReservedRange { start: Some(15), end: Some(16) },
            ]
        );
        assert_eq!(names, vec!["foo".to_string()]);
    }

    #[test]
    fn reserved_to_max_uses_field_ceiling() {
        let nodes = vec![range(1000, Some(ReservedEnd::Max))];
        let (ranges, _) = message_reserved(&nodes);
        assert_eq!(ranges[0].end, Some(MAX_MESSAGE_FIELD_NUMBER + 1));
    }
}
