//! Bundled well-known types (§4.5, [SPEC_FULL.md] item C.3).
//!
//! `protox`'s `Compiler::new` bundles the same files
//! (`examples/other_examples/manifests/andrewhickman-protox/Cargo.toml`
//! lists them as part of its `include/` data) so imports of
//! `google/protobuf/*.proto` resolve without the caller configuring an
//! import path for them. The genuinely proto3 ones are bundled as real
//! source text and run through the normal lex/parse/analyze pipeline;
//! `descriptor.proto` itself is proto2 (out of grammar for this parser) and
//! is special-cased as a set of pre-registered symbol-table entries for
//! its eight `*Options` message types, which is all `extend` resolution
//! (§4.4's last bullet) needs from it.

use crate::symbol_table::{SymbolKind, SymbolTable};
use protoc3_parser::span::Span;

/// The eight messages in `google/protobuf/descriptor.proto` that `extend`
/// is legal against in proto3 (§4.4, §7).
pub const OPTIONS_MESSAGES: &[&str] = &[
    "google.protobuf.FileOptions",
    "google.protobuf.MessageOptions",
    "google.protobuf.FieldOptions",
    "google.protobuf.OneofOptions",
    "google.protobuf.EnumOptions",
    "google.protobuf.EnumValueOptions",
    "google.protobuf.ServiceOptions",
    "google.protobuf.MethodOptions",
];

pub const DESCRIPTOR_PROTO_PATH: &str = "google/protobuf/descriptor.proto";

/// Pre-registers `descriptor.proto`'s `*Options` messages as symbols so
/// `extend google.protobuf.FieldOptions { ... }` resolves without this
/// parser ever lexing proto2 syntax.
pub fn register_descriptor_proto_symbols(table: &mut SymbolTable) {
    for name in OPTIONS_MESSAGES {
        let (parent, short) = name.rsplit_once('.').unwrap();
        let _ = table.enter(Some(parent), SymbolKind::Message, short, Span::default());
    }
    let _ = table.enter(None, SymbolKind::Message, "google", Span::default());
    let _ = table.enter(Some("google"), SymbolKind::Message, "protobuf", Span::default());
}

/// A bundled standard file: its import path and proto3 source text.
pub struct BundledFile {
    pub path: &'static str,
    pub source: &'static str,
}

pub fn bundled_files() -> &'static [BundledFile] {
    &[
        BundledFile { path: "google/protobuf/any.proto", source: ANY_PROTO },
        BundledFile { path: "google/protobuf/duration.proto", source: DURATION_PROTO },
        BundledFile { path: "google/protobuf/empty.proto", source: EMPTY_PROTO },
        BundledFile { path: "google/protobuf/timestamp.proto", source: TIMESTAMP_PROTO },
        BundledFile { path: "google/protobuf/wrappers.proto", source: WRAPPERS_PROTO },
    ]
}

pub fn lookup_bundled(path: &str) -> Option<&'static str> {
    bundled_files().iter().find(|f| f.path == path).map(|f| f.source)
}

const ANY_PROTO: &str = r#"
syntax = "proto3";

package google.protobuf;

message Any {
  string type_url = 1;
  bytes value = 2;
}
"#;

const DURATION_PROTO: &str = r#"
syntax = "proto3";

package google.protobuf;

message Duration {
  int64 seconds = 1;
  int32 nanos = 2;
}
"#;

const EMPTY_PROTO: &str = r#"
syntax = "proto3";

package google.protobuf;

message Empty {}
"#;

const TIMESTAMP_PROTO: &str = r#"
syntax = "proto3";

package google.protobuf;

message Timestamp {
  int64 seconds = 1;
  int32 nanos = 2;
}
"#;

const WRAPPERS_PROTO: &str = r#"
syntax = "proto3";

package google.protobuf;

message DoubleValue { double value = 1; }
message FloatValue { float value = 1; }
message Int64Value { int64 value = 1; }
message UInt64Value { uint64 value = 1; }
message Int32Value { int32 value = 1; }
message UInt32Value { uint32 value = 1; }
message BoolValue { bool value = 1; }
message StringValue { string value = 1; }
message BytesValue { bytes value = 1; }
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_wrappers_parse_as_proto3() {
        let src = lookup_bundled("google/protobuf/wrappers.proto").unwrap();
        protoc3_parser::parse(src).expect("bundled wrappers.proto must be valid proto3");
    }

    #[test]
    fn options_messages_resolve_after_registration() {
        let mut table = SymbolTable::new();
        register_descriptor_proto_symbols(&mut table);
        assert!(table.get("google.protobuf.FieldOptions").is_some());
    }
}
