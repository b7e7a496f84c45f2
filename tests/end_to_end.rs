//! Integration tests: "source text in, `FileDescriptorProto` shape out"
//! scenarios, one per spec concrete scenario plus the boundary behaviors
//! the analyzer is responsible for enforcing.

use prost_types::field_descriptor_proto::{Label, Type};
use protoc3::{Config, Error, SemanticError};

struct Fixture {
    dir: std::path::PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = std::env::temp_dir().join(format!(
            "protoc3-e2e-{}-{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        Fixture { dir }
    }

    fn write(&self, name: &str, contents: &str) -> &Self {
        std::fs::write(self.dir.join(name), contents).unwrap();
        self
    }

    fn compile(&self, entry: &str) -> protoc3::Result<prost_types::FileDescriptorSet> {
        Config::new().import_path(&self.dir).compile(entry)
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        std::fs::remove_dir_all(&self.dir).ok();
    }
}

/// Scenario 1: a single scalar field compiles to the expected field shape.
#[test]
fn scenario_minimal_message() {
    let fx = Fixture::new();
    fx.write("m.proto", "syntax = \"proto3\";\nmessage M { string name = 1; }\n");
    let set = fx.compile("m.proto").expect("should compile");

    let file = &set.file[0];
    assert_eq!(file.message_type.len(), 1);
    let message = &file.message_type[0];
    assert_eq!(message.name.as_deref(), Some("M"));
    assert_eq!(message.field.len(), 1);
    let field = &message.field[0];
    assert_eq!(field.name.as_deref(), Some("name"));
    assert_eq!(field.number, Some(1));
    assert_eq!(field.r#type, Some(Type::String as i32));
    assert_eq!(field.label, Some(Label::Optional as i32));
}

/// Scenario 2: a field naming an enum must resolve to `TYPE_ENUM`, not
/// `TYPE_MESSAGE` — the whole point of running a resolution pass before
/// building fields instead of guessing from syntax alone.
#[test]
fn scenario_enum_field_is_not_a_message_field() {
    let fx = Fixture::new();
    fx.write(
        "m.proto",
        "syntax = \"proto3\";\nenum E { A = 0; B = 1; }\nmessage M { E e = 1; }\n",
    );
    let set = fx.compile("m.proto").expect("should compile");

    let field = &set.file[0].message_type[0].field[0];
    assert_eq!(field.r#type, Some(Type::Enum as i32));
    assert_eq!(field.type_name.as_deref(), Some(".E"));
}

/// Scenario 3: a map field synthesizes its `*Entry` nested message.
#[test]
fn scenario_map_field_synthesizes_entry_message() {
    let fx = Fixture::new();
    fx.write("m.proto", "syntax = \"proto3\";\nmessage M { map<string, int32> m = 1; }\n");
    let set = fx.compile("m.proto").expect("should compile");

    let message = &set.file[0].message_type[0];
    assert_eq!(message.nested_type.len(), 1);
    let entry = &message.nested_type[0];
    assert_eq!(entry.name.as_deref(), Some("MEntry"));
    assert_eq!(entry.options.as_ref().and_then(|o| o.map_entry), Some(true));
    assert_eq!(entry.field.len(), 2);
    assert_eq!(entry.field[0].name.as_deref(), Some("key"));
    assert_eq!(entry.field[0].number, Some(1));
    assert_eq!(entry.field[1].name.as_deref(), Some("value"));
    assert_eq!(entry.field[1].number, Some(2));

    let field = &message.field[0];
    assert_eq!(field.label, Some(Label::Repeated as i32));
    assert_eq!(field.r#type, Some(Type::Message as i32));
    assert_eq!(field.type_name.as_deref(), Some(".M.MEntry"));
}

/// Scenario 4: explicit proto3 `optional` gets a synthetic one-member oneof.
#[test]
fn scenario_explicit_optional_gets_synthetic_oneof() {
    let fx = Fixture::new();
    fx.write("m.proto", "syntax = \"proto3\";\nmessage M { optional string s = 1; }\n");
    let set = fx.compile("m.proto").expect("should compile");

    let message = &set.file[0].message_type[0];
    assert_eq!(message.oneof_decl.len(), 1);
    assert_eq!(message.oneof_decl[0].name.as_deref(), Some("_s"));
    assert_eq!(message.field[0].oneof_index, Some(0));
    assert_eq!(message.field[0].proto3_optional, Some(true));
}

/// Scenario 5: reserved ranges/names coalesce and sort the way `protoc`
/// does; this is the exact example from the spec's scenario table.
#[test]
fn scenario_reserved_ranges_and_names_coalesce() {
    let fx = Fixture::new();
    fx.write(
        "m.proto",
        "syntax = \"proto3\";\nmessage M { reserved 2, 15, 9 to 11; reserved \"foo\"; }\n",
    );
    let set = fx.compile("m.proto").expect("should compile");

    let message = &set.file[0].message_type[0];
    let ranges: Vec<(i32, i32)> = message
        .reserved_range
        .iter()
        .map(|r| (r.start.unwrap(), r.end.unwrap()))
        .collect();
    assert_eq!(ranges, vec![(2, 3), (9, 12), (15, 16)]);
    assert_eq!(message.reserved_name, vec!["foo".to_string()]);
}

/// Scenario 6: an enum whose first value isn't numbered 0 is a semantic
/// error, not merely a stylistic lint.
#[test]
fn scenario_enum_first_value_must_be_zero() {
    let fx = Fixture::new();
    fx.write("m.proto", "syntax = \"proto3\";\nenum E { B = 1; A = 0; }\n");
    let err = fx.compile("m.proto").unwrap_err();
    let errors = expect_semantic_errors(err);
    assert!(errors.iter().any(|e| matches!(e, SemanticError::EnumFirstValueNotZero { .. })));
}

#[test]
fn boundary_field_number_one_and_max_succeed() {
    let fx = Fixture::new();
    fx.write(
        "m.proto",
        "syntax = \"proto3\";\nmessage M { string a = 1; string b = 536870911; }\n",
    );
    fx.compile("m.proto").expect("1 and 536870911 are both legal field numbers");
}

#[test]
fn boundary_field_number_zero_is_rejected() {
    let fx = Fixture::new();
    fx.write("m.proto", "syntax = \"proto3\";\nmessage M { string a = 0; }\n");
    let err = fx.compile("m.proto").unwrap_err();
    let errors = expect_semantic_errors(err);
    assert!(errors.iter().any(|e| matches!(e, SemanticError::InvalidFieldNumber { number: 0, .. })));
}

#[test]
fn boundary_field_number_above_max_is_rejected() {
    let fx = Fixture::new();
    fx.write("m.proto", "syntax = \"proto3\";\nmessage M { string a = 536870912; }\n");
    let err = fx.compile("m.proto").unwrap_err();
    let errors = expect_semantic_errors(err);
    assert!(errors.iter().any(|e| matches!(e, SemanticError::InvalidFieldNumber { .. })));
}

#[test]
fn boundary_reserved_range_field_numbers_are_rejected() {
    let fx = Fixture::new();
    fx.write("m.proto", "syntax = \"proto3\";\nmessage M { string a = 19500; }\n");
    let err = fx.compile("m.proto").unwrap_err();
    let errors = expect_semantic_errors(err);
    assert!(errors.iter().any(|e| matches!(e, SemanticError::InvalidFieldNumber { number: 19500, .. })));
}

#[test]
fn boundary_duplicate_field_numbers_across_oneofs_are_rejected() {
    let fx = Fixture::new();
    fx.write(
        "m.proto",
        r#"
            syntax = "proto3";
            message M {
              string a = 1;
              oneof kind {
                string b = 1;
                int32 c = 2;
              }
            }
        "#,
    );
    let err = fx.compile("m.proto").unwrap_err();
    let errors = expect_semantic_errors(err);
    assert!(errors.iter().any(|e| matches!(e, SemanticError::DuplicateFieldNumber { number: 1, .. })));
}

#[test]
fn boundary_float_map_key_is_rejected() {
    let fx = Fixture::new();
    fx.write("m.proto", "syntax = \"proto3\";\nmessage M { map<float, string> m = 1; }\n");
    let err = fx.compile("m.proto").unwrap_err();
    let errors = expect_semantic_errors(err);
    assert!(errors.iter().any(|e| matches!(e, SemanticError::InvalidMapKeyType { .. })));
}

#[test]
fn boundary_required_keyword_is_rejected() {
    let fx = Fixture::new();
    fx.write("m.proto", "syntax = \"proto3\";\nmessage M { required string a = 1; }\n");
    let err = fx.compile("m.proto").unwrap_err();
    assert!(matches!(err, Error::Syntax { .. }));
}

/// An `import`ed message type resolves across file boundaries, exercising
/// the resolver + symbol table + analyzer together rather than in
/// isolation.
#[test]
fn imported_message_type_resolves_across_files() {
    let fx = Fixture::new();
    fx.write("dep.proto", "syntax = \"proto3\";\npackage dep;\nmessage Inner { string v = 1; }\n");
    fx.write(
        "m.proto",
        "syntax = \"proto3\";\nimport \"dep.proto\";\nmessage Outer { dep.Inner inner = 1; }\n",
    );
    let set = fx.compile("m.proto").expect("should compile across the import boundary");
    assert_eq!(set.file.len(), 2);

    let outer_file = set.file.iter().find(|f| f.name.as_deref() == Some("m.proto")).unwrap();
    let field = &outer_file.message_type[0].field[0];
    assert_eq!(field.r#type, Some(Type::Message as i32));
    assert_eq!(field.type_name.as_deref(), Some(".dep.Inner"));
}

/// A weak import that doesn't resolve on disk does not fail the compile.
#[test]
fn weak_import_missing_file_does_not_fail_compile() {
    let fx = Fixture::new();
    fx.write(
        "m.proto",
        "syntax = \"proto3\";\nimport weak \"does_not_exist.proto\";\nmessage M { string a = 1; }\n",
    );
    fx.compile("m.proto").expect("a missing weak import must not fail the compile");
}

/// A circular (non-weak) import chain is rejected rather than looping
/// forever.
#[test]
fn circular_import_is_rejected() {
    let fx = Fixture::new();
    fx.write("a.proto", "syntax = \"proto3\";\nimport \"b.proto\";\nmessage A { B b = 1; }\n");
    fx.write("b.proto", "syntax = \"proto3\";\nimport \"a.proto\";\nmessage B { A a = 1; }\n");
    let err = fx.compile("a.proto").unwrap_err();
    assert!(matches!(err, Error::CircularDependency { .. }));
}

/// An `extend` of a `*Options` message registers its field both in the
/// built descriptor's `extension[]` list and, transitively, as an
/// extension symbol — a second `extend` reusing the same field name against
/// the same extendee is a duplicate-symbol error, not silently accepted.
#[test]
fn extend_field_options_builds_extension_descriptor() {
    let fx = Fixture::new();
    fx.write(
        "m.proto",
        r#"
            syntax = "proto3";
            import "google/protobuf/descriptor.proto";

            extend google.protobuf.FieldOptions {
              string redacted_reason = 50001;
            }
        "#,
    );
    let set = Config::new()
        .import_path(&fx.dir)
        .allow_extensions(true)
        .compile("m.proto")
        .expect("extend against a registered *Options message should compile");

    let file = set.file.iter().find(|f| f.name.as_deref() == Some("m.proto")).unwrap();
    assert_eq!(file.extension.len(), 1);
    assert_eq!(file.extension[0].name.as_deref(), Some("redacted_reason"));
    assert_eq!(file.extension[0].extendee.as_deref(), Some(".google.protobuf.FieldOptions"));
    assert_eq!(file.extension[0].number, Some(50001));
}

#[test]
fn extend_disabled_by_default_is_rejected() {
    let fx = Fixture::new();
    fx.write(
        "m.proto",
        r#"
            syntax = "proto3";
            import "google/protobuf/descriptor.proto";

            extend google.protobuf.FieldOptions {
              string redacted_reason = 50001;
            }
        "#,
    );
    let err = fx.compile("m.proto").unwrap_err();
    let errors = expect_semantic_errors(err);
    assert!(errors.iter().any(|e| matches!(e, SemanticError::ExtensionsDisabled { .. })));
}

#[test]
fn duplicate_extension_field_name_against_same_extendee_is_rejected() {
    let fx = Fixture::new();
    fx.write(
        "m.proto",
        r#"
            syntax = "proto3";
            import "google/protobuf/descriptor.proto";

            extend google.protobuf.FieldOptions {
              string redacted_reason = 50001;
            }
            extend google.protobuf.FieldOptions {
              int32 redacted_reason = 50002;
            }
        "#,
    );
    let err = Config::new()
        .import_path(&fx.dir)
        .allow_extensions(true)
        .compile("m.proto")
        .unwrap_err();
    let errors = expect_semantic_errors(err);
    assert!(errors.iter().any(|e| matches!(e, SemanticError::DuplicateSymbol { .. })));
}

fn expect_semantic_errors(err: Error) -> Vec<SemanticError> {
    match err {
        Error::Semantic { errors, .. } => errors,
        other => panic!("expected Error::Semantic, got {other:?}"),
    }
}
