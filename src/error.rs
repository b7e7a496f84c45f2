//! The unifying error type (§7). Every user-visible failure surfaces
//! through [`Error`]; lower layers (`protoc3_parser::LexError`,
//! `protoc3_parser::SyntaxError`) are wrapped rather than re-derived, the
//! same layering `protox` uses between its `lexer`/`parse` errors and its
//! top-level `Error`.
//!
//! Both `SemanticError` and `Error` also derive `miette::Diagnostic`,
//! matching `protox`'s `CheckError` (`examples/other_examples/…-protox__
//! src-check-mod.rs.rs`), which pairs `#[derive(Error)]` with
//! `#[derive(Diagnostic)]` so a CLI built on this library gets `miette`'s
//! fancy rendering for free. `protox`'s spans are byte offsets into the
//! source it still holds, so it can attach a `#[label]`; this crate's
//! `Span` is a resolved (line, column) position with no borrowed source
//! text behind it, so the diagnostic codes below carry the same
//! information a label would (what and roughly where) without needing a
//! `SourceSpan` conversion this crate has no source buffer left to back.

use protoc3_parser::span::Position;
use thiserror::Error;

/// One static-semantic rule violation (§4.4, §7 "semantic-error"). The
/// analyzer accumulates these rather than stopping at the first one.
#[derive(Debug, Error, miette::Diagnostic, Clone, PartialEq)]
pub enum SemanticError {
    #[error("duplicate symbol `{name}` at {pos} (first defined at {first_pos})", pos = .span.start, first_pos = .first_span.start)]
    #[diagnostic(code(protoc3::semantic::duplicate_symbol))]
    DuplicateSymbol { name: String, span: protoc3_parser::span::Span, first_span: protoc3_parser::span::Span },

    #[error("duplicate field number {number} in message `{message}` at {pos}", pos = .span.start)]
    #[diagnostic(code(protoc3::semantic::duplicate_field_number))]
    DuplicateFieldNumber { message: String, number: i64, span: protoc3_parser::span::Span },

    #[error("duplicate enum value number {number} in enum `{enum_name}` at {pos} (set `allow_alias = true` to permit aliases)", pos = .span.start)]
    #[diagnostic(code(protoc3::semantic::duplicate_enum_number), help("set `option allow_alias = true;` on the enum if the aliasing is intentional"))]
    DuplicateEnumNumber { enum_name: String, number: i32, span: protoc3_parser::span::Span },

    #[error("field number {number} at {pos} is out of range (must be 1..=536870911, excluding 19000..=19999)", pos = .span.start)]
    #[diagnostic(code(protoc3::semantic::invalid_field_number))]
    InvalidFieldNumber { number: i64, span: protoc3_parser::span::Span },

    #[error("enum `{enum_name}`'s first value must have number 0, found {number} at {pos}", pos = .span.start)]
    #[diagnostic(code(protoc3::semantic::enum_first_value_not_zero), help("proto3 requires every enum's default (first) value to be numbered 0"))]
    EnumFirstValueNotZero { enum_name: String, number: i32, span: protoc3_parser::span::Span },

    #[error("unresolved type `{name}` referenced at {pos}", pos = .span.start)]
    #[diagnostic(code(protoc3::semantic::unresolved_type))]
    UnresolvedType { name: String, span: protoc3_parser::span::Span },

    #[error("invalid map key type `{found}` at {pos}; map keys must be an integral, bool, or string scalar", pos = .span.start)]
    #[diagnostic(code(protoc3::semantic::invalid_map_key_type))]
    InvalidMapKeyType { found: String, span: protoc3_parser::span::Span },

    #[error("`required` fields are forbidden in proto3, at {pos}", pos = .span.start)]
    #[diagnostic(code(protoc3::semantic::required_forbidden), help("proto3 has no presence-tracked `required`; use plain singular fields or explicit `optional`"))]
    RequiredForbidden { span: protoc3_parser::span::Span },

    #[error("oneof member `{field}` may not be `repeated`, at {pos}", pos = .span.start)]
    #[diagnostic(code(protoc3::semantic::oneof_field_repeated))]
    OneofFieldRepeated { field: String, span: protoc3_parser::span::Span },

    #[error("oneof member `{field}` may not be a map field, at {pos}", pos = .span.start)]
    #[diagnostic(code(protoc3::semantic::oneof_field_map))]
    OneofFieldMap { field: String, span: protoc3_parser::span::Span },

    #[error("`extend` target `{extendee}` at {pos} is not a google.protobuf.*Options message; proto3 forbids extending user messages", pos = .span.start)]
    #[diagnostic(code(protoc3::semantic::extend_non_options_message))]
    ExtendNonOptionsMessage { extendee: String, span: protoc3_parser::span::Span },

    #[error("`extend` is disabled by configuration, at {pos}", pos = .span.start)]
    #[diagnostic(code(protoc3::semantic::extensions_disabled), help("pass `Config::allow_extensions(true)` to permit `extend` statements"))]
    ExtensionsDisabled { span: protoc3_parser::span::Span },

    #[error("extension ranges (`extensions ...;`) are not allowed on proto3 messages, at {pos}", pos = .span.start)]
    #[diagnostic(code(protoc3::semantic::extension_range_forbidden))]
    ExtensionRangeForbidden { span: protoc3_parser::span::Span },

    #[error("`service` is disabled by configuration, at {pos}", pos = .span.start)]
    #[diagnostic(code(protoc3::semantic::services_disabled), help("pass `Config::allow_services(true)` to permit `service` definitions"))]
    ServicesDisabled { span: protoc3_parser::span::Span },

    #[error("proto3 forbids an explicit `default` field option, at {pos}", pos = .span.start)]
    #[diagnostic(code(protoc3::semantic::default_value_forbidden))]
    DefaultValueForbidden { span: protoc3_parser::span::Span },

    #[error("`{name}` does not follow the configured naming convention at {pos}: {reason}", pos = .span.start)]
    #[diagnostic(code(protoc3::semantic::naming_convention))]
    NamingConvention { name: String, reason: String, span: protoc3_parser::span::Span },

    #[error("import recursion exceeded the configured depth limit ({limit})")]
    #[diagnostic(code(protoc3::semantic::recursion_limit_exceeded))]
    RecursionLimitExceeded { limit: usize },
}

impl SemanticError {
    pub fn primary_span(&self) -> Option<protoc3_parser::span::Span> {
        use SemanticError::*;
        match self {
            DuplicateSymbol { span, .. }
            | DuplicateFieldNumber { span, .. }
            | DuplicateEnumNumber { span, .. }
            | InvalidFieldNumber { span, .. }
            | EnumFirstValueNotZero { span, .. }
            | UnresolvedType { span, .. }
            | InvalidMapKeyType { span, .. }
            | RequiredForbidden { span }
            | OneofFieldRepeated { span, .. }
            | OneofFieldMap { span, .. }
            | ExtendNonOptionsMessage { span, .. }
            | ExtensionsDisabled { span }
            | ExtensionRangeForbidden { span }
            | ServicesDisabled { span }
            | DefaultValueForbidden { span }
            | NamingConvention { span, .. } => Some(*span),
            RecursionLimitExceeded { .. } => None,
        }
    }
}

#[derive(Debug, Error, miette::Diagnostic)]
pub enum Error {
    #[error("file not found: {path}")]
    #[diagnostic(code(protoc3::file_not_found))]
    FileNotFound { path: String },

    #[error("io error reading {path}: {source}")]
    #[diagnostic(code(protoc3::io))]
    Io { path: String, #[source] source: std::io::Error },

    #[error("could not resolve import {import_path:?}: {message}")]
    #[diagnostic(code(protoc3::dependency_resolution))]
    DependencyResolution { message: String, import_path: String },

    #[error("circular import dependency: {}", .chain.join(" -> "))]
    #[diagnostic(code(protoc3::circular_dependency))]
    CircularDependency { chain: Vec<String> },

    #[error("{file}:{pos}: {source}", pos = .position)]
    #[diagnostic(code(protoc3::lexical))]
    Lexical {
        file: String,
        position: Position,
        #[source]
        source: protoc3_parser::LexError,
    },

    #[error("{file}:{pos}: {source}", pos = .position)]
    #[diagnostic(code(protoc3::syntax))]
    Syntax {
        file: String,
        position: Position,
        #[source]
        source: protoc3_parser::SyntaxError,
    },

    #[error("{} semantic error(s) in {file}", .errors.len())]
    #[diagnostic(code(protoc3::semantic))]
    Semantic { file: String, errors: Vec<SemanticError> },

    #[error("internal error: {message}")]
    #[diagnostic(code(protoc3::internal))]
    Internal { message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
