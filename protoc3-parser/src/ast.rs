//! Abstract syntax tree produced by [`crate::parser::parse`] (§3.2).
//!
//! Every node carries a [`Span`] so downstream semantic errors can point
//! back at the source. Nothing here knows about symbol resolution or
//! descriptors — this is a pure syntactic representation of the file.

use crate::span::Span;
use crate::token::Comment;

/// A name attached to a span — an identifier, a dotted type reference, or
/// a keyword used where the grammar allows either (e.g. `map`/`to` as
/// option-name segments are not legal, but field/message/enum names are
/// just plain identifiers).
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub text: String,
    pub span: Span,
}

/// A possibly-qualified type reference, e.g. `.foo.Bar` or `Bar.Baz`. The
/// `leading_dot` flag distinguishes a fully-qualified reference (resolved
/// from the root of the symbol table) from a relative one (resolved via
/// proto's progressive-scope lookup, §4.3).
#[derive(Debug, Clone, PartialEq)]
pub struct TypeName {
    pub leading_dot: bool,
    pub parts: Vec<Ident>,
    pub span: Span,
}

impl TypeName {
    pub fn to_dotted_string(&self) -> String {
        let body = self
            .parts
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join(".");
        if self.leading_dot {
            format!(".{body}")
        } else {
            body
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    Proto3,
}

/// A constant value as it appears in an option or a map-entry default —
/// §3.2's "OptionValue" production. Kept as a small tagged union rather
/// than resolved at parse time since the legal shape depends on the target
/// option's declared type, which only the semantic analyzer knows.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstantValue {
    Ident(TypeName),
    Int { value: i64, span: Span },
    Float { value: f64, span: Span },
    String { value: String, span: Span },
    Bool { value: bool, span: Span },
    Aggregate { fields: Vec<(Ident, ConstantValue)>, span: Span },
}

impl ConstantValue {
    pub fn span(&self) -> Span {
        match self {
            ConstantValue::Ident(t) => t.span,
            ConstantValue::Int { span, .. }
            | ConstantValue::Float { span, .. }
            | ConstantValue::String { span, .. }
            | ConstantValue::Bool { span, .. }
            | ConstantValue::Aggregate { span, .. } => *span,
        }
    }
}

/// A single segment of a dotted option name: `foo`, or `(my.custom.opt)`.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionNamePart {
    pub name: TypeName,
    pub is_extension: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OptionNode {
    pub name_parts: Vec<OptionNamePart>,
    pub value: ConstantValue,
    pub span: Span,
    pub leading_comments: Vec<Comment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldLabel {
    /// Written explicitly, proto3-optional: synthesizes a single-field
    /// oneof (§4.6 "Structural mapping").
    Optional,
    Repeated,
    /// No explicit label: proto3 implicit (singular) presence.
    Implicit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScalarType {
    Double,
    Float,
    Int32,
    Int64,
    Uint32,
    Uint64,
    Sint32,
    Sint64,
    Fixed32,
    Fixed64,
    Sfixed32,
    Sfixed64,
    Bool,
    String,
    Bytes,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapType {
    pub key: ScalarType,
    pub key_span: Span,
    pub value: FieldType,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    Scalar(ScalarType),
    Named(TypeName),
    Map(Box<MapType>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldNode {
    pub label: FieldLabel,
    pub ty: FieldType,
    pub name: Ident,
    pub number: (i64, Span),
    pub options: Vec<OptionNode>,
    pub span: Span,
    pub leading_comments: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OneofNode {
    pub name: Ident,
    pub fields: Vec<FieldNode>,
    pub options: Vec<OptionNode>,
    pub span: Span,
    pub leading_comments: Vec<Comment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservedEnd {
    /// `N to M`
    Int(i64),
    /// `N to max`
    Max,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReservedNode {
    Range { start: i64, end: Option<ReservedEnd>, span: Span },
    Name { name: String, span: Span },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtensionsRangeNode {
    pub start: i64,
    pub end: Option<ReservedEnd>,
    pub options: Vec<OptionNode>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MessageMember {
    Field(FieldNode),
    Oneof(OneofNode),
    Message(MessageNode),
    Enum(EnumNode),
    Extend(ExtendNode),
    Option(OptionNode),
    Reserved(ReservedNode),
    Extensions(ExtensionsRangeNode),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MessageNode {
    pub name: Ident,
    pub members: Vec<MessageMember>,
    pub span: Span,
    pub leading_comments: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumValueNode {
    pub name: Ident,
    pub number: (i32, Span),
    pub options: Vec<OptionNode>,
    pub span: Span,
    pub leading_comments: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EnumMember {
    Value(EnumValueNode),
    Option(OptionNode),
    Reserved(ReservedNode),
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumNode {
    pub name: Ident,
    pub members: Vec<EnumMember>,
    pub span: Span,
    pub leading_comments: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtendNode {
    pub extendee: TypeName,
    pub fields: Vec<FieldNode>,
    pub span: Span,
    pub leading_comments: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RpcNode {
    pub name: Ident,
    pub request_type: TypeName,
    pub request_stream: bool,
    pub response_type: TypeName,
    pub response_stream: bool,
    pub options: Vec<OptionNode>,
    pub span: Span,
    pub leading_comments: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ServiceMember {
    Rpc(RpcNode),
    Option(OptionNode),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceNode {
    pub name: Ident,
    pub members: Vec<ServiceMember>,
    pub span: Span,
    pub leading_comments: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportNode {
    pub path: String,
    pub weak: bool,
    pub public: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TopLevelItem {
    Import(ImportNode),
    Package(TypeName),
    Option(OptionNode),
    Message(MessageNode),
    Enum(EnumNode),
    Service(ServiceNode),
    Extend(ExtendNode),
}

/// The root AST node: one parsed `.proto` file.
#[derive(Debug, Clone, PartialEq)]
pub struct FileNode {
    pub syntax: Syntax,
    pub syntax_span: Span,
    pub items: Vec<TopLevelItem>,
    /// Comments attached to the very end of the file (after the last
    /// token), kept so `generate_source_info` (§6.2) can preserve them.
    pub trailing_comments: Vec<Comment>,
}
