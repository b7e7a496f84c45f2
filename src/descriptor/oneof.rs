//! Oneof descriptor construction and proto3-optional synthesis (§4.6
//! "Oneof and proto3-optional synthesis"). A field written `optional T f =
//! N;` is real-oneof-free syntax for "one member oneof" — protoc
//! represents it by manufacturing a oneof named `_f` containing only `f`,
//! with `FieldOptions.proto3_optional = true` marking it as synthetic
//! rather than user-declared. User-written oneofs are emitted first, in
//! declaration order; synthetic ones are appended after, also matching
//! protoc's ordering (it must — `oneof_index` is a flat array index other
//! tooling reads positionally).

use std::collections::HashMap;

use prost_types::OneofDescriptorProto;
use protoc3_parser::ast::{FieldLabel, MessageMember, MessageNode};
use protoc3_parser::span::Span;

use super::options::build_oneof_options;

/// Per-message oneof layout: the flat `oneof_decl` array plus, for every
/// field that belongs to a oneof (real or synthesized), the index into
/// that array.
pub struct OneofPlan {
    pub oneofs: Vec<OneofDescriptorProto>,
    field_oneof_index: HashMap<Span, i32>,
    synthetic: HashMap<Span, ()>,
}

impl OneofPlan {
    pub fn oneof_index_for(&self, field_span: Span) -> Option<i32> {
        self.field_oneof_index.get(&field_span).copied()
    }

    pub fn is_synthetic(&self, field_span: Span) -> bool {
        self.synthetic.contains_key(&field_span)
    }
}

pub fn plan_oneofs(node: &MessageNode) -> OneofPlan {
    let mut oneofs = Vec::new();
    let mut field_oneof_index = HashMap::new();
    let mut synthetic = HashMap::new();

    for member in &node.members {
        if let MessageMember::Oneof(o) = member {
            let index = oneofs.len() as i32;
            oneofs.push(OneofDescriptorProto { name: Some(o.name.text.clone()), options: build_oneof_options(&o.options) });
            for f in &o.fields {
                field_oneof_index.insert(f.span, index);
            }
        }
    }

    for member in &node.members {
        if let MessageMember::Field(f) = member {
            if f.label == FieldLabel::Optional {
                let index = oneofs.len() as i32;
                oneofs.push(OneofDescriptorProto { name: Some(format!("_{}", f.name.text)), options: None });
                field_oneof_index.insert(f.span, index);
                synthetic.insert(f.span, ());
            }
        }
    }

    OneofPlan { oneofs, field_oneof_index, synthetic }
}

#[cfg(test)]
mod tests {
    use super::*;
    use protoc3_parser::ast::{FieldNode, FieldType, Ident, OneofNode, ScalarType};
    use protoc3_parser::span::Position;

    fn field(name: &str, label: FieldLabel, number: i64, span: Span) -> FieldNode {
        FieldNode {
            label,
            ty: FieldType::Scalar(ScalarType::Int32),
            name: Ident { text: name.to_string(), span },
            number: (number, span),
            options: Vec::new(),
            span,
            leading_comments: Vec::new(),
        }
    }

    #[test]
    fn synthetic_oneofs_follow_real_ones() {
        let real_field_span = Span { start: Position::new(1, 10), len: 1 };
        let optional_span = Span { start: Position::new(1, 20), len: 1 };
        let node = MessageNode {
            name: Ident { text: "M".to_string(), span: Span::default() },
            members: vec![
                MessageMember::Oneof(OneofNode {
                    name: Ident { text: "choice".to_string(), span: Span::default() },
                    fields: vec![field("a", FieldLabel::Implicit, 1, real_field_span)],
                    options: Vec::new(),
                    span: Span::default(),
                    leading_comments: Vec::new(),
                }),
                MessageMember::Field(field("b", FieldLabel::Optional, 2, optional_span)),
            ],
            span: Span::default(),
            leading_comments: Vec::new(),
        };
        let plan = plan_oneofs(&node);
        assert_eq!(plan.oneofs.len(), 2);
        assert_eq!(plan.oneofs[0].name.as_deref(), Some("choice"));
        assert_eq!(plan.oneofs[1].name.as_deref(), Some("_b"));
        assert_eq!(plan.oneof_index_for(real_field_span), Some(0));
        assert_eq!(plan.oneof_index_for(optional_span), Some(1));
        assert!(plan.is_synthetic(optional_span));
        assert!(!plan.is_synthetic(real_field_span));
    }
}
