//! The one piece every field-shaped descriptor (message fields, map
//! key/value synthesis, extension fields) needs: `ScalarType` ->
//! `FieldDescriptorProto::Type`, per §3.2's scalar-type table.

use prost_types::field_descriptor_proto::Type;
use protoc3_parser::ast::ScalarType;

pub fn scalar_to_proto_type(ty: &ScalarType) -> Type {
    match ty {
        ScalarType::Double => Type::Double,
        ScalarType::Float => Type::Float,
        ScalarType::Int32 => Type::Int32,
        ScalarType::Int64 => Type::Int64,
        ScalarType::Uint32 => Type::Uint32,
        ScalarType::Uint64 => Type::Uint64,
        ScalarType::Sint32 => Type::Sint32,
        ScalarType::Sint64 => Type::Sint64,
        ScalarType::Fixed32 => Type::Fixed32,
        ScalarType::Fixed64 => Type::Fixed64,
        ScalarType::Sfixed32 => Type::Sfixed32,
        ScalarType::Sfixed64 => Type::Sfixed64,
        ScalarType::Bool => Type::Bool,
        ScalarType::String => Type::String,
        ScalarType::Bytes => Type::Bytes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_every_scalar_kind() {
        assert_eq!(scalar_to_proto_type(&ScalarType::Sint64), Type::Sint64);
        assert_eq!(scalar_to_proto_type(&ScalarType::Bytes), Type::Bytes);
    }
}
