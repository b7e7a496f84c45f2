//! `ServiceDescriptorProto`/`MethodDescriptorProto` construction (§4.6).
//! Reached only when `config.allow_services` is set — otherwise
//! `analyzer::rules::check_file` already rejected any `service` block
//! before the builder runs.

use prost_types::{MethodDescriptorProto, ServiceDescriptorProto};
use protoc3_parser::ast::{RpcNode, ServiceMember, ServiceNode};

use crate::analyzer::resolve::ResolvedTypes;

use super::options::{build_method_options, build_service_options};

pub fn build_service(node: &ServiceNode, resolved: &ResolvedTypes) -> ServiceDescriptorProto {
    let methods = node
        .members
        .iter()
        .filter_map(|m| match m {
            ServiceMember::Rpc(rpc) => Some(build_method(rpc, resolved)),
            ServiceMember::Option(_) => None,
        })
        .collect();

    let option_nodes: Vec<_> = node
        .members
        .iter()
        .filter_map(|m| match m {
            ServiceMember::Option(o) => Some(o.clone()),
            _ => None,
        })
        .collect();

    ServiceDescriptorProto {
        name: Some(node.name.text.clone()),
        method: methods,
        options: build_service_options(&option_nodes),
    }
}

fn build_method(rpc: &RpcNode, resolved: &ResolvedTypes) -> MethodDescriptorProto {
    let request_type = resolved
        .get(&rpc.request_type.span)
        .map(|r| format!(".{}", r.fully_qualified_name))
        .unwrap_or_else(|| rpc.request_type.to_dotted_string());
    let response_type = resolved
        .get(&rpc.response_type.span)
        .map(|r| format!(".{}", r.fully_qualified_name))
        .unwrap_or_else(|| rpc.response_type.to_dotted_string());

    MethodDescriptorProto {
        name: Some(rpc.name.text.clone()),
        input_type: Some(request_type),
        output_type: Some(response_type),
        options: build_method_options(&rpc.options),
        client_streaming: Some(rpc.request_stream),
        server_streaming: Some(rpc.response_stream),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use protoc3_parser::ast::{Ident, TypeName};
    use protoc3_parser::span::Span;

    fn type_name(text: &str) -> TypeName {
        TypeName { leading_dot: false, parts: vec![Ident { text: text.to_string(), span: Span::default() }], span: Span::default() }
    }

    #[test]
    fn streaming_flags_round_trip() {
        let rpc = RpcNode {
            name: Ident { text: "Stream".to_string(), span: Span::default() },
            request_type: type_name("Req"),
            request_stream: true,
            response_type: type_name("Resp"),
            response_stream: false,
            options: Vec::new(),
            span: Span::default(),
            leading_comments: Vec::new(),
        };
        let resolved = ResolvedTypes::new();
        let method = build_method(&rpc, &resolved);
        assert_eq!(method.client_streaming, Some(true));
        assert_eq!(method.server_streaming, Some(false));
    }
}
