//! Lexer, AST and recursive-descent parser for proto3 source files.
//!
//! This crate is a pure text-to-AST front end: it has no notion of a
//! symbol table, import resolution, or `FileDescriptorProto` — that's
//! `protoc3`, the workspace root crate, which takes this crate's
//! [`ast::FileNode`] as its input. Keeping the split means this crate can
//! be reused by anything that wants a proto3 syntax tree without paying for
//! semantic analysis (a formatter or a linter, say).

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod span;
pub mod token;

use thiserror::Error;

pub use ast::FileNode;
pub use lexer::LexError;
pub use parser::SyntaxError;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
}

/// Lexes and parses a complete proto3 source file into its AST. A leading
/// UTF-8 byte-order mark, if present, is stripped before lexing (§4.1) —
/// `protoc` itself accepts a BOM-prefixed `.proto` file, and some Windows
/// editors write one by default.
pub fn parse(source: &str) -> Result<FileNode, ParseError> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let tokens = lexer::lex(source)?;
    let file = parser::parse(&tokens)?;
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_minimal_file() {
        let src = r#"
            syntax = "proto3";
            package example;

            message Greeting {
              string text = 1;
            }
        "#;
        let file = parse(src).expect("should parse");
        assert_eq!(file.items.len(), 2);
    }

    #[test]
    fn rejects_proto2_syntax() {
        let err = parse("syntax = \"proto2\";\n").unwrap_err();
        assert!(matches!(err, ParseError::Syntax(SyntaxError::UnsupportedSyntax { .. })));
    }

    #[test]
    fn parses_service_with_streaming_rpc() {
        let src = r#"
            syntax = "proto3";
            message Req {}
            message Res {}
            service Chat {
              rpc Talk(stream Req) returns (stream Res);
            }
        "#;
        let file = parse(src).expect("should parse");
        assert_eq!(file.items.len(), 3);
    }

    #[test]
    fn parses_map_field() {
        let src = r#"
            syntax = "proto3";
            message M {
              map<string, int32> counts = 1;
            }
        "#;
        parse(src).expect("should parse");
    }

    #[test]
    fn parses_oneof_and_reserved() {
        let src = r#"
            syntax = "proto3";
            message M {
              reserved 2, 9 to 11;
              reserved "old_field";
              oneof kind {
                string a = 1;
                int32 b = 3;
              }
            }
        "#;
        parse(src).expect("should parse");
    }

    #[test]
    fn rejects_mixed_reserved_statement() {
        let src = r#"
            syntax = "proto3";
            message M {
              reserved 2, "old_field";
            }
        "#;
        let err = parse(src).unwrap_err();
        assert!(matches!(err, ParseError::Syntax(SyntaxError::MixedReservedStatement { .. })));
    }

    #[test]
    fn strips_leading_byte_order_mark() {
        let src = "\u{feff}syntax = \"proto3\";\nmessage M {}\n";
        let file = parse(src).expect("BOM should be stripped before lexing");
        assert_eq!(file.items.len(), 1);
    }

    #[test]
    fn rejects_map_value_type_of_map() {
        let src = r#"
            syntax = "proto3";
            message M {
              map<string, map<string, int32>> nested = 1;
            }
        "#;
        let err = parse(src).unwrap_err();
        assert!(matches!(err, ParseError::Syntax(SyntaxError::Unexpected { .. })));
    }
}
