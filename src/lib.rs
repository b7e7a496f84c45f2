//! A proto3 front end: lexing and parsing live in [`protoc3_parser`]; this
//! crate takes its [`protoc3_parser::ast::FileNode`] output and turns it
//! into a fully resolved, semantically checked `FileDescriptorProto` —
//! the same artifact `protoc` or `protox` produce, ready to hand to
//! `prost-build` or any other descriptor consumer.
//!
//! ```no_run
//! use protoc3::Config;
//!
//! let descriptor_set = Config::new()
//!     .import_path("proto")
//!     .compile("proto/greeting.proto")
//!     .expect("greeting.proto should compile");
//! ```
//!
//! The pipeline, in order: [`resolver`] resolves `import` statements into
//! a dependency closure, [`analyzer`] declares every symbol and resolves
//! every type reference against [`symbol_table`], and [`descriptor`] turns
//! the result into `prost_types::FileDescriptorSet`.

pub mod analyzer;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod resolver;
pub mod symbol_table;
pub mod well_known;

pub use config::{Config, NamingOptions};
pub use error::{Error, Result, SemanticError};

use std::path::Path;

/// Compiles one entry-point file (plus its transitive imports) using
/// default settings. Equivalent to `Config::new().compile(path)`.
pub fn compile(path: impl AsRef<Path>) -> Result<prost_types::FileDescriptorSet> {
    Config::new().compile(path)
}

pub(crate) fn compile_with_config(config: &Config, path: &Path) -> Result<prost_types::FileDescriptorSet> {
    let analysis = analyzer::analyze(config, path)?;
    Ok(descriptor::build_file_descriptor_set(&analysis, config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_a_minimal_in_tree_file() {
        let dir = std::env::temp_dir().join(format!("protoc3-lib-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("greeting.proto"),
            "syntax = \"proto3\";\npackage demo;\nmessage Greeting {\n  string text = 1;\n}\n",
        )
        .unwrap();

        let result = Config::new().import_path(&dir).compile("greeting.proto");
        let set = result.expect("should compile");
        assert_eq!(set.file.len(), 1);
        assert_eq!(set.file[0].package.as_deref(), Some("demo"));

        std::fs::remove_dir_all(&dir).ok();
    }
}
