//! Import resolution: locating, parsing, and caching the transitive closure
//! of a file's `import` statements (§4.5).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use log::{debug, trace};
use protoc3_parser::ast::FileNode;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::well_known;

/// One successfully parsed file, cached by its logical (import) path.
pub struct ParsedFile {
    pub logical_path: String,
    pub ast: FileNode,
}

pub struct Resolver<'cfg> {
    config: &'cfg Config,
    cache: HashMap<String, std::rc::Rc<ParsedFile>>,
}

impl<'cfg> Resolver<'cfg> {
    pub fn new(config: &'cfg Config) -> Self {
        Resolver { config, cache: HashMap::new() }
    }

    /// Cycle and import-depth bookkeeping (§4.5 "Maintain a stack of files
    /// currently being parsed") lives in `analyzer::collect_order` rather
    /// than here: it needs to track the chain across the recursive-import
    /// *walk*, which spans many calls to `resolve`, not the inside of a
    /// single one. `max_recursion_depth` is exposed so that walk can read
    /// the configured bound without reaching into `Config` directly.
    pub fn max_recursion_depth(&self) -> usize {
        self.config.max_recursion_depth
    }

    /// Resolves the entry-point file at `path` and returns its parsed AST.
    /// `path` is resolved the same way an `import` would be: first against
    /// the bundled well-known types, then against each configured import
    /// root in order, then as a path relative to the current directory.
    pub fn resolve_entry(&mut self, path: &Path) -> Result<std::rc::Rc<ParsedFile>> {
        let logical = path.to_string_lossy().replace('\\', "/");
        self.resolve(&logical)
    }

    /// Resolves one `import "logical_path";` directive, re-entering the
    /// pipeline for that file if it hasn't been parsed yet this
    /// invocation. This method itself never recurses into the dependency's
    /// own imports — that's the caller's (`analyzer::collect_order`) job —
    /// so a cycle can't be detected from inside a single call; see
    /// `max_recursion_depth` above.
    pub fn resolve(&mut self, logical_path: &str) -> Result<std::rc::Rc<ParsedFile>> {
        if let Some(cached) = self.cache.get(logical_path) {
            trace!("import cache hit for {logical_path}");
            return Ok(cached.clone());
        }

        let source = self.read_source(logical_path)?;
        let ast = protoc3_parser::parse(&source).map_err(|e| self.wrap_parse_error(logical_path, e))?;

        let parsed = std::rc::Rc::new(ParsedFile {
            logical_path: logical_path.to_string(),
            ast,
        });
        self.cache.insert(logical_path.to_string(), parsed.clone());
        Ok(parsed)
    }

    /// Resolves a `weak` import: missing files and I/O failures are
    /// swallowed (the resolver "notes the dependency but does not fail",
    /// §4.5) and reported as `Ok(None)`; cycles and recursion-depth
    /// violations still propagate, since those are invariant violations
    /// regardless of import strength.
    pub fn resolve_weak(&mut self, logical_path: &str) -> Result<Option<std::rc::Rc<ParsedFile>>> {
        match self.resolve(logical_path) {
            Ok(parsed) => Ok(Some(parsed)),
            Err(Error::FileNotFound { .. }) | Err(Error::Io { .. }) => {
                debug!("weak import {logical_path} could not be resolved; continuing");
                Ok(None)
            }
            Err(other) => Err(other),
        }
    }

    fn read_source(&self, logical_path: &str) -> Result<String> {
        if let Some(bundled) = well_known::lookup_bundled(logical_path) {
            return Ok(bundled.to_string());
        }

        for root in &self.config.import_paths {
            let candidate = root.join(logical_path);
            if candidate.is_file() {
                return std::fs::read_to_string(&candidate).map_err(|source| Error::Io {
                    path: candidate.to_string_lossy().to_string(),
                    source,
                });
            }
        }

        let direct = PathBuf::from(logical_path);
        if direct.is_file() {
            return std::fs::read_to_string(&direct)
                .map_err(|source| Error::Io { path: logical_path.to_string(), source });
        }

        Err(Error::FileNotFound { path: logical_path.to_string() })
    }

    fn wrap_parse_error(&self, file: &str, err: protoc3_parser::ParseError) -> Error {
        match err {
            protoc3_parser::ParseError::Lex(source) => {
                let position = source.span().start;
                Error::Lexical { file: file.to_string(), position, source }
            }
            protoc3_parser::ParseError::Syntax(source) => {
                let position = source.span().unwrap_or_default().start;
                Error::Syntax { file: file.to_string(), position, source }
            }
        }
    }
}
