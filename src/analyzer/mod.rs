//! Whole-program semantic analysis (§4.4): resolves an entry file plus its
//! transitive imports, runs the declaration pass over all of them into one
//! shared [`SymbolTable`], then the resolution and rule passes per file.
//!
//! Three passes, kept as separate submodules so each stays small:
//! [`declare`] populates the symbol table, [`resolve`] matches every type
//! reference against it, [`rules`] runs the proto3-specific checks that
//! don't need name resolution at all.

pub mod declare;
pub mod resolve;
pub mod rules;

use std::collections::HashSet;
use std::path::Path;
use std::rc::Rc;

use protoc3_parser::ast::{ExtendNode, FileNode, MessageMember, MessageNode, TopLevelItem};

use crate::config::Config;
use crate::error::{Error, Result, SemanticError};
use crate::resolver::{ParsedFile, Resolver};
use crate::symbol_table::SymbolTable;
use crate::well_known;

pub use resolve::{ResolvedType, ResolvedTypes};

/// One file's full analysis result: its parsed AST, the package it
/// declares (if any), every semantic error raised against it, and its
/// resolved-type side table for the descriptor builder to consume.
pub struct AnalyzedFile {
    pub parsed: Rc<ParsedFile>,
    pub package: Option<String>,
    pub resolved_types: ResolvedTypes,
    pub errors: Vec<SemanticError>,
}

impl AnalyzedFile {
    pub fn ast(&self) -> &FileNode {
        &self.parsed.ast
    }
}

/// The complete analysis of an entry file and its transitive imports, in
/// dependency order (a file always appears after everything it imports).
pub struct Analysis {
    pub table: SymbolTable,
    pub files: Vec<AnalyzedFile>,
}

impl Analysis {
    pub fn entry(&self) -> &AnalyzedFile {
        self.files.last().expect("analysis always contains at least the entry file")
    }
}

/// Runs the full three-pass analysis over `entry_path` and its transitive
/// imports. Returns the first file (in dependency order) carrying any
/// semantic errors as an [`Error::Semantic`] — matching protoc's behavior
/// of failing on the first broken file in a compile rather than reporting
/// every file in the closure at once.
pub fn analyze(config: &Config, entry_path: &Path) -> Result<Analysis> {
    let mut resolver = Resolver::new(config);
    let entry = resolver.resolve_entry(entry_path)?;

    let mut order = Vec::new();
    let mut done = HashSet::new();
    let mut in_progress = vec![entry.logical_path.clone()];
    collect_order(&mut resolver, entry, &mut order, &mut done, &mut in_progress)?;

    let mut table = SymbolTable::new();
    well_known::register_descriptor_proto_symbols(&mut table);

    let mut files: Vec<AnalyzedFile> = Vec::with_capacity(order.len());
    for parsed in &order {
        let package = file_package(&parsed.ast);
        let mut errors = Vec::new();
        declare::declare_file(&mut table, &parsed.ast, package.as_deref(), config.max_recursion_depth, &mut errors);
        files.push(AnalyzedFile {
            parsed: parsed.clone(),
            package,
            resolved_types: ResolvedTypes::new(),
            errors,
        });
    }

    for file in &mut files {
        let (resolved, mut errors) = resolve::resolve_file(
            &table,
            &file.parsed.ast,
            file.package.as_deref(),
            config.allow_extensions,
        );
        rules::check_file(&file.parsed.ast, config, &mut errors);
        file.resolved_types = resolved;
        file.errors.append(&mut errors);
    }

    // Registers every `extend` field as an extension symbol (§3.4, §4.3
    // `enter_extension`/`extensions_of`), keyed by `package.field-name` and
    // indexed by the extendee's resolved fully-qualified name. Run after
    // the resolve pass, over the whole closure's shared table, since an
    // extension's extendee fqn is only known once `resolve` has matched it
    // against an `OPTIONS_MESSAGES` entry.
    for file in &mut files {
        let mut ext_errors = Vec::new();
        register_extensions(&mut table, &file.parsed.ast, file.package.as_deref(), &file.resolved_types, &mut ext_errors);
        file.errors.append(&mut ext_errors);
    }

    for file in &files {
        if !file.errors.is_empty() {
            return Err(Error::Semantic {
                file: file.parsed.logical_path.clone(),
                errors: file.errors.clone(),
            });
        }
    }

    Ok(Analysis { table, files })
}

/// Walks every `extend` block reachable from a file's top level (including
/// those nested inside messages, which contribute to the same flat
/// `package.field-name` namespace rather than a message-scoped one — proto
/// has no such thing as a "nested extension name") and registers each of
/// its fields as an extension symbol.
fn register_extensions(
    table: &mut SymbolTable,
    file: &FileNode,
    package: Option<&str>,
    resolved: &ResolvedTypes,
    errors: &mut Vec<SemanticError>,
) {
    for item in &file.items {
        match item {
            TopLevelItem::Extend(e) => register_extend(table, e, package, resolved, errors),
            TopLevelItem::Message(m) => register_extensions_in_message(table, m, package, resolved, errors),
            _ => {}
        }
    }
}

fn register_extensions_in_message(
    table: &mut SymbolTable,
    node: &MessageNode,
    package: Option<&str>,
    resolved: &ResolvedTypes,
    errors: &mut Vec<SemanticError>,
) {
    for member in &node.members {
        match member {
            MessageMember::Extend(e) => register_extend(table, e, package, resolved, errors),
            MessageMember::Message(inner) => register_extensions_in_message(table, inner, package, resolved, errors),
            _ => {}
        }
    }
}

/// Registers one `extend`'s fields. Silently skips an `extend` whose
/// extendee didn't resolve to a valid `*Options` message — `resolve`
/// already raised `UnresolvedType`/`ExtendNonOptionsMessage` for that case,
/// so there's no extendee fqn to index under and no second error to add.
fn register_extend(
    table: &mut SymbolTable,
    node: &ExtendNode,
    package: Option<&str>,
    resolved: &ResolvedTypes,
    errors: &mut Vec<SemanticError>,
) {
    let Some(extendee) = resolved.get(&node.extendee.span) else { return };
    for f in &node.fields {
        if let Err(e) = table.enter_extension(package, &f.name.text, &extendee.fully_qualified_name, f.span) {
            errors.push(SemanticError::DuplicateSymbol { name: e.name, span: f.span, first_span: e.first_span });
        }
    }
}

fn file_package(file: &FileNode) -> Option<String> {
    file.items.iter().find_map(|item| match item {
        TopLevelItem::Package(name) => Some(name.to_dotted_string()),
        _ => None,
    })
}

/// Walks the import graph depth-first, appending each file to `order` only
/// after everything it depends on. `in_progress` is the chain of logical
/// paths currently being walked (the caller seeds it with the entry file);
/// encountering one of them again while following an import means a cycle
/// (§4.5's "maintain a stack of files currently being parsed"). This has to
/// live here rather than inside `Resolver::resolve` because the chain spans
/// many separate calls to `resolve` — one per import edge — not the inside
/// of any single one.
fn collect_order(
    resolver: &mut Resolver,
    file: Rc<ParsedFile>,
    order: &mut Vec<Rc<ParsedFile>>,
    done: &mut HashSet<String>,
    in_progress: &mut Vec<String>,
) -> Result<()> {
    if done.contains(&file.logical_path) {
        return Ok(());
    }

    for item in &file.ast.items {
        let TopLevelItem::Import(import) = item else { continue };

        // descriptor.proto is proto2 and is never actually parsed; its
        // symbols are pre-registered directly (see `well_known`).
        if import.path == well_known::DESCRIPTOR_PROTO_PATH {
            continue;
        }

        if in_progress.iter().any(|p| p == &import.path) {
            let mut chain = in_progress.clone();
            chain.push(import.path.clone());
            return Err(Error::CircularDependency { chain });
        }

        if in_progress.len() >= resolver.max_recursion_depth() {
            return Err(Error::Internal {
                message: format!(
                    "import recursion exceeded max_recursion_depth ({})",
                    resolver.max_recursion_depth()
                ),
            });
        }

        let dep = if import.weak {
            match resolver.resolve_weak(&import.path)? {
                Some(dep) => dep,
                None => continue,
            }
        } else {
            resolver.resolve(&import.path)?
        };

        in_progress.push(import.path.clone());
        let result = collect_order(resolver, dep, order, done, in_progress);
        in_progress.pop();
        result?;
    }

    done.insert(file.logical_path.clone());
    order.push(file);
    Ok(())
}
