//! Configuration surface (§6.2), grounded on `prost-build`'s `Config`
//! (`examples/tokio-rs-prost/prost-build/src/config.rs`): a struct of
//! private fields plus chainable `fn foo(&mut self, ...) -> &mut Self`
//! setters, constructed via `Config::new()` and driven to completion with
//! `compile`.

use std::path::PathBuf;

/// Naming-convention lints (§6.2, [SPEC_FULL.md] item C.5). Off by
/// default — protoc itself does not enforce a naming style, and most
/// real-world `.proto` corpora mix conventions.
#[derive(Debug, Clone, Default)]
pub struct NamingOptions {
    pub enforce_conventions: bool,
    pub allow_underscores_in_types: bool,
    pub allow_underscores_in_fields: bool,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub(crate) import_paths: Vec<PathBuf>,
    pub(crate) generate_source_info: bool,
    pub(crate) allow_aliases: bool,
    pub(crate) allow_services: bool,
    pub(crate) validate_defaults: bool,
    pub(crate) allow_extensions: bool,
    pub(crate) max_recursion_depth: usize,
    pub(crate) naming_options: NamingOptions,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            import_paths: Vec::new(),
            generate_source_info: true,
            allow_aliases: true,
            allow_services: true,
            validate_defaults: true,
            allow_extensions: false,
            max_recursion_depth: 100,
            naming_options: NamingOptions::default(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Config::default()
    }

    /// Adds a directory to the list of roots searched for `import`
    /// statements, in the order added.
    pub fn import_path(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.import_paths.push(path.into());
        self
    }

    pub fn import_paths<I, P>(&mut self, paths: I) -> &mut Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.import_paths.extend(paths.into_iter().map(Into::into));
        self
    }

    pub fn generate_source_info(&mut self, enabled: bool) -> &mut Self {
        self.generate_source_info = enabled;
        self
    }

    pub fn allow_aliases(&mut self, enabled: bool) -> &mut Self {
        self.allow_aliases = enabled;
        self
    }

    pub fn allow_services(&mut self, enabled: bool) -> &mut Self {
        self.allow_services = enabled;
        self
    }

    pub fn validate_defaults(&mut self, enabled: bool) -> &mut Self {
        self.validate_defaults = enabled;
        self
    }

    pub fn allow_extensions(&mut self, enabled: bool) -> &mut Self {
        self.allow_extensions = enabled;
        self
    }

    pub fn max_recursion_depth(&mut self, depth: usize) -> &mut Self {
        self.max_recursion_depth = depth;
        self
    }

    pub fn naming_options(&mut self, options: NamingOptions) -> &mut Self {
        self.naming_options = options;
        self
    }

    /// Compiles one entry-point file (plus its transitive imports) into a
    /// `FileDescriptorSet`. `path` is matched against `import_paths` the
    /// same way an `import` statement would be, so the entry file itself
    /// must live under one of them (or be one of the bundled well-known
    /// types).
    pub fn compile(
        &self,
        path: impl AsRef<std::path::Path>,
    ) -> crate::error::Result<prost_types::FileDescriptorSet> {
        crate::compile_with_config(self, path.as_ref())
    }
}
