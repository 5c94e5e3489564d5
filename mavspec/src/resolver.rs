//! # Dialect source resolution
//!
//! The loader never touches the filesystem directly — it asks a [`DialectResolver`] for a
//! dialect's XML bytes by name. This keeps dialect loading testable (in-memory fixtures) and lets
//! embedders ship dialects as compiled-in resources instead of loose files.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::ResolverError;

/// Resolves a dialect name to its XML source.
pub trait DialectResolver {
    /// Returns the XML content of the named dialect.
    ///
    /// `name` is the file base name without extension, e.g. `"common"` for `common.xml`.
    fn resolve(&self, name: &str) -> Result<String, ResolverError>;
}

/// Looks up dialects as `<dir>/<name>.xml` under a fixed directory.
///
/// This is the default resolver §6 describes: "looks in a `Dialects` directory adjacent to the
/// process binary." Construct with [`FsResolver::new`] to point it anywhere else.
#[derive(Debug, Clone)]
pub struct FsResolver {
    dir: PathBuf,
}

impl FsResolver {
    /// Creates a resolver rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Creates a resolver rooted at a `Dialects` directory next to the current executable.
    ///
    /// Falls back to `./Dialects` if the executable path can't be determined.
    pub fn adjacent_to_executable() -> Self {
        let dir = std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("Dialects");
        Self { dir }
    }
}

impl DialectResolver for FsResolver {
    fn resolve(&self, name: &str) -> Result<String, ResolverError> {
        let path = self.dir.join(format!("{name}.xml"));
        fs::read_to_string(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ResolverError::NotFound(name.to_string())
            } else {
                ResolverError::Io(name.to_string(), e)
            }
        })
    }
}

/// Resolves dialects from an in-memory map. Used by tests and by embedders that compile dialect
/// XML into their binary with `include_str!`.
#[derive(Debug, Clone, Default)]
pub struct MapResolver {
    sources: HashMap<String, String>,
}

impl MapResolver {
    /// Creates an empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a dialect's XML source under `name`, replacing any prior entry.
    pub fn insert(&mut self, name: impl Into<String>, xml: impl Into<String>) -> &mut Self {
        self.sources.insert(name.into(), xml.into());
        self
    }

    /// Builder-style variant of [`MapResolver::insert`].
    pub fn with(mut self, name: impl Into<String>, xml: impl Into<String>) -> Self {
        self.insert(name, xml);
        self
    }
}

impl DialectResolver for MapResolver {
    fn resolve(&self, name: &str) -> Result<String, ResolverError> {
        self.sources
            .get(name)
            .cloned()
            .ok_or_else(|| ResolverError::NotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_resolver_roundtrips_registered_source() {
        let resolver = MapResolver::new().with("common", "<mavlink></mavlink>");
        assert_eq!(resolver.resolve("common").unwrap(), "<mavlink></mavlink>");
    }

    #[test]
    fn map_resolver_reports_not_found() {
        let resolver = MapResolver::new();
        assert!(matches!(resolver.resolve("common"), Err(ResolverError::NotFound(_))));
    }
}
