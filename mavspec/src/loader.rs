//! # Recursive dialect loading
//!
//! Loads a root dialect and every dialect it transitively `<include>`s into a flat bundle keyed
//! by dialect name, resolving each file exactly once even if multiple dialects include it.

use std::collections::HashMap;

use crate::dialect::Dialect;
use crate::errors::DialectLoadError;
use crate::resolver::DialectResolver;
use crate::xml::parse_document;

/// Loads `root` and its transitive includes via `resolver`, returning every loaded dialect keyed
/// by name.
///
/// Includes already present in the bundle (by name) are not re-resolved or re-parsed — this
/// makes diamond-shaped include graphs cheap and cycles impossible to loop on forever.
pub fn load_dialect_tree(
    root: &str,
    resolver: &dyn DialectResolver,
) -> Result<HashMap<String, Dialect>, DialectLoadError> {
    let mut bundle = HashMap::new();
    load_one(root, resolver, &mut bundle)?;
    Ok(bundle)
}

fn load_one(
    name: &str,
    resolver: &dyn DialectResolver,
    bundle: &mut HashMap<String, Dialect>,
) -> Result<(), DialectLoadError> {
    if bundle.contains_key(name) {
        return Ok(());
    }

    let xml = resolver.resolve(name)?;
    let dialect = parse_document(name, &xml).map_err(|e| DialectLoadError::Parse(name.to_string(), e))?;

    let includes = dialect.includes().to_vec();
    bundle.insert(name.to_string(), dialect);

    for include in includes {
        load_one(&normalize_include_name(&include), resolver, bundle)?;
    }

    Ok(())
}

/// `<include>` text is a file name, possibly with a path prefix and `.xml` extension (e.g.
/// `"common.xml"` or `"../common.xml"`). Dialects are keyed by bare base name.
fn normalize_include_name(raw: &str) -> String {
    let file_name = raw.rsplit(['/', '\\']).next().unwrap_or(raw);
    file_name.strip_suffix(".xml").unwrap_or(file_name).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::MapResolver;

    #[test]
    fn loads_transitive_includes_once_each() {
        let resolver = MapResolver::new()
            .with(
                "root",
                r#"<mavlink><include>common</include><include>common</include></mavlink>"#,
            )
            .with("common", r#"<mavlink></mavlink>"#);

        let bundle = load_dialect_tree("root", &resolver).unwrap();
        assert_eq!(bundle.len(), 2);
        assert!(bundle.contains_key("root"));
        assert!(bundle.contains_key("common"));
    }

    #[test]
    fn cyclic_includes_terminate() {
        let resolver = MapResolver::new()
            .with("a", r#"<mavlink><include>b</include></mavlink>"#)
            .with("b", r#"<mavlink><include>a</include></mavlink>"#);

        let bundle = load_dialect_tree("a", &resolver).unwrap();
        assert_eq!(bundle.len(), 2);
    }

    #[test]
    fn include_names_strip_xml_extension() {
        let resolver = MapResolver::new()
            .with("root", r#"<mavlink><include>common.xml</include></mavlink>"#)
            .with("common", r#"<mavlink></mavlink>"#);

        let bundle = load_dialect_tree("root", &resolver).unwrap();
        assert!(bundle.contains_key("common"));
    }

    #[test]
    fn missing_dialect_reports_not_found() {
        let resolver = MapResolver::new();
        let err = load_dialect_tree("missing", &resolver).unwrap_err();
        assert!(matches!(err, DialectLoadError::Resolver(_)));
    }
}
