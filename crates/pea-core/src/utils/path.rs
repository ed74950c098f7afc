//! Path utilities for file paths recorded in the graph.
//!
//! Asset group paths are normalized before hashing so that `./src/../src/a.js`
//! and `src/a.js` address the same node.

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};

/// Normalize a path by resolving . and .. components
pub fn normalize_path(path: &Utf8Path) -> Utf8PathBuf {
    let mut components: Vec<Utf8Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Utf8Component::CurDir => {},
            Utf8Component::ParentDir => match components.last() {
                Some(Utf8Component::Normal(_)) => {
                    components.pop();
                },
                // `/..` stays at the root
                Some(Utf8Component::RootDir) | Some(Utf8Component::Prefix(_)) => {},
                _ => components.push(component),
            },
            other => components.push(other),
        }
    }

    if components.is_empty() {
        return Utf8PathBuf::from(".");
    }
    components.iter().collect()
}

/// Get the file extension as a lowercase string
pub fn get_extension(path: &Utf8Path) -> Option<String> {
    path.extension().map(|ext| ext.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        let normalized = normalize_path(Utf8Path::new("./src/../lib/./file.js"));
        assert_eq!(normalized, Utf8Path::new("lib/file.js"));
    }

    #[test]
    fn test_normalize_keeps_leading_parent() {
        let normalized = normalize_path(Utf8Path::new("../shared/./util.js"));
        assert_eq!(normalized, Utf8Path::new("../shared/util.js"));

        let normalized = normalize_path(Utf8Path::new("/../abs/file.js"));
        assert_eq!(normalized, Utf8Path::new("/abs/file.js"));
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize_path(Utf8Path::new("./")), Utf8Path::new("."));
    }

    #[test]
    fn test_get_extension() {
        assert_eq!(get_extension(Utf8Path::new("file.JS")), Some("js".to_string()));
        assert_eq!(get_extension(Utf8Path::new("no_extension")), None);
    }
}
