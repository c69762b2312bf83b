//! Path normalization

use std::path::{Component, Path};

/// Convert backslashes to forward slashes.
pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

/// `path` relative to `root`, `/`-separated regardless of platform.
///
/// Falls back to the normalized full path when `path` is not under `root`.
pub fn relative_key(root: &Path, path: &Path) -> String {
    match path.strip_prefix(root) {
        Ok(rel) => rel
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/"),
        Err(_) => normalize_path(&path.to_string_lossy()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_backslashes() {
        assert_eq!(normalize_path(r"src\lib\mod.rs"), "src/lib/mod.rs");
    }

    #[test]
    fn relative_key_strips_root() {
        let root = Path::new("/repo");
        assert_eq!(relative_key(root, Path::new("/repo/src/main.py")), "src/main.py");
        assert_eq!(relative_key(root, Path::new("/repo")), "");
    }

    #[test]
    fn relative_key_outside_root_keeps_full_path() {
        assert_eq!(relative_key(Path::new("/repo"), Path::new("/other/a.py")), "/other/a.py");
    }
}
