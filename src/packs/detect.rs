//! Pack detection from project files.

use super::{PACKS, Pack};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

/// How deep below the project root to look for marker files.
const DETECT_MAX_DEPTH: usize = 2;

/// Directories never worth descending into.
const SKIP_DIRS: &[&str] = &["node_modules", "target", "build", "dist", "venv", "Pods"];

/// Return the packs whose marker files exist near `root`, in registry order.
pub fn detect_packs(root: &Path) -> Vec<&'static Pack> {
    let entries: Vec<String> = WalkDir::new(root)
        .min_depth(1)
        .max_depth(DETECT_MAX_DEPTH)
        .into_iter()
        .filter_entry(|e| !is_skipped(e))
        .filter_map(|e| e.ok())
        .filter_map(|e| e.file_name().to_str().map(|s| s.to_string()))
        .collect();

    PACKS
        .iter()
        .filter(|pack| !pack.markers.is_empty())
        .filter(|pack| match build_globset(pack.markers) {
            Ok(set) => entries.iter().any(|name| set.is_match(name)),
            Err(e) => {
                log::warn!("invalid marker pattern in pack '{}': {}", pack.name, e);
                false
            }
        })
        .collect()
}

fn is_skipped(entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || SKIP_DIRS.contains(&name.as_ref())
}

fn build_globset(patterns: &[&str]) -> Result<GlobSet, globset::Error> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn names(packs: &[&Pack]) -> Vec<&'static str> {
        packs.iter().map(|p| p.name).collect()
    }

    #[test]
    fn detects_nothing_in_empty_dir() {
        let temp = TempDir::new().unwrap();
        assert!(detect_packs(temp.path()).is_empty());
    }

    #[test]
    fn detects_web_and_python() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("package.json"), "{}").unwrap();
        std::fs::create_dir(temp.path().join("api")).unwrap();
        std::fs::write(temp.path().join("api").join("pyproject.toml"), "").unwrap();

        assert_eq!(names(&detect_packs(temp.path())), vec!["python", "web"]);
    }

    #[test]
    fn detects_xcode_project_directory() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("App.xcodeproj")).unwrap();

        assert_eq!(names(&detect_packs(temp.path())), vec!["ios"]);
    }

    #[test]
    fn ignores_markers_inside_node_modules() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("node_modules");
        std::fs::create_dir(&nested).unwrap();
        std::fs::write(nested.join("setup.py"), "").unwrap();

        assert!(detect_packs(temp.path()).is_empty());
    }

    #[test]
    fn ignores_markers_below_max_depth() {
        let temp = TempDir::new().unwrap();
        let deep = temp.path().join("a").join("b");
        std::fs::create_dir_all(&deep).unwrap();
        std::fs::write(deep.join("package.json"), "{}").unwrap();

        assert!(detect_packs(temp.path()).is_empty());
    }
}
