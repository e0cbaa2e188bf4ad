use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::model::TargetExtension;

/// What a filesystem probe found at a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    File,
    Directory,
}

/// Probe a path, treating any I/O error as "not found".
pub fn stat_path(path: &Path) -> Option<PathKind> {
    let metadata = fs::metadata(path).ok()?;
    if metadata.is_dir() {
        Some(PathKind::Directory)
    } else if metadata.is_file() {
        Some(PathKind::File)
    } else {
        None
    }
}

/// Source extensions probed when deciding whether a candidate refers to a
/// source file that will be emitted with the target extension.
const SOURCE_PROBES: &[&str] = &[".ts", ".tsx"];

/// Decide the concrete file a candidate path should import.
///
/// Strategies, first hit wins:
/// 1. An existing directory resolves to its index file; an existing file
///    passes through unchanged (explicit-extension import).
/// 2. A source file next to the candidate (`candidate.ts`) resolves to the
///    candidate with the target extension.
/// 3. An already-emitted neighbor (`candidate.js`) keeps the candidate with
///    the target extension.
/// 4. Otherwise the candidate passes through unchanged. The miss is logged
///    but never fails the conversion; the caller emits a best-effort path.
pub fn resolve_file(candidate: &Path, ext: TargetExtension) -> PathBuf {
    match stat_path(candidate) {
        Some(PathKind::Directory) => return candidate.join(ext.index_file()),
        Some(PathKind::File) => return candidate.to_path_buf(),
        None => {}
    }

    for probe in SOURCE_PROBES {
        if stat_path(&append_suffix(candidate, probe)) == Some(PathKind::File) {
            return append_suffix(candidate, ext.suffix());
        }
    }

    if !ends_with_suffix(candidate, ext.suffix()) {
        let emitted = append_suffix(candidate, ext.suffix());
        if stat_path(&emitted) == Some(PathKind::File) {
            return emitted;
        }
    }

    tracing::warn!(
        candidate = %candidate.display(),
        "could not resolve import target, keeping unresolved path"
    );
    candidate.to_path_buf()
}

/// Append a raw suffix to a path without replacing an existing extension.
fn append_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(suffix);
    PathBuf::from(os)
}

fn ends_with_suffix(path: &Path, suffix: &str) -> bool {
    path.to_string_lossy().ends_with(suffix)
}

/// Normalize a path by resolving `.` and `..` components without touching
/// the filesystem.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components = Vec::new();
    for component in path.components() {
        match component {
            Component::ParentDir => {
                // Only pop if there's a normal component to pop
                if components
                    .last()
                    .is_some_and(|c| matches!(c, Component::Normal(_)))
                {
                    components.pop();
                } else {
                    components.push(component);
                }
            }
            Component::CurDir => {} // skip
            other => {
                components.push(other);
            }
        }
    }
    components.iter().collect()
}

/// Compute the path of `target` relative to the directory `base`.
/// Both inputs should be absolute; the result may climb with `..`.
pub fn relative_path(base: &Path, target: &Path) -> PathBuf {
    let base = normalize_path(base);
    let target = normalize_path(target);

    let base_parts: Vec<Component> = base.components().collect();
    let target_parts: Vec<Component> = target.components().collect();
    let common = base_parts
        .iter()
        .zip(target_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut result = PathBuf::new();
    for _ in common..base_parts.len() {
        result.push("..");
    }
    for part in &target_parts[common..] {
        result.push(part);
    }
    result
}

/// Render a path with forward slashes regardless of host platform.
pub fn forward_slashes(path: &Path) -> String {
    let parts: Vec<String> = path
        .components()
        .map(|c| match c {
            Component::RootDir => String::new(),
            other => other.as_os_str().to_string_lossy().into_owned(),
        })
        .collect();
    parts.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup_project(files: &[&str], dirs: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for d in dirs {
            fs::create_dir_all(dir.path().join(d)).unwrap();
        }
        for f in files {
            let full = dir.path().join(f);
            if let Some(parent) = full.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(&full, "// test file").unwrap();
        }
        dir
    }

    // -------------------------------------------------------
    // resolve_file
    // -------------------------------------------------------

    #[test]
    fn test_directory_resolves_to_index() {
        let dir = setup_project(&[], &["src/models"]);
        let candidate = dir.path().join("src/models");

        let resolved = resolve_file(&candidate, TargetExtension::Js);
        assert_eq!(resolved, candidate.join("index.js"));

        let resolved = resolve_file(&candidate, TargetExtension::Mjs);
        assert_eq!(resolved, candidate.join("index.mjs"));
    }

    #[test]
    fn test_source_file_swaps_to_target_extension() {
        let dir = setup_project(&["src/utils.ts"], &[]);
        let candidate = dir.path().join("src/utils");

        let resolved = resolve_file(&candidate, TargetExtension::Js);
        assert_eq!(resolved, dir.path().join("src/utils.js"));
    }

    #[test]
    fn test_tsx_source_swaps_to_target_extension() {
        let dir = setup_project(&["src/App.tsx"], &[]);
        let candidate = dir.path().join("src/App");

        let resolved = resolve_file(&candidate, TargetExtension::Mjs);
        assert_eq!(resolved, dir.path().join("src/App.mjs"));
    }

    #[test]
    fn test_directory_wins_over_sibling_source() {
        // Both src/models/ and src/models.ts exist; the directory probe runs first.
        let dir = setup_project(&["src/models.ts"], &["src/models"]);
        let candidate = dir.path().join("src/models");

        let resolved = resolve_file(&candidate, TargetExtension::Js);
        assert_eq!(resolved, candidate.join("index.js"));
    }

    #[test]
    fn test_existing_file_passes_through() {
        // Explicit-extension import: the candidate already names a real file.
        let dir = setup_project(&["src/data.json"], &[]);
        let candidate = dir.path().join("src/data.json");

        let resolved = resolve_file(&candidate, TargetExtension::Js);
        assert_eq!(resolved, candidate);
    }

    #[test]
    fn test_emitted_neighbor_keeps_target_extension() {
        let dir = setup_project(&["src/legacy.js"], &[]);
        let candidate = dir.path().join("src/legacy");

        let resolved = resolve_file(&candidate, TargetExtension::Js);
        assert_eq!(resolved, dir.path().join("src/legacy.js"));
    }

    #[test]
    fn test_unresolved_candidate_passes_through() {
        let dir = setup_project(&[], &[]);
        let candidate = dir.path().join("src/nonexistent");

        let resolved = resolve_file(&candidate, TargetExtension::Js);
        assert_eq!(resolved, candidate);
    }

    #[test]
    fn test_source_probe_wins_over_emitted_neighbor() {
        let dir = setup_project(&["src/utils.ts", "src/utils.js"], &[]);
        let candidate = dir.path().join("src/utils");

        let resolved = resolve_file(&candidate, TargetExtension::Mjs);
        assert_eq!(resolved, dir.path().join("src/utils.mjs"));
    }

    // -------------------------------------------------------
    // normalize_path
    // -------------------------------------------------------

    #[test]
    fn test_normalize_path_parent_dir() {
        assert_eq!(
            normalize_path(Path::new("/a/b/../c")),
            PathBuf::from("/a/c")
        );
    }

    #[test]
    fn test_normalize_path_current_dir() {
        assert_eq!(
            normalize_path(Path::new("/a/./b/./c")),
            PathBuf::from("/a/b/c")
        );
    }

    #[test]
    fn test_normalize_path_mixed() {
        assert_eq!(
            normalize_path(Path::new("/a/b/c/../../d/./e")),
            PathBuf::from("/a/d/e")
        );
    }

    #[test]
    fn test_normalize_path_no_change() {
        assert_eq!(normalize_path(Path::new("/a/b/c")), PathBuf::from("/a/b/c"));
    }

    // -------------------------------------------------------
    // relative_path / forward_slashes
    // -------------------------------------------------------

    #[test]
    fn test_relative_path_sibling_directory() {
        assert_eq!(
            relative_path(Path::new("/p/src/app"), Path::new("/p/src/lib/util.js")),
            PathBuf::from("../lib/util.js")
        );
    }

    #[test]
    fn test_relative_path_same_directory() {
        assert_eq!(
            relative_path(Path::new("/p/src"), Path::new("/p/src/util.js")),
            PathBuf::from("util.js")
        );
    }

    #[test]
    fn test_relative_path_descends() {
        assert_eq!(
            relative_path(Path::new("/p/src"), Path::new("/p/src/models/user.js")),
            PathBuf::from("models/user.js")
        );
    }

    #[test]
    fn test_relative_path_climbs_to_root_sibling() {
        assert_eq!(
            relative_path(Path::new("/p/src/a/b"), Path::new("/p/lib/x.js")),
            PathBuf::from("../../../lib/x.js")
        );
    }

    #[test]
    fn test_forward_slashes_relative() {
        assert_eq!(
            forward_slashes(Path::new("../lib/util.js")),
            "../lib/util.js"
        );
        assert_eq!(forward_slashes(Path::new("models/user.js")), "models/user.js");
    }
}
