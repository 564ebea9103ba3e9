use std::path::{Component, Path, PathBuf};

use glob::{Pattern, glob};
use walkdir::WalkDir;

use crate::log::RunLog;

/// Check if a pattern contains glob wildcards (* or ?).
/// Patterns without wildcards are treated as literal directory paths.
pub fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Expand configured module entries into module directories under `root`.
///
/// Literal entries are taken as they are; glob entries expand to the matching
/// directories. The result is de-duplicated in configuration order.
pub fn discover_modules(root: &Path, entries: &[String], log: &mut RunLog) -> Vec<PathBuf> {
    let mut modules: Vec<PathBuf> = Vec::new();
    let mut push = |path: PathBuf| {
        if !modules.contains(&path) {
            modules.push(path);
        }
    };

    for entry in entries {
        if is_glob_pattern(entry) {
            let full_pattern = root.join(entry);
            match glob(&full_pattern.to_string_lossy()) {
                Ok(paths) => {
                    for path in paths.flatten() {
                        if path.is_dir() {
                            push(clean_path(&path));
                        }
                    }
                }
                Err(e) => log.warning(format!("Invalid module pattern '{}': {}", entry, e)),
            }
        } else {
            let path = clean_path(&root.join(entry));
            if path.is_dir() {
                push(path);
            } else {
                log.warning(format!("Module path does not exist: {}", path.display()));
            }
        }
    }

    modules
}

/// Drop `.` components so `root/.` and `root` name the same module.
fn clean_path(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// Compile exclude patterns, skipping invalid ones.
pub fn compile_patterns(patterns: &[String]) -> Vec<Pattern> {
    patterns.iter().filter_map(|p| Pattern::new(p).ok()).collect()
}

/// Files under `dir` whose `./relative/path` matches any include pattern and
/// no exclude pattern. Wildcards match across `/`, as with `fnmatch` without
/// `FNM_PATHNAME`. Results are sorted by path.
pub fn find_files(dir: &Path, includes: &[&str], excludes: &[Pattern]) -> Vec<PathBuf> {
    let includes: Vec<Pattern> = includes.iter().filter_map(|p| Pattern::new(p).ok()).collect();
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).sort_by_file_name().into_iter().flatten() {
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(dir) else {
            continue;
        };
        let matched = format!("./{}", rel.to_string_lossy());

        if includes.iter().any(|p| p.matches(&matched)) && !excludes.iter().any(|p| p.matches(&matched)) {
            files.push(entry.path().to_path_buf());
        }
    }

    files
}
