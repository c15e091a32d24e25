//! Discovery of route manifests.
//!
//! [`discover`] lists every identifier matching the configured glob and sorts
//! them in descending order. The order is independent of how the file system
//! enumerates entries, and it fixes the order in which versions are created
//! and records are accumulated.

use {
    crate::{Error, Result},
    globset::{GlobBuilder, GlobMatcher},
    std::path::Path,
    walkdir::WalkDir,
};

/// Lists identifiers matching a glob pattern.
pub trait GlobProvider {
    /// Returns every identifier matching `pattern`, in any order.
    ///
    /// Fails with [`ErrorKind::InvalidPattern`](crate::ErrorKind::InvalidPattern)
    /// when the pattern cannot be parsed. No match is not an error.
    fn list(&self, pattern: &str) -> Result<Vec<String>>;
}

/// Lists matching identifiers and sorts them in descending order.
///
/// Exact duplicates are removed so that no unit is loaded twice.
pub fn discover(glob: &dyn GlobProvider, pattern: &str) -> Result<Vec<String>> {
    let mut identifiers = glob.list(pattern)?;
    identifiers.sort_unstable_by(|a, b| b.cmp(a));
    identifiers.dedup();
    Ok(identifiers)
}

/// File-system glob provider.
///
/// Supports `*`, `?`, `**` (any number of directories), `[abc]` / `[!abc]`
/// character classes and `{a,b}` alternation. Only regular files are
/// returned; identifiers use `/` as separator.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsGlob;

impl GlobProvider for FsGlob {
    fn list(&self, pattern: &str) -> Result<Vec<String>> {
        let matcher = compile_glob(pattern)?;
        let base = literal_base(pattern);
        let root = if base.is_empty() { "." } else { base.as_str() };

        if !Path::new(root).exists() {
            tracing::debug!(pattern, root, "Glob base directory does not exist");
            return Ok(Vec::new());
        }

        let mut matches = Vec::new();
        for entry in WalkDir::new(root).follow_links(true) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path().to_string_lossy().replace('\\', "/");
            let candidate = if base.is_empty() {
                path.strip_prefix("./").unwrap_or(&path).to_string()
            } else {
                path
            };
            if matcher.is_match(&candidate) {
                matches.push(candidate);
            }
        }
        Ok(matches)
    }
}

fn is_glob_meta(c: char) -> bool {
    matches!(c, '*' | '?' | '[' | '{')
}

/// Leading directory components that contain no glob metacharacters.
fn literal_base(pattern: &str) -> String {
    let segments: Vec<&str> = pattern.split('/').collect();
    // the last segment names files, never a directory to walk from
    let dirs = &segments[..segments.len().saturating_sub(1)];
    let literal: Vec<&str> = dirs
        .iter()
        .take_while(|segment| !segment.chars().any(is_glob_meta))
        .copied()
        .collect();

    match literal.as_slice() {
        [] => String::new(),
        [""] => "/".to_string(),
        _ => literal.join("/"),
    }
}

/// Compiles a glob pattern; `*` and `?` never cross a `/`.
pub(crate) fn compile_glob(pattern: &str) -> Result<GlobMatcher> {
    if pattern.trim().is_empty() {
        return Err(Error::invalid_pattern("glob pattern is empty"));
    }

    GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|err| Error::invalid_pattern(format!("`{}`: {}", pattern, err)))
}
