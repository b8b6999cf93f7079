//! Filesystem helpers the front-end treats as an external collaborator
//! (spec §1): reading source files and resolving import paths. Grounded on
//! `original_source/src/io.c` and spec §6's import rules.

use std::fmt::{self, Display};
use std::path::{Path, PathBuf};

/// Source file extension appended to bare (unquoted) import module names.
pub const SOURCE_EXTENSION: &str = "luka";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IoError(pub String);

impl Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for IoError {}

/// Reads a source file's full contents. The file extension is *not*
/// appended here — that only happens for bare import module names (see
/// [`resolve_import`]); a direct CLI argument or quoted import path is
/// used as-is.
pub fn read_source(path: &Path) -> Result<String, IoError> {
    std::fs::read_to_string(path).map_err(|e| IoError(format!("can't open file '{}': {e}", path.display())))
}

/// Resolves one `import` directive relative to the importing file's
/// directory.
///
/// - A quoted/absolute path (`is_bare = false`) is returned unchanged.
/// - A bare module name resolves relative to `importer_dir` with
///   `.luka` appended, e.g. `import foo` from `a/b.luka` resolves to
///   `a/foo.luka`.
pub fn resolve_import(importer_dir: &Path, spec: &str, is_bare: bool) -> PathBuf {
    if !is_bare {
        return PathBuf::from(spec);
    }

    let mut path = importer_dir.join(spec);
    if path.extension().is_none() {
        path.set_extension(SOURCE_EXTENSION);
    }
    path
}

/// Canonicalizes a path for use as a module table key, breaking import
/// cycles by identity (spec §4.6/§6). Falls back to a lexical cleanup if
/// the file does not exist yet (useful for tests that resolve paths
/// in-memory without touching disk).
pub fn canonicalize(path: &Path) -> Result<PathBuf, IoError> {
    match std::fs::canonicalize(path) {
        Ok(p) => Ok(p),
        Err(_) => Ok(path.to_path_buf()),
    }
}

/// Copies a compiled artifact to its final output location; used by the
/// driver after an external toolchain finishes codegen/link. Kept here
/// rather than in `codegen` since it is a plain filesystem operation, not
/// part of the codegen contract.
pub fn copy_artifact(from: &Path, to: &Path) -> Result<(), IoError> {
    std::fs::copy(from, to)
        .map(|_| ())
        .map_err(|e| IoError(format!("failed to copy '{}' to '{}': {e}", from.display(), to.display())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_import_gets_extension_appended() {
        let dir = Path::new("/project/src");
        let resolved = resolve_import(dir, "utils", true);
        assert_eq!(resolved, PathBuf::from("/project/src/utils.luka"));
    }

    #[test]
    fn quoted_import_passes_through() {
        let dir = Path::new("/project/src");
        let resolved = resolve_import(dir, "/abs/other.luka", false);
        assert_eq!(resolved, PathBuf::from("/abs/other.luka"));
    }

    #[test]
    fn bare_import_with_explicit_extension_is_not_doubled() {
        let dir = Path::new("/project/src");
        let resolved = resolve_import(dir, "utils.luka", true);
        assert_eq!(resolved, PathBuf::from("/project/src/utils.luka"));
    }
}
