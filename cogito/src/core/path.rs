//! Lexical path resolution with `cd` semantics.

use std::io;
use std::path::{Path, PathBuf};

use path_absolutize::Absolutize;

/// Resolve `candidate` against `base` without touching the filesystem.
///
/// An absolute candidate replaces `base`. `.` segments are dropped and `..`
/// pops one segment, never above the root. Symlinks are not consulted.
pub fn resolve(base: &Path, candidate: &str) -> io::Result<PathBuf> {
    Path::new(candidate)
        .absolutize_from(base)
        .map(|resolved| resolved.into_owned())
}
