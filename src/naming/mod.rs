//! Conflict-free destination names

use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::Path;

/// Check whether anything (file, directory, even a dangling symlink) holds `path`
pub fn is_occupied(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Return `desired` if it is free in `dest_dir`, else the first free `stem_NNN.ext`
///
/// Suffixes are tried in increasing order starting at `_001`, zero-padded to
/// three digits and unbounded beyond that (`_1000`, ...). Existence is checked
/// against the live directory on every probe, so names taken earlier in the
/// same run are seen.
///
/// The extension is everything after the final '.', so `loop.tar.gz` becomes
/// `loop.tar_001.gz` and `.hidden` becomes `.hidden_001`.
pub fn next_free_name(dest_dir: &Path, desired: &OsStr) -> OsString {
    if !is_occupied(&dest_dir.join(desired)) {
        return desired.to_os_string();
    }

    suffixed_names(desired)
        .find(|candidate| !is_occupied(&dest_dir.join(candidate)))
        .unwrap_or_else(|| desired.to_os_string())
}

/// Endless sequence `stem_001.ext`, `stem_002.ext`, ... for `desired`
pub fn suffixed_names(desired: &OsStr) -> impl Iterator<Item = OsString> + '_ {
    let (stem, extension) = split_name(desired);
    (1u64..).map(move |counter| suffixed_name(stem, extension, counter))
}

fn split_name(name: &OsStr) -> (&OsStr, Option<&OsStr>) {
    let path = Path::new(name);
    match (path.file_stem(), path.extension()) {
        (Some(stem), extension) => (stem, extension),
        (None, _) => (name, None),
    }
}

fn suffixed_name(stem: &OsStr, extension: Option<&OsStr>, counter: u64) -> OsString {
    let mut name = stem.to_os_string();
    name.push(format!("_{:03}", counter));
    if let Some(ext) = extension {
        name.push(".");
        name.push(ext);
    }
    name
}
