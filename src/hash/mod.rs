//! Content hashing and byte-identity comparison

use crate::types::FlattenError;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use tracing::trace;

const HASH_CHUNK_SIZE: usize = 64 * 1024;

/// Compute the Blake3 hash of a file
///
/// The file is streamed in 64KB chunks, so memory use does not grow with
/// file size.
///
/// # Errors
/// * `FlattenError::Hash` if the file cannot be opened or a read fails mid-stream
///
/// # Example
/// ```no_run
/// use flattener::hash::compute_hash;
/// use std::path::Path;
///
/// let hash = compute_hash(Path::new("file.wav"))?;
/// # Ok::<(), flattener::FlattenError>(())
/// ```
pub fn compute_hash(file_path: &Path) -> Result<[u8; 32], FlattenError> {
    let mut file = File::open(file_path).map_err(|e| FlattenError::hash(file_path, e))?;
    let mut hasher = blake3::Hasher::new();
    let mut buffer = vec![0u8; HASH_CHUNK_SIZE];

    loop {
        let bytes_read = file
            .read(&mut buffer)
            .map_err(|e| FlattenError::hash(file_path, e))?;

        if bytes_read == 0 {
            break; // EOF
        }

        hasher.update(&buffer[0..bytes_read]);
    }

    Ok(*hasher.finalize().as_bytes())
}

/// Decide whether two files hold byte-identical content
///
/// Sizes are compared first from metadata; only same-sized files are hashed.
/// Two empty files are identical. A path that exists but is not a regular
/// file (a directory occupying the name, a dangling symlink) never matches.
///
/// # Errors
/// * `FlattenError::Hash` if either file cannot be read. A read failure is
///   never reported as "different".
pub fn files_identical(a: &Path, b: &Path) -> Result<bool, FlattenError> {
    let (Some(meta_a), Some(meta_b)) = (regular_file_metadata(a)?, regular_file_metadata(b)?)
    else {
        return Ok(false);
    };

    if meta_a.len() != meta_b.len() {
        trace!(a = %a.display(), b = %b.display(), "size mismatch");
        return Ok(false);
    }

    if meta_a.len() == 0 {
        return Ok(true);
    }

    Ok(compute_hash(a)? == compute_hash(b)?)
}

/// Metadata of the regular file behind `path`, or `None` if `path` is not one.
///
/// A dangling symlink is `None`, not an error: there is no content to read.
fn regular_file_metadata(path: &Path) -> Result<Option<fs::Metadata>, FlattenError> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_file() => Ok(Some(meta)),
        Ok(_) => Ok(None),
        Err(e) => match fs::symlink_metadata(path) {
            Ok(link) if link.file_type().is_symlink() => Ok(None),
            _ => Err(FlattenError::hash(path, e)),
        },
    }
}
