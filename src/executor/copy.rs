//! Atomic file copy implementation

use crate::types::FlattenError;
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

const COPY_BUFFER_SIZE: usize = 128 * 1024;
const MAX_PART_ATTEMPTS: u32 = 1000;

/// Copy a file atomically using the write-then-rename strategy
///
/// 1. Write to a new hidden temporary sibling (`.<name>.flattener-part`,
///    numbered if that name is taken)
/// 2. Flush and sync to disk
/// 3. Preserve metadata (permissions, mtime)
/// 4. Rename to the final destination
///
/// A reader of the destination directory never sees a half-written file
/// under the final name. The temporary file is removed if any step fails.
///
/// # Returns
/// * `Ok(u64)` - Number of bytes copied
/// * `Err(FlattenError)` - Placement error (permission and disk-full classified)
///
/// # Example
/// ```no_run
/// use flattener::executor::copy_file_atomic;
/// use std::path::Path;
///
/// let bytes = copy_file_atomic(Path::new("in/a/kick.wav"), Path::new("out/kick.wav"))?;
/// # Ok::<(), flattener::FlattenError>(())
/// ```
pub fn copy_file_atomic(src: &Path, dest: &Path) -> Result<u64, FlattenError> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|e| FlattenError::placement(src, dest, e))?;
    }

    let src_file = File::open(src).map_err(|e| FlattenError::placement(src, dest, e))?;
    let (part_file, part_path) =
        create_part_file(dest).map_err(|e| FlattenError::placement(src, dest, e))?;

    match copy_via_part(src_file, part_file, src, dest, &part_path) {
        Ok(bytes) => Ok(bytes),
        Err(e) => {
            let _ = fs::remove_file(&part_path);
            Err(FlattenError::placement(src, dest, e))
        }
    }
}

fn copy_via_part(
    mut src_file: File,
    mut part_file: File,
    src: &Path,
    dest: &Path,
    part_path: &Path,
) -> io::Result<u64> {
    let mut buffer = vec![0u8; COPY_BUFFER_SIZE];
    let mut total_bytes = 0u64;

    loop {
        let bytes_read = src_file.read(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        part_file.write_all(&buffer[0..bytes_read])?;
        total_bytes += bytes_read as u64;
    }

    part_file.sync_all()?;

    // Drop the file handle before rename (required on Windows)
    drop(part_file);

    let src_metadata = fs::metadata(src)?;
    fs::set_permissions(part_path, src_metadata.permissions())?;
    let mtime = filetime::FileTime::from_last_modification_time(&src_metadata);
    filetime::set_file_mtime(part_path, mtime)?;

    fs::rename(part_path, dest)?;

    Ok(total_bytes)
}

/// Create the part file with `create_new`, never truncating an existing entry.
///
/// A taken name (a user's file that happens to look like a part file, or one
/// placed earlier in the run) moves on to `.<name>.flattener-part-1`, `-2`, ...
fn create_part_file(dest: &Path) -> io::Result<(File, PathBuf)> {
    for attempt in 0..MAX_PART_ATTEMPTS {
        let path = part_path_for(dest, attempt);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((file, path)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e),
        }
    }
    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("no free temporary name next to {}", dest.display()),
    ))
}

/// Temporary sibling path used while `dest` is being written
pub fn part_path_for(dest: &Path, attempt: u32) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(dest.file_name().unwrap_or_default());
    name.push(".flattener-part");
    if attempt > 0 {
        name.push(format!("-{}", attempt));
    }
    dest.with_file_name(name)
}
