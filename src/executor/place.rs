//! Copy or move a single file into the destination

use crate::executor::copy::copy_file_atomic;
use crate::types::{FlattenError, OperationMode};
use std::fs;
use std::io::{self, ErrorKind};
use std::path::Path;
use tracing::debug;

/// Place `src` at `dest` according to `mode`
///
/// Move mode tries a rename first. Across filesystems it falls back to an
/// atomic copy followed by removal of the source; if that removal fails the
/// copy stays in place and the error is returned. A symlink source is never
/// renamed: its target's content is copied and the link itself removed.
pub fn place_file(src: &Path, dest: &Path, mode: OperationMode) -> Result<(), FlattenError> {
    match mode {
        OperationMode::Copy => copy_file_atomic(src, dest).map(|_| ()),
        OperationMode::Move => move_file(src, dest),
    }
}

fn move_file(src: &Path, dest: &Path) -> Result<(), FlattenError> {
    let is_link = fs::symlink_metadata(src)
        .map_err(|e| FlattenError::placement(src, dest, e))?
        .file_type()
        .is_symlink();
    if is_link {
        debug!(src = %src.display(), "moving symlink by content");
        return copy_then_remove(src, dest);
    }

    match fs::rename(src, dest) {
        Ok(()) => Ok(()),
        Err(e) if crosses_devices(&e) => {
            debug!(
                src = %src.display(),
                dest = %dest.display(),
                "rename crosses filesystems, falling back to copy + remove"
            );
            copy_then_remove(src, dest)
        }
        Err(e) => Err(FlattenError::placement(src, dest, e)),
    }
}

fn copy_then_remove(src: &Path, dest: &Path) -> Result<(), FlattenError> {
    copy_file_atomic(src, dest)?;
    fs::remove_file(src).map_err(|e| FlattenError::placement(src, dest, e))
}

fn crosses_devices(error: &io::Error) -> bool {
    // EXDEV is 18 on Linux and macOS
    error.kind() == ErrorKind::CrossesDevices || error.raw_os_error() == Some(18)
}
