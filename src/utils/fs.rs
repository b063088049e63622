//! File system utilities.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

const BUF_SIZE: usize = 1024 * 1024;

/// Stream `src` into a newly created `dst`.
///
/// `dst` is opened with create-new semantics so an existing file is never
/// clobbered. On any failure after `dst` was created, the partial file is
/// removed before the error is returned.
pub fn copy_file(src: &Path, dst: &Path) -> io::Result<u64> {
    let input = File::open(src)?;
    let output = OpenOptions::new().write(true).create_new(true).open(dst)?;

    let copied = (|| -> io::Result<u64> {
        let mut reader = BufReader::with_capacity(BUF_SIZE, input);
        let mut writer = BufWriter::with_capacity(BUF_SIZE, output);
        let bytes = io::copy(&mut reader, &mut writer)?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
        Ok(bytes)
    })();

    if copied.is_err() {
        if let Err(e) = fs::remove_file(dst) {
            tracing::warn!("Failed to clean up partial copy {:?}: {}", dst, e);
        }
    }
    copied
}

/// Best-effort copy of permission bits from `src` onto `dst`.
pub fn copy_permissions(src: &Path, dst: &Path) {
    let result = fs::metadata(src).and_then(|meta| fs::set_permissions(dst, meta.permissions()));
    if let Err(e) = result {
        tracing::debug!("Could not copy permissions to {:?}: {}", dst, e);
    }
}

/// Rename `src` to `dst`, failing with `AlreadyExists` instead of replacing
/// an existing `dst`.
///
/// Uses `renameat2(RENAME_NOREPLACE)`. Filesystems or kernels without it
/// return an error, and the caller falls back to copying.
#[cfg(target_os = "linux")]
pub fn rename_no_replace(src: &Path, dst: &Path) -> io::Result<()> {
    use rustix::fs::{renameat_with, RenameFlags, CWD};

    renameat_with(CWD, src, CWD, dst, RenameFlags::NOREPLACE).map_err(io::Error::from)
}

/// Rename `src` to `dst`, failing with `AlreadyExists` instead of replacing
/// an existing `dst`.
///
/// A hard link claims `dst` atomically; the source name is removed after.
#[cfg(not(target_os = "linux"))]
pub fn rename_no_replace(src: &Path, dst: &Path) -> io::Result<()> {
    fs::hard_link(src, dst)?;
    if let Err(e) = fs::remove_file(src) {
        // Leave exactly one name behind.
        if let Err(undo) = fs::remove_file(dst) {
            tracing::warn!("Failed to remove link {:?}: {}", dst, undo);
        }
        return Err(e);
    }
    Ok(())
}

/// Size of a file in bytes.
pub fn file_size(path: &Path) -> io::Result<u64> {
    Ok(fs::metadata(path)?.len())
}

/// Whether anything (file, directory or dangling symlink) occupies `path`.
pub fn occupied(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}
