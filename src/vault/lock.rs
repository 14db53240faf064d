//! Exclusive advisory lock over a store directory.
//!
//! `StoreLock::acquire` opens (creating if needed) `<dir>/lock` and takes
//! a non-blocking `flock(LOCK_EX)`.  The lock lives exactly as long as
//! the returned guard: dropping it unlocks and closes the file, on every
//! exit path.  A second holder, in this or another process, fails fast
//! with `LockHeld` instead of waiting.
//!
//! `LockFileEx` plays the part of `flock` on Windows.  Platforms with
//! neither refuse to open a store.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use crate::errors::{DurinError, Result};

/// Name of the lock file inside the store directory.
pub const LOCK_FILE: &str = "lock";

/// Guard holding the exclusive lock on a store directory.
#[derive(Debug)]
pub struct StoreLock {
    file: File,
    path: PathBuf,
}

impl StoreLock {
    /// Acquire the lock on `dir`, failing immediately if it is held.
    pub fn acquire(dir: &Path) -> Result<Self> {
        let path = dir.join(LOCK_FILE);

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(false);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let file = options.open(&path).map_err(DurinError::io(&path))?;

        match try_lock_exclusive(&file) {
            Ok(true) => {
                tracing::debug!(path = %path.display(), "acquired store lock");
                Ok(Self { file, path })
            }
            Ok(false) => Err(DurinError::LockHeld(dir.to_path_buf())),
            Err(e) => Err(DurinError::io(&path)(e)),
        }
    }

    /// Path of the lock file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        let _ = unlock(&self.file);
        tracing::debug!(path = %self.path.display(), "released store lock");
    }
}

#[cfg(unix)]
fn try_lock_exclusive(file: &File) -> std::io::Result<bool> {
    use std::os::unix::io::AsRawFd;

    let result = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) };
    if result == 0 {
        return Ok(true);
    }
    let err = std::io::Error::last_os_error();
    if err.kind() == std::io::ErrorKind::WouldBlock {
        Ok(false)
    } else {
        Err(err)
    }
}

#[cfg(unix)]
fn unlock(file: &File) -> std::io::Result<()> {
    use std::os::unix::io::AsRawFd;

    let result = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_UN) };
    if result == 0 {
        Ok(())
    } else {
        Err(std::io::Error::last_os_error())
    }
}

// Windows: LockFileEx on the first byte of the lock file.

#[cfg(windows)]
fn try_lock_exclusive(file: &File) -> std::io::Result<bool> {
    use std::os::windows::io::AsRawHandle;

    let handle = file.as_raw_handle() as HANDLE;
    let mut overlapped: OVERLAPPED = unsafe { std::mem::zeroed() };
    let result = unsafe {
        LockFileEx(
            handle,
            LOCKFILE_EXCLUSIVE_LOCK | LOCKFILE_FAIL_IMMEDIATELY,
            0,
            1,
            0,
            &mut overlapped,
        )
    };
    if result != 0 {
        return Ok(true);
    }
    let err = std::io::Error::last_os_error();
    if err.raw_os_error() == Some(ERROR_LOCK_VIOLATION) {
        Ok(false)
    } else {
        Err(err)
    }
}

#[cfg(windows)]
fn unlock(file: &File) -> std::io::Result<()> {
    use std::os::windows::io::AsRawHandle;

    let handle = file.as_raw_handle() as HANDLE;
    let mut overlapped: OVERLAPPED = unsafe { std::mem::zeroed() };
    let result = unsafe { UnlockFileEx(handle, 0, 1, 0, &mut overlapped) };
    if result != 0 {
        Ok(())
    } else {
        Err(std::io::Error::last_os_error())
    }
}

#[cfg(windows)]
type HANDLE = *mut std::ffi::c_void;

#[cfg(windows)]
#[repr(C)]
struct OVERLAPPED {
    internal: usize,
    internal_high: usize,
    offset: u32,
    offset_high: u32,
    h_event: HANDLE,
}

#[cfg(windows)]
const LOCKFILE_FAIL_IMMEDIATELY: u32 = 0x1;
#[cfg(windows)]
const LOCKFILE_EXCLUSIVE_LOCK: u32 = 0x2;
#[cfg(windows)]
const ERROR_LOCK_VIOLATION: i32 = 33;

#[cfg(windows)]
extern "system" {
    fn LockFileEx(
        h_file: HANDLE,
        flags: u32,
        reserved: u32,
        bytes_to_lock_low: u32,
        bytes_to_lock_high: u32,
        overlapped: *mut OVERLAPPED,
    ) -> i32;
    fn UnlockFileEx(
        h_file: HANDLE,
        reserved: u32,
        bytes_to_unlock_low: u32,
        bytes_to_unlock_high: u32,
        overlapped: *mut OVERLAPPED,
    ) -> i32;
}

// Anywhere else there is no lock to take, so opening a store fails.

#[cfg(not(any(unix, windows)))]
fn try_lock_exclusive(_file: &File) -> std::io::Result<bool> {
    Err(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "exclusive file locks are not supported on this platform",
    ))
}

#[cfg(not(any(unix, windows)))]
fn unlock(_file: &File) -> std::io::Result<()> {
    Ok(())
}

#[cfg(all(test, any(unix, windows)))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn second_acquire_fails_while_held() {
        let dir = TempDir::new().unwrap();
        let first = StoreLock::acquire(dir.path()).unwrap();

        let second = StoreLock::acquire(dir.path());
        assert!(matches!(second, Err(DurinError::LockHeld(_))));

        drop(first);
        assert!(StoreLock::acquire(dir.path()).is_ok());
    }

    #[test]
    fn lock_file_is_created_in_store_dir() {
        let dir = TempDir::new().unwrap();
        let lock = StoreLock::acquire(dir.path()).unwrap();
        assert_eq!(lock.path(), dir.path().join(LOCK_FILE));
        assert!(lock.path().exists());
    }
}
