//! Filesystem helpers shared by every persisted artifact.
//!
//! All writes go through `write_private`: the bytes land in a hidden
//! temp file created with mode 0600 next to the target, are flushed,
//! and the temp file is renamed over the target.  Readers never see a
//! half-written file.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::Path;

use crate::errors::{DurinError, Result};

/// Create the store directory (and parents) and make it mode 0700.
///
/// A directory that already exists is tightened to 0700 as well.
pub fn ensure_private_dir(dir: &Path) -> Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    builder.create(dir).map_err(DurinError::io(dir))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(dir, fs::Permissions::from_mode(0o700))
            .map_err(DurinError::io(dir))?;
    }
    Ok(())
}

/// Read a file, mapping "not found" to `None`.
///
/// Any other read error is propagated with the file path attached.
pub fn read_optional(path: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(data) => Ok(Some(data)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(DurinError::io(path)(e)),
    }
}

/// Replace `path` with `data`, owner read/write only.
pub fn write_private(path: &Path, data: &[u8]) -> Result<()> {
    let parent = path.parent().unwrap_or(Path::new("."));
    let tmp_path = parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ));

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(&tmp_path).map_err(DurinError::io(&tmp_path))?;
    file.write_all(data).map_err(DurinError::io(&tmp_path))?;
    file.sync_all().map_err(DurinError::io(&tmp_path))?;
    drop(file);

    fs::rename(&tmp_path, path).map_err(DurinError::io(path))?;
    Ok(())
}
