//! Whole-file reads and crash-safe writes for input and output files.

use getrandom::fill;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// A file on disk that is read or written as a single byte buffer.
///
/// Everything is held in memory; files larger than available memory are
/// not supported.
#[derive(Clone, Debug)]
pub(crate) struct Storage {
    path: PathBuf,
}

impl Storage {
    /// Creates a new Storage instance with the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Loads the entire file into memory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read.
    pub fn load(&self) -> Result<Vec<u8>> {
        fs::read(&self.path).map_err(|e| Error::io(&self.path, e))
    }

    /// Writes `data` to the file atomically.
    ///
    /// Data goes to a randomly named temporary file in the same directory,
    /// which is synced and then renamed over the target. After a crash or
    /// an error either the previous file or the complete new one is
    /// present, never a partial write. Once the rename has happened the
    /// write counts as done: a failed directory sync is only logged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be written, or
    /// [`Error::RandomnessUnavailable`] if no temporary name can be drawn.
    pub fn save(&self, data: &[u8]) -> Result<()> {
        let tmp_path = self.random_tmp_path()?;

        if let Err(e) = write_synced(&tmp_path, data) {
            let _ = fs::remove_file(&tmp_path);
            return Err(Error::io(&tmp_path, e));
        }

        if let Err(e) = self.atomic_replace(&tmp_path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(Error::io(&self.path, e));
        }

        if let Some(parent) = self.parent_dir() {
            sync_dir(parent);
        }

        tracing::trace!(path = %self.path.display(), bytes = data.len(), "file written");
        Ok(())
    }

    fn parent_dir(&self) -> Option<&Path> {
        self.path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
    }

    /// Format: `filename.tmp.<randomhex>`
    fn random_tmp_path(&self) -> Result<PathBuf> {
        let mut buf = [0u8; 8];
        fill(&mut buf).map_err(|_| Error::RandomnessUnavailable)?;

        let rand_string = buf.iter().map(|b| format!("{:02x}", b)).collect::<String>();

        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| Error::Usage(format!("not a file path: {}", self.path.display())))?
            .to_string_lossy();

        Ok(self
            .path
            .with_file_name(format!("{}.tmp.{}", file_name, rand_string)))
    }

    /// Uses `ReplaceFileW` with `REPLACEFILE_WRITE_THROUGH` so the swap is
    /// persisted. It needs an existing target, so new files are renamed.
    #[cfg(target_os = "windows")]
    fn atomic_replace(&self, tmp_path: &Path) -> io::Result<()> {
        use std::ffi::OsStr;
        use std::os::windows::ffi::OsStrExt;
        use windows_sys::Win32::Storage::FileSystem::{REPLACEFILE_WRITE_THROUGH, ReplaceFileW};

        if !self.path.exists() {
            return fs::rename(tmp_path, &self.path);
        }

        fn to_wide(s: &OsStr) -> Vec<u16> {
            s.encode_wide().chain(std::iter::once(0)).collect()
        }

        let target_w = to_wide(self.path.as_os_str());
        let tmp_w = to_wide(tmp_path.as_os_str());

        // SAFETY:
        // - Strings are valid UTF-16 and null-terminated
        // - Pointers remain valid during the call
        // - Windows does not retain the pointers after return
        let result = unsafe {
            ReplaceFileW(
                target_w.as_ptr(),
                tmp_w.as_ptr(),
                std::ptr::null(),
                REPLACEFILE_WRITE_THROUGH,
                std::ptr::null(),
                std::ptr::null(),
            )
        };

        if result == 0 {
            return Err(io::Error::last_os_error());
        }

        Ok(())
    }

    /// On Unix, `rename()` is atomic when both paths are on the same filesystem.
    #[cfg(not(target_os = "windows"))]
    fn atomic_replace(&self, tmp_path: &Path) -> io::Result<()> {
        fs::rename(tmp_path, &self.path)
    }
}

fn sync_dir(dir: &Path) {
    if let Err(e) = File::open(dir).and_then(|d| d.sync_all()) {
        tracing::warn!(dir = %dir.display(), error = %e, "directory sync failed");
    }
}

fn write_synced(path: &Path, data: &[u8]) -> io::Result<()> {
    // fail if exists
    let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
    file.write_all(data)?;
    file.sync_all()
}
