use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::errors::*;

/// A file writer that only makes its output visible on success.
///
/// All bytes go to a scratch file next to the final path; [`finish`]
/// renames it into place. Dropping the writer without finishing removes
/// the scratch file and leaves any previous output untouched.
///
/// [`finish`]: AtomicWriter::finish
pub struct AtomicWriter {
    file: Option<File>,
    scratch_path: PathBuf,
    final_path: PathBuf,
}

impl AtomicWriter {
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let final_path = path.as_ref().to_owned();

        let file_name = final_path
            .file_name()
            .ok_or_else(|| Error::FileIo {
                file: final_path.display().to_string(),
                source: "path has no file name".into(),
            })?
            .to_owned();

        if let Some(parent) = final_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| Error::FileIo {
                    file: final_path.display().to_string(),
                    source: Box::new(e),
                })?;
            }
        }

        let mut scratch_name = std::ffi::OsString::from(".");
        scratch_name.push(&file_name);
        scratch_name.push(".partial");
        let scratch_path = final_path.with_file_name(scratch_name);

        let file = File::create(&scratch_path).map_err(|e| Error::FileIo {
            file: final_path.display().to_string(),
            source: Box::new(e),
        })?;

        Ok(Self {
            file: Some(file),
            scratch_path,
            final_path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.final_path
    }

    /// Flushes, closes, and renames the scratch file onto the final path.
    /// On failure the scratch file is removed and the previous output, if
    /// any, stays as it was.
    pub fn finish(mut self) -> Result<()> {
        let Some(file) = self.file.take() else {
            return Ok(());
        };

        let synced = file.sync_all();
        drop(file);

        let res = synced.and_then(|_| std::fs::rename(&self.scratch_path, &self.final_path));

        if let Err(e) = res {
            let _ = std::fs::remove_file(&self.scratch_path);
            return Err(Error::FileIo {
                file: self.final_path.display().to_string(),
                source: Box::new(e),
            });
        }

        Ok(())
    }
}

impl Write for AtomicWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.file {
            Some(f) => f.write(buf),
            None => Err(io::Error::new(
                io::ErrorKind::Other,
                "writer already finished",
            )),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.file {
            Some(f) => f.flush(),
            None => Ok(()),
        }
    }
}

impl Drop for AtomicWriter {
    fn drop(&mut self) {
        if self.file.take().is_some() {
            let _ = std::fs::remove_file(&self.scratch_path);
        }
    }
}
