//! Media storage: store uploaded bytes, hand back an opaque handle.
//!
//! The handle is the stored file's path. Jobs carry it verbatim; nothing in
//! the lifecycle manager interprets it.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::StorageError;

/// Strips any directory components from a client-supplied filename and
/// replaces characters that are unsafe on common filesystems.
fn sanitize_filename(filename: &str) -> String {
    let base = Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("");
    base.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

pub struct MediaStorage {
    upload_directory: PathBuf,
}

impl MediaStorage {
    pub fn new<P: AsRef<Path>>(upload_directory: P) -> Self {
        Self {
            upload_directory: upload_directory.as_ref().to_path_buf(),
        }
    }

    pub fn upload_directory(&self) -> &Path {
        &self.upload_directory
    }

    /// Stores `content` under the sanitized `filename`, returning the
    /// stored path as the handle. Uses atomic `create_new` (O_EXCL) with
    /// numbered variants so concurrent uploads of the same filename never
    /// clobber each other.
    pub fn store(&self, content: &[u8], filename: &str) -> Result<PathBuf, StorageError> {
        let filename = sanitize_filename(filename);
        if filename.is_empty() {
            return Err(StorageError::EmptyFilename);
        }

        std::fs::create_dir_all(&self.upload_directory).map_err(|e| {
            StorageError::CreateDirectory {
                path: self.upload_directory.clone(),
                source: e,
            }
        })?;

        let (base, ext) = match filename.rfind('.') {
            Some(dot_pos) if dot_pos > 0 => (&filename[..dot_pos], Some(&filename[dot_pos..])),
            _ => (filename.as_str(), None),
        };

        // Try the original filename first, then numbered variants.
        for counter in 1..=1000 {
            let try_filename = if counter == 1 {
                filename.clone()
            } else {
                match ext {
                    Some(ext) => format!("{}_{}{}", base, counter, ext),
                    None => format!("{}_{}", base, counter),
                }
            };

            let try_path = self.upload_directory.join(&try_filename);

            // create_new fails if the file exists - atomic check-and-create.
            match std::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&try_path)
            {
                Ok(mut file) => {
                    file.write_all(content)
                        .map_err(|e| StorageError::WriteFile {
                            path: try_path.clone(),
                            source: e,
                        })?;
                    return Ok(try_path);
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    continue;
                }
                Err(e) => {
                    return Err(StorageError::WriteFile {
                        path: try_path,
                        source: e,
                    });
                }
            }
        }

        Err(StorageError::TooManyConflicts(filename))
    }

    /// Reads back the bytes behind a handle.
    pub fn retrieve(&self, handle: &Path) -> Result<Vec<u8>, StorageError> {
        std::fs::read(handle).map_err(|e| StorageError::ReadFile {
            path: handle.to_path_buf(),
            source: e,
        })
    }
}
