//! Live filesystem adapter using `std::fs`.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::ports::filesystem::FileSystem;

/// Live filesystem adapter backed by real disk I/O.
///
/// Writes go to an unpredictable sibling temp file, synced to disk, which
/// is then renamed over the target.
pub struct LiveFileSystem;

impl FileSystem for LiveFileSystem {
    fn read_to_string(
        &self,
        path: &Path,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        Ok(std::fs::read_to_string(path)?)
    }

    fn write(
        &self,
        path: &Path,
        contents: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let parent = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent)?;

        let mut staging = NamedTempFile::new_in(parent)?;
        staging.write_all(contents.as_bytes())?;
        staging.as_file().sync_all()?;
        staging.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}
