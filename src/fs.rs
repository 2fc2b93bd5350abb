//! Filesystem collaborator traits
//!
//! The store never talks to the OS directly: it consumes a mounted
//! filesystem through these traits, the same way the on-device original
//! consumed the littlefs API. `StdFs` implements them over `std::fs` for
//! hosted targets and tests; embedded integrators supply their own backend,
//! and tests inject fault-raising wrappers to drive the recovery path.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;

/// A mounted filesystem, addressed by path
pub trait FileSystem: Send + Sync {
    /// Create `path` for writing, truncating any previous contents
    fn create(&self, path: &Path) -> io::Result<Box<dyn StorageFile>>;

    /// Open `path` for reading
    fn open(&self, path: &Path) -> io::Result<Box<dyn StorageFile>>;

    /// Size of `path` in bytes (stat)
    fn size(&self, path: &Path) -> io::Result<u64>;

    /// Unlink `path`
    fn remove(&self, path: &Path) -> io::Result<()>;

    /// Ensure `dir` exists
    fn create_dir_all(&self, dir: &Path) -> io::Result<()>;

    /// List regular files directly under `dir` as (name, size) pairs
    fn list(&self, dir: &Path) -> io::Result<Vec<(String, u64)>>;
}

/// An open file within a [`FileSystem`]
pub trait StorageFile: Send {
    /// Append exactly `buf.len()` bytes at the current end of file
    fn append(&mut self, buf: &[u8]) -> io::Result<()>;

    /// Read exactly `buf.len()` bytes starting at `offset`
    fn read_exact_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<()>;

    /// Flush buffered writes down to the device
    fn sync(&mut self) -> io::Result<()>;
}

/// `std::fs`-backed filesystem for hosted targets
#[derive(Debug, Default, Clone, Copy)]
pub struct StdFs;

impl FileSystem for StdFs {
    fn create(&self, path: &Path) -> io::Result<Box<dyn StorageFile>> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        Ok(Box::new(StdFile { file }))
    }

    fn open(&self, path: &Path) -> io::Result<Box<dyn StorageFile>> {
        let file = File::open(path)?;
        Ok(Box::new(StdFile { file }))
    }

    fn size(&self, path: &Path) -> io::Result<u64> {
        Ok(std::fs::metadata(path)?.len())
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }

    fn create_dir_all(&self, dir: &Path) -> io::Result<()> {
        std::fs::create_dir_all(dir)
    }

    fn list(&self, dir: &Path) -> io::Result<Vec<(String, u64)>> {
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let metadata = entry.metadata()?;
            if metadata.is_file() {
                entries.push((entry.file_name().to_string_lossy().into_owned(), metadata.len()));
            }
        }
        Ok(entries)
    }
}

/// `std::fs::File` wrapper implementing [`StorageFile`]
struct StdFile {
    file: File,
}

impl StorageFile for StdFile {
    fn append(&mut self, buf: &[u8]) -> io::Result<()> {
        self.file.seek(SeekFrom::End(0))?;
        self.file.write_all(buf)
    }

    fn read_exact_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<()> {
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.read_exact(buf)
    }

    fn sync(&mut self) -> io::Result<()> {
        self.file.sync_all()
    }
}
