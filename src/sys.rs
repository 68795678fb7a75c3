//! Capabilities the commands use to touch the outside world.
//!
//! Commands only see these traits, so tests run them against in-memory
//! implementations and inspect what they wrote and how they exited.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::error::Result;

/// Read access to files below the module root.
pub trait FileSystem {
    /// Read a whole file, or `None` when it does not exist.
    fn read(&self, path: &str) -> Result<Option<Vec<u8>>>;
}

/// Write access for generated reports.
pub trait FileWriter {
    fn write_file(&mut self, path: &str, contents: &[u8]) -> Result<()>;
}

/// Process termination.
pub trait Exiter {
    fn exit(&mut self, code: i32);
}

/// The real filesystem, with relative paths resolved against `root`.
#[derive(Debug, Clone)]
pub struct OsFs {
    root: PathBuf,
}

impl OsFs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl FileSystem for OsFs {
    fn read(&self, path: &str) -> Result<Option<Vec<u8>>> {
        match std::fs::read(self.root.join(path)) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Writes files below `root`, replacing existing ones.
#[derive(Debug, Clone)]
pub struct OsFileWriter {
    root: PathBuf,
}

impl OsFileWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl FileWriter for OsFileWriter {
    fn write_file(&mut self, path: &str, contents: &[u8]) -> Result<()> {
        std::fs::write(self.root.join(path), contents)?;
        Ok(())
    }
}

/// Exits the process.
#[derive(Debug, Default)]
pub struct ProcessExiter;

impl Exiter for ProcessExiter {
    fn exit(&mut self, code: i32) {
        std::process::exit(code);
    }
}

/// In-memory filesystem keyed by path.
#[derive(Debug, Clone, Default)]
pub struct MemFs {
    files: BTreeMap<String, Vec<u8>>,
}

impl MemFs {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, path: &str, contents: impl Into<Vec<u8>>) -> Self {
        self.insert(path, contents);
        self
    }

    pub fn insert(&mut self, path: &str, contents: impl Into<Vec<u8>>) {
        self.files.insert(path.to_string(), contents.into());
    }
}

impl FileSystem for MemFs {
    fn read(&self, path: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.files.get(path).cloned())
    }
}

/// Collects written files in memory.
#[derive(Debug, Default)]
pub struct MemFileWriter {
    files: BTreeMap<String, Vec<u8>>,
}

impl MemFileWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.files.get(path).map(Vec::as_slice)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl FileWriter for MemFileWriter {
    fn write_file(&mut self, path: &str, contents: &[u8]) -> Result<()> {
        self.files.insert(path.to_string(), contents.to_vec());
        Ok(())
    }
}

/// Remembers the exit code instead of exiting; 0 until `exit` is called.
#[derive(Debug, Default)]
pub struct RecordingExiter {
    pub code: i32,
}

impl Exiter for RecordingExiter {
    fn exit(&mut self, code: i32) {
        self.code = code;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_os_fs_reads_relative_to_root() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("go.mod"), "module m\n").unwrap();

        let fs = OsFs::new(dir.path());
        assert_eq!(fs.read("go.mod").unwrap().unwrap(), b"module m\n");
        assert!(fs.read("missing").unwrap().is_none());
    }

    #[test]
    fn test_os_file_writer_overwrites() {
        let dir = TempDir::new().unwrap();
        let mut writer = OsFileWriter::new(dir.path());
        writer.write_file("coverage.html", b"first").unwrap();
        writer.write_file("coverage.html", b"second").unwrap();

        let written = std::fs::read(dir.path().join("coverage.html")).unwrap();
        assert_eq!(written, b"second");
    }

    #[test]
    fn test_mem_capabilities() {
        let fs = MemFs::new().with("a.go", "package a");
        assert_eq!(fs.read("a.go").unwrap().unwrap(), b"package a");
        assert!(fs.read("b.go").unwrap().is_none());

        let mut writer = MemFileWriter::new();
        assert!(writer.is_empty());
        writer.write_file("out.html", b"<html>").unwrap();
        assert_eq!(writer.get("out.html"), Some(&b"<html>"[..]));

        let mut exiter = RecordingExiter::default();
        assert_eq!(exiter.code, 0);
        exiter.exit(1);
        assert_eq!(exiter.code, 1);
    }
}
