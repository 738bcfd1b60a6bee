use crate::{CommonError, CommonResult};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// File system abstraction for document persistence and testing
pub trait FileSystem {
    /// Check if a file exists
    fn exists(&self, path: &Path) -> bool;

    /// Read a whole file as UTF-8
    fn read_to_string(&self, path: &Path) -> CommonResult<String>;

    /// Write a whole file, replacing any previous content
    fn write(&self, path: &Path, contents: &str) -> CommonResult<()>;
}

/// Real file system implementation
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_to_string(&self, path: &Path) -> CommonResult<String> {
        if !path.exists() {
            return Err(CommonError::NotFound(path.to_path_buf()));
        }
        std::fs::read_to_string(path).map_err(|e| CommonError::io(path, e))
    }

    fn write(&self, path: &Path, contents: &str) -> CommonResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| CommonError::io(parent, e))?;
            }
        }
        std::fs::write(path, contents).map_err(|e| CommonError::io(path, e))
    }
}

/// In-memory file system for testing
pub struct MockFileSystem {
    files: RefCell<HashMap<PathBuf, String>>,
    /// Number of successful writes, for asserting persistence happened
    writes: RefCell<usize>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self {
            files: RefCell::new(HashMap::new()),
            writes: RefCell::new(0),
        }
    }

    pub fn add_file(&self, path: impl Into<PathBuf>, contents: impl Into<String>) {
        self.files.borrow_mut().insert(path.into(), contents.into());
    }

    pub fn contents(&self, path: &Path) -> Option<String> {
        self.files.borrow().get(path).cloned()
    }

    pub fn write_count(&self) -> usize {
        *self.writes.borrow()
    }
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for MockFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.files.borrow().contains_key(path)
    }

    fn read_to_string(&self, path: &Path) -> CommonResult<String> {
        self.files
            .borrow()
            .get(path)
            .cloned()
            .ok_or_else(|| CommonError::NotFound(path.to_path_buf()))
    }

    fn write(&self, path: &Path, contents: &str) -> CommonResult<()> {
        self.files
            .borrow_mut()
            .insert(path.to_path_buf(), contents.to_string());
        *self.writes.borrow_mut() += 1;
        Ok(())
    }
}
