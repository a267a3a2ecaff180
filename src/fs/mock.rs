// src/fs/mock.rs

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Result, anyhow};

use super::FileSystem;

#[derive(Debug, Clone)]
enum MockEntry {
    File(Vec<u8>),
    Dir,
}

/// In-memory filesystem for tests.
///
/// Clones share the same underlying entries, so a test can hold a handle
/// while the driver owns another.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    entries: Arc<Mutex<HashMap<PathBuf, MockEntry>>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let path = path.as_ref().to_path_buf();
        let mut entries = self.entries.lock().unwrap();
        Self::ensure_ancestors(&mut entries, &path);
        entries.insert(path, MockEntry::File(content.into()));
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();
        let mut entries = self.entries.lock().unwrap();
        Self::ensure_ancestors(&mut entries, &path);
        entries.insert(path, MockEntry::Dir);
    }

    fn ensure_ancestors(entries: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
        let mut current = path.parent();
        while let Some(dir) = current {
            if dir.as_os_str().is_empty() {
                break;
            }
            entries.entry(dir.to_path_buf()).or_insert(MockEntry::Dir);
            current = dir.parent();
        }
    }
}

impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        let entries = self.entries.lock().unwrap();
        match entries.get(path) {
            Some(MockEntry::File(content)) => {
                String::from_utf8(content.clone()).map_err(|e| anyhow!("invalid UTF-8: {e}"))
            }
            Some(MockEntry::Dir) => Err(anyhow!("is a directory: {:?}", path)),
            None => Err(anyhow!("file not found: {:?}", path)),
        }
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        self.add_file(path, contents);
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.entries.lock().unwrap().contains_key(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.entries.lock().unwrap().get(path), Some(MockEntry::Dir))
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let entries = self.entries.lock().unwrap();
        if !matches!(entries.get(path), Some(MockEntry::Dir)) {
            return Err(anyhow!("not a directory or not found: {:?}", path));
        }
        let mut out: Vec<PathBuf> = entries
            .keys()
            .filter(|p| p.parent() == Some(path))
            .cloned()
            .collect();
        out.sort();
        Ok(out)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.add_dir(path);
        Ok(())
    }

    fn remove_tree(&self, path: &Path) -> Result<()> {
        let mut entries = self.entries.lock().unwrap();
        entries.retain(|p, _| !p.starts_with(path));
        Ok(())
    }

    fn copy_tree(&self, from: &Path, to: &Path) -> Result<()> {
        let mut entries = self.entries.lock().unwrap();
        if !matches!(entries.get(from), Some(MockEntry::Dir)) {
            return Err(anyhow!("not a directory or not found: {:?}", from));
        }
        let copies: Vec<(PathBuf, MockEntry)> = entries
            .iter()
            .filter_map(|(p, e)| {
                p.strip_prefix(from)
                    .ok()
                    .map(|rel| (to.join(rel), e.clone()))
            })
            .collect();
        Self::ensure_ancestors(&mut entries, to);
        entries.insert(to.to_path_buf(), MockEntry::Dir);
        for (path, entry) in copies {
            entries.insert(path, entry);
        }
        Ok(())
    }
}
