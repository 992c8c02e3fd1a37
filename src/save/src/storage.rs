// src/save/src/storage.rs
//! Key-value backends the save manager writes through

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Single-document persistence keyed by name
pub trait SaveStorage {
    fn read(&self, key: &str) -> Result<Option<String>>;

    fn write(&mut self, key: &str, data: &str) -> Result<()>;

    /// Returns whether anything was removed
    fn remove(&mut self, key: &str) -> Result<bool>;

    fn exists(&self, key: &str) -> bool {
        matches!(self.read(key), Ok(Some(data)) if !data.is_empty())
    }
}

/// One `<key>.json` file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        if !dir.exists() {
            fs::create_dir_all(dir).context("Failed to create save directory")?;
        }
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl SaveStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read save file: {}", path.display()))?;
        Ok(Some(data))
    }

    /// Write to a temporary file first, then rename over the old save
    fn write(&mut self, key: &str, data: &str) -> Result<()> {
        let path = self.path_for(key);
        let temp_path = path.with_extension("tmp");

        let mut file =
            fs::File::create(&temp_path).context("Failed to create temporary save file")?;
        file.write_all(data.as_bytes())
            .context("Failed to write save data")?;
        file.flush().context("Failed to flush save data")?;
        file.sync_all().context("Failed to sync save data")?;

        fs::rename(&temp_path, &path).context("Failed to commit save file")?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<bool> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path).context("Failed to delete save file")?;
        Ok(true)
    }

    fn exists(&self, key: &str) -> bool {
        fs::metadata(self.path_for(key)).is_ok_and(|m| m.len() > 0)
    }
}

/// Process-local storage for tests and headless runs
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SaveStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, data: &str) -> Result<()> {
        self.entries.insert(key.to_string(), data.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<bool> {
        Ok(self.entries.remove(key).is_some())
    }
}
