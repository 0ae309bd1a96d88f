use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// A document stored as a single file inside the data directory.
///
/// The directory is always passed in explicitly; nothing here reads ambient
/// state, so the caller decides where a session's files live.
pub trait Persistable: Sized + Default + Serialize + for<'de> Deserialize<'de> {
    fn filename() -> &'static str;
    fn is_json() -> bool;

    fn path_in(dir: &Path) -> PathBuf {
        dir.join(Self::filename())
    }

    /// Decodes file contents. Types with a custom on-disk layout override this.
    fn parse(contents: &str) -> Result<Self> {
        if Self::is_json() {
            Ok(serde_json::from_str(contents)?)
        } else {
            Ok(serde_norway::from_str(contents)?)
        }
    }

    fn render(&self) -> Result<String> {
        if Self::is_json() {
            serde_json::to_string_pretty(self).context("failed to serialize JSON")
        } else {
            serde_norway::to_string(self).context("failed to serialize YAML")
        }
    }

    /// Loads from `dir`, returning `Default` when the file does not exist.
    fn load_from(dir: &Path) -> Result<Self> {
        let path = Self::path_in(dir);
        match read_slot(&path)? {
            None => Ok(Self::default()),
            Some(contents) => {
                let kind = if Self::is_json() { "JSON" } else { "YAML" };
                Self::parse(&contents)
                    .with_context(|| format!("failed to parse {} from {}", kind, path.display()))
            }
        }
    }

    /// Replaces the file in `dir` with the current contents.
    fn save_to(&self, dir: &Path) -> Result<()> {
        let contents = self.render()?;
        write_atomic(&Self::path_in(dir), contents.as_bytes())
    }
}

/// Reads a whole file, mapping "not found" to `None`.
pub fn read_slot(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err).with_context(|| format!("failed to read {}", path.display())),
    }
}

/// Writes `bytes` to a temp file next to `path` and renames it into place,
/// so readers see either the old contents or the new ones.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).with_context(|| format!("failed to create dir {}", dir.display()))?;

    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to create temp file in {}", dir.display()))?;
    tmp.write_all(bytes)
        .with_context(|| format!("failed to write {}", path.display()))?;
    tmp.as_file()
        .sync_all()
        .with_context(|| format!("failed to sync {}", path.display()))?;
    tmp.persist(path)
        .map_err(|err| err.error)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
