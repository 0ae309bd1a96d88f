use crate::calc::MonthView;
use crate::data::app_settings::CorruptDataPolicy;
use crate::data::energy_entry::{date_key, EnergyEntry};
use crate::data::persistence::{read_slot, Persistable};
use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Newest layout this build writes and understands.
pub const SCHEMA_VERSION: u32 = 1;

/// On-disk form of the store: a versioned envelope around the date map.
///
/// Version 0 is the bare `{ "YYYY-MM-DD": entry }` map with no envelope.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct EntryFile {
    version: u32,
    entries: BTreeMap<String, EnergyEntry>,
}

impl Default for EntryFile {
    fn default() -> Self {
        EntryFile {
            version: SCHEMA_VERSION,
            entries: BTreeMap::new(),
        }
    }
}

impl Persistable for EntryFile {
    fn filename() -> &'static str {
        "energy_entries.json"
    }
    fn is_json() -> bool {
        true
    }

    fn parse(contents: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(contents)?;
        let file = if value.get("version").is_some() {
            serde_json::from_value::<EntryFile>(value)?
        } else {
            EntryFile {
                version: 0,
                entries: serde_json::from_value(value)?,
            }
        };
        if file.version > SCHEMA_VERSION {
            bail!(
                "unsupported schema version {} (newest supported is {})",
                file.version,
                SCHEMA_VERSION
            );
        }
        for (key, entry) in &file.entries {
            let expected = entry.key();
            if *key != expected {
                bail!("entry stored under '{}' is dated {}", key, expected);
            }
        }
        Ok(file)
    }
}

/// Outcome of reading the entries file, before any corrupt-data policy applies.
enum Slot {
    Missing,
    Parsed(EntryFile),
    Corrupt(anyhow::Error),
}

fn read_entries(path: &Path) -> Result<Slot> {
    let Some(contents) = read_slot(path)? else {
        return Ok(Slot::Missing);
    };
    Ok(match EntryFile::parse(&contents) {
        Ok(file) => Slot::Parsed(file),
        Err(err) => Slot::Corrupt(
            err.context(format!("failed to parse JSON from {}", path.display())),
        ),
    })
}

/// Date-keyed energy entries bound to the directory they persist into.
#[derive(Debug)]
pub struct EntryStore {
    dir: PathBuf,
    entries: BTreeMap<String, EnergyEntry>,
    /// Set while an upsert has not reached disk.
    dirty: bool,
}

impl EntryStore {
    /// An empty store that will persist into `dir`. Touches nothing on disk.
    pub fn new(dir: &Path) -> Self {
        EntryStore {
            dir: dir.to_path_buf(),
            entries: BTreeMap::new(),
            dirty: false,
        }
    }

    fn from_file(dir: &Path, path: &Path, file: EntryFile) -> Self {
        info!(
            path = %path.display(),
            entries = file.entries.len(),
            version = file.version,
            "loaded energy entries"
        );
        EntryStore {
            dir: dir.to_path_buf(),
            entries: file.entries,
            dirty: false,
        }
    }

    /// Loads the store for a session that will write to it.
    ///
    /// Under [`CorruptDataPolicy::Reset`] an unreadable file is moved aside so
    /// the next persist cannot overwrite it.
    pub fn load(dir: &Path, policy: CorruptDataPolicy) -> Result<Self> {
        let path = EntryFile::path_in(dir);
        match (read_entries(&path)?, policy) {
            (Slot::Missing, _) => {
                info!(path = %path.display(), "no entries file yet, starting empty");
                Ok(Self::new(dir))
            }
            (Slot::Parsed(file), _) => Ok(Self::from_file(dir, &path, file)),
            (Slot::Corrupt(err), CorruptDataPolicy::Fail) => Err(err),
            (Slot::Corrupt(err), CorruptDataPolicy::Reset) => {
                let aside = quarantine(&path)?;
                let reason = format!("{err:#}");
                warn!(
                    error = %reason,
                    moved_to = %aside.display(),
                    "entries file unreadable, starting empty"
                );
                Ok(Self::new(dir))
            }
        }
    }

    /// Loads the store for reporting only. Never changes anything on disk:
    /// under [`CorruptDataPolicy::Reset`] an unreadable file reads as empty
    /// and stays where it is.
    pub fn load_read_only(dir: &Path, policy: CorruptDataPolicy) -> Result<Self> {
        let path = EntryFile::path_in(dir);
        match (read_entries(&path)?, policy) {
            (Slot::Missing, _) => Ok(Self::new(dir)),
            (Slot::Parsed(file), _) => Ok(Self::from_file(dir, &path, file)),
            (Slot::Corrupt(err), CorruptDataPolicy::Fail) => Err(err),
            (Slot::Corrupt(err), CorruptDataPolicy::Reset) => {
                let reason = format!("{err:#}");
                warn!(error = %reason, "entries file unreadable, showing no entries");
                Ok(Self::new(dir))
            }
        }
    }

    pub fn path(&self) -> PathBuf {
        EntryFile::path_in(&self.dir)
    }

    pub fn get(&self, key: &str) -> Option<&EnergyEntry> {
        self.entries.get(key)
    }

    pub fn get_date(&self, date: NaiveDate) -> Option<&EnergyEntry> {
        self.entries.get(&date_key(date))
    }

    /// Inserts or fully replaces the entry for `entry.date`, then persists.
    ///
    /// The in-memory change is kept even when the write fails.
    pub fn upsert(&mut self, entry: EnergyEntry) -> Result<()> {
        let key = entry.key();
        let replaced = self.entries.insert(key.clone(), entry).is_some();
        debug!(key = %key, replaced, "upserted energy entry");
        self.dirty = true;
        self.persist()?;
        self.dirty = false;
        Ok(())
    }

    /// True when an upsert failed to reach disk and has not been written since.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Persists only if an earlier write failed. Returns true if it wrote.
    pub fn flush(&mut self) -> Result<bool> {
        if !self.dirty {
            return Ok(false);
        }
        self.persist()?;
        self.dirty = false;
        Ok(true)
    }

    pub fn persist(&self) -> Result<()> {
        let file = EntryFile {
            version: SCHEMA_VERSION,
            entries: self.entries.clone(),
        };
        file.save_to(&self.dir)
            .with_context(|| format!("failed to persist {} entries", self.entries.len()))?;
        debug!(path = %self.path().display(), entries = self.entries.len(), "persisted energy entries");
        Ok(())
    }

    /// All entries in date order.
    pub fn entries(&self) -> impl Iterator<Item = &EnergyEntry> {
        self.entries.values()
    }

    pub fn entries_in_month(&self, month: MonthView) -> impl Iterator<Item = &EnergyEntry> {
        self.entries.values().filter(move |e| month.contains(e.date))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Renames an unreadable file out of the way so the next persist cannot clobber it.
fn quarantine(path: &Path) -> Result<PathBuf> {
    let stamp = Local::now().format("%Y%m%d%H%M%S");
    let mut aside = path.as_os_str().to_owned();
    aside.push(format!(".corrupt-{}", stamp));
    let aside = PathBuf::from(aside);
    fs::rename(path, &aside)
        .with_context(|| format!("failed to move {} aside", path.display()))?;
    Ok(aside)
}

/// Writes an empty entries file unless one already exists. Returns true if written.
pub fn create_empty_file(dir: &Path) -> Result<bool> {
    let path = EntryFile::path_in(dir);
    if path.exists() {
        return Ok(false);
    }
    EntryFile::default().save_to(dir)?;
    Ok(true)
}
