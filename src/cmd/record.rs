use crate::data::energy_entry::parse_date_key;
use crate::data::{AppSettings, EnergyEntry, EnergyLevel, EntryStore};
use anyhow::Result;
use std::path::Path;
use tracing::info;

/// Upserts one entry from the command line, replacing any entry for that date.
pub fn run(
    data_dir: &Path,
    date: &str,
    level: u8,
    activities: Option<&str>,
    notes: Option<&str>,
) -> Result<()> {
    let entry = build_entry(date, level, activities, notes)?;
    let settings = AppSettings::load_from(data_dir)?;
    let mut store = EntryStore::load(data_dir, settings.on_corrupt_data)?;
    let replaced = store.get(&entry.key()).is_some();
    store.upsert(entry.clone())?;
    info!(date = %entry.key(), replaced, "recorded energy entry");
    println!(
        "{} entry for {} (energy {}/10)",
        if replaced { "Replaced" } else { "Saved" },
        entry.key(),
        entry.level
    );
    Ok(())
}

pub(crate) fn build_entry(
    date: &str,
    level: u8,
    activities: Option<&str>,
    notes: Option<&str>,
) -> Result<EnergyEntry> {
    let date = parse_date_key(date)?;
    let level = EnergyLevel::new(level)?;
    Ok(EnergyEntry::new(
        date,
        level,
        activities.unwrap_or_default(),
        notes.unwrap_or_default(),
    ))
}
