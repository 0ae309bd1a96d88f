use crate::data::energy_entry::parse_date_key;
use crate::data::{AppSettings, EnergyEntry, EntryStore};
use anyhow::Result;
use std::path::Path;

pub fn run(data_dir: &Path, date: &str) -> Result<()> {
    let date = parse_date_key(date)?;
    let settings = AppSettings::load_from(data_dir)?;
    let store = EntryStore::load_read_only(data_dir, settings.on_corrupt_data)?;
    write_entry(date, store.get_date(date), &mut std::io::stdout())
}

pub(crate) fn write_entry<W: std::io::Write>(
    date: chrono::NaiveDate,
    entry: Option<&EnergyEntry>,
    out: &mut W,
) -> Result<()> {
    let Some(entry) = entry else {
        writeln!(out, "No entry for {}", date.format("%Y-%m-%d"))?;
        return Ok(());
    };
    writeln!(out, "Entry for {}", date.format("%A, %B %-d, %Y"))?;
    writeln!(out, "---")?;
    writeln!(out, "{:<12} {}/10", "Energy:", entry.level)?;
    if entry.activities.is_empty() {
        writeln!(out, "{:<12} -", "Activities:")?;
    } else {
        writeln!(out, "Activities:")?;
        for activity in &entry.activities {
            writeln!(out, "  - {}", activity)?;
        }
    }
    if !entry.notes.is_empty() {
        writeln!(out, "{:<12} {}", "Notes:", entry.notes)?;
    }
    Ok(())
}
