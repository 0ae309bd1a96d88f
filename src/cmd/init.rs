use crate::data::entry_store::create_empty_file;
use crate::data::AppSettings;
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;

pub fn run(data_dir: &Path) -> Result<()> {
    fs::create_dir_all(data_dir)
        .with_context(|| format!("failed to create {}", data_dir.display()))?;
    run_in_dir(data_dir, &mut std::io::stdout())
}

/// Writes default files into `dir`, leaving existing ones untouched.
pub(crate) fn run_in_dir<W: Write>(dir: &Path, out: &mut W) -> Result<()> {
    let config = AppSettings::config_path(dir);
    if config.exists() {
        writeln!(out, "  kept     {}", config.display())?;
    } else {
        AppSettings::default().save_to(dir)?;
        writeln!(out, "  created  {}", config.display())?;
    }

    let entries = dir.join("energy_entries.json");
    if create_empty_file(dir)? {
        writeln!(out, "  created  {}", entries.display())?;
    } else {
        writeln!(out, "  kept     {}", entries.display())?;
    }

    writeln!(out, "Data directory ready: {}", dir.display())?;
    Ok(())
}
