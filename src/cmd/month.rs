use crate::calc::{EnergyBucket, GridCell, MonthView};
use crate::data::energy_entry::format_activities;
use crate::data::{AppSettings, EntryStore};
use anyhow::Result;
use chrono::{Local, NaiveDate};
use std::io::Write;
use std::path::Path;

const CELL_WIDTH: usize = 5;

pub fn run(data_dir: &Path, month: Option<&str>) -> Result<()> {
    let today = Local::now().date_naive();
    let month = resolve_month(month, today)?;
    let settings = AppSettings::load_from(data_dir)?;
    let store = EntryStore::load_read_only(data_dir, settings.on_corrupt_data)?;
    write_month(&store, month, today, &mut std::io::stdout())
}

pub(crate) fn resolve_month(month: Option<&str>, today: NaiveDate) -> Result<MonthView> {
    match month {
        Some(s) => MonthView::parse(s),
        None => Ok(MonthView::from_date(today)),
    }
}

fn bucket_marker(bucket: EnergyBucket) -> char {
    match bucket {
        EnergyBucket::Low => 'L',
        EnergyBucket::Medium => 'M',
        EnergyBucket::Good => 'G',
        EnergyBucket::High => 'H',
    }
}

/// Prints the grid with a bucket letter after each logged day and `*` on today,
/// followed by the month's entries.
pub(crate) fn write_month<W: Write>(
    store: &EntryStore,
    month: MonthView,
    today: NaiveDate,
    out: &mut W,
) -> Result<()> {
    let width = CELL_WIDTH * 7;
    writeln!(out, "{:^width$}", month.title())?;
    for name in ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"] {
        write!(out, "{:<CELL_WIDTH$}", name)?;
    }
    writeln!(out)?;

    for week in month.weeks(store, today, None) {
        let mut line = String::new();
        for cell in &week {
            let text = match cell {
                GridCell::Blank => String::new(),
                GridCell::Day(day) => {
                    let marker = day.bucket.map(bucket_marker).unwrap_or(' ');
                    let today_mark = if day.is_today { '*' } else { ' ' };
                    format!("{:>2}{}{}", day.day, marker, today_mark)
                }
            };
            line.push_str(&format!("{:<CELL_WIDTH$}", text));
        }
        writeln!(out, "{}", line.trim_end())?;
    }

    writeln!(out)?;
    let legend: Vec<String> = EnergyBucket::ALL
        .iter()
        .map(|b| format!("{}={} ({})", bucket_marker(*b), b.label(), b.range_label()))
        .collect();
    writeln!(out, "{}  *=today", legend.join("  "))?;

    let mut entries = store.entries_in_month(month).peekable();
    if entries.peek().is_none() {
        writeln!(out, "No entries logged this month.")?;
        return Ok(());
    }
    writeln!(out)?;
    for entry in entries {
        write!(out, "{}  {:>2}/10", entry.key(), entry.level)?;
        if !entry.activities.is_empty() {
            write!(out, "  {}", format_activities(&entry.activities))?;
        }
        if !entry.notes.is_empty() {
            write!(out, "  | {}", entry.notes)?;
        }
        writeln!(out)?;
    }
    Ok(())
}
