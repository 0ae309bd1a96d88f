use crate::calc::{summarize_month, MonthSummary};
use crate::cmd::month::resolve_month;
use crate::data::{AppSettings, EntryStore};
use anyhow::Result;
use chrono::Local;
use std::io::Write;
use std::path::Path;

pub fn run(data_dir: &Path, month: Option<&str>) -> Result<()> {
    let month = resolve_month(month, Local::now().date_naive())?;
    let settings = AppSettings::load_from(data_dir)?;
    let store = EntryStore::load_read_only(data_dir, settings.on_corrupt_data)?;
    write_summary(&summarize_month(&store, month), &mut std::io::stdout())
}

pub(crate) fn write_summary<W: Write>(summary: &MonthSummary, out: &mut W) -> Result<()> {
    writeln!(out, "Energy summary for {}", summary.month.title())?;
    writeln!(out, "---")?;
    writeln!(
        out,
        "{:<16} {} of {}",
        "Days logged:", summary.days_logged, summary.days_in_month
    )?;

    let Some(average) = summary.average_level else {
        return Ok(());
    };
    writeln!(out, "{:<16} {:.1}/10", "Average energy:", average)?;
    if let Some((date, level)) = &summary.best_day {
        writeln!(out, "{:<16} {} ({}/10)", "Best day:", date, level)?;
    }

    writeln!(out)?;
    writeln!(out, "By energy level:")?;
    for (bucket, count) in &summary.bucket_counts {
        let label = format!("{} ({})", bucket.label(), bucket.range_label());
        writeln!(out, "  {:<14} {:>3}", label, count)?;
    }

    if !summary.top_activities.is_empty() {
        writeln!(out)?;
        writeln!(out, "Top activities:")?;
        for (name, count) in &summary.top_activities {
            writeln!(out, "  {:<14} {:>3}", name, count)?;
        }
    }
    Ok(())
}
