use crate::data::{AppSettings, EntryStore};
use crate::ui::calendar_view::{run_app, App};
use crate::ui::{install_panic_hook, restore_terminal, setup_terminal};
use anyhow::Result;
use chrono::Local;
use std::path::Path;
use tracing::{info, warn};

pub fn run(data_dir: &Path) -> Result<()> {
    let settings = AppSettings::load_from(data_dir)?;
    let mut store = EntryStore::load(data_dir, settings.on_corrupt_data)?;

    install_panic_hook();
    let mut terminal = setup_terminal()?;

    let today = Local::now().date_naive();
    let mut app = App::new(&mut store, &settings, today, data_dir.to_path_buf());
    let result = run_app(&mut terminal, &mut app);

    restore_terminal(&mut terminal)?;
    drop(app);

    finish_session(&mut store)?;
    result
}

/// Retries a save that failed mid-session. A clean store is left alone so
/// entries written by other processes meanwhile survive.
fn finish_session(store: &mut EntryStore) -> Result<()> {
    if store.is_dirty() {
        warn!(path = %store.path().display(), "writing entries left unsaved by a failed save");
    }
    store.flush()?;
    info!(entries = store.len(), "calendar closed");
    Ok(())
}
