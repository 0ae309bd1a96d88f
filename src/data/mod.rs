pub mod app_settings;
pub mod energy_entry;
pub mod entry_store;
pub mod persistence;

pub use app_settings::{AppSettings, CorruptDataPolicy};
pub use energy_entry::{EnergyEntry, EnergyLevel};
pub use entry_store::EntryStore;
