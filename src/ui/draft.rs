use crate::data::energy_entry::format_activities;
use crate::data::{EnergyEntry, EnergyLevel, EntryStore};
use anyhow::Result;
use chrono::NaiveDate;

/// The selected date plus the three editable form fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Draft {
    pub selected: Option<NaiveDate>,
    pub level: EnergyLevel,
    pub activities: String,
    pub notes: String,
    default_level: EnergyLevel,
}

impl Draft {
    pub fn new(default_level: EnergyLevel) -> Self {
        Draft {
            selected: None,
            level: default_level,
            activities: String::new(),
            notes: String::new(),
            default_level,
        }
    }

    /// Selects `date` and loads its saved entry into the fields, or resets them.
    pub fn select(&mut self, date: NaiveDate, store: &EntryStore) {
        self.selected = Some(date);
        match store.get_date(date) {
            Some(entry) => {
                self.level = entry.level;
                self.activities = format_activities(&entry.activities);
                self.notes = entry.notes.clone();
            }
            None => self.reset_fields(),
        }
    }

    pub fn set_level(&mut self, value: i32) {
        self.level = EnergyLevel::clamped(value);
    }

    pub fn adjust_level(&mut self, delta: i32) {
        self.set_level(i32::from(self.level.get()) + delta);
    }

    /// The entry a save would write, if a date is selected.
    pub fn to_entry(&self) -> Option<EnergyEntry> {
        self.selected
            .map(|date| EnergyEntry::new(date, self.level, &self.activities, &self.notes))
    }

    /// Upserts the draft into `store`. Without a selection this does nothing.
    ///
    /// The fields reset after a successful write; on a write error they are
    /// kept so the save can be retried.
    pub fn save(&mut self, store: &mut EntryStore) -> Result<Option<EnergyEntry>> {
        let Some(entry) = self.to_entry() else {
            return Ok(None);
        };
        store.upsert(entry.clone())?;
        self.reset_fields();
        Ok(Some(entry))
    }

    fn reset_fields(&mut self) {
        self.level = self.default_level;
        self.activities.clear();
        self.notes.clear();
    }
}
