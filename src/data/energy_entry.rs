use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Daily energy rating, always within `1..=10`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[serde(try_from = "u8", into = "u8")]
pub struct EnergyLevel(u8);

impl EnergyLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;
    pub const DEFAULT: EnergyLevel = EnergyLevel(5);

    pub fn new(value: u8) -> Result<Self> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            bail!(
                "energy level {} is outside {}..={}",
                value,
                Self::MIN,
                Self::MAX
            );
        }
        Ok(EnergyLevel(value))
    }

    /// Pulls any integer into range. Used for keyboard input.
    pub fn clamped(value: i32) -> Self {
        EnergyLevel(value.clamp(Self::MIN as i32, Self::MAX as i32) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for EnergyLevel {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u8> for EnergyLevel {
    type Error = anyhow::Error;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

impl From<EnergyLevel> for u8 {
    fn from(level: EnergyLevel) -> u8 {
        level.0
    }
}

impl fmt::Display for EnergyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct EnergyEntry {
    pub date: NaiveDate,
    pub level: EnergyLevel,
    #[serde(default)]
    pub activities: Vec<String>,
    #[serde(default)]
    pub notes: String,
}

impl EnergyEntry {
    pub fn new(date: NaiveDate, level: EnergyLevel, activities: &str, notes: &str) -> Self {
        EnergyEntry {
            date,
            level,
            activities: parse_activities(activities),
            notes: notes.to_string(),
        }
    }

    pub fn key(&self) -> String {
        date_key(self.date)
    }

    pub fn first_activity(&self) -> Option<&str> {
        self.activities.first().map(String::as_str)
    }
}

/// Canonical `YYYY-MM-DD` key for a local calendar day.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parses a date key, rejecting anything that is not already canonical.
pub fn parse_date_key(key: &str) -> Result<NaiveDate> {
    let date = NaiveDate::parse_from_str(key, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{}', expected YYYY-MM-DD", key))?;
    if date_key(date) != key {
        bail!("invalid date '{}', expected YYYY-MM-DD", key);
    }
    Ok(date)
}

/// Splits comma-separated input into trimmed, non-empty activities, keeping order.
pub fn parse_activities(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_string)
        .collect()
}

/// Inverse of [`parse_activities`] for display in the form.
pub fn format_activities(activities: &[String]) -> String {
    activities.join(", ")
}
