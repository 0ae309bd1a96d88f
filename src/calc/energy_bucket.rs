use crate::data::EnergyLevel;

/// Display band for an energy level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnergyBucket {
    Low,
    Medium,
    Good,
    High,
}

impl EnergyBucket {
    pub const ALL: [EnergyBucket; 4] = [
        EnergyBucket::Low,
        EnergyBucket::Medium,
        EnergyBucket::Good,
        EnergyBucket::High,
    ];

    /// 1–3 low, 4–5 medium, 6–7 good, 8–10 high.
    pub fn from_level(level: EnergyLevel) -> Self {
        match level.get() {
            0..=3 => EnergyBucket::Low,
            4..=5 => EnergyBucket::Medium,
            6..=7 => EnergyBucket::Good,
            _ => EnergyBucket::High,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EnergyBucket::Low => "Low",
            EnergyBucket::Medium => "Medium",
            EnergyBucket::Good => "Good",
            EnergyBucket::High => "High",
        }
    }

    pub fn range_label(self) -> &'static str {
        match self {
            EnergyBucket::Low => "1-3",
            EnergyBucket::Medium => "4-5",
            EnergyBucket::Good => "6-7",
            EnergyBucket::High => "8-10",
        }
    }
}
