use crate::calc::energy_bucket::EnergyBucket;
use crate::calc::month_view::MonthView;
use crate::data::EntryStore;
use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq)]
pub struct MonthSummary {
    pub month: MonthView,
    pub days_in_month: u32,
    pub days_logged: usize,
    pub average_level: Option<f64>,
    pub best_day: Option<(String, u8)>,
    pub bucket_counts: Vec<(EnergyBucket, usize)>,
    /// Most frequent activities, highest count first, ties alphabetical.
    pub top_activities: Vec<(String, usize)>,
}

const TOP_ACTIVITIES: usize = 5;

pub fn summarize_month(store: &EntryStore, month: MonthView) -> MonthSummary {
    let mut total: u32 = 0;
    let mut days_logged = 0usize;
    let mut best_day: Option<(String, u8)> = None;
    let mut buckets: HashMap<EnergyBucket, usize> = HashMap::new();
    let mut activities: HashMap<&str, usize> = HashMap::new();

    for entry in store.entries_in_month(month) {
        let level = entry.level.get();
        days_logged += 1;
        total += u32::from(level);
        *buckets.entry(EnergyBucket::from_level(entry.level)).or_default() += 1;
        for activity in &entry.activities {
            *activities.entry(activity.as_str()).or_default() += 1;
        }
        // entries come in date order, so ties keep the earliest day
        if best_day.as_ref().is_none_or(|(_, best)| level > *best) {
            best_day = Some((entry.key(), level));
        }
    }

    let average_level = if days_logged > 0 {
        Some(f64::from(total) / days_logged as f64)
    } else {
        None
    };

    let bucket_counts = EnergyBucket::ALL
        .iter()
        .map(|b| (*b, buckets.get(b).copied().unwrap_or(0)))
        .collect();

    let mut top_activities: Vec<(String, usize)> = activities
        .into_iter()
        .map(|(name, count)| (name.to_string(), count))
        .collect();
    top_activities.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    top_activities.truncate(TOP_ACTIVITIES);

    MonthSummary {
        month,
        days_in_month: month.days_in_month(),
        days_logged,
        average_level,
        best_day,
        bucket_counts,
        top_activities,
    }
}
