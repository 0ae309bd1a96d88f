use crate::calc::energy_bucket::EnergyBucket;
use crate::data::energy_entry::date_key;
use crate::data::{EnergyLevel, EntryStore};
use anyhow::{Context, Result};
use chrono::{Datelike, Days, Months, NaiveDate};
use std::iter;

/// Number of grid columns, Sunday through Saturday.
pub const WEEK_COLUMNS: usize = 7;

/// One calendar month. Month indices are zero-based (0 = January).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct MonthView {
    first: NaiveDate,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DayCell<'a> {
    pub day: u32,
    pub date: NaiveDate,
    pub key: String,
    pub is_today: bool,
    pub is_selected: bool,
    pub level: Option<EnergyLevel>,
    pub bucket: Option<EnergyBucket>,
    pub first_activity: Option<&'a str>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GridCell<'a> {
    /// Placeholder before the 1st of the month.
    Blank,
    Day(DayCell<'a>),
}

impl MonthView {
    /// `None` when the month index is not in `0..12` or the year is outside
    /// chrono's supported range.
    pub fn new(year: i32, month0: u32) -> Option<Self> {
        if month0 >= 12 {
            return None;
        }
        NaiveDate::from_ymd_opt(year, month0 + 1, 1).map(|first| MonthView { first })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        let first = date
            .checked_sub_days(Days::new(u64::from(date.day0())))
            .unwrap_or(date);
        MonthView { first }
    }

    /// Parses `YYYY-MM`.
    pub fn parse(input: &str) -> Result<Self> {
        let first = NaiveDate::parse_from_str(&format!("{}-01", input.trim()), "%Y-%m-%d")
            .with_context(|| format!("invalid month '{}', expected YYYY-MM", input))?;
        Ok(MonthView { first })
    }

    pub fn year(self) -> i32 {
        self.first.year()
    }

    pub fn month0(self) -> u32 {
        self.first.month0()
    }

    pub fn first_day(self) -> NaiveDate {
        self.first
    }

    /// Weekday of the 1st, 0 = Sunday .. 6 = Saturday.
    pub fn first_weekday(self) -> u32 {
        self.first.weekday().num_days_from_sunday()
    }

    /// Day number of the last day, found as "day 0" of the following month.
    pub fn days_in_month(self) -> u32 {
        self.first
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .map(|last| last.day())
            // only December of chrono's final year has no following month
            .unwrap_or(31)
    }

    pub fn last_day(self) -> NaiveDate {
        self.first
            .checked_add_days(Days::new(u64::from(self.days_in_month() - 1)))
            .unwrap_or(self.first)
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month0() == self.month0()
    }

    /// Moves by `delta` months, normalizing the year. `None` past chrono's range.
    pub fn shift(self, delta: i32) -> Option<Self> {
        let total = self.month0() as i32 + delta;
        let year = self.year().checked_add(total.div_euclid(12))?;
        Self::new(year, total.rem_euclid(12) as u32)
    }

    /// The previous month; stays put at the start of the supported range.
    pub fn prev(self) -> Self {
        self.shift(-1).unwrap_or(self)
    }

    /// The next month; stays put at the end of the supported range.
    pub fn next(self) -> Self {
        self.shift(1).unwrap_or(self)
    }

    /// The date in this month with `day`, clamped to the month's length.
    pub fn clamp_day(self, day: u32) -> NaiveDate {
        let day = day.clamp(1, self.days_in_month());
        self.first.with_day(day).unwrap_or(self.first)
    }

    pub fn title(self) -> String {
        format!("{} {}", month_name(self.month0() + 1), self.year())
    }

    pub fn days(self) -> impl Iterator<Item = NaiveDate> {
        self.first.iter_days().take(self.days_in_month() as usize)
    }

    /// Leading blanks followed by one cell per day. No trailing blanks.
    pub fn cells<'a>(
        self,
        store: &'a EntryStore,
        today: NaiveDate,
        selected: Option<NaiveDate>,
    ) -> impl Iterator<Item = GridCell<'a>> + 'a {
        let today_key = date_key(today);
        let blanks = iter::repeat_n(GridCell::Blank, self.first_weekday() as usize);
        let days = self.days().map(move |date| {
            let key = date_key(date);
            let entry = store.get(&key);
            GridCell::Day(DayCell {
                day: date.day(),
                date,
                is_today: key == today_key,
                is_selected: selected == Some(date),
                level: entry.map(|e| e.level),
                bucket: entry.map(|e| EnergyBucket::from_level(e.level)),
                first_activity: entry.and_then(|e| e.first_activity()),
                key,
            })
        });
        blanks.chain(days)
    }

    /// The cells laid out in rows of seven; only the last row may be short.
    pub fn weeks<'a>(
        self,
        store: &'a EntryStore,
        today: NaiveDate,
        selected: Option<NaiveDate>,
    ) -> Vec<Vec<GridCell<'a>>> {
        let cells: Vec<_> = self.cells(store, today, selected).collect();
        cells.chunks(WEEK_COLUMNS).map(<[_]>::to_vec).collect()
    }
}

pub(crate) fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}
