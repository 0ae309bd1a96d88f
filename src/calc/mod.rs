pub mod energy_bucket;
pub mod month_summary;
pub mod month_view;

pub use energy_bucket::EnergyBucket;
pub use month_summary::{summarize_month, MonthSummary};
pub use month_view::{GridCell, MonthView};
