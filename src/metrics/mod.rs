pub mod summary;
pub mod timeseries;

pub use summary::{PurchaseRef, SummaryMetrics};
pub use timeseries::{buy_and_hold_return_pct, ValuationSnapshot};
