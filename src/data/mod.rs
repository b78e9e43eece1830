//! Loading and cleaning uploaded tables.

pub mod datetime;
pub mod normalize;
pub mod table;

pub use datetime::parse_timestamp;
pub use normalize::{into_series, normalize_dates, parse_value, NormalizedTable, Notice};
pub use table::{is_missing, RawTable};
