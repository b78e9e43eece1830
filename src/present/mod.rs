//! Charts and tables shown to the user.

pub mod chart;
pub mod combined;
pub mod preview;
pub mod table;

pub use chart::{render_forecast_svg, render_history_svg};
pub use combined::{CombinedRow, CombinedView};
pub use preview::{DataPreview, DEFAULT_PREVIEW_ROWS};
pub use table::{format_timestamp, round_to, ForecastRow, ForecastTable, TABLE_DECIMALS};
