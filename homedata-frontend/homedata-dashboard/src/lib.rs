//! Rental trends dashboard: turns filter selections into fetched time series,
//! builds chart series from them and keeps a single chart up to date. Also
//! renders property lookup results as filterable tables.

mod colors;
mod dashboard;
mod dataset;
mod error;
mod export;
mod fetcher;
mod property;
mod renderer;
mod selection;

pub use colors::{adjusted_variant, derive_color, key_hash, ColorResolver};
pub use dashboard::{Dashboard, UpdateOutcome};
pub use dataset::{build_series, BuiltSeries};
pub use error::DashboardError;
pub use export::ChartTable;
pub use fetcher::{fetch_all, FetchedSeries, TimeSeriesSource};
pub use property::{
    lookup_property, CategorySummary, LookupFailure, PropertyReport, PropertySource,
    RecordCategory, RecordTable, RowLimit,
};
pub use renderer::{ChartInstance, ChartRenderer, ChartSurface, RenderOutcome, SvgSurface};
pub use selection::{filter_neighborhoods, FilterPanel, SelectionSource};
