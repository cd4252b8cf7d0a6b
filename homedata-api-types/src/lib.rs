mod selection;

pub mod chart;
pub mod property;
pub mod time_series;

pub use chart::{Axis, AxisConfig, ChartConfig, ChartPoint, ChartSeries, LineStyle};
pub use property::{PropertyData, PropertyLookupResponse, PropertyRecord};
pub use selection::{Bedroom, DataType, ParseSelectionError, SeasonalMode, Selection, SeriesRequest};
pub use time_series::{AreaData, AreaEntry, AreaMetadata, MonthlyData, MonthlyValues, TimeSeriesResponse};
