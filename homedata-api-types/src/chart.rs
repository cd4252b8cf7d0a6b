use serde::{Deserialize, Serialize};

pub const CHART_TITLE: &str = "NYC Rental Trends";
pub const PRIMARY_AXIS_TITLE: &str = "Rent (USD)";
pub const SECONDARY_AXIS_TITLE: &str = "Inventory Count";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Axis {
    #[default]
    Primary,
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub month: String,
    pub value: Option<f64>,
}

/// One plotted line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub label: String,
    /// Chronological, one entry per month.
    pub points: Vec<ChartPoint>,
    /// `#rrggbb`
    pub color: String,
    pub axis: Axis,
    pub line_style: LineStyle,
}

impl ChartSeries {
    pub fn value_at(&self, month: &str) -> Option<f64> {
        self.points
            .binary_search_by(|point| point.month.as_str().cmp(month))
            .ok()
            .and_then(|index| self.points[index].value)
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().filter_map(|point| point.value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisConfig {
    pub primary_title: String,
    pub secondary_title: Option<String>,
}

impl AxisConfig {
    /// The secondary axis only exists when it was asked for and something is
    /// plotted against it.
    pub fn for_series(series: &[ChartSeries], use_secondary_axis: bool) -> Self {
        let wants_secondary =
            use_secondary_axis && series.iter().any(|s| s.axis == Axis::Secondary);
        Self {
            primary_title: PRIMARY_AXIS_TITLE.to_string(),
            secondary_title: wants_secondary.then(|| SECONDARY_AXIS_TITLE.to_string()),
        }
    }

    pub fn has_secondary(&self) -> bool {
        self.secondary_title.is_some()
    }
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self {
            primary_title: PRIMARY_AXIS_TITLE.to_string(),
            secondary_title: None,
        }
    }
}

/// Everything needed to draw the rental trends line chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    pub title: String,
    /// Shared x axis, ISO months in chronological order.
    pub labels: Vec<String>,
    pub series: Vec<ChartSeries>,
    pub axes: AxisConfig,
}

impl ChartConfig {
    pub fn line(labels: Vec<String>, series: Vec<ChartSeries>, axes: AxisConfig) -> Self {
        Self {
            title: CHART_TITLE.to_string(),
            labels,
            series,
            axes,
        }
    }
}
