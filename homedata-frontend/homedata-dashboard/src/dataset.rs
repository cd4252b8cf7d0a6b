use homedata_api_types::{
    Axis, ChartPoint, ChartSeries, DataType, LineStyle, MonthlyValues, SeasonalMode,
};
use itertools::Itertools;
use log::{debug, warn};

use crate::colors::{adjusted_variant, ColorResolver};
use crate::fetcher::FetchedSeries;

/// Series ready to be handed to the chart along with the shared x axis.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltSeries {
    pub labels: Vec<String>,
    pub series: Vec<ChartSeries>,
}

fn axis_for(data_type: DataType, use_secondary_axis: bool) -> Axis {
    if use_secondary_axis && data_type.is_inventory() {
        Axis::Secondary
    } else {
        Axis::Primary
    }
}

fn points(values: &MonthlyValues) -> Vec<ChartPoint> {
    values
        .iter()
        .map(|(month, value)| ChartPoint {
            month: month.clone(),
            value: *value,
        })
        .collect()
}

/// Turns fetched responses into chart series, in request order and then area
/// name order. Returns `None` when nothing could be plotted.
pub fn build_series(
    fetched: &[FetchedSeries],
    seasonal_mode: SeasonalMode,
    use_secondary_axis: bool,
    colors: &mut ColorResolver,
) -> Option<BuiltSeries> {
    let mut series = vec![];
    for FetchedSeries { request, response } in fetched {
        let axis = axis_for(request.data_type, use_secondary_axis);
        let measure = request.data_type.measure();
        for (area, entry) in &response.areas {
            let Some(data) = entry.as_data() else {
                warn!("skipping malformed area {area}");
                continue;
            };
            let Some(monthly) = &data.monthly else {
                warn!("area {area} has no monthly data");
                continue;
            };
            let color = colors.color_for(request.data_type, request.bedroom, area);
            let variants = [
                (seasonal_mode.includes_raw(), "Raw", &monthly.raw),
                (seasonal_mode.includes_adjusted(), "Adjusted", &monthly.adjusted),
            ];
            for (wanted, kind, values) in variants {
                if !wanted {
                    continue;
                }
                let Some(values) = values else {
                    debug!("area {area} has no {kind} values");
                    continue;
                };
                let (color, line_style) = if kind == "Adjusted" {
                    (adjusted_variant(&color), LineStyle::Dashed)
                } else {
                    (color.clone(), LineStyle::Solid)
                };
                series.push(ChartSeries {
                    label: format!("{area} - {} - {kind} {measure}", request.bedroom),
                    points: points(values),
                    color,
                    axis,
                    line_style,
                });
            }
        }
    }
    if series.is_empty() {
        return None;
    }
    let labels = series
        .iter()
        .flat_map(|s| s.points.iter().map(|point| point.month.clone()))
        .sorted()
        .dedup()
        .collect();
    Some(BuiltSeries { labels, series })
}
