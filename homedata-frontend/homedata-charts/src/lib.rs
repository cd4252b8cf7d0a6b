use std::error::Error;
use std::ops::Range;

use anyhow::anyhow;
use colorsys::Rgb;
use homedata_api_types::{Axis, ChartConfig, ChartSeries, LineStyle};
use itertools::Itertools;
use log::debug;
use plotters::prelude::*;
use plotters_svg::SVGBackend;

const DEFAULT_TEXT: RGBColor = RGBColor(33, 37, 41);
const DEFAULT_GRID: RGBColor = RGBColor(200, 200, 200);
const DEFAULT_BACKGROUND: RGBColor = RGBColor(255, 255, 255);
const FALLBACK_SERIES: RGBColor = RGBColor(78, 121, 167);

fn short_number(value: f64) -> String {
    match value.abs() {
        v if v >= 1_000_000.0 => format!("{:.2}mil", value / 1_000_000.0),
        v if v >= 10_000.0 => format!("{:.1}K", value / 1_000.0),
        _ => format!("{value:.0}"),
    }
}

fn month_label(labels: &[String], index: i32) -> String {
    usize::try_from(index)
        .ok()
        .and_then(|index| labels.get(index))
        .cloned()
        .unwrap_or_default()
}

/// Colors used for chrome around the plotted lines. Anything left unset uses
/// a light theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChartOptions {
    pub text_rgb: Option<(u8, u8, u8)>,
    pub grid_rgb: Option<(u8, u8, u8)>,
    pub background_rgb: Option<(u8, u8, u8)>,
}

fn rgb_or(value: Option<(u8, u8, u8)>, fallback: RGBColor) -> RGBColor {
    value.map(|(r, g, b)| RGBColor(r, g, b)).unwrap_or(fallback)
}

/// Parses a `#rrggbb` series color.
pub fn parse_hex_color(hex: &str) -> Option<RGBColor> {
    let rgb = Rgb::from_hex_str(hex).ok()?;
    Some(RGBColor(
        rgb.get_red().round() as u8,
        rgb.get_green().round() as u8,
        rgb.get_blue().round() as u8,
    ))
}

fn value_range<'a>(series: impl Iterator<Item = &'a ChartSeries>) -> Range<f64> {
    match series
        .flat_map(|s| s.values())
        .filter(|v| v.is_finite())
        .minmax()
        .into_option()
    {
        Some((min, max)) if max > min => {
            let pad = (max - min) * 0.05;
            (min - pad)..(max + pad)
        }
        Some((value, _)) => (value - 1.0)..(value + 1.0),
        None => 0.0..1.0,
    }
}

/// Splits a series into runs of consecutive months that have values, so a
/// missing month shows up as a gap instead of a bridged line.
fn segments(series: &ChartSeries, labels: &[String]) -> Vec<Vec<(i32, f64)>> {
    let mut segments = vec![];
    let mut current = vec![];
    for (index, label) in labels.iter().enumerate() {
        match series.value_at(label).filter(|v| v.is_finite()) {
            Some(value) => current.push((index as i32, value)),
            None if !current.is_empty() => segments.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

pub fn draw_rent_trends_chart<'a, T>(
    backend: T,
    config: &ChartConfig,
    options: &ChartOptions,
) -> Result<(), Box<dyn Error + Send + Sync + 'a>>
where
    T: 'a + DrawingBackend,
{
    if config.series.is_empty() {
        return Err("no series to draw".into());
    }
    let text = rgb_or(options.text_rgb, DEFAULT_TEXT);
    let grid = rgb_or(options.grid_rgb, DEFAULT_GRID);
    let background = rgb_or(options.background_rgb, DEFAULT_BACKGROUND);

    let root = backend.into_drawing_area();
    root.fill(&background)?;

    let labels = &config.labels;
    let x_range = 0..(labels.len() as i32 - 1).max(1);
    let primary_range = value_range(config.series.iter().filter(|s| s.axis == Axis::Primary));
    let secondary_range =
        value_range(config.series.iter().filter(|s| s.axis == Axis::Secondary));

    let mut builder = ChartBuilder::on(&root);
    builder
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .caption(
            &config.title,
            ("sans-serif", 20).into_font().color(&text),
        );
    if config.axes.has_secondary() {
        builder.right_y_label_area_size(70);
    }
    let mut chart = builder
        .build_cartesian_2d(x_range.clone(), primary_range)?
        .set_secondary_coord(x_range, secondary_range);

    chart
        .configure_mesh()
        .label_style(&text)
        .axis_desc_style(("sans-serif", 14).into_font().color(&text))
        .bold_line_style(grid.mix(0.3))
        .light_line_style(grid.mix(0.05))
        .x_desc("Month")
        .y_desc(config.axes.primary_title.as_str())
        .x_labels(labels.len().clamp(1, 12))
        .x_label_formatter(&|x| month_label(labels, *x))
        .y_label_formatter(&|y| short_number(*y))
        .draw()?;

    if let Some(secondary_title) = &config.axes.secondary_title {
        chart
            .configure_secondary_axes()
            .label_style(&text)
            .axis_desc_style(("sans-serif", 14).into_font().color(&text))
            .y_desc(secondary_title.as_str())
            .y_label_formatter(&|y| short_number(*y))
            .draw()?;
    }

    for series in &config.series {
        let color = parse_hex_color(&series.color).unwrap_or(FALLBACK_SERIES);
        let style = color.stroke_width(2);
        let mut labelled = false;
        for segment in segments(series, labels) {
            // a lone month has no neighbours to draw a line to
            let annotation = if segment.len() == 1 {
                let dots = segment
                    .into_iter()
                    .map(move |point| Circle::new(point, 3, style.filled()));
                match series.axis {
                    Axis::Primary => chart.draw_series(dots)?,
                    Axis::Secondary => chart.draw_secondary_series(dots)?,
                }
            } else {
                match (series.axis, series.line_style) {
                    (Axis::Primary, LineStyle::Solid) => {
                        chart.draw_series(LineSeries::new(segment, style))?
                    }
                    (Axis::Primary, LineStyle::Dashed) => {
                        chart.draw_series(DashedLineSeries::new(segment, 6, 4, style))?
                    }
                    (Axis::Secondary, LineStyle::Solid) => {
                        chart.draw_secondary_series(LineSeries::new(segment, style))?
                    }
                    (Axis::Secondary, LineStyle::Dashed) => chart
                        .draw_secondary_series(DashedLineSeries::new(segment, 6, 4, style))?,
                }
            };
            if !labelled {
                annotation
                    .label(series.label.as_str())
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
                labelled = true;
            }
        }
        if !labelled {
            debug!("series {} has no values to draw", series.label);
            // still listed in the legend
            let nothing = LineSeries::new(Vec::<(i32, f64)>::new(), style);
            let annotation = match series.axis {
                Axis::Primary => chart.draw_series(nothing)?,
                Axis::Secondary => chart.draw_secondary_series(nothing)?,
            };
            annotation
                .label(series.label.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
        }
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(background.mix(0.85))
        .border_style(grid)
        .label_font(("sans-serif", 13).into_font().color(&text))
        .draw()?;

    root.present()?;

    Ok(())
}

/// Renders the chart into an SVG document.
pub fn render_svg(
    config: &ChartConfig,
    options: &ChartOptions,
    size: (u32, u32),
) -> anyhow::Result<String> {
    let mut buffer = String::new();
    {
        let backend = SVGBackend::with_string(&mut buffer, size);
        draw_rent_trends_chart(backend, config, options)
            .map_err(|e| anyhow!("Failed to draw chart: {}", e))?;
    }
    Ok(buffer)
}

#[cfg(test)]
mod test {
    use homedata_api_types::{AxisConfig, ChartPoint};

    use super::*;

    fn series(label: &str, values: &[(&str, Option<f64>)], axis: Axis, line_style: LineStyle) -> ChartSeries {
        ChartSeries {
            label: label.to_string(),
            points: values
                .iter()
                .map(|(month, value)| ChartPoint {
                    month: month.to_string(),
                    value: *value,
                })
                .collect(),
            color: "#4e79a7".to_string(),
            axis,
            line_style,
        }
    }

    fn labels() -> Vec<String> {
        ["2020-01", "2020-02", "2020-03", "2020-04", "2020-05"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn gaps_split_segments() {
        let s = series(
            "Manhattan - All - Raw Rent",
            &[
                ("2020-01", Some(1.0)),
                ("2020-02", Some(2.0)),
                ("2020-03", None),
                ("2020-05", Some(5.0)),
            ],
            Axis::Primary,
            LineStyle::Solid,
        );
        assert_eq!(
            segments(&s, &labels()),
            vec![vec![(0, 1.0), (1, 2.0)], vec![(4, 5.0)]]
        );
    }

    #[test]
    fn ranges_are_padded() {
        let flat = series("a", &[("2020-01", Some(3.0))], Axis::Primary, LineStyle::Solid);
        assert_eq!(value_range([&flat].into_iter()), 2.0..4.0);
        let spread = series(
            "b",
            &[("2020-01", Some(0.0)), ("2020-02", Some(100.0))],
            Axis::Primary,
            LineStyle::Solid,
        );
        assert_eq!(value_range([&spread].into_iter()), -5.0..105.0);
        assert_eq!(value_range(std::iter::empty::<&ChartSeries>()), 0.0..1.0);
    }

    #[test]
    fn number_formatting() {
        assert_eq!(short_number(3150.4), "3150");
        assert_eq!(short_number(12_500.0), "12.5K");
        assert_eq!(short_number(2_000_000.0), "2.00mil");
        assert_eq!(month_label(&labels(), 2), "2020-03");
        assert_eq!(month_label(&labels(), -1), "");
        assert_eq!(month_label(&labels(), 99), "");
    }

    #[test]
    fn hex_colors() {
        assert_eq!(parse_hex_color("#f28e2c"), Some(RGBColor(0xf2, 0x8e, 0x2c)));
        assert_eq!(parse_hex_color("not a color"), None);
    }

    #[test]
    fn renders_both_axes() {
        let rent = series(
            "Manhattan - All - Raw Rent",
            &[
                ("2020-01", Some(3000.0)),
                ("2020-02", Some(3100.0)),
                ("2020-03", Some(3050.0)),
            ],
            Axis::Primary,
            LineStyle::Solid,
        );
        let inventory = series(
            "Manhattan - All - Adjusted Inventory",
            &[
                ("2020-01", Some(9000.0)),
                ("2020-02", None),
                ("2020-03", Some(9500.0)),
                ("2020-04", Some(9700.0)),
            ],
            Axis::Secondary,
            LineStyle::Dashed,
        );
        let all = vec![rent, inventory];
        let axes = AxisConfig::for_series(&all, true);
        let config = ChartConfig::line(labels(), all, axes);
        let svg = render_svg(&config, &ChartOptions::default(), (800, 400)).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("NYC Rental Trends"));
        assert!(svg.contains("Inventory Count"));
        assert!(svg.contains("Manhattan - All - Raw Rent"));
    }

    #[test]
    fn series_without_values_is_still_listed() {
        let empty = series("Bronx - All - Raw Rent", &[], Axis::Primary, LineStyle::Solid);
        let config = ChartConfig::line(vec![], vec![empty], AxisConfig::default());
        let svg = render_svg(&config, &ChartOptions::default(), (400, 300)).unwrap();
        assert!(svg.contains("Bronx - All - Raw Rent"));
    }

    #[test]
    fn empty_chart_is_an_error() {
        let config = ChartConfig::line(labels(), vec![], AxisConfig::default());
        assert!(render_svg(&config, &ChartOptions::default(), (400, 300)).is_err());
    }
}
