use std::io::Write;

use homedata_api_types::ChartConfig;

use crate::error::DashboardError;

/// The chart's data laid out as a sheet: one row per month, one column per
/// series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ChartTable {
    pub fn from_chart(config: &ChartConfig) -> Self {
        let header = std::iter::once("Month".to_string())
            .chain(config.series.iter().map(|series| series.label.clone()))
            .collect();
        let rows = config
            .labels
            .iter()
            .map(|month| {
                std::iter::once(month.clone())
                    .chain(config.series.iter().map(|series| {
                        series
                            .value_at(month)
                            .map(|value| value.to_string())
                            .unwrap_or_default()
                    }))
                    .collect()
            })
            .collect();
        Self { header, rows }
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), DashboardError> {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(&self.header)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn to_csv_string(&self) -> Result<String, DashboardError> {
        let mut buffer = vec![];
        self.write_csv(&mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

#[cfg(test)]
mod test {
    use homedata_api_types::{Axis, AxisConfig, ChartPoint, ChartSeries, LineStyle};

    use super::*;

    fn series(label: &str, points: &[(&str, Option<f64>)]) -> ChartSeries {
        ChartSeries {
            label: label.to_string(),
            points: points
                .iter()
                .map(|(month, value)| ChartPoint {
                    month: month.to_string(),
                    value: *value,
                })
                .collect(),
            color: "#76b7b2".to_string(),
            axis: Axis::Primary,
            line_style: LineStyle::Solid,
        }
    }

    #[test]
    fn table_lines_up_months() {
        let config = ChartConfig::line(
            vec!["2019-11".to_string(), "2019-12".to_string()],
            vec![
                series("Bronx - All - Raw Rent", &[("2019-11", Some(1850.0)), ("2019-12", Some(1875.5))]),
                series("Bronx, North - All - Raw Rent", &[("2019-12", None)]),
            ],
            AxisConfig::default(),
        );
        let table = ChartTable::from_chart(&config);
        assert_eq!(
            table.header,
            vec!["Month", "Bronx - All - Raw Rent", "Bronx, North - All - Raw Rent"]
        );
        assert_eq!(table.rows[0], vec!["2019-11", "1850", ""]);
        assert_eq!(table.rows[1], vec!["2019-12", "1875.5", ""]);

        let csv = table.to_csv_string().unwrap();
        assert_eq!(
            csv,
            "Month,Bronx - All - Raw Rent,\"Bronx, North - All - Raw Rent\"\n\
             2019-11,1850,\n\
             2019-12,1875.5,\n"
        );
    }
}
