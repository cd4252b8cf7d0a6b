use async_trait::async_trait;
use chrono::NaiveDateTime;
use homedata_api_types::{PropertyData, PropertyLookupResponse, PropertyRecord};
use homedata_client::{Error as ClientError, HomedataClient};
use log::{error, info};
use serde_json::Value;
use thiserror::Error;

#[async_trait]
pub trait PropertySource: Send + Sync {
    async fn lookup(&self, address: &str, zip_code: &str)
        -> Result<PropertyLookupResponse, ClientError>;
}

#[async_trait]
impl PropertySource for HomedataClient {
    async fn lookup(
        &self,
        address: &str,
        zip_code: &str,
    ) -> Result<PropertyLookupResponse, ClientError> {
        self.property_lookup(address, zip_code).await
    }
}

const VIOLATION_EXCLUDED: &[&str] = &[
    "housenumber",
    "lowhousenumber",
    "highhousenumber",
    "streetname",
    "streetcode",
    "zip",
    "buildingid",
    "registrationid",
    "boroid",
    "boro",
    "story",
    "block",
    "lot",
    "novtype",
    "latitude",
    "longitude",
    "communityboard",
    "councildistrict",
    "censustract",
    "bin",
    "bbl",
    "nta",
];

const COMPLAINT_EXCLUDED: &[&str] = &[
    "agency",
    "incident_zip",
    "incident_address",
    "street_name",
    "cross_street_1",
    "cross_street_2",
    "intersection_street_1",
    "intersection_street_2",
    "address_type",
    "city",
    "landmark",
    "community_board",
    "bbl",
    "borough",
    "x_coordinate_state_plane",
    "y_coordinate_state_plane",
    "open_data_channel_type",
    "park_facility_name",
    "park_borough",
    "latitude",
    "longitude",
    "location",
];

const BEDBUG_EXCLUDED: &[&str] = &[
    "building_id",
    "registration_id",
    "borough",
    "house_number",
    "street_name",
    "postcode",
    "filling_period_end_date",
    "latitude",
    "longitude",
    "community_board",
    "city_council_district",
    "census_tract_2010",
    "bin",
    "bbl",
    "nta",
];

const LITIGATION_EXCLUDED: &[&str] = &[
    "buildingid",
    "boroid",
    "housenumber",
    "streetname",
    "zip",
    "block",
    "lot",
    "latitude",
    "longitude",
    "community_district",
    "council_district",
    "census_tract",
    "bin",
    "bbl",
    "nta",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordCategory {
    Violations,
    Complaints,
    BedbugReports,
    Litigation,
}

impl RecordCategory {
    pub const ALL: [RecordCategory; 4] = [
        RecordCategory::Violations,
        RecordCategory::Complaints,
        RecordCategory::BedbugReports,
        RecordCategory::Litigation,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            RecordCategory::Violations => "HPD Violations",
            RecordCategory::Complaints => "311 Complaints",
            RecordCategory::BedbugReports => "Bedbug Reports",
            RecordCategory::Litigation => "Housing Litigation",
        }
    }

    /// Location and identifier columns that repeat the address being looked up.
    pub fn excluded_columns(&self) -> &'static [&'static str] {
        match self {
            RecordCategory::Violations => VIOLATION_EXCLUDED,
            RecordCategory::Complaints => COMPLAINT_EXCLUDED,
            RecordCategory::BedbugReports => BEDBUG_EXCLUDED,
            RecordCategory::Litigation => LITIGATION_EXCLUDED,
        }
    }

    fn records<'a>(&self, data: &'a PropertyData) -> &'a [PropertyRecord] {
        let records = match self {
            RecordCategory::Violations => &data.hpd_violations,
            RecordCategory::Complaints => &data.complaints,
            RecordCategory::BedbugReports => &data.bedbug_reports,
            RecordCategory::Litigation => &data.litigation,
        };
        records.as_deref().unwrap_or_default()
    }

    fn total_count(&self, data: &PropertyData) -> Option<u64> {
        match self {
            RecordCategory::Violations => data.hpd_violations_total_count,
            RecordCategory::Complaints => data.complaints_total_count,
            RecordCategory::BedbugReports => data.bedbug_reports_total_count,
            RecordCategory::Litigation => data.litigation_total_count,
        }
    }
}

/// Rewrites `YYYY-MM-DDTHH:MM:SS.mmm` as `MM-DD-YYYY hh:mm:ss AM/PM`.
fn format_timestamp(value: &str) -> Option<String> {
    let bytes = value.as_bytes();
    let shaped = bytes.len() == 23
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            10 => *b == b'T',
            13 | 16 => *b == b':',
            19 => *b == b'.',
            _ => b.is_ascii_digit(),
        });
    if !shaped {
        return None;
    }
    let parsed = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.3f").ok()?;
    Some(parsed.format("%m-%d-%Y %I:%M:%S %p").to_string())
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => format_timestamp(s).unwrap_or_else(|| s.clone()),
        Some(other) => other.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowLimit {
    First(usize),
    All,
}

impl Default for RowLimit {
    fn default() -> Self {
        RowLimit::First(5)
    }
}

/// One category of records, flattened to display text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordTable {
    pub category: RecordCategory,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RecordTable {
    /// Columns are taken from the first record in the order the server sent
    /// them, minus the category's excluded columns.
    pub fn from_records(category: RecordCategory, records: &[PropertyRecord]) -> Self {
        let excluded = category.excluded_columns();
        let columns: Vec<String> = records
            .first()
            .map(|first| {
                first
                    .keys()
                    .filter(|key| !excluded.contains(&key.as_str()))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        let rows = records
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|column| cell_text(record.get(column)))
                    .collect()
            })
            .collect();
        Self {
            category,
            columns,
            rows,
        }
    }

    pub fn title(&self) -> &'static str {
        self.category.title()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn empty_message(&self) -> String {
        format!("No {} data available for this address.", self.title())
    }

    /// Rows whose text contains `query`, ignoring case.
    pub fn filter(&self, query: &str) -> Vec<&[String]> {
        let query = query.to_lowercase();
        self.rows
            .iter()
            .filter(|row| row.join(" ").to_lowercase().contains(&query))
            .map(Vec::as_slice)
            .collect()
    }

    pub fn visible_rows(&self, limit: RowLimit) -> &[Vec<String>] {
        match limit {
            RowLimit::First(count) => &self.rows[..count.min(self.rows.len())],
            RowLimit::All => &self.rows,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategorySummary {
    pub category: RecordCategory,
    pub has_records: bool,
    pub total_count: u64,
}

impl CategorySummary {
    pub fn line(&self) -> String {
        format!("{} - Total: {}", self.category.title(), self.total_count)
    }
}

/// The message shown in place of a report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Error: {message}")]
pub struct LookupFailure {
    pub message: String,
    pub detail: Option<String>,
}

impl LookupFailure {
    const TRANSPORT_MESSAGE: &'static str = "An error occurred";

    fn transport(detail: impl ToString) -> Self {
        Self {
            message: Self::TRANSPORT_MESSAGE.to_string(),
            detail: Some(detail.to_string()),
        }
    }
}

fn id_text(value: &Option<Value>) -> String {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => "N/A".to_string(),
        Some(Value::String(s)) if s.is_empty() => "N/A".to_string(),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => "N/A".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyReport {
    pub address: String,
    pub zip_code: String,
    pub building_id: String,
    pub bbl: String,
    pub summary: Vec<CategorySummary>,
    pub tables: Vec<RecordTable>,
}

impl PropertyReport {
    pub fn from_response(response: PropertyLookupResponse) -> Result<Self, LookupFailure> {
        let data = match response {
            PropertyLookupResponse {
                success: true,
                data: Some(data),
                ..
            } => data,
            PropertyLookupResponse {
                success: true,
                data: None,
                ..
            } => return Err(LookupFailure::transport("response had no data")),
            PropertyLookupResponse { error, .. } => {
                return Err(LookupFailure {
                    message: error.unwrap_or_else(|| "Unknown error".to_string()),
                    detail: None,
                })
            }
        };
        let summary = RecordCategory::ALL
            .into_iter()
            .map(|category| {
                let records = category.records(&data);
                CategorySummary {
                    category,
                    has_records: !records.is_empty(),
                    total_count: category
                        .total_count(&data)
                        .unwrap_or(records.len() as u64),
                }
            })
            .collect();
        let tables = RecordCategory::ALL
            .into_iter()
            .map(|category| RecordTable::from_records(category, category.records(&data)))
            .collect();
        Ok(Self {
            address: data.address.clone(),
            zip_code: data.zip_code.clone(),
            building_id: id_text(&data.building_id),
            bbl: id_text(&data.bbl),
            summary,
            tables,
        })
    }

    /// How many categories returned at least one record.
    pub fn sources_found(&self) -> usize {
        self.summary.iter().filter(|s| s.has_records).count()
    }

    pub fn table(&self, category: RecordCategory) -> Option<&RecordTable> {
        self.tables.iter().find(|table| table.category == category)
    }

    /// Every table with records as a title line, a tab separated header and
    /// tab separated rows.
    pub fn to_clipboard_text(&self) -> String {
        let mut text = String::new();
        for table in self.tables.iter().filter(|table| !table.is_empty()) {
            text.push_str(&format!("\n\n{}\n", table.title()));
            text.push_str(&table.columns.join("\t"));
            text.push('\n');
            for row in &table.rows {
                let cells: Vec<&str> = row.iter().map(|cell| cell.trim()).collect();
                text.push_str(&cells.join("\t"));
                text.push('\n');
            }
        }
        text
    }
}

/// Looks up an address and turns the result into a report, or the failure
/// message to show instead.
pub async fn lookup_property<S>(
    source: &S,
    address: &str,
    zip_code: &str,
) -> Result<PropertyReport, LookupFailure>
where
    S: PropertySource + ?Sized,
{
    let (address, zip_code) = (address.trim(), zip_code.trim());
    match source.lookup(address, zip_code).await {
        Ok(response) => {
            let report = PropertyReport::from_response(response)?;
            info!(
                "found {} data sources for {address} {zip_code}",
                report.sources_found()
            );
            Ok(report)
        }
        Err(e) => {
            error!("property lookup for {address} {zip_code} failed: {e}");
            Err(LookupFailure::transport(e))
        }
    }
}

#[cfg(test)]
mod test {
    use homedata_client::StatusCode;

    use super::*;

    const PAYLOAD: &str = r#"{
        "success": true,
        "data": {
            "address": "100 GOLD ST",
            "zip_code": "10038",
            "building_id": 12345,
            "bbl": "",
            "hpd_violations": [
                {"violationid": "9001", "zip": "10038", "class": "C", "inspectiondate": "2023-01-05T14:30:00.000", "novdescription": "Peeling paint"},
                {"violationid": "9002", "zip": "10038", "class": "B", "inspectiondate": "2023-02-10T00:05:09.000", "novdescription": "Broken window"},
                {"violationid": "9003", "zip": "10038", "class": "A", "inspectiondate": null},
                {"violationid": "9004", "class": "A", "inspectiondate": "2023-03-01"},
                {"violationid": "9005", "class": "B"},
                {"violationid": "9006", "class": "C"}
            ],
            "hpd_violations_total_count": 42,
            "complaints": [],
            "complaints_total_count": 0,
            "litigation": [{"litigationid": 7, "casetype": "Tenant Action", "bbl": "1000770001"}]
        }
    }"#;

    fn report() -> PropertyReport {
        PropertyReport::from_response(serde_json::from_str(PAYLOAD).unwrap()).unwrap()
    }

    #[test]
    fn timestamps_are_reformatted() {
        assert_eq!(
            format_timestamp("2023-01-05T14:30:00.000").as_deref(),
            Some("01-05-2023 02:30:00 PM")
        );
        assert_eq!(
            format_timestamp("2023-02-10T00:05:09.000").as_deref(),
            Some("02-10-2023 12:05:09 AM")
        );
        assert_eq!(format_timestamp("2023-03-01"), None);
        assert_eq!(format_timestamp("2023-01-05T14:30:00.000Z"), None);
        assert_eq!(format_timestamp("2023-13-05T14:30:00.000"), None);
    }

    #[test]
    fn report_header_and_summary() {
        let report = report();
        assert_eq!(report.address, "100 GOLD ST");
        assert_eq!(report.building_id, "12345");
        assert_eq!(report.bbl, "N/A");
        assert_eq!(report.sources_found(), 2);
        let lines: Vec<_> = report.summary.iter().map(CategorySummary::line).collect();
        assert_eq!(
            lines,
            vec![
                "HPD Violations - Total: 42",
                "311 Complaints - Total: 0",
                "Bedbug Reports - Total: 0",
                "Housing Litigation - Total: 1",
            ]
        );
    }

    #[test]
    fn tables_hide_excluded_columns() {
        let report = report();
        let violations = report.table(RecordCategory::Violations).unwrap();
        assert_eq!(
            violations.columns,
            vec!["violationid", "class", "inspectiondate", "novdescription"]
        );
        assert_eq!(
            violations.rows[0],
            vec!["9001", "C", "01-05-2023 02:30:00 PM", "Peeling paint"]
        );
        assert_eq!(violations.rows[2], vec!["9003", "A", "", ""]);
        assert_eq!(violations.rows[3][2], "2023-03-01");

        let litigation = report.table(RecordCategory::Litigation).unwrap();
        assert_eq!(litigation.columns, vec!["litigationid", "casetype"]);
        assert_eq!(litigation.rows[0], vec!["7", "Tenant Action"]);

        let bedbugs = report.table(RecordCategory::BedbugReports).unwrap();
        assert!(bedbugs.is_empty());
        assert_eq!(
            bedbugs.empty_message(),
            "No Bedbug Reports data available for this address."
        );
    }

    #[test]
    fn filtering_and_paging() {
        let report = report();
        let violations = report.table(RecordCategory::Violations).unwrap();
        assert_eq!(violations.visible_rows(RowLimit::default()).len(), 5);
        assert_eq!(violations.visible_rows(RowLimit::All).len(), 6);
        assert_eq!(violations.visible_rows(RowLimit::First(10)).len(), 6);

        let matches = violations.filter("WINDOW");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0][0], "9002");
        assert_eq!(violations.filter("").len(), 6);
    }

    #[test]
    fn clipboard_text_skips_empty_tables() {
        let text = report().to_clipboard_text();
        assert!(text.starts_with("\n\nHPD Violations\nviolationid\tclass\tinspectiondate\tnovdescription\n9001\tC\t"));
        assert!(text.contains("\n\nHousing Litigation\nlitigationid\tcasetype\n7\tTenant Action\n"));
        assert!(!text.contains("311 Complaints"));
    }

    #[test]
    fn server_error_becomes_failure() {
        let response: PropertyLookupResponse =
            serde_json::from_str(r#"{"success": false, "error": "Address not found in NYC"}"#)
                .unwrap();
        let failure = PropertyReport::from_response(response).unwrap_err();
        assert_eq!(failure.message, "Address not found in NYC");
        assert_eq!(failure.to_string(), "Error: Address not found in NYC");
    }

    struct FailingSource;

    #[async_trait]
    impl PropertySource for FailingSource {
        async fn lookup(&self, _: &str, _: &str) -> Result<PropertyLookupResponse, ClientError> {
            Err(ClientError::api(StatusCode::BAD_GATEWAY, "HTTP error! status: 502"))
        }
    }

    struct CannedSource;

    #[async_trait]
    impl PropertySource for CannedSource {
        async fn lookup(
            &self,
            address: &str,
            zip_code: &str,
        ) -> Result<PropertyLookupResponse, ClientError> {
            assert_eq!((address, zip_code), ("100 Gold St", "10038"));
            Ok(serde_json::from_str(PAYLOAD)?)
        }
    }

    #[tokio::test]
    async fn lookup_flow() {
        let report = lookup_property(&CannedSource, "  100 Gold St ", "10038 ")
            .await
            .unwrap();
        assert_eq!(report.tables.len(), 4);

        let failure = lookup_property(&FailingSource, "1 Nowhere", "00000")
            .await
            .unwrap_err();
        assert_eq!(failure.message, "An error occurred");
        assert!(failure.detail.unwrap().contains("502"));
    }
}
