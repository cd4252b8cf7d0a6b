use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Values keyed by ISO month (`YYYY-MM`). The BTreeMap keeps the months in
/// chronological order no matter how the backend ordered them. A `None`
/// value is a month the backend had no number for.
pub type MonthlyValues = BTreeMap<String, Option<f64>>;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MonthlyData {
    #[serde(default)]
    pub raw: Option<MonthlyValues>,
    #[serde(default)]
    pub adjusted: Option<MonthlyValues>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AreaMetadata {
    #[serde(default)]
    pub borough: Option<String>,
    #[serde(default, rename = "areaType")]
    pub area_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AreaData {
    #[serde(default)]
    pub monthly: Option<MonthlyData>,
    #[serde(default)]
    pub metadata: Option<AreaMetadata>,
    #[serde(default, rename = "Borough")]
    pub borough: Option<String>,
}

impl AreaData {
    pub fn borough(&self) -> Option<&str> {
        self.borough
            .as_deref()
            .or_else(|| self.metadata.as_ref()?.borough.as_deref())
    }
}

/// An area in a time series payload. Areas that don't have the expected shape
/// are kept around as raw JSON so a single bad area doesn't reject the whole
/// response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AreaEntry {
    Data(AreaData),
    Malformed(Value),
}

impl AreaEntry {
    pub fn as_data(&self) -> Option<&AreaData> {
        match self {
            AreaEntry::Data(data) => Some(data),
            AreaEntry::Malformed(_) => None,
        }
    }
}

/// Response of the rental data endpoint: area name to that area's series.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeSeriesResponse {
    pub areas: BTreeMap<String, AreaEntry>,
}

impl TimeSeriesResponse {
    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }
}
