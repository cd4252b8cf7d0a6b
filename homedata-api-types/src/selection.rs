use std::{fmt::Display, str::FromStr};

use itertools::{iproduct, Itertools};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseSelectionError {
    #[error("Invalid data type: {0}")]
    DataType(String),
    #[error("Invalid bedroom type: {0}")]
    Bedroom(String),
    #[error("Invalid seasonal mode: {0}. Expected raw, adjusted or both")]
    SeasonalMode(String),
}

/// Which dataset the backend should read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Median,
    Inventory,
}

impl DataType {
    pub const ALL: [DataType; 2] = [DataType::Median, DataType::Inventory];

    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Median => "median",
            DataType::Inventory => "inventory",
        }
    }

    /// What the values of this data type measure, as shown in series labels.
    pub fn measure(&self) -> &'static str {
        match self {
            DataType::Median => "Rent",
            DataType::Inventory => "Inventory",
        }
    }

    pub fn is_inventory(&self) -> bool {
        matches!(self, DataType::Inventory)
    }
}

impl Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = ParseSelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DataType::ALL
            .into_iter()
            .find(|data_type| data_type.as_str() == s)
            .ok_or_else(|| ParseSelectionError::DataType(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Bedroom {
    All,
    Studio,
    OneBd,
    TwoBd,
    ThreePlusBd,
}

impl Bedroom {
    pub const ALL: [Bedroom; 5] = [
        Bedroom::All,
        Bedroom::Studio,
        Bedroom::OneBd,
        Bedroom::TwoBd,
        Bedroom::ThreePlusBd,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Bedroom::All => "All",
            Bedroom::Studio => "Studio",
            Bedroom::OneBd => "OneBd",
            Bedroom::TwoBd => "TwoBd",
            Bedroom::ThreePlusBd => "ThreePlusBd",
        }
    }
}

impl Display for Bedroom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Bedroom {
    type Err = ParseSelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Bedroom::ALL
            .into_iter()
            .find(|bedroom| bedroom.as_str() == s)
            .ok_or_else(|| ParseSelectionError::Bedroom(s.to_string()))
    }
}

/// Whether the chart shows raw values, seasonally adjusted values, or both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeasonalMode {
    #[default]
    Raw,
    Adjusted,
    Both,
}

impl SeasonalMode {
    pub fn includes_raw(&self) -> bool {
        matches!(self, SeasonalMode::Raw | SeasonalMode::Both)
    }

    pub fn includes_adjusted(&self) -> bool {
        matches!(self, SeasonalMode::Adjusted | SeasonalMode::Both)
    }

    /// Value of the `seasonal` query parameter. The backend only attaches
    /// adjusted values when asked to.
    pub fn requests_seasonal(&self) -> bool {
        self.includes_adjusted()
    }

    /// Applies a change to one box of the raw/adjusted/both checkbox trio.
    /// Checking a box makes it the only checked one; unchecking the active
    /// box leaves nothing checked, which displays raw data.
    pub fn after_checkbox_change(self, toggled: SeasonalMode, checked: bool) -> SeasonalMode {
        if checked {
            toggled
        } else if toggled == self {
            SeasonalMode::Raw
        } else {
            self
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SeasonalMode::Raw => "raw",
            SeasonalMode::Adjusted => "adjusted",
            SeasonalMode::Both => "both",
        }
    }
}

impl Display for SeasonalMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeasonalMode {
    type Err = ParseSelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "raw" => SeasonalMode::Raw,
            "adjusted" | "seasonal" => SeasonalMode::Adjusted,
            "both" => SeasonalMode::Both,
            _ => return Err(ParseSelectionError::SeasonalMode(s.to_string())),
        })
    }
}

/// The filters currently picked on the dashboard.
///
/// Each group keeps the order values were first picked in and never holds
/// duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub data_types: Vec<DataType>,
    pub bedrooms: Vec<Bedroom>,
    pub neighborhoods: Vec<String>,
    pub seasonal_mode: SeasonalMode,
    pub use_secondary_axis: bool,
}

impl Selection {
    pub const DEFAULT_NEIGHBORHOOD: &'static str = "Manhattan";

    pub fn new<N>(
        data_types: impl IntoIterator<Item = DataType>,
        bedrooms: impl IntoIterator<Item = Bedroom>,
        neighborhoods: impl IntoIterator<Item = N>,
        seasonal_mode: SeasonalMode,
    ) -> Self
    where
        N: Into<String>,
    {
        Self {
            data_types: data_types.into_iter().unique().collect(),
            bedrooms: bedrooms.into_iter().unique().collect(),
            neighborhoods: neighborhoods
                .into_iter()
                .map(Into::<String>::into)
                .unique()
                .collect(),
            seasonal_mode,
            use_secondary_axis: false,
        }
    }

    pub fn with_secondary_axis(mut self, use_secondary_axis: bool) -> Self {
        self.use_secondary_axis = use_secondary_axis;
        self
    }

    /// A chart can only be built when every group has at least one value.
    pub fn is_complete(&self) -> bool {
        !self.data_types.is_empty() && !self.bedrooms.is_empty() && !self.neighborhoods.is_empty()
    }

    /// One request per data type, bedroom and neighborhood combination.
    pub fn requests(&self) -> Vec<SeriesRequest> {
        iproduct!(
            self.data_types.iter(),
            self.bedrooms.iter(),
            self.neighborhoods.iter()
        )
        .map(|(data_type, bedroom, neighborhood)| SeriesRequest {
            data_type: *data_type,
            bedroom: *bedroom,
            neighborhood: neighborhood.clone(),
            seasonal_mode: self.seasonal_mode,
        })
        .collect()
    }
}

impl Default for Selection {
    fn default() -> Self {
        Selection::new(
            [DataType::Median],
            [Bedroom::All],
            [Self::DEFAULT_NEIGHBORHOOD],
            SeasonalMode::Raw,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeriesRequest {
    pub data_type: DataType,
    pub bedroom: Bedroom,
    pub neighborhood: String,
    pub seasonal_mode: SeasonalMode,
}
