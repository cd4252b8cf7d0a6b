use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use homedata_api_types::{Bedroom, DataType, SeasonalMode, Selection};
use homedata_client::ClientConfig;
use homedata_dashboard::{RowLimit, SvgSurface};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Base URL of the homedata backend
    #[arg(long, global = true, env = "HOMEDATA_BASE_URL", default_value = ClientConfig::DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Seconds to wait on a single request
    #[arg(long, global = true, env = "HOMEDATA_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn client_config(&self) -> Result<ClientConfig, homedata_client::Error> {
        Ok(ClientConfig::new(&self.base_url)?.with_timeout(Duration::from_secs(self.timeout_secs)))
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch rental series and draw the trends chart
    Chart(ChartArgs),
    /// Show violation, complaint, bedbug and litigation records for an address
    Lookup(LookupArgs),
}

#[derive(Args, Debug)]
pub struct ChartArgs {
    /// median or inventory, repeat for several
    #[arg(long = "data-type")]
    pub data_types: Vec<DataType>,

    /// All, Studio, OneBd, TwoBd or ThreePlusBd, repeat for several
    #[arg(long = "bedroom")]
    pub bedrooms: Vec<Bedroom>,

    /// Neighborhood or borough name, repeat for several
    #[arg(long = "area")]
    pub areas: Vec<String>,

    /// raw, adjusted or both
    #[arg(long, default_value_t = SeasonalMode::Raw)]
    pub seasonal: SeasonalMode,

    /// Plot inventory against its own axis
    #[arg(long)]
    pub secondary_axis: bool,

    /// Where to write the SVG chart
    #[arg(long, default_value = "chart.svg")]
    pub out: PathBuf,

    /// Also write the chart data as CSV
    #[arg(long)]
    pub csv: Option<PathBuf>,

    #[arg(long, default_value_t = SvgSurface::DEFAULT_SIZE.0)]
    pub width: u32,

    #[arg(long, default_value_t = SvgSurface::DEFAULT_SIZE.1)]
    pub height: u32,
}

fn given_or<T: Clone>(given: &[T], fallback: &[T]) -> Vec<T> {
    if given.is_empty() {
        fallback.to_vec()
    } else {
        given.to_vec()
    }
}

impl ChartArgs {
    /// Groups left out on the command line fall back to the initial filters.
    pub fn selection(&self) -> Selection {
        let defaults = Selection::default();
        Selection::new(
            given_or(&self.data_types, &defaults.data_types),
            given_or(&self.bedrooms, &defaults.bedrooms),
            given_or(&self.areas, &defaults.neighborhoods),
            self.seasonal,
        )
        .with_secondary_axis(self.secondary_axis)
    }
}

#[derive(Args, Debug)]
pub struct LookupArgs {
    #[arg(long)]
    pub address: String,

    #[arg(long)]
    pub zip: String,

    /// Only show rows containing this text
    #[arg(long)]
    pub filter: Option<String>,

    /// Show every row instead of the first five
    #[arg(long)]
    pub all: bool,
}

impl LookupArgs {
    pub fn row_limit(&self) -> RowLimit {
        if self.all {
            RowLimit::All
        } else {
            RowLimit::default()
        }
    }
}

#[cfg(test)]
mod test {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn chart_defaults() {
        let cli = Cli::try_parse_from(["homedata", "chart"]).unwrap();
        let Command::Chart(args) = cli.command else {
            panic!("expected chart");
        };
        assert_eq!(args.selection(), Selection::default());
        assert_eq!(args.out, PathBuf::from("chart.svg"));
        assert_eq!(cli.timeout_secs, 30);
    }

    #[test]
    fn chart_selection_from_flags() {
        let cli = Cli::try_parse_from([
            "homedata",
            "chart",
            "--data-type",
            "inventory",
            "--area",
            "Queens",
            "--area",
            "Staten Island",
            "--seasonal",
            "both",
            "--secondary-axis",
            "--base-url",
            "https://example.com",
        ])
        .unwrap();
        assert_eq!(cli.base_url, "https://example.com");
        let Command::Chart(args) = cli.command else {
            panic!("expected chart");
        };
        let selection = args.selection();
        assert_eq!(selection.data_types, vec![DataType::Inventory]);
        assert_eq!(selection.bedrooms, vec![Bedroom::All]);
        assert_eq!(selection.neighborhoods, vec!["Queens", "Staten Island"]);
        assert_eq!(selection.seasonal_mode, SeasonalMode::Both);
        assert!(selection.use_secondary_axis);
    }

    #[test]
    fn bad_bedroom_is_rejected() {
        assert!(Cli::try_parse_from(["homedata", "chart", "--bedroom", "Loft"]).is_err());
    }

    #[test]
    fn lookup_flags() {
        let cli = Cli::try_parse_from([
            "homedata", "lookup", "--address", "100 Gold St", "--zip", "10038", "--all",
        ])
        .unwrap();
        let Command::Lookup(args) = cli.command else {
            panic!("expected lookup");
        };
        assert_eq!(args.row_limit(), RowLimit::All);
        assert_eq!(args.filter, None);
    }
}
