mod cli;

use anyhow::{bail, Context, Result};
use clap::Parser;
use cli::{ChartArgs, Cli, Command, LookupArgs};
use homedata_client::HomedataClient;
use homedata_dashboard::{
    lookup_property, Dashboard, PropertyReport, RecordTable, SvgSurface, UpdateOutcome,
};
use tracing::{error, info, warn};

async fn run_chart(client: HomedataClient, args: ChartArgs) -> Result<()> {
    let selection = args.selection();
    info!("charting {selection:?}");
    let dashboard = Dashboard::new(client, SvgSurface::new((args.width, args.height)));
    match dashboard.update_with(selection).await {
        UpdateOutcome::Rendered(outcome) => info!("chart {outcome:?}"),
        UpdateOutcome::Failed => bail!("Unable to draw chart"),
        outcome => {
            warn!("nothing to draw ({outcome:?}), leaving {} untouched", args.out.display());
            return Ok(());
        }
    }
    let svg = dashboard
        .with_renderer(|renderer| renderer.surface().svg().map(str::to_string))
        .context("chart was never drawn")?;
    tokio::fs::write(&args.out, svg)
        .await
        .with_context(|| format!("Unable to write {}", args.out.display()))?;
    info!("wrote {}", args.out.display());

    if let Some(path) = &args.csv {
        let table = dashboard.export_table().context("no chart to export")?;
        tokio::fs::write(path, table.to_csv_string()?)
            .await
            .with_context(|| format!("Unable to write {}", path.display()))?;
        info!("wrote {}", path.display());
    }
    Ok(())
}

fn print_table(table: &RecordTable, args: &LookupArgs) {
    println!();
    println!("{}", table.title());
    if table.is_empty() {
        println!("{}", table.empty_message());
        return;
    }
    let rows: Vec<&[String]> = match &args.filter {
        Some(query) => table.filter(query),
        None => table
            .visible_rows(args.row_limit())
            .iter()
            .map(Vec::as_slice)
            .collect(),
    };
    println!("{}", table.columns.join("\t"));
    for row in &rows {
        println!("{}", row.join("\t"));
    }
    if args.filter.is_none() && rows.len() < table.rows.len() {
        println!(
            "... {} more rows, pass --all to show them",
            table.rows.len() - rows.len()
        );
    }
}

fn print_report(report: &PropertyReport, args: &LookupArgs) {
    println!("{} {}", report.address, report.zip_code);
    println!("Building ID: {}", report.building_id);
    println!("BBL: {}", report.bbl);
    println!();
    println!(
        "We found {} data sources for this address:",
        report.sources_found()
    );
    for summary in &report.summary {
        println!("  {}", summary.line());
    }
    for table in &report.tables {
        print_table(table, args);
    }
}

async fn run_lookup(client: HomedataClient, args: LookupArgs) -> Result<()> {
    match lookup_property(&client, &args.address, &args.zip).await {
        Ok(report) => {
            print_report(&report, &args);
            Ok(())
        }
        Err(failure) => {
            error!("lookup failed: {failure:?}");
            eprintln!("{failure}");
            if let Some(detail) = &failure.detail {
                eprintln!("{detail}");
            }
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    let client = HomedataClient::new(cli.client_config()?)?;
    match cli.command {
        Command::Chart(args) => run_chart(client, args).await,
        Command::Lookup(args) => run_lookup(client, args).await,
    }
}
