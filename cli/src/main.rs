#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod render;

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use structopt::StructOpt;

use model::analyze::{
    AllocationReport, DriverLeaderboard, IdleReport, LongTermUtilization, PeakUsage,
    RecentUnderuse, SlowTripReport, UsageMetric,
};
use model::{Model, Thresholds};
use sheets::WorkbookCache;

#[derive(StructOpt)]
#[structopt(
    name = "fleet-analysis",
    about = "Canned analyses over a fleet operations workbook"
)]
struct Args {
    /// The workbook (.xlsx) with Trips, Vehicles and related sheets
    #[structopt(long)]
    workbook: PathBuf,
    /// One of: underutilized, allocation, idle, peak, drivers, slow-trips
    #[structopt(long)]
    analysis: String,
    /// Metric for the 7-day underutilization window: trips or distance
    #[structopt(long, default_value = "trips")]
    metric: String,
    /// Cutoff for the chosen metric (defaults: 3 trips or 100 km)
    #[structopt(long)]
    threshold: Option<f64>,
    /// Reference date for the 7-day window, YYYY-MM-DD (defaults to today)
    #[structopt(long)]
    today: Option<NaiveDate>,
    /// Also write this analysis's CSV export into the directory
    #[structopt(long)]
    out_dir: Option<PathBuf>,
    /// Print the result as JSON instead of tables
    #[structopt(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::from_args();

    let bytes = fs::read(&args.workbook)?;
    let mut cache = WorkbookCache::new();
    let workbook = cache.get_or_load(&bytes)?;
    let model = Model::from_workbook(&workbook, Thresholds::default())?;

    match args.analysis.as_str() {
        "underutilized" => underutilized(&args, &model),
        "allocation" => allocation(&args, &model),
        "idle" => idle(&args, &model),
        "peak" => peak(&args, &model),
        "drivers" => drivers(&args, &model),
        "slow-trips" => slow_trips(&args, &model),
        x => bail!(
            "unknown analysis {:?}; expected one of underutilized, allocation, idle, peak, \
             drivers, slow-trips",
            x
        ),
    }
}

fn underutilized(args: &Args, model: &Model) -> Result<()> {
    let metric = match args.metric.as_str() {
        "trips" => UsageMetric::TripCount,
        "distance" => UsageMetric::Distance,
        x => bail!("unknown metric {:?}; expected trips or distance", x),
    };
    let threshold = args.threshold.unwrap_or(match metric {
        UsageMetric::TripCount => model.thresholds.min_recent_trips,
        UsageMetric::Distance => model.thresholds.min_recent_distance_km,
    });
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());

    let recent = model.recent_underuse(today, metric, threshold);
    let long_term = model.long_term_utilization();

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "recent": recent,
                "long_term": long_term,
            }))?
        );
    } else {
        render::recent_underuse(&recent);
        println!();
        render::long_term(&long_term, &model.thresholds);
    }
    write_csv(
        &args.out_dir,
        RecentUnderuse::CSV_FILENAME,
        recent.export_to_csv()?,
    )?;
    write_csv(
        &args.out_dir,
        LongTermUtilization::CSV_FILENAME,
        long_term.export_to_csv()?,
    )
}

fn allocation(args: &Args, model: &Model) -> Result<()> {
    let report = model.allocation()?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render::allocation(&report);
    }
    write_csv(
        &args.out_dir,
        AllocationReport::CSV_FILENAME,
        report.export_to_csv()?,
    )
}

fn idle(args: &Args, model: &Model) -> Result<()> {
    let report = model.long_idle_gaps();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render::idle(&report);
    }
    write_csv(
        &args.out_dir,
        IdleReport::CSV_FILENAME,
        report.export_to_csv()?,
    )
}

fn peak(args: &Args, model: &Model) -> Result<()> {
    let report = model.peak_usage();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render::peak(&report);
    }
    write_csv(
        &args.out_dir,
        PeakUsage::CSV_FILENAME,
        report.export_to_csv()?,
    )
}

fn drivers(args: &Args, model: &Model) -> Result<()> {
    let report = model.driver_leaderboard();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render::leaderboard(&report);
    }
    write_csv(
        &args.out_dir,
        DriverLeaderboard::CSV_FILENAME,
        report.export_to_csv()?,
    )
}

fn slow_trips(args: &Args, model: &Model) -> Result<()> {
    let report = model.slow_trips();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render::slow_trips(&report);
    }
    write_csv(
        &args.out_dir,
        SlowTripReport::CSV_FILENAME,
        report.export_to_csv()?,
    )
}

fn write_csv(out_dir: &Option<PathBuf>, filename: &str, contents: String) -> Result<()> {
    let dir = match out_dir {
        Some(x) => x,
        None => return Ok(()),
    };
    fs::create_dir_all(dir)?;
    let path = dir.join(filename);
    fs::write(&path, contents)?;
    info!("Wrote {}", path.display());
    Ok(())
}
