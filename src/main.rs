use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use seat_shuffle::{arrange, sheet, Config, Improvement, Placement};

/// Seat a roster so that members of the same group sit together.
#[derive(Debug, Parser)]
#[command(name = "seat-shuffle", version)]
struct Args {
    /// Roster sheet (CSV): one column per group, group name in the first row.
    roster: PathBuf,

    /// Seat sheet (CSV): blank, pinned name, or assignable marker per cell.
    layout: PathBuf,

    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed overriding the configured one.
    #[arg(long)]
    seed: Option<u64>,

    /// Where to write the seated names; stdout when absent.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Where to write each seat's group color.
    #[arg(long)]
    colors: Option<PathBuf>,
}

fn run(args: Args) -> seat_shuffle::Result<()> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::new(),
    };
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    let people = sheet::read_roster(File::open(&args.roster)?, &config)?;
    let layout = sheet::read_layout(File::open(&args.layout)?, &config.markers)?;
    info!(people = people.len(), columns = layout.columns(), rows = layout.rows(), "sheets loaded");

    let mut observer = |placement: &Placement, improvement: &Improvement| {
        for cell in [improvement.swap.first, improvement.swap.second] {
            if let Some(seat) = placement.get(&cell) {
                debug!(%cell, id = %seat.person.id, score = improvement.score, "seat updated");
            }
        }
    };
    let outcome = arrange(people, &layout, &config, &mut observer)?;

    match &args.output {
        Some(path) => sheet::write_names(&outcome.placement, &layout, File::create(path)?)?,
        None => sheet::write_names(&outcome.placement, &layout, io::stdout().lock())?,
    }
    if let Some(path) = &args.colors {
        sheet::write_colors(&outcome.placement, &layout, File::create(path)?)?;
    }
    info!(score = outcome.report.score, initial = outcome.report.initial_score, "done");
    Ok(())
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("seat_shuffle=info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
