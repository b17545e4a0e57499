mod ui;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use log::error;

use pitwall::{
    LapSource, PitwallError, SessionKey, SessionType, Stint, load_lap_archive, segment_records,
    writer::write_stints,
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args, Debug)]
struct SelectionArgs {
    /// Lap archive in JSON lines format
    #[arg(short, long)]
    input: PathBuf,

    #[arg(short, long)]
    year: u16,

    /// Event name, e.g. "Bahrain Grand Prix"
    #[arg(short, long)]
    event: String,

    #[arg(short, long, default_value = "Race")]
    session: String,

    /// Driver abbreviation, e.g. VER
    #[arg(short, long)]
    driver: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Open the race analysis dashboard
    View {
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// Print the tire stints of a driver
    Stints {
        #[command(flatten)]
        selection: SelectionArgs,
    },
    /// Write the tire stints of a driver as JSON lines
    Export {
        #[command(flatten)]
        selection: SelectionArgs,

        #[arg(short, long)]
        output: PathBuf,
    },
}

fn load_stints(selection: &SelectionArgs) -> Result<Vec<Stint>, PitwallError> {
    let archive = load_lap_archive(&selection.input)?;
    let key = SessionKey {
        year: selection.year,
        event_name: selection.event.clone(),
        session_type: SessionType::from_label(&selection.session)?,
    };
    let session = archive.driver_laps(&key, &selection.driver)?;
    Ok(segment_records(&session.laps))
}

fn stints(selection: &SelectionArgs) -> Result<(), PitwallError> {
    let stints = load_stints(selection)?;
    println!(
        "Tire strategy for {} - {} {} ({})",
        selection.driver, selection.event, selection.year, selection.session
    );
    println!(
        "{:<4} {:<13} {:>6} {:>6} {:>6}",
        "#", "Compound", "Start", "End", "Laps"
    );
    for (stint_no, stint) in stints.iter().enumerate() {
        println!(
            "{:<4} {:<13} {:>6} {:>6} {:>6}",
            stint_no + 1,
            stint.compound,
            stint.start_lap,
            stint.end_lap,
            stint.length
        );
    }
    Ok(())
}

fn export(selection: &SelectionArgs, output: &Path) -> Result<(), PitwallError> {
    let stints = load_stints(selection)?;
    write_stints(output, &stints)
}

fn main() {
    colog::init();

    let cli = Args::parse();
    ctrlc::set_handler(move || {
        println!("Exiting...");
        std::process::exit(0);
    })
    .expect("Could not set Ctrl-C handler");

    let result = match &cli.command {
        Commands::View { input } => ui::run_dashboard(input.clone()),
        Commands::Stints { selection } => stints(selection),
        Commands::Export { selection, output } => export(selection, output),
    };
    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}
