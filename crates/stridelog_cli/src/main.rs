//! StrideLog command-line front end.
//!
//! # Responsibility
//! - Map subcommands onto `WorkoutController` use-cases.
//! - Persist workouts in a local SQLite file between invocations.

mod terminal;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum, ValueHint};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::PathBuf;
use stridelog_core::db::open_db;
use stridelog_core::{
    init_logging, CoreConfig, Discipline, Position, SqliteFlatStore, WorkoutController,
    WorkoutFields, WorkoutId,
};
use terminal::{ArgPosition, TerminalMap, TerminalView};

static POSITION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(-?\d+(?:\.\d+)?)\s*,\s*(-?\d+(?:\.\d+)?)\s*$").expect("valid position regex")
});

#[derive(Parser, Debug)]
#[command(author, version, about = "Personal running and cycling log", long_about = None)]
struct Cli {
    /// SQLite database file (overrides STRIDELOG_DB_PATH)
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    db: Option<PathBuf>,

    /// Absolute directory for rolling log files (overrides STRIDELOG_LOG_DIR)
    #[arg(long, global = true, value_hint = ValueHint::DirPath)]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error (overrides STRIDELOG_LOG_LEVEL)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Current position as `LAT,LNG`
    #[arg(long, global = true, value_parser = parse_position)]
    here: Option<Position>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the map link for the current position
    Locate,
    /// Record a workout at a position
    Add(AddArgs),
    /// Change distance, duration or the discipline metric of a workout
    Edit(EditArgs),
    /// Delete a workout
    Remove {
        #[arg(value_parser = parse_id)]
        id: WorkoutId,
    },
    /// List workouts
    List {
        /// Order by ascending distance instead of creation time
        #[arg(long)]
        by_distance: bool,
    },
    /// Select a workout and show its map link
    Select {
        #[arg(value_parser = parse_id)]
        id: WorkoutId,
    },
    /// Delete every workout
    Reset {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// Print the stored snapshot
    Export,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DisciplineArg {
    Running,
    Cycling,
}

impl From<DisciplineArg> for Discipline {
    fn from(value: DisciplineArg) -> Self {
        match value {
            DisciplineArg::Running => Discipline::Running,
            DisciplineArg::Cycling => Discipline::Cycling,
        }
    }
}

#[derive(clap::Args, Debug)]
struct AddArgs {
    #[arg(value_enum)]
    discipline: DisciplineArg,

    /// Workout position as `LAT,LNG` (defaults to --here)
    #[arg(long, value_parser = parse_position)]
    at: Option<Position>,

    /// Distance in kilometers
    #[arg(long, allow_negative_numbers = true)]
    distance: f64,

    /// Duration in minutes
    #[arg(long, allow_negative_numbers = true)]
    duration: f64,

    /// Steps per minute (running)
    #[arg(long, allow_negative_numbers = true)]
    cadence: Option<f64>,

    /// Elevation gain in meters, negative for descents (cycling)
    #[arg(long, allow_negative_numbers = true)]
    elevation: Option<f64>,
}

#[derive(clap::Args, Debug)]
struct EditArgs {
    #[arg(value_parser = parse_id)]
    id: WorkoutId,

    #[arg(long, allow_negative_numbers = true)]
    distance: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    duration: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    cadence: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    elevation: Option<f64>,
}

type Controller<'conn> =
    WorkoutController<SqliteFlatStore<'conn>, ArgPosition, TerminalMap, TerminalView>;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    if let Some(log_dir) = &config.log_dir {
        init_logging(config.log_level, log_dir).map_err(|err| anyhow!(err))?;
    }

    let conn = open_db(&config.db_path)
        .with_context(|| format!("failed to open `{}`", config.db_path.display()))?;
    let mut controller: Controller<'_> = WorkoutController::new(
        SqliteFlatStore::new(&conn),
        ArgPosition(cli.here),
        TerminalMap::default(),
        TerminalView::default(),
        config.slot_key.clone(),
    );
    let here = controller.start();

    run(&mut controller, cli.command, here)?;

    for event in &controller.map().events {
        println!("{event}");
    }
    Ok(())
}

fn resolve_config(cli: &Cli) -> Result<CoreConfig> {
    let mut config = CoreConfig::from_env()?;
    if let Some(db) = &cli.db {
        config.db_path = db.clone();
    }
    if let Some(log_dir) = &cli.log_dir {
        config.log_dir = Some(log_dir.clone());
    }
    if let Some(level) = &cli.log_level {
        config.set_log_level(level)?;
    }
    Ok(config)
}

fn run(controller: &mut Controller<'_>, command: Command, here: Option<Position>) -> Result<()> {
    match command {
        Command::Locate => {
            if here.is_none() {
                bail!("position unavailable; pass --here LAT,LNG");
            }
        }
        Command::Add(args) => {
            let discipline = Discipline::from(args.discipline);
            let position = args
                .at
                .or(here)
                .ok_or_else(|| anyhow!("no position; pass --at LAT,LNG or --here LAT,LNG"))?;
            let input = discipline_input(discipline, args.cadence, args.elevation)?
                .ok_or_else(|| {
                    anyhow!("{} requires {}", discipline.label(), input_flag(discipline))
                })?;

            controller.select_position(position)?;
            let id = controller.submit_create(
                discipline,
                WorkoutFields::new(args.distance, args.duration, input),
            )?;
            println!("created {id}");
            print_list(controller);
        }
        Command::Edit(args) => {
            let discipline = controller.store().find(&args.id)?.discipline();
            let input = discipline_input(discipline, args.cadence, args.elevation)?;
            let current = controller.begin_edit(&args.id)?;
            let fields = WorkoutFields::new(
                args.distance.unwrap_or(current.distance_km),
                args.duration.unwrap_or(current.duration_min),
                input.unwrap_or(current.discipline_input),
            );
            controller.submit_edit(fields)?;
            println!("updated {}", args.id);
            print_list(controller);
        }
        Command::Remove { id } => {
            controller.remove(&id)?;
            println!("removed {id}");
            print_list(controller);
        }
        Command::List { by_distance } => {
            if by_distance {
                controller.toggle_sort();
            }
            print_list(controller);
        }
        Command::Select { id } => {
            controller.select_workout(&id)?;
            println!("{}", controller.store().find(&id)?.marker_label());
        }
        Command::Reset { yes } => {
            if !yes {
                bail!("refusing to delete all workouts without --yes");
            }
            controller.reset()?;
            println!("all workouts deleted");
        }
        Command::Export => {
            println!("{}", controller.snapshot()?);
        }
    }
    Ok(())
}

/// Picks the flag matching `discipline`; the other one is an error.
fn discipline_input(
    discipline: Discipline,
    cadence: Option<f64>,
    elevation: Option<f64>,
) -> Result<Option<f64>> {
    match (discipline, cadence, elevation) {
        (Discipline::Running, _, Some(_)) => bail!("--elevation applies to cycling only"),
        (Discipline::Cycling, Some(_), _) => bail!("--cadence applies to running only"),
        (Discipline::Running, cadence, None) => Ok(cadence),
        (Discipline::Cycling, None, elevation) => Ok(elevation),
    }
}

fn input_flag(discipline: Discipline) -> &'static str {
    match discipline {
        Discipline::Running => "--cadence",
        Discipline::Cycling => "--elevation",
    }
}

fn print_list(controller: &Controller<'_>) {
    let view = controller.view();
    if view.lines.is_empty() {
        println!("no workouts yet");
        return;
    }
    for line in &view.lines {
        println!("{line}");
    }
    println!("({} on map)", controller.map().marker_count);
}

fn parse_position(value: &str) -> Result<Position, String> {
    let captures = POSITION_RE
        .captures(value)
        .ok_or_else(|| format!("expected `LAT,LNG`, got `{value}`"))?;
    let coordinate = |index: usize| -> Result<f64, String> {
        captures[index]
            .parse::<f64>()
            .map_err(|err| format!("invalid coordinate `{}`: {err}", &captures[index]))
    };
    Ok(Position::new(coordinate(1)?, coordinate(2)?))
}

fn parse_id(value: &str) -> Result<WorkoutId, String> {
    WorkoutId::parse(value).ok_or_else(|| "workout id cannot be blank".to_string())
}

#[cfg(test)]
mod tests {
    use super::{discipline_input, parse_position, Cli, Command};
    use clap::Parser;
    use stridelog_core::{Discipline, Position};

    #[test]
    fn parse_position_accepts_signed_decimals() {
        assert_eq!(
            parse_position(" -33.86, 151.2 ").unwrap(),
            Position::new(-33.86, 151.2)
        );
        assert!(parse_position("50.0").is_err());
        assert!(parse_position("north,east").is_err());
    }

    #[test]
    fn discipline_input_rejects_mismatched_flag() {
        assert_eq!(
            discipline_input(Discipline::Running, Some(170.0), None).unwrap(),
            Some(170.0)
        );
        assert_eq!(
            discipline_input(Discipline::Cycling, None, Some(-40.0)).unwrap(),
            Some(-40.0)
        );
        assert!(discipline_input(Discipline::Running, None, Some(10.0)).is_err());
        assert!(discipline_input(Discipline::Cycling, Some(90.0), None).is_err());
    }

    #[test]
    fn add_command_parses_negative_elevation() {
        let cli = Cli::try_parse_from([
            "stridelog",
            "--here",
            "50.0,30.0",
            "add",
            "cycling",
            "--distance",
            "20",
            "--duration",
            "60",
            "--elevation",
            "-120",
        ])
        .unwrap();
        assert_eq!(cli.here, Some(Position::new(50.0, 30.0)));
    }

    #[test]
    fn add_command_passes_negative_distance_through_to_validation() {
        let cli = Cli::try_parse_from([
            "stridelog",
            "add",
            "running",
            "--distance",
            "-1",
            "--duration",
            "-25",
            "--cadence",
            "170",
        ])
        .unwrap();
        match cli.command {
            Command::Add(args) => {
                assert_eq!(args.distance, -1.0);
                assert_eq!(args.duration, -25.0);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
