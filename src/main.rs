//! IT Problem Tracker - Entry Point
//!
//! Terminalskal ovanpå ärendeloggen.
//!
//! ```text
//! problem-tracker list --limit 50
//! problem-tracker search skrivare --scope subject
//! problem-tracker add --subject "Skrivaren fastnar" --solution "Rensade valsen"
//! problem-tracker export ~/backup.bak
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser, Subcommand};
use tracing::Level;

use problem_tracker::models::{AppSettings, Problem, SearchScope};
use problem_tracker::utils::date::Calendar;
use problem_tracker::utils::path::{display_path, get_database_path};
use problem_tracker::{Database, EntryChanges, TrackerApp};

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "problem-tracker", version, about = "Ärendelogg för IT-support")]
struct Args {
    /// Katalog för problems.db (går före inställningsfilen)
    #[arg(long, env = "PROBLEM_TRACKER_DATA_DIR", value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Lägg databasen bredvid programfilen
    #[arg(
        long,
        env = "PROBLEM_TRACKER_PORTABLE",
        action = ArgAction::SetTrue,
        value_parser = BoolishValueParser::new()
    )]
    portable: bool,

    /// Kalender för nya ärenden: jalali eller gregorian
    #[arg(long, env = "PROBLEM_TRACKER_CALENDAR", value_parser = parse_calendar)]
    calendar: Option<Calendar>,

    /// Alternativ settings.toml
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// -v för info, -vv för debug
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Visa de senaste ärendena
    List {
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// Sök i ärenden
    Search {
        keyword: String,
        /// all, subject, problem eller solution
        #[arg(short, long, default_value = "all", value_parser = parse_scope)]
        scope: SearchScope,
    },
    /// Visa ett ärende i sin helhet
    Show { id: i64 },
    /// Registrera ett nytt ärende
    Add {
        #[arg(long)]
        subject: String,
        #[arg(long, default_value = "")]
        problem: String,
        #[arg(long, default_value = "")]
        solution: String,
    },
    /// Ändra ett ärende; utelämnade fält behålls
    Edit {
        id: i64,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        subject: Option<String>,
        #[arg(long)]
        problem: Option<String>,
        #[arg(long)]
        solution: Option<String>,
    },
    /// Ta bort ett ärende
    Delete { id: i64 },
    /// Exportera alla ärenden till en backup-fil
    Export { path: Option<PathBuf> },
    /// Ersätt alla ärenden med innehållet i en backup
    Import {
        path: PathBuf,
        /// Visa innehållet utan att importera
        #[arg(long)]
        dry_run: bool,
    },
    /// Visa datakatalog och databasinformation
    Info,
    /// Visa gällande inställningar
    Settings {
        /// Spara dem till inställningsfilen
        #[arg(long)]
        save: bool,
    },
}

fn parse_scope(s: &str) -> Result<SearchScope, String> {
    SearchScope::from_key(s).ok_or_else(|| {
        let keys: Vec<String> = SearchScope::all().iter().map(ToString::to_string).collect();
        format!("okänt sökfält: {} (giltiga: {})", s, keys.join(", "))
    })
}

fn parse_calendar(s: &str) -> Result<Calendar, String> {
    Calendar::from_config_str(s).ok_or_else(|| format!("okänd kalender: {}", s))
}

// ─── Entry point ──────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Startar IT Problem Tracker v{}", env!("CARGO_PKG_VERSION"));

    let mut settings = match &args.config {
        Some(path) => AppSettings::load_from(path),
        None => AppSettings::load(),
    };
    settings.apply_overrides(args.data_dir, args.portable, args.calendar);

    let data_dir = settings.data_location().resolve();
    let db_path = get_database_path(&data_dir);
    let db = Database::open(&db_path)
        .with_context(|| format!("Kunde inte öppna databas {}", db_path.display()))?
        .with_calendar(settings.calendar);

    let mut app = TrackerApp::new(db, settings);
    let command = args.command.unwrap_or(Command::List { limit: None });
    run(&mut app, command, &data_dir, args.config.as_deref())
}

fn run(
    app: &mut TrackerApp,
    command: Command,
    data_dir: &std::path::Path,
    config: Option<&std::path::Path>,
) -> Result<()> {
    match command {
        Command::List { limit } => {
            app.load_entries(limit)?;
            print_records(app);
        }
        Command::Search { keyword, scope } => {
            println!("Söker i: {}", scope.display_name());
            app.search(&keyword, scope)?;
            print_records(app);
        }
        Command::Show { id } => {
            let problem = app.show_details(id)?;
            print_details(&problem);
        }
        Command::Add { subject, problem, solution } => {
            let id = app.add_entry(&subject, &problem, &solution)?;
            println!("Ärende {} sparat", id);
        }
        Command::Edit { id, date, subject, problem, solution } => {
            let changes = EntryChanges { date, subject, problem, solution };
            app.edit_entry(id, changes)?;
            print_status(app);
        }
        Command::Delete { id } => {
            app.delete_entry(id)?;
            print_status(app);
        }
        Command::Export { path } => {
            let result = app.export_backup(path.as_deref())?;
            println!(
                "Backup sparad som {} ({} ärenden, {}, {})",
                result.path.display(),
                result.record_count,
                result.size_display(),
                result.created_at
            );
        }
        Command::Import { path, dry_run } => {
            if dry_run {
                let bytes = std::fs::read(&path)
                    .with_context(|| format!("Kunde inte läsa {}", path.display()))?;
                let preview = app.preview_backup(&bytes)?;
                println!("{} ärenden, {}", preview.record_count, preview.size_display());
                if let Some((lo, hi)) = preview.id_range {
                    println!("ID {}-{}", lo, hi);
                }
            } else {
                let count = app.import_and_refresh(&path)?;
                println!("Återställde {} ärenden från {}", count, path.display());
            }
        }
        Command::Info => {
            let db = app.database();
            println!("Datakatalog: {}", display_path(data_dir));
            if let Some(path) = db.path() {
                println!("Databas:     {}", display_path(path));
            }
            println!("Ärenden:     {}", db.problems().count()?);
            println!("Kalender:    {} (idag {})", db.calendar(), db.calendar().today());
        }
        Command::Settings { save } => {
            let settings = app.settings();
            print!("{}", settings.to_toml()?);
            if save {
                match config {
                    Some(path) => settings.save_to(path)?,
                    None => settings.save()?,
                }
                println!("Inställningarna sparade");
            }
        }
    }

    Ok(())
}

fn print_records(app: &TrackerApp) {
    let width = app.settings().preview_length;
    for p in app.records() {
        println!(
            "{:>5}  {}  {}\n       {}\n       {}",
            p.id,
            p.date,
            p.subject,
            p.problem_preview(width),
            p.solution_preview(width)
        );
    }
    print_status(app);
}

fn print_details(problem: &Problem) {
    println!("ID:      {}", problem.id);
    println!("Datum:   {}", problem.date);
    println!("Ämne:    {}", problem.subject);
    println!("\nProblem:\n{}", problem.problem);
    println!("\nLösning:\n{}", problem.solution);
}

fn print_status(app: &TrackerApp) {
    if let Some(status) = app.status() {
        println!("{}", status.text());
    }
}
