//! repchat - Conversational workout logger

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use repchat::chat;
use repchat::db::{WorkoutStore, open_store, save_json};
use repchat::progress::{OneRepMaxTrend, ProgressMetrics, exercise_names, exercise_progress};
use repchat::split::{Planner, classify, suggest_from_history};
use repchat::tui::App;
use repchat::workout::Workout;

#[derive(Parser)]
#[command(name = "repchat")]
#[command(author, version, about = "Conversational workout logger")]
struct Cli {
    /// SQLite database path, or ":memory:" for a throwaway store
    #[arg(long, global = true, env = "REPCHAT_DB", default_value = "repchat.db")]
    db: String,

    /// Owner id for stored workouts
    #[arg(long, global = true, env = "REPCHAT_USER", default_value = "local")]
    user: String,

    /// Classified workouts needed before suggesting the next one
    #[arg(long, global = true, env = "REPCHAT_MIN_HISTORY", default_value = "3")]
    min_history: usize,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open TUI dashboard
    Tui,

    /// Reply to a message without saving anything
    Chat {
        /// e.g. "I did bench press 5x5 at 225lbs today"
        message: String,
    },

    /// Interpret a message and save it as a workout
    Log {
        message: String,
    },

    /// Save a structured workout from JSON (per-set weight, reps, rpe)
    Add {
        /// JSON file; reads stdin when omitted or "-"
        file: Option<PathBuf>,
    },

    /// List workout history
    List {
        /// Number of records to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Show one stored workout
    Show {
        id: i64,
    },

    /// Suggest the next workout split
    Next,

    /// Show progress for an exercise
    Progress {
        /// Exercise name as stored (e.g. "Bench Press")
        exercise: String,
    },

    /// Start Telegram bot
    Bot {
        /// Telegram bot token (or set TELOXIDE_TOKEN env var)
        #[arg(short, long, env = "TELOXIDE_TOKEN")]
        token: String,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let planner = Planner::new(cli.min_history);

    match cli.command {
        Some(Commands::Chat { message }) => {
            let reply = chat::respond(&message);
            if cli.json {
                print_json(&reply.workout)?;
            } else {
                println!("{}", reply.text);
                if let Some(kcal) = reply.calories {
                    println!("\nEstimated burn: ~{} kcal", kcal);
                }
            }
        }

        Some(Commands::Log { message }) => {
            let workout = repchat::interpret(&message);
            let mut db = open_store(&cli.db)?;
            let id = db.save(&cli.user, &workout)?;
            info!("Logged workout {} for {}", id, cli.user);

            if cli.json {
                let record = db
                    .get_by_id(id)?
                    .with_context(|| format!("workout {} missing right after save", id))?;
                print_json(&record)?;
            } else {
                let split = classify(&workout)
                    .map(|s| s.label())
                    .unwrap_or("unclassified");
                println!("Logged workout #{} ({})", id, split);
                println!("{}", chat::format_workout(&workout));
            }
        }

        Some(Commands::Add { file }) => {
            let json = match file.filter(|f| f.as_os_str() != "-") {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };

            let mut db = open_store(&cli.db)?;
            let id = save_json(db.as_mut(), &cli.user, &json)?;
            info!("Added workout {} for {}", id, cli.user);

            let record = db
                .get_by_id(id)?
                .with_context(|| format!("workout {} missing right after save", id))?;
            if cli.json {
                print_json(&record)?;
            } else {
                println!("Added workout #{}", id);
                println!("{}", chat::format_workout(&record.workout));
            }
        }

        Some(Commands::List { limit }) => {
            let db = open_store(&cli.db)?;
            let records: Vec<_> = db.list(&cli.user)?.into_iter().take(limit).collect();

            if cli.json {
                print_json(&records)?;
            } else {
                println!("Recent workouts:");
                println!("{:-<70}", "");
                for r in &records {
                    let split = classify(&r.workout).map(|s| s.label()).unwrap_or("-");
                    let names: Vec<&str> = r.workout.exercises().iter().map(|e| e.name()).collect();
                    println!(
                        "#{:<4} | {} | {:10} | {}",
                        r.id,
                        r.date.format("%Y-%m-%d %H:%M"),
                        split,
                        names.join(", ")
                    );
                }
            }
        }

        Some(Commands::Show { id }) => {
            let db = open_store(&cli.db)?;
            let Some(record) = db.get_by_id(id)? else {
                bail!("no workout with id {}", id);
            };

            if cli.json {
                print_json(&record)?;
            } else {
                println!("Workout #{} - {}", record.id, record.date.format("%Y-%m-%d %H:%M"));
                if let Some(split) = classify(&record.workout) {
                    println!("Split: {} {}", split.emoji(), split);
                }
                println!("{}", chat::format_workout(&record.workout));
                if !record.workout.notes().is_empty() {
                    println!("Notes: {}", record.workout.notes());
                }
            }
        }

        Some(Commands::Next) => {
            let db = open_store(&cli.db)?;
            let workouts: Vec<Workout> = db
                .list(&cli.user)?
                .into_iter()
                .map(|r| r.workout)
                .collect();
            let next = suggest_from_history(&planner, &workouts);

            if cli.json {
                print_json(&next)?;
            } else {
                match next {
                    Some(split) => println!("Next up: {} {} day", split.emoji(), split),
                    None => println!("Log a couple more workouts and I'll suggest what's next."),
                }
            }
        }

        Some(Commands::Progress { exercise }) => {
            let db = open_store(&cli.db)?;
            let records = db.list(&cli.user)?;
            let points = exercise_progress(&records, &exercise);

            if points.is_empty() {
                let known = exercise_names(&records);
                if known.is_empty() {
                    bail!("no workouts logged yet");
                }
                bail!("no sessions of '{}'. Known exercises: {}", exercise, known.join(", "));
            }

            if cli.json {
                print_json(&points)?;
            } else {
                println!("{} progress", exercise);
                println!("{:-<40}", "");
                for p in &points {
                    println!(
                        "{} | est. 1RM {:>7.1} | volume {:>8.0}",
                        p.date.format("%Y-%m-%d"),
                        p.estimated_one_rep_max,
                        p.volume()
                    );
                }
                if let Some(metrics) = ProgressMetrics::from_points(&points) {
                    println!("\n{}", metrics.format());
                }
                if let Some(trend) = OneRepMaxTrend::train(&points) {
                    println!("\n{}", trend.format());
                }
            }
        }

        Some(Commands::Bot { token }) => {
            println!("Starting Telegram bot...");
            println!("Database: {}", cli.db);
            repchat::bot::run_bot(token, &cli.db, planner).await?;
        }

        Some(Commands::Tui) | None => {
            // Default: show TUI
            let db = open_store(&cli.db)?;
            let mut app = App::new(db, cli.user, planner)?;
            app.run()?;
        }
    }

    Ok(())
}
