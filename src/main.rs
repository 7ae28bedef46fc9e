use std::path::PathBuf;

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;

mod badges;
mod breed_match;
mod db;
mod models;
mod report;
mod streak;

#[derive(Parser)]
#[command(name = "pawtrainer-badges")]
#[command(about = "Training streak and badge engine for PawTrainer dog profiles", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Load the badge catalog and realistic seed data
    Seed,
    /// Import training sessions from a CSV file
    Import {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Show the current consecutive-day training streak for a dog
    Streak {
        /// Dog name or owner email
        #[arg(long)]
        dog: String,
        /// Calendar date to treat as today (defaults to the current UTC date)
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Evaluate badge rules and persist newly earned badges
    Award {
        #[arg(long)]
        dog: String,
        #[arg(long)]
        today: Option<NaiveDate>,
        /// Print candidates without persisting anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Generate a markdown training-progress report
    Report {
        #[arg(long)]
        dog: String,
        #[arg(long)]
        today: Option<NaiveDate>,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// Rank breeds against owner quiz answers from a JSON file
    MatchBreeds {
        #[arg(long)]
        answers: PathBuf,
        #[arg(long, default_value_t = 5)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let database_url = std::env::var("DATABASE_URL")
        .context("DATABASE_URL must be set to a production Postgres instance")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("failed to connect to Postgres")?;

    match cli.command {
        Commands::InitDb => {
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            db::seed(&pool).await?;
            println!("Seed data inserted.");
        }
        Commands::Import { csv } => {
            let inserted = db::import_csv(&pool, &csv).await?;
            println!("Inserted {inserted} sessions from {}.", csv.display());
        }
        Commands::Streak { dog, today } => {
            let today = today.unwrap_or_else(|| Utc::now().date_naive());
            let dog = db::fetch_dog(&pool, &dog).await?;
            let sessions = db::fetch_sessions(&pool, dog.id).await?;
            let days = streak::consecutive_days(&sessions, today);
            println!("{} has trained {days} consecutive days.", dog.name);
        }
        Commands::Award { dog, today, dry_run } => {
            let today = today.unwrap_or_else(|| Utc::now().date_naive());
            let dog = db::fetch_dog(&pool, &dog).await?;
            let catalog = db::fetch_badge_catalog(&pool).await?;
            let held = db::fetch_held_badge_ids(&pool, dog.id).await?;
            let sessions = db::fetch_sessions(&pool, dog.id).await?;
            let earned = badges::evaluate_new_badges(&catalog, &held, &sessions, today);

            if earned.is_empty() {
                println!("No new badges for {}.", dog.name);
                return Ok(());
            }

            for badge in earned.iter() {
                if dry_run {
                    println!("Would award: {} (id {})", badge.name, badge.id);
                } else if db::insert_awarded_badge(&pool, dog.id, badge.id).await? {
                    println!("Awarded: {} (id {})", badge.name, badge.id);
                } else {
                    println!("Already held (skipped): {} (id {})", badge.name, badge.id);
                }
            }
        }
        Commands::Report { dog, today, out } => {
            let today = today.unwrap_or_else(|| Utc::now().date_naive());
            let dog = db::fetch_dog(&pool, &dog).await?;
            let sessions = db::fetch_sessions(&pool, dog.id).await?;
            let catalog = db::fetch_badge_catalog(&pool).await?;
            let awarded = db::fetch_awarded_badges(&pool, dog.id).await?;
            let report = report::build_report(&dog, &sessions, &catalog, &awarded, today);
            std::fs::write(&out, report)?;
            println!("Report written to {}.", out.display());
        }
        Commands::MatchBreeds { answers, limit } => {
            let raw = std::fs::read_to_string(&answers)
                .with_context(|| format!("failed to read {}", answers.display()))?;
            let answers: models::QuizAnswers =
                serde_json::from_str(&raw).context("invalid quiz answers JSON")?;
            let breeds = db::fetch_breeds(&pool).await?;
            let matches = breed_match::score_breeds(&breeds, &answers);

            if matches.is_empty() {
                println!("No breeds in the catalog. Run seed first.");
                return Ok(());
            }

            println!("Best breed matches:");
            for candidate in matches.iter().take(limit) {
                println!(
                    "- {} / {} ({}) score {:.1}",
                    candidate.name_ko, candidate.name_en, candidate.size_type, candidate.match_score
                );
            }
        }
    }

    Ok(())
}
