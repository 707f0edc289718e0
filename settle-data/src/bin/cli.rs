use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use settle_core::TrainerMonthKey;
use settle_data::{BonusRuleLoader, CommissionRateLoader, SettlementRunner};
use settle_db_sqlite::SqliteRepository;
use tracing_subscriber::EnvFilter;

/// Monthly trainer settlement tool.
///
/// Loads commission-rate and bonus-rule policies from CSV and computes
/// monthly settlements from recorded payments and sessions.
#[derive(Parser, Debug)]
#[command(name = "settle-cli")]
#[command(version, about, long_about = None)]
struct Args {
    /// SQLite database URL (e.g., sqlite:settlements.db?mode=rwc to create
    /// if missing)
    #[arg(short, long, default_value = "sqlite:settlements.db?mode=rwc")]
    database: String,

    /// Run database migrations before anything else
    #[arg(short, long, default_value_t = false)]
    migrate: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load policy tables from CSV files
    Load {
        /// CSV file with commission rate brackets
        #[arg(long)]
        rates: Option<PathBuf>,

        /// CSV file with bonus rules
        #[arg(long)]
        bonuses: Option<PathBuf>,
    },
    /// Compute the settlement for one trainer-month
    Settle {
        /// Trainer id
        #[arg(short, long)]
        trainer: i64,

        /// Settlement year
        #[arg(short, long)]
        year: i32,

        /// Settlement month (1-12)
        #[arg(short, long)]
        month: u32,

        /// Case-insensitive member-name filter for the revenue figure
        #[arg(long, default_value = "")]
        member: String,

        /// Persist the result as a monthly settlement snapshot
        #[arg(long, default_value_t = false)]
        save: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let repo = SqliteRepository::new(&args.database)
        .await
        .with_context(|| format!("Failed to connect to database: {}", args.database))?;

    if args.migrate {
        println!("Running migrations...");
        repo.run_migrations()
            .await
            .context("Failed to run migrations")?;
        println!("Migrations complete.");
    }

    match args.command {
        Command::Load { rates, bonuses } => {
            if rates.is_none() && bonuses.is_none() {
                anyhow::bail!("Nothing to load: pass --rates and/or --bonuses");
            }

            if let Some(path) = rates {
                let file = File::open(&path)
                    .with_context(|| format!("Failed to open: {}", path.display()))?;
                let records = CommissionRateLoader::parse(file)
                    .with_context(|| format!("Failed to parse CSV: {}", path.display()))?;
                let loaded = CommissionRateLoader::load(&repo, &records)
                    .await
                    .context("Failed to load commission rates into database")?;
                println!("Loaded {} commission rates.", loaded);
            }

            if let Some(path) = bonuses {
                let file = File::open(&path)
                    .with_context(|| format!("Failed to open: {}", path.display()))?;
                let records = BonusRuleLoader::parse(file)
                    .with_context(|| format!("Failed to parse CSV: {}", path.display()))?;
                let loaded = BonusRuleLoader::load(&repo, &records)
                    .await
                    .context("Failed to load bonus rules into database")?;
                println!("Loaded {} bonus rules.", loaded);
            }
        }
        Command::Settle {
            trainer,
            year,
            month,
            member,
            save,
        } => {
            let key = TrainerMonthKey::new(trainer, year, month)
                .with_context(|| format!("Invalid settlement month: {year}-{month}"))?;
            let runner = SettlementRunner::new(&repo);

            let result = if save {
                let (result, saved) = runner
                    .settle_and_save(&key, &member)
                    .await
                    .context("Failed to compute settlement")?;
                println!("Saved settlement #{}.", saved.id);
                result
            } else {
                runner
                    .settle(&key, &member)
                    .await
                    .context("Failed to compute settlement")?
            };

            println!("Settlement for trainer {trainer}, {year}-{month:02}");
            println!("  total revenue:        {}", result.total_revenue);
            println!("  carryover:            {}", result.carryover_amount);
            println!("  revenue + carryover:  {}", result.total_revenue_with_carryover);
            println!("  session revenue:      {}", result.session_revenue);
            println!("  team PT revenue:      {}", result.team_pt_revenue);
            println!("  team PT incentive:    {}", result.team_pt_incentive);
            println!("  gross salary:         {}", result.gross_salary);
            println!("  withholding tax:      {}", result.withholding_tax);
            println!("  net salary:           {}", result.net_salary);
        }
    }

    Ok(())
}
