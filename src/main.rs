use analytics::{AnalyticsEngine, SummaryRecord};
use anyhow::Context;
use backtester::{Backtester, RunOutcome};
use clap::{Parser, Subcommand};
use comfy_table::{presets::UTF8_FULL, Table};
use configuration::{init_tracing, load_config_from, Config, LogFormat, Logging};
use core_types::VecLedger;
use database::{
    connect, export_run_csv, read_price_csv, read_sentiment_csv, run_migrations, DbRepository,
};
use rust_decimal::Decimal;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use uuid::Uuid;

/// The main entry point for the sentiment replay application.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // `.env` may carry DATABASE_URL and APP__ overrides; it is optional and
    // loaded once here, before the config and the pool read the environment.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Imports only need the logging section, so a missing config file is not
    // fatal until `run` asks for it.
    let config = load_config_from(&cli.config);
    let mut logging = config
        .as_ref()
        .map(|c| c.logging.clone())
        .unwrap_or_else(|_| Logging::default());
    if let Some(format) = cli.log_format {
        logging.format = format;
    }
    let _log_guard = init_tracing(&logging).context("Failed to initialise logging")?;

    let db_pool = connect().await.context("Failed to connect to the database")?;
    run_migrations(&db_pool)
        .await
        .context("Failed to run database migrations")?;
    let repo = DbRepository::new(db_pool);

    match cli.command {
        Commands::ImportSentiment(args) => handle_import_sentiment(args, &repo).await,
        Commands::ImportPrices(args) => handle_import_prices(args, &repo).await,
        Commands::Run(args) => {
            let config = config.with_context(|| {
                format!("Failed to load configuration from {}", cli.config.display())
            })?;
            handle_run(args, config, &repo).await
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Replays a sentiment-driven ETF trading rule over historical closes.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    /// Overrides the configured log format.
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a `Date,Fear_and_Greed_Index` CSV into the database.
    ImportSentiment(ImportSentimentArgs),
    /// Load the closes of a daily OHLC CSV into the database.
    ImportPrices(ImportPricesArgs),
    /// Replay the configured period and write the ledger and summary.
    Run(RunArgs),
}

#[derive(Parser)]
struct ImportSentimentArgs {
    /// The CSV file to import.
    #[arg(long)]
    file: PathBuf,
}

#[derive(Parser)]
struct ImportPricesArgs {
    /// The instrument the closes belong to (e.g., "00646.TW").
    #[arg(long)]
    symbol: String,

    /// The CSV file to import.
    #[arg(long)]
    file: PathBuf,
}

#[derive(Parser)]
struct RunArgs {
    /// Show a progress bar while walking the calendar.
    #[arg(long)]
    progress: bool,
}

// ==============================================================================
// Import Command Logic
// ==============================================================================

async fn handle_import_sentiment(args: ImportSentimentArgs, repo: &DbRepository) -> anyhow::Result<()> {
    let file = File::open(&args.file)
        .with_context(|| format!("Failed to open {}", args.file.display()))?;
    let readings = read_sentiment_csv(BufReader::new(file))
        .with_context(|| format!("Failed to parse {}", args.file.display()))?;

    let written = repo.save_sentiment_readings(&readings).await?;
    tracing::info!(file = %args.file.display(), parsed = readings.len(), written, "Sentiment import complete");
    println!("Imported {} sentiment readings from {}", readings.len(), args.file.display());
    Ok(())
}

async fn handle_import_prices(args: ImportPricesArgs, repo: &DbRepository) -> anyhow::Result<()> {
    let file = File::open(&args.file)
        .with_context(|| format!("Failed to open {}", args.file.display()))?;
    let closes = read_price_csv(BufReader::new(file))
        .with_context(|| format!("Failed to parse {}", args.file.display()))?;

    let written = repo.save_daily_closes(&args.symbol, &closes).await?;
    tracing::info!(symbol = %args.symbol, parsed = closes.len(), written, "Price import complete");
    println!("Imported {} closes for {} from {}", closes.len(), args.symbol, args.file.display());
    Ok(())
}

// ==============================================================================
// Run Command Logic
// ==============================================================================

async fn handle_run(args: RunArgs, config: Config, repo: &DbRepository) -> anyhow::Result<()> {
    let sim = &config.simulation;
    let run_id = Uuid::new_v4();

    let sentiment = repo.get_sentiment_series(sim.start_date, sim.end_date).await?;
    let prices = repo
        .get_price_series(&sim.instruments, sim.start_date, sim.end_date.max(sim.terminal_date))
        .await?;
    tracing::info!(%run_id, readings = sentiment.len(), closes = prices.len(), "Loaded market history");

    // Rows stay in memory until the run has been valued, so a failed
    // valuation leaves the append-only files untouched.
    let mut ledger = VecLedger::new();
    let outcome = Backtester::from_config(run_id, &config)?
        .with_progress(args.progress)
        .run(&sentiment, &prices, &mut ledger)?;
    let records = ledger.into_records();

    let terminal_prices = prices.closes_on(sim.terminal_date);
    let summary = AnalyticsEngine::new(sim.lot_size)
        .summarize(&outcome.portfolio, &terminal_prices, sim.starting_cash)
        .with_context(|| format!("Failed to mark the portfolio on {}", sim.terminal_date))?;

    let output = &config.output;
    let written = export_run_csv(
        &output.ledger_path,
        &output.summary_path,
        &records,
        &summary,
        output.locale,
    )?;

    if output.persist_to_database {
        repo.archive_run(run_id, &run_parameters(&config), &records, &summary)
            .await?;
        tracing::info!(%run_id, transactions = records.len(), "Run archived");
    }

    print_summary(run_id, &config, &outcome, &summary);
    println!(
        "{} ledger rows appended to {}, summary appended to {}",
        written,
        output.ledger_path.display(),
        output.summary_path.display()
    );
    Ok(())
}

fn run_parameters(config: &Config) -> serde_json::Value {
    let sim = &config.simulation;
    serde_json::json!({
        "starting_cash": sim.starting_cash,
        "instruments": sim.instruments,
        "start_date": sim.start_date.to_string(),
        "end_date": sim.end_date.to_string(),
        "terminal_date": sim.terminal_date.to_string(),
        "lot_size": sim.lot_size,
        "commission_rate": config.fees.commission_rate,
        "tax_rate": config.fees.tax_rate,
        "policy": {
            "extreme_fear_buy_lots": config.policy.extreme_fear_buy_lots,
            "fear_buy_lots": config.policy.fear_buy_lots,
            "greed_sell_lots": config.policy.greed_sell_lots,
            "extreme_greed_sell_lots": config.policy.extreme_greed_sell_lots,
        },
    })
}

fn money(value: Decimal) -> String {
    value.round_dp(2).to_string()
}

fn print_summary(run_id: Uuid, config: &Config, outcome: &RunOutcome, summary: &SummaryRecord) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["Metric", "Value"]);

    table.add_row(vec!["Run ID".to_string(), run_id.to_string()]);
    table.add_row(vec![
        "Dates traded / skipped".to_string(),
        format!("{} / {}", outcome.stats.dates_walked, outcome.stats.dates_skipped),
    ]);
    table.add_row(vec![
        "Trades / rejected buys".to_string(),
        format!("{} / {}", outcome.stats.trades_executed, outcome.stats.buys_rejected),
    ]);
    for instrument in &config.simulation.instruments {
        table.add_row(vec![
            format!("Lots held: {instrument}"),
            outcome.portfolio.holdings(instrument).to_string(),
        ]);
    }
    table.add_row(vec!["Cash".to_string(), money(summary.cash)]);
    table.add_row(vec!["Securities value".to_string(), money(summary.securities_value)]);
    table.add_row(vec!["Margin debt".to_string(), money(summary.margin_debt)]);
    table.add_row(vec!["Net assets".to_string(), money(summary.net_assets)]);
    table.add_row(vec!["Profit".to_string(), money(summary.profit)]);
    table.add_row(vec![
        "Return (%)".to_string(),
        summary.return_rate_pct.round_dp(4).to_string(),
    ]);
    table.add_row(vec![
        "Maintenance ratio".to_string(),
        summary
            .maintenance_ratio
            .map_or_else(|| "N/A".to_string(), |r| r.round_dp(4).to_string()),
    ]);

    println!("{table}");
}
