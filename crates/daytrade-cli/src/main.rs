//! Day-trade analytics CLI
//!
//! Fetches recent price history for a ticker, prints the table and
//! moving averages, and asks the remote agent for an analyst/news
//! summary. A failed agent call degrades to data-only output.
//!
//! # Usage
//!
//! ```bash
//! export DATA_PROVIDER=yfinance          # or alpha_vantage
//! export ALPHA_VANTAGE_API_KEY=...       # only for alpha_vantage
//! export GROQ_API_KEY=...                # optional, enables the AI summary
//!
//! daytrade MSFT --period 6mo
//! daytrade AAPL --period 1y --json > dashboard.json
//! ```

use anyhow::Context;
use clap::Parser;
use comfy_table::{Table, presets::UTF8_FULL};
use daytrade_agent::{GroqClient, strip_tool_chatter};
use daytrade_analytics::chart::{ChartSet, DEFAULT_MA_WINDOW};
use daytrade_analytics::moving_averages;
use daytrade_data::{FetchConfig, FetchError, MarketDataFetcher, Period, PriceSeries};

#[derive(Parser, Debug)]
#[command(name = "daytrade")]
#[command(about = "Real-time day-trade analytics with AI summaries", long_about = None)]
struct Args {
    /// Ticker symbol to analyze (e.g. MSFT, TSLA, AMZN, GOOG)
    ticker: String,

    /// Lookback period: 1d 5d 1mo 3mo 6mo 1y 2y 5y 10y ytd max
    #[arg(short, long, default_value = "6mo")]
    period: Period,

    /// Skip the AI summary
    #[arg(long)]
    no_ai: bool,

    /// Emit the dashboard chart payload as JSON instead of tables
    #[arg(long)]
    json: bool,

    /// Number of recent rows to print
    #[arg(long, default_value_t = 10)]
    rows: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "warn,daytrade_data=info,daytrade_agent=info".to_string()),
        )
        .init();

    let args = Args::parse();

    let config = FetchConfig::from_env();
    let fetcher = MarketDataFetcher::new(config).context("Invalid fetcher configuration")?;

    let series = match fetcher.fetch(&args.ticker, args.period).await {
        Ok(series) => series,
        Err(err) => {
            eprintln!("Error: {err}");
            eprintln!("{}", advice(&err));
            std::process::exit(1);
        }
    };

    if args.json {
        let charts = ChartSet::from_series(&series)?;
        println!("{}", serde_json::to_string_pretty(&charts)?);
        return Ok(());
    }

    print_summary(&series, args.period);
    print_recent_bars(&series, args.rows)?;

    if !args.no_ai {
        print_ai_summary(&series.symbol).await;
    }

    Ok(())
}

/// Actionable hint for each failure kind
fn advice(err: &FetchError) -> &'static str {
    match err {
        FetchError::RateLimited { .. } => {
            "The data source is throttling requests. Wait 2-3 minutes before trying again; \
             recent results are cached for 5 minutes."
        }
        FetchError::NotFound { .. } | FetchError::Parse(_) => {
            "Check that the ticker symbol is correct and try again."
        }
        _ => "Please try again later.",
    }
}

fn print_summary(series: &PriceSeries, period: Period) {
    let latest = series.latest();
    let first_close = series.bars()[0].close;
    let change = (latest.close - first_close) / first_close * 100.0;

    println!(
        "\n{} — {} trading days ({} to {}, period {})",
        series.symbol,
        series.len(),
        series.first_date(),
        series.last_date(),
        period,
    );
    println!(
        "Last close {:.2} ({:+.2}% over the period)\n",
        latest.close, change
    );
}

fn print_recent_bars(series: &PriceSeries, rows: usize) -> anyhow::Result<()> {
    let points = moving_averages(series, DEFAULT_MA_WINDOW)?;

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        "Date", "Open", "High", "Low", "Close", "Volume", "SMA 20", "EMA 20",
    ]);

    let start = series.len().saturating_sub(rows);
    for (bar, point) in series.bars()[start..].iter().zip(&points[start..]) {
        table.add_row(vec![
            bar.date.to_string(),
            format!("{:.2}", bar.open),
            format!("{:.2}", bar.high),
            format!("{:.2}", bar.low),
            format!("{:.2}", bar.close),
            bar.volume.to_string(),
            point
                .sma
                .map_or_else(|| "-".to_string(), |v| format!("{v:.2}")),
            format!("{:.2}", point.ema),
        ]);
    }

    println!("{table}");
    Ok(())
}

/// Fetch and print the agent summary; failures never abort the analysis
async fn print_ai_summary(ticker: &str) {
    let client = match GroqClient::from_env() {
        Ok(client) => client,
        Err(err) => {
            tracing::info!(%err, "AI summary unavailable");
            eprintln!("\nAI summary skipped: {err}");
            return;
        }
    };

    println!("\nAI Analysis");
    println!("-----------");

    match client.summarize(ticker).await {
        Ok(raw) => println!("{}", strip_tool_chatter(&raw)),
        Err(err) => {
            eprintln!("Could not generate the AI analysis: {err}");
            eprintln!("The price data above is still valid.");
        }
    }
}
