//! pricescout — sold-listing price estimator
//!
//! Samples completed listings for a search term and reports a cleaned
//! average plus summary statistics.

use clap::{Parser, Subcommand};
use pricescout::{
    cleaning::CleaningConfig,
    client::HttpSession,
    config::Config,
    discover::LinkDiscoverer,
    error::ScoutError,
    estimator::{Estimate, Estimator},
    fetch::Progress,
};
use std::io::Write;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "pricescout")]
#[command(about = "Estimates the typical recent sale price of an item on an auction marketplace")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path (built-in defaults when omitted)
    #[arg(short, long)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate the typical sold price for a search term
    Estimate {
        /// Search term (prompted on stdin when omitted)
        search: Option<String>,
        /// Completed listings to sample (the marketplace honors 25/50/100/200)
        #[arg(short = 'n', long, default_value = "100")]
        samples: usize,
        /// Prior expectation of the price; enables the band filter
        #[arg(long)]
        expected_price: Option<f64>,
        /// Band around the expected price, as a fraction of it
        #[arg(long)]
        band: Option<f64>,
        /// Z-score threshold for outlier removal
        #[arg(long)]
        z_threshold: Option<f64>,
        /// Maximum concurrent listing fetches
        #[arg(long)]
        concurrency: Option<usize>,
        /// Emit the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the listing links a search discovers (no price fetches)
    Links {
        search: String,
        #[arg(short = 'n', long, default_value = "100")]
        samples: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?,
    };

    match cli.command {
        Commands::Estimate {
            search,
            samples,
            expected_price,
            band,
            z_threshold,
            concurrency,
            json,
        } => {
            run_estimate(
                config,
                search,
                samples,
                expected_price,
                band,
                z_threshold,
                concurrency,
                json,
            )
            .await
        }
        Commands::Links { search, samples } => show_links(config, &search, samples).await,
    }
}

#[allow(clippy::too_many_arguments)]
async fn run_estimate(
    mut config: Config,
    search: Option<String>,
    samples: usize,
    expected_price: Option<f64>,
    band: Option<f64>,
    z_threshold: Option<f64>,
    concurrency: Option<usize>,
    json: bool,
) -> anyhow::Result<()> {
    if let Some(limit) = concurrency {
        config.scraper.concurrency = limit;
    }

    let search = match search {
        Some(term) => term,
        None => prompt("Enter search term: ")?,
    };

    let thresholds = CleaningConfig {
        expected_price: expected_price.or(config.cleaning.expected_price),
        expected_price_band: band.unwrap_or(config.cleaning.expected_price_band),
        z_threshold: z_threshold.unwrap_or(config.cleaning.z_threshold),
    };

    let estimator = Estimator::new(&config)?;

    // Progress line, updated once per completed fetch.
    let (progress_tx, mut progress_rx) = tokio::sync::mpsc::channel::<Progress>(64);
    let printer = tokio::spawn(async move {
        let mut printed = false;
        while let Some(progress) = progress_rx.recv().await {
            print!("\rFetched {}/{} listings", progress.completed, progress.total);
            let _ = std::io::stdout().flush();
            printed = true;
        }
        if printed {
            println!();
        }
    });

    let result = estimator
        .estimate_with_progress(&search, samples, &thresholds, Some(progress_tx))
        .await;
    let _ = printer.await;

    match result {
        Ok(estimate) if json => println!("{}", serde_json::to_string_pretty(&estimate)?),
        Ok(estimate) => render_estimate(&search, samples, &estimate),
        Err(ScoutError::EmptyAfterCleaning { requested }) => {
            println!(
                "No usable prices among the {} sampled listings for '{}'. \
                 Try a broader search term or looser thresholds.",
                requested, search
            );
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}

fn render_estimate(search: &str, samples: usize, estimate: &Estimate) {
    let report = &estimate.report;

    println!(
        "\nThe average price of the last {} sales of '{}' is",
        samples, search
    );
    println!(
        "${:.2} ({} outliers removed)\n",
        report.mean, estimate.statistical_outliers
    );

    println!("{:<12} {:>12}", "metric", "value");
    println!("{}", "-".repeat(25));
    println!("{:<12} {:>12.2}", "mean", report.mean);
    println!("{:<12} {:>12.2}", "median", report.median);
    println!("{:<12} {:>12.2}", "p25", report.p25);
    println!("{:<12} {:>12.2}", "p75", report.p75);
    println!("{:<12} {:>12.2}", "std dev", report.std_dev);
    println!("{:<12} {:>12}", "requested", report.requested);
    println!("{:<12} {:>12}", "used", report.used);

    if estimate.failures > 0 || estimate.expected_price_rejects > 0 {
        println!(
            "\nRemoved: {} failed fetches, {} outside the expected band, {} statistical outliers",
            estimate.failures, estimate.expected_price_rejects, estimate.statistical_outliers
        );
    }
}

async fn show_links(config: Config, search: &str, samples: usize) -> anyhow::Result<()> {
    let session = HttpSession::new(&config.scraper)?;
    let discoverer = LinkDiscoverer::new(config.marketplace.clone())?;

    let ids = discoverer.discover(&session, search, samples).await?;

    println!("\n{} unique completed listings for '{}':\n", ids.len(), search);
    for id in &ids {
        println!("  {}", id);
    }

    Ok(())
}

fn prompt(message: &str) -> anyhow::Result<String> {
    print!("{message}");
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    let term = line.trim().to_string();
    anyhow::ensure!(!term.is_empty(), "search term must not be empty");
    Ok(term)
}
