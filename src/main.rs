mod db;
mod extract;
mod fetch;
mod normalize;
mod page;
mod teams;
mod years;

use std::time::Instant;

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

#[derive(Parser)]
#[command(name = "almanac_scraper", about = "Baseball Almanac yearly-page scraper")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Discover (year, url) pairs from the year menu
    Init,
    /// Fetch year pages, extract and normalize, full-refresh the two tables
    Run {
        /// First year to scrape
        #[arg(long, default_value_t = 2015)]
        from: i32,
        /// Last year to scrape
        #[arg(long, default_value_t = 2025)]
        to: i32,
        /// Max years to scrape (default: all in range)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Row counts and a per-team rollup
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => {
            let conn = db::connect()?;
            db::init_schema(&conn)?;
            let pairs = years::fetch_year_urls().await?;
            let inserted = db::insert_years(&conn, &pairs)?;
            println!("Inserted {} new years ({} total found)", inserted, pairs.len());
            Ok(())
        }
        Commands::Run { from, to, limit } => run_pipeline(from, to, limit).await,
        Commands::Stats => {
            let conn = db::connect()?;
            db::init_schema(&conn)?;
            let s = db::get_stats(&conn)?;
            println!("Years known:  {}", s.years);
            println!("Events:       {} ({} years)", s.events, s.event_years);
            println!("Statistics:   {} ({} years)", s.statistics, s.stat_years);

            let rollup = db::team_rollup(&conn)?;
            if !rollup.is_empty() {
                println!("\n--- Statistics by team ---");
                for (team, count) in rollup {
                    println!("{:<24} {:>6}", team, count);
                }
            }
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

async fn run_pipeline(from: i32, to: i32, limit: Option<usize>) -> anyhow::Result<()> {
    let conn = db::connect()?;
    db::init_schema(&conn)?;

    let targets = db::years_between(&conn, from, to, limit)?;
    if targets.is_empty() {
        anyhow::bail!("No years in range {}-{}. Run 'init' first.", from, to);
    }

    // Phase 1: fetch + extract, one year at a time. A failed year only
    // warns; its rows are simply absent from the accumulated sets.
    println!("Scraping {} year pages...", targets.len());
    let spider = fetch::client()?;

    let pb = ProgressBar::new(targets.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")?
            .progress_chars("=> "),
    );

    let mut fetched = Vec::new();
    for (i, (year, url)) in targets.iter().enumerate() {
        if i > 0 {
            fetch::polite_pause().await;
        }
        fetched.push((*year, fetch::fetch_rendered(&spider, url).await));
        pb.inc(1);
    }
    pb.finish_and_clear();

    let (raw_events, raw_tables) = extract::accumulate(fetched);
    println!("Extracted {} raw events, {} raw tables.", raw_events.len(), raw_tables.len());

    // Phase 2: normalize the accumulated sets in one batch each.
    let raw_event_count = raw_events.len();
    let (events, event_tally) = normalize::events::normalize(raw_events);
    event_tally.log("events");
    println!("Events: {} raw -> {} clean", raw_event_count, events.len());

    let raw_row_count: usize = raw_tables.iter().map(|t| t.rows.len()).sum();
    let (stats, stat_tally) = normalize::stats::normalize(raw_tables);
    stat_tally.log("statistics");
    println!("Statistics: {} raw rows -> {} clean", raw_row_count, stats.len());

    // Phase 3: full refresh. A sink failure here is fatal and leaves the
    // previous run's tables untouched.
    db::replace_events(&conn, &events)?;
    db::replace_statistics(&conn, &stats)?;
    println!("Saved {} events, {} statistics.", events.len(), stats.len());

    Ok(())
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
