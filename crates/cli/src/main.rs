use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::{DataIndex, ItemId, UserId};
use recommender::{DEFAULT_K, ItemModel, Recommendation};
use server::{Query, QueryResponse, QueryService};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::info;

/// steam-recs - Steam catalog analytics and item-to-item recommendations
#[derive(Parser)]
#[command(name = "steam-recs")]
#[command(about = "Steam game analytics and playtime-based recommendations", long_about = None)]
struct Cli {
    /// Directory holding steam_games.jsonl, user_reviews.jsonl and users_items.jsonl
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,

    /// Precomputed item model (see `build-model`); fitted at startup when absent
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// Print raw JSON instead of formatted output
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Per-year game count and free-to-play share for a developer
    Developer {
        /// Developer name (exact match)
        name: String,
    },

    /// Playtime and review summary for a user
    User {
        /// User ID
        user_id: UserId,
    },

    /// User with the most playtime in a genre, and its per-year breakdown
    Genre {
        /// Genre (case-insensitive substring match)
        genre: String,
    },

    /// Top 3 developers by positive recommendations for a release year
    BestDeveloperYear {
        /// Release year
        year: u16,
    },

    /// Sentiment breakdown of reviews for a developer's games
    DeveloperReviews {
        /// Developer name (exact match)
        name: String,
    },

    /// Games similar to a given game, by shared playtime
    Recommend {
        /// Steam app id of the query game
        item_id: ItemId,

        /// Number of recommendations to return
        #[arg(long, default_value_t = DEFAULT_K)]
        k: usize,
    },

    /// Fit the item model and save it for later runs
    BuildModel {
        /// Output path for the model snapshot
        #[arg(long, default_value = "item_model.json")]
        out: PathBuf,
    },

    /// Run concurrent recommend requests and report latency
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Number of concurrent requests
        #[arg(long, default_value = "10")]
        concurrent: usize,

        /// Recommendations per request
        #[arg(long, default_value_t = DEFAULT_K)]
        k: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so --json output stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let query = match cli.command {
        Commands::Developer { name } => Query::DeveloperInfo(name),
        Commands::User { user_id } => Query::UserData(user_id),
        Commands::Genre { genre } => Query::UserForGenre(genre),
        Commands::BestDeveloperYear { year } => Query::BestDeveloperYear(year),
        Commands::DeveloperReviews { name } => Query::DeveloperReviews(name),
        Commands::Recommend { item_id, k } => Query::Recommend { item_id, k: Some(k) },
        Commands::BuildModel { out } => return handle_build_model(&cli.data_dir, &out),
        Commands::Benchmark {
            requests,
            concurrent,
            k,
        } => {
            let service = load_service(&cli.data_dir, cli.model.as_deref())?;
            return handle_benchmark(service, requests, concurrent, k).await;
        }
    };

    let service = load_service(&cli.data_dir, cli.model.as_deref())?;
    let response = service.execute(query).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print_response(&response);
    }
    Ok(())
}

/// Load the snapshot and fit (or load) the item model
fn load_service(data_dir: &Path, model: Option<&Path>) -> Result<QueryService> {
    eprintln!("Loading Steam snapshot from {}...", data_dir.display());
    let start = Instant::now();
    let service = QueryService::load(data_dir, model)?;
    let (games, reviews, library) = service.data_index().counts();
    eprintln!(
        "{} Loaded {} games, {} reviews, {} library entries in {:.2?}",
        "✓".green(),
        games,
        reviews,
        library,
        start.elapsed()
    );
    Ok(service)
}

/// Handle the 'build-model' command
fn handle_build_model(data_dir: &Path, out: &Path) -> Result<()> {
    let start = Instant::now();
    let data_index = DataIndex::load_from_files(data_dir).context("Failed to load Steam snapshot")?;
    let model = ItemModel::from_library(data_index.library());
    info!("Saving item model to {}", out.display());
    model
        .save(out)
        .with_context(|| format!("Failed to write model to {}", out.display()))?;

    println!(
        "{} Fitted {} items x {} users and saved to {} in {:.2?}",
        "✓".green(),
        model.labels().item_ids().len(),
        model.labels().user_ids().len(),
        out.display(),
        start.elapsed()
    );
    Ok(())
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    service: QueryService,
    requests: usize,
    concurrent: usize,
    k: usize,
) -> Result<()> {
    if requests == 0 || concurrent == 0 {
        bail!("--requests and --concurrent must both be positive");
    }

    // Draw query items from the ones the model knows, so every request
    // exercises the neighbor scan
    let candidates: Vec<ItemId> = service
        .recommender()
        .model()
        .labels()
        .item_ids()
        .to_vec();
    if candidates.is_empty() {
        bail!("No items with playtime data to benchmark against");
    }
    let item_ids: Vec<ItemId> = (0..requests)
        .map(|_| candidates[rand::random_range(0..candidates.len())])
        .collect();

    let limiter = Arc::new(Semaphore::new(concurrent));
    let start = Instant::now();

    let mut handles = Vec::with_capacity(requests);
    for item_id in item_ids {
        let service = service.clone();
        let limiter = limiter.clone();
        handles.push(tokio::spawn(async move {
            let _permit = limiter.acquire_owned().await?;
            let started = Instant::now();
            service.recommend(item_id, Some(k)).await?;
            Ok::<_, anyhow::Error>(started.elapsed())
        }));
    }

    let mut timings: Vec<Duration> = Vec::with_capacity(requests);
    for handle in handles {
        timings.push(handle.await??);
    }
    let wall_time = start.elapsed();

    timings.sort();
    let total: Duration = timings.iter().sum();
    let avg_latency = total / timings.len() as u32;
    let percentile = |p: f64| timings[((timings.len() as f64 * p) as usize).min(timings.len() - 1)];
    let throughput = requests as f64 / wall_time.as_secs_f64();

    println!("{}", "Benchmark results:".bold().blue());
    println!("  Requests:        {} ({} concurrent, k = {})", requests, concurrent, k);
    println!("  Total time:      {:.2?}", wall_time);
    println!("  Average latency: {:.2?}", avg_latency);
    println!("  P50 latency:     {:.2?}", percentile(0.50));
    println!("  P95 latency:     {:.2?}", percentile(0.95));
    println!("  P99 latency:     {:.2?}", percentile(0.99));
    println!("  Throughput:      {:.2} requests/second", throughput);

    Ok(())
}

/// Format and print one query result
fn print_response(response: &QueryResponse) {
    match response {
        QueryResponse::DeveloperInfo(years) => {
            println!("{}", "Games per release year:".bold().blue());
            if years.is_empty() {
                println!("  (no games)");
            }
            for y in years {
                println!(
                    "  {}  {} games, {:.1}% free",
                    y.year.to_string().green(),
                    y.game_count,
                    y.free_percentage
                );
            }
        }
        QueryResponse::UserData(summary) => {
            println!("{}", format!("User {}", summary.user_id).bold().blue());
            println!("{}Total playtime: {:.0} minutes", "• ".green(), summary.total_playtime);
            println!("{}Recommends: {:.1}%", "• ".green(), summary.recommend_percentage);
            println!("{}Games owned: {}", "• ".green(), summary.item_count);
        }
        QueryResponse::UserForGenre(leader) => {
            match &leader.top_user {
                Some(user) => println!("{} {}", "Top player:".bold().blue(), user),
                None => println!("{}", "No playtime recorded for this genre".yellow()),
            }
            for yp in &leader.playtime_by_year {
                println!("  {}  {:.0} minutes", yp.year.to_string().green(), yp.playtime);
            }
        }
        QueryResponse::BestDeveloperYear(ranking) => {
            println!("{}", "Top developers:".bold().blue());
            if ranking.is_empty() {
                println!("  (no recommended games that year)");
            }
            for (rank, d) in ranking.iter().enumerate() {
                println!(
                    "  {}. {} ({} positive recommendations)",
                    (rank + 1).to_string().green(),
                    d.developer,
                    d.positive_recommendations
                );
            }
        }
        QueryResponse::DeveloperReviews(sentiment) => {
            println!("{}", sentiment.developer.bold().blue());
            println!("  {} {}", "Negative:".red(), sentiment.counts.negative);
            println!("  {} {}", "Neutral: ".yellow(), sentiment.counts.neutral);
            println!("  {} {}", "Positive:".green(), sentiment.counts.positive);
        }
        QueryResponse::Recommend(recommendation) => print_recommendation(recommendation),
    }
}

fn print_recommendation(recommendation: &Recommendation) {
    match recommendation {
        Recommendation::Found(items) => {
            println!("{}", "Recommended games:".bold().blue());
            if items.is_empty() {
                println!("  (no other games with playtime data)");
            }
            for (rank, item) in items.iter().enumerate() {
                println!(
                    "  {}. {} [{}]",
                    (rank + 1).to_string().green(),
                    item.name,
                    item.item_id
                );
            }
        }
        Recommendation::NotFound => println!("{}", "Game not found in the catalog".yellow()),
        Recommendation::NoPlaytimeData => {
            println!("{}", "No playtime data for this game".yellow())
        }
    }
}
