use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use suburb_scout::analysis::{report, SuburbAnalyzer, YieldAssumptions};
use suburb_scout::crawler::SuburbCrawler;
use suburb_scout::models::{ListingType, PropertyListing};
use suburb_scout::scrapers::{
    BrowserEngine, ChromeEngine, CrawlConfig, CrawlMode, HttpEngine, SearchTarget,
};
use suburb_scout::store::ListingStore;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Suburb Scout - rental and sales listings, yields and comparisons")]
struct Cli {
    /// Directory holding the scraped listing batches
    #[clap(long, global = true, default_value = "data")]
    data_dir: PathBuf,

    /// JSON file overriding the yield expense ratios
    #[clap(long, global = true)]
    assumptions: Option<PathBuf>,

    /// Log at debug level (RUST_LOG takes precedence)
    #[clap(short, long, global = true)]
    verbose: bool,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scrape rental and sales listings for a suburb
    Scrape {
        /// Suburb name (e.g. kenilworth)
        location: String,

        #[clap(long, default_value = "cape-town")]
        city: String,

        /// Province
        #[clap(long, alias = "province", default_value = "western-cape")]
        region: String,

        /// Max result pages in fast mode
        #[clap(long, default_value = "3")]
        pages: usize,

        /// Max listings to visit in detailed mode
        #[clap(long, default_value = "20")]
        max_listings: usize,

        /// Visit each listing page (slower, full fields, priced listings only)
        #[clap(short, long)]
        detailed: bool,

        /// Show the browser window
        #[clap(long)]
        show_browser: bool,

        #[clap(long, value_enum, default_value = "chrome")]
        engine: Engine,

        /// Override the listing site root
        #[clap(long)]
        base_url: Option<String>,
    },

    /// Analyze scraped data for a suburb
    Analyze {
        location: String,

        /// Show the step-by-step yield breakdown
        #[clap(short = 'd', long)]
        breakdown: bool,
    },

    /// Compare several suburbs side by side
    Compare {
        #[clap(required = true)]
        locations: Vec<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Engine {
    /// Headless Chrome
    Chrome,
    /// Plain HTTP, server-rendered markup only
    Http,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let assumptions = match &cli.assumptions {
        Some(path) => YieldAssumptions::from_file(path)?,
        None => YieldAssumptions::default(),
    };
    let store = ListingStore::new(cli.data_dir.clone());

    match cli.command {
        Command::Scrape {
            location,
            city,
            region,
            pages,
            max_listings,
            detailed,
            show_browser,
            engine,
            base_url,
        } => {
            let mut builder = CrawlConfig::builder();
            if let Some(base_url) = base_url {
                builder = builder.base_url(base_url);
            }
            let config = builder.build();

            let engine: Box<dyn BrowserEngine> = match engine {
                Engine::Chrome => Box::new(ChromeEngine::launch(&config, show_browser)?),
                Engine::Http => Box::new(HttpEngine::new(&config)?),
            };
            let mode = if detailed {
                CrawlMode::Detailed { max_listings }
            } else {
                CrawlMode::Fast { max_pages: pages }
            };
            let target = SearchTarget::new(location)
                .with_city(city)
                .with_region(region);

            scrape(engine, config, &store, &target, mode).await
        }
        Command::Analyze {
            location,
            breakdown,
        } => {
            let analyzer = SuburbAnalyzer::new(store, assumptions);
            let metrics = analyzer.analyze(&location).await?;

            println!("{}", report::market_report(&metrics));
            if breakdown {
                println!("\n");
                println!("{}", report::yield_breakdown(&metrics, analyzer.assumptions()));
            }
            Ok(())
        }
        Command::Compare { locations } => {
            let analyzer = SuburbAnalyzer::new(store, assumptions);
            let all_metrics = analyzer.compare(&locations).await?;

            println!();
            print!("{}", report::comparison_table(&all_metrics));
            Ok(())
        }
    }
}

async fn scrape(
    engine: Box<dyn BrowserEngine>,
    config: CrawlConfig,
    store: &ListingStore,
    target: &SearchTarget,
    mode: CrawlMode,
) -> Result<()> {
    info!("🏠 Scraping {}", target.location);
    info!("  City: {}", target.city);
    info!("  Region: {}", target.region);
    info!("  Mode: {}", mode.describe());

    let crawler = SuburbCrawler::new(engine, config)?;

    info!("Fetching rentals...");
    let rentals = crawl_and_save(&crawler, store, target, ListingType::Rent, mode).await?;

    info!("Fetching sales...");
    let sales = crawl_and_save(&crawler, store, target, ListingType::Sale, mode).await?;

    println!(
        "\n✅ Done! Found {} rentals and {} sales listings.\n",
        rentals.len(),
        sales.len()
    );
    println!("{}", report::crawl_summary("Rental", &rentals));
    println!();
    println!("{}", report::crawl_summary("Sales", &sales));

    Ok(())
}

/// A failed crawl is reported and counted as empty so the other listing
/// type still runs and the summary still prints
async fn crawl_and_save(
    crawler: &SuburbCrawler,
    store: &ListingStore,
    target: &SearchTarget,
    listing_type: ListingType,
    mode: CrawlMode,
) -> Result<Vec<PropertyListing>> {
    let listings = match crawler.crawl(target, listing_type, mode).await {
        Ok(listings) => listings,
        Err(e) => {
            warn!("{} crawl for {} failed: {}", listing_type, target.location, e);
            Vec::new()
        }
    };
    store.save(&target.location, listing_type, &listings).await?;
    Ok(listings)
}
