use clap::{Parser, Subcommand};

mod batch;

#[derive(Debug, Parser)]
#[command(name = "pricewatch")]
#[command(about = "Extract product details and check prices across retail sites")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch one product URL and print the extracted record.
    Check {
        url: String,
        /// Print the record as JSON instead of readable text.
        #[arg(long)]
        json: bool,
    },
    /// Check every URL in a file, one per line. Lines starting with `#`
    /// are skipped. Emits one JSON line per URL.
    Batch {
        file: std::path::PathBuf,
        /// Worker-pool size; defaults to PRICEWATCH_MAX_CONCURRENT_CHECKS.
        #[arg(long)]
        concurrency: Option<usize>,
        /// Alert threshold applied to every URL in the batch.
        #[arg(long)]
        target: Option<f64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = pricewatch_core::load_app_config()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.log_level.clone())),
        )
        .init();

    let client = pricewatch_scraper::HttpClient::new(&config.fetch)?;

    let cli = Cli::parse();
    match cli.command {
        Commands::Check { url, json } => {
            let record = pricewatch_scraper::fetch_product(&client, &url).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                println!("platform : {}", record.platform);
                println!("title    : {}", record.title);
                println!("price    : {}", record.price);
                println!("image    : {}", record.image_url);
            }
        }
        Commands::Batch {
            file,
            concurrency,
            target,
        } => {
            batch::run(&client, &config, &file, concurrency, target).await?;
        }
    }

    Ok(())
}
