use anyhow::{bail, Context};
use bookstore_app::books::{models::BookFilters, service::CatalogService, store::BookStore};
use bookstore_kernel::settings::Settings;
use clap::{Parser, Subcommand};

/// Bookstore catalog service
#[derive(Debug, Parser)]
#[command(name = "bookstore", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve,
    /// Print the merged OpenAPI document
    Openapi,
    /// List books of the sample catalog as JSON
    Books {
        #[arg(long)]
        genre: Option<String>,
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        min_price: Option<f64>,
        #[arg(long)]
        max_price: Option<f64>,
    },
    /// Quote a genre-wide discount against the sample catalog
    Discount {
        #[arg(long)]
        genre: String,
        /// Percentage between 0 and 100
        #[arg(long, allow_negative_numbers = true)]
        discount: f64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load bookstore settings")?;
    bookstore_telemetry::init(&settings.telemetry)?;

    tracing::debug!(env = ?settings.environment, command = ?cli.command, "bookstore cli");

    match cli.command {
        Command::Serve => bookstore_app::bootstrap::run(&settings).await,
        Command::Openapi => {
            let registry = bookstore_app::bootstrap::build_registry(&settings);
            let document = bookstore_http::router::openapi_document(&registry);
            println!("{}", serde_json::to_string_pretty(&document)?);
            Ok(())
        }
        Command::Books {
            genre,
            author,
            title,
            min_price,
            max_price,
        } => {
            let catalog = CatalogService::new(BookStore::with_sample_books());
            let books = catalog.get_all_books(Some(BookFilters {
                genre,
                author,
                title,
                min_price,
                max_price,
            }));
            println!("{}", serde_json::to_string_pretty(&books)?);
            Ok(())
        }
        Command::Discount { genre, discount } => {
            if !(0.0..=100.0).contains(&discount) {
                bail!("discount must be between 0 and 100, got {discount}");
            }
            let catalog = CatalogService::new(BookStore::with_sample_books());
            let Some(result) = catalog.calculate_discounted_price_for_genre(&genre, discount)
            else {
                bail!("no books found for genre: {genre}");
            };
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
    }
}
