use anyhow::Context;
use bookstore_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load bookstore settings")?;
    bookstore_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        address = %settings.server.bind_address(),
        seeded = settings.catalog.seed_sample_books,
        "bookstore-server bootstrap starting"
    );

    bookstore_app::bootstrap::run(&settings).await?;

    tracing::info!("bookstore-server shut down");
    Ok(())
}
