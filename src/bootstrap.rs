//! Wiring of modules, lifecycle, and the HTTP server.

use anyhow::Context;
use axum::Router;
use bookstore_kernel::{settings::Settings, InitCtx, ModuleRegistry};

use crate::modules;

/// Registry holding every project module, configured from `settings`.
pub fn build_registry(settings: &Settings) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, settings);
    registry
}

/// Full application router, as served by [`run`].
pub fn build_app(settings: &Settings) -> Router {
    let registry = build_registry(settings);
    bookstore_http::build_router(&registry, settings)
}

/// Initialize and start every module, serve HTTP until shutdown, then stop
/// the modules in reverse order.
pub async fn run(settings: &Settings) -> anyhow::Result<()> {
    let registry = build_registry(settings);
    let ctx = InitCtx { settings };

    registry
        .init_modules(&ctx)
        .await
        .context("module initialization failed")?;
    registry
        .start_modules(&ctx)
        .await
        .context("module startup failed")?;

    let served = bookstore_http::start_server(&registry, settings).await;

    registry
        .stop_modules()
        .await
        .context("module shutdown failed")?;

    served
}
