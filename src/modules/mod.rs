pub mod books;

use std::sync::Arc;

use bookstore_kernel::{settings::Settings, ModuleRegistry};

/// Register all project-specific modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, settings: &Settings) {
    registry.register(Arc::new(books::BooksModule::from_settings(&settings.catalog)));
}
