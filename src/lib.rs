//! A personal recipe collection: collect, store, browse and filter
//! cooking recipes, entered by hand or scraped from a recipe URL.
//!
//! The interesting part is the scraper: a layered best-effort pipeline
//! that tries a curated per-site registry, then schema.org structured
//! data, then raw-markup heuristics, and reports plain success or
//! failure to the caller. See [`scrape::Scraper`].

pub mod config;
pub mod error;
pub mod filter;
pub mod model;
pub mod scrape;
pub mod store;

pub use config::AppConfig;
pub use error::{ScrapeError, StoreError};
pub use model::Recipe;
pub use scrape::Scraper;
pub use store::{open_store, RecipePatch, RecipeStore};

/// Extract a recipe from a URL with default configuration.
///
/// `None` means extraction failed; the reasons are logged for the
/// operator, never surfaced to the caller.
pub fn extract(url: &str) -> Option<Recipe> {
    Scraper::new(&AppConfig::default()).extract(url)
}
