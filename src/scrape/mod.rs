//! Layered best-effort recipe extraction.
//!
//! A scrape request walks a fixed chain of strategies until one produces
//! a record: the curated per-site registry, then schema.org structured
//! data, then raw-markup heuristics. There is no retry at any stage, and
//! no failure escapes `Scraper::extract` - the caller sees a record or
//! nothing.

use log::{debug, warn};
use scraper::{ElementRef, Html, Selector};

use crate::config::AppConfig;
use crate::error::ScrapeError;
use crate::model::Recipe;

pub mod fetch;
mod heuristic;
mod json_ld;
mod sites;

pub use fetch::PageFetcher;
pub use heuristic::HeuristicExtractor;
pub use json_ld::JsonLdExtractor;
pub use sites::{SiteAttempt, SiteRegistry, SiteSpec};

/// A fetched page handed to the generic extractors.
pub struct ParsingContext {
    pub url: String,
    pub document: Html,
}

/// One extraction strategy over an already-fetched page.
///
/// `Err(ScrapeError::NoRecipeData)` means "nothing for me here, ask the
/// next strategy"; any other error aborts the request.
pub trait Extractor {
    fn parse(&self, context: &ParsingContext) -> Result<Recipe, ScrapeError>;
}

/// The whole extraction pipeline. Stateless per request; one instance
/// can serve any number of URLs.
pub struct Scraper {
    fetcher: PageFetcher,
    registry: SiteRegistry,
    json_ld: JsonLdExtractor,
    heuristic: HeuristicExtractor,
}

impl Scraper {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_registry(config, SiteRegistry::default())
    }

    /// Build a scraper with a custom curated-site registry.
    pub fn with_registry(config: &AppConfig, registry: SiteRegistry) -> Self {
        Scraper {
            fetcher: PageFetcher::new(&config.http),
            registry,
            json_ld: JsonLdExtractor::new(config.scraper.title_blocklist.clone()),
            heuristic: HeuristicExtractor,
        }
    }

    /// Extract a recipe from a URL.
    ///
    /// Every failure mode ends up as `None`; the reasons are logged for
    /// the operator, never surfaced to the user.
    pub fn extract(&self, url: &str) -> Option<Recipe> {
        match self.registry.attempt(url, &self.fetcher) {
            SiteAttempt::Extracted(recipe) => {
                debug!("curated site mapping handled {}", url);
                return Some(recipe);
            }
            SiteAttempt::Unsupported => debug!("no curated mapping for {}, falling back", url),
            // Not fatal either: the generic path gets its chance
            SiteAttempt::Failed(err) => warn!("curated extractor failed for {}: {}", url, err),
        }

        match self.extract_generic(url) {
            Ok(recipe) => Some(recipe),
            Err(err) => {
                warn!("extraction failed for {}: {}", url, err);
                None
            }
        }
    }

    fn extract_generic(&self, url: &str) -> Result<Recipe, ScrapeError> {
        let body = self.fetcher.fetch(url)?;
        let document = Html::parse_document(&body);
        let context = ParsingContext {
            url: url.to_string(),
            document,
        };

        let extractors: [&dyn Extractor; 2] = [&self.json_ld, &self.heuristic];
        for extractor in extractors {
            match extractor.parse(&context) {
                Ok(recipe) => return Ok(recipe),
                Err(ScrapeError::NoRecipeData) => continue,
                Err(err) => return Err(err),
            }
        }

        Err(ScrapeError::NoRecipeData)
    }
}

/// Text of the page's first `<h1>`, if it has one with any content.
pub(crate) fn page_heading(document: &Html) -> Option<String> {
    let selector = Selector::parse("h1").unwrap();
    document
        .select(&selector)
        .next()
        .map(element_text)
        .filter(|text| !text.is_empty())
}

/// Concatenated, trimmed text content of an element.
pub(crate) fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}
