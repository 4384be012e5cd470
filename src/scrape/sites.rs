use std::collections::HashMap;

use log::debug;
use scraper::{Html, Selector};
use url::Url;

use crate::error::ScrapeError;
use crate::model::Recipe;
use crate::scrape::element_text;
use crate::scrape::fetch::PageFetcher;

/// Outcome of asking the curated registry about a URL.
pub enum SiteAttempt {
    /// The domain is known and the page parsed cleanly
    Extracted(Recipe),
    /// No curated mapping for this domain; not an error
    Unsupported,
    /// The domain is known but fetching or parsing failed
    Failed(ScrapeError),
}

/// Hand-written CSS field mapping for one recipe-publishing site.
pub struct SiteSpec {
    title: String,
    ingredients: String,
    instructions: String,
}

impl SiteSpec {
    pub fn new(
        title: impl Into<String>,
        ingredients: impl Into<String>,
        instructions: impl Into<String>,
    ) -> Self {
        SiteSpec {
            title: title.into(),
            ingredients: ingredients.into(),
            instructions: instructions.into(),
        }
    }

    fn extract(&self, url: &str, fetcher: &PageFetcher) -> Result<Recipe, ScrapeError> {
        let body = fetcher.fetch(url)?;
        self.parse_document(url, &Html::parse_document(&body))
    }

    /// Apply the mapping to a fetched page. Title and ingredients are
    /// required; a page that yields neither did not match the template
    /// and the whole attempt fails rather than producing a partial record.
    fn parse_document(&self, url: &str, document: &Html) -> Result<Recipe, ScrapeError> {
        let title = document
            .select(&selector(&self.title)?)
            .map(element_text)
            .find(|text| !text.is_empty())
            .ok_or_else(|| {
                ScrapeError::SiteTemplate(format!("no title matched '{}'", self.title))
            })?;

        let ingredients: Vec<String> = document
            .select(&selector(&self.ingredients)?)
            .map(element_text)
            .filter(|text| !text.is_empty())
            .collect();
        if ingredients.is_empty() {
            return Err(ScrapeError::SiteTemplate(format!(
                "no ingredients matched '{}'",
                self.ingredients
            )));
        }

        let instructions = document
            .select(&selector(&self.instructions)?)
            .map(element_text)
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join("\n");

        let mut recipe = Recipe::scraped(title, url);
        recipe.ingredients = ingredients;
        recipe.instructions = instructions;
        Ok(recipe)
    }
}

/// Registry of curated site mappings keyed by domain.
pub struct SiteRegistry {
    sites: HashMap<String, SiteSpec>,
}

impl Default for SiteRegistry {
    /// Built-in mappings. Each one tracks the site's current recipe-card
    /// markup and needs updating when the site redesigns.
    fn default() -> Self {
        let mut registry = SiteRegistry::empty();

        // WordPress Recipe Maker card
        registry.insert(
            "recipetineats.com",
            SiteSpec::new(
                ".wprm-recipe-name",
                "li.wprm-recipe-ingredient",
                "div.wprm-recipe-instruction-text",
            ),
        );

        // Tasty Recipes card
        registry.insert(
            "sallysbakingaddiction.com",
            SiteSpec::new(
                ".tasty-recipes-title",
                ".tasty-recipes-ingredients li",
                ".tasty-recipes-instructions li",
            ),
        );

        registry.insert(
            "bbcgoodfood.com",
            SiteSpec::new(
                "h1.heading-1",
                ".recipe__ingredients li",
                ".recipe__method-steps li",
            ),
        );

        registry.insert(
            "simplyrecipes.com",
            SiteSpec::new(
                "h1.heading__title",
                ".structured-ingredients__list li",
                ".mntl-sc-block-group--OL li",
            ),
        );

        registry
    }
}

impl SiteRegistry {
    /// A registry with no mappings at all.
    pub fn empty() -> Self {
        SiteRegistry {
            sites: HashMap::new(),
        }
    }

    /// Register (or replace) the mapping for a domain.
    pub fn insert(&mut self, domain: impl Into<String>, spec: SiteSpec) {
        self.sites.insert(domain.into(), spec);
    }

    pub fn supports(&self, url: &str) -> bool {
        self.spec_for(url).is_some()
    }

    fn spec_for(&self, url: &str) -> Option<&SiteSpec> {
        let parsed = Url::parse(url).ok()?;
        let host = parsed.host_str()?;
        let host = host.strip_prefix("www.").unwrap_or(host);
        self.sites
            .iter()
            .find(|(domain, _)| {
                host == domain.as_str() || host.ends_with(&format!(".{}", domain))
            })
            .map(|(_, spec)| spec)
    }

    /// Try to extract `url` with a curated mapping. Unknown domains are
    /// reported as `Unsupported` without touching the network.
    pub fn attempt(&self, url: &str, fetcher: &PageFetcher) -> SiteAttempt {
        let spec = match self.spec_for(url) {
            Some(spec) => spec,
            None => return SiteAttempt::Unsupported,
        };

        debug!("trying curated site mapping for {}", url);
        match spec.extract(url, fetcher) {
            Ok(recipe) => SiteAttempt::Extracted(recipe),
            Err(err) => SiteAttempt::Failed(err),
        }
    }
}

fn selector(css: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(css)
        .map_err(|err| ScrapeError::SiteTemplate(format!("bad selector '{}': {}", css, err)))
}
