use thiserror::Error;

/// Errors that can occur while scraping a recipe from a URL.
///
/// These never reach the end user: the pipeline logs them and the public
/// entry point collapses every failure into `None`.
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// Failed to fetch the page
    #[error("failed to fetch URL: {0}")]
    Fetch(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("unexpected HTTP status {status} for {url}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    /// No extractor found recipe data in the page
    #[error("no recipe data found in page")]
    NoRecipeData,

    /// A curated site mapping did not match the fetched page
    #[error("page did not match the site template: {0}")]
    SiteTemplate(String),
}

/// Errors from the persistence layer.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The on-disk data could not be (de)serialized
    #[error("malformed recipe data: {0}")]
    Data(#[from] serde_json::Error),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}
