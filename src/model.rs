use serde::{Deserialize, Serialize};
use uuid::Uuid;

fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// A stored recipe. `url` is non-empty exactly when the record came from
/// the scraper; manually entered recipes carry an empty string.
///
/// Records written by older versions of the collection may lack `id`,
/// `attributes` or `url` - the serde defaults fill those in on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(default = "generate_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub attributes: Vec<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servings: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

impl Recipe {
    /// A manually entered recipe with a fresh id and no source URL.
    pub fn manual(title: impl Into<String>) -> Self {
        Recipe {
            id: generate_id(),
            title: title.into(),
            ingredients: Vec::new(),
            instructions: String::new(),
            attributes: Vec::new(),
            url: String::new(),
            servings: None,
            time: None,
        }
    }

    /// A recipe produced by the scraper: fresh id, empty attributes,
    /// `url` set to the page it was extracted from.
    pub fn scraped(title: impl Into<String>, url: impl Into<String>) -> Self {
        Recipe {
            url: url.into(),
            ..Recipe::manual(title)
        }
    }

    pub fn has_attribute(&self, attribute: &str) -> bool {
        self.attributes
            .iter()
            .any(|a| a.eq_ignore_ascii_case(attribute))
    }
}
