//! Key-value persistence of recipe records.
//!
//! Two interchangeable backends sit behind one trait; the extraction
//! pipeline and the CLI never know which one is in use.

use crate::config::{StorageBackend, StorageConfig};
use crate::error::StoreError;
use crate::model::Recipe;

mod json_file;
mod sqlite;

pub use json_file::JsonFileStore;
pub use sqlite::SqliteStore;

/// Partial field set for in-place edits. `id` and `url` are deliberately
/// absent: the id is immutable and the source URL records provenance.
#[derive(Debug, Clone, Default)]
pub struct RecipePatch {
    pub title: Option<String>,
    pub ingredients: Option<Vec<String>>,
    pub instructions: Option<String>,
    pub attributes: Option<Vec<String>>,
    pub servings: Option<String>,
    pub time: Option<String>,
}

impl RecipePatch {
    pub fn apply(&self, recipe: &mut Recipe) {
        if let Some(title) = &self.title {
            recipe.title = title.clone();
        }
        if let Some(ingredients) = &self.ingredients {
            recipe.ingredients = ingredients.clone();
        }
        if let Some(instructions) = &self.instructions {
            recipe.instructions = instructions.clone();
        }
        if let Some(attributes) = &self.attributes {
            recipe.attributes = attributes.clone();
        }
        if let Some(servings) = &self.servings {
            recipe.servings = Some(servings.clone());
        }
        if let Some(time) = &self.time {
            recipe.time = Some(time.clone());
        }
    }
}

/// Storage capability consumed by the rest of the system.
pub trait RecipeStore {
    fn load_all(&self) -> Result<Vec<Recipe>, StoreError>;
    fn get(&self, id: &str) -> Result<Option<Recipe>, StoreError>;
    fn insert(&self, recipe: &Recipe) -> Result<(), StoreError>;
    /// Apply a partial edit; `Ok(false)` when no record has this id.
    fn update(&self, id: &str, patch: &RecipePatch) -> Result<bool, StoreError>;
    /// `Ok(false)` when no record has this id.
    fn delete(&self, id: &str) -> Result<bool, StoreError>;
}

/// Open the store selected by configuration.
pub fn open_store(config: &StorageConfig) -> Result<Box<dyn RecipeStore>, StoreError> {
    match config.backend {
        StorageBackend::JsonFile => Ok(Box::new(JsonFileStore::new(&config.path))),
        StorageBackend::Sqlite => Ok(Box::new(SqliteStore::open(&config.path)?)),
    }
}

/// The two recipes a brand-new collection starts with.
pub fn starter_recipes() -> Vec<Recipe> {
    let mut bolognese = Recipe::manual("Spaghetti Bolognese");
    bolognese.ingredients = vec![
        "spaghetti".to_string(),
        "minced beef".to_string(),
        "tomato sauce".to_string(),
        "onion".to_string(),
    ];
    bolognese.instructions = "Cook the spaghetti and mix with sauce.".to_string();

    let mut pancakes = Recipe::manual("Pancakes");
    pancakes.ingredients = vec![
        "flour".to_string(),
        "milk".to_string(),
        "eggs".to_string(),
        "butter".to_string(),
        "baking powder".to_string(),
    ];
    pancakes.instructions = "Mix ingredients and cook in a pan.".to_string();
    pancakes.attributes = vec!["dessert".to_string(), "easy".to_string()];

    vec![bolognese, pancakes]
}

/// Populate an empty store with the starter recipes so a first run has
/// something to show. Non-empty stores are left untouched.
pub fn ensure_seeded(store: &dyn RecipeStore) -> Result<(), StoreError> {
    if store.load_all()?.is_empty() {
        for recipe in starter_recipes() {
            store.insert(&recipe)?;
        }
    }
    Ok(())
}
