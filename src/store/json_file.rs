use std::fs;
use std::path::{Path, PathBuf};

use crate::error::StoreError;
use crate::model::Recipe;

use super::{RecipePatch, RecipeStore};

/// Whole-collection JSON file, read and rewritten on every mutation.
/// Fine for a personal collection; not meant for concurrent writers.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        JsonFileStore {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn read(&self) -> Result<Vec<Recipe>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(&self.path)?;
        // Serde field defaults migrate records written by older versions
        // (missing id, attributes or url); they persist on the next write.
        Ok(serde_json::from_str(&raw)?)
    }

    fn write(&self, recipes: &[Recipe]) -> Result<(), StoreError> {
        let raw = serde_json::to_string_pretty(recipes)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl RecipeStore for JsonFileStore {
    fn load_all(&self) -> Result<Vec<Recipe>, StoreError> {
        self.read()
    }

    fn get(&self, id: &str) -> Result<Option<Recipe>, StoreError> {
        Ok(self.read()?.into_iter().find(|recipe| recipe.id == id))
    }

    fn insert(&self, recipe: &Recipe) -> Result<(), StoreError> {
        let mut recipes = self.read()?;
        recipes.push(recipe.clone());
        self.write(&recipes)
    }

    fn update(&self, id: &str, patch: &RecipePatch) -> Result<bool, StoreError> {
        let mut recipes = self.read()?;
        match recipes.iter_mut().find(|recipe| recipe.id == id) {
            Some(recipe) => {
                patch.apply(recipe);
                self.write(&recipes)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let mut recipes = self.read()?;
        let before = recipes.len();
        recipes.retain(|recipe| recipe.id != id);
        if recipes.len() == before {
            return Ok(false);
        }
        self.write(&recipes)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    struct TempStore {
        store: JsonFileStore,
        path: PathBuf,
    }

    impl TempStore {
        fn new() -> Self {
            let path =
                std::env::temp_dir().join(format!("recipebox-test-{}.json", Uuid::new_v4()));
            TempStore {
                store: JsonFileStore::new(&path),
                path,
            }
        }
    }

    impl Drop for TempStore {
        fn drop(&mut self) {
            let _ = fs::remove_file(&self.path);
        }
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let temp = TempStore::new();
        assert!(temp.store.load_all().unwrap().is_empty());
    }

    #[test]
    fn insert_then_get_roundtrip() {
        let temp = TempStore::new();
        let mut recipe = Recipe::manual("Soup");
        recipe.ingredients = vec!["water".to_string(), "salt".to_string()];
        temp.store.insert(&recipe).unwrap();

        let loaded = temp.store.get(&recipe.id).unwrap().unwrap();
        assert_eq!(loaded, recipe);
        assert!(temp.store.get("no-such-id").unwrap().is_none());
    }

    #[test]
    fn update_patches_in_place() {
        let temp = TempStore::new();
        let recipe = Recipe::manual("Draft");
        temp.store.insert(&recipe).unwrap();

        let patch = RecipePatch {
            title: Some("Final".to_string()),
            ..RecipePatch::default()
        };
        assert!(temp.store.update(&recipe.id, &patch).unwrap());
        assert_eq!(temp.store.get(&recipe.id).unwrap().unwrap().title, "Final");

        assert!(!temp.store.update("no-such-id", &patch).unwrap());
    }

    #[test]
    fn delete_removes_exactly_one_record() {
        let temp = TempStore::new();
        let keep = Recipe::manual("Keep");
        let drop = Recipe::manual("Drop");
        temp.store.insert(&keep).unwrap();
        temp.store.insert(&drop).unwrap();

        assert!(temp.store.delete(&drop.id).unwrap());
        assert!(!temp.store.delete(&drop.id).unwrap());

        let remaining = temp.store.load_all().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, keep.id);
    }

    #[test]
    fn legacy_records_gain_missing_fields_on_load() {
        let temp = TempStore::new();
        fs::write(
            &temp.path,
            r#"[{"title": "Old", "ingredients": ["x"], "instructions": "Do."}]"#,
        )
        .unwrap();

        let recipes = temp.store.load_all().unwrap();
        assert_eq!(recipes.len(), 1);
        assert!(!recipes[0].id.is_empty());
        assert!(recipes[0].attributes.is_empty());
        assert!(recipes[0].url.is_empty());
    }
}
