use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::StoreError;
use crate::model::Recipe;

use super::{RecipePatch, RecipeStore};

/// Recipes as JSON documents in a single SQLite table. The database acts
/// as a document store here - record fields are not split into columns,
/// so the schema never changes when the record does.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::from_connection(Connection::open(path)?)
    }

    /// In-memory database; used by tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS recipes (
                id TEXT PRIMARY KEY,
                doc TEXT NOT NULL
            )",
            (),
        )?;
        Ok(SqliteStore { conn })
    }
}

impl RecipeStore for SqliteStore {
    fn load_all(&self) -> Result<Vec<Recipe>, StoreError> {
        let mut stmt = self.conn.prepare("SELECT doc FROM recipes")?;
        let rows = stmt.query_map((), |row| row.get::<_, String>(0))?;

        let mut recipes = Vec::new();
        for doc in rows {
            recipes.push(serde_json::from_str(&doc?)?);
        }
        Ok(recipes)
    }

    fn get(&self, id: &str) -> Result<Option<Recipe>, StoreError> {
        let doc: Option<String> = self
            .conn
            .query_row(
                "SELECT doc FROM recipes WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?;

        match doc {
            Some(doc) => Ok(Some(serde_json::from_str(&doc)?)),
            None => Ok(None),
        }
    }

    fn insert(&self, recipe: &Recipe) -> Result<(), StoreError> {
        let doc = serde_json::to_string(recipe)?;
        self.conn.execute(
            "INSERT INTO recipes (id, doc) VALUES (?1, ?2)",
            params![recipe.id, doc],
        )?;
        Ok(())
    }

    fn update(&self, id: &str, patch: &RecipePatch) -> Result<bool, StoreError> {
        let mut recipe = match self.get(id)? {
            Some(recipe) => recipe,
            None => return Ok(false),
        };
        patch.apply(&mut recipe);

        let doc = serde_json::to_string(&recipe)?;
        let changed = self.conn.execute(
            "UPDATE recipes SET doc = ?1 WHERE id = ?2",
            params![doc, id],
        )?;
        Ok(changed > 0)
    }

    fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let deleted = self
            .conn
            .execute("DELETE FROM recipes WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_then_get_roundtrip() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut recipe = Recipe::scraped("Curry", "https://example.com/curry");
        recipe.ingredients = vec!["rice".to_string(), "curry paste".to_string()];
        recipe.time = Some("40 min".to_string());
        store.insert(&recipe).unwrap();

        let loaded = store.get(&recipe.id).unwrap().unwrap();
        assert_eq!(loaded, recipe);
        assert!(store.get("no-such-id").unwrap().is_none());
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let store = SqliteStore::open_in_memory().unwrap();
        let recipe = Recipe::manual("Once");
        store.insert(&recipe).unwrap();
        assert!(matches!(
            store.insert(&recipe),
            Err(StoreError::Database(_))
        ));
    }

    #[test]
    fn update_patches_the_document() {
        let store = SqliteStore::open_in_memory().unwrap();
        let recipe = Recipe::manual("Draft");
        store.insert(&recipe).unwrap();

        let patch = RecipePatch {
            instructions: Some("Stir well.".to_string()),
            servings: Some("2".to_string()),
            ..RecipePatch::default()
        };
        assert!(store.update(&recipe.id, &patch).unwrap());

        let loaded = store.get(&recipe.id).unwrap().unwrap();
        assert_eq!(loaded.instructions, "Stir well.");
        assert_eq!(loaded.servings.as_deref(), Some("2"));
        assert_eq!(loaded.title, "Draft");

        assert!(!store.update("no-such-id", &patch).unwrap());
    }

    #[test]
    fn delete_reports_whether_anything_went() {
        let store = SqliteStore::open_in_memory().unwrap();
        let recipe = Recipe::manual("Gone");
        store.insert(&recipe).unwrap();

        assert!(store.delete(&recipe.id).unwrap());
        assert!(!store.delete(&recipe.id).unwrap());
        assert!(store.load_all().unwrap().is_empty());
    }
}
