use html_escape::decode_html_entities;
use log::debug;
use scraper::Selector;
use serde_json::Value;

use crate::error::ScrapeError;
use crate::model::Recipe;
use crate::scrape::{page_heading, Extractor, ParsingContext};

/// Extracts recipes from schema.org JSON-LD blocks embedded in the page.
///
/// Blocks are scanned in document order and the first node whose `@type`
/// mentions `Recipe` and that carries a non-empty ingredient list wins.
/// A block that fails to parse is skipped, never fatal.
pub struct JsonLdExtractor {
    title_blocklist: Vec<String>,
}

impl JsonLdExtractor {
    /// `title_blocklist` holds lowercase substrings that mark a declared
    /// recipe name as junk (site branding instead of a dish name).
    pub fn new(title_blocklist: Vec<String>) -> Self {
        JsonLdExtractor { title_blocklist }
    }

    fn is_blocklisted(&self, title: &str) -> bool {
        let lowered = title.to_lowercase();
        self.title_blocklist
            .iter()
            .any(|marker| lowered.contains(&marker.to_lowercase()))
    }

    fn recipe_from_node(&self, node: &Value, context: &ParsingContext) -> Recipe {
        let declared = node
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or("")
            .trim();
        let title = if declared.is_empty() || self.is_blocklisted(declared) {
            page_heading(&context.document).unwrap_or_else(|| "Untitled Recipe".to_string())
        } else {
            decode(declared)
        };

        let ingredients = node
            .get("recipeIngredient")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(decode)
                    .collect()
            })
            .unwrap_or_default();

        let mut recipe = Recipe::scraped(title, &context.url);
        recipe.ingredients = ingredients;
        recipe.instructions = flatten_instructions(node.get("recipeInstructions"));
        recipe.servings = node.get("recipeYield").and_then(yield_text);
        recipe.time = node
            .get("totalTime")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|time| !time.is_empty())
            .map(str::to_string);
        recipe
    }
}

impl Extractor for JsonLdExtractor {
    fn parse(&self, context: &ParsingContext) -> Result<Recipe, ScrapeError> {
        let selector = Selector::parse("script[type='application/ld+json']").unwrap();

        for script in context.document.select(&selector) {
            let json: Value = match serde_json::from_str(&script.inner_html()) {
                Ok(json) => json,
                Err(err) => {
                    debug!("skipping malformed JSON-LD block: {}", err);
                    continue;
                }
            };

            if let Some(node) = find_recipe_node(&json) {
                debug!("found JSON-LD recipe in {}", context.url);
                return Ok(self.recipe_from_node(node, context));
            }
        }

        Err(ScrapeError::NoRecipeData)
    }
}

fn decode(text: &str) -> String {
    decode_html_entities(text).into_owned()
}

/// First candidate node within one JSON-LD block. Top-level arrays and
/// `@graph` containers are searched one level deep, in order.
fn find_recipe_node(json: &Value) -> Option<&Value> {
    match json {
        Value::Array(items) => items.iter().find(|item| is_recipe_node(item)),
        Value::Object(obj) => {
            if is_recipe_node(json) {
                Some(json)
            } else {
                obj.get("@graph")
                    .and_then(Value::as_array)
                    .and_then(|items| items.iter().find(|item| is_recipe_node(item)))
            }
        }
        _ => None,
    }
}

fn is_recipe_node(value: &Value) -> bool {
    match value.as_object() {
        Some(obj) => {
            let recipe_typed = obj.get("@type").map(is_recipe_type).unwrap_or(false);
            let has_ingredients = obj
                .get("recipeIngredient")
                .and_then(Value::as_array)
                .map(|items| !items.is_empty())
                .unwrap_or(false);
            recipe_typed && has_ingredients
        }
        None => false,
    }
}

/// `@type` may be a plain string or a list of types.
fn is_recipe_type(value: &Value) -> bool {
    match value {
        Value::String(declared) => declared.contains("Recipe"),
        Value::Array(items) => items.iter().any(is_recipe_type),
        _ => false,
    }
}

/// Normalize `recipeInstructions` to newline-joined step text.
///
/// The field shows up as a single string, a list of strings, or a list
/// of step objects with a `text` field. Blank steps are dropped.
fn flatten_instructions(value: Option<&Value>) -> String {
    let steps: Vec<String> = match value {
        Some(Value::String(instructions)) => vec![instructions.clone()],
        Some(Value::Array(items)) => items.iter().map(step_text).collect(),
        _ => Vec::new(),
    };

    steps
        .into_iter()
        .filter(|step| !step.trim().is_empty())
        .map(|step| decode(&step))
        .collect::<Vec<_>>()
        .join("\n")
}

fn step_text(step: &Value) -> String {
    match step {
        Value::Object(obj) => obj
            .get("text")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// `recipeYield` is free-form: a string, a bare number, or a list of
/// either. The first usable entry wins.
fn yield_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        Value::Number(count) => Some(count.to_string()),
        Value::Array(items) => items.iter().find_map(yield_text),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn context_for(json_ld: &str) -> ParsingContext {
        let html = format!(
            r#"
            <!DOCTYPE html>
            <html>
            <head>
                <script type="application/ld+json">
                    {}
                </script>
            </head>
            <body></body>
            </html>
            "#,
            json_ld
        );
        ParsingContext {
            url: "https://example.com/recipe".to_string(),
            document: Html::parse_document(&html),
        }
    }

    fn extractor() -> JsonLdExtractor {
        JsonLdExtractor::new(vec!["swissmilk".to_string()])
    }

    #[test]
    fn test_parse_basic_recipe() {
        let context = context_for(
            r#"
            {
                "@context": "https://schema.org/",
                "@type": "Recipe",
                "name": "Chocolate Chip Cookies",
                "recipeIngredient": ["flour", "sugar", "chocolate chips"],
                "recipeInstructions": "Mix ingredients. Bake at 350F for 10 minutes."
            }
            "#,
        );

        let recipe = extractor().parse(&context).unwrap();

        assert_eq!(recipe.title, "Chocolate Chip Cookies");
        assert_eq!(recipe.ingredients, vec!["flour", "sugar", "chocolate chips"]);
        assert_eq!(
            recipe.instructions,
            "Mix ingredients. Bake at 350F for 10 minutes."
        );
        assert_eq!(recipe.url, "https://example.com/recipe");
        assert!(recipe.attributes.is_empty());
    }

    #[test]
    fn test_array_block_skips_non_recipe_nodes() {
        let context = context_for(
            r#"
            [
                { "@type": "WebSite", "name": "Recipe Website" },
                {
                    "@type": "Recipe",
                    "name": "Pasta Carbonara",
                    "recipeIngredient": ["spaghetti", "eggs", "bacon"],
                    "recipeInstructions": [
                        {"@type": "HowToStep", "text": "Cook pasta"},
                        {"@type": "HowToStep", "text": "Fry bacon"}
                    ]
                }
            ]
            "#,
        );

        let recipe = extractor().parse(&context).unwrap();
        assert_eq!(recipe.title, "Pasta Carbonara");
        assert_eq!(recipe.instructions, "Cook pasta\nFry bacon");
    }

    #[test]
    fn test_blank_steps_are_dropped() {
        let context = context_for(
            r#"
            {
                "@type": "Recipe",
                "name": "Test",
                "recipeIngredient": ["a"],
                "recipeInstructions": [
                    {"text": "Step 1"},
                    {"text": ""},
                    {"text": "Step 2"}
                ]
            }
            "#,
        );

        let recipe = extractor().parse(&context).unwrap();
        assert_eq!(recipe.instructions, "Step 1\nStep 2");
    }

    #[test]
    fn test_plain_string_steps() {
        let context = context_for(
            r#"
            {
                "@type": "Recipe",
                "name": "Strings",
                "recipeIngredient": ["a"],
                "recipeInstructions": ["Chop.", "  ", "Fry."]
            }
            "#,
        );

        let recipe = extractor().parse(&context).unwrap();
        assert_eq!(recipe.instructions, "Chop.\nFry.");
    }

    #[test]
    fn test_type_list_counts_as_recipe() {
        let context = context_for(
            r#"
            {
                "@type": ["Recipe", "NewsArticle"],
                "name": "Typed Twice",
                "recipeIngredient": ["x"],
                "recipeInstructions": "Do it"
            }
            "#,
        );

        let recipe = extractor().parse(&context).unwrap();
        assert_eq!(recipe.title, "Typed Twice");
    }

    #[test]
    fn test_graph_container() {
        let context = context_for(
            r#"
            {
                "@context": "https://schema.org",
                "@graph": [
                    { "@type": "WebPage", "name": "Page" },
                    {
                        "@type": "Recipe",
                        "name": "Graph Recipe",
                        "recipeIngredient": ["y"],
                        "recipeInstructions": "Stir"
                    }
                ]
            }
            "#,
        );

        let recipe = extractor().parse(&context).unwrap();
        assert_eq!(recipe.title, "Graph Recipe");
    }

    #[test]
    fn test_blocklisted_title_falls_back_to_heading() {
        let html = r#"
            <html>
            <head>
                <script type="application/ld+json">
                {
                    "@type": "Recipe",
                    "name": "Swissmilk Rezept",
                    "recipeIngredient": ["milk"],
                    "recipeInstructions": "Pour"
                }
                </script>
            </head>
            <body><h1>Actual Dish Name</h1></body>
            </html>
        "#;
        let context = ParsingContext {
            url: "https://example.com/r".to_string(),
            document: Html::parse_document(html),
        };

        let recipe = extractor().parse(&context).unwrap();
        assert_eq!(recipe.title, "Actual Dish Name");
    }

    #[test]
    fn test_blocklisted_title_without_heading_is_untitled() {
        let context = context_for(
            r#"
            {
                "@type": "Recipe",
                "name": "swissmilk special",
                "recipeIngredient": ["milk"],
                "recipeInstructions": "Pour"
            }
            "#,
        );

        let recipe = extractor().parse(&context).unwrap();
        assert_eq!(recipe.title, "Untitled Recipe");
    }

    #[test]
    fn test_empty_ingredient_list_is_not_a_candidate() {
        let context = context_for(
            r#"
            {
                "@type": "Recipe",
                "name": "No Ingredients",
                "recipeIngredient": [],
                "recipeInstructions": "Nothing"
            }
            "#,
        );

        assert!(matches!(
            extractor().parse(&context),
            Err(ScrapeError::NoRecipeData)
        ));
    }

    #[test]
    fn test_malformed_block_is_skipped() {
        let html = r#"
            <html>
            <head>
                <script type="application/ld+json">{ not json at all</script>
                <script type="application/ld+json">
                {
                    "@type": "Recipe",
                    "name": "Second Block",
                    "recipeIngredient": ["z"],
                    "recipeInstructions": "Go"
                }
                </script>
            </head>
            <body></body>
            </html>
        "#;
        let context = ParsingContext {
            url: "https://example.com/r".to_string(),
            document: Html::parse_document(html),
        };

        let recipe = extractor().parse(&context).unwrap();
        assert_eq!(recipe.title, "Second Block");
    }

    #[test]
    fn test_servings_and_time_are_picked_up() {
        let context = context_for(
            r#"
            {
                "@type": "Recipe",
                "name": "Timed",
                "recipeIngredient": ["a"],
                "recipeInstructions": "Wait",
                "recipeYield": ["4 servings", "1 loaf"],
                "totalTime": "PT45M"
            }
            "#,
        );

        let recipe = extractor().parse(&context).unwrap();
        assert_eq!(recipe.servings.as_deref(), Some("4 servings"));
        assert_eq!(recipe.time.as_deref(), Some("PT45M"));
    }

    #[test]
    fn test_entities_are_decoded() {
        let context = context_for(
            r#"
            {
                "@type": "Recipe",
                "name": "Mac &amp; Cheese",
                "recipeIngredient": ["macaroni &amp; cheese"],
                "recipeInstructions": "Combine"
            }
            "#,
        );

        let recipe = extractor().parse(&context).unwrap();
        assert_eq!(recipe.title, "Mac & Cheese");
        assert_eq!(recipe.ingredients, vec!["macaroni & cheese"]);
    }
}
