use scraper::Selector;

use crate::error::ScrapeError;
use crate::model::Recipe;
use crate::scrape::{element_text, page_heading, Extractor, ParsingContext};

/// Last-resort extraction from raw page structure: first heading as the
/// title, list items as ingredients, paragraphs as instructions.
///
/// No semantic guarantee - navigation list items land in the ingredient
/// list too. Always produces a record; with nothing to go on the result
/// degrades to placeholders.
pub struct HeuristicExtractor;

impl Extractor for HeuristicExtractor {
    fn parse(&self, context: &ParsingContext) -> Result<Recipe, ScrapeError> {
        let title = page_heading(&context.document).unwrap_or_else(|| context.url.clone());

        let list_items = Selector::parse("li").unwrap();
        let ingredients: Vec<String> = context
            .document
            .select(&list_items)
            .map(element_text)
            .collect();

        let paragraphs_selector = Selector::parse("p").unwrap();
        let paragraphs: Vec<String> = context
            .document
            .select(&paragraphs_selector)
            .map(element_text)
            .collect();
        let instructions = if paragraphs.is_empty() {
            "No instructions found".to_string()
        } else {
            paragraphs.join("\n")
        };

        let mut recipe = Recipe::scraped(title, &context.url);
        recipe.ingredients = ingredients;
        recipe.instructions = instructions;
        Ok(recipe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn context_for(html: &str) -> ParsingContext {
        ParsingContext {
            url: "https://example.com/page".to_string(),
            document: Html::parse_document(html),
        }
    }

    #[test]
    fn heading_list_items_and_paragraphs() {
        let context = context_for(
            r#"
            <html><body>
                <h1>Grandma's Stew</h1>
                <ul><li>2 carrots</li><li>1 onion</li></ul>
                <p>Chop everything.</p>
                <p>Simmer for an hour.</p>
            </body></html>
            "#,
        );

        let recipe = HeuristicExtractor.parse(&context).unwrap();
        assert_eq!(recipe.title, "Grandma's Stew");
        assert_eq!(recipe.ingredients, vec!["2 carrots", "1 onion"]);
        assert_eq!(recipe.instructions, "Chop everything.\nSimmer for an hour.");
        assert_eq!(recipe.url, "https://example.com/page");
    }

    #[test]
    fn missing_heading_uses_the_url_as_title() {
        let context = context_for("<html><body><li>salt</li></body></html>");
        let recipe = HeuristicExtractor.parse(&context).unwrap();
        assert_eq!(recipe.title, "https://example.com/page");
    }

    #[test]
    fn no_paragraphs_yields_placeholder_instructions() {
        let context = context_for("<html><body><li>a</li><li>b</li></body></html>");
        let recipe = HeuristicExtractor.parse(&context).unwrap();
        assert_eq!(recipe.instructions, "No instructions found");
        assert_eq!(recipe.ingredients.len(), 2);
    }

    #[test]
    fn list_items_are_taken_unfiltered() {
        // Navigation items count too - that is the deal with heuristics.
        let context = context_for(
            r#"
            <html><body>
                <nav><ul><li>Home</li><li>About</li></ul></nav>
                <h1>Bread</h1>
                <ul><li>flour</li></ul>
                <p>Bake.</p>
            </body></html>
            "#,
        );

        let recipe = HeuristicExtractor.parse(&context).unwrap();
        assert_eq!(recipe.ingredients, vec!["Home", "About", "flour"]);
    }
}
