use std::process::ExitCode;

use clap::{Parser, Subcommand};

use recipebox::config::AppConfig;
use recipebox::filter;
use recipebox::model::Recipe;
use recipebox::scrape::Scraper;
use recipebox::store::{self, RecipePatch};

#[derive(Parser)]
#[command(
    name = "recipebox",
    version,
    about = "Collect, browse and scrape cooking recipes"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List recipes, optionally filtered
    List {
        /// Only recipes tagged with this attribute
        #[arg(long)]
        attribute: Option<String>,
        /// Only recipes that take at most this many minutes
        #[arg(long)]
        max_minutes: Option<u32>,
    },
    /// Show one recipe in full
    Show { id: String },
    /// Add a recipe by hand
    Add {
        #[arg(long)]
        title: String,
        /// One flag per ingredient line
        #[arg(long = "ingredient")]
        ingredients: Vec<String>,
        #[arg(long, default_value = "")]
        instructions: String,
        /// Comma-separated tags
        #[arg(long, value_delimiter = ',')]
        attributes: Vec<String>,
        #[arg(long)]
        servings: Option<String>,
        #[arg(long)]
        time: Option<String>,
    },
    /// Scrape a recipe from a URL and store it
    Import { url: String },
    /// Edit fields of an existing recipe
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        /// One flag per ingredient line; replaces the whole list
        #[arg(long = "ingredient")]
        ingredients: Option<Vec<String>>,
        #[arg(long)]
        instructions: Option<String>,
        /// Comma-separated tags; replaces the whole set
        #[arg(long, value_delimiter = ',')]
        attributes: Option<Vec<String>>,
        #[arg(long)]
        servings: Option<String>,
        #[arg(long)]
        time: Option<String>,
    },
    /// Delete a recipe
    Delete { id: String },
}

fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    let store = store::open_store(&config.storage)?;
    store::ensure_seeded(store.as_ref())?;

    match cli.command {
        Commands::List {
            attribute,
            max_minutes,
        } => {
            let mut recipes = store.load_all()?;
            if let Some(attribute) = &attribute {
                recipes = filter::by_attribute(recipes, attribute);
            }
            if let Some(max) = max_minutes {
                recipes = filter::by_max_minutes(recipes, max);
            }
            filter::sort_by_title(&mut recipes);
            for recipe in &recipes {
                print_summary(recipe);
            }
        }
        Commands::Show { id } => match store.get(&id)? {
            Some(recipe) => print_full(&recipe),
            None => {
                eprintln!("Recipe not found");
                return Ok(ExitCode::FAILURE);
            }
        },
        Commands::Add {
            title,
            ingredients,
            instructions,
            attributes,
            servings,
            time,
        } => {
            let mut recipe = Recipe::manual(title);
            recipe.ingredients = ingredients;
            recipe.instructions = instructions;
            recipe.attributes = clean_attributes(attributes);
            recipe.servings = servings;
            recipe.time = time;
            store.insert(&recipe)?;
            println!("Added {} ({})", recipe.title, recipe.id);
        }
        Commands::Import { url } => {
            let scraper = Scraper::new(&config);
            match scraper.extract(&url) {
                Some(recipe) => {
                    store.insert(&recipe)?;
                    println!("Imported {} ({})", recipe.title, recipe.id);
                }
                None => {
                    eprintln!("Failed to scrape the recipe, please try again.");
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Commands::Edit {
            id,
            title,
            ingredients,
            instructions,
            attributes,
            servings,
            time,
        } => {
            let patch = RecipePatch {
                title,
                ingredients,
                instructions,
                attributes: attributes.map(clean_attributes),
                servings,
                time,
            };
            if !store.update(&id, &patch)? {
                eprintln!("Recipe not found");
                return Ok(ExitCode::FAILURE);
            }
            println!("Updated {}", id);
        }
        Commands::Delete { id } => {
            if !store.delete(&id)? {
                eprintln!("Recipe not found");
                return Ok(ExitCode::FAILURE);
            }
            println!("Deleted {}", id);
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn clean_attributes(raw: Vec<String>) -> Vec<String> {
    raw.iter()
        .map(|attribute| attribute.trim())
        .filter(|attribute| !attribute.is_empty())
        .map(str::to_string)
        .collect()
}

fn print_summary(recipe: &Recipe) {
    let tags = if recipe.attributes.is_empty() {
        String::new()
    } else {
        format!("  [{}]", recipe.attributes.join(", "))
    };
    println!("{}  {}{}", recipe.id, recipe.title, tags);
}

fn print_full(recipe: &Recipe) {
    println!("{}", recipe.title);
    if !recipe.url.is_empty() {
        println!("Source: {}", recipe.url);
    }
    if let Some(servings) = &recipe.servings {
        println!("Servings: {}", servings);
    }
    if let Some(time) = &recipe.time {
        println!("Time: {}", time);
    }
    if !recipe.attributes.is_empty() {
        println!("Tags: {}", recipe.attributes.join(", "));
    }
    println!();
    println!("Ingredients:");
    for ingredient in &recipe.ingredients {
        println!("- {}", ingredient);
    }
    println!();
    println!("Instructions:");
    println!("{}", recipe.instructions);
}
