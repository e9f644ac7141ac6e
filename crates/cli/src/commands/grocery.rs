use std::path::PathBuf;

use clap::Args;
use mealwise_core::config::{AppConfig, LoadOptions};
use mealwise_core::{cart_search_term, grocery_list, Recipe};
use serde::Serialize;

use crate::commands::{build_runtime, CommandResult};
use crate::recipes_file::JsonFileRecipeStore;

#[derive(Debug, Clone, Args)]
pub struct GroceryArgs {
    #[arg(long, help = "JSON file holding an array of recipes")]
    pub recipes: PathBuf,
    #[arg(long = "id", value_name = "RECIPE_ID", required = true, help = "Recipe to shop for (repeatable)")]
    pub ids: Vec<String>,
}

#[derive(Debug, Serialize)]
struct GroceryLine {
    name: String,
    quantity: String,
    unit: String,
    search_term: String,
}

#[derive(Debug, Serialize)]
struct GroceryPayload {
    items: Vec<GroceryLine>,
    recipe_count: usize,
    missing_ids: Vec<String>,
}

pub fn run(load_options: &LoadOptions, args: GroceryArgs) -> CommandResult {
    if let Err(error) = AppConfig::load(load_options.clone()) {
        return CommandResult::failure(
            "grocery",
            "config_validation",
            format!("configuration issue: {error}"),
            2,
        );
    }

    let runtime = match build_runtime("grocery") {
        Ok(runtime) => runtime,
        Err(failure) => return failure,
    };

    let store = JsonFileRecipeStore::new(&args.recipes);
    let recipes = match runtime.block_on(store.load_all()) {
        Ok(recipes) => recipes,
        Err(error) => {
            return CommandResult::failure("grocery", "recipe_load", format!("{error:#}"), 4);
        }
    };

    let (selected, missing_ids) = select_recipes(&recipes, &args.ids);
    let items: Vec<GroceryLine> = grocery_list(selected.iter().copied())
        .into_iter()
        .map(|item| GroceryLine {
            search_term: cart_search_term(&item),
            name: item.name,
            quantity: item.quantity,
            unit: item.unit,
        })
        .collect();

    let message = format!("{} grocery items from {} recipes", items.len(), selected.len());
    let payload = GroceryPayload { items, recipe_count: selected.len(), missing_ids };

    match serde_json::to_value(&payload) {
        Ok(data) => CommandResult::success("grocery", message, data),
        Err(error) => CommandResult::failure("grocery", "serialization", error.to_string(), 1),
    }
}

/// Recipes in the order their ids were given, plus the ids not found
fn select_recipes<'a>(recipes: &'a [Recipe], ids: &[String]) -> (Vec<&'a Recipe>, Vec<String>) {
    let mut selected = Vec::with_capacity(ids.len());
    let mut missing = Vec::new();

    for id in ids {
        match recipes.iter().find(|recipe| &recipe.id.0 == id) {
            Some(recipe) if !selected.iter().any(|picked: &&Recipe| picked.id == recipe.id) => {
                selected.push(recipe);
            }
            Some(_) => {}
            None => missing.push(id.clone()),
        }
    }

    (selected, missing)
}
