use std::path::PathBuf;

use clap::Args;
use mealwise_core::config::{AppConfig, LoadOptions};
use mealwise_core::{Strategy, SuggestionOptions, SuggestionService, SuggestionSettings, UserId};

use crate::commands::{build_runtime, CommandResult};
use crate::recipes_file::JsonFileRecipeStore;

#[derive(Debug, Clone, Args)]
pub struct SuggestArgs {
    #[arg(long, help = "JSON file holding an array of recipes")]
    pub recipes: PathBuf,
    #[arg(long, help = "Owner whose recipes are considered (defaults to the first recipe's owner)")]
    pub user: Option<String>,
    #[arg(long, allow_negative_numbers = true, help = "Number of suggestions to return")]
    pub count: Option<i64>,
    #[arg(long, help = "Scoring strategy: balanced|random|fresh|favorites")]
    pub strategy: Option<Strategy>,
    #[arg(long = "exclude", value_name = "RECIPE_ID", help = "Recipe id to leave out (repeatable)")]
    pub exclude: Vec<String>,
    #[arg(long, help = "Seed for a repeatable run")]
    pub seed: Option<u64>,
}

pub fn run(load_options: &LoadOptions, args: SuggestArgs) -> CommandResult {
    let config = match AppConfig::load(load_options.clone()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "suggest",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let runtime = match build_runtime("suggest") {
        Ok(runtime) => runtime,
        Err(failure) => return failure,
    };

    let store = JsonFileRecipeStore::new(&args.recipes);
    let settings = SuggestionSettings::from(&config.suggestions);

    let result = runtime.block_on(async {
        let user = match args.user {
            Some(user) => UserId(user),
            None => store
                .default_user()
                .await
                .map_err(|error| format!("{error:#}"))?
                .unwrap_or_else(|| UserId(String::new())),
        };

        let mut options = SuggestionOptions::new().excluding(args.exclude);
        if let Some(seed) = args.seed {
            options = options.with_seed(seed);
        }

        SuggestionService::new(store, settings)
            .suggest_for_user(&user, args.count, args.strategy, options)
            .await
            .map_err(|error| error.to_string())
    });

    match result {
        Ok(report) => {
            let message = format!(
                "{} of {} recipes suggested",
                report.suggestions.len(),
                report.total_recipes
            );
            match serde_json::to_value(&report) {
                Ok(data) => CommandResult::success("suggest", message, data),
                Err(error) => CommandResult::failure("suggest", "serialization", error.to_string(), 1),
            }
        }
        Err(message) => CommandResult::failure("suggest", "recipe_load", message, 4),
    }
}
