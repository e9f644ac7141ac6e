pub mod config;
pub mod domain;
pub mod errors;
pub mod grocery;
pub mod parsing;
pub mod store;
pub mod suggestions;

pub use domain::recipe::{CategoryTags, Ingredient, ParsedRecipeData, Recipe, RecipeId, UserId};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use grocery::{cart_search_term, consolidate, grocery_list};
pub use parsing::{reparse_recipe, IngredientParser};
pub use store::{InMemoryRecipeStore, RecipeStore};
pub use suggestions::{
    select_diverse, RecipeSuggestion, ScoreCalculator, Strategy, SuggestionEngine,
    SuggestionOptions, SuggestionReason, SuggestionReport, SuggestionService, SuggestionSettings,
};
