//! Ingredient parser seam. The parser itself is an external AI service.

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::recipe::{ParsedRecipeData, Recipe};
use crate::errors::ApplicationError;

#[async_trait]
pub trait IngredientParser: Send + Sync {
    /// Turn free-text ingredients into a structured list plus category tags
    async fn parse(&self, raw_ingredients: &str) -> Result<ParsedRecipeData, ApplicationError>;
}

/// Re-run the parser over a recipe's raw text and store the result on it.
///
/// Returns whether the parsed data describes a complete meal. On parser
/// failure the recipe is left untouched.
pub async fn reparse_recipe<P>(parser: &P, recipe: &mut Recipe) -> Result<bool, ApplicationError>
where
    P: IngredientParser + ?Sized,
{
    let parsed = parser.parse(&recipe.raw_ingredients).await?;
    let is_meal = parsed.is_valid_meal || parsed.has_meal_shape();

    tracing::debug!(
        event_name = "recipe.reparsed",
        recipe_id = %recipe.id,
        ingredient_count = parsed.ingredients.len(),
        is_meal,
        "stored parsed ingredients on recipe"
    );

    recipe.apply_parsed(parsed, Utc::now());
    Ok(is_meal)
}
