//! Recipe storage seam consumed by the suggestion service

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::recipe::{Recipe, UserId};
use crate::errors::ApplicationError;

#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// Every recipe owned by `user_id`, newest first
    async fn recipes_for_user(&self, user_id: &UserId) -> Result<Vec<Recipe>, ApplicationError>;
}

#[derive(Clone, Debug, Default)]
pub struct InMemoryRecipeStore {
    recipes: HashMap<UserId, Vec<Recipe>>,
}

impl InMemoryRecipeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, recipe: Recipe) {
        self.recipes.entry(recipe.user_id.clone()).or_default().push(recipe);
    }

    pub fn extend(&mut self, recipes: impl IntoIterator<Item = Recipe>) {
        for recipe in recipes {
            self.insert(recipe);
        }
    }
}

#[async_trait]
impl RecipeStore for InMemoryRecipeStore {
    async fn recipes_for_user(&self, user_id: &UserId) -> Result<Vec<Recipe>, ApplicationError> {
        let mut recipes = self.recipes.get(user_id).cloned().unwrap_or_default();
        recipes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(recipes)
    }
}
