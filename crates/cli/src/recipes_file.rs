//! Recipe store backed by a JSON export (an array of recipes)

use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use mealwise_core::{ApplicationError, Recipe, RecipeStore, UserId};

#[derive(Debug, Clone)]
pub struct JsonFileRecipeStore {
    path: PathBuf,
}

impl JsonFileRecipeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every recipe in the file, regardless of owner
    pub async fn load_all(&self) -> anyhow::Result<Vec<Recipe>> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("could not read recipes file `{}`", self.path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("could not parse recipes file `{}`", self.path.display()))
    }

    /// Owner of the first recipe; exports normally hold a single user's recipes
    pub async fn default_user(&self) -> anyhow::Result<Option<UserId>> {
        Ok(self.load_all().await?.into_iter().next().map(|recipe| recipe.user_id))
    }
}

#[async_trait]
impl RecipeStore for JsonFileRecipeStore {
    async fn recipes_for_user(&self, user_id: &UserId) -> Result<Vec<Recipe>, ApplicationError> {
        let mut recipes = self
            .load_all()
            .await
            .map_err(|error| ApplicationError::Persistence(format!("{error:#}")))?;
        recipes.retain(|recipe| &recipe.user_id == user_id);
        recipes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(recipes)
    }
}
