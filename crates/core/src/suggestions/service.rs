//! Request-level wrapper around the engine: load, clamp, suggest, report

use super::engine::SuggestionEngine;
use super::types::{Strategy, SuggestionOptions, SuggestionReport};
use super::DEFAULT_SUGGESTION_COUNT;
use crate::config::SuggestionsConfig;
use crate::domain::recipe::UserId;
use crate::errors::ApplicationError;
use crate::store::RecipeStore;

/// Request defaults and limits applied before the engine runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuggestionSettings {
    pub default_count: usize,
    pub max_count: usize,
    pub default_strategy: Strategy,
    pub random_seed: Option<u64>,
}

impl Default for SuggestionSettings {
    fn default() -> Self {
        Self {
            default_count: DEFAULT_SUGGESTION_COUNT,
            max_count: 20,
            default_strategy: Strategy::Balanced,
            random_seed: None,
        }
    }
}

impl From<&SuggestionsConfig> for SuggestionSettings {
    fn from(config: &SuggestionsConfig) -> Self {
        Self {
            default_count: config.default_count as usize,
            max_count: config.max_count as usize,
            default_strategy: config.default_strategy,
            random_seed: config.random_seed,
        }
    }
}

impl SuggestionSettings {
    /// Resolve a raw requested count: absent uses the default, negative
    /// becomes zero, anything above `max_count` is capped.
    pub fn resolve_count(&self, requested: Option<i64>) -> usize {
        match requested {
            None => self.default_count.min(self.max_count),
            Some(value) if value <= 0 => 0,
            Some(value) => usize::try_from(value).unwrap_or(usize::MAX).min(self.max_count),
        }
    }
}

pub struct SuggestionService<S> {
    store: S,
    settings: SuggestionSettings,
}

impl<S: RecipeStore> SuggestionService<S> {
    pub fn new(store: S, settings: SuggestionSettings) -> Self {
        Self { store, settings }
    }

    pub fn settings(&self) -> &SuggestionSettings {
        &self.settings
    }

    /// Load the user's recipes and suggest what to cook next.
    ///
    /// `strategy` falls back to the configured default. A seed on `options`
    /// wins over the configured seed.
    pub async fn suggest_for_user(
        &self,
        user_id: &UserId,
        requested: Option<i64>,
        strategy: Option<Strategy>,
        mut options: SuggestionOptions,
    ) -> Result<SuggestionReport, ApplicationError> {
        let recipes = self.store.recipes_for_user(user_id).await?;
        let count = self.settings.resolve_count(requested);

        options.strategy = strategy.unwrap_or(self.settings.default_strategy);
        if options.random_seed.is_none() {
            options.random_seed = self.settings.random_seed;
        }

        let suggestions = SuggestionEngine::new().suggest(&recipes, count, &options);

        tracing::info!(
            event_name = "suggestions.request",
            user_id = %user_id.0,
            strategy = %options.strategy,
            requested_count = count,
            returned = suggestions.len(),
            total_recipes = recipes.len(),
            "served recipe suggestions"
        );

        Ok(SuggestionReport { suggestions, total_recipes: recipes.len(), requested_count: count })
    }
}
