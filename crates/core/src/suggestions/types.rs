//! Types for the Suggestion Engine

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::recipe::{Recipe, RecipeId};
use crate::errors::DomainError;

/// Named scoring policy
///
/// Serializes as the lower-case name; deserializes through [`FromStr`], so
/// config files accept any casing.
///
/// [`FromStr`]: std::str::FromStr
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Recency and variety modifiers only
    #[default]
    Balanced,
    /// Uniform random score, ignores recipe attributes
    Random,
    /// Favors never-ordered and long-ago recipes
    Fresh,
    /// Favors frequently ordered recipes
    Favorites,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Balanced => "balanced",
            Strategy::Random => "random",
            Strategy::Fresh => "fresh",
            Strategy::Favorites => "favorites",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Strategy {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "balanced" => Ok(Self::Balanced),
            "random" => Ok(Self::Random),
            "fresh" => Ok(Self::Fresh),
            "favorites" => Ok(Self::Favorites),
            other => Err(DomainError::InvalidStrategy(other.to_owned())),
        }
    }
}

impl<'de> Deserialize<'de> for Strategy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Per-call suggestion options
#[derive(Debug, Clone, Default)]
pub struct SuggestionOptions {
    /// Recipes to leave out, typically the ones already shown
    pub exclude_recipe_ids: HashSet<RecipeId>,
    /// Scoring strategy
    pub strategy: Strategy,
    /// Seed for a deterministic run
    pub random_seed: Option<u64>,
}

impl SuggestionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the scoring strategy
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Exclude recipes by id
    pub fn excluding<I, T>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<RecipeId>,
    {
        self.exclude_recipe_ids.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Make the run deterministic
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }
}

/// A recipe picked for the user, with its score and a short explanation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeSuggestion {
    pub recipe: Recipe,
    pub score: f64,
    pub reason: String,
}

/// Why a recipe was suggested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SuggestionReason {
    RandomPick,
    NeverTried,
    TrySomethingDifferent,
    ProvenFavorite,
    BuildingOnFavorites,
    LongTimeNoSee,
    OverAMonth,
    CoupleOfWeeks,
    NewerRecipe,
    ReliableFavorite,
}

impl SuggestionReason {
    /// Get human-readable message
    pub fn message(&self) -> &'static str {
        match self {
            SuggestionReason::RandomPick => "Random selection for variety!",
            SuggestionReason::NeverTried => "You haven't tried this recipe yet!",
            SuggestionReason::TrySomethingDifferent => "Time to try something different!",
            SuggestionReason::ProvenFavorite => "One of your proven favorites!",
            SuggestionReason::BuildingOnFavorites => "Building on what you love!",
            SuggestionReason::LongTimeNoSee => "You haven't made this in a while",
            SuggestionReason::OverAMonth => "Haven't had this in over a month",
            SuggestionReason::CoupleOfWeeks => "It's been a couple weeks",
            SuggestionReason::NewerRecipe => "One of your newer recipes",
            SuggestionReason::ReliableFavorite => "A reliable favorite",
        }
    }
}

/// Suggestions plus the numbers a caller needs for "N of M recipes considered"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionReport {
    pub suggestions: Vec<RecipeSuggestion>,
    pub total_recipes: usize,
    pub requested_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_parses_case_insensitively() {
        assert_eq!(" Fresh ".parse::<Strategy>(), Ok(Strategy::Fresh));
        assert_eq!("FAVORITES".parse::<Strategy>(), Ok(Strategy::Favorites));
        assert_eq!(
            "spicy".parse::<Strategy>(),
            Err(DomainError::InvalidStrategy("spicy".to_owned()))
        );
    }

    #[test]
    fn strategy_round_trips_through_display() {
        for strategy in [Strategy::Balanced, Strategy::Random, Strategy::Fresh, Strategy::Favorites]
        {
            assert_eq!(strategy.to_string().parse::<Strategy>(), Ok(strategy));
        }
        assert_eq!(Strategy::default(), Strategy::Balanced);
    }

    #[test]
    fn strategy_deserializes_any_casing_and_serializes_lower_case() {
        let parsed: Strategy = serde_json::from_str("\"Fresh\"").unwrap();
        assert_eq!(parsed, Strategy::Fresh);
        assert_eq!(serde_json::to_string(&Strategy::Favorites).unwrap(), "\"favorites\"");

        let error = serde_json::from_str::<Strategy>("\"spicy\"").unwrap_err();
        assert!(error.to_string().contains("unknown suggestion strategy `spicy`"));
    }

    #[test]
    fn options_builder_collects_exclusions() {
        let options = SuggestionOptions::new()
            .with_strategy(Strategy::Random)
            .excluding(["a", "b"])
            .excluding(vec!["a".to_owned()])
            .with_seed(7);

        assert_eq!(options.strategy, Strategy::Random);
        assert_eq!(options.exclude_recipe_ids.len(), 2);
        assert!(options.exclude_recipe_ids.contains(&RecipeId::from("b")));
        assert_eq!(options.random_seed, Some(7));
    }
}
