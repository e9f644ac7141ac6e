//! Suggestion Engine implementation

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::diversity::select_diverse;
use super::scoring::ScoreCalculator;
use super::types::*;
use super::{FALLBACK_SCORE_CEILING, SORT_JITTER};
use crate::domain::recipe::Recipe;

/// The main suggestion engine.
///
/// Carries only its random source; every call is independent. Callers that
/// want "show me different ones" pass the previously shown ids through
/// [`SuggestionOptions::exclude_recipe_ids`].
#[derive(Debug, Clone)]
pub struct SuggestionEngine<R = StdRng> {
    rng: R,
}

impl SuggestionEngine<StdRng> {
    /// Create an engine backed by an entropy-seeded generator
    pub fn new() -> Self {
        Self { rng: StdRng::from_entropy() }
    }

    /// Create a deterministic engine
    pub fn seeded(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }
}

impl Default for SuggestionEngine<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> SuggestionEngine<R> {
    /// Create an engine around a caller-supplied random source
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Suggest up to `count` recipes to cook next
    pub fn suggest(
        &mut self,
        recipes: &[Recipe],
        count: usize,
        options: &SuggestionOptions,
    ) -> Vec<RecipeSuggestion> {
        self.suggest_at(recipes, count, options, Utc::now())
    }

    /// Same as [`suggest`](Self::suggest) with an explicit reference time
    pub fn suggest_at(
        &mut self,
        recipes: &[Recipe],
        count: usize,
        options: &SuggestionOptions,
        now: DateTime<Utc>,
    ) -> Vec<RecipeSuggestion> {
        let calculator = ScoreCalculator::at(now);
        match options.random_seed {
            Some(seed) => {
                suggest_with(&mut StdRng::seed_from_u64(seed), &calculator, recipes, count, options)
            }
            None => suggest_with(&mut self.rng, &calculator, recipes, count, options),
        }
    }
}

fn suggest_with<R: Rng + ?Sized>(
    rng: &mut R,
    calculator: &ScoreCalculator,
    recipes: &[Recipe],
    count: usize,
    options: &SuggestionOptions,
) -> Vec<RecipeSuggestion> {
    if recipes.is_empty() || count == 0 {
        return Vec::new();
    }

    let available: Vec<&Recipe> = recipes
        .iter()
        .filter(|recipe| !options.exclude_recipe_ids.contains(&recipe.id))
        .collect();

    if available.is_empty() {
        tracing::debug!(
            event_name = "suggestions.fallback",
            pool_size = recipes.len(),
            excluded = options.exclude_recipe_ids.len(),
            "every recipe excluded, falling back to random selection"
        );
        return random_fallback(rng, recipes, count);
    }

    let strategy = options.strategy;
    let scored: Vec<RecipeSuggestion> = available
        .into_iter()
        .map(|recipe| RecipeSuggestion {
            recipe: recipe.clone(),
            score: calculator.score(recipe, strategy, rng),
            reason: calculator.reason(recipe, strategy).message().to_owned(),
        })
        .collect();

    let ranked = rank(rng, scored);
    let candidates = ranked.len();
    let selected =
        select_diverse(ranked.into_iter().map(|(_, suggestion)| suggestion).collect(), count);

    tracing::debug!(
        event_name = "suggestions.generated",
        strategy = %strategy,
        pool_size = recipes.len(),
        candidates,
        requested = count,
        returned = selected.len(),
        "recipe suggestions generated"
    );

    selected
}

/// Order scored suggestions best-first by `score` plus a fresh sort jitter.
///
/// The jitter is drawn once per suggestion, independent of the jitter already
/// inside `score`. Returns each suggestion with the key it was sorted by.
fn rank<R: Rng + ?Sized>(
    rng: &mut R,
    scored: Vec<RecipeSuggestion>,
) -> Vec<(f64, RecipeSuggestion)> {
    let mut ranked: Vec<(f64, RecipeSuggestion)> = scored
        .into_iter()
        .map(|suggestion| (suggestion.score + rng.gen_range(-SORT_JITTER..SORT_JITTER), suggestion))
        .collect();

    ranked.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    ranked
}

fn random_fallback<R: Rng + ?Sized>(
    rng: &mut R,
    recipes: &[Recipe],
    count: usize,
) -> Vec<RecipeSuggestion> {
    let mut shuffled: Vec<&Recipe> = recipes.iter().collect();
    shuffled.shuffle(rng);

    shuffled
        .into_iter()
        .take(count)
        .map(|recipe| RecipeSuggestion {
            recipe: recipe.clone(),
            score: rng.gen_range(0.0..FALLBACK_SCORE_CEILING),
            reason: SuggestionReason::RandomPick.message().to_owned(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::domain::recipe::RecipeId;

    const STRATEGIES: [Strategy; 4] =
        [Strategy::Balanced, Strategy::Random, Strategy::Fresh, Strategy::Favorites];

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 18, 0, 0).unwrap()
    }

    fn recipe(id: &str, tags: [&str; 3]) -> Recipe {
        let mut recipe = Recipe::new(id, "u1", format!("Recipe {id}"), "", now() - Duration::days(90));
        let tag = |value: &str| (!value.is_empty()).then(|| value.to_owned());
        recipe.primary_protein = tag(tags[0]);
        recipe.primary_carbohydrate = tag(tags[1]);
        recipe.primary_vegetable = tag(tags[2]);
        recipe
    }

    fn pool(size: usize) -> Vec<Recipe> {
        (0..size).map(|index| recipe(&format!("r{index}"), ["", "", ""])).collect()
    }

    fn ids(suggestions: &[RecipeSuggestion]) -> Vec<String> {
        suggestions.iter().map(|suggestion| suggestion.recipe.id.0.clone()).collect()
    }

    #[test]
    fn empty_pool_returns_nothing() {
        let mut engine = SuggestionEngine::seeded(1);
        for strategy in STRATEGIES {
            let options = SuggestionOptions::new().with_strategy(strategy);
            assert!(engine.suggest_at(&[], 5, &options, now()).is_empty());
        }
    }

    #[test]
    fn returns_requested_count_clamped_to_pool_size() {
        let mut engine = SuggestionEngine::seeded(42);
        let recipes = pool(6);

        for strategy in STRATEGIES {
            let options = SuggestionOptions::new().with_strategy(strategy);
            for count in 0..=8 {
                let suggestions = engine.suggest_at(&recipes, count, &options, now());
                assert_eq!(suggestions.len(), count.min(recipes.len()));

                let unique: HashSet<_> = ids(&suggestions).into_iter().collect();
                assert_eq!(unique.len(), suggestions.len(), "suggestions must not repeat");
            }
        }
    }

    #[test]
    fn never_ordered_pool_gets_never_tried_reason() {
        let mut engine = SuggestionEngine::seeded(5);
        let recipes = pool(5);

        let suggestions = engine.suggest_at(&recipes, 3, &SuggestionOptions::new(), now());

        assert_eq!(suggestions.len(), 3);
        for suggestion in &suggestions {
            assert_eq!(suggestion.reason, "You haven't tried this recipe yet!");
        }
    }

    #[test]
    fn single_recipe_pool_clamps_quota() {
        let mut engine = SuggestionEngine::seeded(5);
        let recipes = pool(1);

        let suggestions = engine.suggest_at(&recipes, 3, &SuggestionOptions::new(), now());
        assert_eq!(ids(&suggestions), vec!["r0".to_owned()]);
    }

    #[test]
    fn exclusions_are_honored_when_something_remains() {
        let mut engine = SuggestionEngine::seeded(9);
        let recipes = pool(5);
        let excluded = ["r0", "r2", "r4"];

        for strategy in STRATEGIES {
            let options = SuggestionOptions::new().with_strategy(strategy).excluding(excluded);
            for _ in 0..20 {
                let suggestions = engine.suggest_at(&recipes, 3, &options, now());
                assert_eq!(suggestions.len(), 2);
                for suggestion in &suggestions {
                    assert!(!options.exclude_recipe_ids.contains(&suggestion.recipe.id));
                }
            }
        }
    }

    #[test]
    fn excluding_everything_falls_back_to_full_pool() {
        let mut engine = SuggestionEngine::seeded(13);
        let recipes = pool(4);
        let options = SuggestionOptions::new().excluding(["r0", "r1", "r2", "r3"]);

        let suggestions = engine.suggest_at(&recipes, 3, &options, now());
        assert_eq!(suggestions.len(), 3);
        for suggestion in &suggestions {
            assert!(recipes.iter().any(|recipe| recipe.id == suggestion.recipe.id));
            assert_eq!(suggestion.reason, "Random selection for variety!");
            assert!((0.0..FALLBACK_SCORE_CEILING).contains(&suggestion.score));
        }

        let all = engine.suggest_at(&recipes, 10, &options, now());
        assert_eq!(all.len(), 4);
    }

    #[test]
    fn prefers_distinct_primary_ingredients_for_every_strategy() {
        let recipes = vec![
            recipe("chicken-rice", ["chicken", "rice", "broccoli"]),
            recipe("chicken-pasta", ["chicken", "pasta", "spinach"]),
            recipe("beef-rice", ["beef", "rice", "peppers"]),
            recipe("salmon-potato", ["salmon", "potato", "asparagus"]),
            recipe("tofu-noodles", ["tofu", "noodles", "bok choy"]),
            recipe("pork-bread", ["pork", "bread", "cabbage"]),
        ];
        let disjoint: HashSet<&str> =
            ["salmon-potato", "tofu-noodles", "pork-bread"].into_iter().collect();

        for strategy in STRATEGIES {
            let mut engine = SuggestionEngine::seeded(77);
            let options = SuggestionOptions::new().with_strategy(strategy);
            for _ in 0..25 {
                let suggestions = engine.suggest_at(&recipes, 3, &options, now());
                assert_eq!(suggestions.len(), 3);

                let mut proteins = HashSet::new();
                let mut carbs = HashSet::new();
                let mut veggies = HashSet::new();
                for suggestion in &suggestions {
                    let tags = suggestion.recipe.category_tags();
                    assert!(proteins.insert(tags.protein), "{strategy}: repeated protein");
                    assert!(carbs.insert(tags.carbohydrate), "{strategy}: repeated carb");
                    assert!(veggies.insert(tags.vegetable), "{strategy}: repeated vegetable");
                }

                let picked_disjoint = suggestions
                    .iter()
                    .filter(|suggestion| disjoint.contains(suggestion.recipe.id.0.as_str()))
                    .count();
                assert!(picked_disjoint >= 1);
            }
        }
    }

    #[test]
    fn seeded_options_make_runs_repeatable() {
        let recipes = pool(8);
        let options = SuggestionOptions::new().with_seed(1234);

        let first = SuggestionEngine::new().suggest_at(&recipes, 4, &options, now());
        let second = SuggestionEngine::new().suggest_at(&recipes, 4, &options, now());

        assert_eq!(ids(&first), ids(&second));
        assert_eq!(
            first.iter().map(|s| s.score).collect::<Vec<_>>(),
            second.iter().map(|s| s.score).collect::<Vec<_>>()
        );
    }

    #[test]
    fn repeated_unseeded_calls_vary_ordering() {
        let mut engine = SuggestionEngine::seeded(99);
        let recipes = pool(10);
        let options = SuggestionOptions::new();

        let orderings: HashSet<Vec<String>> = (0..30)
            .map(|_| ids(&engine.suggest_at(&recipes, 3, &options, now())))
            .collect();

        assert!(orderings.len() > 1, "jitter should vary the output across calls");
    }

    fn fixed(id: &str, score: f64) -> RecipeSuggestion {
        RecipeSuggestion { recipe: recipe(id, ["", "", ""]), score, reason: String::new() }
    }

    #[test]
    fn rank_adds_bounded_sort_jitter_on_top_of_score() {
        let mut rng = StdRng::seed_from_u64(31);
        let scored: Vec<_> = (0..50).map(|index| fixed(&format!("r{index}"), 100.0)).collect();

        let ranked = rank(&mut rng, scored);

        assert_eq!(ranked.len(), 50);
        for (key, suggestion) in &ranked {
            assert_eq!(suggestion.score, 100.0, "rank must not rewrite the score");
            assert!((key - suggestion.score).abs() < SORT_JITTER, "key {key} outside jitter");
        }
        assert!(ranked.iter().any(|(key, suggestion)| *key != suggestion.score));
        assert!(ranked.windows(2).all(|pair| pair[0].0 >= pair[1].0));

        let order: Vec<String> = ranked.iter().map(|(_, s)| s.recipe.id.0.clone()).collect();
        let input: Vec<String> = (0..50).map(|index| format!("r{index}")).collect();
        assert_ne!(order, input, "equal scores should be shuffled by the sort jitter");
    }

    #[test]
    fn sort_jitter_can_swap_close_scores_but_not_distant_ones() {
        let mut rng = StdRng::seed_from_u64(17);
        let mut close_swaps = 0;

        for _ in 0..300 {
            let close = rank(&mut rng, vec![fixed("high", 104.0), fixed("low", 100.0)]);
            if close[0].1.recipe.id.0 == "low" {
                close_swaps += 1;
            }

            let distant = rank(&mut rng, vec![fixed("low", 100.0), fixed("high", 111.0)]);
            assert_eq!(distant[0].1.recipe.id.0, "high");
        }

        assert!(close_swaps > 0, "a 4 point gap should sometimes flip under ±5 jitter");
    }

    #[test]
    fn recently_cooked_recipes_rank_lower_on_average() {
        let mut recipes = pool(2);
        recipes[0].last_ordered_at = Some(now() - Duration::days(2));
        recipes[0].total_orders = 6;
        let stale_id = RecipeId::from("r0");

        let mut engine = SuggestionEngine::seeded(21);
        let first_pick_stale = (0..200)
            .filter(|_| {
                let picked = engine.suggest_at(&recipes, 1, &SuggestionOptions::new(), now());
                picked[0].recipe.id == stale_id
            })
            .count();

        assert_eq!(first_pick_stale, 0);
    }
}
