//! Scoring algorithms for recipe suggestions

use chrono::{DateTime, Utc};
use rand::Rng;

use super::types::{Strategy, SuggestionReason};
use super::{BASE_SCORE, RANDOM_SCORE_CEILING, SCORE_JITTER};
use crate::domain::recipe::Recipe;

/// Score calculator for recipe suggestions.
///
/// Holds the reference time used for every "days since last order"
/// computation so one ranking pass sees a single consistent clock.
#[derive(Debug, Clone, Copy)]
pub struct ScoreCalculator {
    now: DateTime<Utc>,
}

impl ScoreCalculator {
    /// Create a calculator anchored at the current time
    pub fn new() -> Self {
        Self { now: Utc::now() }
    }

    /// Create a calculator anchored at a fixed time
    pub fn at(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Desirability score, never negative.
    ///
    /// `Random` ignores the recipe entirely. Every other strategy adds its own
    /// bonus on top of the shared balanced modifiers plus a uniform jitter.
    pub fn score<R: Rng + ?Sized>(&self, recipe: &Recipe, strategy: Strategy, rng: &mut R) -> f64 {
        if strategy == Strategy::Random {
            return rng.gen_range(0.0..RANDOM_SCORE_CEILING);
        }

        let jitter = rng.gen_range(-SCORE_JITTER..SCORE_JITTER);
        (self.base_score(recipe, strategy) + jitter).max(0.0)
    }

    /// Score without jitter and without the zero floor
    pub fn base_score(&self, recipe: &Recipe, strategy: Strategy) -> f64 {
        if strategy == Strategy::Random {
            return BASE_SCORE;
        }

        let days_since = recipe.days_since_last_order(self.now);

        BASE_SCORE
            + strategy_bonus(recipe, strategy, days_since)
            + recency_modifier(days_since)
            + order_variety_modifier(recipe.total_orders)
            + completeness_bonus(recipe)
    }

    /// Pick the explanation shown next to a suggestion
    pub fn reason(&self, recipe: &Recipe, strategy: Strategy) -> SuggestionReason {
        match strategy {
            Strategy::Random => SuggestionReason::RandomPick,
            Strategy::Fresh => {
                if recipe.has_been_ordered() {
                    SuggestionReason::TrySomethingDifferent
                } else {
                    SuggestionReason::NeverTried
                }
            }
            Strategy::Favorites => {
                if recipe.total_orders > 3 {
                    SuggestionReason::ProvenFavorite
                } else {
                    SuggestionReason::BuildingOnFavorites
                }
            }
            Strategy::Balanced => match recipe.days_since_last_order(self.now) {
                None => SuggestionReason::NeverTried,
                Some(days) if days > 60 => SuggestionReason::LongTimeNoSee,
                Some(days) if days > 30 => SuggestionReason::OverAMonth,
                Some(days) if days > 14 => SuggestionReason::CoupleOfWeeks,
                Some(_) if recipe.total_orders <= 2 => SuggestionReason::NewerRecipe,
                Some(_) => SuggestionReason::ReliableFavorite,
            },
        }
    }
}

impl Default for ScoreCalculator {
    fn default() -> Self {
        Self::new()
    }
}

/// Strategy-specific additions layered over the balanced modifiers
pub(crate) fn strategy_bonus(recipe: &Recipe, strategy: Strategy, days_since: Option<u64>) -> f64 {
    match strategy {
        Strategy::Fresh => {
            let recency = match days_since {
                None => 50.0,
                Some(days) => days.min(100) as f64,
            };
            let untried = if recipe.total_orders == 0 { 30.0 } else { 0.0 };
            recency + untried
        }
        Strategy::Favorites => {
            let frequency = f64::from(recipe.total_orders) * 10.0;
            let recent = match days_since {
                Some(days) if days < 30 => 20.0,
                _ => 0.0,
            };
            frequency + recent
        }
        Strategy::Balanced | Strategy::Random => 0.0,
    }
}

/// Penalize recently cooked recipes, reward ones not seen for a month or more
pub(crate) fn recency_modifier(days_since: Option<u64>) -> f64 {
    match days_since {
        None => 30.0,
        Some(days) if days < 7 => -50.0,
        Some(days) if days < 14 => -25.0,
        Some(days) if days < 30 => -10.0,
        Some(_) => 20.0,
    }
}

/// Less frequently ordered recipes get a boost
pub(crate) fn order_variety_modifier(total_orders: u32) -> f64 {
    match total_orders {
        0 => 25.0,
        1 => 15.0,
        2 => 10.0,
        3 | 4 => 0.0,
        _ => -10.0,
    }
}

pub(crate) fn completeness_bonus(recipe: &Recipe) -> f64 {
    if recipe.is_complete_meal() {
        10.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 18, 0, 0).unwrap()
    }

    fn recipe(days_ago: Option<i64>, total_orders: u32) -> Recipe {
        let mut recipe = Recipe::new("r1", "u1", "Tacos", "tortillas, beef", now() - Duration::days(400));
        recipe.last_ordered_at = days_ago.map(|days| now() - Duration::days(days));
        recipe.total_orders = total_orders;
        recipe
    }

    fn complete(mut recipe: Recipe) -> Recipe {
        recipe.primary_protein = Some("Beef".to_owned());
        recipe.primary_carbohydrate = Some("Tortilla".to_owned());
        recipe.primary_vegetable = Some("Lettuce".to_owned());
        recipe
    }

    #[test]
    fn balanced_base_score_layers_recency_variety_and_completeness() {
        let calculator = ScoreCalculator::at(now());

        assert_eq!(calculator.base_score(&complete(recipe(None, 0)), Strategy::Balanced), 165.0);
        assert_eq!(calculator.base_score(&recipe(Some(3), 1), Strategy::Balanced), 65.0);
        assert_eq!(calculator.base_score(&recipe(Some(10), 2), Strategy::Balanced), 85.0);
        assert_eq!(calculator.base_score(&recipe(Some(20), 3), Strategy::Balanced), 90.0);
        assert_eq!(calculator.base_score(&recipe(Some(45), 8), Strategy::Balanced), 110.0);
    }

    #[test]
    fn fresh_adds_capped_staleness_on_top_of_balanced() {
        let calculator = ScoreCalculator::at(now());

        // 100 + 50 + 30 (fresh) + 30 + 25 (balanced)
        assert_eq!(calculator.base_score(&recipe(None, 0), Strategy::Fresh), 235.0);
        // 100 + 100 (capped) + 20 + 0
        assert_eq!(calculator.base_score(&recipe(Some(365), 4), Strategy::Fresh), 220.0);
        // 100 + 40 + 20 - 10
        assert_eq!(calculator.base_score(&recipe(Some(40), 6), Strategy::Fresh), 150.0);
    }

    #[test]
    fn favorites_rewards_order_count_and_recent_orders() {
        let calculator = ScoreCalculator::at(now());

        // 100 + 40 + 20 (favorites) - 25 (recency)
        assert_eq!(calculator.base_score(&recipe(Some(10), 4), Strategy::Favorites), 135.0);
        // 100 + 60 + 0 + 20 - 10
        assert_eq!(calculator.base_score(&recipe(Some(90), 6), Strategy::Favorites), 170.0);
        // never ordered: 100 + 0 + 30 + 25
        assert_eq!(calculator.base_score(&recipe(None, 0), Strategy::Favorites), 155.0);
    }

    #[test]
    fn jittered_score_stays_within_bounds_and_is_floored() {
        let calculator = ScoreCalculator::at(now());
        let mut rng = StdRng::seed_from_u64(11);
        let fresh = complete(recipe(None, 0));
        let stale = recipe(Some(1), 12);

        for _ in 0..500 {
            let score = calculator.score(&fresh, Strategy::Balanced, &mut rng);
            assert!((155.0..175.0).contains(&score), "score {score} out of jitter range");

            // 100 - 50 - 10 = 40, never pushed below zero
            let low = calculator.score(&stale, Strategy::Balanced, &mut rng);
            assert!(low >= 0.0);
        }
    }

    #[test]
    fn random_strategy_ignores_recipe_attributes() {
        let calculator = ScoreCalculator::at(now());
        let mut rng = StdRng::seed_from_u64(3);
        let recipe = complete(recipe(Some(2), 50));

        for _ in 0..500 {
            let score = calculator.score(&recipe, Strategy::Random, &mut rng);
            assert!((0.0..RANDOM_SCORE_CEILING).contains(&score));
        }
        assert_eq!(calculator.reason(&recipe, Strategy::Random), SuggestionReason::RandomPick);
    }

    #[test]
    fn never_ordered_outscores_recent_order_on_average() {
        let calculator = ScoreCalculator::at(now());
        let mut rng = StdRng::seed_from_u64(2024);
        let untried = recipe(None, 0);
        let recent = recipe(Some(3), 0);
        let trials = 1_000;

        let (mut untried_total, mut recent_total) = (0.0, 0.0);
        for _ in 0..trials {
            untried_total += calculator.score(&untried, Strategy::Balanced, &mut rng);
            recent_total += calculator.score(&recent, Strategy::Balanced, &mut rng);
        }

        assert!(untried_total / trials as f64 > recent_total / trials as f64 + 50.0);
    }

    #[test]
    fn balanced_reasons_follow_priority_order() {
        let calculator = ScoreCalculator::at(now());
        let reason = |days: Option<i64>, orders: u32| {
            calculator.reason(&recipe(days, orders), Strategy::Balanced)
        };

        assert_eq!(reason(None, 0), SuggestionReason::NeverTried);
        assert_eq!(reason(Some(61), 9), SuggestionReason::LongTimeNoSee);
        assert_eq!(reason(Some(60), 9), SuggestionReason::OverAMonth);
        assert_eq!(reason(Some(31), 1), SuggestionReason::OverAMonth);
        assert_eq!(reason(Some(15), 1), SuggestionReason::CoupleOfWeeks);
        assert_eq!(reason(Some(14), 2), SuggestionReason::NewerRecipe);
        assert_eq!(reason(Some(5), 3), SuggestionReason::ReliableFavorite);
        assert_eq!(
            SuggestionReason::NeverTried.message(),
            "You haven't tried this recipe yet!"
        );
    }

    #[test]
    fn fresh_and_favorites_reasons() {
        let calculator = ScoreCalculator::at(now());

        assert_eq!(
            calculator.reason(&recipe(None, 0), Strategy::Fresh),
            SuggestionReason::NeverTried
        );
        assert_eq!(
            calculator.reason(&recipe(Some(2), 1), Strategy::Fresh),
            SuggestionReason::TrySomethingDifferent
        );
        assert_eq!(
            calculator.reason(&recipe(Some(2), 4), Strategy::Favorites),
            SuggestionReason::ProvenFavorite
        );
        assert_eq!(
            calculator.reason(&recipe(Some(2), 3), Strategy::Favorites),
            SuggestionReason::BuildingOnFavorites
        );
    }

    #[test]
    fn variety_modifier_table() {
        assert_eq!(order_variety_modifier(0), 25.0);
        assert_eq!(order_variety_modifier(1), 15.0);
        assert_eq!(order_variety_modifier(2), 10.0);
        assert_eq!(order_variety_modifier(4), 0.0);
        assert_eq!(order_variety_modifier(5), -10.0);
        assert_eq!(recency_modifier(Some(29)), -10.0);
        assert_eq!(recency_modifier(Some(30)), 20.0);
    }
}
