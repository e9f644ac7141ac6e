//! Greedy diversity-constrained selection

use std::collections::HashSet;

use super::types::RecipeSuggestion;

#[derive(Debug, Default)]
struct UsedCategories {
    proteins: HashSet<String>,
    carbohydrates: HashSet<String>,
    vegetables: HashSet<String>,
}

impl UsedCategories {
    fn conflicts_with(&self, suggestion: &RecipeSuggestion) -> bool {
        let tags = suggestion.recipe.category_tags();
        tags.protein.is_some_and(|tag| self.proteins.contains(&tag))
            || tags.carbohydrate.is_some_and(|tag| self.carbohydrates.contains(&tag))
            || tags.vegetable.is_some_and(|tag| self.vegetables.contains(&tag))
    }

    fn mark(&mut self, suggestion: &RecipeSuggestion) {
        let tags = suggestion.recipe.category_tags();
        if let Some(tag) = tags.protein {
            self.proteins.insert(tag);
        }
        if let Some(tag) = tags.carbohydrate {
            self.carbohydrates.insert(tag);
        }
        if let Some(tag) = tags.vegetable {
            self.vegetables.insert(tag);
        }
    }
}

/// Pick up to `count` suggestions from a list ranked best-first.
///
/// A candidate whose protein, carbohydrate or vegetable tag was already used
/// is skipped while enough candidates remain to fill the quota without it.
/// Once skipping would leave the result short, conflicting candidates are
/// accepted, so the output always holds `min(count, ranked.len())` entries.
/// Output keeps selection order.
pub fn select_diverse(ranked: Vec<RecipeSuggestion>, count: usize) -> Vec<RecipeSuggestion> {
    let total = ranked.len();
    let quota = count.min(total);
    let mut selected = Vec::with_capacity(quota);
    let mut used = UsedCategories::default();

    for (index, suggestion) in ranked.into_iter().enumerate() {
        if selected.len() >= quota {
            break;
        }

        let remaining_after = total - index - 1;
        let must_take = selected.len() + remaining_after < quota;

        if must_take || !used.conflicts_with(&suggestion) {
            used.mark(&suggestion);
            selected.push(suggestion);
        }
    }

    selected
}
