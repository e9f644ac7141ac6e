//! Recipe Suggestion Engine
//!
//! Picks a small, varied set of recipes to cook next from a user's recipe
//! history. Scoring is strategy driven, selection prefers recipes that do not
//! repeat a primary protein, carbohydrate or vegetable, and two independent
//! jitter terms keep repeated calls from returning the same list.

mod diversity;
mod engine;
mod scoring;
mod service;
mod types;

pub use diversity::select_diverse;
pub use engine::SuggestionEngine;
pub use scoring::ScoreCalculator;
pub use service::{SuggestionService, SuggestionSettings};
pub use types::*;

/// Starting score for every recipe before strategy modifiers
pub const BASE_SCORE: f64 = 100.0;

/// Half-width of the uniform jitter folded into non-random scores
pub const SCORE_JITTER: f64 = 10.0;

/// Half-width of the uniform jitter applied once when ranking
pub const SORT_JITTER: f64 = 5.0;

/// Upper bound (exclusive) of scores under the `random` strategy
pub const RANDOM_SCORE_CEILING: f64 = 200.0;

/// Upper bound (exclusive) of scores attached to fallback suggestions
pub const FALLBACK_SCORE_CEILING: f64 = 100.0;

/// Suggestions returned when the caller does not ask for a count
pub const DEFAULT_SUGGESTION_COUNT: usize = 3;
