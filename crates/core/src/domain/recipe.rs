use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const MILLIS_PER_DAY: u64 = 24 * 60 * 60 * 1000;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(pub String);

impl From<&str> for RecipeId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for RecipeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for RecipeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// One line of a shopping or recipe ingredient list.
///
/// `quantity` is free text ("2", "1/2", "to taste"); numeric handling is
/// best-effort and happens during consolidation only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub quantity: String,
    pub unit: String,
}

impl Ingredient {
    pub fn new(
        name: impl Into<String>,
        quantity: impl Into<String>,
        unit: impl Into<String>,
    ) -> Self {
        Self { name: name.into(), quantity: quantity.into(), unit: unit.into() }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: RecipeId,
    pub user_id: UserId,
    pub name: String,
    pub raw_ingredients: String,
    #[serde(default)]
    pub parsed_ingredients: Option<Vec<Ingredient>>,
    #[serde(default)]
    pub primary_protein: Option<String>,
    #[serde(default)]
    pub primary_carbohydrate: Option<String>,
    #[serde(default)]
    pub primary_vegetable: Option<String>,
    #[serde(default)]
    pub last_ordered_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub total_orders: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Lower-cased, non-empty primary category tags of a recipe.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CategoryTags {
    pub protein: Option<String>,
    pub carbohydrate: Option<String>,
    pub vegetable: Option<String>,
}

impl Recipe {
    pub fn new(
        id: impl Into<String>,
        user_id: impl Into<String>,
        name: impl Into<String>,
        raw_ingredients: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: RecipeId(id.into()),
            user_id: UserId(user_id.into()),
            name: name.into(),
            raw_ingredients: raw_ingredients.into(),
            parsed_ingredients: None,
            primary_protein: None,
            primary_carbohydrate: None,
            primary_vegetable: None,
            last_ordered_at: None,
            total_orders: 0,
            created_at,
            updated_at: created_at,
        }
    }

    /// Parsed ingredient list, or an empty slice when the recipe was never parsed.
    pub fn ingredients(&self) -> &[Ingredient] {
        self.parsed_ingredients.as_deref().unwrap_or_default()
    }

    pub fn has_been_ordered(&self) -> bool {
        self.last_ordered_at.is_some()
    }

    /// Whole days between `now` and the last order, rounded up.
    ///
    /// Returns `None` for recipes that were never ordered. The difference is
    /// absolute, so a timestamp slightly in the future still counts as recent.
    pub fn days_since_last_order(&self, now: DateTime<Utc>) -> Option<u64> {
        self.last_ordered_at.map(|ordered_at| {
            let millis = (now - ordered_at).num_milliseconds().unsigned_abs();
            millis.div_ceil(MILLIS_PER_DAY)
        })
    }

    pub fn category_tags(&self) -> CategoryTags {
        CategoryTags {
            protein: normalized_tag(self.primary_protein.as_deref()),
            carbohydrate: normalized_tag(self.primary_carbohydrate.as_deref()),
            vegetable: normalized_tag(self.primary_vegetable.as_deref()),
        }
    }

    /// True when protein, carbohydrate and vegetable are all tagged.
    pub fn is_complete_meal(&self) -> bool {
        let tags = self.category_tags();
        tags.protein.is_some() && tags.carbohydrate.is_some() && tags.vegetable.is_some()
    }

    /// Store the output of the ingredient parser on this recipe.
    pub fn apply_parsed(&mut self, parsed: ParsedRecipeData, updated_at: DateTime<Utc>) {
        self.parsed_ingredients = Some(parsed.ingredients);
        self.primary_protein = non_empty(parsed.primary_protein);
        self.primary_carbohydrate = non_empty(parsed.primary_carbohydrate);
        self.primary_vegetable = non_empty(parsed.primary_vegetable);
        self.updated_at = updated_at;
    }
}

/// Structured result produced by the external ingredient parser.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedRecipeData {
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub primary_protein: String,
    #[serde(default)]
    pub primary_carbohydrate: String,
    #[serde(default)]
    pub primary_vegetable: String,
    #[serde(default)]
    pub is_valid_meal: bool,
}

impl ParsedRecipeData {
    /// A meal needs at least two of protein, carbohydrate and vegetable.
    pub fn has_meal_shape(&self) -> bool {
        [&self.primary_protein, &self.primary_carbohydrate, &self.primary_vegetable]
            .iter()
            .filter(|tag| !tag.trim().is_empty())
            .count()
            >= 2
    }
}

fn normalized_tag(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|tag| !tag.is_empty()).map(str::to_lowercase)
}

fn non_empty(value: String) -> Option<String> {
    (!value.trim().is_empty()).then_some(value)
}
