//! Grocery list consolidation
//!
//! Merges the ingredient lists of the recipes a user picked into a single
//! shopping list. Quantities with a shared unit are summed; a second unit for
//! the same ingredient is appended as text instead.

use std::collections::BTreeMap;

use crate::domain::recipe::{Ingredient, Recipe};

#[derive(Debug)]
struct Line {
    quantity: String,
    unit: String,
    mixed_units: bool,
}

/// Merge duplicate ingredients, sorted by lower-cased name.
///
/// Names are grouped trimmed and lower-cased, and that normalized form is the
/// name emitted. The first unit seen for a name becomes the line's unit.
/// Non-numeric quantities count as zero when summed.
pub fn consolidate(ingredients: &[Ingredient]) -> Vec<Ingredient> {
    let mut lines: BTreeMap<String, Line> = BTreeMap::new();

    for ingredient in ingredients {
        let name = ingredient.name.trim().to_lowercase();

        match lines.get_mut(&name) {
            None => {
                lines.insert(
                    name,
                    Line {
                        quantity: ingredient.quantity.clone(),
                        unit: ingredient.unit.clone(),
                        mixed_units: false,
                    },
                );
            }
            Some(line) if !line.mixed_units && line.unit == ingredient.unit => {
                let total = parse_quantity(&line.quantity) + parse_quantity(&ingredient.quantity);
                line.quantity = total.to_string();
            }
            Some(line) => {
                line.mixed_units = true;
                line.quantity =
                    format!("{} + {} {}", line.quantity, ingredient.quantity, ingredient.unit);
            }
        }
    }

    let consolidated: Vec<Ingredient> = lines
        .into_iter()
        .map(|(name, line)| Ingredient { name, quantity: line.quantity, unit: line.unit })
        .collect();

    tracing::debug!(
        event_name = "grocery.consolidated",
        input_count = ingredients.len(),
        output_count = consolidated.len(),
        "consolidated grocery list"
    );

    consolidated
}

/// Shopping list for a set of recipes, built from their parsed ingredients
pub fn grocery_list<'a>(recipes: impl IntoIterator<Item = &'a Recipe>) -> Vec<Ingredient> {
    let ingredients: Vec<Ingredient> =
        recipes.into_iter().flat_map(|recipe| recipe.ingredients().iter().cloned()).collect();
    consolidate(&ingredients)
}

/// Product search text for a grocery line, as sent to the cart provider.
///
/// Renders `"{quantity} {unit} {name}"` and drops a leading
/// `<digits> <word> ` prefix, so `"2 cups rice"` searches for `"rice"`.
pub fn cart_search_term(item: &Ingredient) -> String {
    let line = format!("{} {} {}", item.quantity, item.unit, item.name);
    strip_quantity_prefix(&line).trim().to_owned()
}

/// Leading numeric value of a quantity, or zero when there is none.
///
/// Takes the longest prefix of the form `[+-]digits[.digits][(e|E)[+-]digits]`,
/// so `"2 large"` is 2 and `"1e3"` is 1000. An exponent marker without digits
/// after it is left out of the prefix.
fn parse_quantity(quantity: &str) -> f64 {
    let trimmed = quantity.trim_start();
    let bytes = trimmed.as_bytes();
    let digits_from = |start: usize| {
        bytes[start..].iter().take_while(|byte| byte.is_ascii_digit()).count()
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let mut mantissa_digits = digits_from(end);
    end += mantissa_digits;
    if bytes.get(end) == Some(&b'.') {
        let fraction = digits_from(end + 1);
        mantissa_digits += fraction;
        end += 1 + fraction;
    }
    if mantissa_digits == 0 {
        return 0.0;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exponent = digits_from(end + 1 + sign);
        if exponent > 0 {
            end += 1 + sign + exponent;
        }
    }

    trimmed[..end].parse::<f64>().unwrap_or(0.0)
}

fn strip_quantity_prefix(line: &str) -> &str {
    fn is_word(ch: char) -> bool {
        ch.is_ascii_alphanumeric() || ch == '_'
    }

    let digits = line.len() - line.trim_start_matches(|ch: char| ch.is_ascii_digit()).len();
    if digits == 0 {
        return line;
    }
    let rest = &line[digits..];

    let after_space = rest.trim_start();
    if after_space.len() == rest.len() {
        return line;
    }

    let after_word = after_space.trim_start_matches(is_word);
    if after_word.len() == after_space.len() {
        return line;
    }

    let remainder = after_word.trim_start();
    if remainder.len() == after_word.len() {
        return line;
    }
    remainder
}
