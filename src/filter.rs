//! Browsing helpers over a loaded collection: ordering, attribute
//! filtering, and the free-text time parse backing the time filter.

use crate::model::Recipe;

/// Sort a collection alphabetically by title, case-insensitive.
pub fn sort_by_title(recipes: &mut [Recipe]) {
    recipes.sort_by_key(|recipe| recipe.title.to_lowercase());
}

/// Keep only recipes tagged with `attribute` (case-insensitive).
pub fn by_attribute(recipes: Vec<Recipe>, attribute: &str) -> Vec<Recipe> {
    recipes
        .into_iter()
        .filter(|recipe| recipe.has_attribute(attribute))
        .collect()
}

/// Keep only recipes whose `time` parses to at most `max` minutes.
/// Records without a parseable time are dropped: an unknown duration
/// cannot satisfy a time limit.
pub fn by_max_minutes(recipes: Vec<Recipe>, max: u32) -> Vec<Recipe> {
    recipes
        .into_iter()
        .filter(|recipe| {
            recipe
                .time
                .as_deref()
                .and_then(parse_minutes)
                .map(|minutes| minutes <= max)
                .unwrap_or(false)
        })
        .collect()
}

/// Pull a total minute count out of a free-text duration.
///
/// Accepts plain counts ("90"), unit-tagged text ("45 min", "1 h 30 min",
/// "2 hours") and the ISO-8601 durations found in structured data
/// ("PT1H30M"). Numbers without a recognizable unit count as minutes.
/// Returns `None` when the text contains no number at all.
pub fn parse_minutes(text: &str) -> Option<u32> {
    let mut total: u64 = 0;
    let mut seen = false;

    let mut chars = text.chars().peekable();
    while let Some(&c) = chars.peek() {
        if !c.is_ascii_digit() {
            chars.next();
            continue;
        }

        let mut value: u64 = 0;
        while let Some(digit) = chars.peek().and_then(|d| d.to_digit(10)) {
            value = value.saturating_mul(10).saturating_add(digit as u64);
            chars.next();
        }

        while chars.peek().map(|c| c.is_whitespace()).unwrap_or(false) {
            chars.next();
        }
        let mut unit = String::new();
        while let Some(&c) = chars.peek() {
            if c.is_alphabetic() {
                unit.push(c);
                chars.next();
            } else {
                break;
            }
        }

        total = total.saturating_add(value.saturating_mul(unit_minutes(&unit) as u64));
        seen = true;
    }

    if seen {
        Some(total.min(u32::MAX as u64) as u32)
    } else {
        None
    }
}

/// Minutes per one of `unit`. Unrecognized units (including none at all)
/// count as minutes; seconds round down to nothing.
fn unit_minutes(unit: &str) -> u32 {
    match unit.to_lowercase().as_str() {
        "d" | "day" | "days" => 24 * 60,
        "h" | "hr" | "hrs" | "hour" | "hours" => 60,
        "s" | "sec" | "secs" | "second" | "seconds" => 0,
        _ => 1,
    }
}
