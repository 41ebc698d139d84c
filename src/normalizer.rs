//! Turns loosely-shaped provider records into canonical [`Recipe`]s.

use serde_json::Value;

use crate::model::Recipe;
use crate::parser::RawRecipeRecord;

pub const DEFAULT_TITLE: &str = "Untitled Recipe";
pub const DEFAULT_DIFFICULTY: &str = "Medium";
pub const DEFAULT_INSTRUCTION: &str = "No steps were provided for this recipe.";

const ID_KEYS: &[&str] = &["id"];
const TITLE_KEYS: &[&str] = &["title", "name"];
const DESCRIPTION_KEYS: &[&str] = &["description", "summary"];
const COOK_TIME_KEYS: &[&str] = &["cookTime", "cook_time", "cookingTime", "cooking_time", "time"];
const DIFFICULTY_KEYS: &[&str] = &["difficulty"];
const INGREDIENT_KEYS: &[&str] = &["ingredients"];
const INSTRUCTION_KEYS: &[&str] = &["instructions", "steps"];
const IMAGE_KEYS: &[&str] = &["imageUrl", "image_url", "image"];

/// Normalize every record, in order. Never drops a record.
///
/// Records without an image get `image_pool[i % len]`; an empty pool leaves
/// the url empty, which the catalog loader rules out for the process pool.
pub fn normalize(records: Vec<RawRecipeRecord>, image_pool: &[String]) -> Vec<Recipe> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| normalize_record(index, record, image_pool))
        .collect()
}

fn normalize_record(index: usize, record: &RawRecipeRecord, image_pool: &[String]) -> Recipe {
    let id = text_field(record, ID_KEYS).unwrap_or_else(|| format!("recipe-{}", index + 1));
    let title = text_field(record, TITLE_KEYS).unwrap_or_else(|| DEFAULT_TITLE.to_string());
    let mut instructions = list_field(record, INSTRUCTION_KEYS);
    if instructions.is_empty() {
        instructions.push(DEFAULT_INSTRUCTION.to_string());
    }
    let image_url = text_field(record, IMAGE_KEYS).unwrap_or_else(|| {
        if image_pool.is_empty() {
            String::new()
        } else {
            image_pool[index % image_pool.len()].clone()
        }
    });

    Recipe {
        id,
        title,
        description: text_field(record, DESCRIPTION_KEYS).unwrap_or_default(),
        cook_time: cook_time_field(record).unwrap_or_default(),
        difficulty: text_field(record, DIFFICULTY_KEYS)
            .unwrap_or_else(|| DEFAULT_DIFFICULTY.to_string()),
        ingredients: list_field(record, INGREDIENT_KEYS),
        instructions,
        image_url,
    }
}

/// First non-empty value among `keys`, rendered as text.
fn text_field(record: &RawRecipeRecord, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .filter_map(scalar_text)
        .find(|text| !text.is_empty())
}

/// Cook time also accepts a bare number of minutes.
fn cook_time_field(record: &RawRecipeRecord) -> Option<String> {
    COOK_TIME_KEYS
        .iter()
        .filter_map(|key| record.get(*key))
        .find_map(|value| match value {
            Value::Number(n) => Some(format!("{} mins", n)),
            other => scalar_text(other).filter(|text| !text.is_empty()),
        })
}

fn list_field(record: &RawRecipeRecord, keys: &[&str]) -> Vec<String> {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .map(list_items)
        .find(|items| !items.is_empty())
        .unwrap_or_default()
}

fn list_items(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(scalar_text)
            .filter(|item| !item.is_empty())
            .collect(),
        Value::String(text) => text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
