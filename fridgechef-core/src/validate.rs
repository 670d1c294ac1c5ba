//! Structural validation of decoded recipe payloads.
//!
//! This is the mandatory gate between decoding an inference response and using
//! it: the response shape the service was asked for is never trusted. Policy is
//! strict, one malformed entry rejects the whole collection. Unknown fields are
//! ignored for forward compatibility.

use serde_json::{Map, Value};

use crate::error::ValidateError;
use crate::types::{Difficulty, Ingredient, Recipe};

/// Validate a decoded payload against the recipe collection shape.
///
/// Returns the typed collection, or the first violation found. A successful
/// collection is non-empty and every entry carries all required fields.
pub fn validate_recipe_collection(payload: &Value) -> Result<Vec<Recipe>, ValidateError> {
    let entries = payload.as_array().ok_or(ValidateError::NotAnArray)?;

    if entries.is_empty() {
        return Err(ValidateError::EmptyCollection);
    }

    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| validate_recipe(entry, &format!("recipes[{}]", i)))
        .collect()
}

fn validate_recipe(value: &Value, path: &str) -> Result<Recipe, ValidateError> {
    let obj = as_object(value, path)?;

    let name = str_field(obj, path, "recipeName")?;
    let description = str_field(obj, path, "description")?;

    let difficulty_raw = str_field(obj, path, "difficulty")?;
    let difficulty = Difficulty::parse(&difficulty_raw).ok_or_else(|| ValidateError::InvalidValue {
        path: format!("{}.difficulty", path),
        value: difficulty_raw,
    })?;

    let prep_time = str_field(obj, path, "prepTime")?;
    let calories = u32_field(obj, path, "calories")?;

    let ingredients_path = format!("{}.ingredients", path);
    let ingredients_raw = array_field(obj, path, "ingredients")?;
    if ingredients_raw.is_empty() {
        return Err(ValidateError::EmptyField {
            path: ingredients_path,
        });
    }
    let ingredients = ingredients_raw
        .iter()
        .enumerate()
        .map(|(i, entry)| validate_ingredient(entry, &format!("{}[{}]", ingredients_path, i)))
        .collect::<Result<Vec<_>, _>>()?;

    let instructions_path = format!("{}.instructions", path);
    let instructions_raw = array_field(obj, path, "instructions")?;
    if instructions_raw.is_empty() {
        return Err(ValidateError::EmptyField {
            path: instructions_path,
        });
    }
    let instructions = instructions_raw
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            entry
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| ValidateError::WrongType {
                    path: format!("{}[{}]", instructions_path, i),
                    expected: "string",
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    // Optional; absent and empty are equivalent.
    let dietary_tags = match obj.get("dietaryTags") {
        None | Some(Value::Null) => Vec::new(),
        Some(value) => {
            let tags_path = format!("{}.dietaryTags", path);
            let tags = value.as_array().ok_or_else(|| ValidateError::WrongType {
                path: tags_path.clone(),
                expected: "array of strings",
            })?;
            tags.iter()
                .enumerate()
                .map(|(i, tag)| {
                    tag.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| ValidateError::WrongType {
                            path: format!("{}[{}]", tags_path, i),
                            expected: "string",
                        })
                })
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    Ok(Recipe {
        name,
        description,
        difficulty,
        prep_time,
        calories,
        ingredients,
        instructions,
        dietary_tags,
    })
}

fn validate_ingredient(value: &Value, path: &str) -> Result<Ingredient, ValidateError> {
    let obj = as_object(value, path)?;

    Ok(Ingredient {
        name: str_field(obj, path, "name")?,
        quantity: str_field(obj, path, "quantity")?,
        in_fridge: bool_field(obj, path, "inFridge")?,
    })
}

fn as_object<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>, ValidateError> {
    value.as_object().ok_or_else(|| ValidateError::WrongType {
        path: path.to_string(),
        expected: "object",
    })
}

fn field<'a>(
    obj: &'a Map<String, Value>,
    path: &str,
    name: &str,
) -> Result<&'a Value, ValidateError> {
    obj.get(name)
        .ok_or_else(|| ValidateError::MissingField(format!("{}.{}", path, name)))
}

fn str_field(obj: &Map<String, Value>, path: &str, name: &str) -> Result<String, ValidateError> {
    field(obj, path, name)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ValidateError::WrongType {
            path: format!("{}.{}", path, name),
            expected: "string",
        })
}

fn u32_field(obj: &Map<String, Value>, path: &str, name: &str) -> Result<u32, ValidateError> {
    field(obj, path, name)?
        .as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| ValidateError::WrongType {
            path: format!("{}.{}", path, name),
            expected: "non-negative integer",
        })
}

fn bool_field(obj: &Map<String, Value>, path: &str, name: &str) -> Result<bool, ValidateError> {
    field(obj, path, name)?
        .as_bool()
        .ok_or_else(|| ValidateError::WrongType {
            path: format!("{}.{}", path, name),
            expected: "boolean",
        })
}

fn array_field<'a>(
    obj: &'a Map<String, Value>,
    path: &str,
    name: &str,
) -> Result<&'a Vec<Value>, ValidateError> {
    field(obj, path, name)?
        .as_array()
        .ok_or_else(|| ValidateError::WrongType {
            path: format!("{}.{}", path, name),
            expected: "array",
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_payload() -> Value {
        json!([
            {
                "recipeName": "Veggie Omelette",
                "description": "A fluffy omelette with spinach and cheese",
                "difficulty": "Easy",
                "prepTime": "15 mins",
                "calories": 320,
                "ingredients": [
                    {"name": "Eggs", "quantity": "3", "inFridge": true},
                    {"name": "Spinach", "quantity": "1 handful", "inFridge": true},
                    {"name": "Feta", "quantity": "50g", "inFridge": false}
                ],
                "instructions": ["Whisk the eggs.", "Cook gently.", "Fold and serve."],
                "dietaryTags": ["Vegetarian"]
            },
            {
                "recipeName": "Chicken Stir Fry",
                "description": "Quick weeknight stir fry",
                "difficulty": "Medium",
                "prepTime": "25 mins",
                "calories": 450,
                "ingredients": [
                    {"name": "Chicken breast", "quantity": "2", "inFridge": true},
                    {"name": "Soy sauce", "quantity": "2 tbsp", "inFridge": false}
                ],
                "instructions": ["Slice the chicken.", "Fry on high heat."]
            }
        ])
    }

    #[test]
    fn test_valid_collection() {
        let recipes = validate_recipe_collection(&valid_payload()).unwrap();
        assert_eq!(recipes.len(), 2);
        assert_eq!(recipes[0].name, "Veggie Omelette");
        assert_eq!(recipes[0].difficulty, Difficulty::Easy);
        assert_eq!(recipes[0].ingredients.len(), 3);
        assert!(!recipes[0].ingredients[2].in_fridge);
        assert_eq!(recipes[1].dietary_tags, Vec::<String>::new());
    }

    #[test]
    fn test_rejects_non_array_top_level() {
        let err = validate_recipe_collection(&json!({"recipes": []})).unwrap_err();
        assert!(matches!(err, ValidateError::NotAnArray));
    }

    #[test]
    fn test_rejects_empty_collection() {
        let err = validate_recipe_collection(&json!([])).unwrap_err();
        assert!(matches!(err, ValidateError::EmptyCollection));
    }

    #[test]
    fn test_rejects_missing_instructions() {
        let mut payload = valid_payload();
        payload[1].as_object_mut().unwrap().remove("instructions");

        let err = validate_recipe_collection(&payload).unwrap_err();
        match err {
            ValidateError::MissingField(path) => assert_eq!(path, "recipes[1].instructions"),
            other => panic!("expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_empty_instructions() {
        let mut payload = valid_payload();
        payload[0]["instructions"] = json!([]);

        let err = validate_recipe_collection(&payload).unwrap_err();
        match err {
            ValidateError::EmptyField { path } => assert_eq!(path, "recipes[0].instructions"),
            other => panic!("expected EmptyField, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_non_array_instructions() {
        let mut payload = valid_payload();
        payload[0]["instructions"] = json!("do stuff");

        let err = validate_recipe_collection(&payload).unwrap_err();
        match err {
            ValidateError::WrongType { path, expected } => {
                assert_eq!(path, "recipes[0].instructions");
                assert_eq!(expected, "array");
            }
            other => panic!("expected WrongType, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_non_array_ingredients() {
        let mut payload = valid_payload();
        payload[1]["ingredients"] = json!(5);

        let err = validate_recipe_collection(&payload).unwrap_err();
        match err {
            ValidateError::WrongType { path, expected } => {
                assert_eq!(path, "recipes[1].ingredients");
                assert_eq!(expected, "array");
            }
            other => panic!("expected WrongType, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_unknown_difficulty() {
        let mut payload = valid_payload();
        payload[0]["difficulty"] = json!("Impossible");

        let err = validate_recipe_collection(&payload).unwrap_err();
        match err {
            ValidateError::InvalidValue { path, value } => {
                assert_eq!(path, "recipes[0].difficulty");
                assert_eq!(value, "Impossible");
            }
            other => panic!("expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_lowercase_difficulty() {
        let mut payload = valid_payload();
        payload[0]["difficulty"] = json!("easy");

        let err = validate_recipe_collection(&payload).unwrap_err();
        assert!(matches!(err, ValidateError::InvalidValue { .. }));
    }

    #[test]
    fn test_rejects_missing_ingredient_field() {
        let mut payload = valid_payload();
        payload[0]["ingredients"][1]
            .as_object_mut()
            .unwrap()
            .remove("inFridge");

        let err = validate_recipe_collection(&payload).unwrap_err();
        match err {
            ValidateError::MissingField(path) => {
                assert_eq!(path, "recipes[0].ingredients[1].inFridge");
            }
            other => panic!("expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_empty_ingredients() {
        let mut payload = valid_payload();
        payload[0]["ingredients"] = json!([]);

        let err = validate_recipe_collection(&payload).unwrap_err();
        assert!(matches!(err, ValidateError::EmptyField { .. }));
    }

    #[test]
    fn test_rejects_negative_calories() {
        let mut payload = valid_payload();
        payload[0]["calories"] = json!(-100);

        let err = validate_recipe_collection(&payload).unwrap_err();
        match err {
            ValidateError::WrongType { path, expected } => {
                assert_eq!(path, "recipes[0].calories");
                assert_eq!(expected, "non-negative integer");
            }
            other => panic!("expected WrongType, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_non_string_instruction() {
        let mut payload = valid_payload();
        payload[0]["instructions"][1] = json!(42);

        let err = validate_recipe_collection(&payload).unwrap_err();
        match err {
            ValidateError::WrongType { path, .. } => {
                assert_eq!(path, "recipes[0].instructions[1]");
            }
            other => panic!("expected WrongType, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_wrong_dietary_tags_type() {
        let mut payload = valid_payload();
        payload[0]["dietaryTags"] = json!("Vegetarian");

        let err = validate_recipe_collection(&payload).unwrap_err();
        assert!(matches!(err, ValidateError::WrongType { .. }));
    }

    #[test]
    fn test_null_dietary_tags_treated_as_absent() {
        let mut payload = valid_payload();
        payload[0]["dietaryTags"] = json!(null);

        let recipes = validate_recipe_collection(&payload).unwrap();
        assert!(recipes[0].dietary_tags.is_empty());
    }

    #[test]
    fn test_ignores_unknown_fields() {
        let mut payload = valid_payload();
        payload[0]["servingSuggestion"] = json!("with toast");
        payload[0]["ingredients"][0]["aisle"] = json!(7);

        let recipes = validate_recipe_collection(&payload).unwrap();
        assert_eq!(recipes.len(), 2);
    }

    #[test]
    fn test_rejects_malformed_entry_strictly() {
        // One bad entry in an otherwise valid collection rejects the batch.
        let mut payload = valid_payload();
        payload.as_array_mut().unwrap().push(json!({"recipeName": "Mystery"}));

        let err = validate_recipe_collection(&payload).unwrap_err();
        match err {
            ValidateError::MissingField(path) => assert_eq!(path, "recipes[2].description"),
            other => panic!("expected MissingField, got {:?}", other),
        }
    }
}
