//! Core recipe data model.
//!
//! Field names follow Rust conventions; serde renames preserve the camelCase
//! wire shape produced by the inference service (`recipeName`, `prepTime`,
//! `inFridge`, `dietaryTags`).

use serde::{Deserialize, Serialize};

/// Dietary filter presets shells offer as checkboxes. The filter set itself
/// accepts any free-text term; this list is a convenience, not a closed set.
pub const DIETARY_OPTIONS: &[&str] = &[
    "Vegetarian",
    "Vegan",
    "Gluten-Free",
    "Dairy-Free",
    "Low-Carb",
    "High-Protein",
];

/// Cooking difficulty of a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// All difficulties, in display order.
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    /// Parse the exact wire value. Anything other than the three canonical
    /// strings (including case variants) is rejected.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Easy" => Some(Difficulty::Easy),
            "Medium" => Some(Difficulty::Medium),
            "Hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

/// A single recipe ingredient.
///
/// Immutable once produced by acquisition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub name: String,
    pub quantity: String,
    /// Whether the ingredient was judged visible in the fridge photo (or is an
    /// assumed staple). `false` means it must be acquired.
    pub in_fridge: bool,
}

/// A recipe suggested for a fridge photo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    #[serde(rename = "recipeName")]
    pub name: String,
    pub description: String,
    pub difficulty: Difficulty,
    /// Human-readable estimate, e.g. "45 mins".
    pub prep_time: String,
    /// Estimated calories per serving.
    pub calories: u32,
    /// Display order only.
    pub ingredients: Vec<Ingredient>,
    /// Order is authoritative: it defines the cooking-mode step sequence.
    pub instructions: Vec<String>,
    #[serde(default)]
    pub dietary_tags: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_parse_exact() {
        assert_eq!(Difficulty::parse("Easy"), Some(Difficulty::Easy));
        assert_eq!(Difficulty::parse("Medium"), Some(Difficulty::Medium));
        assert_eq!(Difficulty::parse("Hard"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::parse("easy"), None);
        assert_eq!(Difficulty::parse("Impossible"), None);
        assert_eq!(Difficulty::parse(""), None);
    }

    #[test]
    fn test_difficulty_round_trips_through_as_str() {
        for difficulty in Difficulty::ALL {
            assert_eq!(Difficulty::parse(difficulty.as_str()), Some(difficulty));
        }
    }

    #[test]
    fn test_recipe_serializes_with_wire_names() {
        let recipe = Recipe {
            name: "Veggie Omelette".to_string(),
            description: "A fluffy omelette".to_string(),
            difficulty: Difficulty::Easy,
            prep_time: "15 mins".to_string(),
            calories: 320,
            ingredients: vec![Ingredient {
                name: "Eggs".to_string(),
                quantity: "3".to_string(),
                in_fridge: true,
            }],
            instructions: vec!["Whisk the eggs.".to_string()],
            dietary_tags: vec!["Vegetarian".to_string()],
        };

        let json = serde_json::to_value(&recipe).unwrap();
        assert_eq!(json["recipeName"], "Veggie Omelette");
        assert_eq!(json["prepTime"], "15 mins");
        assert_eq!(json["difficulty"], "Easy");
        assert_eq!(json["ingredients"][0]["inFridge"], true);
        assert_eq!(json["dietaryTags"][0], "Vegetarian");
    }

    #[test]
    fn test_recipe_deserializes_without_dietary_tags() {
        let json = r#"{
            "recipeName": "Plain Rice",
            "description": "Just rice",
            "difficulty": "Easy",
            "prepTime": "20 mins",
            "calories": 200,
            "ingredients": [{"name": "Rice", "quantity": "1 cup", "inFridge": true}],
            "instructions": ["Boil the rice."]
        }"#;

        let recipe: Recipe = serde_json::from_str(json).unwrap();
        assert!(recipe.dietary_tags.is_empty());
    }
}
