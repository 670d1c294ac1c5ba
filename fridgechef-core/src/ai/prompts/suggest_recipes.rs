//! Prompt template for suggesting recipes from a fridge photo.

use serde_json::json;

/// Prompt name for cache keys.
pub const SUGGEST_RECIPES_PROMPT_NAME: &str = "suggest_recipes";

/// Render the suggestion prompt for the given dietary filters.
///
/// With no filters the model is asked for variety; with filters they are
/// stated as hard constraints on every suggested recipe.
pub fn render_suggest_recipes_prompt(filters: &[String]) -> String {
    let filter_text = if filters.is_empty() {
        "Provide a variety of recipes.".to_string()
    } else {
        format!(
            "The user has specified the following dietary preferences: {}. All suggested recipes MUST adhere to these restrictions.",
            filters.join(", ")
        )
    };

    format!(
        r#"You are an expert culinary assistant. Analyze the ingredients in this photo of a refrigerator.
Based ONLY on the visible ingredients, suggest 3 to 5 creative recipes.
For each recipe, provide a detailed plan. If a common staple ingredient (like oil, salt, pepper) isn't visible but is essential, assume the user has it and mark 'inFridge' as true. For all other non-visible ingredients, mark 'inFridge' as false.
{filter_text}
Return the recipes in a valid JSON array format according to the provided schema. Return ONLY the JSON, no other text."#,
        filter_text = filter_text
    )
}

/// JSON schema for the expected response: an array of recipe objects.
///
/// Written in standard JSON Schema casing; providers that want a different
/// dialect convert it themselves.
pub fn recipe_collection_schema() -> serde_json::Value {
    json!({
        "type": "array",
        "items": {
            "type": "object",
            "properties": {
                "recipeName": { "type": "string", "description": "The name of the recipe." },
                "description": { "type": "string", "description": "A brief, enticing description of the dish." },
                "difficulty": { "type": "string", "enum": ["Easy", "Medium", "Hard"], "description": "The cooking difficulty." },
                "prepTime": { "type": "string", "description": "Estimated preparation and cooking time, e.g., '45 mins'." },
                "calories": { "type": "integer", "description": "Estimated calorie count per serving." },
                "ingredients": {
                    "type": "array",
                    "description": "List of ingredients for the recipe.",
                    "items": {
                        "type": "object",
                        "properties": {
                            "name": { "type": "string" },
                            "quantity": { "type": "string" },
                            "inFridge": { "type": "boolean", "description": "True if the ingredient is likely visible in the user's photo, false otherwise." }
                        },
                        "required": ["name", "quantity", "inFridge"]
                    }
                },
                "instructions": {
                    "type": "array",
                    "description": "Step-by-step cooking instructions.",
                    "items": { "type": "string" }
                },
                "dietaryTags": {
                    "type": "array",
                    "description": "A list of relevant dietary tags, like 'Vegetarian', 'Gluten-Free', etc.",
                    "items": { "type": "string" }
                }
            },
            "required": ["recipeName", "description", "difficulty", "prepTime", "calories", "ingredients", "instructions"]
        }
    })
}
