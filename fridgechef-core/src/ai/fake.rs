//! Fake AI client for testing.
//!
//! This client returns deterministic responses based on prompt matching,
//! allowing tests to run without network access or API costs.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use super::client::{AiClient, AiError};
use super::types::{ChatRequest, ChatResponse, Usage};

/// Canned response the default fake returns: a small but fully valid
/// recipe collection, so end-to-end flows work without an API key.
pub const DEMO_RECIPES_JSON: &str = r#"[
  {
    "recipeName": "Fridge-Clearing Vegetable Stir Fry",
    "description": "A quick stir fry built from whatever vegetables are on hand, finished with a simple soy glaze.",
    "difficulty": "Easy",
    "prepTime": "20 minutes",
    "calories": 320,
    "ingredients": [
      { "name": "Mixed vegetables", "quantity": "3 cups", "inFridge": true },
      { "name": "Garlic", "quantity": "2 cloves", "inFridge": true },
      { "name": "Soy sauce", "quantity": "2 tbsp", "inFridge": false },
      { "name": "Vegetable oil", "quantity": "1 tbsp", "inFridge": true }
    ],
    "instructions": [
      "Chop all vegetables into bite-sized pieces.",
      "Heat the oil in a large pan over high heat.",
      "Add garlic and stir for 30 seconds, then add the vegetables.",
      "Stir fry for 5-7 minutes, add the soy sauce, and toss to coat."
    ],
    "dietaryTags": ["Vegetarian", "Vegan", "Dairy-Free"]
  },
  {
    "recipeName": "Leftover Cheese Omelette",
    "description": "A fluffy omelette that turns odds and ends of cheese into a satisfying meal.",
    "difficulty": "Medium",
    "prepTime": "15 minutes",
    "calories": 450,
    "ingredients": [
      { "name": "Eggs", "quantity": "3", "inFridge": true },
      { "name": "Cheese", "quantity": "1/2 cup grated", "inFridge": true },
      { "name": "Butter", "quantity": "1 tbsp", "inFridge": true },
      { "name": "Chives", "quantity": "1 tbsp chopped", "inFridge": false }
    ],
    "instructions": [
      "Whisk the eggs with a pinch of salt until frothy.",
      "Melt the butter in a nonstick pan over medium heat.",
      "Pour in the eggs and cook until nearly set.",
      "Sprinkle the cheese over one half, fold, and slide onto a plate."
    ],
    "dietaryTags": ["Vegetarian", "Gluten-Free"]
  }
]"#;

/// A fake AI client for testing.
///
/// Responses are matched by checking if any message in the request contains a
/// registered substring. If no match is found, returns a default response or
/// error.
#[derive(Debug)]
pub struct FakeAiClient {
    /// Map of prompt substring -> response
    responses: RwLock<HashMap<String, String>>,
    /// Default response if no match found
    default_response: Option<String>,
}

impl Default for FakeAiClient {
    fn default() -> Self {
        Self {
            responses: RwLock::new(HashMap::new()),
            default_response: Some(DEMO_RECIPES_JSON.to_string()),
        }
    }
}

impl FakeAiClient {
    /// Create a new FakeAiClient with no registered responses.
    pub fn new() -> Self {
        Self {
            responses: RwLock::new(HashMap::new()),
            default_response: None,
        }
    }

    /// Create a FakeAiClient that returns a specific response for prompts
    /// containing a substring.
    pub fn with_response(prompt_contains: &str, response: &str) -> Self {
        let mut client = Self::new();
        client.add_response(prompt_contains, response);
        client
    }

    /// Add a response for prompts containing a specific substring.
    pub fn add_response(&mut self, prompt_contains: &str, response: &str) {
        self.responses
            .write()
            .unwrap()
            .insert(prompt_contains.to_string(), response.to_string());
    }

    /// Set the default response when no pattern matches.
    pub fn with_default_response(mut self, response: &str) -> Self {
        self.default_response = Some(response.to_string());
        self
    }
}

#[async_trait]
impl AiClient for FakeAiClient {
    async fn complete(
        &self,
        _prompt_name: &str,
        request: ChatRequest,
    ) -> Result<ChatResponse, AiError> {
        let prompt = request
            .messages
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        let responses = self.responses.read().unwrap();

        // Find first matching pattern (case-insensitive)
        let prompt_lower = prompt.to_lowercase();
        for (pattern, response) in responses.iter() {
            if prompt_lower.contains(&pattern.to_lowercase()) {
                return Ok(ChatResponse {
                    content: response.clone(),
                    usage: Usage::default(),
                    cached: false,
                });
            }
        }

        // Return default or error
        match &self.default_response {
            Some(response) => Ok(ChatResponse {
                content: response.clone(),
                usage: Usage::default(),
                cached: false,
            }),
            None => {
                // Truncate by characters; a byte index could split a
                // multi-byte character and panic.
                let preview: String = prompt.chars().take(100).collect();
                Err(AiError::Api(format!(
                    "FakeAiClient: No response configured for prompt (first 100 chars): {}",
                    preview
                )))
            }
        }
    }

    fn client_name(&self) -> &'static str {
        "fake"
    }

    fn model_name(&self) -> &str {
        "fake-model"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::types::ChatMessage;
    use crate::validate::validate_recipe_collection;

    fn request(text: &str) -> ChatRequest {
        ChatRequest {
            messages: vec![ChatMessage::user(text)],
            max_tokens: None,
            temperature: None,
            json_response: false,
            response_schema: None,
        }
    }

    #[tokio::test]
    async fn test_fake_client_matching() {
        let client = FakeAiClient::with_response("hello", "world");
        let result = client
            .complete("test", request("Say hello to the user"))
            .await
            .unwrap();
        assert_eq!(result.content, "world");
    }

    #[tokio::test]
    async fn test_fake_client_case_insensitive() {
        let client = FakeAiClient::with_response("HELLO", "world");
        let result = client.complete("test", request("hello there")).await.unwrap();
        assert_eq!(result.content, "world");
    }

    #[tokio::test]
    async fn test_fake_client_no_match() {
        let client = FakeAiClient::new();
        let result = client.complete("test", request("random prompt")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_fake_client_no_match_with_multibyte_prompt() {
        let client = FakeAiClient::new();
        // Long enough that the error preview truncates, with characters
        // whose byte offsets never line up with the cut point.
        let prompt = format!("x{}", "é".repeat(120));

        let err = client.complete("test", request(&prompt)).await.unwrap_err();
        assert!(err.to_string().contains("No response configured"));
    }

    #[tokio::test]
    async fn test_fake_client_default_response() {
        let client = FakeAiClient::new().with_default_response("default");
        let result = client.complete("test", request("random prompt")).await.unwrap();
        assert_eq!(result.content, "default");
    }

    #[test]
    fn test_demo_recipes_are_valid() {
        let value: serde_json::Value = serde_json::from_str(DEMO_RECIPES_JSON).unwrap();
        let recipes = validate_recipe_collection(&value).unwrap();
        assert_eq!(recipes.len(), 2);
        assert_eq!(recipes[0].name, "Fridge-Clearing Vegetable Stir Fry");
    }
}
