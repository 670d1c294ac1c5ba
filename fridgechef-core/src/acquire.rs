//! Recipe acquisition: one fridge photo in, a validated recipe collection out.

use std::sync::Arc;

use crate::ai::prompts::suggest_recipes::{
    recipe_collection_schema, render_suggest_recipes_prompt, SUGGEST_RECIPES_PROMPT_NAME,
};
use crate::ai::{AiClient, ChatMessage, ChatRequest, ImageData, Usage};
use crate::error::AcquireError;
use crate::types::Recipe;
use crate::validate::validate_recipe_collection;

/// Result of a successful acquisition.
pub struct AcquireResult {
    pub recipes: Vec<Arc<Recipe>>,
    pub cached: bool,
    pub usage: Usage,
}

/// Ask the AI to suggest recipes for the ingredients visible in a photo.
///
/// The response goes through trim, decode, validate; a failure at any stage
/// rejects the whole batch. One request per call, no retries.
pub async fn suggest_recipes(
    ai_client: &dyn AiClient,
    photo: ImageData,
    filters: &[String],
) -> Result<AcquireResult, AcquireError> {
    let prompt = render_suggest_recipes_prompt(filters);

    let request = ChatRequest {
        messages: vec![ChatMessage::user_with_images(prompt, vec![photo])],
        json_response: true,
        max_tokens: Some(4096),
        temperature: None,
        response_schema: Some(recipe_collection_schema()),
    };

    let response = ai_client
        .complete(SUGGEST_RECIPES_PROMPT_NAME, request)
        .await?;

    let trimmed = response.content.trim();
    let value: serde_json::Value = serde_json::from_str(trimmed)?;
    let recipes = validate_recipe_collection(&value)?;

    Ok(AcquireResult {
        recipes: recipes.into_iter().map(Arc::new).collect(),
        cached: response.cached,
        usage: response.usage,
    })
}
