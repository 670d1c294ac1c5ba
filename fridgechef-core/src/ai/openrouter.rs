//! OpenRouter provider, speaking the OpenAI-compatible chat API.

use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestMessage, ChatCompletionRequestMessageContentPartImageArgs,
    ChatCompletionRequestMessageContentPartTextArgs, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, ChatCompletionRequestUserMessageContent,
    ChatCompletionRequestUserMessageContentPart, CreateChatCompletionRequestArgs, ImageUrlArgs,
    ResponseFormat, ResponseFormatJsonSchema,
};
use async_openai::Client;
use async_trait::async_trait;

use super::client::{AiClient, AiError};
use super::config::AiConfig;
use super::types::{ChatMessage, ChatRequest, ChatResponse, Role, Usage};

/// OpenRouter-backed AI client.
///
/// OpenRouter exposes the OpenAI chat-completions surface, so this client
/// rides on async-openai with a custom base URL.
pub struct OpenRouterClient {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenRouterClient {
    pub fn new(config: &AiConfig) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.api_key)
            .with_api_base(&config.base_url);

        Self {
            client: Client::with_config(openai_config),
            model: config.model.clone(),
        }
    }

    /// Convert our ChatMessage to async-openai's format.
    ///
    /// Messages carrying images become multi-part user content, image parts
    /// first so the ordering matches what the prompt text refers to.
    fn to_openai_message(msg: &ChatMessage) -> Result<ChatCompletionRequestMessage, AiError> {
        match msg.role {
            Role::System => ChatCompletionRequestSystemMessageArgs::default()
                .content(msg.content.clone())
                .build()
                .map(Into::into)
                .map_err(|e| AiError::Api(format!("Failed to build system message: {}", e))),
            Role::User => {
                if msg.images.is_empty() {
                    ChatCompletionRequestUserMessageArgs::default()
                        .content(msg.content.clone())
                        .build()
                        .map(Into::into)
                        .map_err(|e| AiError::Api(format!("Failed to build user message: {}", e)))
                } else {
                    let mut parts: Vec<ChatCompletionRequestUserMessageContentPart> = Vec::new();

                    for image in &msg.images {
                        let part = ChatCompletionRequestMessageContentPartImageArgs::default()
                            .image_url(
                                ImageUrlArgs::default()
                                    .url(image.to_data_url())
                                    .build()
                                    .map_err(|e| {
                                        AiError::Api(format!("Failed to build image url: {}", e))
                                    })?,
                            )
                            .build()
                            .map_err(|e| {
                                AiError::Api(format!("Failed to build image part: {}", e))
                            })?;
                        parts.push(part.into());
                    }

                    let text = ChatCompletionRequestMessageContentPartTextArgs::default()
                        .text(msg.content.clone())
                        .build()
                        .map_err(|e| AiError::Api(format!("Failed to build text part: {}", e)))?;
                    parts.push(text.into());

                    ChatCompletionRequestUserMessageArgs::default()
                        .content(ChatCompletionRequestUserMessageContent::Array(parts))
                        .build()
                        .map(Into::into)
                        .map_err(|e| AiError::Api(format!("Failed to build user message: {}", e)))
                }
            }
            Role::Assistant => {
                use async_openai::types::chat::ChatCompletionRequestAssistantMessageArgs;
                ChatCompletionRequestAssistantMessageArgs::default()
                    .content(msg.content.clone())
                    .build()
                    .map(Into::into)
                    .map_err(|e| AiError::Api(format!("Failed to build assistant message: {}", e)))
            }
        }
    }
}

#[async_trait]
impl AiClient for OpenRouterClient {
    async fn complete(
        &self,
        _prompt_name: &str,
        request: ChatRequest,
    ) -> Result<ChatResponse, AiError> {
        let messages: Vec<ChatCompletionRequestMessage> = request
            .messages
            .iter()
            .map(Self::to_openai_message)
            .collect::<Result<Vec<_>, _>>()?;

        let mut req_builder = CreateChatCompletionRequestArgs::default();
        req_builder.model(&self.model).messages(messages);

        if let Some(max_tokens) = request.max_tokens {
            req_builder.max_completion_tokens(max_tokens);
        }

        if let Some(temperature) = request.temperature {
            req_builder.temperature(temperature);
        }

        if let Some(schema) = request.response_schema.clone() {
            req_builder.response_format(ResponseFormat::JsonSchema {
                json_schema: ResponseFormatJsonSchema {
                    description: None,
                    name: "recipe_collection".to_string(),
                    schema: Some(schema),
                    strict: None,
                },
            });
        } else if request.json_response {
            req_builder.response_format(ResponseFormat::JsonObject);
        }

        let openai_request = req_builder
            .build()
            .map_err(|e| AiError::Api(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(openai_request)
            .await
            .map_err(|e| AiError::Api(e.to_string()))?;

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();

        let usage = response
            .usage
            .map(|u| Usage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            })
            .unwrap_or_default();

        Ok(ChatResponse {
            content,
            usage,
            cached: false,
        })
    }

    fn client_name(&self) -> &'static str {
        "openrouter"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
