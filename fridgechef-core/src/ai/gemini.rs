//! Google Gemini provider via the Generative Language REST API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::client::{AiClient, AiError};
use super::config::AiConfig;
use super::types::{ChatRequest, ChatResponse, Role, Usage};

/// Gemini API provider.
#[derive(Debug)]
pub struct GeminiClient {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: &AiConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.clone(),
            client: reqwest::Client::new(),
        }
    }
}

/// Gemini API request format.
#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<ContentPart>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum ContentPart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize, Deserialize)]
struct InlineData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<serde_json::Value>,
}

/// Gemini API response format.
#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<Candidate>>,
    #[serde(rename = "usageMetadata")]
    usage_metadata: Option<UsageMetadata>,
    error: Option<GeminiApiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct UsageMetadata {
    #[serde(rename = "promptTokenCount")]
    prompt: Option<u32>,
    #[serde(rename = "candidatesTokenCount")]
    candidates: Option<u32>,
    #[serde(rename = "totalTokenCount")]
    total: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GeminiApiError {
    message: String,
}

/// Convert a JSON schema to Gemini's dialect.
///
/// Gemini expects type names in uppercase ("ARRAY", "OBJECT", "STRING"), so
/// every `"type"` string value gets uppercased. Everything else passes
/// through untouched, enum value lists included.
fn to_gemini_schema(schema: &serde_json::Value) -> serde_json::Value {
    match schema {
        serde_json::Value::Object(map) => {
            let converted = map
                .iter()
                .map(|(key, value)| {
                    let new_value = if key == "type" {
                        match value.as_str() {
                            Some(s) => serde_json::Value::String(s.to_uppercase()),
                            None => to_gemini_schema(value),
                        }
                    } else {
                        to_gemini_schema(value)
                    };
                    (key.clone(), new_value)
                })
                .collect();
            serde_json::Value::Object(converted)
        }
        serde_json::Value::Array(items) => {
            serde_json::Value::Array(items.iter().map(to_gemini_schema).collect())
        }
        other => other.clone(),
    }
}

fn to_gemini_contents(request: &ChatRequest) -> Vec<GeminiContent> {
    request
        .messages
        .iter()
        .map(|msg| {
            let role = match msg.role {
                // Gemini has no system role; fold it into the user turn.
                Role::System | Role::User => "user",
                Role::Assistant => "model",
            };

            let mut parts: Vec<ContentPart> = msg
                .images
                .iter()
                .map(|image| ContentPart::InlineData {
                    inline_data: InlineData {
                        mime_type: image.media_type.clone(),
                        data: image.base64_data.clone(),
                    },
                })
                .collect();
            parts.push(ContentPart::Text {
                text: msg.content.clone(),
            });

            GeminiContent {
                role: Some(role.to_string()),
                parts,
            }
        })
        .collect()
}

#[async_trait]
impl AiClient for GeminiClient {
    async fn complete(
        &self,
        _prompt_name: &str,
        request: ChatRequest,
    ) -> Result<ChatResponse, AiError> {
        let generation_config = GenerationConfig {
            temperature: request.temperature,
            max_output_tokens: request.max_tokens,
            response_mime_type: request
                .json_response
                .then(|| "application/json".to_string()),
            response_schema: request.response_schema.as_ref().map(to_gemini_schema),
        };

        let gemini_request = GeminiRequest {
            contents: to_gemini_contents(&request),
            generation_config: Some(generation_config),
        };

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let response = self
            .client
            .post(&url)
            .json(&gemini_request)
            .send()
            .await
            .map_err(|e| AiError::Api(e.to_string()))?;

        let status = response.status().as_u16();

        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            return Err(AiError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| AiError::Api(e.to_string()))?;

        if status != 200 {
            // Try to parse error response
            if let Ok(error_response) = serde_json::from_str::<GeminiResponse>(&body) {
                if let Some(error) = error_response.error {
                    return Err(AiError::ApiStatus {
                        status,
                        message: error.message,
                    });
                }
            }
            return Err(AiError::ApiStatus {
                status,
                message: body,
            });
        }

        let gemini_response: GeminiResponse =
            serde_json::from_str(&body).map_err(|e| AiError::ParseError(e.to_string()))?;

        if let Some(error) = gemini_response.error {
            return Err(AiError::Api(error.message));
        }

        // Extract text from the first candidate's first text part
        let content = gemini_response
            .candidates
            .as_ref()
            .and_then(|c| c.first())
            .and_then(|c| c.content.as_ref())
            .and_then(|c| {
                c.parts.iter().find_map(|p| match p {
                    ContentPart::Text { text } => Some(text.clone()),
                    ContentPart::InlineData { .. } => None,
                })
            })
            .ok_or_else(|| AiError::ParseError("No text content in response".to_string()))?;

        let usage = gemini_response
            .usage_metadata
            .map(|u| Usage {
                prompt_tokens: u.prompt.unwrap_or(0),
                completion_tokens: u.candidates.unwrap_or(0),
                total_tokens: u.total.unwrap_or(0),
            })
            .unwrap_or_default();

        Ok(ChatResponse {
            content,
            usage,
            cached: false,
        })
    }

    fn client_name(&self) -> &'static str {
        "gemini"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
