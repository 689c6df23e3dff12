pub mod dto;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::AppError;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

#[derive(Clone, Debug)]
pub struct GenaiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

/// A generative model that answers a prompt with JSON matching `schema`.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate_json(
        &self,
        prompt: &str,
        schema: &serde_json::Value,
    ) -> Result<String, AppError>;
}

pub struct GeminiHttpClient {
    client: Client,
    config: GenaiConfig,
}

impl GeminiHttpClient {
    pub fn new(config: GenaiConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .build()
            .map_err(|e| AppError::NotConfigured(format!("Failed to build http client: {}", e)))?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl GenerativeModel for GeminiHttpClient {
    async fn generate_json(
        &self,
        prompt: &str,
        schema: &serde_json::Value,
    ) -> Result<String, AppError> {
        let request_body = dto::GenerateContentRequest {
            contents: vec![dto::Content {
                role: Some("user".to_string()),
                parts: vec![dto::Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: dto::GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: schema.clone(),
            },
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("model request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!("model API error {}: {}", status, body)));
        }

        let body_text = response
            .text()
            .await
            .map_err(|e| AppError::Upstream(format!("failed to read model response: {}", e)))?;

        let parsed: dto::GenerateContentResponse = serde_json::from_str(&body_text)
            .map_err(|e| AppError::Upstream(format!("failed to parse model response: {}", e)))?;

        parsed
            .first_text()
            .ok_or_else(|| AppError::Upstream("model returned no content".to_string()))
    }
}
