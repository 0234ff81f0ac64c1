use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, instrument};

use crate::config::ConfigError;
use crate::embeddings::{EmbedderError, EmbeddingModel};

const API_KEY_ENV_VAR: &str = "LOREKEEPER_OPENAI_API_KEY";
const URL: &str = "https://api.openai.com/v1/embeddings";
const DEFAULT_MODEL: &str = "text-embedding-3-small";

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct ModelConfig {
    api_key_var: Option<String>,
    api_url: Option<String>,
    model: Option<String>,
}

pub struct OpenAIEmbeddingModel {
    api_url: String,
    api_key: String,
    model: String,
    client: Client,
}

impl OpenAIEmbeddingModel {
    /// Creates the model from an optional json config with `model`, `api_url` and `api_key_var`.
    pub fn new(json_config: Option<&str>) -> Result<Self, ConfigError> {
        let config = match json_config {
            Some(json) => serde_json::from_str::<ModelConfig>(json)?,
            None => ModelConfig::default(),
        };
        let api_key_var = config.api_key_var.unwrap_or(API_KEY_ENV_VAR.to_string());
        let api_key = std::env::var(&api_key_var).map_err(|e| {
            ConfigError::Invalid(format!("Failed to fetch env var `{api_key_var}`!, {e}"))
        })?;
        Ok(Self {
            api_url: config.api_url.unwrap_or(URL.to_string()),
            api_key,
            model: config.model.unwrap_or(DEFAULT_MODEL.to_string()),
            client: Client::new(),
        })
    }
}

#[derive(Deserialize)]
struct OpenAIEmbeddingResponse {
    pub data: Vec<OpenAIEmbeddingData>,
}

#[derive(Deserialize)]
struct OpenAIEmbeddingData {
    pub embedding: Vec<f64>,
}

#[async_trait]
impl EmbeddingModel for OpenAIEmbeddingModel {
    #[instrument(skip(self, data), fields(data_len = data.len()))]
    async fn embed(&self, data: &str) -> Result<Vec<f64>, EmbedderError> {
        let request_body = json!({
                "input": data,
                "model": self.model,
        });
        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| EmbedderError::RequestError(e.to_string()))?;

        if response.status().is_success() {
            let response = response
                .json::<OpenAIEmbeddingResponse>()
                .await
                .map_err(|e| EmbedderError::ParseError(e.to_string()))?;

            Ok(response
                .data
                .into_iter()
                .flat_map(|d| d.embedding)
                .collect())
        } else {
            let error_message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!(error = %error_message, "Embedding request failed");
            Err(EmbedderError::ProviderError(error_message))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore]
    async fn simple_openai_embed_request() {
        let model = OpenAIEmbeddingModel::new(None).unwrap();
        let response = model.embed("test").await;
        assert!(response.is_ok_and(|v| !v.is_empty()));
    }
}
