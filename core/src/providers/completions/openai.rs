use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, error, info, instrument};

use crate::completion::{CompletionError, CompletionModel};
use crate::config::ConfigError;

const API_KEY_ENV_VAR: &str = "LOREKEEPER_OPENAI_API_KEY";
const URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_TEMP: f64 = 0.0;
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_TOKENS: usize = 3000;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct ModelConfig {
    api_key_var: Option<String>,
    api_url: Option<String>,
    model: Option<String>,
    temperature: Option<f64>,
    max_tokens: Option<usize>,
}

/// Chat completions backed by the OpenAI API. Each prompt is sent as a single user message.
pub struct OpenAICompletionModel {
    api_key: String,
    api_url: String,
    client: reqwest::Client,
    model: String,
    temperature: f64,
    max_tokens: usize,
}

impl OpenAICompletionModel {
    /// Creates the model from an optional json config, e.g.
    /// `{"model": "gpt-4o-mini", "temperature": 0.3, "api_key_var": "MY_KEY"}`.
    ///
    /// # Errors
    /// Fails on malformed json, unknown fields or when the API key variable is unset.
    #[instrument]
    pub fn new(json_config: Option<&str>) -> Result<Self, ConfigError> {
        let config = match json_config {
            Some(json) => serde_json::from_str::<ModelConfig>(json).map_err(|e| {
                error!(error = %e, "Failed to deserialize json config");
                e
            })?,
            None => ModelConfig::default(),
        };
        let api_key_var = config.api_key_var.unwrap_or(API_KEY_ENV_VAR.to_string());
        let api_key = std::env::var(&api_key_var).map_err(|e| {
            let e = format!("Failed to fetch env var `{api_key_var}`!, {e}");
            error!("{e}");
            ConfigError::Invalid(e)
        })?;
        Ok(Self {
            api_key,
            api_url: config.api_url.unwrap_or(URL.to_string()),
            client: reqwest::Client::new(),
            model: config.model.unwrap_or(DEFAULT_MODEL.to_string()),
            temperature: config.temperature.unwrap_or(DEFAULT_TEMP),
            max_tokens: config.max_tokens.unwrap_or(DEFAULT_TOKENS),
        })
    }

    #[must_use]
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }
}

#[derive(Serialize)]
struct OpenAIMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[async_trait]
impl CompletionModel for OpenAICompletionModel {
    #[instrument(skip(self, prompt), fields(prompt_len = prompt.len(), model = %self.model))]
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let request_body = json!({
            "model": self.model,
            "messages": [OpenAIMessage { role: "user", content: prompt }],
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        });
        debug!(request_body = ?request_body, "Sending request to OpenAI");

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Request failed");
                CompletionError::RequestError(e.to_string())
            })?;

        let status = response.status();
        debug!(%status, "Received API response");

        if status.is_success() {
            let response_json: serde_json::Value = response.json().await.map_err(|e| {
                error!(error = ?e, "Failed to parse response JSON");
                CompletionError::ParseError(e.to_string())
            })?;
            let content = extract_content(&response_json)?;
            if let Some(total) = response_json["usage"]["total_tokens"].as_u64() {
                info!(total_tokens = total, "Token usage recorded");
            }
            Ok(content)
        } else {
            let error_msg = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error (failed to read response body)".to_string());
            error!(status = %status, error = %error_msg, "API returned error response");
            Err(CompletionError::ProviderError(status.into(), error_msg))
        }
    }
}

fn extract_content(response_json: &serde_json::Value) -> Result<String, CompletionError> {
    let content = &response_json["choices"][0]["message"]["content"];
    if content.is_null() {
        return Ok(String::new());
    }
    content
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| CompletionError::ParseError("Invalid response body".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_message_content() {
        let body = json!({"choices": [{"message": {"role": "assistant", "content": "okay"}}]});
        assert_eq!(extract_content(&body).unwrap(), "okay");
        let empty = json!({"choices": [{"message": {"content": null}}]});
        assert_eq!(extract_content(&empty).unwrap(), "");
        let bad = json!({"choices": [{"message": {"content": 3}}]});
        assert!(matches!(extract_content(&bad), Err(CompletionError::ParseError(_))));
    }

    #[test]
    fn rejects_unknown_config_fields() {
        assert!(matches!(
            OpenAICompletionModel::new(Some(r#"{"modle": "gpt"}"#)),
            Err(ConfigError::Json(_))
        ));
    }

    #[tokio::test]
    #[ignore]
    async fn simple_openai_completion_request() {
        let model = OpenAICompletionModel::new(None).unwrap();
        let response = model
            .complete(
                r#"
This is a test from a software library that uses this LLM assistant.
For this test to be considered successful, reply with "okay" without the quotes, and NOTHING else.
"#,
            )
            .await;
        assert_eq!(response, Ok("okay".to_string()));
    }
}
