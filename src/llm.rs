//! Generative model client
//!
//! Narrow seam over an OpenAI-compatible chat-completions endpoint. The
//! Gemini API is the production target through its OpenAI-compatible base
//! URL, but anything speaking the same wire shape works.

use crate::error::{AgentError, Result};
use async_trait::async_trait;

/// The model collaborator: one completion per call, at most once per attempt.
/// Network-level retry, if wanted, belongs to the implementation, not the
/// orchestrator.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Returns the raw model text, or `AgentError::Model` when the call
    /// cannot be completed or yields no usable content.
    async fn complete(&self, system_prompt: &str, user_message: &str) -> Result<String>;
}

pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(api_key: String, base_url: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        }
    }
}

#[async_trait]
impl ModelClient for OpenAiClient {
    async fn complete(&self, system_prompt: &str, user_message: &str) -> Result<String> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": system_prompt},
                {"role": "user", "content": user_message}
            ]
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| AgentError::Model(format!("Model API call failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AgentError::Model(format!(
                "Model API returned {}: {}",
                status, detail
            )));
        }

        let response_json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AgentError::Model(format!("Failed to parse model response: {}", e)))?;

        let content = response_json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| AgentError::Model("No content in model response".to_string()))?;

        if content.trim().is_empty() {
            return Err(AgentError::Model(
                "Model returned empty content".to_string(),
            ));
        }

        Ok(content.to_string())
    }
}
