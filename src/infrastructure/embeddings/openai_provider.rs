// src/infrastructure/embeddings/openai_provider.rs
use crate::domain::embedding::Embedder;
use crate::domain::error::{DomainError, DomainResult};
use crate::infrastructure::embeddings::model::{EmbeddingRequest, EmbeddingResponse};
use std::any::Any;
use std::env;
use tracing::{debug, instrument};

/// Implementation using OpenAI's embedding API
#[derive(Debug, Clone)]
pub struct OpenAiEmbedding {
    url: String,
    model: String,
    dimension: usize,
}

impl Default for OpenAiEmbedding {
    fn default() -> Self {
        Self::new(
            "https://api.openai.com".to_string(),
            "text-embedding-ada-002".to_string(),
        )
    }
}

/// Vector width is a property of the model, not of configuration.
fn dimension_for_model(model: &str) -> usize {
    match model {
        "text-embedding-3-large" => 3072,
        _ => 1536, // ada-002 and 3-small
    }
}

impl OpenAiEmbedding {
    pub fn new(url: String, model: String) -> Self {
        let dimension = dimension_for_model(&model);
        Self {
            url,
            model,
            dimension,
        }
    }

    fn request_embeddings(&self, input: Vec<String>) -> DomainResult<Vec<Vec<f32>>> {
        let api_key = env::var("OPENAI_API_KEY").map_err(|_| {
            DomainError::EmbeddingFailed("OPENAI_API_KEY environment variable not set".to_string())
        })?;

        let client = reqwest::blocking::Client::new();

        let request = EmbeddingRequest {
            input,
            model: self.model.clone(),
        };

        let response = client
            .post(format!("{}/v1/embeddings", self.url))
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&request)
            .send()
            .map_err(|e| {
                DomainError::EmbeddingFailed(format!("OpenAI API request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let error_text = response.text().map_err(|e| {
                DomainError::EmbeddingFailed(format!("Failed to read error response: {}", e))
            })?;

            return Err(DomainError::EmbeddingFailed(format!(
                "OpenAI API returned error: {}",
                error_text
            )));
        }

        let response_data: EmbeddingResponse = response.json().map_err(|e| {
            DomainError::EmbeddingFailed(format!("Failed to parse OpenAI response: {}", e))
        })?;

        Ok(response_data
            .data
            .into_iter()
            .map(|d| d.embedding)
            .collect())
    }
}

impl Embedder for OpenAiEmbedding {
    #[instrument(skip(self, text))]
    fn embed_single(&self, text: &str) -> DomainResult<Vec<f32>> {
        debug!("OpenAI embedding request for text length: {}", text.len());

        let mut embeddings = self.request_embeddings(vec![text.to_string()])?;
        if embeddings.is_empty() {
            return Err(DomainError::EmbeddingFailed(
                "OpenAI API returned empty data array".to_string(),
            ));
        }
        Ok(embeddings.remove(0))
    }

    #[instrument(skip(self, texts), fields(count = texts.len()))]
    fn embed_batch(&self, texts: &[String]) -> DomainResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let embeddings = self.request_embeddings(texts.to_vec())?;
        if embeddings.len() != texts.len() {
            return Err(DomainError::EmbeddingFailed(format!(
                "OpenAI API returned {} embeddings for {} inputs",
                embeddings.len(),
                texts.len()
            )));
        }
        Ok(embeddings)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn given_missing_api_key_when_embedding_then_returns_error() {
        let key_backup = env::var("OPENAI_API_KEY").ok();
        env::remove_var("OPENAI_API_KEY");

        let openai = OpenAiEmbedding::default();
        let result = openai.embed_single("test text");
        assert!(result.is_err());

        if let Some(key) = key_backup {
            env::set_var("OPENAI_API_KEY", key);
        }
    }

    #[test]
    fn given_default_provider_then_dimension_matches_ada() {
        assert_eq!(OpenAiEmbedding::default().dimension(), 1536);
    }
}
