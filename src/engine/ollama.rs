use super::generative::{Generation, Generator};
use crate::error::GenerationError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Blocking client for an Ollama server's `/api/generate`.
pub struct OllamaClient {
    agent: ureq::Agent,
    url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(endpoint: &str, model: impl Into<String>, timeout: Duration) -> Self {
        let timeout = timeout.max(Duration::from_millis(100));
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(timeout)
            .timeout_read(timeout)
            .timeout_write(timeout)
            .build();
        Self {
            agent,
            url: generate_url(endpoint),
            model: model.into(),
        }
    }
}

impl Generator for OllamaClient {
    fn generate(&self, prompt: &str) -> Result<Generation, GenerationError> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };
        debug!(url = %self.url, model = %self.model, "requesting generation");

        let response = self
            .agent
            .post(&self.url)
            .set("Content-Type", "application/json")
            .set("Accept", "application/json")
            .send_json(&request)
            .map_err(error_from_ureq)?;

        let body: GenerateResponse = serde_json::from_reader(response.into_reader())
            .map_err(|e| GenerationError::Malformed(e.to_string()))?;
        Ok(Generation {
            response: body.response,
        })
    }
}

fn generate_url(endpoint: &str) -> String {
    format!("{}/api/generate", endpoint.trim_end_matches('/'))
}

fn error_from_ureq(err: ureq::Error) -> GenerationError {
    match err {
        ureq::Error::Status(status, _) => GenerationError::Status(status),
        ureq::Error::Transport(transport) => {
            let combined = format!("{:?} {}", transport.kind(), transport);
            if combined.to_ascii_lowercase().contains("timeout")
                || combined.to_ascii_lowercase().contains("timed out")
            {
                GenerationError::Timeout
            } else {
                GenerationError::Transport(transport.to_string())
            }
        }
    }
}
