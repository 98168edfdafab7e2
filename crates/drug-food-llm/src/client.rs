//! Text generation clients.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Generation errors.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Generative service is not configured")]
    NotConfigured,

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Generative service returned error (status {status}): {body}")]
    Service { status: u16, body: String },

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),

    #[error("Generative service returned an empty response")]
    EmptyResponse,
}

pub type GenerationResult<T> = Result<T, GenerationError>;

/// A service that turns a prompt into free text.
///
/// Output is untrusted. Callers must treat any error as "no text available".
pub trait NarrativeGenerator: Send + Sync {
    fn generate(&self, prompt: &str) -> GenerationResult<String>;
}

/// Default Gemini models, tried in order.
pub const DEFAULT_GEMINI_MODELS: &[&str] = &["gemini-1.5-flash", "gemini-1.5-pro", "gemini-pro"];

/// Default Gemini REST endpoint.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini `generateContent` HTTP client.
pub struct GeminiClient {
    base_url: String,
    api_key: String,
    models: Vec<String>,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl GeminiClient {
    /// Create a client against the public Gemini endpoint.
    pub fn new(api_key: &str, models: Vec<String>, timeout_secs: u64) -> GenerationResult<Self> {
        Self::with_base_url(DEFAULT_GEMINI_BASE_URL, api_key, models, timeout_secs)
    }

    /// Create a client against a custom endpoint (proxies, test servers).
    pub fn with_base_url(
        base_url: &str,
        api_key: &str,
        models: Vec<String>,
        timeout_secs: u64,
    ) -> GenerationResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| GenerationError::HttpClient(e.to_string()))?;

        let models = if models.is_empty() {
            DEFAULT_GEMINI_MODELS.iter().map(|m| m.to_string()).collect()
        } else {
            models
        };

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            models,
            client,
            timeout_secs,
        })
    }

    /// Models in the order they are tried.
    pub fn models(&self) -> &[String] {
        &self.models
    }

    fn generate_with_model(&self, model: &str, prompt: &str) -> GenerationResult<String> {
        let url = format!("{}/models/{}:generateContent", self.base_url, model);
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt.to_string() }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::Timeout(self.timeout_secs)
                } else {
                    GenerationError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(GenerationError::Service {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .map_err(|e| GenerationError::ResponseParsing(e.to_string()))?;

        parsed.first_text().ok_or(GenerationError::EmptyResponse)
    }
}

impl NarrativeGenerator for GeminiClient {
    fn generate(&self, prompt: &str) -> GenerationResult<String> {
        let mut last_error = GenerationError::NotConfigured;
        for model in &self.models {
            match self.generate_with_model(model, prompt) {
                Ok(text) => {
                    tracing::debug!(model = %model, "Gemini generation succeeded");
                    return Ok(text);
                }
                Err(e) => {
                    tracing::warn!(
                        model = %model,
                        error = %e,
                        "Gemini model failed, trying next"
                    );
                    last_error = e;
                }
            }
        }
        Err(last_error)
    }
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateContentResponse {
    fn first_text(&self) -> Option<String> {
        self.candidates
            .iter()
            .filter_map(|c| c.content.as_ref())
            .flat_map(|c| c.parts.iter())
            .map(|p| p.text.trim())
            .find(|t| !t.is_empty())
            .map(str::to_string)
    }
}

/// Generator used when no API key is configured. Always unavailable.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredGenerator;

impl NarrativeGenerator for UnconfiguredGenerator {
    fn generate(&self, _prompt: &str) -> GenerationResult<String> {
        Err(GenerationError::NotConfigured)
    }
}

/// Mock generator for testing: returns a fixed response (or failure) and
/// records every prompt it receives.
pub struct MockGenerator {
    response: Option<String>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl MockGenerator {
    pub fn new(response: &str) -> Self {
        Self {
            response: Some(response.to_string()),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// A mock that fails every call, as an unreachable service would.
    pub fn failing() -> Self {
        Self {
            response: None,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }
}

impl NarrativeGenerator for MockGenerator {
    fn generate(&self, prompt: &str) -> GenerationResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        match &self.response {
            Some(text) => Ok(text.clone()),
            None => Err(GenerationError::HttpClient("connection refused".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_returns_configured_response() {
        let mock = MockGenerator::new("test response");
        assert_eq!(mock.generate("prompt").unwrap(), "test response");
        assert_eq!(mock.call_count(), 1);
        assert_eq!(mock.prompts(), vec!["prompt".to_string()]);
    }

    #[test]
    fn test_failing_mock() {
        let mock = MockGenerator::failing();
        assert!(mock.generate("prompt").is_err());
        assert_eq!(mock.call_count(), 1);
    }

    #[test]
    fn test_unconfigured_generator() {
        assert!(matches!(
            UnconfiguredGenerator.generate("anything"),
            Err(GenerationError::NotConfigured)
        ));
    }

    #[test]
    fn test_gemini_client_defaults_models() {
        let client = GeminiClient::new("key", vec![], 5).unwrap();
        assert_eq!(client.models()[0], "gemini-1.5-flash");
        assert_eq!(client.models().len(), DEFAULT_GEMINI_MODELS.len());
    }

    #[test]
    fn test_gemini_client_trims_trailing_slash() {
        let client =
            GeminiClient::with_base_url("http://localhost:8080/", "key", vec!["m".into()], 5)
                .unwrap();
        assert_eq!(client.base_url, "http://localhost:8080");
    }

    #[test]
    fn test_every_model_failing_returns_last_error() {
        // Nothing listens on port 1; each model attempt is refused.
        let client = GeminiClient::with_base_url(
            "http://127.0.0.1:1",
            "key",
            vec!["first".into(), "second".into()],
            2,
        )
        .unwrap();
        assert!(matches!(
            client.generate("prompt"),
            Err(GenerationError::HttpClient(_)) | Err(GenerationError::Timeout(_))
        ));
    }

    #[test]
    fn test_parse_generate_content_response() {
        let json = r#"{"candidates":[
            {"content":{"parts":[{"text":"  Avoid grapefruit.  "}],"role":"model"}}
        ]}"#;
        let parsed: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.first_text(), Some("Avoid grapefruit.".to_string()));
    }

    #[test]
    fn test_parse_empty_candidates() {
        let parsed: GenerateContentResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert_eq!(parsed.first_text(), None);

        let parsed: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.first_text(), None);
    }
}
