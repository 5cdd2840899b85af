//! HTTP client for the Gemini `generateContent` endpoint.

use std::time::Duration;

use cbhunt_core::{AppConfig, GroundingMetadata};
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ExtractError;
use crate::service::{GenerationRequest, GenerationResponse, GenerativeService};

const USER_AGENT: &str = concat!("cbhunt/", env!("CARGO_PKG_VERSION"));
const CONNECT_TIMEOUT_SECS: u64 = 10;
/// Cap on how much of an error body is kept in [`ExtractError::UnexpectedStatus`].
const MAX_ERROR_BODY_CHARS: usize = 500;

pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: Url,
    model: String,
}

impl GeminiClient {
    /// # Errors
    ///
    /// Returns [`ExtractError::Transport`] for an unparsable base URL and
    /// [`ExtractError::Http`] if the HTTP client cannot be constructed.
    pub fn new(
        api_key: &str,
        model: &str,
        base_url: &str,
        timeout_secs: u64,
    ) -> Result<Self, ExtractError> {
        // A trailing slash keeps `Url::join` from dropping the last path segment.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url = Url::parse(&normalized)
            .map_err(|e| ExtractError::Transport(format!("invalid base URL {base_url}: {e}")))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            base_url,
            model: model.to_string(),
        })
    }

    /// # Errors
    ///
    /// See [`GeminiClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ExtractError> {
        Self::new(
            &config.gemini_api_key,
            &config.model,
            &config.api_base_url,
            config.request_timeout_secs,
        )
    }

    fn endpoint(&self) -> Result<Url, ExtractError> {
        self.base_url
            .join(&format!("v1beta/models/{}:generateContent", self.model))
            .map_err(|e| ExtractError::Transport(format!("invalid model endpoint: {e}")))
    }
}

fn request_body(request: &GenerationRequest) -> Value {
    let system_text = format!(
        "Respond with JSON only, with no markdown and no commentary. \
         The JSON must match this shape:\n{}",
        request.output_shape.describe()
    );
    let mut body = json!({
        "systemInstruction": { "parts": [{ "text": system_text }] },
        "contents": [{ "role": "user", "parts": [{ "text": request.instruction_text }] }],
        "generationConfig": { "temperature": request.temperature },
    });
    if request.web_search {
        body["tools"] = json!([{ "google_search": {} }]);
    }
    body
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateContentResponse {
    fn into_generation(self) -> GenerationResponse {
        let Some(candidate) = self.candidates.into_iter().next() else {
            return GenerationResponse::default();
        };
        let text = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<String>()
            })
            .unwrap_or_default();
        GenerationResponse {
            text,
            grounding_metadata: candidate.grounding_metadata,
        }
    }
}

impl GenerativeService for GeminiClient {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, ExtractError> {
        let url = self.endpoint()?;
        tracing::debug!(model = %self.model, web_search = request.web_search, "sending generation request");

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body(request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExtractError::UnexpectedStatus {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let bytes = response.bytes().await?;
        let parsed: GenerateContentResponse = serde_json::from_slice(&bytes)
            .map_err(|e| ExtractError::Transport(format!("generateContent response: {e}")))?;
        Ok(parsed.into_generation())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::social_post_shape;

    fn request(web_search: bool) -> GenerationRequest {
        GenerationRequest {
            instruction_text: "写一篇小红书笔记".to_string(),
            output_shape: social_post_shape(),
            web_search,
            temperature: 0.8,
        }
    }

    #[test]
    fn body_carries_instruction_and_shape() {
        let body = request_body(&request(false));
        assert_eq!(body["contents"][0]["parts"][0]["text"], "写一篇小红书笔记");
        let system = body["systemInstruction"]["parts"][0]["text"].as_str().unwrap();
        assert!(system.contains("\"title\": string"));
        assert!(body.get("tools").is_none());
    }

    #[test]
    fn web_search_adds_search_tool() {
        let body = request_body(&request(true));
        assert!(body["tools"][0].get("google_search").is_some());
    }

    #[test]
    fn endpoint_keeps_base_path() {
        let client = GeminiClient::new("k", "gemini-2.5-flash", "http://localhost:9/proxy", 5).unwrap();
        assert_eq!(
            client.endpoint().unwrap().as_str(),
            "http://localhost:9/proxy/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn response_text_parts_are_concatenated() {
        let parsed: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "[{\"a\"" }, { "text": ": 1}]" }] },
                "groundingMetadata": {
                    "groundingChunks": [{ "web": { "uri": "https://a.example", "title": "A" } }],
                    "webSearchQueries": ["x"]
                }
            }]
        }))
        .unwrap();
        let generation = parsed.into_generation();
        assert_eq!(generation.text, "[{\"a\": 1}]");
        let metadata = generation.grounding_metadata.unwrap();
        assert_eq!(metadata.web_sources().count(), 1);
    }

    #[test]
    fn no_candidates_yields_empty_text() {
        let parsed: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(parsed.into_generation(), GenerationResponse::default());
    }
}
