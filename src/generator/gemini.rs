use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{Generation, GenerationError, GenerationParams, Generator, TokenUsage};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const API_KEY_HEADER: &str = "x-goog-api-key";

/// A generator that calls the Gemini `generateContent` endpoint.
pub struct GeminiGenerator {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiGenerator {
    /// The key is required up front; callers resolve it through [`crate::config::Config`].
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", API_BASE, self.model)
    }

    fn build_request<'a>(prompt: &'a str, params: &GenerationParams) -> ApiRequest<'a> {
        ApiRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: params.temperature,
                top_p: params.top_p,
            },
        }
    }

    fn parse_response(body: &str) -> Result<Generation, GenerationError> {
        let response: ApiResponse = serde_json::from_str(body)?;

        let text = response
            .candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter(|part| !part.thought)
                    .filter_map(|part| part.text.as_deref())
                    .collect::<String>()
            })
            .filter(|text| !text.is_empty());

        let usage = response.usage_metadata.map(|u| TokenUsage {
            input_tokens: u.prompt_token_count,
            output_tokens: u.candidates_token_count,
        });

        Ok(Generation { text, usage })
    }
}

#[async_trait]
impl Generator for GeminiGenerator {
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<Generation, GenerationError> {
        let body = Self::build_request(prompt, params);

        tracing::debug!(model = %self.model, prompt_chars = prompt.len(), "calling generateContent");

        let resp = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            return Err(GenerationError::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        let generation = Self::parse_response(&text)?;
        if let Some(usage) = generation.usage {
            tracing::debug!(
                input = usage.input_tokens,
                output = usage.output_tokens,
                "token usage"
            );
        }
        Ok(generation)
    }
}

// --- API types ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
    #[serde(default)]
    thought: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u64,
    #[serde(default)]
    candidates_token_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_embeds_model() {
        let generator = GeminiGenerator::new("key", "gemini-2.5-flash");
        assert_eq!(
            generator.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn request_serializes_prompt_and_params() {
        let params = GenerationParams {
            temperature: 0.5,
            top_p: 0.75,
        };
        let body = GeminiGenerator::build_request("rewrite me", &params);
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "rewrite me");
        assert_eq!(json["generationConfig"]["temperature"], 0.5);
        assert_eq!(json["generationConfig"]["topP"], 0.75);
    }

    #[test]
    fn parse_single_part() {
        let body = r#"{
            "candidates": [{"content": {"role": "model", "parts": [{"text": "Hey there"}]}}],
            "usageMetadata": {"promptTokenCount": 120, "candidatesTokenCount": 8, "totalTokenCount": 128}
        }"#;
        let generation = GeminiGenerator::parse_response(body).unwrap();
        assert_eq!(generation.text.as_deref(), Some("Hey there"));
        assert_eq!(
            generation.usage,
            Some(TokenUsage {
                input_tokens: 120,
                output_tokens: 8,
            })
        );
    }

    #[test]
    fn parse_joins_parts_and_skips_thoughts() {
        let body = r#"{
            "candidates": [{"content": {"parts": [
                {"text": "planning...", "thought": true},
                {"text": "Hey "},
                {"text": "there"}
            ]}}]
        }"#;
        let generation = GeminiGenerator::parse_response(body).unwrap();
        assert_eq!(generation.text.as_deref(), Some("Hey there"));
        assert!(generation.usage.is_none());
    }

    #[test]
    fn parse_no_candidates_is_empty() {
        let generation = GeminiGenerator::parse_response(r#"{"candidates": []}"#).unwrap();
        assert!(generation.text.is_none());
    }

    #[test]
    fn parse_missing_content_is_empty() {
        let body = r#"{"candidates": [{"finishReason": "SAFETY"}]}"#;
        let generation = GeminiGenerator::parse_response(body).unwrap();
        assert!(generation.text.is_none());
    }

    #[test]
    fn parse_empty_text_is_empty() {
        let body = r#"{"candidates": [{"content": {"parts": [{"text": ""}]}}]}"#;
        let generation = GeminiGenerator::parse_response(body).unwrap();
        assert!(generation.text.is_none());
    }

    #[test]
    fn parse_invalid_json_fails() {
        let result = GeminiGenerator::parse_response("not json at all");
        assert!(matches!(result, Err(GenerationError::Decode(_))));
    }
}
