//! Gemini backend (Generative Language REST API)
//!
//! One client serves all three collaborator roles, each on its own model:
//! - trends: search-grounded text generation, sources from grounding metadata
//! - planning: text generation with a thinking budget
//! - assets: image generation, first inline image returned as a data URI
//!
//! Endpoint: `POST {api_base}/models/{model}:generateContent`

use super::parse::{parse_plans, parse_trends};
use super::prompts::{asset_prompt, plan_prompt, trend_prompt, Prompt};
use super::{AssetGenerator, BackendError, Planner, TrendSource};
use crate::config::{BackendConfig, PersonaConfig};
use crate::model::{self, ContentPlan, GeneratedAsset, Learning, TrendDescriptor, TrendReport};
use crate::util::truncate_utf8_safe;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

/// Error bodies are cut to this many bytes before landing in a log line
const MAX_ERROR_BODY: usize = 300;

pub struct GeminiBackend {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    trend_model: String,
    planner_model: String,
    image_model: String,
    thinking_budget: u32,
    image_size: String,
    persona: PersonaConfig,
}

impl GeminiBackend {
    /// Create a backend from configuration
    ///
    /// # Errors
    /// Returns [`BackendError::NotConfigured`] when no API key resolves
    pub fn new(config: &BackendConfig, persona: &PersonaConfig) -> Result<Self, BackendError> {
        let api_key = config.resolve_api_key().ok_or_else(|| {
            BackendError::NotConfigured(format!("no API key (set {})", config.key_env))
        })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| BackendError::Network(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!(
            "Initialized Gemini backend: {} (trends: {}, planner: {}, images: {})",
            config.api_base,
            config.trend_model,
            config.planner_model,
            config.image_model
        );

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key,
            trend_model: config.trend_model.clone(),
            planner_model: config.planner_model.clone(),
            image_model: config.image_model.clone(),
            thinking_budget: config.thinking_budget,
            image_size: config.image_size.clone(),
            persona: persona.clone(),
        })
    }

    /// Issue one generateContent call and decode the envelope
    async fn generate(&self, model: &str, body: Value) -> Result<GenerateContentResponse, BackendError> {
        let url = format!("{}/models/{}:generateContent", self.api_base, model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let status_code = status.as_u16();
            if status_code == 429 {
                return Err(BackendError::RateLimited);
            }

            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            return Err(BackendError::Api {
                status: status_code,
                message: truncate_utf8_safe(&error_text, MAX_ERROR_BODY).to_string(),
            });
        }

        response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| BackendError::InvalidResponse(format!("Failed to parse response: {}", e)))
    }
}

/// Request body with an optional system instruction
fn text_request(prompt: &Prompt) -> Value {
    json!({
        "systemInstruction": { "parts": [{ "text": prompt.system }] },
        "contents": [{ "role": "user", "parts": [{ "text": prompt.user }] }],
    })
}

#[async_trait]
impl TrendSource for GeminiBackend {
    async fn analyze_trends(&self) -> Result<TrendReport, BackendError> {
        let mut body = text_request(&trend_prompt(&self.persona));
        body["tools"] = json!([{ "google_search": {} }]);

        let response = self.generate(&self.trend_model, body).await?;
        let trends = parse_trends(&response.text());
        let sources = response.sources();

        tracing::debug!(
            "Trend analysis returned {} trends, {} sources",
            trends.len(),
            sources.len()
        );

        Ok(TrendReport { trends, sources })
    }
}

#[async_trait]
impl Planner for GeminiBackend {
    async fn plan(
        &self,
        trends: &[TrendDescriptor],
        learnings: &[Learning],
    ) -> Result<Vec<ContentPlan>, BackendError> {
        let mut body = text_request(&plan_prompt(&self.persona, trends, learnings));
        body["generationConfig"] = json!({
            "thinkingConfig": { "thinkingBudget": self.thinking_budget },
        });

        let response = self.generate(&self.planner_model, body).await?;
        Ok(parse_plans(&response.text()))
    }
}

#[async_trait]
impl AssetGenerator for GeminiBackend {
    async fn generate_asset(&self, plan: &ContentPlan) -> Result<GeneratedAsset, BackendError> {
        let body = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": asset_prompt(&self.persona, plan) }],
            }],
            "generationConfig": {
                "responseModalities": ["TEXT", "IMAGE"],
                "imageConfig": {
                    "aspectRatio": plan.platform.aspect_ratio(),
                    "imageSize": self.image_size,
                },
            },
        });

        let response = self.generate(&self.image_model, body).await?;
        let image = response.first_image();
        if image.is_none() {
            tracing::debug!("Image model returned no inline image for '{}'", plan.hook);
        }

        Ok(GeneratedAsset { image, video: None })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Response envelope
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Default, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    thought: bool,
    #[serde(default)]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Default, Deserialize)]
struct GroundingChunk {
    #[serde(default)]
    web: Option<WebChunk>,
}

#[derive(Debug, Deserialize)]
struct WebChunk {
    uri: String,
    #[serde(default)]
    title: Option<String>,
}

impl GenerateContentResponse {
    fn parts(&self) -> impl Iterator<Item = &Part> {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .into_iter()
            .flat_map(|c| c.parts.iter())
    }

    /// Concatenated answer text, thought parts excluded
    fn text(&self) -> String {
        self.parts()
            .filter(|p| !p.thought)
            .filter_map(|p| p.text.as_deref())
            .collect()
    }

    /// Web sources the answer was grounded on
    fn sources(&self) -> Vec<model::TrendSource> {
        self.candidates
            .first()
            .and_then(|c| c.grounding_metadata.as_ref())
            .map(|g| {
                g.grounding_chunks
                    .iter()
                    .filter_map(|chunk| chunk.web.as_ref())
                    .map(|web| model::TrendSource {
                        uri: web.uri.clone(),
                        title: web.title.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// First inline image as a `data:` URI
    fn first_image(&self) -> Option<String> {
        self.parts()
            .filter_map(|p| p.inline_data.as_ref())
            .find(|d| d.mime_type.starts_with("image/"))
            .map(|d| format!("data:{};base64,{}", d.mime_type, d.data))
    }
}
