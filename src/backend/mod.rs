//! Collaborator seam: trend source, planner and asset generator
//!
//! The orchestration loop only talks to these three traits. Implementations:
//!
//! ```text
//! TrendSource + Planner + AssetGenerator
//! ├── GeminiBackend        (Generative Language REST API)
//! ├── DemoBackend          (offline mock content, CONTENTLOOP_DEMO=1)
//! └── UnconfiguredBackend  (no API key - every call fails, loop halts)
//! ```
//!
//! Errors returned from any of these calls abort the current cycle. Malformed
//! structured output is NOT an error: implementations degrade to empty lists
//! (see [`parse`]).

pub mod demo;
pub mod gemini;
pub mod parse;
pub mod prompts;

use crate::config::{BackendConfig, PersonaConfig, ProviderKind};
use crate::model::{ContentPlan, GeneratedAsset, Learning, TrendDescriptor, TrendReport};
use async_trait::async_trait;
use std::sync::Arc;

pub use demo::DemoBackend;
pub use gemini::GeminiBackend;

/// Failure of a collaborator invocation
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// No credentials or provider available
    #[error("Backend not configured: {0}")]
    NotConfigured(String),

    /// Transport-level failure (DNS, connect, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// Rate limited by the backend
    #[error("Rate limited by backend")]
    RateLimited,

    /// Non-success HTTP status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Response envelope could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Produces trend descriptors plus their provenance
#[async_trait]
pub trait TrendSource: Send + Sync {
    async fn analyze_trends(&self) -> Result<TrendReport, BackendError>;
}

/// Turns trends and recent learnings into content plans
#[async_trait]
pub trait Planner: Send + Sync {
    async fn plan(
        &self,
        trends: &[TrendDescriptor],
        learnings: &[Learning],
    ) -> Result<Vec<ContentPlan>, BackendError>;
}

/// Renders one plan into an (optional) image reference
#[async_trait]
pub trait AssetGenerator: Send + Sync {
    async fn generate_asset(&self, plan: &ContentPlan) -> Result<GeneratedAsset, BackendError>;
}

/// The three collaborators the loop drives, in call order
#[derive(Clone)]
pub struct Collaborators {
    pub trends: Arc<dyn TrendSource>,
    pub planner: Arc<dyn Planner>,
    pub generator: Arc<dyn AssetGenerator>,
}

impl Collaborators {
    /// Use one backend for all three roles
    pub fn from_backend<B>(backend: B) -> Self
    where
        B: TrendSource + Planner + AssetGenerator + 'static,
    {
        let backend = Arc::new(backend);
        Self {
            trends: backend.clone(),
            planner: backend.clone(),
            generator: backend,
        }
    }
}

/// Backend used when the selected provider cannot be constructed
///
/// Every call fails with [`BackendError::NotConfigured`], so a started loop
/// halts on its first cycle with a warning instead of silently producing
/// nothing.
#[derive(Debug)]
pub struct UnconfiguredBackend {
    reason: String,
}

impl UnconfiguredBackend {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl TrendSource for UnconfiguredBackend {
    async fn analyze_trends(&self) -> Result<TrendReport, BackendError> {
        Err(BackendError::NotConfigured(self.reason.clone()))
    }
}

#[async_trait]
impl Planner for UnconfiguredBackend {
    async fn plan(
        &self,
        _trends: &[TrendDescriptor],
        _learnings: &[Learning],
    ) -> Result<Vec<ContentPlan>, BackendError> {
        Err(BackendError::NotConfigured(self.reason.clone()))
    }
}

#[async_trait]
impl AssetGenerator for UnconfiguredBackend {
    async fn generate_asset(&self, _plan: &ContentPlan) -> Result<GeneratedAsset, BackendError> {
        Err(BackendError::NotConfigured(self.reason.clone()))
    }
}

/// Create the collaborators from configuration
///
/// Returns the collaborators and a short label for the startup banner.
pub fn create_collaborators(
    config: &BackendConfig,
    persona: &PersonaConfig,
    demo_mode: bool,
) -> (Collaborators, String) {
    if demo_mode || config.provider == ProviderKind::Demo {
        tracing::info!("Using demo backend (mock trends, plans and images)");
        return (
            Collaborators::from_backend(DemoBackend::new(persona.clone())),
            "demo".to_string(),
        );
    }

    match GeminiBackend::new(config, persona) {
        Ok(backend) => {
            let label = format!("gemini ({})", config.planner_model);
            (Collaborators::from_backend(backend), label)
        }
        Err(e) => {
            tracing::error!("Failed to create Gemini backend: {}", e);
            (
                Collaborators::from_backend(UnconfiguredBackend::new(e.to_string())),
                "unconfigured".to_string(),
            )
        }
    }
}
