//! Persona and seeded learnings
//!
//! The persona is the character every plan is written for. Learnings are
//! optional feedback entries passed to the planner; only the first few are
//! used per cycle.

use crate::model::{Impact, Learning};
use serde::Deserialize;

/// Character the content is produced for
#[derive(Debug, Clone, PartialEq)]
pub struct PersonaConfig {
    pub name: String,
    /// City or region trends are analyzed for
    pub market: String,
    /// Visual identity, prepended to selfie image prompts
    pub identity: String,
    /// Plans requested per cycle
    pub posts_per_cycle: usize,
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self {
            name: "Elif".to_string(),
            market: "Istanbul".to_string(),
            identity: "A 26-year-old woman with shoulder-length dark wavy hair, warm olive skin \
                       and an easy, unposed smile, dressed in relaxed neutral layers."
                .to_string(),
            posts_per_cycle: 3,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FilePersona {
    pub name: Option<String>,
    pub market: Option<String>,
    pub identity: Option<String>,
    pub posts_per_cycle: Option<usize>,
}

impl PersonaConfig {
    pub fn from_file(file: Option<FilePersona>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            name: file.name.unwrap_or(defaults.name),
            market: file.market.unwrap_or(defaults.market),
            identity: file.identity.unwrap_or(defaults.identity),
            posts_per_cycle: file
                .posts_per_cycle
                .unwrap_or(defaults.posts_per_cycle)
                .clamp(1, 10),
        }
    }
}

/// A `[[learnings]]` entry from the config file
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LearningSeed {
    pub category: String,
    pub insight: String,
    /// "positive" or "negative"
    #[serde(default = "default_impact")]
    pub impact: String,
}

fn default_impact() -> String {
    "positive".to_string()
}

impl LearningSeed {
    pub fn to_learning(&self, index: usize) -> Learning {
        let impact = if self.impact.eq_ignore_ascii_case("negative") {
            Impact::Negative
        } else {
            Impact::Positive
        };

        Learning {
            id: format!("seed-{}", index + 1),
            category: self.category.clone(),
            insight: self.insight.clone(),
            impact,
        }
    }
}
