//! Prompt construction for the generative backend
//!
//! Prompts are plain strings built from the configured persona. Keeping them
//! here lets the Gemini client stay purely about transport.

use crate::config::PersonaConfig;
use crate::model::{ContentPlan, ContentType, Learning, TrendDescriptor};

/// Image quality cues appended to every asset prompt
const CAMERA_CUES: &str = "Cinematic photography, f/1.4 lens, natural light and shadow play, \
visible skin texture and film grain, realistic surfaces. Looks shot on a phone but with an \
artistic eye. Never perfectly smooth.";

/// A system instruction plus the user prompt
#[derive(Debug, Clone)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

pub fn trend_prompt(persona: &PersonaConfig) -> Prompt {
    Prompt {
        system: format!(
            "You are a strategic trend analyst. Keep {} in sync with the real world.",
            persona.name
        ),
        user: format!(
            "Analyze current social media trends (Instagram/TikTok/X) in {}. \
             Use real-world data to find viral formats and locations that are popular right now.\n\
             Output JSON: [{{trendName, context, suggestedAction, location, emotionalTone}}].",
            persona.market
        ),
    }
}

pub fn plan_prompt(
    persona: &PersonaConfig,
    trends: &[TrendDescriptor],
    learnings: &[Learning],
) -> Prompt {
    // Serializing our own plain structs cannot fail; fall back to [] regardless
    let learnings_json = serde_json::to_string(learnings).unwrap_or_else(|_| "[]".to_string());
    let trends_json = serde_json::to_string(trends).unwrap_or_else(|_| "[]".to_string());

    Prompt {
        system: format!(
            "You are {}'s creative director. Position them as a living, breathing person.",
            persona.name
        ),
        user: format!(
            "Character: {name}\n{identity}\n\
             Past learnings: {learnings_json}\n\
             Current trends: {trends_json}\n\n\
             Task: plan {count} high-quality posts for {name} today. Detail the depth, sound \
             and visual layers of each.\n\
             At least one post must be B-roll without {name} in frame (Landscape or Animal).\n\
             JSON output: [{{platform, type, location, action, hook, caption, \
             predictedNaturalness, audioDescription}}].\n\
             platform: Instagram, TikTok, YouTube or X. \
             type: Selfie, POV, Landscape, Animal or Video.",
            name = persona.name,
            identity = persona.identity,
            count = persona.posts_per_cycle,
        ),
    }
}

/// Image prompt for one plan, framed by content type
pub fn asset_prompt(persona: &PersonaConfig, plan: &ContentPlan) -> String {
    let subject = match plan.content_type {
        ContentType::Selfie => format!(
            "{} At {}, {}. Natural, unposed gaze.",
            persona.identity, plan.location, plan.action
        ),
        ContentType::Pov => format!(
            "{}'s point of view in {}, holding an object related to {}, cinematic depth.",
            persona.name, plan.location, plan.action
        ),
        ContentType::Animal => format!(
            "An aesthetic street cat or dog in {}, 35mm lens, shallow depth of field.",
            plan.location
        ),
        _ => format!(
            "A striking city view of {}, {} atmosphere, cinematic framing.",
            plan.location, plan.action
        ),
    };

    format!("{} {}", subject, CAMERA_CUES)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Platform;

    fn plan(content_type: ContentType) -> ContentPlan {
        ContentPlan {
            platform: Platform::Instagram,
            content_type,
            location: "Moda pier".to_string(),
            action: "morning coffee".to_string(),
            hook: "hook".to_string(),
            caption: "caption".to_string(),
            predicted_naturalness: None,
            audio_description: None,
        }
    }

    #[test]
    fn selfie_prompt_embeds_identity() {
        let persona = PersonaConfig::default();
        let prompt = asset_prompt(&persona, &plan(ContentType::Selfie));
        assert!(prompt.starts_with(&persona.identity));
        assert!(prompt.contains("Moda pier"));
    }

    #[test]
    fn b_roll_prompts_leave_persona_out() {
        let persona = PersonaConfig::default();
        let animal = asset_prompt(&persona, &plan(ContentType::Animal));
        assert!(!animal.contains(&persona.identity));
        assert!(animal.contains("35mm"));

        let landscape = asset_prompt(&persona, &plan(ContentType::Landscape));
        assert!(landscape.contains("morning coffee atmosphere"));
    }

    #[test]
    fn plan_prompt_carries_trends_and_learnings() {
        let persona = PersonaConfig::default();
        let trends = vec![TrendDescriptor {
            trend_name: Some("Ferry sunsets".to_string()),
            ..TrendDescriptor::default()
        }];
        let prompt = plan_prompt(&persona, &trends, &[]);
        assert!(prompt.user.contains("Ferry sunsets"));
        assert!(prompt.user.contains("Past learnings: []"));
        assert!(prompt.system.contains(&persona.name));
    }
}
