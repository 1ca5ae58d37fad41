// Demo backend: offline trends, plans and images for showcasing the dashboard
//
// Plays all three collaborator roles without network access. Output is drawn
// from small canned pools so every cycle looks a little different:
// - 3-4 trends with matching grounding sources
// - 3 plans per cycle, at least one B-roll (Landscape or Animal)
// - SVG postcards as image data URIs, with the occasional missing image
//
// Run with: CONTENTLOOP_DEMO=1 cargo run --release

use super::{AssetGenerator, BackendError, Planner, TrendSource};
use crate::config::PersonaConfig;
use crate::model::{
    self, ContentPlan, ContentType, GeneratedAsset, Learning, Platform, TrendDescriptor,
    TrendReport,
};
use async_trait::async_trait;
use base64::Engine;
use rand::seq::SliceRandom;
use rand::Rng;
use std::time::Duration;
use tokio::time::sleep;

/// (trend, context, action, location, tone, source host)
const TREND_POOL: &[(&str, &str, &str, &str, &str, &str)] = &[
    ("Ferry golden hour", "Commuters filming sunset crossings", "Film the wake at dusk", "Kadikoy pier", "nostalgic", "citylife.example"),
    ("Third-wave coffee crawl", "Tiny roasteries trending on short video", "Rate three cups in one street", "Moda", "playful", "brewguide.example"),
    ("Street cat portraits", "Neighbourhood cats as local celebrities", "Close-up of a cat on a warm step", "Cihangir", "tender", "petfeed.example"),
    ("Rooftop reading", "Slow-living posts outperform hustle content", "Read at a rooftop cafe", "Galata", "calm", "slowdays.example"),
    ("Rainy tram POV", "Moody window shots gaining saves", "Ride the nostalgic tram in the rain", "Istiklal", "melancholic", "moodboard.example"),
    ("Market haul", "Seasonal produce hauls with price tags", "Show a Tuesday market haul", "Feriköy", "cheerful", "localbuzz.example"),
];

/// (type, hook, caption, audio)
const PLAN_POOL: &[(ContentType, &str, &str, &str)] = &[
    (ContentType::Selfie, "Caught the last light", "Some evenings just ask to be remembered", "Soft wind, distant gulls, a ferry horn"),
    (ContentType::Pov, "POV: your morning ritual", "Same cup, same bench, new day", "Espresso machine hiss, spoon against porcelain"),
    (ContentType::Lifestyle, "Slow Sunday reset", "Phone down, book open", "Page turns, muffled street chatter"),
    (ContentType::Video, "30 seconds of this street", "Tell me you've been here", "Tram bell, footsteps on wet stone"),
];

/// (type, hook, caption, audio) for shots without the persona in frame
const BROLL_POOL: &[(ContentType, &str, &str, &str)] = &[
    (ContentType::Landscape, "The city from up here", "Every rooftop tells a story", "City hum, far-off call to prayer"),
    (ContentType::Animal, "Local celebrity spotted", "He runs this street, we just live here", "Purring, a shop shutter rolling up"),
    (ContentType::Landscape, "Blue hour on the water", "Nobody talks on this ferry, and that's fine", "Water against the hull, low engine drone"),
];

const PALETTES: &[(&str, &str)] = &[
    ("#ff9a8b", "#ff6a88"),
    ("#a1c4fd", "#c2e9fb"),
    ("#fbc2eb", "#a6c1ee"),
    ("#fddb92", "#d1fdff"),
    ("#84fab0", "#8fd3f4"),
];

pub struct DemoBackend {
    persona: PersonaConfig,
    latency: Duration,
    missing_image_rate: f64,
}

impl DemoBackend {
    pub fn new(persona: PersonaConfig) -> Self {
        Self {
            persona,
            latency: Duration::from_millis(600),
            missing_image_rate: 0.1,
        }
    }

    /// Base latency per call; actual delay varies up to 1.5x
    #[cfg(test)]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    #[cfg(test)]
    pub fn with_missing_image_rate(mut self, rate: f64) -> Self {
        self.missing_image_rate = rate.clamp(0.0, 1.0);
        self
    }

    async fn simulate_latency(&self) {
        if self.latency.is_zero() {
            return;
        }
        let factor = rand::thread_rng().gen_range(1.0..1.5);
        sleep(self.latency.mul_f64(factor)).await;
    }
}

#[async_trait]
impl TrendSource for DemoBackend {
    async fn analyze_trends(&self) -> Result<TrendReport, BackendError> {
        self.simulate_latency().await;

        let picked: Vec<_> = {
            let mut rng = rand::thread_rng();
            let count = rng.gen_range(3..=4);
            TREND_POOL.choose_multiple(&mut rng, count).collect()
        };

        let trends = picked
            .iter()
            .map(|(name, context, action, location, tone, _)| TrendDescriptor {
                trend_name: Some(name.to_string()),
                context: Some(context.to_string()),
                suggested_action: Some(action.to_string()),
                location: Some(format!("{}, {}", location, self.persona.market)),
                emotional_tone: Some(tone.to_string()),
                ..TrendDescriptor::default()
            })
            .collect();

        let sources = picked
            .iter()
            .map(|(name, _, _, _, _, host)| model::TrendSource {
                uri: format!("https://{}/{}", host, slug(name)),
                title: Some(name.to_string()),
            })
            .collect();

        Ok(TrendReport { trends, sources })
    }
}

#[async_trait]
impl Planner for DemoBackend {
    async fn plan(
        &self,
        trends: &[TrendDescriptor],
        _learnings: &[Learning],
    ) -> Result<Vec<ContentPlan>, BackendError> {
        self.simulate_latency().await;

        let count = self.persona.posts_per_cycle.max(1);
        let mut rng = rand::thread_rng();
        let platforms = [Platform::Instagram, Platform::TikTok, Platform::YouTube, Platform::X];

        let plans = (0..count)
            .map(|i| {
                // Last slot is always B-roll
                let (content_type, hook, caption, audio) = if i + 1 == count {
                    *BROLL_POOL.choose(&mut rng).unwrap_or(&BROLL_POOL[0])
                } else {
                    *PLAN_POOL.choose(&mut rng).unwrap_or(&PLAN_POOL[0])
                };

                let trend = if trends.is_empty() {
                    None
                } else {
                    trends.get(i % trends.len())
                };

                ContentPlan {
                    platform: *platforms.choose(&mut rng).unwrap_or(&Platform::Instagram),
                    content_type,
                    location: trend
                        .and_then(|t| t.location.clone())
                        .unwrap_or_else(|| self.persona.market.clone()),
                    action: trend
                        .and_then(|t| t.suggested_action.clone())
                        .unwrap_or_else(|| "wandering the neighbourhood".to_string()),
                    hook: hook.to_string(),
                    caption: caption.to_string(),
                    predicted_naturalness: Some(rng.gen_range(88..=99)),
                    audio_description: Some(audio.to_string()),
                }
            })
            .collect();

        Ok(plans)
    }
}

#[async_trait]
impl AssetGenerator for DemoBackend {
    async fn generate_asset(&self, plan: &ContentPlan) -> Result<GeneratedAsset, BackendError> {
        self.simulate_latency().await;

        let (missing, palette) = {
            let mut rng = rand::thread_rng();
            let missing = rng.gen_bool(self.missing_image_rate);
            (missing, *PALETTES.choose(&mut rng).unwrap_or(&PALETTES[0]))
        };

        if missing {
            return Ok(GeneratedAsset::default());
        }

        let svg = postcard_svg(plan, palette);
        let encoded = base64::engine::general_purpose::STANDARD.encode(svg);

        Ok(GeneratedAsset {
            image: Some(format!("data:image/svg+xml;base64,{}", encoded)),
            video: None,
        })
    }
}

/// Gradient card with the plan hook, sized to the platform aspect ratio
fn postcard_svg(plan: &ContentPlan, (from, to): (&str, &str)) -> String {
    let (width, height) = match plan.platform.aspect_ratio() {
        "16:9" => (1280, 720),
        _ => (720, 1280),
    };

    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}"><defs><linearGradient id="g" x1="0" y1="0" x2="1" y2="1"><stop offset="0" stop-color="{from}"/><stop offset="1" stop-color="{to}"/></linearGradient></defs><rect width="100%" height="100%" fill="url(#g)"/><text x="50%" y="50%" text-anchor="middle" font-family="sans-serif" font-size="42" fill="#ffffff">{hook}</text><text x="50%" y="58%" text-anchor="middle" font-family="sans-serif" font-size="24" fill="#ffffff">{kind} - {location}</text></svg>"##,
        w = width,
        h = height,
        from = from,
        to = to,
        hook = xml_escape(&plan.hook),
        kind = plan.content_type,
        location = xml_escape(&plan.location),
    )
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn slug(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect()
}
