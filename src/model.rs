// Domain types shared by the loop, the collaborators and the presentation layer
//
// Everything here is plain data. Assets and log entries are created once and
// never mutated; the orchestrator owns the buffers they live in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Naturalness assumed when a plan carries no prediction
pub const DEFAULT_NATURALNESS: u8 = 96;

/// Publishing platform for a planned asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Platform {
    Instagram,
    TikTok,
    YouTube,
    X,
}

impl Platform {
    /// Lenient parse of a model-produced platform name
    ///
    /// Accepts case-insensitive names plus the aliases models tend to emit
    /// ("Twitter", "Reels", "Shorts"). Returns None for anything else.
    pub fn parse(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase();
        let platform = match lower.as_str() {
            "instagram" | "ig" | "reels" | "instagram reels" => Self::Instagram,
            "tiktok" | "tik tok" => Self::TikTok,
            "youtube" | "yt" | "shorts" | "youtube shorts" => Self::YouTube,
            "x" | "twitter" | "x (twitter)" => Self::X,
            _ => return None,
        };
        Some(platform)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Instagram => "Instagram",
            Self::TikTok => "TikTok",
            Self::YouTube => "YouTube",
            Self::X => "X",
        }
    }

    /// Image aspect ratio requested from the generator
    ///
    /// X favours landscape cards, everything else is vertical video format.
    pub fn aspect_ratio(&self) -> &'static str {
        match self {
            Self::X => "16:9",
            _ => "9:16",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of content a plan describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentType {
    Selfie,
    #[serde(rename = "POV")]
    Pov,
    Landscape,
    Animal,
    Lifestyle,
    Video,
}

impl ContentType {
    pub fn parse(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase();
        let kind = match lower.as_str() {
            "selfie" => Self::Selfie,
            "pov" | "point of view" => Self::Pov,
            "landscape" | "b-roll" | "broll" | "cityscape" => Self::Landscape,
            "animal" | "pet" => Self::Animal,
            "lifestyle" => Self::Lifestyle,
            "video" | "reel" => Self::Video,
            _ => return None,
        };
        Some(kind)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Selfie => "Selfie",
            Self::Pov => "POV",
            Self::Landscape => "Landscape",
            Self::Animal => "Animal",
            Self::Lifestyle => "Lifestyle",
            Self::Video => "Video",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Publication status of an asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssetStatus {
    Draft,
    Generating,
    Published,
}

/// Synthesized performance figures attached to an asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetMetrics {
    pub views: u64,
    /// 0-100, how organic the asset looks
    pub naturalness_score: u8,
    /// Always `100 - naturalness_score`
    pub risk_score: u8,
    pub engagement_rate: f64,
    pub audio_depth: u8,
}

/// One produced artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentAsset {
    /// Opaque best-effort token, not a unique key
    pub id: String,
    pub platform: Platform,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub hook: String,
    pub caption: String,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub status: AssetStatus,
    /// Location/behavior hint the plan was built around
    pub behavior_model: String,
    pub visual_hash: String,
    pub created_at: DateTime<Utc>,
    pub metrics: AssetMetrics,
}

/// Severity tag for loop log entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogSeverity {
    Info,
    Success,
    Warning,
}

/// One line in the loop's activity log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Monotonically increasing per orchestrator
    pub id: u64,
    pub message: String,
    pub severity: LogSeverity,
    pub timestamp: DateTime<Utc>,
}

/// Provenance record attached to the latest trend analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSource {
    pub uri: String,
    pub title: Option<String>,
}

impl TrendSource {
    /// Title for display, falling back to a generic label
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or("External Intelligence")
    }
}

/// A trend descriptor as returned by the trend source
///
/// All fields are free text and optional; models are inconsistent about
/// which ones they fill. Unknown fields are kept so they can be passed on to
/// the planner verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendDescriptor {
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub trend_name: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub context: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub suggested_action: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub location: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub emotional_tone: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Free-text field as a model emits it
///
/// Numbers and booleans are kept as their text form; null, arrays and objects
/// read as absent.
pub(crate) fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

/// Output of one trend analysis call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrendReport {
    pub trends: Vec<TrendDescriptor>,
    pub sources: Vec<TrendSource>,
}

/// One content plan produced by the planner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentPlan {
    pub platform: Platform,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub location: String,
    pub action: String,
    pub hook: String,
    pub caption: String,
    pub predicted_naturalness: Option<u8>,
    pub audio_description: Option<String>,
}

/// Output of the asset generator for one plan
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneratedAsset {
    /// Image reference, usually a `data:` URI
    pub image: Option<String>,
    pub video: Option<String>,
}

/// Direction of a learning's effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Impact {
    Positive,
    Negative,
}

/// Feedback fed into planning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Learning {
    pub id: String,
    pub category: String,
    pub insight: String,
    pub impact: Impact,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_aliases() {
        assert_eq!(Platform::parse("instagram"), Some(Platform::Instagram));
        assert_eq!(Platform::parse(" Twitter "), Some(Platform::X));
        assert_eq!(Platform::parse("YouTube Shorts"), Some(Platform::YouTube));
        assert_eq!(Platform::parse("TikTok"), Some(Platform::TikTok));
        assert_eq!(Platform::parse("myspace"), None);
    }

    #[test]
    fn content_type_parse_and_serde_name() {
        assert_eq!(ContentType::parse("pov"), Some(ContentType::Pov));
        assert_eq!(ContentType::parse("B-Roll"), Some(ContentType::Landscape));
        assert_eq!(ContentType::parse("hologram"), None);

        let json = serde_json::to_string(&ContentType::Pov).unwrap();
        assert_eq!(json, "\"POV\"");
    }

    #[test]
    fn aspect_ratio_follows_platform() {
        assert_eq!(Platform::X.aspect_ratio(), "16:9");
        assert_eq!(Platform::TikTok.aspect_ratio(), "9:16");
    }

    #[test]
    fn source_title_fallback() {
        let source = TrendSource {
            uri: "https://example.com".to_string(),
            title: Some("  ".to_string()),
        };
        assert_eq!(source.display_title(), "External Intelligence");
    }

    #[test]
    fn trend_descriptor_keeps_unknown_fields() {
        let json = r##"{"trendName": "Sunset ferry", "hashtags": ["#ferry"]}"##;
        let trend: TrendDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(trend.trend_name.as_deref(), Some("Sunset ferry"));
        assert!(trend.extra.contains_key("hashtags"));

        let back = serde_json::to_value(&trend).unwrap();
        assert_eq!(back["hashtags"][0], "#ferry");
        assert!(back.get("context").is_none());
    }

    #[test]
    fn trend_descriptor_tolerates_odd_field_types() {
        let json = r#"{"trendName": "Night market", "emotionalTone": 5, "context": null,
                       "location": ["Moda"], "suggestedAction": true}"#;
        let trend: TrendDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(trend.trend_name.as_deref(), Some("Night market"));
        assert_eq!(trend.emotional_tone.as_deref(), Some("5"));
        assert_eq!(trend.context, None);
        assert_eq!(trend.location, None);
        assert_eq!(trend.suggested_action.as_deref(), Some("true"));
    }
}
