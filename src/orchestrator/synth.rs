// Asset synthesis: turn a plan plus a rendered image into a published asset
//
// Metrics are synthesized, not measured. Ranges:
//   views        500..1500
//   engagement   3.0..11.0 (%)
//   audio depth  80..100
//   naturalness  the plan's prediction, or 96 when absent
//   risk         100 - naturalness

use crate::model::{
    AssetMetrics, AssetStatus, ContentAsset, ContentPlan, GeneratedAsset, DEFAULT_NATURALNESS,
};
use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::Rng;

const ID_LEN: usize = 9;

pub fn synthesize_asset(plan: &ContentPlan, generated: GeneratedAsset) -> ContentAsset {
    let mut rng = rand::thread_rng();
    let naturalness = plan
        .predicted_naturalness
        .unwrap_or(DEFAULT_NATURALNESS)
        .min(100);
    let created_at = Utc::now();

    ContentAsset {
        id: (&mut rng)
            .sample_iter(Alphanumeric)
            .take(ID_LEN)
            .map(|b| char::from(b).to_ascii_lowercase())
            .collect(),
        platform: plan.platform,
        content_type: plan.content_type,
        hook: plan.hook.clone(),
        caption: plan.caption.clone(),
        image_url: generated.image,
        video_url: generated.video,
        status: AssetStatus::Published,
        behavior_model: plan.location.clone(),
        visual_hash: format!(
            "m_{}_{:04x}",
            created_at.timestamp_millis(),
            rng.gen::<u16>()
        ),
        created_at,
        metrics: AssetMetrics {
            views: rng.gen_range(500..1500),
            naturalness_score: naturalness,
            risk_score: 100 - naturalness,
            engagement_rate: rng.gen_range(3.0..11.0),
            audio_depth: rng.gen_range(80..100),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ContentType, Platform};

    fn plan(predicted: Option<u8>) -> ContentPlan {
        ContentPlan {
            platform: Platform::TikTok,
            content_type: ContentType::Landscape,
            location: "Galata".to_string(),
            action: "dusk walk".to_string(),
            hook: "Golden hour".to_string(),
            caption: "Quiet city".to_string(),
            predicted_naturalness: predicted,
            audio_description: None,
        }
    }

    fn image() -> GeneratedAsset {
        GeneratedAsset {
            image: Some("data:image/png;base64,AAAA".to_string()),
            video: None,
        }
    }

    #[test]
    fn naturalness_and_risk_are_complementary() {
        let asset = synthesize_asset(&plan(Some(90)), image());
        assert_eq!(asset.metrics.naturalness_score, 90);
        assert_eq!(asset.metrics.risk_score, 10);

        let asset = synthesize_asset(&plan(None), image());
        assert_eq!(asset.metrics.naturalness_score, DEFAULT_NATURALNESS);
        assert_eq!(asset.metrics.risk_score, 4);

        let asset = synthesize_asset(&plan(Some(0)), image());
        assert_eq!(asset.metrics.naturalness_score, 0);
        assert_eq!(asset.metrics.risk_score, 100);
    }

    #[test]
    fn metrics_within_ranges() {
        for _ in 0..200 {
            let m = synthesize_asset(&plan(None), image()).metrics;
            assert!((500..1500).contains(&m.views));
            assert!((3.0..11.0).contains(&m.engagement_rate));
            assert!((80..100).contains(&m.audio_depth));
        }
    }

    #[test]
    fn carries_plan_fields() {
        let asset = synthesize_asset(&plan(Some(93)), image());
        assert_eq!(asset.status, AssetStatus::Published);
        assert_eq!(asset.behavior_model, "Galata");
        assert_eq!(asset.hook, "Golden hour");
        assert_eq!(asset.image_url.as_deref(), Some("data:image/png;base64,AAAA"));
        assert_eq!(asset.id.len(), ID_LEN);
        assert!(asset.visual_hash.starts_with("m_"));
        assert_eq!(asset.visual_hash.rsplit('_').next().unwrap().len(), 4);
    }
}
