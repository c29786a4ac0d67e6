use std::collections::BTreeSet;

use crate::{
    cadence::SourceCadence,
    config::OverlayConfig,
    format::to_fixed,
    ranking::MedalTag,
    timeline::{LayerKind, OverlayLayer, Template, TextKeyframe},
};

/// Decide which template layers are copied onto a synthesized timeline and
/// what text they carry.
///
/// - the rate layer shows the final average, or is disabled without rate data
/// - the subtitle layer gets one keyframe per stroke with the running average
/// - other text layers are copied unchanged
/// - non-text layers are copied only when named after a medal the source won
pub fn plan_overlays(
    template: &Template,
    cadence: &SourceCadence,
    medals: &BTreeSet<MedalTag>,
    config: &OverlayConfig,
) -> Vec<OverlayLayer> {
    let mut overlays = Vec::new();

    for layer in &template.layers {
        if layer.kind != LayerKind::Text {
            if medals.iter().any(|medal| medal.as_str() == layer.name) {
                overlays.push(OverlayLayer {
                    name: layer.name.clone(),
                    kind: layer.kind,
                    enabled: true,
                    text: None,
                    keyframes: Vec::new(),
                });
            }
            continue;
        }

        let mut overlay = OverlayLayer {
            name: layer.name.clone(),
            kind: layer.kind,
            enabled: true,
            text: layer.text.clone(),
            keyframes: Vec::new(),
        };

        if layer.name == config.rate_layer {
            match cadence.final_rate() {
                Some(rate) => overlay.text = Some(to_fixed(rate, 2)),
                None => overlay.enabled = false,
            }
        } else if layer.name == config.subtitle_layer {
            if cadence.has_rate_data() {
                overlay.keyframes = subtitle_keyframes(cadence);
            } else {
                overlay.enabled = false;
            }
        }

        overlays.push(overlay);
    }

    overlays
}

/// "Average 27.50 from 3 strokes" at the time each sample becomes known
pub fn subtitle_keyframes(cadence: &SourceCadence) -> Vec<TextKeyframe> {
    cadence
        .samples
        .iter()
        .enumerate()
        .map(|(strokes, sample)| TextKeyframe {
            time: sample.occurs_at,
            text: format!(
                "Average {} from {} stroke{}",
                to_fixed(sample.running_avg_rate, 2),
                strokes,
                if strokes == 1 { "" } else { "s" }
            ),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        cadence::{MarkerSequence, RateAnalyzer},
        timeline::TemplateLayer,
    };

    fn template() -> Template {
        let layer = |name: &str, kind: LayerKind, text: Option<&str>| TemplateLayer {
            name: name.to_string(),
            kind,
            text: text.map(str::to_string),
        };

        Template {
            id: "legacy".to_string(),
            name: "_template:legacy:_2x".to_string(),
            frame_rate: 50.0,
            scale_factor: 2.0,
            stretch: None,
            layers: vec![
                layer("text_rate", LayerKind::Text, Some("--")),
                layer("text_rate_subtitle", LayerKind::Text, None),
                layer("title", LayerKind::Text, Some("Head of the River")),
                layer("medal_rate_1st", LayerKind::AudioVisual, None),
                layer("medal_rate_2nd", LayerKind::AudioVisual, None),
                layer("grade", LayerKind::Other, None),
            ],
            music_candidates: vec![],
        }
    }

    fn cadence(times: &[f64]) -> SourceCadence {
        let samples = RateAnalyzer::new().analyze(&MarkerSequence::from(times.to_vec()), 0.0);
        SourceCadence::new("M1a::Smith", samples)
    }

    #[test]
    fn test_rate_text_and_subtitles() {
        // 20, 30 and 40 spm
        let overlays = plan_overlays(
            &template(),
            &cadence(&[0.0, 3.0, 5.0, 6.5]),
            &BTreeSet::new(),
            &OverlayConfig::default(),
        );

        assert_eq!(overlays.len(), 3);
        assert_eq!(overlays[0].text.as_deref(), Some("30.00"));

        let subtitles: Vec<&str> = overlays[1].keyframes.iter().map(|k| k.text.as_str()).collect();
        assert_eq!(subtitles, vec![
            "Average 20.00 from 0 strokes",
            "Average 25.00 from 1 stroke",
            "Average 30.00 from 2 strokes",
        ]);
        assert_eq!(overlays[1].keyframes[2].time, 6.5);
        assert_eq!(overlays[2].text.as_deref(), Some("Head of the River"));
    }

    #[test]
    fn test_disabled_without_rate_data() {
        let overlays = plan_overlays(&template(), &cadence(&[0.0]), &BTreeSet::new(), &OverlayConfig::default());

        assert!(!overlays[0].enabled);
        assert!(!overlays[1].enabled);
        assert!(overlays[2].enabled);
    }

    #[test]
    fn test_medal_layers_follow_medals() {
        let medals: BTreeSet<MedalTag> = [MedalTag::Second].into_iter().collect();
        let overlays = plan_overlays(&template(), &cadence(&[0.0, 2.0]), &medals, &OverlayConfig::default());

        let names: Vec<&str> = overlays.iter().map(|o| o.name.as_str()).collect();
        assert!(names.contains(&"medal_rate_2nd"));
        assert!(!names.contains(&"medal_rate_1st"));
        assert!(!names.contains(&"grade"));
    }
}
