use std::collections::BTreeSet;

use tracing::debug;

use crate::{
    error::{CompositionError, Result},
    timeline::types::{LayerKind, SynthesizedLayer, SynthesizedTimeline},
};

/// Join synthesized timelines back-to-back into one reel.
///
/// Each input becomes a single layer spanning its work area, placed at a
/// cursor that advances by the input's work-area duration. The reel takes its
/// frame rate and template from the first input. Inputs are assumed to be
/// disjoint in content; nothing is trimmed.
pub fn sequence(timelines: &[SynthesizedTimeline]) -> Result<SynthesizedTimeline> {
    let first = timelines.first().ok_or_else(|| CompositionError::SequencingFailed {
        reason: "No timelines to sequence".to_string()
    })?;

    let mut cursor = 0.0;
    let mut layers = Vec::with_capacity(timelines.len());

    for (index, timeline) in timelines.iter().enumerate() {
        if !timeline.work_area_duration.is_finite() || timeline.work_area_duration < 0.0 {
            return Err(CompositionError::SequencingFailed {
                reason: format!(
                    "'{}' has invalid work area duration {}",
                    timeline.name, timeline.work_area_duration
                )
            }.into());
        }

        layers.push(SynthesizedLayer {
            name: timeline.name.clone(),
            kind: LayerKind::AudioVisual,
            in_point: cursor,
            out_point: cursor + timeline.work_area_duration,
            // Line the nested work area up with the cursor
            start_time: cursor - timeline.work_area_start,
            z_order: index + 1,
            stretch: None,
        });

        debug!("Reel segment {:02}: {} at {:.2}s", index + 1, timeline.name, cursor);
        cursor += timeline.work_area_duration;
    }

    let name = timelines
        .iter()
        .map(|timeline| timeline.name.as_str())
        .collect::<Vec<_>>()
        .join(" + ");

    let source_id = timelines
        .iter()
        .map(|timeline| timeline.source_id.as_str())
        .collect::<Vec<_>>()
        .join(",");

    Ok(SynthesizedTimeline {
        name,
        source_id,
        template_id: first.template_id.clone(),
        frame_rate: first.frame_rate,
        duration: cursor,
        work_area_start: 0.0,
        work_area_duration: cursor,
        layers,
        overlays: Vec::new(),
        selected_music: None,
        medals: BTreeSet::new(),
        placement: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timeline(name: &str, frame_rate: f64, work_area_start: f64, work_area_duration: f64) -> SynthesizedTimeline {
        SynthesizedTimeline {
            name: name.to_string(),
            source_id: format!("M1a::{}", name),
            template_id: "fullspeed".to_string(),
            frame_rate,
            duration: work_area_start + work_area_duration,
            work_area_start,
            work_area_duration,
            layers: vec![],
            overlays: vec![],
            selected_music: None,
            medals: BTreeSet::new(),
            placement: None,
        }
    }

    #[test]
    fn test_two_timelines_back_to_back() {
        let reel = sequence(&[timeline("a", 25.0, 0.0, 10.0), timeline("b", 50.0, 0.0, 20.0)]).unwrap();

        assert_eq!(reel.work_area_duration, 30.0);
        assert_eq!(reel.duration, 30.0);
        assert_eq!(reel.frame_rate, 25.0);
        assert_eq!((reel.layers[0].in_point, reel.layers[0].out_point), (0.0, 10.0));
        assert_eq!((reel.layers[1].in_point, reel.layers[1].out_point), (10.0, 30.0));
        assert_eq!(reel.name, "a + b");
    }

    #[test]
    fn test_offsets_nested_work_area() {
        let reel = sequence(&[timeline("a", 25.0, 4.0, 10.0), timeline("b", 25.0, 6.0, 5.0)]).unwrap();

        assert_eq!(reel.layers[0].start_time, -4.0);
        assert_eq!(reel.layers[1].start_time, 4.0);
        assert_eq!(reel.layers[1].in_point, 10.0);
    }

    #[test]
    fn test_empty_input_fails() {
        assert!(sequence(&[]).is_err());
    }

    #[test]
    fn test_negative_duration_fails() {
        assert!(sequence(&[timeline("a", 25.0, 0.0, -1.0)]).is_err());
    }
}
