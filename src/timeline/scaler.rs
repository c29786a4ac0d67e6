use std::collections::BTreeSet;

use tracing::debug;

use crate::{
    config::TimelineConfig,
    error::{Result, TimelineError},
    timeline::types::{LayerKind, Source, SourceLayer, SynthesizedLayer, SynthesizedTimeline, Template},
};

/// Rescale layers by `scale_factor` and trim the parts hidden by layers in
/// front of them.
///
/// Layers are processed front to back (ascending `z_order`). Each layer is
/// clamped to the work area and `hard_cap`, then trimmed against every layer
/// already processed: a front layer covering its start pushes the in point
/// to the front's out point, and a front layer that it runs into pulls the
/// out point back to the front's in point. Both tests are strict, so a layer
/// sharing a front layer's in point is left alone.
///
/// Layers trimmed to `in_point >= out_point` are still returned and still
/// take part in trimming the layers behind them.
pub fn scale_and_trim(
    source_layers: &[SourceLayer],
    scale_factor: f64,
    work_area_start: f64,
    work_area_end: f64,
    hard_cap: f64,
) -> Result<Vec<SynthesizedLayer>> {
    if !scale_factor.is_finite() || scale_factor <= 0.0 {
        return Err(TimelineError::InvalidScaleFactor { value: scale_factor }.into());
    }
    if !hard_cap.is_finite() || hard_cap <= 0.0 {
        return Err(TimelineError::InvalidHardCap { value: hard_cap }.into());
    }
    if !work_area_start.is_finite() || !work_area_end.is_finite() || work_area_start > work_area_end {
        return Err(TimelineError::InvalidWorkArea {
            start: work_area_start,
            end: work_area_end,
        }.into());
    }

    let mut ordered: Vec<&SourceLayer> = source_layers.iter().collect();
    ordered.sort_by_key(|layer| layer.z_order);

    let mut synthesized: Vec<SynthesizedLayer> = Vec::with_capacity(ordered.len());

    for layer in ordered {
        // start time first: it shifts in/out points when applied in the host
        let start_time = layer.start_time * scale_factor;
        let mut in_point = (layer.in_point * scale_factor).max(work_area_start);
        let mut out_point = (layer.out_point * scale_factor).min(hard_cap).min(work_area_end);

        for front in &synthesized {
            if in_point > front.in_point && in_point < front.out_point {
                in_point = front.out_point;
            }
            if in_point < front.in_point && out_point > front.in_point {
                out_point = front.in_point;
            }
        }

        if in_point >= out_point {
            debug!(
                "Layer {} '{}' fully hidden after trim ({:.3}-{:.3})",
                layer.z_order, layer.name, in_point, out_point
            );
        }

        synthesized.push(SynthesizedLayer {
            name: layer.name.clone(),
            kind: layer.kind,
            in_point,
            out_point,
            start_time,
            z_order: layer.z_order,
            stretch: None,
        });
    }

    Ok(synthesized)
}

/// Builds the geometry of one synthesized timeline from a source and a template
#[derive(Debug, Clone, Default)]
pub struct TimelineScaler {
    config: TimelineConfig,
}

impl TimelineScaler {
    pub fn new(config: TimelineConfig) -> Self {
        Self { config }
    }

    /// Scale the source's duration, work area and layers by the template's
    /// factor. Overlays, music, medals and placement are left empty.
    pub fn synthesize(&self, name: &str, source: &Source, template: &Template) -> Result<SynthesizedTimeline> {
        let scale_factor = template.scale_factor;
        let work_area_start = source.work_area_start * scale_factor;
        let work_area_duration = source.work_area_duration * scale_factor;
        let work_area_end = work_area_start + work_area_duration;

        let mut layers = scale_and_trim(
            &source.layers,
            scale_factor,
            work_area_start,
            work_area_end,
            self.config.hard_cap,
        )?;

        for layer in layers.iter_mut().filter(|layer| layer.kind == LayerKind::AudioVisual) {
            layer.stretch = template.stretch;
        }

        debug!(
            "{} x{}: {} layers, work area {:.2}-{:.2}",
            name, scale_factor, layers.len(), work_area_start, work_area_end
        );

        Ok(SynthesizedTimeline {
            name: name.to_string(),
            source_id: source.id.clone(),
            template_id: template.id.clone(),
            frame_rate: template.frame_rate,
            duration: source.duration * scale_factor,
            work_area_start,
            work_area_duration,
            layers,
            overlays: Vec::new(),
            selected_music: None,
            medals: BTreeSet::new(),
            placement: None,
        })
    }
}
