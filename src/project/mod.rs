//! # Host Project Boundary
//!
//! Converts a host project snapshot into the [`Source`] and [`Template`]
//! values the batch works on. Naming conventions live in [`classify`]; no
//! other module looks at item names.

pub mod classify;
pub mod snapshot;

pub use classify::{classify_item, name_field, variant_name, ItemClass};
pub use snapshot::{ItemLayer, ProjectItem, ProjectSnapshot};

use tracing::{debug, info};

use crate::{
    config::BatchConfig,
    music::MusicCandidate,
    timeline::{Source, SourceLayer, Template, TemplateLayer},
};

/// Classified contents of a host project
#[derive(Debug, Clone, Default)]
pub struct Project {
    /// Sources in host order
    pub sources: Vec<Source>,

    /// Templates in host order
    pub templates: Vec<Template>,

    /// Items the host adapter should delete before materializing output
    pub removals: Vec<String>,

    /// Items left untouched
    pub ignored: Vec<String>,
}

impl Project {
    /// Classify every item of a snapshot
    ///
    /// A later item with the same source name or template id replaces the
    /// earlier one in place. Template scale factors come from the matching
    /// batch variant, defaulting to 1.0.
    pub fn ingest(snapshot: &ProjectSnapshot, batch: &BatchConfig) -> Self {
        let mut project = Self::default();

        for item in &snapshot.items {
            match classify_item(&item.name) {
                ItemClass::Template { id } => {
                    let scale_factor = batch.scale_factor_for(&id).unwrap_or(1.0);
                    let template = template_from_item(id, scale_factor, item);
                    replace_or_push(&mut project.templates, template, |a, b| a.id == b.id);
                }
                ItemClass::Source => {
                    replace_or_push(&mut project.sources, source_from_item(item), |a, b| a.id == b.id);
                }
                ItemClass::Ignored => project.ignored.push(item.name.clone()),
                ItemClass::Remove => project.removals.push(item.name.clone()),
            }
        }

        info!(
            "Project: {} sources, {} templates, {} to remove, {} ignored",
            project.sources.len(),
            project.templates.len(),
            project.removals.len(),
            project.ignored.len()
        );

        project
    }

    pub fn template(&self, id: &str) -> Option<&Template> {
        self.templates.iter().find(|template| template.id == id)
    }
}

fn replace_or_push<T>(items: &mut Vec<T>, item: T, same: impl Fn(&T, &T) -> bool) {
    match items.iter().position(|existing| same(existing, &item)) {
        Some(index) => items[index] = item,
        None => items.push(item),
    }
}

fn source_from_item(item: &ProjectItem) -> Source {
    let layers = item.layers
        .iter()
        .enumerate()
        .map(|(index, layer)| SourceLayer {
            name: layer.name.clone(),
            kind: layer.kind,
            in_point: layer.in_point,
            out_point: layer.out_point,
            start_time: layer.start_time,
            markers: layer.markers.clone(),
            z_order: index + 1,
        })
        .collect();

    Source {
        id: item.name.clone(),
        duration: item.duration,
        work_area_start: item.work_area_start,
        work_area_duration: item.work_area_duration,
        frame_rate: item.frame_rate,
        markers: item.markers.clone(),
        layers,
    }
}

fn template_from_item(id: String, scale_factor: f64, item: &ProjectItem) -> Template {
    debug!("Template '{}' from {} (x{})", id, item.name, scale_factor);

    Template {
        id,
        name: item.name.clone(),
        frame_rate: item.frame_rate,
        scale_factor,
        stretch: item.layers.first().and_then(|layer| layer.stretch),
        layers: item.layers
            .iter()
            .map(|layer| TemplateLayer {
                name: layer.name.clone(),
                kind: layer.kind,
                text: layer.text.clone(),
            })
            .collect(),
        // Use counts belong to a batch run, never to the snapshot
        music_candidates: item.music
            .iter()
            .map(|track| MusicCandidate::new(track.name.clone(), track.out_point))
            .collect(),
    }
}
