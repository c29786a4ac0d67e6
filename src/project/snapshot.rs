use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    cadence::MarkerSequence,
    error::{ProjectError, Result},
    music::MusicCandidate,
    timeline::LayerKind,
};

fn default_frame_rate() -> f64 {
    25.0
}

/// Layer of a host composition as exported by the host adapter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemLayer {
    pub name: String,
    pub kind: LayerKind,
    #[serde(default)]
    pub in_point: f64,
    #[serde(default)]
    pub out_point: f64,
    #[serde(default)]
    pub start_time: f64,
    #[serde(default)]
    pub markers: MarkerSequence,

    /// Time-stretch percentage (100 = normal speed)
    #[serde(default)]
    pub stretch: Option<f64>,

    /// Source text of text layers
    #[serde(default)]
    pub text: Option<String>,
}

/// Composition item as exported by the host adapter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectItem {
    pub name: String,
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub work_area_start: f64,
    #[serde(default)]
    pub work_area_duration: f64,
    #[serde(default = "default_frame_rate")]
    pub frame_rate: f64,
    #[serde(default)]
    pub markers: MarkerSequence,

    /// Layers ordered front to back
    #[serde(default)]
    pub layers: Vec<ItemLayer>,

    /// Background tracks offered by a template item
    #[serde(default)]
    pub music: Vec<MusicCandidate>,
}

/// Every composition item of a host project, in host order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectSnapshot {
    pub items: Vec<ProjectItem>,
}

impl ProjectSnapshot {
    /// Load a snapshot from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ProjectError::FileNotFound { path: path.display().to_string() })?;

        serde_json::from_str(&content)
            .map_err(|e| ProjectError::ParseFailed {
                path: path.display().to_string(),
                reason: e.to_string()
            }.into())
    }

    /// Parse a snapshot from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| ProjectError::ParseFailed {
                path: "<inline>".to_string(),
                reason: e.to_string()
            }.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SNAPSHOT: &str = r#"{
        "items": [
            {
                "name": "M1a::Smith",
                "duration": 40.0,
                "work_area_duration": 30.0,
                "markers": [0.0, 2.0, 4.0],
                "layers": [
                    { "name": "footage", "kind": "audio_visual", "in_point": 0.0, "out_point": 40.0 }
                ]
            },
            {
                "name": "_template:legacy:_2x",
                "frame_rate": 50.0,
                "music": [{ "name": "River Run", "out_point": 181.0 }]
            }
        ]
    }"#;

    #[test]
    fn test_parse_with_defaults() {
        let snapshot = ProjectSnapshot::from_json(SNAPSHOT).unwrap();

        assert_eq!(snapshot.items.len(), 2);
        assert_eq!(snapshot.items[0].frame_rate, 25.0);
        assert_eq!(snapshot.items[0].markers.len(), 3);
        assert_eq!(snapshot.items[0].layers[0].kind, LayerKind::AudioVisual);
        assert_eq!(snapshot.items[1].music[0].use_count, 0);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("project.json");
        std::fs::write(&path, SNAPSHOT).unwrap();

        let snapshot = ProjectSnapshot::from_file(&path).unwrap();
        assert_eq!(snapshot.items[1].name, "_template:legacy:_2x");

        assert!(ProjectSnapshot::from_file(dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_malformed_json() {
        assert!(ProjectSnapshot::from_json("{ \"items\": [ { } ] }").is_err());
    }
}
