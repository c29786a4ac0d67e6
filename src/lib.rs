//! # Cadence-Compositor
//!
//! Derive stroke-rate rankings and rescaled composition layouts for batch
//! video production.
//!
//! Given a project of "source" compositions annotated with stroke markers and
//! a set of style templates, the library computes a cadence per source, ranks
//! the sources, and describes one new composition per source and template:
//! rescaled layers with hidden ranges trimmed, overlay text, medals and a
//! deterministically chosen background track. A host adapter materializes
//! the descriptions.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cadence_compositor::{
//!     composition::BatchRun,
//!     config::Config,
//!     project::{Project, ProjectSnapshot},
//! };
//!
//! # fn main() -> cadence_compositor::Result<()> {
//! let config = Config::default();
//! let snapshot = ProjectSnapshot::from_file("project.json")?;
//! let project = Project::ingest(&snapshot, &config.batch);
//!
//! let report = BatchRun::new(config, project)?.run()?;
//! println!("{}", report.to_json()?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`cadence`] - Marker-to-rate analysis
//! - [`ranking`] - Placements and medals
//! - [`music`] - Deterministic background track choice
//! - [`timeline`] - Layer scaling, trimming and sequencing
//! - [`project`] - Host snapshot ingestion and naming conventions
//! - [`composition`] - Batch run orchestration
//! - [`config`] - Configuration management
//! - [`format`] - Host-compatible fixed-decimal formatting

pub mod cadence;
pub mod composition;
pub mod config;
pub mod error;
pub mod format;
pub mod music;
pub mod project;
pub mod ranking;
pub mod timeline;

// Re-export commonly used types for convenience
pub use crate::{
    composition::{BatchReport, BatchRun},
    config::Config,
    error::{CompositorError, Result},
    project::{Project, ProjectSnapshot},
};
