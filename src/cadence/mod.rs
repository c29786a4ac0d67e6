//! # Cadence Analysis Module
//!
//! Turns marker timestamps into stroke-rate samples. Each adjacent pair of
//! markers gives an instantaneous "spot rate" in strokes per minute, and the
//! accepted spot rates of one marker sequence are folded into a cumulative
//! average.
//!
//! ## Usage
//!
//! ```rust
//! use cadence_compositor::cadence::{MarkerSequence, RateAnalyzer};
//!
//! let analyzer = RateAnalyzer::new();
//! let samples = analyzer.analyze(&MarkerSequence::from(vec![0.0, 2.0, 4.0]), 0.0);
//!
//! assert_eq!(samples.len(), 2);
//! assert_eq!(samples[1].running_avg_rate, 30.0);
//! ```

pub mod analyzer;
pub mod types;

pub use analyzer::RateAnalyzer;
pub use types::{CadenceSample, MarkerSequence, SourceCadence};
