//! # Music Selection
//!
//! Content-addressed choice of a background track per synthesized
//! composition. The same template, composition name and length always yield
//! the same track, so re-running a batch reproduces its soundtrack.

pub mod selector;

pub use selector::{rolling_hash, MusicCandidate, MusicSelector};
