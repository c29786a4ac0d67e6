//! # Ranking
//!
//! Orders sources by their final stroke rate and hands out medal tags to the
//! top three.

pub mod engine;

pub use engine::{award_medals, rank, MedalTag, RankEntry, Standings, MEDAL_THRESHOLD};
