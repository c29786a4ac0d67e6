use std::collections::{BTreeSet, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cadence::SourceCadence;

/// Tag awarded to the three fastest sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MedalTag {
    #[serde(rename = "medal_rate_1st")]
    First,

    #[serde(rename = "medal_rate_2nd")]
    Second,

    #[serde(rename = "medal_rate_3rd")]
    Third,
}

impl MedalTag {
    /// Tag name, which is also the template layer name it unlocks
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::First => "medal_rate_1st",
            Self::Second => "medal_rate_2nd",
            Self::Third => "medal_rate_3rd",
        }
    }

    pub fn for_placement(placement: usize) -> Option<Self> {
        match placement {
            1 => Some(Self::First),
            2 => Some(Self::Second),
            3 => Some(Self::Third),
            _ => None,
        }
    }
}

impl fmt::Display for MedalTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A source's position in the stroke-rate ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankEntry {
    pub source_id: String,
    pub final_rate: f64,

    /// 1-based, 1 is the highest rate
    pub placement: usize,
}

/// Minimum number of ranked sources before medals are handed out
pub const MEDAL_THRESHOLD: usize = 3;

/// Rank sources by final rate, highest first
///
/// Equal rates are ordered by source id so the ranking does not depend on
/// the order the host enumerated its items in.
pub fn rank(sources: &[(String, f64)]) -> Vec<RankEntry> {
    let mut ordered: Vec<&(String, f64)> = sources.iter().collect();
    ordered.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    ordered
        .into_iter()
        .enumerate()
        .map(|(index, (source_id, final_rate))| RankEntry {
            source_id: source_id.clone(),
            final_rate: *final_rate,
            placement: index + 1,
        })
        .collect()
}

/// Medals for a ranking; empty when fewer than three sources were ranked
pub fn award_medals(entries: &[RankEntry]) -> Vec<(String, MedalTag)> {
    if entries.len() < MEDAL_THRESHOLD {
        return Vec::new();
    }

    entries
        .iter()
        .filter_map(|entry| {
            MedalTag::for_placement(entry.placement).map(|medal| (entry.source_id.clone(), medal))
        })
        .collect()
}

/// Ranking and medals for one batch run
#[derive(Debug, Clone, Default)]
pub struct Standings {
    entries: Vec<RankEntry>,
    medals: HashMap<String, BTreeSet<MedalTag>>,
}

impl Standings {
    /// Rank every source that has rate data; the rest are left out
    pub fn from_cadences(cadences: &[SourceCadence]) -> Self {
        let rated: Vec<(String, f64)> = cadences
            .iter()
            .filter_map(|cadence| cadence.final_rate().map(|rate| (cadence.source_id.clone(), rate)))
            .collect();

        let entries = rank(&rated);

        let mut medals: HashMap<String, BTreeSet<MedalTag>> = HashMap::new();
        for (source_id, medal) in award_medals(&entries) {
            info!("   {} awarded to {}", medal, source_id);
            medals.entry(source_id).or_default().insert(medal);
        }

        Self { entries, medals }
    }

    pub fn entries(&self) -> &[RankEntry] {
        &self.entries
    }

    pub fn placement_of(&self, source_id: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|entry| entry.source_id == source_id)
            .map(|entry| entry.placement)
    }

    pub fn medals_for(&self, source_id: &str) -> BTreeSet<MedalTag> {
        self.medals.get(source_id).cloned().unwrap_or_default()
    }

    pub fn medal_count(&self) -> usize {
        self.medals.values().map(BTreeSet::len).sum()
    }
}
