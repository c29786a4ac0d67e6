use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{config::MusicConfig, format::to_fixed};

/// A background track a template can be paired with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MusicCandidate {
    /// Asset name in the host project
    pub name: String,

    /// Track length in seconds
    pub out_point: f64,

    /// Times this track was picked during the current batch run
    #[serde(default)]
    pub use_count: u32,
}

impl MusicCandidate {
    pub fn new<S: Into<String>>(name: S, out_point: f64) -> Self {
        Self {
            name: name.into(),
            out_point,
            use_count: 0,
        }
    }
}

/// 32-bit multiply-by-31 rolling hash over UTF-16 code units
///
/// Wraps on overflow, so it matches `String.hashCode` style hashes bit for bit.
pub fn rolling_hash(key: &str) -> i32 {
    key.encode_utf16().fold(0i32, |hash, unit| {
        (hash << 5).wrapping_sub(hash).wrapping_add(i32::from(unit))
    })
}

/// Deterministic scorer that pairs each composition with one track
#[derive(Debug, Clone, Default)]
pub struct MusicSelector {
    config: MusicConfig,
}

impl MusicSelector {
    pub fn new(config: MusicConfig) -> Self {
        Self { config }
    }

    /// Score one candidate for a composition
    ///
    /// The hash term spreads choices across tracks; the length term favours
    /// tracks about `length_bias` seconds longer than the composition.
    pub fn credit(
        &self,
        candidate: &MusicCandidate,
        template_id: &str,
        composition_name: &str,
        composition_out_point: f64,
    ) -> f64 {
        let key = format!(
            "{}{}{}{}",
            template_id, composition_name, candidate.name, to_fixed(composition_out_point, 1)
        );
        // `%` truncates toward zero, so negative hashes give negative spread.
        // A zero modulus spreads nothing.
        let spread = rolling_hash(&key)
            .checked_rem(self.config.credit_modulus)
            .unwrap_or(0);
        let length_penalty = (composition_out_point - candidate.out_point + self.config.length_bias).abs();

        f64::from(spread) - length_penalty
    }

    /// Credits for every candidate, in candidate order
    pub fn credits(
        &self,
        candidates: &[MusicCandidate],
        template_id: &str,
        composition_name: &str,
        composition_out_point: f64,
    ) -> Vec<f64> {
        candidates
            .iter()
            .map(|candidate| self.credit(candidate, template_id, composition_name, composition_out_point))
            .collect()
    }

    /// Pick the candidate with the highest credit and bump its use count
    ///
    /// The first candidate wins ties. Returns a copy of the chosen candidate
    /// after the increment, or `None` when there are no candidates.
    pub fn select(
        &self,
        candidates: &mut [MusicCandidate],
        template_id: &str,
        composition_name: &str,
        composition_out_point: f64,
    ) -> Option<MusicCandidate> {
        let mut best: Option<(usize, f64)> = None;

        for (index, candidate) in candidates.iter().enumerate() {
            let credit = self.credit(candidate, template_id, composition_name, composition_out_point);
            debug!("   {} for {}: credit {:.1}", candidate.name, composition_name, credit);

            if best.map_or(true, |(_, top)| credit > top) {
                best = Some((index, credit));
            }
        }

        let (index, _) = best?;
        let chosen = &mut candidates[index];
        chosen.use_count += 1;
        Some(chosen.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates() -> Vec<MusicCandidate> {
        vec![
            MusicCandidate::new("River Run", 181.0),
            MusicCandidate::new("Fast Lane", 240.5),
            MusicCandidate::new("Slow Burn", 95.0),
        ]
    }

    #[test]
    fn test_rolling_hash_reference_values() {
        assert_eq!(rolling_hash(""), 0);
        assert_eq!(rolling_hash("hello"), 99162322);
        assert_eq!(rolling_hash("Aa"), rolling_hash("BB"));
        assert_eq!(rolling_hash("polygenelubricants"), i32::MIN);
        assert_eq!(rolling_hash("été"), 227742);
    }

    #[test]
    fn test_credit_uses_truncated_modulo() {
        let selector = MusicSelector::default();
        let tracks = candidates();

        // hash -1363765496 -> spread -26, penalty |200 - 181 + 10| = 29
        assert_eq!(selector.credit(&tracks[0], "legacy", "Smith_2x", 200.0), -55.0);
        // hash 391230895 -> spread 25, penalty |200 - 240.5 + 10| = 30.5
        assert_eq!(selector.credit(&tracks[1], "legacy", "Smith_2x", 200.0), -5.5);
        // hash -1526893807 -> spread -7, penalty 115
        assert_eq!(selector.credit(&tracks[2], "legacy", "Smith_2x", 200.0), -122.0);
    }

    #[test]
    fn test_select_highest_credit_and_count_use() {
        let selector = MusicSelector::default();
        let mut tracks = candidates();

        let chosen = selector.select(&mut tracks, "legacy", "Smith_2x", 200.0).unwrap();
        assert_eq!(chosen.name, "Fast Lane");
        assert_eq!(chosen.use_count, 1);
        assert_eq!(tracks[1].use_count, 1);
        assert_eq!(tracks[0].use_count, 0);

        selector.select(&mut tracks, "legacy", "Smith_2x", 200.0).unwrap();
        assert_eq!(tracks[1].use_count, 2);
    }

    #[test]
    fn test_selection_is_deterministic() {
        let selector = MusicSelector::default();
        let mut first = candidates();
        let mut second = candidates();

        let a = selector.select(&mut first, "slowmotion", "Jones_8x", 812.4);
        let b = selector.select(&mut second, "slowmotion", "Jones_8x", 812.4);
        assert_eq!(a, b);
        assert_eq!(
            selector.credits(&first, "slowmotion", "Jones_8x", 812.4),
            selector.credits(&second, "slowmotion", "Jones_8x", 812.4)
        );
    }

    #[test]
    fn test_first_candidate_wins_ties() {
        let selector = MusicSelector::default();
        // Same name and length give the same key and the same credit
        let mut tracks = vec![MusicCandidate::new("Loop", 60.0), MusicCandidate::new("Loop", 60.0)];

        selector.select(&mut tracks, "fullspeed", "Smith_1x", 50.0).unwrap();
        assert_eq!(tracks[0].use_count, 1);
        assert_eq!(tracks[1].use_count, 0);
    }

    #[test]
    fn test_key_rounds_half_out_points_up() {
        let selector = MusicSelector::default();
        let track = MusicCandidate::new("River Run", 181.0);

        let spread = rolling_hash("legacySmith_2xRiver Run12.3") % 30;
        let expected = f64::from(spread) - (12.25f64 - 181.0 + 10.0).abs();
        assert_eq!(selector.credit(&track, "legacy", "Smith_2x", 12.25), expected);
    }

    #[test]
    fn test_zero_modulus_does_not_panic() {
        let selector = MusicSelector::new(MusicConfig { credit_modulus: 0, length_bias: 10.0 });
        let mut tracks = candidates();

        let chosen = selector.select(&mut tracks, "legacy", "Smith_2x", 200.0).unwrap();
        // Only the length penalty is left: |200 - 181 + 10| is the smallest
        assert_eq!(chosen.name, "River Run");
        assert_eq!(selector.credit(&tracks[1], "legacy", "Smith_2x", 200.0), -30.5);
    }

    #[test]
    fn test_no_candidates() {
        let selector = MusicSelector::default();
        assert!(selector.select(&mut [], "fullspeed", "Smith_1x", 50.0).is_none());
    }
}
