use tracing::{debug, info};

use crate::{
    cadence::types::{CadenceSample, MarkerSequence, SourceCadence},
    config::CadenceConfig,
    timeline::{LayerKind, Source},
};

/// Converts stroke markers into spot rates and cumulative averages
#[derive(Debug, Clone)]
pub struct RateAnalyzer {
    config: CadenceConfig,
}

impl RateAnalyzer {
    /// Create a new analyzer with the default 15-50 spm band
    pub fn new() -> Self {
        Self::with_config(CadenceConfig::default())
    }

    /// Create a new analyzer with a custom rate band
    pub fn with_config(config: CadenceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CadenceConfig {
        &self.config
    }

    /// Derive cadence samples from one marker sequence
    ///
    /// Returns an empty list when there are fewer than two markers; callers
    /// that need to report missing data check [`MarkerSequence::has_rate_data`]
    /// first. Duplicate markers and rates outside the configured band are
    /// skipped. The running average restarts on every call.
    pub fn analyze(&self, markers: &MarkerSequence, layer_start: f64) -> Vec<CadenceSample> {
        let mut samples = Vec::new();

        if !markers.has_rate_data() {
            return samples;
        }

        let mut rate_sum = 0.0;

        for (start, end) in markers.intervals() {
            if start == end {
                debug!("Skipping duplicate markers at {:.3}s", start);
                continue;
            }

            let spot_rate = 60.0 / (end - start);
            if spot_rate < self.config.rate_limit_low || spot_rate > self.config.rate_limit_high {
                debug!("Skipping out of range spot rate: {:.2}", spot_rate);
                continue;
            }

            rate_sum += spot_rate;
            samples.push(CadenceSample {
                spot_rate,
                running_avg_rate: rate_sum / (samples.len() + 1) as f64,
                occurs_at: end,
                origin_layer_start: layer_start,
            });
        }

        samples
    }

    /// Collect samples from a source's own markers and then from each of its
    /// footage layers, in layer order
    pub fn analyze_source(&self, source: &Source) -> SourceCadence {
        let mut samples = Vec::new();

        if source.markers.has_rate_data() {
            samples.extend(self.analyze(&source.markers, 0.0));
        }

        for layer in &source.layers {
            if layer.kind == LayerKind::AudioVisual && layer.markers.has_rate_data() {
                samples.extend(self.analyze(&layer.markers, layer.in_point));
            }
        }

        let cadence = SourceCadence::new(source.id.clone(), samples);
        match cadence.final_rate() {
            Some(rate) => info!(
                "   {}: {} strokes, final rate {:.2}",
                source.id, cadence.samples.len(), rate
            ),
            None => info!("   {}: no rate data", source.id),
        }

        cadence
    }
}

impl Default for RateAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::SourceLayer;
    use rand::{rngs::SmallRng, Rng, SeedableRng};

    fn markers(times: &[f64]) -> MarkerSequence {
        MarkerSequence::from(times.to_vec())
    }

    fn footage_layer(z_order: usize, in_point: f64, times: &[f64]) -> SourceLayer {
        SourceLayer {
            name: format!("clip {}", z_order),
            kind: LayerKind::AudioVisual,
            in_point,
            out_point: in_point + 30.0,
            start_time: 0.0,
            markers: markers(times),
            z_order,
        }
    }

    fn source(top_level: &[f64], layers: Vec<SourceLayer>) -> Source {
        Source {
            id: "M1a::Smith".to_string(),
            duration: 60.0,
            work_area_start: 0.0,
            work_area_duration: 60.0,
            frame_rate: 25.0,
            markers: markers(top_level),
            layers,
        }
    }

    #[test]
    fn test_steady_thirty_spm() {
        let samples = RateAnalyzer::new().analyze(&markers(&[0.0, 2.0, 4.0]), 0.0);

        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].spot_rate, 30.0);
        assert_eq!(samples[1].spot_rate, 30.0);
        assert_eq!(samples[0].running_avg_rate, 30.0);
        assert_eq!(samples[1].running_avg_rate, 30.0);
        assert_eq!(samples[0].occurs_at, 2.0);
        assert_eq!(samples[1].occurs_at, 4.0);
    }

    #[test]
    fn test_duplicate_then_out_of_range() {
        // 0 -> 0 is a duplicate, 0 -> 6 is 10 spm which is below the band
        let samples = RateAnalyzer::new().analyze(&markers(&[0.0, 0.0, 6.0]), 0.0);
        assert!(samples.is_empty());
    }

    #[test]
    fn test_too_few_markers() {
        let analyzer = RateAnalyzer::new();
        assert!(analyzer.analyze(&markers(&[]), 0.0).is_empty());
        assert!(analyzer.analyze(&markers(&[1.0]), 0.0).is_empty());
    }

    #[test]
    fn test_band_edges_are_inclusive() {
        // 4s -> 15 spm, 1.2s -> 50 spm
        let samples = RateAnalyzer::new().analyze(&markers(&[0.0, 4.0, 5.2]), 0.0);
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].spot_rate, 15.0);
        assert!((samples[1].spot_rate - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_running_average_is_cumulative() {
        // 3s -> 20 spm, 2s -> 30 spm, 1.5s -> 40 spm
        let samples = RateAnalyzer::new().analyze(&markers(&[0.0, 3.0, 5.0, 6.5]), 1.25);

        let averages: Vec<f64> = samples.iter().map(|s| s.running_avg_rate).collect();
        assert_eq!(averages.len(), 3);
        assert!((averages[0] - 20.0).abs() < 1e-9);
        assert!((averages[1] - 25.0).abs() < 1e-9);
        assert!((averages[2] - 30.0).abs() < 1e-9);
        assert!(samples.iter().all(|s| s.origin_layer_start == 1.25));
    }

    #[test]
    fn test_skipped_pairs_do_not_count() {
        // 2s -> 30, 0.5s -> 120 (skipped), 3s -> 20
        let samples = RateAnalyzer::new().analyze(&markers(&[0.0, 2.0, 2.5, 5.5]), 0.0);
        assert_eq!(samples.len(), 2);
        assert!((samples[1].running_avg_rate - 25.0).abs() < 1e-9);
        assert_eq!(samples[1].occurs_at, 5.5);
    }

    #[test]
    fn test_custom_band() {
        let analyzer = RateAnalyzer::with_config(CadenceConfig {
            rate_limit_low: 5.0,
            rate_limit_high: 12.0,
        });
        let samples = analyzer.analyze(&markers(&[0.0, 0.0, 6.0]), 0.0);
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].spot_rate, 10.0);
    }

    #[test]
    fn test_last_average_is_mean_of_accepted_rates() {
        let mut rng = SmallRng::seed_from_u64(7);
        let analyzer = RateAnalyzer::new();

        for _ in 0..50 {
            let mut time = 0.0;
            let mut times = vec![time];
            for _ in 0..rng.gen_range(2..40) {
                time += rng.gen_range(1.25..3.9);
                times.push(time);
            }

            let samples = analyzer.analyze(&MarkerSequence::from(times), 0.0);
            assert!(!samples.is_empty());

            let mean = samples.iter().map(|s| s.spot_rate).sum::<f64>() / samples.len() as f64;
            let last = samples.last().unwrap().running_avg_rate;
            assert!((last - mean).abs() < 1e-9);
            assert!(samples.windows(2).all(|pair| pair[0].occurs_at <= pair[1].occurs_at));
        }
    }

    #[test]
    fn test_source_concatenates_series_without_merging() {
        // Top level averages 30, the layer averages 20
        let layer = footage_layer(1, 4.0, &[10.0, 13.0, 16.0]);
        let cadence = RateAnalyzer::new().analyze_source(&source(&[0.0, 2.0, 4.0], vec![layer]));

        assert_eq!(cadence.samples.len(), 4);
        assert_eq!(cadence.samples[0].origin_layer_start, 0.0);
        assert_eq!(cadence.samples[2].origin_layer_start, 4.0);
        assert_eq!(cadence.samples[2].running_avg_rate, 20.0);
        assert_eq!(cadence.final_rate(), Some(20.0));
    }

    #[test]
    fn test_source_ignores_text_layer_markers() {
        let mut text = footage_layer(1, 0.0, &[0.0, 2.0, 4.0]);
        text.kind = LayerKind::Text;

        let cadence = RateAnalyzer::new().analyze_source(&source(&[], vec![text]));
        assert!(!cadence.has_rate_data());
        assert_eq!(cadence.final_rate(), None);
    }
}
