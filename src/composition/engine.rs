use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    cadence::{RateAnalyzer, SourceCadence},
    composition::overlays::plan_overlays,
    config::Config,
    error::{CompositionError, Result},
    format::to_fixed,
    music::MusicSelector,
    project::{variant_name, Project},
    ranking::{RankEntry, Standings},
    timeline::{sequence, Source, SynthesizedTimeline, TimelineScaler},
};

/// One batch run over a host project
///
/// The run owns its own copy of the project, so music use counts and medals
/// never leak into another run. The pipeline is:
/// 1. Cadence Analysis - stroke rates for every source
/// 2. Ranking - placements and medals, computed once
/// 3. Variants - every source under every configured template
/// 4. Reel - optionally join one variant's timelines back-to-back
pub struct BatchRun {
    config: Config,
    project: Project,
    analyzer: RateAnalyzer,
    scaler: TimelineScaler,
    selector: MusicSelector,
}

impl BatchRun {
    /// Create a run; templates named by a variant take that variant's scale factor
    ///
    /// The configuration is validated here, since it may not come from a file.
    pub fn new(config: Config, mut project: Project) -> Result<Self> {
        config.validate()?;

        for template in &mut project.templates {
            if let Some(scale_factor) = config.batch.scale_factor_for(&template.id) {
                template.scale_factor = scale_factor;
            }
            for candidate in &mut template.music_candidates {
                candidate.use_count = 0;
            }
        }

        Ok(Self {
            analyzer: RateAnalyzer::with_config(config.cadence.clone()),
            scaler: TimelineScaler::new(config.timeline.clone()),
            selector: MusicSelector::new(config.music.clone()),
            config,
            project,
        })
    }

    /// Run the whole batch
    ///
    /// Recoverable failures of single variants or of the reel are collected
    /// in the report; any other error aborts the run.
    pub fn run(mut self) -> Result<BatchReport> {
        info!("🎬 Starting batch run");
        info!("   Sources: {}", self.project.sources.len());
        info!("   Templates: {}", self.project.templates.len());
        info!("   Variants: {}", self.config.batch.variants.len());

        let sources = std::mem::take(&mut self.project.sources);

        // Pipeline Step 1: Cadence Analysis
        let cadences = self.analyze_sources(&sources);

        // Pipeline Step 2: Ranking
        let standings = self.rank_sources(&cadences);

        // Pipeline Step 3: Variants
        let mut timelines = Vec::new();
        let mut failures = Vec::new();
        let variants = self.config.batch.variants.clone();

        info!("🎞️  Step 3: Synthesizing variants...");
        for (source, cadence) in sources.iter().zip(&cadences) {
            for variant in &variants {
                match self.compose_variant(source, cadence, &variant.template, &standings) {
                    Ok(timeline) => timelines.push(timeline),
                    Err(e) if e.is_recoverable() => {
                        warn!("   Skipping {} / {}: {}", source.id, variant.template, e.user_message());
                        failures.push(VariantFailure {
                            source_id: source.id.clone(),
                            template_id: variant.template.clone(),
                            reason: e.to_string(),
                        });
                    }
                    Err(e) => return Err(e),
                }
            }
        }
        info!("   ✅ {} timelines, {} failures", timelines.len(), failures.len());

        // Pipeline Step 4: Reel
        let reel = match self.config.batch.reel_template.clone() {
            Some(template_id) => match self.build_reel(&template_id, &timelines) {
                Ok(reel) => Some(reel),
                Err(e) if e.is_recoverable() => {
                    warn!("   Reel for {} not built: {}", template_id, e);
                    failures.push(VariantFailure {
                        source_id: String::new(),
                        template_id,
                        reason: e.to_string(),
                    });
                    None
                }
                Err(e) => return Err(e),
            },
            None => None,
        };

        let music_usage = self.music_usage();
        info!("🎉 Batch run complete");

        Ok(BatchReport {
            generated_at: Utc::now(),
            cadences,
            rankings: standings.entries().to_vec(),
            timelines,
            reel,
            failures,
            removals: self.project.removals,
            music_usage,
        })
    }

    // ==========================================
    // PIPELINE STEP 1: CADENCE ANALYSIS
    // ==========================================

    fn analyze_sources(&self, sources: &[Source]) -> Vec<SourceCadence> {
        info!("🚣 Step 1: Analyzing stroke rates...");

        let cadences: Vec<SourceCadence> = sources
            .iter()
            .map(|source| self.analyzer.analyze_source(source))
            .collect();

        info!(
            "   ✅ {} of {} sources have rate data",
            cadences.iter().filter(|cadence| cadence.has_rate_data()).count(),
            cadences.len()
        );

        cadences
    }

    // ==========================================
    // PIPELINE STEP 2: RANKING
    // ==========================================

    fn rank_sources(&self, cadences: &[SourceCadence]) -> Standings {
        info!("🏅 Step 2: Ranking sources...");

        let standings = Standings::from_cadences(cadences);
        for entry in standings.entries() {
            debug!("      {:02} - {} ({:.2})", entry.placement, entry.source_id, entry.final_rate);
        }
        info!("   ✅ {} ranked, {} medals", standings.entries().len(), standings.medal_count());

        standings
    }

    // ==========================================
    // PIPELINE STEP 3: VARIANTS
    // ==========================================

    /// Build one source's timeline under one template
    fn compose_variant(
        &mut self,
        source: &Source,
        cadence: &SourceCadence,
        template_id: &str,
        standings: &Standings,
    ) -> Result<SynthesizedTimeline> {
        let template = self.project.templates
            .iter_mut()
            .find(|template| template.id == template_id)
            .ok_or_else(|| CompositionError::TemplateNotFound { id: template_id.to_string() })?;

        let name = variant_name(&source.id, &template.name);
        let mut timeline = self.scaler.synthesize(&name, source, template)?;

        let medals = standings.medals_for(&source.id);
        timeline.overlays = plan_overlays(template, cadence, &medals, &self.config.overlays);
        timeline.medals = medals;
        timeline.placement = standings.placement_of(&source.id);

        timeline.selected_music = self.selector.select(
            &mut template.music_candidates,
            &template.id,
            &name,
            timeline.work_area_end(),
        );
        match &timeline.selected_music {
            Some(track) => debug!("   {} -> music '{}'", name, track.name),
            None => warn!("   No music candidate for {}", name),
        }

        if cadence.has_rate_data() {
            let rates: Vec<String> = cadence.spot_rates().iter().map(|&rate| to_fixed(rate, 2)).collect();
            info!("   Stroke rates for {} = {}", name, rates.join(", "));
        } else {
            info!("   Missing or faulty rate markers for {}", name);
        }

        Ok(timeline)
    }

    // ==========================================
    // PIPELINE STEP 4: REEL
    // ==========================================

    fn build_reel(&self, template_id: &str, timelines: &[SynthesizedTimeline]) -> Result<SynthesizedTimeline> {
        info!("📼 Step 4: Sequencing {} reel...", template_id);

        let parts: Vec<SynthesizedTimeline> = timelines
            .iter()
            .filter(|timeline| timeline.template_id == template_id)
            .cloned()
            .collect();

        let reel = sequence(&parts)?;
        info!("   ✅ Reel of {} timelines, {:.1}s", parts.len(), reel.work_area_duration);
        Ok(reel)
    }

    fn music_usage(&self) -> Vec<MusicUsage> {
        self.project.templates
            .iter()
            .flat_map(|template| {
                template.music_candidates.iter().map(move |candidate| MusicUsage {
                    template_id: template.id.clone(),
                    name: candidate.name.clone(),
                    use_count: candidate.use_count,
                })
            })
            .collect()
    }
}

/// A source/template pair that could not be built
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantFailure {
    /// Empty for reel failures
    pub source_id: String,
    pub template_id: String,
    pub reason: String,
}

/// How often a track was picked during the run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MusicUsage {
    pub template_id: String,
    pub name: String,
    pub use_count: u32,
}

/// Everything a batch run produced, for the host adapter to materialize
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub generated_at: DateTime<Utc>,
    pub cadences: Vec<SourceCadence>,
    pub rankings: Vec<RankEntry>,
    pub timelines: Vec<SynthesizedTimeline>,
    pub reel: Option<SynthesizedTimeline>,
    pub failures: Vec<VariantFailure>,

    /// Host items to delete before materializing
    pub removals: Vec<String>,
    pub music_usage: Vec<MusicUsage>,
}

impl BatchReport {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn timeline(&self, source_id: &str, template_id: &str) -> Option<&SynthesizedTimeline> {
        self.timelines
            .iter()
            .find(|timeline| timeline.source_id == source_id && timeline.template_id == template_id)
    }
}
