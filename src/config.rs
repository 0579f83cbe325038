//! Every threshold, weight and table the engine uses, in one place.
//!
//! The `pub const` items are the shared scale that collaborators (for
//! example a prompt builder quoting "optimal length 80-280, ideal 180")
//! cite directly. [`EngineConfig`] carries the same numbers as its defaults
//! and can be overridden from TOML or the environment.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{EngineError, Result};
use crate::scoring::SubScore;
use crate::signals::{SignalCategory, SignalKind};

pub const SCORE_MIN: f64 = 0.0;
pub const SCORE_MAX: f64 = 100.0;
pub const SCORE_BASELINE: f64 = 50.0;

pub const OPTIMAL_LENGTH_MIN: usize = 80;
pub const OPTIMAL_LENGTH_MAX: usize = 280;
pub const OPTIMAL_LENGTH_IDEAL: usize = 180;
pub const IDEAL_LENGTH_TOLERANCE: usize = 20;
pub const MAX_POST_LENGTH: usize = 280;
pub const MAX_HASHTAGS: usize = 2;

/// Replyability lift for a question: 12% of the scale.
pub const QUESTION_BONUS: f64 = 12.0;
pub const READING_WORDS_PER_SECOND: f64 = 3.0;

pub const THREAD_HOOK_MARKER: &str = "Thread: ";
pub const CTA_SAFETY_MARGIN: usize = 5;
pub const MIN_THREAD_PARTS: usize = 3;
pub const MAX_THREAD_PARTS: usize = 7;
pub const OPENING_PART_MAX_LENGTH: usize = 260;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Maps a 0-100 engine score onto 0-1 for collaborators that want a ratio.
pub fn to_unit_scale(score: f64) -> f64 {
    ((score - SCORE_MIN) / (SCORE_MAX - SCORE_MIN)).clamp(0.0, 1.0)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LengthConfig {
    pub min: usize,
    pub max: usize,
    pub ideal: usize,
    pub ideal_tolerance: usize,
}

impl Default for LengthConfig {
    fn default() -> Self {
        Self {
            min: OPTIMAL_LENGTH_MIN,
            max: OPTIMAL_LENGTH_MAX,
            ideal: OPTIMAL_LENGTH_IDEAL,
            ideal_tolerance: IDEAL_LENGTH_TOLERANCE,
        }
    }
}

impl LengthConfig {
    pub fn is_optimal(&self, chars: usize) -> bool {
        chars >= self.min && chars <= self.max
    }

    pub fn is_ideal(&self, chars: usize) -> bool {
        chars.abs_diff(self.ideal) <= self.ideal_tolerance
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    pub max_hashtags: usize,
    pub caps_run_min_words: usize,
    pub link_only_max_words: usize,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            max_hashtags: MAX_HASHTAGS,
            caps_run_min_words: 3,
            link_only_max_words: 2,
        }
    }
}

/// Flat deduction taken from the overall score for each negative signal.
///
/// The warning for that signal reports the same figure. Positive signals earn
/// their lift through [`EngagementTable`] alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalWeights {
    pub too_short: f64,
    pub too_long: f64,
    pub excess_hashtags: f64,
    pub all_caps: f64,
    pub link_only: f64,
    pub follow_bait: f64,
    pub engagement_bait: f64,
}

impl Default for SignalWeights {
    fn default() -> Self {
        Self {
            too_short: -5.0,
            too_long: -8.0,
            excess_hashtags: -12.0,
            all_caps: -8.0,
            link_only: -10.0,
            follow_bait: -15.0,
            engagement_bait: -5.0,
        }
    }
}

impl SignalWeights {
    pub fn weight(&self, kind: SignalKind) -> f64 {
        match kind {
            SignalKind::TooShort => self.too_short,
            SignalKind::TooLong => self.too_long,
            SignalKind::ExcessHashtags => self.excess_hashtags,
            SignalKind::AllCaps => self.all_caps,
            SignalKind::LinkOnly => self.link_only,
            SignalKind::FollowBait => self.follow_bait,
            SignalKind::EngagementBait => self.engagement_bait,
            _ => 0.0,
        }
    }
}

/// One row of a sub-score table: points added when `signal` is present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub signal: SignalKind,
    pub points: f64,
}

fn contribution(signal: SignalKind, points: f64) -> Contribution {
    Contribution { signal, points }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngagementTable {
    pub likeability: Vec<Contribution>,
    pub replyability: Vec<Contribution>,
    pub retweetability: Vec<Contribution>,
    pub quoteability: Vec<Contribution>,
    pub shareability: Vec<Contribution>,
    pub dwell_potential: Vec<Contribution>,
}

impl Default for EngagementTable {
    fn default() -> Self {
        use SignalKind::*;

        Self {
            likeability: vec![
                contribution(OptimalLength, 8.0),
                contribution(IdealLength, 4.0),
                contribution(StoryFraming, 8.0),
                contribution(Emojis, 2.0),
                contribution(Media, 6.0),
                contribution(TooShort, -4.0),
                contribution(TooLong, -6.0),
                contribution(AllCaps, -8.0),
                contribution(ExcessPunctuation, -4.0),
                contribution(ExcessHashtags, -4.0),
                contribution(FollowBait, -12.0),
                contribution(EngagementBait, -5.0),
            ],
            replyability: vec![
                contribution(Question, QUESTION_BONUS),
                contribution(OpenQuestion, 6.0),
                contribution(Controversy, 6.0),
                contribution(Mentions, 2.0),
                contribution(CallToAction, 3.0),
                contribution(ClosedQuestion, -4.0),
                contribution(FollowBait, -8.0),
                contribution(LinkOnly, -6.0),
            ],
            retweetability: vec![
                contribution(ValueFraming, 10.0),
                contribution(Listicle, 9.0),
                contribution(OptimalLength, 4.0),
                contribution(Media, 4.0),
                contribution(HashtagDiscipline, 2.0),
                contribution(ExcessHashtags, -10.0),
                contribution(LinkOnly, -10.0),
                contribution(AllCaps, -4.0),
                contribution(FollowBait, -10.0),
            ],
            quoteability: vec![
                contribution(Controversy, 14.0),
                contribution(IncompleteThought, 8.0),
                contribution(ValueFraming, 3.0),
                contribution(Bland, -10.0),
                contribution(FollowBait, -6.0),
            ],
            shareability: vec![
                contribution(ActionableFraming, 10.0),
                contribution(CallToAction, 8.0),
                contribution(ValueFraming, 5.0),
                contribution(Listicle, 5.0),
                contribution(LinkOnly, -4.0),
                contribution(FollowBait, -12.0),
                contribution(EngagementBait, -6.0),
            ],
            dwell_potential: vec![
                contribution(IdealLength, 8.0),
                contribution(OptimalLength, 5.0),
                contribution(StoryFraming, 8.0),
                contribution(Media, 10.0),
                contribution(ThreadIndicator, 10.0),
                contribution(Listicle, 3.0),
                contribution(TooShort, -10.0),
                contribution(LinkOnly, -8.0),
            ],
        }
    }
}

impl EngagementTable {
    pub fn column(&self, sub_score: SubScore) -> &[Contribution] {
        match sub_score {
            SubScore::Likeability => &self.likeability,
            SubScore::Replyability => &self.replyability,
            SubScore::Retweetability => &self.retweetability,
            SubScore::Quoteability => &self.quoteability,
            SubScore::Shareability => &self.shareability,
            SubScore::DwellPotential => &self.dwell_potential,
        }
    }

    /// Points `signal` adds to one sub-score before clamping.
    pub fn points(&self, sub_score: SubScore, signal: SignalKind) -> f64 {
        self.column(sub_score)
            .iter()
            .filter(|row| row.signal == signal)
            .map(|row| row.points)
            .sum()
    }

    fn rows(&self) -> impl Iterator<Item = &Contribution> {
        self.likeability
            .iter()
            .chain(&self.replyability)
            .chain(&self.retweetability)
            .chain(&self.quoteability)
            .chain(&self.shareability)
            .chain(&self.dwell_potential)
    }
}

/// Blend of the six sub-scores into the overall score. Must sum to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub likeability: f64,
    pub replyability: f64,
    pub retweetability: f64,
    pub quoteability: f64,
    pub shareability: f64,
    pub dwell_potential: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            likeability: 0.15,
            replyability: 0.20,
            retweetability: 0.18,
            quoteability: 0.15,
            shareability: 0.20,
            dwell_potential: 0.12,
        }
    }
}

impl ScoreWeights {
    pub fn as_array(&self) -> [f64; 6] {
        [
            self.likeability,
            self.replyability,
            self.retweetability,
            self.quoteability,
            self.shareability,
            self.dwell_potential,
        ]
    }

    pub fn total(&self) -> f64 {
        self.as_array().iter().sum()
    }
}

/// Penalty magnitudes at or above which a warning escalates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeverityThresholds {
    pub critical: f64,
    pub warning: f64,
}

impl Default for SeverityThresholds {
    fn default() -> Self {
        Self {
            critical: 12.0,
            warning: 6.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartScoring {
    pub medium_length: usize,
    pub medium_bonus: f64,
    pub long_length: usize,
    pub long_bonus: f64,
    pub question_bonus: f64,
    pub digit_bonus: f64,
    pub over_budget_penalty: f64,
}

impl Default for PartScoring {
    fn default() -> Self {
        Self {
            medium_length: 50,
            medium_bonus: 10.0,
            long_length: 150,
            long_bonus: 10.0,
            question_bonus: 5.0,
            digit_bonus: 5.0,
            over_budget_penalty: 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HookScoring {
    pub marker_bonus: f64,
    pub question_bonus: f64,
    pub starter_bonus: f64,
    pub ideal_min_length: usize,
    pub ideal_max_length: usize,
    pub ideal_length_bonus: f64,
}

impl Default for HookScoring {
    fn default() -> Self {
        Self {
            marker_bonus: 15.0,
            question_bonus: 15.0,
            starter_bonus: 10.0,
            ideal_min_length: 100,
            ideal_max_length: 200,
            ideal_length_bonus: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreadConfig {
    pub max_part_length: usize,
    pub hook_marker: String,
    pub hook_starters: Vec<String>,
    pub cta_phrases: Vec<String>,
    pub cta_safety_margin: usize,
    pub cta_seed: Option<u64>,
    pub part_baseline: f64,
    pub hook_baseline: f64,
    pub cta_baseline: f64,
    pub flow_baseline: f64,
    pub flow_pair_bonus: f64,
    pub flow_window_words: usize,
    pub flow_min_word_length: usize,
    pub cta_phrase_bonus: f64,
    pub cta_question_bonus: f64,
    pub part_weight: f64,
    pub hook_weight: f64,
    pub flow_weight: f64,
    pub hook_threshold: f64,
    pub cta_threshold: f64,
    pub flow_threshold: f64,
    pub min_parts: usize,
    pub max_parts: usize,
    pub opening_max_length: usize,
    pub part: PartScoring,
    pub hook: HookScoring,
}

impl Default for ThreadConfig {
    fn default() -> Self {
        Self {
            max_part_length: MAX_POST_LENGTH,
            hook_marker: THREAD_HOOK_MARKER.to_string(),
            hook_starters: ["Here", "This", "I", "You", "Let", "Want", "Ready", "Ever"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            cta_phrases: [
                "\n\nFollow for more.",
                "\n\nRT to share.",
                "\n\nLike if this helped.",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            cta_safety_margin: CTA_SAFETY_MARGIN,
            cta_seed: None,
            part_baseline: SCORE_BASELINE,
            hook_baseline: SCORE_BASELINE,
            cta_baseline: SCORE_BASELINE,
            flow_baseline: 70.0,
            flow_pair_bonus: 5.0,
            flow_window_words: 3,
            flow_min_word_length: 4,
            cta_phrase_bonus: 30.0,
            cta_question_bonus: 10.0,
            part_weight: 0.4,
            hook_weight: 0.3,
            flow_weight: 0.3,
            hook_threshold: 70.0,
            cta_threshold: 70.0,
            flow_threshold: 75.0,
            min_parts: MIN_THREAD_PARTS,
            max_parts: MAX_THREAD_PARTS,
            opening_max_length: OPENING_PART_MAX_LENGTH,
            part: PartScoring::default(),
            hook: HookScoring::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    pub length: LengthConfig,
    pub detection: DetectionConfig,
    pub signals: SignalWeights,
    pub engagement: EngagementTable,
    pub weights: ScoreWeights,
    pub severity: SeverityThresholds,
    pub thread: ThreadConfig,
}

impl EngineConfig {
    /// Loads `path`, else `ENGINE_CONFIG_PATH`, else `config/engine.toml`.
    /// A missing file means defaults; env overrides apply either way.
    pub fn load(path: Option<PathBuf>) -> Result<(Self, Option<PathBuf>)> {
        let config_path = path.or_else(default_config_path);
        let mut config = match config_path.as_ref() {
            Some(path) if path.exists() => {
                let contents =
                    std::fs::read_to_string(path).map_err(|source| EngineError::ConfigRead {
                        path: path.clone(),
                        source,
                    })?;
                toml::from_str(&contents).map_err(|source| EngineError::ConfigParse {
                    path: path.clone(),
                    source,
                })?
            }
            _ => EngineConfig::default(),
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok((config, config_path))
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|source| EngineError::ConfigWrite {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }
        let payload = toml::to_string_pretty(self)?;
        std::fs::write(path, payload).map_err(|source| EngineError::ConfigWrite {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(())
    }

    /// Rejects tables that would break the scoring contract. These are
    /// programming errors, not data conditions.
    pub fn validate(&self) -> Result<()> {
        let weights = self.weights.as_array();
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(invalid("score weights must be finite and non-negative"));
        }
        let total = self.weights.total();
        if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(invalid(format!("score weights must sum to 1, got {}", total)));
        }

        if self.engagement.rows().any(|row| !row.points.is_finite()) {
            return Err(invalid("engagement table points must be finite"));
        }

        for kind in SignalKind::ALL {
            let weight = self.signals.weight(kind);
            if !weight.is_finite() {
                return Err(invalid(format!("penalty for {} is not finite", kind.name())));
            }
            match kind.category() {
                SignalCategory::Negative if weight > 0.0 => {
                    return Err(invalid(format!(
                        "penalty for {} must be <= 0, got {}",
                        kind.name(),
                        weight
                    )));
                }
                SignalCategory::Positive => {
                    let lift: f64 = SubScore::ALL
                        .iter()
                        .zip(self.weights.as_array())
                        .map(|(sub_score, share)| share * self.engagement.points(*sub_score, kind))
                        .sum();
                    if lift < 0.0 {
                        return Err(invalid(format!(
                            "table rows for {} lower the overall score by {}",
                            kind.name(),
                            -lift
                        )));
                    }
                }
                _ => {}
            }
        }

        if self.length.min > self.length.max {
            return Err(invalid("optimal length min exceeds max"));
        }
        if !self.length.is_optimal(self.length.ideal) {
            return Err(invalid("ideal length must sit inside the optimal window"));
        }
        if self.severity.critical < self.severity.warning || self.severity.warning < 0.0 {
            return Err(invalid("severity thresholds must satisfy critical >= warning >= 0"));
        }

        let thread = &self.thread;
        let reserved = thread.hook_marker.chars().count() + thread.cta_safety_margin + 8;
        if thread.max_part_length <= reserved {
            return Err(invalid(format!(
                "max part length {} leaves no room for content",
                thread.max_part_length
            )));
        }
        let blend = thread.part_weight + thread.hook_weight + thread.flow_weight;
        if (blend - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(invalid(format!("thread weights must sum to 1, got {}", blend)));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(value) = env::var("ENGINE_MAX_PART_LENGTH") {
            if let Ok(value) = value.parse::<usize>() {
                self.thread.max_part_length = value;
            }
        }
        if let Ok(value) = env::var("ENGINE_OPTIMAL_LENGTH_IDEAL") {
            if let Ok(value) = value.parse::<usize>() {
                self.length.ideal = value;
            }
        }
        if let Ok(value) = env::var("ENGINE_CTA_SEED") {
            if let Ok(value) = value.parse::<u64>() {
                self.thread.cta_seed = Some(value);
            }
        }
    }
}

fn invalid(message: impl Into<String>) -> EngineError {
    EngineError::InvalidConfig(message.into())
}

fn default_config_path() -> Option<PathBuf> {
    env::var("ENGINE_CONFIG_PATH")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .or_else(|| Some(PathBuf::from("config/engine.toml")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn default_score_weights_sum_to_one() {
        assert!((ScoreWeights::default().total() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_weights_that_do_not_sum_to_one() {
        let mut config = EngineConfig::default();
        config.weights.likeability = 0.5;
        assert!(matches!(config.validate(), Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_positive_signal_that_costs_points() {
        let mut config = EngineConfig::default();
        config.engagement.replyability[0] = Contribution {
            signal: SignalKind::Question,
            points: -20.0,
        };
        assert!(config.validate().is_err());

        config.engagement.replyability[0].points = 0.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn table_points_sum_per_column() {
        let table = EngagementTable::default();
        assert!((table.points(SubScore::Replyability, SignalKind::Question) - QUESTION_BONUS).abs() < 1e-9);
        assert!((table.points(SubScore::DwellPotential, SignalKind::Media) - 10.0).abs() < 1e-9);
        assert_eq!(table.points(SubScore::Likeability, SignalKind::Question), 0.0);
    }

    #[test]
    fn rejects_positive_penalty() {
        let mut config = EngineConfig::default();
        config.signals.follow_bait = 3.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_tiny_part_budget() {
        let mut config = EngineConfig::default();
        config.thread.max_part_length = 10;
        assert!(config.validate().is_err());
    }

    #[test]
    fn length_window_is_inclusive() {
        let length = LengthConfig::default();
        assert!(length.is_optimal(80));
        assert!(length.is_optimal(280));
        assert!(!length.is_optimal(79));
        assert!(!length.is_optimal(281));
    }

    #[test]
    fn config_round_trips_through_toml() {
        let config = EngineConfig::default();
        let payload = toml::to_string_pretty(&config).unwrap();
        let parsed: EngineConfig = toml::from_str(&payload).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let parsed: EngineConfig =
            toml::from_str("[thread]\nmax_part_length = 250\n\n[signals]\nfollow_bait = -20.0\n").unwrap();
        assert_eq!(parsed.thread.max_part_length, 250);
        assert_eq!(parsed.thread.hook_marker, THREAD_HOOK_MARKER);
        assert!((parsed.signals.follow_bait + 20.0).abs() < 1e-9);
        assert!((parsed.signals.too_long + 8.0).abs() < 1e-9);
        assert_eq!(parsed.weights, ScoreWeights::default());
    }

    #[test]
    fn unit_scale_maps_bounds() {
        assert_eq!(to_unit_scale(0.0), 0.0);
        assert_eq!(to_unit_scale(100.0), 1.0);
        assert!((to_unit_scale(50.0) - 0.5).abs() < 1e-9);
    }
}
