pub mod comparison;
pub mod config;
pub mod error;
pub mod features;
pub mod scoring;
pub mod signals;
pub mod suggestions;
pub mod thread;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use crate::comparison::{compare, compare_with, OptimizationReport};
pub use crate::config::{
    to_unit_scale, EngineConfig, CTA_SAFETY_MARGIN, MAX_HASHTAGS, MAX_POST_LENGTH,
    MAX_THREAD_PARTS, MIN_THREAD_PARTS, OPTIMAL_LENGTH_IDEAL, OPTIMAL_LENGTH_MAX,
    OPTIMAL_LENGTH_MIN, QUESTION_BONUS, READING_WORDS_PER_SECOND, SCORE_BASELINE, SCORE_MAX,
    SCORE_MIN, THREAD_HOOK_MARKER,
};
pub use crate::error::{EngineError, Result};
pub use crate::features::ContentMetrics;
pub use crate::scoring::{EngagementScores, SubScore};
pub use crate::signals::{AlgorithmSignal, SignalCategory, SignalKind, SignalSet};
pub use crate::suggestions::{Priority, Severity, Suggestion, SuggestionType, Warning};
pub use crate::thread::{compose, score_thread, PartScore, ThreadAnalysis, ThreadPart};

use crate::features::extract_metrics;
use crate::scoring::score_engagement;
use crate::signals::detect_signals;
use crate::suggestions::build_feedback;

/// Full report for a single post. A fresh value per call; nothing is cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostAnalysis {
    pub content_metrics: ContentMetrics,
    pub signals: SignalSet,
    pub engagement_scores: EngagementScores,
    pub warnings: Vec<Warning>,
    pub suggestions: Vec<Suggestion>,
}

/// Analyzes `content` with the default tables.
pub fn analyze(content: &str, media_present: bool) -> PostAnalysis {
    analyze_with_config(content, media_present, &EngineConfig::default())
}

pub fn analyze_with_config(content: &str, media_present: bool, config: &EngineConfig) -> PostAnalysis {
    let content_metrics = extract_metrics(content, media_present);
    let signals = detect_signals(content, &content_metrics, config);
    let engagement_scores = score_engagement(&content_metrics, &signals, config);
    let feedback = build_feedback(&content_metrics, &signals, &engagement_scores, config);

    debug!(
        chars = content_metrics.character_count,
        positive = signals.positive.len(),
        negative = signals.negative.len(),
        overall = engagement_scores.overall_score,
        "analyzed post"
    );

    PostAnalysis {
        content_metrics,
        signals,
        engagement_scores,
        warnings: feedback.warnings,
        suggestions: feedback.suggestions,
    }
}

/// A validated configuration bound to the analysis entry points.
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn analyze(&self, content: &str, media_present: bool) -> PostAnalysis {
        analyze_with_config(content, media_present, &self.config)
    }

    pub fn compose(&self, content: &str, options: &thread::ComposeOptions) -> Vec<ThreadPart> {
        let selector = thread::selector_for(&self.config.thread);
        thread::compose_with(content, options, selector.as_ref(), &self.config.thread)
    }

    pub fn score_thread(&self, parts: &[ThreadPart]) -> ThreadAnalysis {
        thread::score_thread_with(parts, &self.config.thread)
    }

    pub fn compare(&self, original: &str, optimized: &str, media_present: bool) -> OptimizationReport {
        compare_with(original, optimized, media_present, &self.config)
    }
}

pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

pub fn format_float(value: f64, digits: usize) -> String {
    format!("{:.1$}", value, digits)
}
