pub mod engagement;
pub mod weighted;

pub use engagement::{EngagementScorer, SubScore};
pub use weighted::WeightedScorer;

use serde::{Deserialize, Serialize};

use crate::config::{EngineConfig, SCORE_BASELINE, SCORE_MAX, SCORE_MIN};
use crate::features::ContentMetrics;
use crate::signals::SignalSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementScores {
    pub likeability: f64,
    pub replyability: f64,
    pub retweetability: f64,
    pub quoteability: f64,
    pub shareability: f64,
    pub dwell_potential: f64,
    pub overall_score: f64,
}

impl EngagementScores {
    pub fn baseline() -> Self {
        Self {
            likeability: SCORE_BASELINE,
            replyability: SCORE_BASELINE,
            retweetability: SCORE_BASELINE,
            quoteability: SCORE_BASELINE,
            shareability: SCORE_BASELINE,
            dwell_potential: SCORE_BASELINE,
            overall_score: SCORE_BASELINE,
        }
    }

    pub fn get(&self, sub_score: SubScore) -> f64 {
        match sub_score {
            SubScore::Likeability => self.likeability,
            SubScore::Replyability => self.replyability,
            SubScore::Retweetability => self.retweetability,
            SubScore::Quoteability => self.quoteability,
            SubScore::Shareability => self.shareability,
            SubScore::DwellPotential => self.dwell_potential,
        }
    }

    pub fn sub_scores(&self) -> [f64; 6] {
        SubScore::ALL.map(|sub_score| self.get(sub_score))
    }
}

/// Computes the six sub-scores and the overall score. Pure in its inputs.
pub fn score_engagement(
    _metrics: &ContentMetrics,
    signals: &SignalSet,
    config: &EngineConfig,
) -> EngagementScores {
    let subs = sub_scores_for(signals, config);
    EngagementScores {
        likeability: subs[0],
        replyability: subs[1],
        retweetability: subs[2],
        quoteability: subs[3],
        shareability: subs[4],
        dwell_potential: subs[5],
        overall_score: blend(&subs, signals, config),
    }
}

/// Overall score a signal set earns on its own. Suggestions use it to price
/// an edit as the difference between two sets.
pub fn overall_score_for(signals: &SignalSet, config: &EngineConfig) -> f64 {
    blend(&sub_scores_for(signals, config), signals, config)
}

fn sub_scores_for(signals: &SignalSet, config: &EngineConfig) -> [f64; 6] {
    let scorer = EngagementScorer::new(&config.engagement);
    SubScore::ALL.map(|sub_score| scorer.score(sub_score, signals))
}

fn blend(subs: &[f64; 6], signals: &SignalSet, config: &EngineConfig) -> f64 {
    let penalties: f64 = signals
        .negative
        .iter()
        .map(|signal| config.signals.weight(signal.kind))
        .sum();
    WeightedScorer::new(config.weights.clone()).score(subs, penalties)
}

pub fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        return SCORE_MIN;
    }
    value.max(SCORE_MIN).min(SCORE_MAX)
}
