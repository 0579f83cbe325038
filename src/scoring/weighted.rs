use crate::config::ScoreWeights;
use crate::scoring::clamp_score;

#[derive(Debug, Clone)]
pub struct WeightedScorer {
    weights: ScoreWeights,
}

impl WeightedScorer {
    pub fn new(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    /// Weighted blend of the sub-scores (in [`crate::scoring::SubScore::ALL`]
    /// order) plus `penalties`, which are zero or negative.
    pub fn score(&self, sub_scores: &[f64; 6], penalties: f64) -> f64 {
        let mut score = 0.0;
        for (value, weight) in sub_scores.iter().zip(self.weights.as_array()) {
            score += value * weight;
        }
        score += penalties.min(0.0);
        clamp_score(score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SCORE_BASELINE;

    #[test]
    fn uniform_sub_scores_blend_to_themselves() {
        let scorer = WeightedScorer::new(ScoreWeights::default());
        let score = scorer.score(&[SCORE_BASELINE; 6], 0.0);
        assert!((score - SCORE_BASELINE).abs() < 1e-9);
    }

    #[test]
    fn applies_penalties() {
        let scorer = WeightedScorer::new(ScoreWeights::default());
        let score = scorer.score(&[60.0; 6], -12.0);
        assert!((score - 48.0).abs() < 1e-9);
    }

    #[test]
    fn uses_configured_weights() {
        let weights = ScoreWeights {
            likeability: 1.0,
            replyability: 0.0,
            retweetability: 0.0,
            quoteability: 0.0,
            shareability: 0.0,
            dwell_potential: 0.0,
        };
        let scorer = WeightedScorer::new(weights);
        let score = scorer.score(&[80.0, 0.0, 0.0, 0.0, 0.0, 0.0], 0.0);
        assert!((score - 80.0).abs() < 1e-9);
    }

    #[test]
    fn clamps_to_floor() {
        let scorer = WeightedScorer::new(ScoreWeights::default());
        assert_eq!(scorer.score(&[5.0; 6], -40.0), 0.0);
    }
}
