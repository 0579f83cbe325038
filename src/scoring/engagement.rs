use serde::{Deserialize, Serialize};

use crate::config::{EngagementTable, SCORE_BASELINE};
use crate::scoring::clamp_score;
use crate::signals::SignalSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubScore {
    Likeability,
    Replyability,
    Retweetability,
    Quoteability,
    Shareability,
    DwellPotential,
}

impl SubScore {
    pub const ALL: [SubScore; 6] = [
        SubScore::Likeability,
        SubScore::Replyability,
        SubScore::Retweetability,
        SubScore::Quoteability,
        SubScore::Shareability,
        SubScore::DwellPotential,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SubScore::Likeability => "likeability",
            SubScore::Replyability => "replyability",
            SubScore::Retweetability => "retweetability",
            SubScore::Quoteability => "quoteability",
            SubScore::Shareability => "shareability",
            SubScore::DwellPotential => "dwell potential",
        }
    }
}

#[derive(Debug, Clone)]
pub struct EngagementScorer<'a> {
    table: &'a EngagementTable,
}

impl<'a> EngagementScorer<'a> {
    pub fn new(table: &'a EngagementTable) -> Self {
        Self { table }
    }

    /// Baseline plus the points of every present signal, clamped.
    pub fn score(&self, sub_score: SubScore, signals: &SignalSet) -> f64 {
        let mut score = SCORE_BASELINE;
        for row in self.table.column(sub_score) {
            if signals.contains(row.signal) {
                score += row.points;
            }
        }
        clamp_score(score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Contribution, QUESTION_BONUS, SCORE_MAX};
    use crate::signals::SignalKind;

    #[test]
    fn empty_signal_set_scores_baseline() {
        let table = EngagementTable::default();
        let scorer = EngagementScorer::new(&table);
        for sub_score in SubScore::ALL {
            assert_eq!(scorer.score(sub_score, &SignalSet::default()), SCORE_BASELINE);
        }
    }

    #[test]
    fn question_adds_fixed_reply_bonus() {
        let table = EngagementTable::default();
        let scorer = EngagementScorer::new(&table);
        let signals = SignalSet::from_kinds([SignalKind::Question]);
        let score = scorer.score(SubScore::Replyability, &signals);
        assert!((score - (SCORE_BASELINE + QUESTION_BONUS)).abs() < 1e-6);
    }

    #[test]
    fn stacked_bonuses_are_clamped() {
        let table = EngagementTable {
            replyability: vec![Contribution {
                signal: SignalKind::Question,
                points: 500.0,
            }],
            ..EngagementTable::default()
        };
        let scorer = EngagementScorer::new(&table);
        let signals = SignalSet::from_kinds([SignalKind::Question]);
        assert_eq!(scorer.score(SubScore::Replyability, &signals), SCORE_MAX);
    }

    #[test]
    fn spam_drags_shareability_down() {
        let table = EngagementTable::default();
        let scorer = EngagementScorer::new(&table);
        let signals = SignalSet::from_kinds([SignalKind::FollowBait, SignalKind::EngagementBait]);
        assert!(scorer.score(SubScore::Shareability, &signals) < SCORE_BASELINE);
    }

    #[test]
    fn bland_content_loses_quoteability() {
        let table = EngagementTable::default();
        let scorer = EngagementScorer::new(&table);
        let signals = SignalSet::from_kinds([SignalKind::Bland]);
        assert!(scorer.score(SubScore::Quoteability, &signals) < SCORE_BASELINE);
    }
}
