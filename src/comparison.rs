//! Before/after comparison of a rewritten post.

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::scoring::SubScore;
use crate::signals::SignalKind;
use crate::{analyze_with_config, format_float, PostAnalysis};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationReport {
    pub original: PostAnalysis,
    pub optimized: PostAnalysis,
    pub score_delta: f64,
    pub improvements: Vec<String>,
}

pub fn compare(original: &str, optimized: &str, media_present: bool) -> OptimizationReport {
    compare_with(original, optimized, media_present, &EngineConfig::default())
}

pub fn compare_with(
    original: &str,
    optimized: &str,
    media_present: bool,
    config: &EngineConfig,
) -> OptimizationReport {
    let before = analyze_with_config(original, media_present, config);
    let after = analyze_with_config(optimized, media_present, config);
    let improvements = list_improvements(&before, &after, config);
    let score_delta =
        after.engagement_scores.overall_score - before.engagement_scores.overall_score;

    OptimizationReport {
        original: before,
        optimized: after,
        score_delta,
        improvements,
    }
}

fn list_improvements(before: &PostAnalysis, after: &PostAnalysis, config: &EngineConfig) -> Vec<String> {
    let mut improvements = Vec::new();
    let old_score = before.engagement_scores.overall_score;
    let new_score = after.engagement_scores.overall_score;
    if new_score > old_score {
        improvements.push(format!(
            "Overall score improved from {} to {}",
            format_float(old_score, 0),
            format_float(new_score, 0)
        ));
    }

    let old = &before.content_metrics;
    let new = &after.content_metrics;
    let window = &config.length;
    if old.character_count < window.min && new.character_count >= window.min {
        improvements.push("Length increased to optimal range".to_string());
    } else if old.character_count > window.max && new.character_count <= window.max {
        improvements.push("Length reduced to within character limit".to_string());
    }

    if !old.has_question && new.has_question {
        improvements.push(format!(
            "Added question to boost reply engagement (+{})",
            format_float(
                config
                    .engagement
                    .points(SubScore::Replyability, SignalKind::Question),
                0
            )
        ));
    }
    if !old.has_cta && new.has_cta {
        improvements.push("Added call-to-action".to_string());
    }

    let hashtag_limit = config.detection.max_hashtags;
    if old.hashtag_count > hashtag_limit && new.hashtag_count <= hashtag_limit {
        improvements.push("Reduced hashtags to avoid spam penalty".to_string());
    }

    if after.warnings.len() < before.warnings.len() {
        improvements.push(format!(
            "Removed {} warning(s)",
            before.warnings.len() - after.warnings.len()
        ));
    }
    improvements
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_texts_report_nothing() {
        let text = "Shipping a new release today with faster startup and fewer allocations overall.";
        let report = compare(text, text, false);
        assert!(report.score_delta.abs() < 1e-6);
        assert!(report.improvements.is_empty());
    }

    #[test]
    fn rewrite_lists_each_gain() {
        let original = "ok #a #b #c #d";
        let optimized = "What is the one habit that made your mornings calmer this year? \
                         Share yours below, I read every reply and collect the best ones.";
        let report = compare(original, optimized, false);
        assert!(report.score_delta > 0.0);
        assert!(report.improvements[0].starts_with("Overall score improved"));
        assert!(report
            .improvements
            .contains(&"Length increased to optimal range".to_string()));
        assert!(report
            .improvements
            .iter()
            .any(|line| line.starts_with("Added question")));
        assert!(report
            .improvements
            .contains(&"Reduced hashtags to avoid spam penalty".to_string()));
        assert!(report
            .improvements
            .iter()
            .any(|line| line.starts_with("Removed ")));
    }

    #[test]
    fn trimming_an_overlong_post_is_noticed() {
        let original = "word ".repeat(70);
        let optimized = "word ".repeat(30);
        let report = compare(&original, &optimized, false);
        assert!(report
            .improvements
            .contains(&"Length reduced to within character limit".to_string()));
    }
}
