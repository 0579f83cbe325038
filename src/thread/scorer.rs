use tracing::debug;

use crate::config::ThreadConfig;
use crate::scoring::clamp_score;
use crate::thread::{
    has_cta_phrasing, starts_with_hook_starter, PartScore, ThreadAnalysis, ThreadPart,
};

const WEAK_HOOK: &str = "Add a stronger hook to your first tweet";
const MISSING_CTA: &str = "Add a call-to-action to your last tweet";
const WEAK_FLOW: &str = "Improve transitions between tweets for better flow";
const OVER_LIMIT: &str = "Some tweets exceed character limit";
const TOO_FEW_PARTS: &str = "Threads with 3+ tweets tend to perform better";
const TOO_MANY_PARTS: &str = "Threads beyond 7 tweets tend to lose readers; consider trimming";
const LONG_OPENER: &str = "Keep the first tweet short enough to show in full in the timeline";

pub fn score_thread(parts: &[ThreadPart]) -> ThreadAnalysis {
    score_thread_with(parts, &ThreadConfig::default())
}

pub fn score_thread_with(parts: &[ThreadPart], config: &ThreadConfig) -> ThreadAnalysis {
    let part_scores: Vec<PartScore> = parts
        .iter()
        .map(|part| PartScore {
            id: part.id.clone(),
            score: part_score(&part.content, config),
        })
        .collect();

    let average = if part_scores.is_empty() {
        config.part_baseline
    } else {
        part_scores.iter().map(|p| p.score).sum::<f64>() / part_scores.len() as f64
    };

    let first = parts.first().map(|p| p.content.as_str()).unwrap_or("");
    let last = parts.last().map(|p| p.content.as_str()).unwrap_or("");

    let hook_strength = hook_strength(first, config);
    let cta_effectiveness = cta_effectiveness(last, config);
    let flow_score = flow_score(parts, config);

    let total_score = (average * config.part_weight
        + hook_strength * config.hook_weight
        + flow_score * config.flow_weight)
        .round();

    let suggestions = thread_suggestions(parts, hook_strength, cta_effectiveness, flow_score, config);

    debug!(
        parts = parts.len(),
        total_score,
        hook_strength,
        flow_score,
        cta_effectiveness,
        "scored thread"
    );

    ThreadAnalysis {
        total_score,
        hook_strength,
        flow_score,
        cta_effectiveness,
        part_scores,
        suggestions,
    }
}

fn part_score(content: &str, config: &ThreadConfig) -> f64 {
    let table = &config.part;
    let chars = content.chars().count();
    let mut score = config.part_baseline;
    if chars > table.medium_length {
        score += table.medium_bonus;
    }
    if chars > table.long_length {
        score += table.long_bonus;
    }
    if content.contains('?') {
        score += table.question_bonus;
    }
    if content.chars().any(|c| c.is_ascii_digit()) {
        score += table.digit_bonus;
    }
    if chars > config.max_part_length {
        score -= table.over_budget_penalty;
    }
    clamp_score(score)
}

fn hook_strength(first: &str, config: &ThreadConfig) -> f64 {
    let table = &config.hook;
    let chars = first.chars().count();
    let mut score = config.hook_baseline;
    let marker = config.hook_marker.trim_end();
    if !marker.is_empty() && first.starts_with(marker) {
        score += table.marker_bonus;
    }
    if first.contains('?') {
        score += table.question_bonus;
    }
    if starts_with_hook_starter(first, &config.hook_starters) {
        score += table.starter_bonus;
    }
    if chars > table.ideal_min_length && chars < table.ideal_max_length {
        score += table.ideal_length_bonus;
    }
    clamp_score(score)
}

fn cta_effectiveness(last: &str, config: &ThreadConfig) -> f64 {
    let mut score = config.cta_baseline;
    if has_cta_phrasing(last) {
        score += config.cta_phrase_bonus;
    }
    if last.contains('?') {
        score += config.cta_question_bonus;
    }
    clamp_score(score)
}

fn flow_score(parts: &[ThreadPart], config: &ThreadConfig) -> f64 {
    let connected = parts
        .windows(2)
        .filter(|pair| shares_transition_word(&pair[0].content, &pair[1].content, config))
        .count();
    clamp_score(config.flow_baseline + connected as f64 * config.flow_pair_bonus)
}

/// Whether the tail of `prev` and the head of `next` repeat a meaningful word.
fn shares_transition_word(prev: &str, next: &str, config: &ThreadConfig) -> bool {
    let window = config.flow_window_words;
    let prev_words = normalized_words(prev);
    let next_words = normalized_words(next);
    let tail = &prev_words[prev_words.len().saturating_sub(window)..];
    let head = &next_words[..next_words.len().min(window)];
    tail.iter().any(|word| {
        word.chars().count() >= config.flow_min_word_length && head.contains(word)
    })
}

fn normalized_words(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|word| {
            word.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|word| !word.is_empty())
        .collect()
}

fn thread_suggestions(
    parts: &[ThreadPart],
    hook_strength: f64,
    cta_effectiveness: f64,
    flow_score: f64,
    config: &ThreadConfig,
) -> Vec<String> {
    let mut suggestions = Vec::new();
    if hook_strength < config.hook_threshold {
        suggestions.push(WEAK_HOOK);
    }
    if cta_effectiveness < config.cta_threshold {
        suggestions.push(MISSING_CTA);
    }
    if flow_score < config.flow_threshold {
        suggestions.push(WEAK_FLOW);
    }
    if parts.iter().any(|p| p.char_count() > config.max_part_length) {
        suggestions.push(OVER_LIMIT);
    }
    if parts.len() < config.min_parts {
        suggestions.push(TOO_FEW_PARTS);
    }
    if parts.len() > config.max_parts {
        suggestions.push(TOO_MANY_PARTS);
    }
    if parts
        .first()
        .is_some_and(|p| p.char_count() > config.opening_max_length)
    {
        suggestions.push(LONG_OPENER);
    }
    suggestions.into_iter().map(String::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(texts: &[&str]) -> Vec<ThreadPart> {
        texts
            .iter()
            .enumerate()
            .map(|(i, text)| ThreadPart::new(format!("p{}", i), *text))
            .collect()
    }

    #[test]
    fn empty_thread_uses_baselines() {
        let analysis = score_thread(&[]);
        assert!(analysis.part_scores.is_empty());
        assert!((analysis.hook_strength - 50.0).abs() < 1e-6);
        assert!((analysis.cta_effectiveness - 50.0).abs() < 1e-6);
        assert!((analysis.flow_score - 70.0).abs() < 1e-6);
        assert!((analysis.total_score - 56.0).abs() < 1e-6);
        assert_eq!(
            analysis.suggestions,
            vec![WEAK_HOOK, MISSING_CTA, WEAK_FLOW, TOO_FEW_PARTS]
        );
    }

    #[test]
    fn part_score_rules() {
        let config = ThreadConfig::default();
        assert!((part_score("short", &config) - 50.0).abs() < 1e-6);

        let medium = format!("{} 42?", "a".repeat(60));
        assert!((part_score(&medium, &config) - 70.0).abs() < 1e-6);

        let oversized = "b".repeat(300);
        assert!((part_score(&oversized, &config) - 50.0).abs() < 1e-6);
    }

    #[test]
    fn hook_rewards_marker_question_and_starter() {
        let config = ThreadConfig::default();
        assert!((hook_strength("Thread: Why is this hard?", &config) - 80.0).abs() < 1e-6);
        assert!((hook_strength("Here is why it matters?", &config) - 75.0).abs() < 1e-6);
        assert!((hook_strength("plain opener", &config) - 50.0).abs() < 1e-6);
    }

    #[test]
    fn flow_counts_shared_transition_words() {
        let connected = parts(&["we talk about caching", "Caching matters a lot"]);
        let analysis = score_thread(&connected);
        assert!((analysis.flow_score - 75.0).abs() < 1e-6);

        let short_word = parts(&["this is the end", "the next part"]);
        assert!((score_thread(&short_word).flow_score - 70.0).abs() < 1e-6);
    }

    #[test]
    fn well_formed_thread_totals() {
        let thread = parts(&[
            "Thread: Why do caches fail in production?",
            "Production caches fail when keys expire at once.",
            "Follow for more notes on 3 cache patterns.",
        ]);
        let analysis = score_thread(&thread);
        assert!((analysis.hook_strength - 80.0).abs() < 1e-6);
        assert!((analysis.cta_effectiveness - 80.0).abs() < 1e-6);
        assert!((analysis.flow_score - 75.0).abs() < 1e-6);
        assert!((analysis.total_score - 68.0).abs() < 1e-6);
        assert!(analysis.suggestions.is_empty());
    }

    #[test]
    fn keeps_part_order_and_ids() {
        let thread = parts(&["one", "two", "three", "four"]);
        let analysis = score_thread(&thread);
        let ids: Vec<&str> = analysis.part_scores.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p0", "p1", "p2", "p3"]);
        assert_eq!(analysis, score_thread(&thread));
    }

    #[test]
    fn flags_long_threads_and_openers() {
        let opener = "c".repeat(270);
        let mut texts = vec![opener.as_str()];
        texts.extend(std::iter::repeat("more detail here").take(8));
        let analysis = score_thread(&parts(&texts));
        assert!(analysis.suggestions.contains(&TOO_MANY_PARTS.to_string()));
        assert!(analysis.suggestions.contains(&LONG_OPENER.to_string()));
        assert!(!analysis.suggestions.contains(&OVER_LIMIT.to_string()));
    }
}
