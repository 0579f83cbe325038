use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::config::{EngineConfig, SCORE_BASELINE};
use crate::features::ContentMetrics;
use crate::scoring::{overall_score_for, EngagementScores, SubScore};
use crate::signals::{SignalKind, SignalSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn label(self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

impl Priority {
    pub fn label(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    fn rank(self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }

    fn escalate(self) -> Self {
        match self {
            Priority::Low => Priority::Medium,
            _ => Priority::High,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionType {
    AddQuestion,
    AddCta,
    AddMedia,
    ReduceLength,
    IncreaseLength,
    AddThread,
    RemoveHashtags,
    AddHook,
    AddControversy,
    AddValue,
    RemoveLinks,
    FixFormatting,
    ImproveReadability,
    RemoveSpam,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warning {
    pub severity: Severity,
    pub message: String,
    pub score_impact: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    #[serde(rename = "type")]
    pub kind: SuggestionType,
    pub priority: Priority,
    pub message: String,
    pub action: Option<String>,
    pub potential_score_increase: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub warnings: Vec<Warning>,
    pub suggestions: Vec<Suggestion>,
}

enum Trigger {
    /// Fires while the signal is missing; following the advice adds it.
    Missing(SignalKind),
    /// Fires while the signal is present; following the advice clears it.
    Present(SignalKind),
}

struct Rule {
    kind: SuggestionType,
    priority: Priority,
    trigger: Trigger,
    /// Signal the same edit flips the other way: a penalty cleared by adding
    /// the missing signal, or a bonus earned by clearing the present one.
    companion: Option<SignalKind>,
    sub_score: Option<SubScore>,
    applies: fn(&ContentMetrics, &SignalSet) -> bool,
    message: &'static str,
    action: &'static str,
}

const RULES: &[Rule] = &[
    Rule {
        kind: SuggestionType::AddQuestion,
        priority: Priority::High,
        trigger: Trigger::Missing(SignalKind::Question),
        companion: None,
        sub_score: Some(SubScore::Replyability),
        applies: always,
        message: "Ask a question to invite replies.",
        action: "End with an open-ended question such as \"What would you add?\"",
    },
    Rule {
        kind: SuggestionType::IncreaseLength,
        priority: Priority::Medium,
        trigger: Trigger::Missing(SignalKind::OptimalLength),
        companion: Some(SignalKind::TooShort),
        sub_score: Some(SubScore::DwellPotential),
        applies: too_short,
        message: "Add context; posts between 80 and 280 characters perform best.",
        action: "Expand to roughly 180 characters with a concrete detail or example.",
    },
    Rule {
        kind: SuggestionType::ReduceLength,
        priority: Priority::High,
        trigger: Trigger::Missing(SignalKind::OptimalLength),
        companion: Some(SignalKind::TooLong),
        sub_score: None,
        applies: too_long,
        message: "Trim the post to fit within 280 characters.",
        action: "Cut filler words or move supporting detail into a reply.",
    },
    Rule {
        kind: SuggestionType::AddThread,
        priority: Priority::Medium,
        trigger: Trigger::Missing(SignalKind::ThreadIndicator),
        companion: None,
        sub_score: Some(SubScore::DwellPotential),
        applies: too_long,
        message: "Long content reads better as a thread.",
        action: "Split into numbered parts (1/n) with a hook in the first post.",
    },
    Rule {
        kind: SuggestionType::IncreaseLength,
        priority: Priority::Low,
        trigger: Trigger::Missing(SignalKind::IdealLength),
        companion: None,
        sub_score: None,
        applies: optimal_but_not_ideal,
        message: "Length is fine but sits away from the ~180 character sweet spot.",
        action: "Adjust the length toward about 180 characters.",
    },
    Rule {
        kind: SuggestionType::AddHook,
        priority: Priority::Medium,
        trigger: Trigger::Missing(SignalKind::ValueFraming),
        companion: None,
        sub_score: Some(SubScore::Retweetability),
        applies: always,
        message: "Open with a value promise to earn the read.",
        action: "Lead with \"Here's what I learned...\" or \"Here's how...\".",
    },
    Rule {
        kind: SuggestionType::AddControversy,
        priority: Priority::Low,
        trigger: Trigger::Missing(SignalKind::Controversy),
        companion: None,
        sub_score: Some(SubScore::Quoteability),
        applies: always,
        message: "A clear stance gives people something to quote.",
        action: "Frame the core point as a hot take or unpopular opinion.",
    },
    Rule {
        kind: SuggestionType::AddValue,
        priority: Priority::Medium,
        trigger: Trigger::Missing(SignalKind::Listicle),
        companion: None,
        sub_score: Some(SubScore::Retweetability),
        applies: always,
        message: "Structured takeaways are easy to share.",
        action: "Package the idea as \"3 lessons\" or \"5 ways\".",
    },
    Rule {
        kind: SuggestionType::AddMedia,
        priority: Priority::Medium,
        trigger: Trigger::Missing(SignalKind::Media),
        companion: None,
        sub_score: Some(SubScore::DwellPotential),
        applies: always,
        message: "Attach an image or video to hold attention.",
        action: "Add a screenshot, chart or short clip that supports the point.",
    },
    Rule {
        kind: SuggestionType::AddCta,
        priority: Priority::Medium,
        trigger: Trigger::Missing(SignalKind::CallToAction),
        companion: None,
        sub_score: Some(SubScore::Shareability),
        applies: always,
        message: "Tell readers what to do next.",
        action: "Close with \"Share this with someone who needs it\" or \"Let me know below\".",
    },
    Rule {
        kind: SuggestionType::RemoveHashtags,
        priority: Priority::High,
        trigger: Trigger::Present(SignalKind::ExcessHashtags),
        companion: Some(SignalKind::HashtagDiscipline),
        sub_score: None,
        applies: always,
        message: "Too many hashtags look spammy.",
        action: "Keep at most two specific hashtags.",
    },
    Rule {
        kind: SuggestionType::RemoveLinks,
        priority: Priority::High,
        trigger: Trigger::Present(SignalKind::LinkOnly),
        companion: None,
        sub_score: None,
        applies: always,
        message: "A bare link gives the feed nothing to rank.",
        action: "Summarize the key insight in the post and put the link in a reply.",
    },
    Rule {
        kind: SuggestionType::FixFormatting,
        priority: Priority::Medium,
        trigger: Trigger::Present(SignalKind::AllCaps),
        companion: None,
        sub_score: None,
        applies: always,
        message: "Long ALL-CAPS runs read as shouting.",
        action: "Use sentence case and emphasize a single word if needed.",
    },
    Rule {
        kind: SuggestionType::ImproveReadability,
        priority: Priority::Low,
        trigger: Trigger::Present(SignalKind::ExcessPunctuation),
        companion: None,
        sub_score: Some(SubScore::Likeability),
        applies: always,
        message: "Stacked punctuation like \"!!!\" or \"?!?\" reads as noise.",
        action: "Keep one exclamation or question mark per sentence.",
    },
    Rule {
        kind: SuggestionType::RemoveSpam,
        priority: Priority::High,
        trigger: Trigger::Present(SignalKind::FollowBait),
        companion: None,
        sub_score: None,
        applies: always,
        message: "Follow-for-follow phrasing triggers spam filters.",
        action: "Remove follow-back requests and let the content earn follows.",
    },
    Rule {
        kind: SuggestionType::RemoveSpam,
        priority: Priority::Low,
        trigger: Trigger::Present(SignalKind::EngagementBait),
        companion: None,
        sub_score: None,
        applies: always,
        message: "\"DM me\" and \"link in bio\" phrasing is mildly penalized.",
        action: "Put the resource directly in the thread or a reply instead.",
    },
];

fn always(_: &ContentMetrics, _: &SignalSet) -> bool {
    true
}

fn too_short(_: &ContentMetrics, signals: &SignalSet) -> bool {
    signals.contains(SignalKind::TooShort)
}

fn too_long(_: &ContentMetrics, signals: &SignalSet) -> bool {
    signals.contains(SignalKind::TooLong)
}

fn optimal_but_not_ideal(_: &ContentMetrics, signals: &SignalSet) -> bool {
    signals.contains(SignalKind::OptimalLength) && !signals.contains(SignalKind::IdealLength)
}

pub fn build_feedback(
    metrics: &ContentMetrics,
    signals: &SignalSet,
    scores: &EngagementScores,
    config: &EngineConfig,
) -> Feedback {
    Feedback {
        warnings: build_warnings(signals, config),
        suggestions: build_suggestions(metrics, signals, scores, config),
    }
}

fn build_warnings(signals: &SignalSet, config: &EngineConfig) -> Vec<Warning> {
    signals
        .negative
        .iter()
        .map(|signal| {
            let score_impact = config.signals.weight(signal.kind).min(0.0);
            Warning {
                severity: severity_for(score_impact, config),
                message: warning_message(signal.kind).to_string(),
                score_impact,
            }
        })
        .collect()
}

fn severity_for(score_impact: f64, config: &EngineConfig) -> Severity {
    let magnitude = score_impact.abs();
    if magnitude >= config.severity.critical {
        Severity::Critical
    } else if magnitude >= config.severity.warning {
        Severity::Warning
    } else {
        Severity::Info
    }
}

fn warning_message(kind: SignalKind) -> &'static str {
    match kind {
        SignalKind::TooShort => "Post is shorter than 80 characters; short posts hold attention poorly.",
        SignalKind::TooLong => "Post exceeds 280 characters and will be cut off.",
        SignalKind::ExcessHashtags => "Three or more hashtags trigger spam signals.",
        SignalKind::AllCaps => "ALL-CAPS text is penalized as shouting.",
        SignalKind::LinkOnly => "Link-only posts are heavily down-ranked.",
        SignalKind::FollowBait => "Follow-for-follow phrasing is treated as spam.",
        SignalKind::EngagementBait => "\"DM me\" or \"link in bio\" phrasing carries a small penalty.",
        _ => "Content pattern reduces expected reach.",
    }
}

fn build_suggestions(
    metrics: &ContentMetrics,
    signals: &SignalSet,
    scores: &EngagementScores,
    config: &EngineConfig,
) -> Vec<Suggestion> {
    if metrics.is_blank() {
        return Vec::new();
    }

    let mut ranked: Vec<(usize, Suggestion)> = Vec::new();
    for (order, rule) in RULES.iter().enumerate() {
        let triggered = match rule.trigger {
            Trigger::Missing(kind) => !signals.contains(kind),
            Trigger::Present(kind) => signals.contains(kind),
        };
        if !triggered || !(rule.applies)(metrics, signals) {
            continue;
        }

        let mut priority = rule.priority;
        if let Some(sub_score) = rule.sub_score {
            if scores.get(sub_score) < SCORE_BASELINE {
                priority = priority.escalate();
            }
        }

        let edited = overall_score_for(&apply_rule(signals, rule), config);
        ranked.push((
            order,
            Suggestion {
                kind: rule.kind,
                priority,
                message: rule.message.to_string(),
                action: Some(rule.action.to_string()),
                potential_score_increase: (edited - scores.overall_score).max(0.0),
            },
        ));
    }

    ranked.sort_by(|(order_a, a), (order_b, b)| {
        b.potential_score_increase
            .partial_cmp(&a.potential_score_increase)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.priority.rank().cmp(&b.priority.rank()))
            .then_with(|| order_a.cmp(order_b))
    });

    ranked.into_iter().map(|(_, suggestion)| suggestion).collect()
}

/// Signal set the post would have after following `rule`.
fn apply_rule(signals: &SignalSet, rule: &Rule) -> SignalSet {
    let mut edited = signals.clone();
    match rule.trigger {
        Trigger::Missing(kind) => {
            edited.insert(kind);
            if let Some(cleared) = rule.companion {
                edited.remove(cleared);
            }
        }
        Trigger::Present(kind) => {
            edited.remove(kind);
            if let Some(earned) = rule.companion {
                edited.insert(earned);
            }
        }
    }
    if edited.positive.iter().any(|signal| signal.kind.is_hook()) {
        edited.remove(SignalKind::Bland);
    }
    edited
}
