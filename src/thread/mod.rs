pub mod composer;
pub mod scorer;
pub mod selector;

pub use composer::{compose, compose_with, ComposeOptions};
pub use scorer::{score_thread, score_thread_with};
pub use selector::{selector_for, ContentHashSelector, CtaSelector, SeededSelector};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static CTA_PHRASING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)follow|like|retweet|share|comment|reply").expect("thread cta regex")
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadPart {
    pub id: String,
    pub content: String,
}

impl ThreadPart {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
        }
    }

    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartScore {
    pub id: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadAnalysis {
    pub total_score: f64,
    pub hook_strength: f64,
    pub flow_score: f64,
    pub cta_effectiveness: f64,
    pub part_scores: Vec<PartScore>,
    pub suggestions: Vec<String>,
}

pub(crate) fn has_cta_phrasing(text: &str) -> bool {
    CTA_PHRASING_RE.is_match(text)
}

/// True when the first word opens with one of `starters` as a whole word,
/// so "I'm" and "Let's" count but "Italy" does not.
pub(crate) fn starts_with_hook_starter(text: &str, starters: &[String]) -> bool {
    let Some(first_word) = text.split_whitespace().next() else {
        return false;
    };
    let lead: String = first_word.chars().take_while(|c| c.is_alphabetic()).collect();
    starters
        .iter()
        .any(|starter| lead.eq_ignore_ascii_case(starter))
}
