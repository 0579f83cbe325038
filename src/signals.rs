//! Algorithm signal detection.
//!
//! Every rule is a [`SignalKind`] variant with a fixed category. Rules are
//! evaluated independently, so any combination may fire; a kind appears at
//! most once per analysis.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::features::{ContentMetrics, LINK_RE};

static VALUE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:here(?:'|’)?s (?:what|how|why)|here is (?:what|how)|let me explain|this is how)\b")
        .expect("value regex")
});
static CONTROVERSY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:unpopular opinion|hot take|controversial take)\b").expect("controversy regex")
});
static LISTICLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b\d+\s+(?:[a-z]+\s+)?(?:things|ways|tips|lessons|reasons|mistakes|steps|rules|habits|tools|ideas)\b",
    )
    .expect("listicle regex")
});
static OPEN_QUESTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:what|how|why|which|who)\b[^?.!]*\?").expect("open question regex")
});
static CLOSED_QUESTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?im)(?:^\s*|[.!?]\s+)(?:do|does|did|is|are|was|were|can|could|will|would|should|have|has)\s+\w+[^.!]*(?:\?|$)",
    )
    .expect("closed question regex")
});
static STORY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:i remember|when i was|years ago|i learned|my story|true story|last (?:week|month|year)|i used to)\b",
    )
    .expect("story regex")
});
static ACTIONABLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:how to|step \d+|steps to|fix|solve|avoid|checklist|guide|template|framework)\b")
        .expect("actionable regex")
});
static INCOMPLETE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\.\.\.|…|\bbut here(?:'|’)?s the (?:thing|catch)\b|\bwait for it\b")
        .expect("incomplete thought regex")
});
static EXCESS_PUNCTUATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!{2,}|[!?]{3,}").expect("punctuation regex"));
static THREAD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)🧵|\bthread\b|^\s*\d{1,2}/(?:\d{1,2}|n)?(?:\s|$)").expect("thread regex")
});
static FOLLOW_BAIT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:follow for follow|follow4follow|f4f|follow back)\b").expect("follow bait regex")
});
static ENGAGEMENT_BAIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:dm me|link in bio)\b").expect("engagement bait regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalCategory {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    OptimalLength,
    IdealLength,
    Question,
    HashtagDiscipline,
    ValueFraming,
    Controversy,
    Listicle,
    Media,
    TooShort,
    TooLong,
    ExcessHashtags,
    AllCaps,
    LinkOnly,
    FollowBait,
    EngagementBait,
    OpenQuestion,
    ClosedQuestion,
    StoryFraming,
    ActionableFraming,
    IncompleteThought,
    ExcessPunctuation,
    CallToAction,
    ThreadIndicator,
    Emojis,
    Mentions,
    Links,
    Bland,
}

impl SignalKind {
    pub const ALL: [SignalKind; 27] = [
        SignalKind::OptimalLength,
        SignalKind::IdealLength,
        SignalKind::Question,
        SignalKind::HashtagDiscipline,
        SignalKind::ValueFraming,
        SignalKind::Controversy,
        SignalKind::Listicle,
        SignalKind::Media,
        SignalKind::TooShort,
        SignalKind::TooLong,
        SignalKind::ExcessHashtags,
        SignalKind::AllCaps,
        SignalKind::LinkOnly,
        SignalKind::FollowBait,
        SignalKind::EngagementBait,
        SignalKind::OpenQuestion,
        SignalKind::ClosedQuestion,
        SignalKind::StoryFraming,
        SignalKind::ActionableFraming,
        SignalKind::IncompleteThought,
        SignalKind::ExcessPunctuation,
        SignalKind::CallToAction,
        SignalKind::ThreadIndicator,
        SignalKind::Emojis,
        SignalKind::Mentions,
        SignalKind::Links,
        SignalKind::Bland,
    ];

    pub fn category(self) -> SignalCategory {
        match self {
            SignalKind::OptimalLength
            | SignalKind::IdealLength
            | SignalKind::Question
            | SignalKind::HashtagDiscipline
            | SignalKind::ValueFraming
            | SignalKind::Controversy
            | SignalKind::Listicle
            | SignalKind::Media => SignalCategory::Positive,
            SignalKind::TooShort
            | SignalKind::TooLong
            | SignalKind::ExcessHashtags
            | SignalKind::AllCaps
            | SignalKind::LinkOnly
            | SignalKind::FollowBait
            | SignalKind::EngagementBait => SignalCategory::Negative,
            _ => SignalCategory::Neutral,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SignalKind::OptimalLength => "optimal_length",
            SignalKind::IdealLength => "ideal_length",
            SignalKind::Question => "question",
            SignalKind::HashtagDiscipline => "hashtag_discipline",
            SignalKind::ValueFraming => "value_framing",
            SignalKind::Controversy => "controversy",
            SignalKind::Listicle => "listicle",
            SignalKind::Media => "media",
            SignalKind::TooShort => "too_short",
            SignalKind::TooLong => "too_long",
            SignalKind::ExcessHashtags => "excess_hashtags",
            SignalKind::AllCaps => "all_caps",
            SignalKind::LinkOnly => "link_only",
            SignalKind::FollowBait => "follow_bait",
            SignalKind::EngagementBait => "engagement_bait",
            SignalKind::OpenQuestion => "open_question",
            SignalKind::ClosedQuestion => "closed_question",
            SignalKind::StoryFraming => "story_framing",
            SignalKind::ActionableFraming => "actionable_framing",
            SignalKind::IncompleteThought => "incomplete_thought",
            SignalKind::ExcessPunctuation => "excess_punctuation",
            SignalKind::CallToAction => "call_to_action",
            SignalKind::ThreadIndicator => "thread_indicator",
            SignalKind::Emojis => "emojis",
            SignalKind::Mentions => "mentions",
            SignalKind::Links => "links",
            SignalKind::Bland => "bland",
        }
    }

    /// Positive signals that give a reader a reason to engage. Content with
    /// none of them is flagged as [`SignalKind::Bland`].
    pub fn is_hook(self) -> bool {
        matches!(
            self,
            SignalKind::Question
                | SignalKind::ValueFraming
                | SignalKind::Controversy
                | SignalKind::Listicle
                | SignalKind::Media
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlgorithmSignal {
    #[serde(rename = "name")]
    pub kind: SignalKind,
    pub category: SignalCategory,
}

impl AlgorithmSignal {
    pub fn new(kind: SignalKind) -> Self {
        Self {
            kind,
            category: kind.category(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalSet {
    pub positive: Vec<AlgorithmSignal>,
    pub negative: Vec<AlgorithmSignal>,
    pub neutral: Vec<AlgorithmSignal>,
}

impl SignalSet {
    /// Builds a set from arbitrary kinds; repeats are ignored.
    pub fn from_kinds(kinds: impl IntoIterator<Item = SignalKind>) -> Self {
        let mut set = SignalSet::default();
        for kind in kinds {
            set.insert(kind);
        }
        set
    }

    pub fn insert(&mut self, kind: SignalKind) {
        if self.contains(kind) {
            return;
        }
        let signal = AlgorithmSignal::new(kind);
        match signal.category {
            SignalCategory::Positive => self.positive.push(signal),
            SignalCategory::Negative => self.negative.push(signal),
            SignalCategory::Neutral => self.neutral.push(signal),
        }
    }

    pub fn remove(&mut self, kind: SignalKind) {
        for bucket in [&mut self.positive, &mut self.negative, &mut self.neutral] {
            bucket.retain(|signal| signal.kind != kind);
        }
    }

    pub fn contains(&self, kind: SignalKind) -> bool {
        self.iter().any(|signal| signal.kind == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AlgorithmSignal> {
        self.positive
            .iter()
            .chain(self.negative.iter())
            .chain(self.neutral.iter())
    }

    pub fn len(&self) -> usize {
        self.positive.len() + self.negative.len() + self.neutral.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn detect_signals(content: &str, metrics: &ContentMetrics, config: &EngineConfig) -> SignalSet {
    let mut set = SignalSet::default();

    if metrics.is_blank() {
        if metrics.has_media {
            set.insert(SignalKind::Media);
        }
        return set;
    }

    for kind in SignalKind::ALL {
        if kind != SignalKind::Bland && fires(kind, content, metrics, config) {
            set.insert(kind);
        }
    }
    if !set.positive.iter().any(|signal| signal.kind.is_hook()) {
        set.insert(SignalKind::Bland);
    }

    set
}

fn fires(kind: SignalKind, content: &str, metrics: &ContentMetrics, config: &EngineConfig) -> bool {
    let chars = metrics.character_count;
    let length = &config.length;
    let detection = &config.detection;

    match kind {
        SignalKind::OptimalLength => length.is_optimal(chars),
        SignalKind::IdealLength => length.is_ideal(chars),
        SignalKind::Question => metrics.has_question,
        SignalKind::HashtagDiscipline => metrics.hashtag_count <= detection.max_hashtags,
        SignalKind::ValueFraming => VALUE_RE.is_match(content),
        SignalKind::Controversy => CONTROVERSY_RE.is_match(content),
        SignalKind::Listicle => LISTICLE_RE.is_match(content),
        SignalKind::Media => metrics.has_media,
        SignalKind::TooShort => chars < length.min,
        SignalKind::TooLong => chars > length.max,
        SignalKind::ExcessHashtags => metrics.hashtag_count > detection.max_hashtags,
        SignalKind::AllCaps => longest_caps_run(content) >= detection.caps_run_min_words,
        SignalKind::LinkOnly => is_link_only(content, metrics, detection.link_only_max_words),
        SignalKind::FollowBait => FOLLOW_BAIT_RE.is_match(content),
        SignalKind::EngagementBait => ENGAGEMENT_BAIT_RE.is_match(content),
        SignalKind::OpenQuestion => OPEN_QUESTION_RE.is_match(content),
        SignalKind::ClosedQuestion => CLOSED_QUESTION_RE.is_match(content),
        SignalKind::StoryFraming => STORY_RE.is_match(content),
        SignalKind::ActionableFraming => ACTIONABLE_RE.is_match(content),
        SignalKind::IncompleteThought => INCOMPLETE_RE.is_match(content),
        SignalKind::ExcessPunctuation => EXCESS_PUNCTUATION_RE.is_match(content),
        SignalKind::CallToAction => metrics.has_cta,
        SignalKind::ThreadIndicator => THREAD_RE.is_match(content),
        SignalKind::Emojis => metrics.has_emojis,
        SignalKind::Mentions => metrics.has_mentions,
        SignalKind::Links => {
            metrics.has_links && !is_link_only(content, metrics, detection.link_only_max_words)
        }
        SignalKind::Bland => false,
    }
}

/// Longest run of consecutive ALL-CAPS words (two or more letters each).
/// Words without letters, such as numbers, neither extend nor break a run.
fn longest_caps_run(content: &str) -> usize {
    let mut longest = 0usize;
    let mut current = 0usize;

    for word in content.split_whitespace() {
        let letters: Vec<char> = word.chars().filter(|c| c.is_alphabetic()).collect();
        if letters.is_empty() {
            continue;
        }
        let shouting = letters.len() >= 2 && letters.iter().all(|c| c.is_uppercase());
        if shouting {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }

    longest
}

fn is_link_only(content: &str, metrics: &ContentMetrics, max_words: usize) -> bool {
    if !metrics.has_links {
        return false;
    }
    let remainder = LINK_RE.replace_all(content, " ");
    remainder.split_whitespace().count() <= max_words
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::extract_metrics;

    fn detect(content: &str) -> SignalSet {
        let metrics = extract_metrics(content, false);
        detect_signals(content, &metrics, &EngineConfig::default())
    }

    fn padded(core: &str, total_chars: usize) -> String {
        let mut text = core.to_string();
        while text.chars().count() < total_chars {
            text.push('a');
        }
        text
    }

    #[test]
    fn blank_content_fires_nothing() {
        assert!(detect("").is_empty());
        assert!(detect("   \n\t").is_empty());
    }

    #[test]
    fn blank_content_with_media_only_reports_media() {
        let metrics = extract_metrics("", true);
        let set = detect_signals("", &metrics, &EngineConfig::default());
        assert_eq!(set.len(), 1);
        assert!(set.contains(SignalKind::Media));
    }

    #[test]
    fn length_window_boundaries() {
        let at_min = detect(&padded("word ", 80));
        let at_max = detect(&padded("word ", 280));
        let below = detect(&padded("word ", 79));
        let above = detect(&padded("word ", 281));

        assert!(at_min.contains(SignalKind::OptimalLength));
        assert!(at_max.contains(SignalKind::OptimalLength));
        assert!(below.contains(SignalKind::TooShort));
        assert!(!below.contains(SignalKind::OptimalLength));
        assert!(above.contains(SignalKind::TooLong));
        assert!(!above.contains(SignalKind::OptimalLength));
    }

    #[test]
    fn hashtag_count_is_the_only_discriminant() {
        let two = detect("Shipping today #rust #systems");
        let three = detect("Shipping today #rust #systems #code");

        assert!(two.contains(SignalKind::HashtagDiscipline));
        assert!(!two.contains(SignalKind::ExcessHashtags));
        assert!(three.contains(SignalKind::ExcessHashtags));
        assert!(!three.contains(SignalKind::HashtagDiscipline));
    }

    #[test]
    fn detects_framing_patterns() {
        assert!(detect("Here's what nobody tells you about hiring").contains(SignalKind::ValueFraming));
        assert!(detect("Hot take: tabs are fine").contains(SignalKind::Controversy));
        assert!(detect("7 simple habits that changed my mornings").contains(SignalKind::Listicle));
        assert!(detect("5 tips for better sleep").contains(SignalKind::Listicle));
    }

    #[test]
    fn detects_all_caps_runs() {
        assert!(detect("THIS IS HUGE news for everyone").contains(SignalKind::AllCaps));
        assert!(!detect("NASA and ESA launch today").contains(SignalKind::AllCaps));
        assert!(detect("THIS IS 100 PERCENT TRUE").contains(SignalKind::AllCaps));
    }

    #[test]
    fn link_only_replaces_plain_links_signal() {
        let only = detect("look https://example.com/a");
        assert!(only.contains(SignalKind::LinkOnly));
        assert!(!only.contains(SignalKind::Links));

        let mixed = detect("I wrote up the full migration story here https://example.com/a");
        assert!(mixed.contains(SignalKind::Links));
        assert!(!mixed.contains(SignalKind::LinkOnly));
    }

    #[test]
    fn detects_spam_phrasing() {
        assert!(detect("f4f anyone? follow for follow").contains(SignalKind::FollowBait));
        assert!(detect("DM me for the template").contains(SignalKind::EngagementBait));
        assert!(detect("Full guide: link in bio").contains(SignalKind::EngagementBait));
    }

    #[test]
    fn classifies_question_shape() {
        let open = detect("What would you build with a free weekend?");
        assert!(open.contains(SignalKind::Question));
        assert!(open.contains(SignalKind::OpenQuestion));
        assert!(!open.contains(SignalKind::ClosedQuestion));

        let closed = detect("Do you use Rust at work?");
        assert!(closed.contains(SignalKind::ClosedQuestion));
        assert!(!closed.contains(SignalKind::OpenQuestion));
    }

    #[test]
    fn closed_question_needs_no_question_mark() {
        let unfinished = detect("Do you think remote work is here to stay");
        assert!(unfinished.contains(SignalKind::ClosedQuestion));
        assert!(!unfinished.contains(SignalKind::Question));
        assert!(detect("Do you think remote work is here to stay?").contains(SignalKind::ClosedQuestion));
        assert!(detect("Shipped it. Is anyone else on the new runtime").contains(SignalKind::ClosedQuestion));
        assert!(!detect("Do it now. The window closes tonight.").contains(SignalKind::ClosedQuestion));
    }

    #[test]
    fn thread_numbering_only_counts_at_line_start() {
        assert!(!detect("We offer 24/7 support for every customer").contains(SignalKind::ThreadIndicator));
        assert!(!detect("Add 1/2 cup of sugar to the batter").contains(SignalKind::ThreadIndicator));
        assert!(detect("1/ Here's how we cut our cloud bill").contains(SignalKind::ThreadIndicator));
        assert!(detect("Some context first\n2/5 the actual numbers").contains(SignalKind::ThreadIndicator));
        assert!(detect("Long story ahead 🧵").contains(SignalKind::ThreadIndicator));
    }

    #[test]
    fn remove_drops_a_signal_from_its_bucket() {
        let mut set = SignalSet::from_kinds([SignalKind::Question, SignalKind::TooShort, SignalKind::Bland]);
        set.remove(SignalKind::Bland);
        set.remove(SignalKind::Media);
        assert_eq!(set.len(), 2);
        assert!(!set.contains(SignalKind::Bland));
        assert!(set.contains(SignalKind::TooShort));
    }

    #[test]
    fn bland_only_without_hooks() {
        assert!(detect("Went for a walk today").contains(SignalKind::Bland));
        assert!(!detect("Went for a walk today?").contains(SignalKind::Bland));
    }

    #[test]
    fn neutral_signals_for_informative_features() {
        let set = detect("Loving this 🚀 with @ferris 1/ thread");
        assert!(set.contains(SignalKind::Emojis));
        assert!(set.contains(SignalKind::Mentions));
        assert!(set.contains(SignalKind::ThreadIndicator));
        assert!(set.neutral.iter().all(|s| s.category == SignalCategory::Neutral));
    }

    #[test]
    fn signals_land_in_their_category_bucket() {
        let set = detect("Unpopular opinion: WE NEED MORE meetings #a #b #c");
        assert!(set.positive.iter().all(|s| s.category == SignalCategory::Positive));
        assert!(set.negative.iter().all(|s| s.category == SignalCategory::Negative));
        assert!(set.negative.iter().any(|s| s.kind == SignalKind::ExcessHashtags));
        assert!(set.negative.iter().any(|s| s.kind == SignalKind::AllCaps));
    }

    #[test]
    fn from_kinds_ignores_repeats() {
        let set = SignalSet::from_kinds([SignalKind::Question, SignalKind::Question, SignalKind::TooShort]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn every_kind_has_a_unique_name() {
        let mut names: Vec<&str> = SignalKind::ALL.iter().map(|k| k.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), SignalKind::ALL.len());
    }
}
