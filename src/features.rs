use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::READING_WORDS_PER_SECOND;

static HASHTAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"#\w+").expect("hashtag regex"));
static MENTION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"@\w+").expect("mention regex"));
pub(crate) static LINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)https?://\S+|\b(?:www\.)?(?:[a-z0-9-]+\.)+(?:com|org|net|io|dev|ai|co|app|me|ly|gg|xyz|edu|gov|info|tv|us|uk)\b(?:/\S*)?",
    )
    .expect("link regex")
});

const CTA_PHRASES: [&str; 10] = [
    "follow",
    "retweet",
    "repost",
    "like if",
    "share this",
    "click",
    "link in bio",
    "comment below",
    "reply",
    "let me know",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentMetrics {
    pub character_count: usize,
    pub word_count: usize,
    pub sentence_count: usize,
    pub reading_time_seconds: u64,
    pub hashtag_count: usize,
    pub mention_count: usize,
    pub link_count: usize,
    pub emoji_count: usize,
    pub has_question: bool,
    pub has_cta: bool,
    pub has_media: bool,
    pub has_hashtags: bool,
    pub has_emojis: bool,
    pub has_mentions: bool,
    pub has_links: bool,
}

impl ContentMetrics {
    pub fn is_blank(&self) -> bool {
        self.word_count == 0
    }
}

pub fn extract_metrics(content: &str, media_present: bool) -> ContentMetrics {
    let word_count = content.split_whitespace().count();
    let hashtag_count = HASHTAG_RE.find_iter(content).count();
    let mention_count = MENTION_RE.find_iter(content).count();
    let link_count = LINK_RE.find_iter(content).count();
    let emoji_count = content.chars().filter(|ch| is_emoji(*ch)).count();

    let lowercase = content.to_lowercase();
    let has_cta = CTA_PHRASES.iter().any(|phrase| lowercase.contains(phrase));

    ContentMetrics {
        character_count: content.chars().count(),
        word_count,
        sentence_count: split_sentences(content).len(),
        reading_time_seconds: reading_time_seconds(word_count),
        hashtag_count,
        mention_count,
        link_count,
        emoji_count,
        has_question: content.contains('?'),
        has_cta,
        has_media: media_present,
        has_hashtags: hashtag_count > 0,
        has_emojis: emoji_count > 0,
        has_mentions: mention_count > 0,
        has_links: link_count > 0,
    }
}

/// Splits on `.`, `!` or `?` followed by whitespace or the end of input.
/// Fragments are trimmed and empty ones dropped.
pub fn split_sentences(content: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0usize;
    let mut chars = content.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        if !matches!(ch, '.' | '!' | '?') {
            continue;
        }
        let boundary = match chars.peek() {
            None => true,
            Some((_, next)) => next.is_whitespace(),
        };
        if boundary {
            let end = idx + ch.len_utf8();
            push_fragment(&mut sentences, &content[start..end]);
            start = end;
        }
    }
    push_fragment(&mut sentences, &content[start..]);

    sentences
}

fn push_fragment(sentences: &mut Vec<String>, fragment: &str) {
    let trimmed = fragment.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }
}

fn reading_time_seconds(word_count: usize) -> u64 {
    if word_count == 0 {
        return 0;
    }
    (word_count as f64 / READING_WORDS_PER_SECOND).ceil() as u64
}

pub fn is_emoji(ch: char) -> bool {
    matches!(
        ch as u32,
        0x1F000..=0x1FAFF | 0x2600..=0x27BF | 0x2300..=0x23FF | 0x2B00..=0x2BFF
    )
}
