use tracing::{debug, trace};

use crate::config::ThreadConfig;
use crate::features::split_sentences;
use crate::thread::selector::{stable_hash64, ContentHashSelector, CtaSelector};
use crate::thread::{has_cta_phrasing, starts_with_hook_starter, ThreadPart};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComposeOptions {
    pub max_parts: usize,
    pub add_hook: bool,
    pub add_cta: bool,
}

/// Splits `content` into at most `max_parts` thread parts using the default
/// thread table and a content-hash CTA selector.
///
/// # Panics
///
/// Panics if `max_parts` is zero.
pub fn compose(content: &str, max_parts: usize, add_hook: bool, add_cta: bool) -> Vec<ThreadPart> {
    let options = ComposeOptions {
        max_parts,
        add_hook,
        add_cta,
    };
    compose_with(content, &options, &ContentHashSelector, &ThreadConfig::default())
}

/// # Panics
///
/// Panics if `options.max_parts` is zero.
pub fn compose_with(
    content: &str,
    options: &ComposeOptions,
    selector: &dyn CtaSelector,
    config: &ThreadConfig,
) -> Vec<ThreadPart> {
    assert!(
        options.max_parts >= 1,
        "compose requires max_parts >= 1, got {}",
        options.max_parts
    );

    let budget = PartBudget::new(config, options);
    let wrap_width = budget.narrowest(options.max_parts);

    let sentences: Vec<String> = split_sentences(content)
        .into_iter()
        .flat_map(|sentence| wrap_sentence(&sentence, wrap_width))
        .collect();

    let packed = pack(sentences, options.max_parts, &budget);
    if packed.is_empty() {
        return vec![ThreadPart::new(part_id(0, ""), "")];
    }

    let mut parts: Vec<ThreadPart> = packed
        .into_iter()
        .enumerate()
        .map(|(index, text)| ThreadPart::new(part_id(index, &text), text))
        .collect();

    if options.add_hook {
        apply_hook(&mut parts[0], config);
    }
    if options.add_cta && parts.len() > 1 {
        let last = parts.len() - 1;
        apply_cta(&mut parts[last], content, selector, config);
    }

    debug!(
        parts = parts.len(),
        max_parts = options.max_parts,
        "composed thread"
    );
    parts
}

struct PartBudget {
    max_part_length: usize,
    hook_reserve: usize,
}

impl PartBudget {
    fn new(config: &ThreadConfig, options: &ComposeOptions) -> Self {
        let hook_reserve = if options.add_hook {
            config.hook_marker.chars().count()
        } else {
            0
        };
        Self {
            max_part_length: config.max_part_length,
            hook_reserve,
        }
    }

    /// Room for text in the part at `index`, leaving space for its `"{n}/"`
    /// marker, a separating space, and the hook marker on the opener.
    fn available(&self, index: usize) -> usize {
        let numbering = format!("{}/", index + 1).len();
        let mut available = self.max_part_length.saturating_sub(numbering + 1);
        if index == 0 {
            available = available.saturating_sub(self.hook_reserve);
        }
        available
    }

    fn narrowest(&self, max_parts: usize) -> usize {
        self.available(0)
            .min(self.available(max_parts.saturating_sub(1)))
            .max(1)
    }
}

fn pack(sentences: Vec<String>, max_parts: usize, budget: &PartBudget) -> Vec<String> {
    let mut packed: Vec<String> = Vec::new();
    let mut current = String::new();

    for sentence in sentences {
        let candidate = if current.is_empty() {
            sentence.clone()
        } else {
            format!("{} {}", current, sentence)
        };

        if char_len(&candidate) <= budget.available(packed.len()) {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            trace!(part = packed.len() + 1, chars = char_len(&current), "closing part");
            packed.push(std::mem::take(&mut current));
            if packed.len() >= max_parts {
                break;
            }
        }
        current = sentence;
    }

    if !current.is_empty() && packed.len() < max_parts {
        packed.push(current);
    }

    packed
}

/// Breaks an over-long sentence at word boundaries, and inside words that
/// are themselves wider than `width`.
fn wrap_sentence(sentence: &str, width: usize) -> Vec<String> {
    if char_len(sentence) <= width {
        return vec![sentence.to_string()];
    }

    let mut lines = Vec::new();
    let mut line = String::new();
    for word in sentence.split_whitespace() {
        for piece in chunk_word(word, width) {
            let needed = if line.is_empty() {
                char_len(&piece)
            } else {
                char_len(&line) + 1 + char_len(&piece)
            };
            if needed > width && !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(&piece);
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

fn chunk_word(word: &str, width: usize) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    chars
        .chunks(width.max(1))
        .map(|chunk| chunk.iter().collect())
        .collect()
}

fn apply_hook(part: &mut ThreadPart, config: &ThreadConfig) {
    if part.content.contains('?') || starts_with_hook_starter(&part.content, &config.hook_starters) {
        return;
    }
    part.content = format!("{}{}", config.hook_marker, part.content);
}

fn apply_cta(part: &mut ThreadPart, source: &str, selector: &dyn CtaSelector, config: &ThreadConfig) {
    if config.cta_phrases.is_empty() || has_cta_phrasing(&part.content) {
        return;
    }
    let index = selector.select(source, config.cta_phrases.len());
    let Some(phrase) = config.cta_phrases.get(index) else {
        return;
    };
    let extended = format!("{}{}", part.content, phrase);
    let limit = config
        .max_part_length
        .saturating_sub(config.cta_safety_margin);
    if char_len(&extended) <= limit {
        part.content = extended;
    } else {
        trace!(chars = char_len(&extended), limit, "cta does not fit");
    }
}

fn part_id(index: usize, text: &str) -> String {
    format!("part_{:x}", stable_hash64(&format!("{}:{}", index, text)))
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}
