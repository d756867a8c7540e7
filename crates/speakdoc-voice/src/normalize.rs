//! Text normalization before segmentation, and speech-only rewrites.
//!
//! Normalization is granularity dependent:
//!
//! - **Word** - every whitespace run (newlines included) becomes one space,
//!   and the period after a title abbreviation is dropped (`Mr. Smith` →
//!   `Mr Smith`) so it is neither displayed nor spoken as a sentence end.
//! - **Sentence** - horizontal whitespace and single line breaks become one
//!   space; a paragraph break (two or more newlines) is kept as a single
//!   `\n`. Abbreviation periods stay; the segmenter knows not to split there.

use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use speakdoc_core::{DEFAULT_ABBREVIATIONS, Granularity, ReaderSettings};

static ACRONYM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\p{Lu}{2,}").expect("acronym regex is valid"));

// ── Abbreviations ──────────────────────────────────────────────────

/// Words whose trailing period does not end a sentence.
///
/// Matching is case-sensitive and on whole words: `Dr.` and `(Dr.` match,
/// `MDr.` does not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbbreviationSet {
    words: HashSet<String>,
}

impl Default for AbbreviationSet {
    fn default() -> Self {
        Self::new(DEFAULT_ABBREVIATIONS.iter().copied())
    }
}

impl AbbreviationSet {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether `word` (without its period) is a protected abbreviation.
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    /// Whether the text immediately before a period ends with a protected
    /// abbreviation.
    pub fn ends_with_abbreviation(&self, before_period: &str) -> bool {
        let word_start = before_period
            .char_indices()
            .rev()
            .take_while(|(_, c)| c.is_alphabetic())
            .last()
            .map(|(i, _)| i);

        let Some(start) = word_start else {
            return false;
        };

        let preceded_by_word_char = before_period[..start]
            .chars()
            .next_back()
            .is_some_and(char::is_alphanumeric);

        !preceded_by_word_char && self.contains(&before_period[start..])
    }
}

// ── Normalizer ─────────────────────────────────────────────────────

/// Prepares extracted text for segmentation and units for speech.
#[derive(Debug, Clone)]
pub struct Normalizer {
    abbreviations: AbbreviationSet,
    expand_acronyms: bool,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(AbbreviationSet::default(), true)
    }
}

impl Normalizer {
    pub const fn new(abbreviations: AbbreviationSet, expand_acronyms: bool) -> Self {
        Self {
            abbreviations,
            expand_acronyms,
        }
    }

    pub fn from_settings(settings: &ReaderSettings) -> Self {
        Self::new(
            AbbreviationSet::new(settings.effective_abbreviations()),
            settings.effective_expand_acronyms(),
        )
    }

    pub const fn abbreviations(&self) -> &AbbreviationSet {
        &self.abbreviations
    }

    /// Normalize raw document text for the given granularity.
    pub fn normalize(&self, text: &str, granularity: Granularity) -> String {
        match granularity {
            Granularity::Word => {
                let collapsed = collapse_whitespace(text, false);
                collapsed
                    .split(' ')
                    .map(|token| self.strip_abbreviation_period(token))
                    .collect::<Vec<_>>()
                    .join(" ")
            }
            Granularity::Sentence => collapse_whitespace(text, true),
        }
    }

    /// Text to hand to the speech backend for a piece of unit content.
    ///
    /// Never applied to displayed content.
    pub fn speech_text<'a>(&self, content: &'a str) -> Cow<'a, str> {
        if self.expand_acronyms {
            expand_acronyms(content)
        } else {
            Cow::Borrowed(content)
        }
    }

    fn strip_abbreviation_period<'a>(&self, token: &'a str) -> &'a str {
        match token.strip_suffix('.') {
            Some(word) if self.abbreviations.ends_with_abbreviation(word) => word,
            _ => token,
        }
    }
}

/// Collapse whitespace runs to a single space and trim both ends.
///
/// With `keep_paragraphs`, a run containing two or more `\n` collapses to a
/// single `\n` instead.
pub fn collapse_whitespace(text: &str, keep_paragraphs: bool) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_whitespace = false;
    let mut newlines = 0usize;

    for ch in text.chars() {
        if ch.is_whitespace() {
            in_whitespace = true;
            if ch == '\n' {
                newlines += 1;
            }
            continue;
        }

        if in_whitespace && !out.is_empty() {
            out.push(if keep_paragraphs && newlines >= 2 { '\n' } else { ' ' });
        }
        in_whitespace = false;
        newlines = 0;
        out.push(ch);
    }

    out
}

/// Spell out every run of two or more uppercase letters (`NASA` → `N A S A`).
pub fn expand_acronyms(text: &str) -> Cow<'_, str> {
    ACRONYM_RE.replace_all(text, |caps: &regex::Captures<'_>| {
        let mut spelled = String::with_capacity(caps[0].len() * 2);
        for (i, letter) in caps[0].chars().enumerate() {
            if i > 0 {
                spelled.push(' ');
            }
            spelled.push(letter);
        }
        spelled
    })
}
