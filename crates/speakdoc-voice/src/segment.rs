//! Splits normalized text into ordered, addressable units.
//!
//! # Word mode
//!
//! Each token plus the single space that follows it is one unit, so joining
//! the unit contents reproduces the normalized text exactly.
//!
//! # Sentence mode
//!
//! A sentence ends after `.`, `!` or `?` (a run of them, optionally followed
//! by closing quotes or brackets) when the next character is whitespace or
//! the end of the text, unless the period belongs to a protected
//! abbreviation. A preserved paragraph break always ends a sentence. Each
//! sentence also carries its words as display spans.

use serde::Serialize;
use speakdoc_core::Granularity;

use crate::normalize::AbbreviationSet;

/// A unit produced by the [`Segmenter`], before it is bound to an anchor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    /// Position in the sequence (contiguous, zero-based).
    pub index: usize,

    /// Unit text.
    pub content: String,

    /// Clickable word spans inside the unit. Empty in word mode.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub words: Vec<String>,
}

/// Granularity-aware text splitter.
#[derive(Debug, Clone, Default)]
pub struct Segmenter {
    granularity: Granularity,
    abbreviations: AbbreviationSet,
}

impl Segmenter {
    pub const fn new(granularity: Granularity, abbreviations: AbbreviationSet) -> Self {
        Self {
            granularity,
            abbreviations,
        }
    }

    pub const fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Segment normalized text. Empty text yields no segments.
    pub fn segment(&self, text: &str) -> Vec<Segment> {
        let pieces = match self.granularity {
            Granularity::Word => split_words(text),
            Granularity::Sentence => self.split_sentences(text),
        };

        pieces
            .into_iter()
            .enumerate()
            .map(|(index, content)| {
                let words = match self.granularity {
                    Granularity::Word => Vec::new(),
                    Granularity::Sentence => content.split_whitespace().map(String::from).collect(),
                };
                Segment {
                    index,
                    content,
                    words,
                }
            })
            .collect()
    }

    fn split_sentences(&self, text: &str) -> Vec<String> {
        let chars: Vec<(usize, char)> = text.char_indices().collect();
        let mut sentences = Vec::new();
        let mut start = 0;
        let mut i = 0;

        while i < chars.len() {
            let (pos, ch) = chars[i];

            if ch == '\n' {
                push_sentence(&mut sentences, &text[start..pos]);
                start = pos + ch.len_utf8();
                i += 1;
                continue;
            }

            if !is_terminal(ch) {
                i += 1;
                continue;
            }

            let mut j = i + 1;
            while j < chars.len() && is_terminal(chars[j].1) {
                j += 1;
            }
            let single_period = ch == '.' && j == i + 1;
            while j < chars.len() && is_closing(chars[j].1) {
                j += 1;
            }

            let at_break = j == chars.len() || chars[j].1.is_whitespace();
            let abbreviation =
                single_period && self.abbreviations.ends_with_abbreviation(&text[start..pos]);

            if at_break && !abbreviation {
                let end = chars.get(j).map_or(text.len(), |&(p, _)| p);
                push_sentence(&mut sentences, &text[start..end]);
                start = end;
            }
            i = j;
        }

        push_sentence(&mut sentences, &text[start..]);
        sentences
    }
}

fn split_words(text: &str) -> Vec<String> {
    text.split_inclusive(' ')
        .filter(|piece| !piece.trim().is_empty())
        .map(String::from)
        .collect()
}

fn push_sentence(sentences: &mut Vec<String>, raw: &str) {
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }
}

const fn is_terminal(ch: char) -> bool {
    matches!(ch, '.' | '!' | '?')
}

const fn is_closing(ch: char) -> bool {
    matches!(ch, '"' | '\'' | ')' | ']' | '}' | '\u{201d}' | '\u{2019}' | '\u{bb}')
}
