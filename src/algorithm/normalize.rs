use regex::Regex;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization as _};

/// How aggressively text is folded before comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NormalizationMode {
    /// Keep diacritics. "Straße" and "Strasse", "für" and "fur" stay different.
    Strict,
    /// Fold diacritics to their base letters (ä → a). Lossier.
    Loose,
}

const BULLETS: &[char] = &['*', '•', '‣', '◦', '⁃', '∙', '-', '○', '●', '♦'];

const DASHES: &[char] = &['\u{2010}', '\u{2011}', '\u{2012}', '–', '—', '―', '\u{ad}'];

const INVISIBLE: &[char] = &['\u{200b}', '\u{200c}', '\u{200d}', '\u{2060}', '\u{feff}'];

// Quotation marks, parentheses and the separators that don't matter for matching.
// Periods stay, and so do apostrophes because they live inside words.
const STRIPPED_PUNCTUATION: &[char] = &[
    ',', ';', ':', '"', '“', '”', '„', '‟', '«', '»', '‹', '›', '‚', '‘', '(', ')',
];

// Matched against lowercased text, so only lowercase letters need to be listed.
const LIST_PREFIX: &str = r"^(?:\d+\.|\p{Ll}\))(?:\s+|$)";

/// Canonicalizes text for equality comparison. Pure and deterministic; every
/// stage of one comparison run must share the same `Normalizer`.
#[derive(Clone, Debug)]
pub struct Normalizer {
    mode: NormalizationMode,
    collapse_spaced_dashes: bool,
    list_prefix: Regex,
}

impl Normalizer {
    pub fn new(mode: NormalizationMode, collapse_spaced_dashes: bool) -> Normalizer {
        Normalizer {
            mode,
            collapse_spaced_dashes,
            list_prefix: Regex::new(LIST_PREFIX).expect("list prefix pattern is valid"),
        }
    }

    pub fn normalize(&self, text: &str) -> String {
        let text = strip_control(text);
        let text = text.to_lowercase();
        let text = unify_dashes(&text);
        let text = self.fold(&text);

        // Stripping punctuation can expose a new leading marker ("(1. foo" → "1. foo")
        // or bring a combining mark next to its base letter ("fu(\u{308})r"), so the
        // trailing stages run until nothing changes. Every pass only removes or
        // composes characters, so this terminates.
        let mut current = self.finish(&self.fold(&strip_punctuation(&self.strip_leading_markers(&text))));
        loop {
            let next = self.finish(&self.fold(self.strip_leading_markers(&current)));
            if next == current {
                return current;
            }
            current = next;
        }
    }

    fn fold(&self, text: &str) -> String {
        match self.mode {
            NormalizationMode::Strict => text.nfc().collect(),
            NormalizationMode::Loose => text.nfd().filter(|&c| !is_combining_mark(c)).collect(),
        }
    }

    fn strip_leading_markers<'a>(&self, mut text: &'a str) -> &'a str {
        loop {
            text = text.trim_start();
            if let Some(rest) = text.strip_prefix(BULLETS) {
                text = rest;
            } else if let Some(prefix) = self.list_prefix.find(text) {
                text = &text[prefix.end()..];
            } else {
                return text;
            }
        }
    }

    fn finish(&self, text: &str) -> String {
        let mut text = collapse_whitespace(text);
        if self.collapse_spaced_dashes {
            while text.contains(" - ") {
                text = text.replace(" - ", "-");
            }
        }
        text
    }
}

fn strip_control(text: &str) -> String {
    text.chars()
        .filter_map(|c| {
            if c.is_whitespace() {
                Some(' ')
            } else if c.is_control() || INVISIBLE.contains(&c) {
                None
            } else {
                Some(c)
            }
        })
        .collect()
}

fn unify_dashes(text: &str) -> String {
    text.chars().map(|c| if DASHES.contains(&c) { '-' } else { c }).collect()
}

fn strip_punctuation(text: &str) -> String {
    text.chars().filter(|c| !STRIPPED_PUNCTUATION.contains(c)).collect()
}

pub(super) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
