//! Wiki markup stripping and character normalization
//!
//! The cleaner is a fixed sequence of regex rewrites. The order matters:
//! references go before generic tags, double braces before single ones,
//! link targets before media links, and longer quote runs before shorter
//! ones. After markup removal every character outside the language's
//! allow-list becomes a space, the text is lowercased unless the language
//! defers casing, and space runs are squeezed.

use crate::error::Result;
use crate::language::{CasingPolicy, LanguageProfile};
use regex::Regex;
use std::borrow::Cow;

/// Markup removal passes, applied in order
const MARKUP_PATTERNS: &[&str] = &[
    // <ref>...</ref>, with or without attributes, never self-closing
    r"(?s)<ref(?:\s[^>]*[^/>])?>.+?</ref>",
    // any other tag
    r"<[^>]+>",
    // named entities
    r"&[a-z]+;",
    // {{templates}}
    r"(?s)\{\{.+?\}\}",
    // {tables} and leftovers
    r"(?s)\{.+?\}",
    // link targets: [[target|label]] keeps label]]
    r"\[\[[^\]]+\|",
    // namespaced links: [[File:...]], [[Category:...]]
    r"(?s)\[\[[^\]]+:.+?\]\]",
    // bold italic, bold, italic
    r"'{5}",
    r"'{3}",
    r"'{2}",
];

/// Characters kept for every language besides its script letters
const COMMON_ALLOWED: &str = r" \r\n\-'‘’.?!";

const COMBINING_DOT_ABOVE: char = '\u{307}';

/// Strips markup from a raw block and normalizes it for one language
#[derive(Debug, Clone)]
pub struct TextCleaner {
    markup: Vec<Regex>,
    disallowed: Regex,
    squeeze: Regex,
    casing: CasingPolicy,
    keep_combining_dot: bool,
}

impl TextCleaner {
    /// Build a cleaner for the given language
    pub fn new(profile: &LanguageProfile) -> Result<Self> {
        let markup = MARKUP_PATTERNS
            .iter()
            .map(|pattern| Regex::new(pattern))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            markup,
            disallowed: Regex::new(&disallowed_class(profile))?,
            squeeze: Regex::new(r" {2,}")?,
            casing: profile.casing(),
            keep_combining_dot: profile.extra_chars().contains(&COMBINING_DOT_ABOVE),
        })
    }

    /// Clean one block. Never fails: irregular markup just leaves less text.
    pub fn clean(&self, raw: &str) -> String {
        let mut text = raw.to_string();

        for pattern in &self.markup {
            text = replace(text, pattern, "");
        }

        text = replace(text, &self.disallowed, " ");

        if self.casing == CasingPolicy::Lowercase {
            text = text.to_lowercase();
            // İ lowercases to i + U+0307, which no script allow-list covers
            if !self.keep_combining_dot {
                text.retain(|c| c != COMBINING_DOT_ABOVE);
            }
        }

        replace(text, &self.squeeze, " ")
    }

    pub fn casing(&self) -> CasingPolicy {
        self.casing
    }
}

/// Negated character class matching everything the language does not keep
fn disallowed_class(profile: &LanguageProfile) -> String {
    let mut class = String::from("[^");
    class.push_str(COMMON_ALLOWED);
    for script in profile.scripts() {
        class.push_str(&format!(r"\p{{{script}}}"));
    }
    for &ch in profile.extra_chars() {
        class.push_str(&regex::escape(ch.encode_utf8(&mut [0; 4])));
    }
    class.push(']');
    class
}

fn replace(text: String, pattern: &Regex, replacement: &str) -> String {
    let replaced = match pattern.replace_all(&text, replacement) {
        Cow::Owned(s) => Some(s),
        Cow::Borrowed(_) => None,
    };
    replaced.unwrap_or(text)
}
