//! Sentence splitting by boundary policy

use crate::error::Result;
use crate::language::BoundaryPolicy;
use regex::Regex;
use std::borrow::Cow;

/// Splits cleaned text into sentences
#[derive(Debug, Clone)]
pub struct SentenceSegmenter {
    policy: BoundaryPolicy,
    boundary: Regex,
}

impl SentenceSegmenter {
    pub fn new(policy: BoundaryPolicy) -> Result<Self> {
        Ok(Self {
            policy,
            boundary: Regex::new(boundary_pattern(policy))?,
        })
    }

    pub fn policy(&self) -> BoundaryPolicy {
        self.policy
    }

    /// Split `text` into sentences in source order.
    ///
    /// Boundary markers are consumed. Entries may be empty; callers filter
    /// them. Under [`BoundaryPolicy::CaseNormalizing`] sentences of one
    /// character or less are dropped and the first character of the rest is
    /// lowercased.
    pub fn segment<'a>(&self, text: &'a str) -> Vec<Cow<'a, str>> {
        let pieces = self.boundary.split(text);

        match self.policy {
            BoundaryPolicy::CaseNormalizing => pieces
                .filter(|s| s.chars().nth(1).is_some())
                .map(lowercase_first)
                .collect(),
            _ => pieces.map(Cow::Borrowed).collect(),
        }
    }
}

fn boundary_pattern(policy: BoundaryPolicy) -> &'static str {
    match policy {
        BoundaryPolicy::Cjk => r"[。！？]?\n+|[。！？]",
        BoundaryPolicy::NewlineOnly => r"\n+",
        BoundaryPolicy::Indic => r"[.।?!]?\n+|[.।?!] ",
        BoundaryPolicy::Default | BoundaryPolicy::CaseNormalizing => r"[.?!]?\n+|[.?!] ",
    }
}

fn lowercase_first(sentence: &str) -> Cow<'_, str> {
    let mut chars = sentence.chars();
    match chars.next() {
        Some(first) if first.is_uppercase() => {
            let mut lowered: String = first.to_lowercase().collect();
            lowered.push_str(chars.as_str());
            Cow::Owned(lowered)
        }
        _ => Cow::Borrowed(sentence),
    }
}
