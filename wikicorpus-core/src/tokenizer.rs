//! Word tokenization
//!
//! Most languages split on whitespace. Languages without whitespace-delimited
//! words need a morphological engine (MeCab, KKMA, jieba, ...), which this
//! crate does not link. Such an engine is injected as a [`Segmenter`].

use crate::error::{CorpusError, Result, SegmenterError};
use crate::language::{LanguageProfile, TokenizerKind};
use std::borrow::Cow;
use std::fmt;
use unicode_segmentation::UnicodeSegmentation;

/// External word segmentation capability
pub trait Segmenter {
    /// Engine name for logs
    fn name(&self) -> &str;

    /// Split one sentence into words
    fn segment(&self, sentence: &str) -> std::result::Result<Vec<String>, SegmenterError>;
}

/// Word tokenizer selected once per run
pub enum WordTokenizer {
    /// Split on runs of whitespace
    Whitespace,
    /// Delegate to an injected engine
    External(Box<dyn Segmenter>),
}

impl fmt::Debug for WordTokenizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WordTokenizer::Whitespace => write!(f, "WordTokenizer::Whitespace"),
            WordTokenizer::External(engine) => {
                write!(f, "WordTokenizer::External({})", engine.name())
            }
        }
    }
}

impl WordTokenizer {
    /// Pick the tokenizer for a language.
    ///
    /// A language that needs an external engine fails with
    /// [`CorpusError::UnsupportedLanguage`] when none is given. An engine
    /// given for a whitespace language is used as well.
    pub fn for_profile(
        profile: &LanguageProfile,
        external: Option<Box<dyn Segmenter>>,
    ) -> Result<Self> {
        match (profile.tokenizer(), external) {
            (_, Some(engine)) => Ok(WordTokenizer::External(engine)),
            (TokenizerKind::Whitespace, None) => Ok(WordTokenizer::Whitespace),
            (TokenizerKind::External, None) => Err(CorpusError::UnsupportedLanguage {
                code: profile.code().to_string(),
            }),
        }
    }

    /// Split a sentence into word tokens
    pub fn tokenize<'a>(
        &self,
        sentence: &'a str,
    ) -> std::result::Result<Vec<Cow<'a, str>>, SegmenterError> {
        match self {
            WordTokenizer::Whitespace => {
                Ok(sentence.split_whitespace().map(Cow::Borrowed).collect())
            }
            WordTokenizer::External(engine) => Ok(engine
                .segment(sentence)?
                .into_iter()
                .map(Cow::Owned)
                .collect()),
        }
    }
}

/// Word boundaries from Unicode text segmentation (UAX #29).
///
/// Not a morphological analyzer: ideographs come out one per token and
/// Thai is not split. Good enough when no real engine is available.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnicodeWordSegmenter;

impl Segmenter for UnicodeWordSegmenter {
    fn name(&self) -> &str {
        "unicode-words"
    }

    fn segment(&self, sentence: &str) -> std::result::Result<Vec<String>, SegmenterError> {
        Ok(sentence.unicode_words().map(str::to_string).collect())
    }
}
