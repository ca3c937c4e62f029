//! Error types for corpus extraction
//!
//! Errors fall into two classes. Block-level errors ([`BlockError`]) are
//! scoped to a single document unit: the extractor skips the block and keeps
//! going. Everything else is fatal for the run and is returned to the caller.

use thiserror::Error;

/// Failure reported by a word segmentation capability
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SegmenterError {
    /// The backing engine could not be reached or loaded
    #[error("segmenter unavailable: {0}")]
    Unavailable(String),

    /// The engine rejected or failed on this sentence
    #[error("segmentation failed: {0}")]
    Failed(String),
}

/// Recoverable failure confined to one block
#[derive(Debug, Error)]
pub enum BlockError {
    /// Markup or encoding irregularity in the block payload
    #[error("malformed markup: {0}")]
    Markup(String),

    /// Word tokenization failed for a sentence of the block
    #[error("tokenizer error: {0}")]
    Tokenizer(#[from] SegmenterError),
}

/// Error type for corpus operations
#[derive(Debug, Error)]
pub enum CorpusError {
    /// Invalid run configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Malformed language code
    #[error("Invalid language: {0}")]
    InvalidLanguage(String),

    /// Language needs a segmentation capability that was not provided
    #[error("language '{code}' not supported without an external segmenter")]
    UnsupportedLanguage {
        /// The language code that is not supported
        code: String,
    },

    /// Allow-list pattern failed to compile
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    /// Language table could not be parsed or is inconsistent
    #[error("Language table error: {0}")]
    LanguageTable(String),

    /// I/O error on the dump or the corpus file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The XML stream is not well-formed
    #[error("XML error: {0}")]
    Xml(String),

    /// Block-scoped failure
    #[error("Block error: {0}")]
    Block(#[from] BlockError),
}

impl CorpusError {
    /// Whether the error only invalidates the current block
    pub fn is_block_level(&self) -> bool {
        matches!(self, CorpusError::Block(_))
    }
}

impl From<SegmenterError> for CorpusError {
    fn from(err: SegmenterError) -> Self {
        CorpusError::Block(BlockError::Tokenizer(err))
    }
}

impl From<quick_xml::Error> for CorpusError {
    fn from(err: quick_xml::Error) -> Self {
        CorpusError::Xml(err.to_string())
    }
}

/// Result type for corpus operations
pub type Result<T> = std::result::Result<T, CorpusError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_level_classification() {
        let markup = CorpusError::from(BlockError::Markup("bad entity".into()));
        assert!(markup.is_block_level());

        let tokenizer = CorpusError::from(SegmenterError::Failed("boom".into()));
        assert!(tokenizer.is_block_level());

        let io = CorpusError::from(std::io::Error::other("disk full"));
        assert!(!io.is_block_level());

        assert!(!CorpusError::Xml("unexpected eof".into()).is_block_level());
    }

    #[test]
    fn test_error_display() {
        let err = CorpusError::UnsupportedLanguage { code: "ja".into() };
        assert_eq!(
            err.to_string(),
            "language 'ja' not supported without an external segmenter"
        );

        let err = CorpusError::from(SegmenterError::Unavailable("mecab".into()));
        assert_eq!(
            err.to_string(),
            "Block error: tokenizer error: segmenter unavailable: mecab"
        );
    }
}
