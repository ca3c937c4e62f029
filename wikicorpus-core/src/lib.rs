//! Sentence-per-line corpus extraction from MediaWiki XML dumps
//!
//! The dump is streamed one `<text>` element at a time, so dumps far larger
//! than memory are fine. Each block is cleaned of wiki markup, split into
//! sentences and words according to the run language, and every sentence
//! with more than ten words is appended to the corpus file. The run stops
//! when the dump is exhausted or the corpus reaches the configured size.
//!
//! # Example
//!
//! ```rust
//! use wikicorpus_core::{
//!     CorpusWriter, NoProgress, RawBlock, RunConfig, StreamExtractor, WordTokenizer,
//! };
//!
//! let config = RunConfig::for_language("en").unwrap();
//! let tokenizer = WordTokenizer::for_profile(config.language(), None).unwrap();
//! let extractor = StreamExtractor::new(config, tokenizer).unwrap();
//!
//! let text = "Short one. The '''quick''' brown [[Fox|fox]] jumps over the lazy dog near the old river bank.";
//! let mut writer = CorpusWriter::new(Vec::new());
//! extractor
//!     .run(vec![Ok(RawBlock::new(1, text))], &mut writer, &mut NoProgress)
//!     .unwrap();
//!
//! let corpus = String::from_utf8(writer.into_inner().unwrap()).unwrap();
//! assert_eq!(
//!     corpus,
//!     "the quick brown fox jumps over the lazy dog near the old river bank.\n"
//! );
//! ```

pub mod cleaner;
pub mod config;
pub mod error;
pub mod extractor;
pub mod language;
pub mod segmenter;
pub mod source;
pub mod tokenizer;
pub mod writer;

pub use cleaner::TextCleaner;
pub use config::{RunConfig, RunConfigBuilder};
pub use error::{BlockError, CorpusError, Result, SegmenterError};
pub use extractor::{NoProgress, ProgressObserver, RunSummary, StopReason, StreamExtractor};
pub use language::{
    BoundaryPolicy, CasingPolicy, LanguageProfile, LanguageTable, TokenizerKind,
};
pub use segmenter::SentenceSegmenter;
pub use source::{DumpSource, RawBlock};
pub use tokenizer::{Segmenter, UnicodeWordSegmenter, WordTokenizer};
pub use writer::CorpusWriter;

use std::path::Path;

/// Extract a corpus from the dump at `input` into a fresh file at `output`
pub fn build_corpus(
    config: RunConfig,
    input: &Path,
    output: &Path,
    tokenizer: WordTokenizer,
    observer: &mut dyn ProgressObserver,
) -> Result<RunSummary> {
    let source = DumpSource::open(input)?.with_namespace(config.namespace());
    let mut writer = CorpusWriter::create(output)?;

    log::info!("reading {} into {}", input.display(), output.display());

    let extractor = StreamExtractor::new(config, tokenizer)?;
    let summary = extractor.run(source, &mut writer, observer)?;
    writer.into_inner()?;

    Ok(summary)
}
