//! Block-by-block corpus extraction
//!
//! Every block goes through clean, segment, tokenize and append. A block
//! level failure abandons the rest of that block only; lines it already
//! produced stay in the corpus. The run ends when the source is exhausted or
//! the corpus has grown past the size cap.

use crate::cleaner::TextCleaner;
use crate::config::RunConfig;
use crate::error::{CorpusError, Result};
use crate::segmenter::SentenceSegmenter;
use crate::source::RawBlock;
use crate::tokenizer::WordTokenizer;
use crate::writer::CorpusWriter;
use serde::Serialize;
use std::io::Write;

/// Why a run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The corpus grew past `max_corpus_size`
    SizeCap,
    /// The source had no more blocks
    Exhausted,
}

/// Totals for one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub blocks_attempted: u64,
    pub blocks_skipped: u64,
    pub sentences_written: u64,
    pub bytes_written: u64,
    pub stop_reason: StopReason,
}

/// Callbacks for progress reporting
pub trait ProgressObserver {
    /// Called every `check_interval` attempted blocks
    fn on_checkpoint(&mut self, _blocks_attempted: u64, _bytes_written: u64) {}

    /// Called once when the run stops
    fn on_finish(&mut self, _summary: &RunSummary) {}
}

/// Observer that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {}

enum BlockOutcome {
    Done,
    CapReached,
}

/// Drives the pipeline over a stream of blocks
#[derive(Debug)]
pub struct StreamExtractor {
    config: RunConfig,
    cleaner: TextCleaner,
    segmenter: SentenceSegmenter,
    tokenizer: WordTokenizer,
}

impl StreamExtractor {
    pub fn new(config: RunConfig, tokenizer: WordTokenizer) -> Result<Self> {
        let cleaner = TextCleaner::new(config.language())?;
        let segmenter = SentenceSegmenter::new(config.language().boundary())?;

        Ok(Self {
            config,
            cleaner,
            segmenter,
            tokenizer,
        })
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Run the pipeline until the blocks run out or the size cap is hit.
    ///
    /// Block-level errors, whether yielded by the source or raised while
    /// processing, skip the block. Any other error aborts the run.
    pub fn run<I, W>(
        &self,
        blocks: I,
        writer: &mut CorpusWriter<W>,
        observer: &mut dyn ProgressObserver,
    ) -> Result<RunSummary>
    where
        I: IntoIterator<Item = Result<RawBlock>>,
        W: Write,
    {
        let mut attempted = 0u64;
        let mut skipped = 0u64;
        let mut stop_reason = StopReason::Exhausted;
        let lines_before = writer.lines_written();

        log::info!(
            "extracting {} corpus (cap {} bytes)",
            self.config.language(),
            self.config.max_corpus_size()
        );

        for item in blocks {
            attempted += 1;

            // The block is moved in and dropped at the end of the attempt
            let outcome = item.and_then(|block| self.process_block(block, writer));

            match outcome {
                Ok(BlockOutcome::Done) => {}
                Ok(BlockOutcome::CapReached) => {
                    stop_reason = StopReason::SizeCap;
                    break;
                }
                Err(e) if e.is_block_level() => {
                    skipped += 1;
                    log::debug!("skipping block {attempted}: {e}");
                }
                Err(e) => return Err(e),
            }

            if attempted % self.config.check_interval() == 0 {
                let size = writer.current_size_bytes();
                log::trace!("checkpoint: {attempted} blocks, {size} bytes");
                observer.on_checkpoint(attempted, size);
                if self.cap_exceeded(writer) {
                    stop_reason = StopReason::SizeCap;
                    break;
                }
            }
        }

        let summary = RunSummary {
            blocks_attempted: attempted,
            blocks_skipped: skipped,
            sentences_written: writer.lines_written() - lines_before,
            bytes_written: writer.current_size_bytes(),
            stop_reason,
        };

        log::info!(
            "stopped ({:?}): {} blocks, {} skipped, {} sentences, {} bytes",
            summary.stop_reason,
            summary.blocks_attempted,
            summary.blocks_skipped,
            summary.sentences_written,
            summary.bytes_written
        );
        observer.on_finish(&summary);

        Ok(summary)
    }

    /// Clean, segment, tokenize and append the qualifying sentences of one block
    fn process_block<W: Write>(
        &self,
        block: RawBlock,
        writer: &mut CorpusWriter<W>,
    ) -> Result<BlockOutcome> {
        let cleaned = self.cleaner.clean(block.text());

        for sentence in self.segmenter.segment(&cleaned) {
            if sentence.trim().is_empty() {
                continue;
            }

            let tokens = self.tokenizer.tokenize(&sentence).map_err(CorpusError::from)?;
            if tokens.len() > self.config.min_tokens() {
                writer.append(&tokens)?;
                if self.cap_exceeded(writer) {
                    return Ok(BlockOutcome::CapReached);
                }
            }
        }

        Ok(BlockOutcome::Done)
    }

    fn cap_exceeded<W: Write>(&self, writer: &CorpusWriter<W>) -> bool {
        writer.current_size_bytes() > self.config.max_corpus_size()
    }
}
