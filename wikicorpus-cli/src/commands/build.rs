//! Build command implementation

use crate::commands::{init_logging, list::load_table};
use crate::config::CliConfig;
use crate::error::CliError;
use crate::progress::ProgressReporter;
use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use wikicorpus_core::{
    build_corpus, CorpusError, RunConfig, RunSummary, Segmenter, StopReason,
    UnicodeWordSegmenter, WordTokenizer,
};

/// Arguments for the build command
#[derive(Debug, Args)]
pub struct BuildArgs {
    /// Wiki language code (e.g. en, ko, ja)
    #[arg(short, long, value_name = "CODE")]
    pub lcode: Option<String>,

    /// Stop once the corpus grows past this many bytes
    #[arg(long, value_name = "BYTES")]
    pub max_corpus_size: Option<u64>,

    /// Only write sentences with more tokens than this
    #[arg(long, value_name = "N")]
    pub min_tokens: Option<usize>,

    /// Pages between size checks
    #[arg(long, value_name = "N")]
    pub check_interval: Option<u64>,

    /// Dump file (default: data/<lcode>wiki-20170820-pages-articles-multistream.xml)
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Corpus file (default: data/<lcode>.txt)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Namespace URI of the export schema
    #[arg(long, value_name = "URI")]
    pub namespace: Option<String>,

    /// Extra language table layered over the built-in one
    #[arg(long, value_name = "FILE")]
    pub language_config: Option<PathBuf>,

    /// Configuration file
    #[arg(short, long, value_name = "FILE", env = "WIKICORPUS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Split words on Unicode boundaries instead of requiring an external engine
    #[arg(long)]
    pub unicode_words: bool,

    /// Print the run summary as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Everything a run needs, after flags and config file are merged
#[derive(Debug)]
pub struct BuildPlan {
    pub run_config: RunConfig,
    pub input: PathBuf,
    pub output: PathBuf,
    pub unicode_words: bool,
    pub json: bool,
}

impl BuildArgs {
    /// Execute the build command
    pub fn execute(&self) -> Result<()> {
        init_logging(self.quiet, self.verbose);

        let file_config = match &self.config {
            Some(path) => CliConfig::from_path(path)?,
            None => CliConfig::default(),
        };
        let plan = self.resolve(&file_config)?;
        log::debug!("Build plan: {:?}", plan);

        if !plan.input.exists() {
            return Err(CliError::FileNotFound(plan.input.display().to_string()).into());
        }

        let tokenizer = tokenizer_for(&plan)?;
        let mut reporter =
            ProgressReporter::new(self.quiet || plan.json, plan.run_config.max_corpus_size());

        let summary = build_corpus(
            plan.run_config,
            &plan.input,
            &plan.output,
            tokenizer,
            &mut reporter,
        )
        .with_context(|| format!("Failed to build corpus from {}", plan.input.display()))?;

        if plan.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else if !self.quiet {
            report(&summary, &plan.output);
        }

        Ok(())
    }

    /// Merge flags over the config file
    pub fn resolve(&self, file: &CliConfig) -> Result<BuildPlan> {
        let lcode = self
            .lcode
            .clone()
            .or_else(|| file.corpus.language.clone())
            .ok_or_else(|| {
                CliError::ConfigError(
                    "no language code given (use --lcode or [corpus] language)".into(),
                )
            })?;

        let language_config = self
            .language_config
            .as_deref()
            .or(file.input.language_config.as_deref());

        let mut builder = RunConfig::builder()
            .language(lcode.as_str())
            .max_corpus_size(self.max_corpus_size.unwrap_or(file.corpus.max_corpus_size))
            .min_tokens(self.min_tokens.unwrap_or(file.corpus.min_tokens))
            .check_interval(self.check_interval.unwrap_or(file.corpus.check_interval))
            .namespace(
                self.namespace
                    .clone()
                    .unwrap_or_else(|| file.input.namespace.clone()),
            );
        if language_config.is_some() {
            builder = builder.language_table(load_table(language_config)?);
        }
        let run_config = builder.build()?;

        // File names use the normalized code
        let code = run_config.language().code();
        let input = self.input.clone().unwrap_or_else(|| file.dump_path(code));
        let output = self.output.clone().unwrap_or_else(|| file.corpus_path(code));

        Ok(BuildPlan {
            run_config,
            input,
            output,
            unicode_words: self.unicode_words || file.corpus.unicode_words,
            json: self.json || file.output.json,
        })
    }
}

fn tokenizer_for(plan: &BuildPlan) -> Result<WordTokenizer> {
    let external: Option<Box<dyn Segmenter>> = if plan.unicode_words {
        Some(Box::new(UnicodeWordSegmenter))
    } else {
        None
    };

    WordTokenizer::for_profile(plan.run_config.language(), external).map_err(|e| match e {
        CorpusError::UnsupportedLanguage { .. } => anyhow::Error::new(e)
            .context("pass --unicode-words to split words on Unicode boundaries"),
        other => other.into(),
    })
}

fn report(summary: &RunSummary, output: &std::path::Path) {
    let reason = match summary.stop_reason {
        StopReason::SizeCap => "size cap reached",
        StopReason::Exhausted => "dump exhausted",
    };
    eprintln!(
        "{} sentences ({} bytes) written to {} from {} pages ({} skipped); {}",
        summary.sentences_written,
        summary.bytes_written,
        output.display(),
        summary.blocks_attempted,
        summary.blocks_skipped,
        reason
    );
}
