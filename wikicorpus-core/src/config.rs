//! Run configuration

use crate::error::{CorpusError, Result};
use crate::language::{LanguageProfile, LanguageTable};

/// Default configuration constants
pub mod defaults {
    /// Stop once the corpus grows past this many bytes (100MB)
    pub const MAX_CORPUS_SIZE: u64 = 100_000_000;

    /// A sentence is emitted only with more tokens than this
    pub const MIN_TOKENS: usize = 10;

    /// Blocks between size checkpoints
    pub const CHECK_INTERVAL: u64 = 1000;

    /// Namespace of the MediaWiki export schema
    pub const EXPORT_NAMESPACE: &str = "http://www.mediawiki.org/xml/export-0.10/";
}

/// Immutable configuration for one extraction run
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub(crate) language: LanguageProfile,
    pub(crate) max_corpus_size: u64,
    pub(crate) min_tokens: usize,
    pub(crate) check_interval: u64,
    pub(crate) namespace: String,
}

impl RunConfig {
    /// Create a configuration builder
    pub fn builder() -> RunConfigBuilder {
        RunConfigBuilder::default()
    }

    /// Default configuration for a language code
    pub fn for_language(code: &str) -> Result<Self> {
        Self::builder().language(code).build()
    }

    pub fn language(&self) -> &LanguageProfile {
        &self.language
    }

    pub fn max_corpus_size(&self) -> u64 {
        self.max_corpus_size
    }

    pub fn min_tokens(&self) -> usize {
        self.min_tokens
    }

    pub fn check_interval(&self) -> u64 {
        self.check_interval
    }

    /// XML namespace URI of the `text` elements to extract
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn validate(&self) -> Result<()> {
        if self.max_corpus_size == 0 {
            return Err(CorpusError::Configuration(
                "max_corpus_size must be greater than 0".into(),
            ));
        }

        if self.check_interval == 0 {
            return Err(CorpusError::Configuration(
                "check_interval must be greater than 0".into(),
            ));
        }

        if self.namespace.trim().is_empty() {
            return Err(CorpusError::Configuration(
                "namespace must not be empty".into(),
            ));
        }

        Ok(())
    }
}

/// Fluent builder for [`RunConfig`]
#[derive(Debug, Default)]
pub struct RunConfigBuilder {
    language: Option<String>,
    table: Option<LanguageTable>,
    max_corpus_size: Option<u64>,
    min_tokens: Option<usize>,
    check_interval: Option<u64>,
    namespace: Option<String>,
}

impl RunConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the language by code
    pub fn language(mut self, code: impl Into<String>) -> Self {
        self.language = Some(code.into());
        self
    }

    /// Resolve the language against this table instead of the embedded one
    pub fn language_table(mut self, table: LanguageTable) -> Self {
        self.table = Some(table);
        self
    }

    /// Set the size cap in bytes
    pub fn max_corpus_size(mut self, bytes: u64) -> Self {
        self.max_corpus_size = Some(bytes);
        self
    }

    /// Set the token count a sentence must exceed
    pub fn min_tokens(mut self, count: usize) -> Self {
        self.min_tokens = Some(count);
        self
    }

    /// Set the number of blocks between size checkpoints
    pub fn check_interval(mut self, blocks: u64) -> Self {
        self.check_interval = Some(blocks);
        self
    }

    /// Set the export namespace URI
    pub fn namespace(mut self, uri: impl Into<String>) -> Self {
        self.namespace = Some(uri.into());
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<RunConfig> {
        let code = self.language.ok_or_else(|| {
            CorpusError::Configuration("a language code is required".into())
        })?;

        let language = match &self.table {
            Some(table) => table.profile(&code)?,
            None => LanguageTable::embedded()?.profile(&code)?,
        };

        let config = RunConfig {
            language,
            max_corpus_size: self.max_corpus_size.unwrap_or(defaults::MAX_CORPUS_SIZE),
            min_tokens: self.min_tokens.unwrap_or(defaults::MIN_TOKENS),
            check_interval: self.check_interval.unwrap_or(defaults::CHECK_INTERVAL),
            namespace: self
                .namespace
                .unwrap_or_else(|| defaults::EXPORT_NAMESPACE.to_string()),
        };

        config.validate()?;
        Ok(config)
    }
}
