//! Configuration module
//!
//! Every key is optional in the file; anything left out takes its default.
//! Command-line flags win over file values.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use wikicorpus_core::config::defaults;

/// Placeholder replaced by the language code in file name templates
pub const LCODE_PLACEHOLDER: &str = "{lcode}";

/// CLI configuration structure
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct CliConfig {
    /// Extraction settings
    #[serde(default)]
    pub corpus: CorpusConfig,

    /// Where the dump is read from
    #[serde(default)]
    pub input: InputConfig,

    /// Where the corpus is written
    #[serde(default)]
    pub output: OutputConfig,
}

/// Extraction-related configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CorpusConfig {
    /// Language code used when `--lcode` is not given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// Size cap in bytes
    pub max_corpus_size: u64,

    /// Token count a sentence must exceed
    pub min_tokens: usize,

    /// Blocks between size checks
    pub check_interval: u64,

    /// Use Unicode word boundaries for languages that need an external engine
    pub unicode_words: bool,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            language: None,
            max_corpus_size: defaults::MAX_CORPUS_SIZE,
            min_tokens: defaults::MIN_TOKENS,
            check_interval: defaults::CHECK_INTERVAL,
            unicode_words: false,
        }
    }
}

/// Input-related configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct InputConfig {
    /// Directory holding dumps and corpora
    pub data_dir: PathBuf,

    /// Dump file name inside `data_dir`
    pub dump_file: String,

    /// Export schema namespace URI
    pub namespace: String,

    /// Extra language table layered over the built-in one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_config: Option<PathBuf>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            dump_file: "{lcode}wiki-20170820-pages-articles-multistream.xml".to_string(),
            namespace: defaults::EXPORT_NAMESPACE.to_string(),
            language_config: None,
        }
    }
}

/// Output-related configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Corpus file name inside `data_dir`
    pub file: String,

    /// Print the run summary as JSON
    pub json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file: "{lcode}.txt".to_string(),
            json: false,
        }
    }
}

impl CliConfig {
    /// Load a configuration file
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Default dump path for a language
    pub fn dump_path(&self, lcode: &str) -> PathBuf {
        self.input
            .data_dir
            .join(self.input.dump_file.replace(LCODE_PLACEHOLDER, lcode))
    }

    /// Default corpus path for a language
    pub fn corpus_path(&self, lcode: &str) -> PathBuf {
        self.input
            .data_dir
            .join(self.output.file.replace(LCODE_PLACEHOLDER, lcode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config: CliConfig = toml::from_str("").unwrap();
        assert_eq!(config, CliConfig::default());
        assert_eq!(config.corpus.max_corpus_size, 100_000_000);
        assert_eq!(config.corpus.min_tokens, 10);
    }

    #[test]
    fn test_partial_sections() {
        let config: CliConfig = toml::from_str(
            r#"
[corpus]
language = "fi"
max_corpus_size = 5000

[input]
data_dir = "/dumps"
"#,
        )
        .unwrap();

        assert_eq!(config.corpus.language.as_deref(), Some("fi"));
        assert_eq!(config.corpus.max_corpus_size, 5000);
        assert_eq!(config.corpus.check_interval, 1000);
        assert_eq!(
            config.dump_path("fi"),
            PathBuf::from("/dumps/fiwiki-20170820-pages-articles-multistream.xml")
        );
        assert_eq!(config.corpus_path("fi"), PathBuf::from("/dumps/fi.txt"));
    }

    #[test]
    fn test_unknown_key_types_are_rejected() {
        let result: Result<CliConfig, _> = toml::from_str("[corpus]\nmin_tokens = \"ten\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_serialized_defaults_parse_back() {
        let text = toml::to_string(&CliConfig::default()).unwrap();
        let parsed: CliConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, CliConfig::default());
    }
}
