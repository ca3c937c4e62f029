//! Generate config command implementation

use crate::error::CliError;
use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use wikicorpus_core::config::defaults;

/// Arguments for the generate-config command
#[derive(Debug, Args)]
pub struct GenerateConfigArgs {
    /// Output file path
    #[arg(short, long, value_name = "FILE", default_value = "wikicorpus.toml")]
    pub output: PathBuf,

    /// Language code to put in the template
    #[arg(short = 'l', long, value_name = "CODE")]
    pub lcode: Option<String>,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

impl GenerateConfigArgs {
    /// Execute the generate-config command
    pub fn execute(&self) -> Result<()> {
        if self.output.exists() && !self.force {
            return Err(CliError::FileExists(self.output.display().to_string()).into());
        }

        std::fs::write(&self.output, self.generate_template())
            .with_context(|| format!("Failed to write to {}", self.output.display()))?;

        println!("✓ Configuration template written to {}", self.output.display());
        println!();
        println!("Use it with:");
        println!("   wikicorpus build --config {}", self.output.display());

        Ok(())
    }

    /// Generate template configuration content
    fn generate_template(&self) -> String {
        let language = match &self.lcode {
            Some(code) => format!("language = \"{code}\""),
            None => "# language = \"en\"".to_string(),
        };

        format!(
            r#"# wikicorpus configuration
# Command-line flags override these values.

[corpus]
# Wiki language code, used when --lcode is not given
{language}

# Stop once the corpus file grows past this many bytes
max_corpus_size = {max_size}

# Only sentences with more tokens than this are written
min_tokens = {min_tokens}

# Pages between size checks and progress updates
check_interval = {check_interval}

# Split words on Unicode boundaries for languages that need an external engine
unicode_words = false

[input]
# Directory holding the dump and the corpus
data_dir = "data"

# Dump file name; {{lcode}} is replaced by the language code
dump_file = "{{lcode}}wiki-20170820-pages-articles-multistream.xml"

# Namespace of the export schema
namespace = "{namespace}"

# Extra language table layered over the built-in one
# language_config = "languages.toml"

[output]
# Corpus file name inside data_dir
file = "{{lcode}}.txt"

# Print the run summary as JSON
json = false
"#,
            max_size = defaults::MAX_CORPUS_SIZE,
            min_tokens = defaults::MIN_TOKENS,
            check_interval = defaults::CHECK_INTERVAL,
            namespace = defaults::EXPORT_NAMESPACE,
        )
    }
}
