//! List command implementation

use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use wikicorpus_core::{BoundaryPolicy, LanguageProfile, LanguageTable, TokenizerKind};

/// Arguments for `list languages`
#[derive(Debug, Args)]
pub struct ListLanguagesArgs {
    /// Extra language table layered over the built-in one
    #[arg(long, value_name = "FILE")]
    pub language_config: Option<PathBuf>,
}

impl ListLanguagesArgs {
    /// Execute the command
    pub fn execute(&self) -> Result<()> {
        let table = load_table(self.language_config.as_deref())?;

        println!("Languages with their own extraction rules:");
        println!();
        for profile in table.profiles() {
            println!("{}", describe(&profile));
        }
        println!();
        println!("Any other well-formed code uses Latin script with default rules.");

        Ok(())
    }
}

/// Built-in table, with an optional user table layered on top
pub(crate) fn load_table(extra: Option<&Path>) -> Result<LanguageTable> {
    let table = LanguageTable::embedded()?.clone();
    match extra {
        Some(path) => {
            let overrides = LanguageTable::from_path(path)
                .with_context(|| format!("Failed to load language config {}", path.display()))?;
            Ok(table.merged(overrides))
        }
        None => Ok(table),
    }
}

fn describe(profile: &LanguageProfile) -> String {
    let boundary = match profile.boundary() {
        BoundaryPolicy::Cjk => "cjk",
        BoundaryPolicy::NewlineOnly => "newline-only",
        BoundaryPolicy::Indic => "indic",
        BoundaryPolicy::Default => "default",
        BoundaryPolicy::CaseNormalizing => "case-normalizing",
    };
    let tokenizer = match profile.tokenizer() {
        TokenizerKind::Whitespace => "whitespace",
        TokenizerKind::External => "external",
    };

    format!(
        "  {:<6} {:<20} {:<17} {}",
        profile.code(),
        profile.name(),
        boundary,
        tokenizer
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_describe_row() {
        let profile = LanguageProfile::for_code("th").unwrap();
        let row = describe(&profile);
        assert!(row.trim_start().starts_with("th"));
        assert!(row.contains("newline-only"));
        assert!(row.ends_with("external"));
    }

    #[test]
    fn test_load_table_merges_user_entries() {
        let mut file = NamedTempFile::new().unwrap();
        std::io::Write::write_all(
            &mut file,
            b"[[languages]]\ncode = \"xx\"\nname = \"Test\"\nboundary = \"newline_only\"\n",
        )
        .unwrap();

        let table = load_table(Some(file.path())).unwrap();
        assert_eq!(
            table.profile("xx").unwrap().boundary(),
            BoundaryPolicy::NewlineOnly
        );
        assert_eq!(table.len(), LanguageTable::embedded().unwrap().len() + 1);
    }
}
