//! Per-language extraction policies
//!
//! A language code is resolved once, at configuration time, into a
//! [`LanguageProfile`]: the scripts the cleaner keeps, the sentence boundary
//! policy, the casing policy and the kind of word tokenizer. Languages that
//! behave like the Latin-script default need no entry in the table.

use crate::error::{CorpusError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::OnceLock;

/// Longest accepted language code (e.g. `be-tarask`, `simple`)
const MAX_CODE_LEN: usize = 16;

static EMBEDDED: OnceLock<std::result::Result<LanguageTable, String>> = OnceLock::new();

/// Sentence boundary rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPolicy {
    /// Ideographic full stop and friends, or newline runs
    Cjk,
    /// Newline runs only
    NewlineOnly,
    /// Latin terminators plus the danda
    Indic,
    /// `.?!` followed by a space, or newline runs
    #[default]
    Default,
    /// Default rules, then the first character of each sentence is lowercased
    CaseNormalizing,
}

/// When the text is lowercased
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CasingPolicy {
    /// The cleaner lowercases the whole block
    Lowercase,
    /// Casing is left to the segmenter
    Deferred,
}

/// Backing implementation for word tokenization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenizerKind {
    /// Split on whitespace runs
    #[default]
    Whitespace,
    /// Needs an injected morphological segmenter
    External,
}

/// One language entry as written in a table file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageEntry {
    pub code: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_scripts")]
    pub scripts: Vec<String>,
    #[serde(default)]
    pub extra_chars: Vec<char>,
    #[serde(default)]
    pub boundary: BoundaryPolicy,
    #[serde(default)]
    pub tokenizer: TokenizerKind,
}

fn default_scripts() -> Vec<String> {
    vec!["Latin".to_string()]
}

#[derive(Debug, Deserialize)]
struct TableFile {
    #[serde(default)]
    languages: Vec<LanguageEntry>,
}

/// Resolved policies for one run language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageProfile {
    code: String,
    name: Option<String>,
    scripts: Vec<String>,
    extra_chars: Vec<char>,
    boundary: BoundaryPolicy,
    tokenizer: TokenizerKind,
}

impl LanguageProfile {
    /// Resolve a code against the embedded table
    pub fn for_code(code: &str) -> Result<Self> {
        LanguageTable::embedded()?.profile(code)
    }

    fn from_entry(code: String, entry: &LanguageEntry) -> Self {
        Self {
            code,
            name: entry.name.clone(),
            scripts: entry.scripts.clone(),
            extra_chars: entry.extra_chars.clone(),
            boundary: entry.boundary,
            tokenizer: entry.tokenizer,
        }
    }

    fn fallback(code: String) -> Self {
        Self {
            code,
            name: None,
            scripts: default_scripts(),
            extra_chars: Vec::new(),
            boundary: BoundaryPolicy::Default,
            tokenizer: TokenizerKind::Whitespace,
        }
    }

    /// Normalized language code
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Display name, falling back to the code
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.code)
    }

    /// Unicode script names whose letters are kept
    pub fn scripts(&self) -> &[String] {
        &self.scripts
    }

    /// Additional characters kept by the cleaner
    pub fn extra_chars(&self) -> &[char] {
        &self.extra_chars
    }

    pub fn boundary(&self) -> BoundaryPolicy {
        self.boundary
    }

    pub fn casing(&self) -> CasingPolicy {
        match self.boundary {
            BoundaryPolicy::CaseNormalizing => CasingPolicy::Deferred,
            _ => CasingPolicy::Lowercase,
        }
    }

    pub fn tokenizer(&self) -> TokenizerKind {
        self.tokenizer
    }

    pub fn needs_external_segmenter(&self) -> bool {
        self.tokenizer == TokenizerKind::External
    }
}

impl fmt::Display for LanguageProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{name} ({})", self.code),
            None => write!(f, "{}", self.code),
        }
    }
}

/// Lookup table from language code to policies
#[derive(Debug, Clone, Default)]
pub struct LanguageTable {
    entries: HashMap<String, LanguageEntry>,
}

impl LanguageTable {
    /// The table compiled into the crate
    pub fn embedded() -> Result<&'static LanguageTable> {
        EMBEDDED
            .get_or_init(|| {
                LanguageTable::from_toml_str(include_str!("../configs/languages.toml"))
                    .map_err(|e| e.to_string())
            })
            .as_ref()
            .map_err(|e| CorpusError::LanguageTable(format!("embedded table: {e}")))
    }

    /// Parse a table from TOML
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let file: TableFile =
            toml::from_str(toml_str).map_err(|e| CorpusError::LanguageTable(e.to_string()))?;

        let mut entries = HashMap::with_capacity(file.languages.len());
        for mut entry in file.languages {
            entry.code = normalize_code(&entry.code)?;
            validate_entry(&entry)?;
            if entries.contains_key(&entry.code) {
                return Err(CorpusError::LanguageTable(format!(
                    "duplicate entry for '{}'",
                    entry.code
                )));
            }
            entries.insert(entry.code.clone(), entry);
        }

        Ok(Self { entries })
    }

    /// Read a table file from disk
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|e| match e {
            CorpusError::LanguageTable(msg) => {
                CorpusError::LanguageTable(format!("{}: {msg}", path.display()))
            }
            other => other,
        })
    }

    /// Layer `overrides` on top of this table; their entries win
    pub fn merged(mut self, overrides: LanguageTable) -> Self {
        self.entries.extend(overrides.entries);
        self
    }

    /// Resolve a code; unknown but well-formed codes get the default policies
    pub fn profile(&self, code: &str) -> Result<LanguageProfile> {
        let code = normalize_code(code)?;
        Ok(match self.entries.get(&code) {
            Some(entry) => LanguageProfile::from_entry(code, entry),
            None => LanguageProfile::fallback(code),
        })
    }

    /// Explicitly configured profiles, sorted by code
    pub fn profiles(&self) -> Vec<LanguageProfile> {
        let mut profiles: Vec<_> = self
            .entries
            .iter()
            .map(|(code, entry)| LanguageProfile::from_entry(code.clone(), entry))
            .collect();
        profiles.sort_by(|a, b| a.code.cmp(&b.code));
        profiles
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Trim and lowercase a code, rejecting anything that is not a wiki code
pub fn normalize_code(code: &str) -> Result<String> {
    let code = code.trim().to_ascii_lowercase();
    let well_formed = !code.is_empty()
        && code.len() <= MAX_CODE_LEN
        && code.starts_with(|c: char| c.is_ascii_lowercase())
        && !code.ends_with('-')
        && code.chars().all(|c| c.is_ascii_lowercase() || c == '-');

    if well_formed {
        Ok(code)
    } else {
        Err(CorpusError::InvalidLanguage(format!("'{code}'")))
    }
}

fn validate_entry(entry: &LanguageEntry) -> Result<()> {
    if entry.scripts.is_empty() {
        return Err(CorpusError::LanguageTable(format!(
            "'{}' must list at least one script",
            entry.code
        )));
    }

    for script in &entry.scripts {
        let valid = !script.is_empty()
            && script.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
            && regex::Regex::new(&format!(r"\p{{{script}}}")).is_ok();
        if !valid {
            return Err(CorpusError::LanguageTable(format!(
                "'{}' lists unknown script '{script}'",
                entry.code
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_table_loads() {
        let table = LanguageTable::embedded().unwrap();
        assert!(!table.is_empty());
        assert!(table.profiles().iter().any(|p| p.code() == "ja"));
    }

    #[test]
    fn test_policies_for_known_codes() {
        let ja = LanguageProfile::for_code("ja").unwrap();
        assert_eq!(ja.boundary(), BoundaryPolicy::Cjk);
        assert!(ja.needs_external_segmenter());
        assert!(ja.extra_chars().contains(&'。'));

        let th = LanguageProfile::for_code("th").unwrap();
        assert_eq!(th.boundary(), BoundaryPolicy::NewlineOnly);

        let hi = LanguageProfile::for_code("hi").unwrap();
        assert_eq!(hi.boundary(), BoundaryPolicy::Indic);
        assert_eq!(hi.tokenizer(), TokenizerKind::Whitespace);

        let de = LanguageProfile::for_code("de").unwrap();
        assert_eq!(de.boundary(), BoundaryPolicy::CaseNormalizing);
        assert_eq!(de.casing(), CasingPolicy::Deferred);
        assert_eq!(de.scripts(), ["Latin"]);
    }

    #[test]
    fn test_unknown_code_falls_back_to_default() {
        let profile = LanguageProfile::for_code("simple").unwrap();
        assert_eq!(profile.code(), "simple");
        assert_eq!(profile.name(), "simple");
        assert_eq!(profile.scripts(), ["Latin"]);
        assert_eq!(profile.boundary(), BoundaryPolicy::Default);
        assert_eq!(profile.casing(), CasingPolicy::Lowercase);
        assert_eq!(profile.tokenizer(), TokenizerKind::Whitespace);
    }

    #[test]
    fn test_code_normalization() {
        assert_eq!(normalize_code(" EN ").unwrap(), "en");
        assert_eq!(normalize_code("be-tarask").unwrap(), "be-tarask");
        assert!(normalize_code("").is_err());
        assert!(normalize_code("e n").is_err());
        assert!(normalize_code("en-").is_err());
        assert!(normalize_code("-en").is_err());
        assert!(normalize_code("../etc").is_err());
        assert!(normalize_code("averyveryverylongcode").is_err());
    }

    #[test]
    fn test_custom_table_overrides_embedded() {
        let custom = LanguageTable::from_toml_str(
            r#"
            [[languages]]
            code = "ja"
            scripts = ["Han", "Hiragana", "Katakana"]
            boundary = "newline_only"
            "#,
        )
        .unwrap();

        let table = LanguageTable::embedded().unwrap().clone().merged(custom);
        let ja = table.profile("ja").unwrap();
        assert_eq!(ja.boundary(), BoundaryPolicy::NewlineOnly);
        assert_eq!(ja.tokenizer(), TokenizerKind::Whitespace);
        assert_eq!(table.profile("hi").unwrap().boundary(), BoundaryPolicy::Indic);
    }

    #[test]
    fn test_table_rejects_bad_entries() {
        let unknown_script = LanguageTable::from_toml_str(
            r#"
            [[languages]]
            code = "xx"
            scripts = ["Klingon"]
            "#,
        );
        assert!(matches!(unknown_script, Err(CorpusError::LanguageTable(_))));

        let duplicate = LanguageTable::from_toml_str(
            r#"
            [[languages]]
            code = "xx"

            [[languages]]
            code = "XX"
            "#,
        );
        assert!(matches!(duplicate, Err(CorpusError::LanguageTable(_))));

        let no_scripts = LanguageTable::from_toml_str(
            r#"
            [[languages]]
            code = "xx"
            scripts = []
            "#,
        );
        assert!(no_scripts.is_err());

        let bad_policy = LanguageTable::from_toml_str(
            r#"
            [[languages]]
            code = "xx"
            boundary = "sometimes"
            "#,
        );
        assert!(bad_policy.is_err());
    }

    #[test]
    fn test_profile_display() {
        let ja = LanguageProfile::for_code("ja").unwrap();
        assert_eq!(ja.to_string(), "Japanese (ja)");
        assert_eq!(LanguageProfile::for_code("xx").unwrap().to_string(), "xx");
    }
}
