// src/core/dictionary.rs
use crate::core::script::ScriptVariant;
use crate::core::types::{Case, ESCAPE_MARKER};
use crate::error::DictionaryError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Line syntax of a pronunciation source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DictFormat {
    /// `WORD,phonemes` with the value trimmed (Britfone).
    Csv,
    /// `word<TAB>spelling`, taken verbatim.
    Tsv,
}

impl DictFormat {
    fn delimiter(self) -> u8 {
        match self {
            DictFormat::Csv => b',',
            DictFormat::Tsv => b'\t',
        }
    }
}

/// Word to phoneme-string table. Built once, read-only afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dictionary {
    entries: HashMap<String, String>,
    case: Case,
}

impl Dictionary {
    pub fn new(case: Case) -> Self {
        Self { entries: HashMap::new(), case }
    }

    /// Parses a whole pronunciation source. Any malformed line or repeated
    /// key fails the load.
    pub fn parse(source: &str, format: DictFormat, case: Case) -> Result<Self, DictionaryError> {
        let mut dictionary = Self::new(case);
        for (idx, line) in source.lines().enumerate() {
            let line_no = idx + 1;
            let line = line.strip_suffix('\r').unwrap_or(line);
            if line.trim().is_empty() {
                continue;
            }

            match line.as_bytes().iter().position(|&b| b == format.delimiter()) {
                Some(i) => {
                    let (key, value) = (&line[..i], &line[i + 1..]);
                    let value = match format {
                        DictFormat::Csv => value.trim(),
                        DictFormat::Tsv => value,
                    };
                    if key.is_empty() || value.is_empty() {
                        return Err(DictionaryError::Malformed {
                            line: line_no,
                            content: line.to_string(),
                        });
                    }
                    dictionary.insert(key, value, line_no)?;
                }
                None => {
                    // A bare headword carries no pronunciation, but still may
                    // not shadow an entry.
                    let key = case.apply(line);
                    if dictionary.entries.contains_key(&key) {
                        return Err(DictionaryError::Duplicate { key });
                    }
                }
            }
        }
        log::info!("loaded {} dictionary entries", dictionary.len());
        Ok(dictionary)
    }

    pub fn for_variant(source: &str, variant: ScriptVariant) -> Result<Self, DictionaryError> {
        Self::parse(source, variant.dictionary_format(), variant.case())
    }

    pub fn load(path: &Path, variant: ScriptVariant) -> Result<Self, DictionaryError> {
        let source = fs::read_to_string(path)?;
        Self::for_variant(&source, variant)
    }

    pub fn from_entries<I, K, V>(entries: I, case: Case) -> Result<Self, DictionaryError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut dictionary = Self::new(case);
        for (idx, (key, value)) in entries.into_iter().enumerate() {
            let (key, value) = (key.as_ref(), value.as_ref());
            if key.is_empty() || value.is_empty() {
                return Err(DictionaryError::Malformed {
                    line: idx + 1,
                    content: format!("{},{}", key, value),
                });
            }
            dictionary.insert(key, value, idx + 1)?;
        }
        Ok(dictionary)
    }

    fn insert(&mut self, key: &str, value: &str, line: usize) -> Result<(), DictionaryError> {
        let key = self.case.apply(key);
        if !is_valid_key(&key) {
            return Err(DictionaryError::BadDisambiguation { line, key });
        }
        if self.entries.contains_key(&key) {
            return Err(DictionaryError::Duplicate { key });
        }
        self.entries.insert(key, value.to_string());
        Ok(())
    }

    /// Exact-match lookup. `word` must already be in the dictionary's case.
    pub fn lookup(&self, word: &str) -> Option<&str> {
        self.entries.get(word).map(String::as_str)
    }

    /// Disambiguation letters recorded for `base`, e.g. `['E', 'I']` for
    /// `LEAD%E` and `LEAD%I`.
    pub fn variants(&self, base: &str) -> Vec<char> {
        let mut letters: Vec<char> = self
            .entries
            .keys()
            .filter_map(|key| {
                let (stem, tail) = key.split_once(ESCAPE_MARKER)?;
                if stem == base {
                    tail.chars().next()
                } else {
                    None
                }
            })
            .collect();
        letters.sort_unstable();
        letters
    }

    pub fn case(&self) -> Case {
        self.case
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// An escape marker may only appear once, after a non-empty stem and
/// followed by exactly one letter.
fn is_valid_key(key: &str) -> bool {
    match key.split_once(ESCAPE_MARKER) {
        None => true,
        Some((stem, tail)) => {
            let mut tail = tail.chars();
            !stem.is_empty()
                && matches!(tail.next(), Some(c) if c.is_ascii_alphabetic())
                && tail.next().is_none()
        }
    }
}
