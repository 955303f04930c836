//! The abbreviation dictionary: surface forms mapped to their expansions,
//! plus the secondary indices the refiner and the sentence segmenter need
//! (case-folded lookup, name finishers, common wrong forms).
//!
//! The default dictionary is embedded and compiled once behind a process-wide
//! [`LazyLock`]; external files load through [`AbbrevDict::load`], which
//! refuses malformed input before any tokenization begins.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::LazyLock;

use serde::Serialize;
use thiserror::Error;

/// One expansion of an abbreviation, in the morphological convention
/// `(wordform, variant, pos, category, stem, inflection)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Meaning {
    pub wordform: String,
    pub variant: i32,
    pub pos: String,
    pub category: String,
    pub stem: String,
    pub inflection: String,
}

#[derive(Error, Debug)]
pub enum AbbrevError {
    #[error("could not read abbreviation file: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: malformed entry: {text:?}")]
    Malformed { line: usize, text: String },
    #[error("line {line}: entry outside of any section")]
    NoSection { line: usize },
    #[error("line {line}: unknown section [{name}]")]
    UnknownSection { line: usize, name: String },
}

/// Read-only abbreviation dictionary.
#[derive(Debug, Default)]
pub struct AbbrevDict {
    meanings: HashMap<String, Vec<Meaning>>,
    /// Lowercased surface → canonical surface, for sentence-initial caps.
    folded: HashMap<String, String>,
    /// Abbreviations that do not end a sentence even before a capitalized
    /// word ("hr. Jón").
    finishers: HashSet<String>,
    /// Misspelled surface → canonical surface.
    wrong_forms: HashMap<String, String>,
    /// Period-misplacement variants ("osfrv." → "o.s.frv.").
    wrong_dots: HashMap<String, String>,
}

enum Section {
    Meanings,
    NameFinishers,
    WrongForms,
    WrongDots,
}

impl AbbrevDict {
    /// The embedded default dictionary.
    pub fn global() -> &'static AbbrevDict {
        static DICT: LazyLock<AbbrevDict> = LazyLock::new(|| {
            AbbrevDict::parse(include_str!("Abbrev.conf")).expect("embedded abbreviation file is well-formed")
        });
        &DICT
    }

    pub fn load(path: impl AsRef<Path>) -> Result<AbbrevDict, AbbrevError> {
        AbbrevDict::parse(&std::fs::read_to_string(path)?)
    }

    pub fn parse(text: &str) -> Result<AbbrevDict, AbbrevError> {
        let mut dict = AbbrevDict::default();
        let mut section = None;
        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            let n = idx + 1;
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                section = Some(match name.trim() {
                    "meanings" => Section::Meanings,
                    "name finishers" => Section::NameFinishers,
                    "wrong forms" => Section::WrongForms,
                    "wrong dots" => Section::WrongDots,
                    other => return Err(AbbrevError::UnknownSection { line: n, name: other.to_owned() }),
                });
                continue;
            }
            match section {
                None => return Err(AbbrevError::NoSection { line: n }),
                Some(Section::Meanings) => dict.parse_meaning_line(line, n)?,
                Some(Section::NameFinishers) => {
                    dict.finishers.insert(line.to_owned());
                }
                Some(Section::WrongForms) => {
                    let (wrong, right) = split_mapping(line, n)?;
                    dict.wrong_forms.insert(wrong, right);
                }
                Some(Section::WrongDots) => {
                    let (wrong, right) = split_mapping(line, n)?;
                    dict.wrong_dots.insert(wrong, right);
                }
            }
        }
        Ok(dict)
    }

    fn parse_meaning_line(&mut self, line: &str, n: usize) -> Result<(), AbbrevError> {
        let malformed = || AbbrevError::Malformed { line: n, text: line.to_owned() };
        let (surface, rest) = line.split_once('=').ok_or_else(malformed)?;
        let surface = surface.trim().to_owned();
        let mut meanings = Vec::new();
        for tuple in rest.split(',') {
            let fields: Vec<&str> = tuple.split('|').map(str::trim).collect();
            if fields.len() != 6 {
                return Err(malformed());
            }
            meanings.push(Meaning {
                wordform: fields[0].to_owned(),
                variant: fields[1].parse().map_err(|_| malformed())?,
                pos: fields[2].to_owned(),
                category: fields[3].to_owned(),
                stem: fields[4].to_owned(),
                inflection: fields[5].to_owned(),
            });
        }
        if meanings.is_empty() {
            return Err(malformed());
        }
        self.folded.insert(surface.to_lowercase(), surface.clone());
        self.meanings.insert(surface, meanings);
        Ok(())
    }

    /// Case-sensitive lookup.
    pub fn lookup(&self, surface: &str) -> Option<&[Meaning]> {
        self.meanings.get(surface).map(Vec::as_slice)
    }

    /// Lookup accepting sentence-initial capitalization ("Sbr." → "sbr.").
    /// Returns the canonical surface together with its meanings.
    pub fn lookup_folded(&self, surface: &str) -> Option<(&str, &[Meaning])> {
        if let Some(m) = self.meanings.get(surface) {
            return Some((surface_key(self, surface), m.as_slice()));
        }
        let canonical = self.folded.get(&surface.to_lowercase())?;
        self.meanings.get(canonical).map(|m| (canonical.as_str(), m.as_slice()))
    }

    pub fn contains(&self, surface: &str) -> bool {
        self.meanings.contains_key(surface) || self.folded.contains_key(&surface.to_lowercase())
    }

    pub fn is_finisher(&self, surface: &str) -> bool {
        self.finishers.contains(surface) || self.finishers.contains(&surface.to_lowercase())
    }

    /// Canonical surface for a known misspelling or wrong-dot variant.
    pub fn correction(&self, surface: &str) -> Option<&str> {
        self.wrong_forms
            .get(surface)
            .or_else(|| self.wrong_dots.get(surface))
            .map(String::as_str)
    }
}

fn surface_key<'d>(dict: &'d AbbrevDict, surface: &str) -> &'d str {
    // the map owns an equal key; borrow it so the lifetime is the dict's
    dict.meanings.get_key_value(surface).map(|(k, _)| k.as_str()).unwrap()
}

fn split_mapping(line: &str, n: usize) -> Result<(String, String), AbbrevError> {
    line.split_once('=')
        .map(|(a, b)| (a.trim().to_owned(), b.trim().to_owned()))
        .ok_or_else(|| AbbrevError::Malformed { line: n, text: line.to_owned() })
}
