use crate::core::models::entry::Entry;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EntryLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Entry '{entry}' in '{path}' has no energy, energy-per-atom or formation-energy")]
    MissingEnergy { path: String, entry: String },
}

/// A list of entries as stored in an entry-set file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntrySet {
    #[serde(default)]
    pub entries: Vec<Entry>,
}

impl EntrySet {
    pub fn load(path: &Path) -> Result<Self, EntryLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| EntryLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::parse(&content, &path.to_string_lossy())
    }

    /// Parses entry-set TOML; `origin` only labels errors.
    ///
    /// Every entry must supply at least one energy field.
    pub fn parse(content: &str, origin: &str) -> Result<Self, EntryLoadError> {
        let set: Self = toml::from_str(content).map_err(|e| EntryLoadError::Toml {
            path: origin.to_string(),
            source: e,
        })?;
        let missing = set.entries.iter().enumerate().find(|(_, e)| !e.has_energy());
        if let Some((index, entry)) = missing {
            return Err(EntryLoadError::MissingEnergy {
                path: origin.to_string(),
                entry: entry.label(index),
            });
        }
        Ok(set)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<Entry> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const AL_NI: &str = r#"
        [[entries]]
        id = "Al"
        energy = 0.0
        composition = { Al = 1 }

        [[entries]]
        id = "AlNi"
        energy = -1.2
        correction = 0.05
        composition = { Al = 1, Ni = 1 }

        [[entries]]
        energy-per-atom = -0.3
        formation-energy = -0.3
        composition = { Ni = 2 }
    "#;

    #[test]
    fn load_succeeds_with_valid_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("entries.toml");
        fs::write(&path, AL_NI).unwrap();

        let set = EntrySet::load(&path).unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.entries[1].id.as_deref(), Some("AlNi"));
        assert_eq!(set.entries[1].correction, Some(0.05));
        assert_eq!(set.entries[2].id, None);
        assert_eq!(set.entries[2].composition.amount("Ni"), 2.0);
    }

    #[test]
    fn load_fails_for_missing_file() {
        let dir = tempdir().unwrap();
        let result = EntrySet::load(&dir.path().join("missing.toml"));
        assert!(matches!(result, Err(EntryLoadError::Io { .. })));
    }

    #[test]
    fn parse_fails_for_malformed_toml() {
        let result = EntrySet::parse("this is not toml", "inline");
        assert!(matches!(result, Err(EntryLoadError::Toml { .. })));
    }

    #[test]
    fn parse_rejects_non_positive_amounts() {
        let result = EntrySet::parse(
            "[[entries]]\nenergy = 1.0\ncomposition = { Al = 0 }\n",
            "inline",
        );
        assert!(matches!(result, Err(EntryLoadError::Toml { .. })));
    }

    #[test]
    fn parse_rejects_unknown_top_level_keys() {
        let result = EntrySet::parse("version = 2\n", "inline");
        assert!(matches!(result, Err(EntryLoadError::Toml { .. })));
    }

    #[test]
    fn formation_energy_alone_is_an_energy_source() {
        let set = EntrySet::parse(
            "[[entries]]\nformation-energy = -0.6\ncomposition = { Al = 1, Ni = 1 }\n",
            "inline",
        )
        .unwrap();
        assert_eq!(set.entries[0].energy, None);
        assert_eq!(set.entries[0].formation_energy, Some(-0.6));
    }

    #[test]
    fn parse_rejects_entries_without_any_energy() {
        let result = EntrySet::parse(
            "[[entries]]\nid = \"Al\"\nenergy = -3.0\ncomposition = { Al = 1 }\n\n\
             [[entries]]\ncomposition = { Ni = 1 }\n",
            "inline",
        );
        match result {
            Err(EntryLoadError::MissingEnergy { entry, .. }) => assert_eq!(entry, "#1"),
            other => panic!("expected MissingEnergy, got {other:?}"),
        }
    }

    #[test]
    fn empty_document_is_an_empty_set() {
        assert!(EntrySet::parse("", "inline").unwrap().is_empty());
    }
}
