// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of DeviSol.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

//! Saved-quote store
//!
//! One JSON file holding the whole map of saved quotes, keyed by profile
//! identity. Read on demand, rewritten wholesale on every save/delete
//! with an atomic temp-file + rename. The pricing and sizing logic never
//! touches this module; the repository trait is injected at the boundary.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use devisol_types::SavedQuote;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Repository seam for saved quotes
pub trait QuoteStore {
    /// All saved quotes, keyed by profile identity
    fn all(&self) -> StoreResult<BTreeMap<String, SavedQuote>>;

    /// Insert or replace the snapshot under its profile key
    fn upsert(&self, quote: SavedQuote) -> StoreResult<()>;

    /// Delete the snapshot under `key`; unknown keys are a no-op
    fn remove(&self, key: &str) -> StoreResult<()>;
}

/// File-backed store (the single-user default)
#[derive(Debug, Clone)]
pub struct JsonQuoteStore {
    path: PathBuf,
}

impl JsonQuoteStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> StoreResult<BTreeMap<String, SavedQuote>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn save(&self, quotes: &BTreeMap<String, SavedQuote>) -> StoreResult<()> {
        let temp_path = self.path.with_extension("tmp");
        let content = serde_json::to_string_pretty(quotes)?;

        // Atomic write
        std::fs::write(&temp_path, content)?;
        std::fs::rename(&temp_path, &self.path)?;

        debug!("store réécrit: {} devis", quotes.len());
        Ok(())
    }
}

impl QuoteStore for JsonQuoteStore {
    fn all(&self) -> StoreResult<BTreeMap<String, SavedQuote>> {
        self.load()
    }

    fn upsert(&self, quote: SavedQuote) -> StoreResult<()> {
        let mut quotes = self.load()?;
        quotes.insert(quote.profile.key(), quote);
        self.save(&quotes)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let mut quotes = self.load()?;
        if quotes.remove(key).is_some() {
            self.save(&quotes)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use devisol_types::{ClientProfile, QuoteConfig};

    fn saved(name: &str) -> SavedQuote {
        SavedQuote {
            profile: ClientProfile {
                name: name.to_owned(),
                address: "1 rue du Port".to_owned(),
                site_name: "Maison".to_owned(),
                visit_date: "05/05/2025".to_owned(),
                observations: String::new(),
                agent_name: String::new(),
                items: Vec::new(),
                total_daily_kwh: 3.5,
                total_max_w: 420.0,
            },
            config: QuoteConfig::default(),
            saved_at: Utc::now(),
        }
    }

    fn store_in(dir: &tempfile::TempDir) -> JsonQuoteStore {
        JsonQuoteStore::new(dir.path().join("quotes.json"))
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert!(store.all().unwrap().is_empty());
    }

    #[test]
    fn upsert_then_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.upsert(saved("Dupont")).unwrap();
        store.upsert(saved("Martin")).unwrap();

        let quotes = store.all().unwrap();
        assert_eq!(quotes.len(), 2);
        let quote = &quotes["Dupont-1 rue du Port"];
        assert_eq!(quote.profile.total_daily_kwh, 3.5);
        assert_eq!(quote.config.margin_percent, 20.0);
    }

    #[test]
    fn upsert_replaces_the_existing_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.upsert(saved("Dupont")).unwrap();
        let mut updated = saved("Dupont");
        updated.profile.total_daily_kwh = 9.9;
        store.upsert(updated).unwrap();

        let quotes = store.all().unwrap();
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes["Dupont-1 rue du Port"].profile.total_daily_kwh, 9.9);
    }

    #[test]
    fn remove_deletes_only_the_given_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.upsert(saved("Dupont")).unwrap();
        store.upsert(saved("Martin")).unwrap();
        store.remove("Dupont-1 rue du Port").unwrap();
        // unknown key: silent no-op
        store.remove("Inconnu-nulle part").unwrap();

        let quotes = store.all().unwrap();
        assert_eq!(quotes.len(), 1);
        assert!(quotes.contains_key("Martin-1 rue du Port"));
    }

    #[test]
    fn no_temp_file_is_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.upsert(saved("Dupont")).unwrap();

        assert!(store.path().exists());
        assert!(!store.path().with_extension("tmp").exists());
    }

    #[test]
    fn saved_snapshot_is_independent_of_later_edits() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let mut quote = saved("Dupont");
        store.upsert(quote.clone()).unwrap();

        // mutate the live profile after saving
        quote.profile.total_daily_kwh = 0.0;
        quote.config.margin_percent = 99.0;

        let persisted = &store.all().unwrap()["Dupont-1 rue du Port"];
        assert_eq!(persisted.profile.total_daily_kwh, 3.5);
        assert_eq!(persisted.config.margin_percent, 20.0);
    }
}
