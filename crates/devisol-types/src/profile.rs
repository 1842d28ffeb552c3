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

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::QuoteConfig;
use crate::item::LineItem;

/// One client/site aggregate built from imported rows
///
/// Items keep their import order. The two totals are derived from the
/// items under the inclusion rule and refreshed via `recompute_totals`;
/// they are only stored independently inside a persisted [`SavedQuote`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientProfile {
    pub name: String,
    pub address: String,
    pub site_name: String,
    pub visit_date: String,

    /// Audit observations, taken from the group's first row
    #[serde(default)]
    pub observations: String,

    /// Agent display name, taken from the group's first row
    #[serde(default)]
    pub agent_name: String,

    /// Line items in first-seen order
    pub items: Vec<LineItem>,

    /// Total daily energy draw (kWh/day), inclusion rule applied
    pub total_daily_kwh: f64,

    /// Total peak power draw (W), inclusion rule applied
    pub total_max_w: f64,
}

impl ClientProfile {
    /// Composite identity used for de-duplication and persistence lookups
    pub fn key(&self) -> String {
        format!("{}-{}", self.name, self.address)
    }

    /// Refresh both derived totals from the current items
    pub fn recompute_totals(&mut self) {
        self.total_daily_kwh = self
            .items
            .iter()
            .filter(|i| i.counts_toward_sizing())
            .map(LineItem::daily_kwh)
            .sum();
        self.total_max_w = self
            .items
            .iter()
            .filter(|i| i.counts_toward_sizing())
            .map(LineItem::total_peak_w)
            .sum();
    }
}

/// Persisted quote snapshot: a deep copy of the profile with its frozen
/// pricing configuration
///
/// Edits to a live profile never reach a snapshot that was saved earlier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedQuote {
    pub profile: ClientProfile,
    pub config: QuoteConfig,
    pub saved_at: DateTime<Utc>,
}
