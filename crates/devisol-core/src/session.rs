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

//! Quote session state machine
//!
//! Idle -> Editing -> Quoted, driven by select / generate / back. The
//! tagged representation makes a quote without its configuration
//! unrepresentable. All editing operations recompute nothing by
//! themselves; live totals, sizing and pricing are re-derived on demand
//! from the current items.

use chrono::Utc;
use devisol_types::{ClientProfile, FinancialSummary, LineItem, QuoteConfig, SavedQuote, SizingResult};
use tracing::debug;

use crate::aggregate::{Totals, totals};
use crate::pricing::quote_summary;
use crate::sizing::size_system;

/// Devices every quote must carry, added as zero-priced placeholders
/// when the audit did not record them
pub const MANDATORY_DEVICES: [&str; 3] = ["Onduleur", "Panneau Solaire", "Batterie"];

/// Current step of the quoting workflow
#[derive(Debug)]
pub enum QuoteSession {
    /// No profile selected
    Idle,

    /// Items and configuration under edit
    Editing {
        profile: ClientProfile,
        config: QuoteConfig,
    },

    /// Quote generated; totals frozen into the profile
    Quoted {
        profile: ClientProfile,
        config: QuoteConfig,
    },
}

impl QuoteSession {
    pub fn new() -> Self {
        Self::Idle
    }

    /// Select a profile for editing (Idle only)
    ///
    /// Mandatory placeholder devices are injected here, once, so they
    /// exist before any pricing happens. Returns false when a profile is
    /// already active.
    pub fn select(&mut self, mut profile: ClientProfile, config: QuoteConfig) -> bool {
        if !matches!(self, Self::Idle) {
            return false;
        }
        ensure_mandatory_items(&mut profile);
        debug!("édition: {} ({} articles)", profile.name, profile.items.len());
        *self = Self::Editing { profile, config };
        true
    }

    /// Freeze the current edit into a generated quote (Editing only)
    pub fn generate(&mut self) -> bool {
        match std::mem::replace(self, Self::Idle) {
            Self::Editing {
                mut profile,
                config,
            } => {
                profile.recompute_totals();
                *self = Self::Quoted { profile, config };
                true
            }
            other => {
                *self = other;
                false
            }
        }
    }

    /// Step back: Quoted -> Editing, Editing -> Idle
    pub fn back(&mut self) {
        *self = match std::mem::replace(self, Self::Idle) {
            Self::Quoted { profile, config } => Self::Editing { profile, config },
            Self::Idle | Self::Editing { .. } => Self::Idle,
        };
    }

    /// Append a hand-added item with the editor defaults (Editing only)
    pub fn add_item(&mut self) -> Option<&LineItem> {
        let Self::Editing { profile, .. } = self else {
            return None;
        };
        let item = LineItem {
            id: format!("manual-{}", Utc::now().timestamp_millis()),
            client: profile.name.clone(),
            site: profile.site_name.clone(),
            address: profile.address.clone(),
            visit_date: profile.visit_date.clone(),
            agent: "Manuel".to_owned(),
            device: "Nouvel Appareil".to_owned(),
            included_in_peak: true,
            hourly_kwh: 0.1,
            peak_w: 100.0,
            duration_h: 2.0,
            quantity: 1,
            unit_price: 0.0,
            observations: String::new(),
            agent_name: String::new(),
        };
        profile.items.push(item);
        profile.items.last()
    }

    /// Apply an edit to the item with the given id (Editing only)
    pub fn update_item(&mut self, id: &str, edit: impl FnOnce(&mut LineItem)) -> bool {
        let Self::Editing { profile, .. } = self else {
            return false;
        };
        match profile.items.iter_mut().find(|i| i.id == id) {
            Some(item) => {
                edit(item);
                true
            }
            None => false,
        }
    }

    /// Remove the item with the given id (Editing only)
    pub fn remove_item(&mut self, id: &str) -> bool {
        let Self::Editing { profile, .. } = self else {
            return false;
        };
        let before = profile.items.len();
        profile.items.retain(|i| i.id != id);
        profile.items.len() != before
    }

    /// Live totals of the items under edit or of the generated quote
    pub fn live_totals(&self) -> Option<Totals> {
        self.profile().map(|p| totals(&p.items))
    }

    /// Live sizing derived from the live totals and the configuration
    pub fn live_sizing(&self) -> Option<SizingResult> {
        let (profile, config) = self.parts()?;
        let t = totals(&profile.items);
        Some(size_system(
            t.total_daily_kwh,
            config.panel_power_w,
            config.efficiency_percent,
        ))
    }

    /// Live financial summary
    pub fn live_pricing(&self) -> Option<FinancialSummary> {
        let (profile, config) = self.parts()?;
        Some(quote_summary(&profile.items, config))
    }

    /// Snapshot for persistence (Quoted only): a deep, independent copy
    pub fn saved_snapshot(&self) -> Option<SavedQuote> {
        let Self::Quoted { profile, config } = self else {
            return None;
        };
        Some(SavedQuote {
            profile: profile.clone(),
            config: config.clone(),
            saved_at: Utc::now(),
        })
    }

    pub fn profile(&self) -> Option<&ClientProfile> {
        self.parts().map(|(p, _)| p)
    }

    pub fn config(&self) -> Option<&QuoteConfig> {
        self.parts().map(|(_, c)| c)
    }

    /// Update the configuration in place (Editing only)
    pub fn set_config(&mut self, config: QuoteConfig) -> bool {
        let Self::Editing { config: current, .. } = self else {
            return false;
        };
        *current = config;
        true
    }

    fn parts(&self) -> Option<(&ClientProfile, &QuoteConfig)> {
        match self {
            Self::Idle => None,
            Self::Editing { profile, config } | Self::Quoted { profile, config } => {
                Some((profile, config))
            }
        }
    }
}

impl Default for QuoteSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Add the mandatory placeholder devices missing from the item list
///
/// Label comparison is case-insensitive; an audited "onduleur" row
/// suppresses the placeholder. Placeholders are excluded from sizing and
/// carry no price until the user sets one.
fn ensure_mandatory_items(profile: &mut ClientProfile) {
    let batch = Utc::now().timestamp_millis();
    for label in MANDATORY_DEVICES {
        let exists = profile
            .items
            .iter()
            .any(|i| i.device.eq_ignore_ascii_case(label));
        if exists {
            continue;
        }
        profile.items.push(LineItem {
            id: format!("mandatory-{}-{batch}", label.to_lowercase().replace(' ', "-")),
            client: profile.name.clone(),
            site: profile.site_name.clone(),
            address: profile.address.clone(),
            visit_date: profile.visit_date.clone(),
            agent: "Système".to_owned(),
            device: label.to_owned(),
            included_in_peak: false,
            hourly_kwh: 0.0,
            peak_w: 0.0,
            duration_h: 0.0,
            quantity: 1,
            unit_price: 0.0,
            observations: String::new(),
            agent_name: String::new(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> ClientProfile {
        ClientProfile {
            name: "Dupont".to_owned(),
            address: "12 rue des Lilas".to_owned(),
            site_name: "Maison".to_owned(),
            visit_date: "03/04/2025".to_owned(),
            observations: String::new(),
            agent_name: String::new(),
            items: vec![LineItem {
                id: "csv-0-1".to_owned(),
                client: "Dupont".to_owned(),
                site: "Maison".to_owned(),
                address: "12 rue des Lilas".to_owned(),
                visit_date: "03/04/2025".to_owned(),
                agent: "AG1".to_owned(),
                device: "Frigo".to_owned(),
                included_in_peak: true,
                hourly_kwh: 0.2,
                peak_w: 100.0,
                duration_h: 10.0,
                quantity: 1,
                unit_price: 0.0,
                observations: String::new(),
                agent_name: String::new(),
            }],
            total_daily_kwh: 0.0,
            total_max_w: 0.0,
        }
    }

    #[test]
    fn select_injects_mandatory_placeholders() {
        let mut session = QuoteSession::new();
        assert!(session.select(profile(), QuoteConfig::default()));

        let items = &session.profile().unwrap().items;
        assert_eq!(items.len(), 4);
        for label in MANDATORY_DEVICES {
            let placeholder = items.iter().find(|i| i.device == label).unwrap();
            assert!(!placeholder.included_in_peak);
            assert_eq!(placeholder.quantity, 1);
            assert_eq!(placeholder.unit_price, 0.0);
        }
    }

    #[test]
    fn existing_device_suppresses_its_placeholder() {
        let mut base = profile();
        base.items[0].device = "onduleur".to_owned();

        let mut session = QuoteSession::new();
        session.select(base, QuoteConfig::default());

        let items = &session.profile().unwrap().items;
        // "onduleur" already present (case-insensitive): only 2 added
        assert_eq!(items.len(), 3);
        assert!(!items.iter().any(|i| i.device == "Onduleur"));
    }

    #[test]
    fn select_is_refused_outside_idle() {
        let mut session = QuoteSession::new();
        assert!(session.select(profile(), QuoteConfig::default()));
        assert!(!session.select(profile(), QuoteConfig::default()));
    }

    #[test]
    fn generate_freezes_recomputed_totals() {
        let mut session = QuoteSession::new();
        session.select(profile(), QuoteConfig::default());
        assert!(session.generate());

        let quoted = session.profile().unwrap();
        // placeholders are excluded from sizing: only the Frigo counts
        assert_eq!(quoted.total_daily_kwh, 2.0);
        assert_eq!(quoted.total_max_w, 100.0);
    }

    #[test]
    fn back_walks_the_states_in_reverse() {
        let mut session = QuoteSession::new();
        session.select(profile(), QuoteConfig::default());
        session.generate();
        assert!(matches!(session, QuoteSession::Quoted { .. }));

        session.back();
        assert!(matches!(session, QuoteSession::Editing { .. }));
        session.back();
        assert!(matches!(session, QuoteSession::Idle));
    }

    #[test]
    fn editing_operations_target_items_by_id() {
        let mut session = QuoteSession::new();
        session.select(profile(), QuoteConfig::default());

        assert!(session.update_item("csv-0-1", |i| i.unit_price = 450.0));
        assert!(!session.update_item("unknown", |i| i.unit_price = 1.0));

        let added_id = session.add_item().unwrap().id.clone();
        assert_eq!(session.profile().unwrap().items.len(), 5);

        assert!(session.remove_item(&added_id));
        assert!(!session.remove_item(&added_id));
        assert_eq!(session.profile().unwrap().items.len(), 4);
    }

    #[test]
    fn live_derivations_follow_edits() {
        let mut session = QuoteSession::new();
        session.select(profile(), QuoteConfig::default());

        let before = session.live_totals().unwrap();
        session.update_item("csv-0-1", |i| i.quantity = 2);
        let after = session.live_totals().unwrap();
        assert_eq!(before.total_daily_kwh * 2.0, after.total_daily_kwh);

        let sizing = session.live_sizing().unwrap();
        assert!(sizing.needed_kwp > 0.0);

        // no billable item yet: only the installation is priced
        let pricing = session.live_pricing().unwrap();
        assert_eq!(pricing.material_subtotal, 0.0);
        assert_eq!(pricing.grand_total, 1500.0 + 150.0);
    }

    #[test]
    fn generate_is_refused_outside_editing() {
        let mut session = QuoteSession::new();
        assert!(!session.generate());
        assert!(matches!(session, QuoteSession::Idle));
    }

    #[test]
    fn snapshot_only_exists_once_quoted() {
        let mut session = QuoteSession::new();
        session.select(profile(), QuoteConfig::default());
        assert!(session.saved_snapshot().is_none());

        session.generate();
        let snapshot = session.saved_snapshot().unwrap();
        assert_eq!(snapshot.profile.key(), "Dupont-12 rue des Lilas");
        assert_eq!(snapshot.config.margin_percent, 20.0);
    }
}
