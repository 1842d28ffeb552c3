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

//! Grouping of imported rows into client profiles
//!
//! Grouping key is the exact `name-address` composite, case-sensitive.
//! Both group order and item order within a group follow first appearance
//! in the input, so the display stays stable across recomputations.

use std::collections::HashMap;

use devisol_types::{ClientProfile, LineItem};

/// Derived totals of an item set under the inclusion rule
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Totals {
    /// Σ hourly_kwh × duration_h × quantity (kWh/day)
    pub total_daily_kwh: f64,

    /// Σ peak_w × quantity (W) - duration is irrelevant to peak
    pub total_max_w: f64,
}

/// Compute both totals over the items that count toward sizing
///
/// An item contributes only when its inclusion flag is set AND its
/// quantity is greater than zero; every other item contributes exactly 0.
pub fn totals(items: &[LineItem]) -> Totals {
    let sizing_items = || items.iter().filter(|i| i.counts_toward_sizing());
    Totals {
        total_daily_kwh: sizing_items().map(LineItem::daily_kwh).sum(),
        total_max_w: sizing_items().map(LineItem::total_peak_w).sum(),
    }
}

/// Group a flat import into client profiles
pub fn group_by_client(entries: &[LineItem]) -> Vec<ClientProfile> {
    let mut index_by_key: HashMap<String, usize> = HashMap::new();
    let mut profiles: Vec<ClientProfile> = Vec::new();

    for entry in entries {
        let key = format!("{}-{}", entry.client, entry.address);
        let idx = *index_by_key.entry(key).or_insert_with(|| {
            profiles.push(ClientProfile {
                name: entry.client.clone(),
                address: entry.address.clone(),
                site_name: entry.site.clone(),
                visit_date: entry.visit_date.clone(),
                observations: entry.observations.clone(),
                agent_name: if entry.agent_name.is_empty() {
                    entry.agent.clone()
                } else {
                    entry.agent_name.clone()
                },
                items: Vec::new(),
                total_daily_kwh: 0.0,
                total_max_w: 0.0,
            });
            profiles.len() - 1
        });
        profiles[idx].items.push(entry.clone());
    }

    for profile in &mut profiles {
        profile.recompute_totals();
    }

    profiles
}
