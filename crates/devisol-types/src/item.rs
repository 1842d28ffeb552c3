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

use serde::{Deserialize, Serialize};

/// One device/appliance row of an energy audit
///
/// Rows come from the CSV import or are added by hand while editing a
/// quote. Consumption fields are clamped to zero at ingestion, so a
/// well-formed `LineItem` never carries negative energy values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    /// Synthetic unique id, stable while editing (not semantic)
    pub id: String,

    /// Client name (grouping key)
    pub client: String,

    /// Site/place name
    pub site: String,

    /// Postal address (grouping key, together with `client`)
    pub address: String,

    /// Audit visit date, kept as the free-form text of the export
    pub visit_date: String,

    /// Recording agent identifier
    pub agent: String,

    /// Device label (free text)
    pub device: String,

    /// Whether this row counts toward sizing totals
    ///
    /// A device can be priced but excluded from capacity calculations
    /// (backup-only or decorative loads).
    pub included_in_peak: bool,

    /// Hourly energy draw (kWh)
    pub hourly_kwh: f64,

    /// Peak power draw (W)
    pub peak_w: f64,

    /// Usage duration (hours per day)
    pub duration_h: f64,

    /// Number of units
    pub quantity: u32,

    /// Unit price (HT), zero when the export carries no price
    #[serde(default)]
    pub unit_price: f64,

    /// Free-text observations from the audit
    #[serde(default)]
    pub observations: String,

    /// Agent display name, falls back to `agent` when the export column is blank
    #[serde(default)]
    pub agent_name: String,
}

impl LineItem {
    /// Daily energy contribution of this row (kWh/day)
    pub fn daily_kwh(&self) -> f64 {
        self.hourly_kwh * self.duration_h * f64::from(self.quantity)
    }

    /// Peak power contribution of this row (W)
    pub fn total_peak_w(&self) -> f64 {
        self.peak_w * f64::from(self.quantity)
    }

    /// Inclusion rule for sizing totals: flagged in AND at least one unit
    pub fn counts_toward_sizing(&self) -> bool {
        self.included_in_peak && self.quantity > 0
    }

    /// Billability rule for financial totals: at least one unit at a positive price
    ///
    /// Zero-priced rows (mandatory placeholders) still display but never
    /// contribute to the material subtotal.
    pub fn is_billable(&self) -> bool {
        self.quantity > 0 && self.unit_price > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(included: bool, quantity: u32, unit_price: f64) -> LineItem {
        LineItem {
            id: "test-1".to_owned(),
            client: "Client".to_owned(),
            site: "Site".to_owned(),
            address: "Adresse".to_owned(),
            visit_date: "01/02/2025".to_owned(),
            agent: "AG1".to_owned(),
            device: "Climatiseur".to_owned(),
            included_in_peak: included,
            hourly_kwh: 0.5,
            peak_w: 150.0,
            duration_h: 4.0,
            quantity,
            unit_price,
            observations: String::new(),
            agent_name: String::new(),
        }
    }

    #[test]
    fn daily_kwh_scales_with_quantity() {
        assert_eq!(item(true, 2, 0.0).daily_kwh(), 4.0);
        assert_eq!(item(true, 0, 0.0).daily_kwh(), 0.0);
    }

    #[test]
    fn sizing_rule_requires_flag_and_quantity() {
        assert!(item(true, 1, 0.0).counts_toward_sizing());
        assert!(!item(false, 1, 0.0).counts_toward_sizing());
        assert!(!item(true, 0, 0.0).counts_toward_sizing());
    }

    #[test]
    fn billable_rule_requires_quantity_and_positive_price() {
        assert!(item(true, 1, 100.0).is_billable());
        assert!(!item(true, 1, 0.0).is_billable());
        assert!(!item(true, 0, 100.0).is_billable());
    }
}
