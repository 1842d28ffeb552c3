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

fn default_margin() -> f64 {
    20.0
}

fn default_material_tax() -> f64 {
    20.0
}

fn default_install_tax() -> f64 {
    10.0
}

fn default_install_cost() -> f64 {
    1500.0
}

fn default_panel_power() -> u32 {
    425
}

fn default_efficiency() -> f64 {
    80.0
}

/// Pricing/sizing configuration, independent per quote
///
/// Percentages are not range-enforced: out-of-range values (negative
/// discount, margin above 100) propagate through the pricing pipeline
/// unchanged. `validate` reports them so the caller can warn the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteConfig {
    /// Material margin (%) applied to every unit price
    #[serde(default = "default_margin")]
    pub margin_percent: f64,

    /// Commercial discount (%) on the marked-up material subtotal
    #[serde(default)]
    pub discount_percent: f64,

    /// Tax (%) on material, after discount
    #[serde(default = "default_material_tax")]
    pub material_tax_percent: f64,

    /// Tax (%) on the installation cost, taxed separately from material
    #[serde(default = "default_install_tax")]
    pub install_tax_percent: f64,

    /// Labor/installation base amount (HT)
    #[serde(default = "default_install_cost")]
    pub install_cost: f64,

    /// Rated output of one panel unit (W)
    #[serde(default = "default_panel_power")]
    pub panel_power_w: u32,

    /// System derating factor: inverter, wiring and soiling losses (%)
    #[serde(default = "default_efficiency")]
    pub efficiency_percent: f64,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            margin_percent: default_margin(),
            discount_percent: 0.0,
            material_tax_percent: default_material_tax(),
            install_tax_percent: default_install_tax(),
            install_cost: default_install_cost(),
            panel_power_w: default_panel_power(),
            efficiency_percent: default_efficiency(),
        }
    }
}

impl QuoteConfig {
    /// Report values outside their conventional range
    ///
    /// Returns one human-readable warning per suspicious field. The values
    /// are still used as-is: a negative discount acts as a markup.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        for (label, value) in [
            ("marge matériel", self.margin_percent),
            ("remise client", self.discount_percent),
            ("TVA matériel", self.material_tax_percent),
            ("TVA installation", self.install_tax_percent),
        ] {
            if value < 0.0 {
                warnings.push(format!("{label}: {value}% est négatif"));
            } else if value > 100.0 {
                warnings.push(format!("{label}: {value}% dépasse 100%"));
            }
        }

        if self.install_cost < 0.0 {
            warnings.push(format!(
                "coût d'installation négatif: {}",
                self.install_cost
            ));
        }
        if self.panel_power_w == 0 {
            warnings.push("puissance panneau nulle, 1 W sera utilisé".to_owned());
        }
        if self.efficiency_percent < 1.0 || self.efficiency_percent > 100.0 {
            warnings.push(format!(
                "rendement hors plage 1-100: {}%",
                self.efficiency_percent
            ));
        }

        warnings
    }
}
