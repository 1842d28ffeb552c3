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

/// Recommended system size derived from a daily energy requirement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizingResult {
    /// Corrected capacity requirement (kWp), rounded to 2 decimals
    pub needed_kwp: f64,

    /// Whole panels to install (partial panels are not purchasable)
    pub panel_count: u32,
}

/// Full financial breakdown of a quote
///
/// Monetary amounts are rounded to 2 decimals at each computation step,
/// never only at the end.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinancialSummary {
    /// Marked-up material subtotal (HT), billable items only
    pub material_subtotal: f64,

    /// Commercial discount amount
    pub discount_amount: f64,

    /// Material subtotal after discount
    pub subtotal_after_discount: f64,

    /// Tax on material, applied after discount
    pub material_tax: f64,

    /// Installation base amount (HT), carried from the configuration
    pub install_cost: f64,

    /// Tax on installation
    pub install_tax: f64,

    /// Final payable amount (TTC)
    pub grand_total: f64,

    /// Deposit fraction required at signature (%), tiered by total
    pub deposit_percent: f64,

    /// Deposit amount (arrhes)
    pub deposit_amount: f64,
}
