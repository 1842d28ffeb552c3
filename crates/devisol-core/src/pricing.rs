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

//! Pricing & tax engine
//!
//! Pure function of (items, config): margin, discount, split material and
//! installation taxes, tiered deposit. Every monetary intermediate is
//! rounded to 2 decimals immediately after computation - NOT once at the
//! end. Round-once implementations diverge by cents on some inputs; that
//! divergence is the documented, compatible behavior.

use devisol_types::{FinancialSummary, LineItem, QuoteConfig};

/// Contracts above this amount require the smaller deposit fraction
const DEPOSIT_TIER_THRESHOLD: f64 = 1000.0;

/// Deposit (%) for contracts above the threshold
const DEPOSIT_PERCENT_LARGE: f64 = 30.0;

/// Deposit (%) for contracts at or below the threshold
const DEPOSIT_PERCENT_SMALL: f64 = 50.0;

/// Round a monetary amount to 2 decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Compute the full financial breakdown of a quote
///
/// Only billable items (quantity > 0, positive unit price) reach the
/// material subtotal; zero-priced placeholder rows stay display-only.
/// Percentages are applied as configured, including out-of-range values.
pub fn quote_summary(items: &[LineItem], config: &QuoteConfig) -> FinancialSummary {
    let margin_factor = 1.0 + config.margin_percent / 100.0;

    let material_subtotal = round2(
        items
            .iter()
            .filter(|i| i.is_billable())
            .map(|i| round2(i.unit_price * margin_factor) * f64::from(i.quantity))
            .sum(),
    );

    let discount_amount = round2(material_subtotal * config.discount_percent / 100.0);
    let subtotal_after_discount = material_subtotal - discount_amount;

    let material_tax = round2(subtotal_after_discount * config.material_tax_percent / 100.0);
    let install_tax = round2(config.install_cost * config.install_tax_percent / 100.0);

    let grand_total = round2(
        subtotal_after_discount + material_tax + config.install_cost + install_tax,
    );

    let deposit_percent = if grand_total > DEPOSIT_TIER_THRESHOLD {
        DEPOSIT_PERCENT_LARGE
    } else {
        DEPOSIT_PERCENT_SMALL
    };
    let deposit_amount = round2(grand_total * deposit_percent / 100.0);

    FinancialSummary {
        material_subtotal,
        discount_amount,
        subtotal_after_discount,
        material_tax,
        install_cost: config.install_cost,
        install_tax,
        grand_total,
        deposit_percent,
        deposit_amount,
    }
}
