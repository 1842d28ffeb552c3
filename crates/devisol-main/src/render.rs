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

//! Plain-text quote printout
//!
//! Page layout and PDF export are a rendering concern outside the engine;
//! this module only writes the figures to stdout in a readable form.

use devisol_types::{ClientProfile, FinancialSummary, QuoteConfig, SizingResult};

pub fn print_quote(
    profile: &ClientProfile,
    config: &QuoteConfig,
    sizing: &SizingResult,
    summary: &FinancialSummary,
) {
    let reference = chrono::Utc::now().timestamp_millis() % 10_000;

    println!("════════════════════════════════════════════════");
    println!(" DEVIS #SD-{reference:04}");
    println!(" Client   : {}", profile.name);
    println!(" Adresse  : {}", profile.address);
    println!(" Chantier : {}", profile.site_name);
    println!(" Visite   : {}  (agent: {})", profile.visit_date, profile.agent_name);
    println!("════════════════════════════════════════════════");

    println!("\n Détail des consommations");
    for item in &profile.items {
        println!(
            "  {:<24} {:>7.0} W  {:>5.1} h/j  x{:<3} {:>8.2} kWh/j{}",
            item.device,
            item.peak_w,
            item.duration_h,
            item.quantity,
            item.daily_kwh(),
            if item.included_in_peak { "" } else { "  (hors crête)" }
        );
    }
    println!(
        "  Total journalier: {:.2} kWh/j - pic de puissance: {:.0} W",
        profile.total_daily_kwh, profile.total_max_w
    );

    println!("\n Dimensionnement (HSP 5.2, rendement {:.0}%)", config.efficiency_percent);
    println!("  Besoin corrigé : {:.2} kWc", sizing.needed_kwp);
    println!(
        "  Panneaux       : {} x {} W",
        sizing.panel_count, config.panel_power_w
    );

    println!("\n Récapitulatif financier");
    println!("  Matériel HT (marge incluse) : {:>10.2}", summary.material_subtotal);
    println!(
        "  Remise ({:.1}%)               : {:>10.2}",
        config.discount_percent, summary.discount_amount
    );
    println!("  Matériel après remise       : {:>10.2}", summary.subtotal_after_discount);
    println!(
        "  TVA matériel ({:.1}%)         : {:>10.2}",
        config.material_tax_percent, summary.material_tax
    );
    println!("  Installation HT             : {:>10.2}", summary.install_cost);
    println!(
        "  TVA installation ({:.1}%)     : {:>10.2}",
        config.install_tax_percent, summary.install_tax
    );
    println!("  ──────────────────────────────────────");
    println!("  TOTAL TTC                   : {:>10.2}", summary.grand_total);
    println!(
        "  Arrhes à la signature ({:.0}%) : {:>10.2}",
        summary.deposit_percent, summary.deposit_amount
    );
    println!("════════════════════════════════════════════════");
}
