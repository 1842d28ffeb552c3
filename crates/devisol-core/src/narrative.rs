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

//! Narrative request builder
//!
//! Formats the sizing and financial figures into a deterministic prompt
//! for the external text-generation service, and normalizes every failure
//! of that service into a descriptive fallback string. A missing
//! credential or a dead network must never block the quote itself.

use async_trait::async_trait;
use devisol_types::{ClientProfile, FinancialSummary, QuoteConfig, SizingResult};
use thiserror::Error;
use tracing::warn;

/// Failure classes of the external analysis service
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("aucune clé d'API configurée")]
    MissingCredential,

    #[error("erreur de connexion: {0}")]
    Connection(String),

    #[error("erreur du service: {0}")]
    Service(String),
}

/// Seam to the external text-generation service
///
/// The provider checks its credential before every call attempt and
/// reports its absence as [`AnalysisError::MissingCredential`].
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, AnalysisError>;
}

/// Build the analysis prompt from the exact quote figures
///
/// The item listing carries billable items only, mirroring the pricing
/// engine, so the narrative cannot reference zero-cost placeholder rows.
/// The service is explicitly instructed to use the supplied figures and
/// nothing else.
pub fn build_prompt(
    profile: &ClientProfile,
    config: &QuoteConfig,
    sizing: &SizingResult,
    summary: &FinancialSummary,
) -> String {
    let mut prompt = format!(
        "En tant qu'expert en énergie solaire, analyse le profil de consommation \
         suivant pour un client résidentiel.\n\
         Client: {}\n\
         Adresse: {}\n\
         Consommation journalière totale estimée: {:.2} kWh\n\
         Puissance de crête (tout allumé): {:.0} W\n\
         Puissance unitaire des panneaux: {} W\n\
         Rendement système retenu: {:.0}%\n\
         Dimensionnement calculé: {:.2} kWc, {} panneaux\n\n\
         Détail financier du devis (à reprendre tel quel):\n\
         - Matériel HT (marge incluse): {:.2}\n\
         - Remise commerciale: {:.2}\n\
         - TVA matériel: {:.2}\n\
         - Installation HT: {:.2}\n\
         - TVA installation: {:.2}\n\
         - Total TTC: {:.2}\n\
         - Arrhes à la signature ({:.0}%): {:.2}\n\n\
         Articles facturés:\n",
        profile.name,
        profile.address,
        profile.total_daily_kwh,
        profile.total_max_w,
        config.panel_power_w,
        config.efficiency_percent,
        sizing.needed_kwp,
        sizing.panel_count,
        summary.material_subtotal,
        summary.discount_amount,
        summary.material_tax,
        summary.install_cost,
        summary.install_tax,
        summary.grand_total,
        summary.deposit_percent,
        summary.deposit_amount,
    );

    for item in profile.items.iter().filter(|i| i.is_billable()) {
        prompt.push_str(&format!(
            "- {}: {}kWh/h, {}h/j, Qte: {}, PU HT: {:.2}\n",
            item.device, item.hourly_kwh, item.duration_h, item.quantity, item.unit_price
        ));
    }

    prompt.push_str(
        "\nFournis une analyse professionnelle courte (en français) incluant:\n\
         1. Une évaluation de la pertinence d'une installation photovoltaïque.\n\
         2. Le dimensionnement conseillé (en kWc).\n\
         3. Un conseil spécifique sur la gestion des appareils.\n\
         4. Une estimation des économies annuelles potentielles.\n\n\
         Utilise UNIQUEMENT les chiffres fournis ci-dessus, sans hypothèse \
         par défaut. Réponds en format Markdown structuré.\n",
    );

    prompt
}

/// Request the narrative, degrading every failure to a readable fallback
pub async fn fetch_analysis(provider: &dyn AnalysisProvider, prompt: &str) -> String {
    match provider.generate(prompt).await {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => {
            warn!("le service d'analyse a renvoyé une réponse vide");
            "L'analyse automatique n'a renvoyé aucun contenu pour ce profil.".to_owned()
        }
        Err(AnalysisError::MissingCredential) => {
            "Analyse IA désactivée: aucune clé d'API n'est configurée. \
             Renseignez GEMINI_API_KEY (ou la section [gemini] de la \
             configuration) pour activer cette fonctionnalité."
                .to_owned()
        }
        Err(AnalysisError::Connection(msg)) => {
            warn!("analyse indisponible (connexion): {msg}");
            format!(
                "Désolé, l'analyse automatique n'est pas disponible pour le moment \
                 (erreur de connexion: {msg})."
            )
        }
        Err(AnalysisError::Service(msg)) => {
            warn!("analyse indisponible (service): {msg}");
            format!(
                "Désolé, l'analyse automatique n'est pas disponible pour le moment \
                 (erreur du service: {msg})."
            )
        }
    }
}
