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

mod config;
mod render;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use devisol_core::{
    JsonQuoteStore, QuoteSession, QuoteStore, build_prompt, fetch_analysis, group_by_client,
    parse_csv,
};
use devisol_gemini::GeminiClient;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "devisol")]
#[command(about = "Devis photovoltaïques à partir d'un audit énergétique CSV", long_about = None)]
struct Cli {
    /// Path to the energy-audit CSV export
    #[arg(short, long)]
    csv: Option<PathBuf>,

    /// Client to quote, by name (defaults to the first detected profile)
    #[arg(long)]
    client: Option<String>,

    /// TOML configuration file
    #[arg(long, default_value = "devisol.toml")]
    config: PathBuf,

    /// Persist the generated quote in the local store
    #[arg(long)]
    save: bool,

    /// List saved quotes and exit
    #[arg(long)]
    list_saved: bool,

    /// Delete the saved quote with the given key ("Nom-Adresse") and exit
    #[arg(long)]
    delete_saved: Option<String>,

    /// Skip the AI narrative analysis
    #[arg(long)]
    no_analysis: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respects RUST_LOG, defaults to info
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let app_config = config::load_config(&cli.config)?;
    let store = JsonQuoteStore::new(&app_config.store_path);

    if cli.list_saved {
        return list_saved(&store);
    }
    if let Some(key) = cli.delete_saved.as_deref() {
        store.remove(key).context("suppression du devis")?;
        info!("devis supprimé: {key}");
        return Ok(());
    }

    let Some(csv_path) = cli.csv.as_deref() else {
        bail!("aucun fichier CSV fourni (option --csv)");
    };

    info!("🌞 DeviSol - import de {}", csv_path.display());
    let raw = std::fs::read_to_string(csv_path)
        .with_context(|| format!("lecture de {}", csv_path.display()))?;

    let entries = parse_csv(&raw);
    if entries.is_empty() {
        // not a crash: the file simply carries nothing usable
        println!("Aucune donnée à importer: le fichier ne contient aucune ligne exploitable.");
        return Ok(());
    }

    let profiles = group_by_client(&entries);
    info!("📋 {} profil(s) client détecté(s)", profiles.len());
    for profile in &profiles {
        info!(
            "   - {} ({}) : {} appareil(s), {:.2} kWh/j, {:.0} W",
            profile.name,
            profile.site_name,
            profile.items.len(),
            profile.total_daily_kwh,
            profile.total_max_w
        );
    }

    let profile = match cli.client.as_deref() {
        Some(name) => profiles
            .iter()
            .find(|p| p.name == name)
            .with_context(|| {
                let known: Vec<&str> = profiles.iter().map(|p| p.name.as_str()).collect();
                format!("client \"{name}\" introuvable (détectés: {})", known.join(", "))
            })?
            .clone(),
        None => profiles[0].clone(),
    };

    let mut session = QuoteSession::new();
    session.select(profile, app_config.quote.clone());
    session.generate();

    let quoted = session.profile().expect("profile present after generate");
    let sizing = session.live_sizing().expect("sizing available after generate");
    let summary = session.live_pricing().expect("pricing available after generate");

    render::print_quote(quoted, session.config().expect("config"), &sizing, &summary);

    if !cli.no_analysis {
        let client = GeminiClient::new(
            app_config.gemini.resolved_api_key(),
            app_config.gemini.model.clone(),
        )
        .context("initialisation du client d'analyse")?;

        let prompt = build_prompt(
            quoted,
            session.config().expect("config"),
            &sizing,
            &summary,
        );

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("création du runtime tokio")?;
        let analysis = runtime.block_on(fetch_analysis(&client, &prompt));

        println!("\n── Analyse experte ──\n{analysis}");
    }

    if cli.save {
        let snapshot = session.saved_snapshot().expect("snapshot after generate");
        let key = snapshot.profile.key();
        store.upsert(snapshot).context("enregistrement du devis")?;
        info!("💾 devis enregistré sous \"{key}\" dans {}", store.path().display());
    }

    Ok(())
}

fn list_saved(store: &JsonQuoteStore) -> Result<()> {
    let quotes = store.all().context("lecture des devis enregistrés")?;
    if quotes.is_empty() {
        println!("Aucun devis enregistré.");
        return Ok(());
    }
    println!("Devis enregistrés ({}):", quotes.len());
    for (key, quote) in &quotes {
        println!(
            "  {key} - {:.2} kWh/j, total {:.2}, enregistré le {}",
            quote.profile.total_daily_kwh,
            devisol_core::quote_summary(&quote.profile.items, &quote.config).grand_total,
            quote.saved_at.format("%d/%m/%Y %H:%M")
        );
    }
    Ok(())
}
