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

//! Application configuration (TOML, all sections optional)

use std::path::Path;

use anyhow::{Context, Result};
use devisol_types::QuoteConfig;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

fn default_store_path() -> String {
    "devisol_quotes.json".to_owned()
}

fn default_model() -> String {
    devisol_gemini::DEFAULT_MODEL.to_owned()
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Saved-quote store location
    #[serde(default = "default_store_path")]
    pub store_path: String,

    /// Commercial defaults applied to every new quote
    #[serde(default)]
    pub quote: QuoteConfig,

    /// Narrative analysis service settings
    #[serde(default)]
    pub gemini: GeminiSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            quote: QuoteConfig::default(),
            store_path: default_store_path(),
            gemini: GeminiSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiSettings {
    /// Model identifier sent with each request
    #[serde(default = "default_model")]
    pub model: String,

    /// API key; the GEMINI_API_KEY environment variable is the fallback
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key: None,
        }
    }
}

impl GeminiSettings {
    /// Config value first, then environment
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
    }
}

/// Load the configuration, falling back to defaults when the file is absent
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let config = if path.exists() {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("lecture de {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("analyse de {}", path.display()))?
    } else {
        info!("pas de fichier {}, valeurs par défaut", path.display());
        AppConfig::default()
    };

    for warning in config.quote.validate() {
        warn!("configuration devis: {warning}");
    }

    Ok(config)
}
