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

//! REST client for the Gemini generateContent endpoint

use std::time::Duration;

use async_trait::async_trait;
use devisol_core::{AnalysisError, AnalysisProvider};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::{GeminiError, GeminiResult};

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Text-generation client
///
/// The credential is optional at construction so the caller can build the
/// client unconditionally; its absence is reported on every call attempt
/// instead of crashing the quoting flow.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    base_url: String,
    api_key: Option<String>,
    model: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

impl GeminiClient {
    /// Create a client for the given credential and model
    pub fn new(api_key: Option<String>, model: impl Into<String>) -> GeminiResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            api_key,
            model: model.into(),
            client,
        })
    }

    /// Create a client from the GEMINI_API_KEY environment variable
    pub fn from_env() -> GeminiResult<Self> {
        let api_key = std::env::var("GEMINI_API_KEY").ok();
        if api_key.is_none() {
            debug!("GEMINI_API_KEY absent, l'analyse IA restera désactivée");
        }
        Self::new(api_key, DEFAULT_MODEL)
    }

    /// Override the endpoint base URL (tests)
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    /// Send one prompt and return the first candidate's text
    pub async fn generate(&self, prompt: &str) -> GeminiResult<String> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(GeminiError::MissingApiKey);
        };

        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, api_key
        );
        debug!("requête d'analyse: modèle {}", self.model);

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_owned(),
                }],
            }],
        };

        let response = self.client.post(&url).json(&request).send().await?;

        match response.status() {
            StatusCode::OK => {
                let body: GenerateResponse = response.json().await?;
                let text = body
                    .candidates
                    .into_iter()
                    .next()
                    .map(|c| {
                        c.content
                            .parts
                            .into_iter()
                            .map(|p| p.text)
                            .collect::<Vec<_>>()
                            .join("")
                    })
                    .unwrap_or_default();

                if text.is_empty() {
                    warn!("réponse sans texte candidat");
                    return Err(GeminiError::EmptyResponse);
                }
                Ok(text)
            }
            status => {
                let message = response.text().await.unwrap_or_default();
                warn!("échec de l'API d'analyse: {status} {message}");
                Err(GeminiError::Api {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }
}

#[async_trait]
impl AnalysisProvider for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, AnalysisError> {
        GeminiClient::generate(self, prompt)
            .await
            .map_err(AnalysisError::from)
    }
}

impl From<GeminiError> for AnalysisError {
    fn from(error: GeminiError) -> Self {
        match error {
            GeminiError::MissingApiKey => Self::MissingCredential,
            GeminiError::Request(e) if e.is_connect() || e.is_timeout() => {
                Self::Connection(e.to_string())
            }
            GeminiError::Request(e) => Self::Service(e.to_string()),
            GeminiError::Api { status, message } => {
                Self::Service(format!("HTTP {status}: {message}"))
            }
            GeminiError::EmptyResponse => Self::Service("réponse vide".to_owned()),
        }
    }
}
