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

//! CSV ingestion for energy-audit exports
//!
//! The exports follow the French convention: semicolon delimiter, decimal
//! comma, "OUI" as the truthy token. Parsing never aborts on a malformed
//! cell; bad numerics degrade to zero and negatives are clamped.

use csv::{ReaderBuilder, StringRecord, Trim};
use devisol_types::LineItem;
use tracing::{debug, warn};

/// Positional columns of an audit export, 0-indexed
const COL_CLIENT: usize = 0;
const COL_SITE: usize = 1;
const COL_ADDRESS: usize = 2;
const COL_DATE: usize = 3;
const COL_AGENT: usize = 4;
const COL_DEVICE: usize = 5;
const COL_INCLUDED: usize = 6;
const COL_HOURLY_KWH: usize = 7;
const COL_PEAK_W: usize = 8;
const COL_DURATION_H: usize = 9;
const COL_QUANTITY: usize = 10;
const COL_OBSERVATIONS: usize = 11;
const COL_AGENT_NAME: usize = 12;

/// Parse raw export text into line items, in file order
///
/// The first non-blank line is the header and is discarded. An input with
/// fewer than two non-blank lines yields an empty Vec ("nothing to
/// import"), never an error.
pub fn parse_csv(raw: &str) -> Vec<LineItem> {
    // Exports from spreadsheet tools often carry a UTF-8 BOM
    let text = raw.strip_prefix('\u{feff}').unwrap_or(raw);

    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    if lines.len() < 2 {
        debug!("import rejected: {} non-blank line(s)", lines.len());
        return Vec::new();
    }

    // Semicolon is the export convention; comma exports are accepted too
    let delimiter = if lines[0].contains(';') { b';' } else { b',' };
    let body = lines.join("\n");

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(body.as_bytes());

    let batch = chrono::Utc::now().timestamp_millis();
    let mut items = Vec::new();

    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!("ligne CSV illisible ignorée: {e}");
                continue;
            }
        };
        if record.iter().all(str::is_empty) {
            continue;
        }
        items.push(parse_record(&record, items.len(), batch));
    }

    debug!("import: {} article(s)", items.len());
    items
}

fn parse_record(record: &StringRecord, idx: usize, batch: i64) -> LineItem {
    let field = |col: usize| record.get(col).unwrap_or("").trim();

    let agent = field(COL_AGENT);
    let agent_name = match field(COL_AGENT_NAME) {
        "" => agent,
        name => name,
    };

    LineItem {
        id: format!("csv-{idx}-{batch}"),
        client: field(COL_CLIENT).to_owned(),
        site: field(COL_SITE).to_owned(),
        address: field(COL_ADDRESS).to_owned(),
        visit_date: field(COL_DATE).to_owned(),
        agent: agent.to_owned(),
        device: field(COL_DEVICE).to_owned(),
        included_in_peak: parse_inclusion_flag(field(COL_INCLUDED)),
        hourly_kwh: parse_fr_float(field(COL_HOURLY_KWH)).max(0.0),
        peak_w: parse_fr_float(field(COL_PEAK_W)).max(0.0),
        duration_h: parse_fr_float(field(COL_DURATION_H)).max(0.0),
        quantity: parse_quantity(field(COL_QUANTITY)),
        unit_price: 0.0,
        observations: field(COL_OBSERVATIONS).to_owned(),
        agent_name: agent_name.to_owned(),
    }
}

/// Absent flag defaults to included; otherwise only "OUI" counts
fn parse_inclusion_flag(raw: &str) -> bool {
    if raw.is_empty() {
        true
    } else {
        raw.eq_ignore_ascii_case("OUI")
    }
}

/// Parse a French-convention decimal: comma separator, stray currency
/// symbols and unit suffixes tolerated. Failure yields 0.
fn parse_fr_float(raw: &str) -> f64 {
    if raw.is_empty() {
        return 0.0;
    }
    let cleaned: String = raw
        .replacen(',', ".", 1)
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    cleaned.parse().unwrap_or(0.0)
}

/// Quantity is a whole number of units, never negative
fn parse_quantity(raw: &str) -> u32 {
    let value = parse_fr_float(raw);
    if value <= 0.0 { 0 } else { value as u32 }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "Client;Lieu;Adresse;Date;Agent;Appareil;Crete;ConsoHoraire;PuissanceMax;Duree;Qte;Observations;NomAgent";

    #[test]
    fn parses_well_formed_rows() {
        let csv = format!(
            "{HEADER}\n\
             Dupont;Maison;12 rue des Lilas;03/04/2025;AG1;Frigo;OUI;0,15;120;24;1;RAS;Jean\n\
             Dupont;Maison;12 rue des Lilas;03/04/2025;AG1;Climatiseur;NON;1,2;900;6;2;;\n"
        );
        let items = parse_csv(&csv);
        assert_eq!(items.len(), 2);

        let frigo = &items[0];
        assert_eq!(frigo.client, "Dupont");
        assert_eq!(frigo.device, "Frigo");
        assert!(frigo.included_in_peak);
        assert_eq!(frigo.hourly_kwh, 0.15);
        assert_eq!(frigo.peak_w, 120.0);
        assert_eq!(frigo.duration_h, 24.0);
        assert_eq!(frigo.quantity, 1);
        assert_eq!(frigo.unit_price, 0.0);
        assert_eq!(frigo.observations, "RAS");
        assert_eq!(frigo.agent_name, "Jean");

        let clim = &items[1];
        assert!(!clim.included_in_peak);
        assert_eq!(clim.quantity, 2);
        // blank display name falls back to the agent column
        assert_eq!(clim.agent_name, "AG1");
    }

    #[test]
    fn strips_bom_and_quotes() {
        let csv = format!("\u{feff}{HEADER}\n\"Dupont\";Maison;\"12, rue\";d;a;Frigo;OUI;1;1;1;1");
        let items = parse_csv(&csv);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].client, "Dupont");
        assert_eq!(items[0].address, "12, rue");
    }

    #[test]
    fn header_only_yields_empty() {
        assert!(parse_csv(HEADER).is_empty());
        assert!(parse_csv("").is_empty());
        assert!(parse_csv("\n\n  \n").is_empty());
    }

    #[test]
    fn malformed_numerics_degrade_to_zero() {
        let csv = format!("{HEADER}\nDupont;M;A;d;a;Frigo;OUI;abc;-50;n/a;-3");
        let items = parse_csv(&csv);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].hourly_kwh, 0.0);
        // negative peak power is clamped, not propagated
        assert_eq!(items[0].peak_w, 0.0);
        assert_eq!(items[0].duration_h, 0.0);
        assert_eq!(items[0].quantity, 0);
    }

    #[test]
    fn inclusion_flag_tokens() {
        assert!(parse_inclusion_flag(""));
        assert!(parse_inclusion_flag("OUI"));
        assert!(parse_inclusion_flag("oui"));
        assert!(!parse_inclusion_flag("NON"));
        assert!(!parse_inclusion_flag("yes"));
    }

    #[test]
    fn currency_symbols_are_tolerated() {
        assert_eq!(parse_fr_float("1 234,5 kWh"), 1234.5);
        assert_eq!(parse_fr_float("€12,50"), 12.5);
        assert_eq!(parse_fr_float(""), 0.0);
    }

    #[test]
    fn comma_delimited_export_is_detected() {
        let csv = "Client,Lieu,Adresse,Date,Agent,Appareil,Crete,Conso,Max,Duree,Qte\n\
                   Dupont,Maison,Adresse,d,a,Frigo,OUI,0.5,100,4,2";
        let items = parse_csv(csv);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].hourly_kwh, 0.5);
        assert_eq!(items[0].quantity, 2);
    }

    #[test]
    fn short_rows_read_as_blank_columns() {
        let csv = format!("{HEADER}\nDupont;Maison;Adresse");
        let items = parse_csv(&csv);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].device, "");
        // absent inclusion flag defaults to true
        assert!(items[0].included_in_peak);
        assert_eq!(items[0].quantity, 0);
    }

    #[test]
    fn blank_lines_inside_the_file_are_skipped() {
        let csv = format!("{HEADER}\n\nDupont;M;A;d;a;Frigo;OUI;1;1;1;1\n   \n");
        assert_eq!(parse_csv(&csv).len(), 1);
    }

    #[test]
    fn ids_are_unique_within_an_import() {
        let csv = format!("{HEADER}\nD;M;A;d;a;X;OUI;1;1;1;1\nD;M;A;d;a;Y;OUI;1;1;1;1");
        let items = parse_csv(&csv);
        assert_ne!(items[0].id, items[1].id);
    }
}
