// src/services/loader.rs
//
// O "Loader" do pipeline: transforma as linhas cruas do banco em transações
// limpas e tipadas. Toda a normalização acontece aqui, uma única vez:
// - parsing da coluna de data (falha de parse invalida a carga inteira);
// - preenchimento de valores faltantes com "Unknown";
// - nome do farmacêutico reduzido às duas primeiras palavras;
// - inversão de sinal das faturas de devolução (marcador "-R").
// Nada a jusante repete nenhum desses passos.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;

use crate::{common::error::AppError, models::sales::{SalesRow, Transaction}};

/// Sentinela para local/farmacêutico ausentes na origem.
pub const UNKNOWN: &str = "Unknown";

// Formatos de data aceitos na coluna invoicedate (com ou sem hora).
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

fn parse_invoice_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(parsed);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|day| day.and_time(NaiveTime::MIN))
}

fn fill_unknown(value: Option<String>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => UNKNOWN.to_string(),
    }
}

// Mantém só as duas primeiras palavras do nome; "Unknown" fica intocado.
fn normalize_pharmacist(name: String) -> String {
    if name == UNKNOWN {
        return name;
    }
    name.split_whitespace().take(2).collect::<Vec<_>>().join(" ")
}

/// Limpa a carga crua vinda do repositório.
///
/// Uma data ausente ou fora dos formatos aceitos falha a carga inteira
/// (`AppError::DateParseError`), sem modo parcial: é a mesma política da
/// origem, que trata a coluna de data como um todo.
pub fn clean(rows: Vec<SalesRow>, return_marker: &str) -> Result<Vec<Transaction>, AppError> {
    let mut table = Vec::with_capacity(rows.len());

    for row in rows {
        let raw_date = row.invoicedate.unwrap_or_default();
        let date = parse_invoice_date(&raw_date)
            .ok_or(AppError::DateParseError { value: raw_date })?;

        let location = fill_unknown(row.locationname);
        let pharmacist = normalize_pharmacist(fill_unknown(row.pharmacistname));
        let invoice_number = row.invoicenumber.unwrap_or_default();

        // Fatura de devolução: o valor entra negativo, exatamente uma vez.
        let mut net_revenue = row.netrevenueamount.unwrap_or(Decimal::ZERO);
        if invoice_number.contains(return_marker) {
            net_revenue = -net_revenue;
        }

        table.push(Transaction {
            date,
            invoice_number,
            location,
            pharmacist,
            net_revenue,
        });
    }

    Ok(table)
}
