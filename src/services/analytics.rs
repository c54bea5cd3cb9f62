// src/services/analytics.rs
//
// O "Aggregator" do pipeline: recebe a tabela já limpa pelo loader e produz
// o registro de métricas do dashboard. Todas as regras de negócio ficam
// concentradas aqui e são totais: tabela vazia produz zeros e sentinelas,
// nunca erro. A inversão de sinal das devoluções já aconteceu na carga e
// não se repete em nenhuma métrica.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::{
    config::AnalyticsSettings,
    models::{
        dashboard::{DashboardMetrics, FilterSpec},
        sales::Transaction,
    },
};

/// Filtro de anos, aplicado como pré-condição antes das demais dimensões.
/// Lista vazia = sem restrição.
pub fn filter_by_years(mut table: Vec<Transaction>, years: &[i32]) -> Vec<Transaction> {
    if years.is_empty() {
        return table;
    }
    table.retain(|t| years.contains(&t.date.year()));
    table
}

/// Filtros de mês, local e farmacêutico. Em cada dimensão, lista vazia
/// significa pass-through (nenhuma linha é descartada por ela).
pub fn apply_filters(mut table: Vec<Transaction>, spec: &FilterSpec) -> Vec<Transaction> {
    if !spec.months.is_empty() {
        table.retain(|t| spec.months.contains(&t.date.month()));
    }
    if !spec.locations.is_empty() {
        table.retain(|t| spec.locations.contains(&t.location));
    }
    if !spec.pharmacists.is_empty() {
        table.retain(|t| spec.pharmacists.contains(&t.pharmacist));
    }
    table
}

/// Farmacêuticos ativos na tabela recebida (que já vem filtrada; esta
/// função não filtra por ano ou mês). Ativo = trabalhou em pelo menos
/// `active_days_threshold` dias-calendário distintos e não está na lista
/// de exclusão configurada.
pub fn active_pharmacists(
    table: &[Transaction],
    settings: &AnalyticsSettings,
) -> BTreeSet<String> {
    let mut days_worked: BTreeMap<&str, BTreeSet<NaiveDate>> = BTreeMap::new();
    for t in table {
        days_worked.entry(t.pharmacist.as_str()).or_default().insert(t.day());
    }

    days_worked
        .into_iter()
        .filter(|(name, days)| {
            days.len() as u32 >= settings.active_days_threshold
                && !settings.excluded_pharmacists.iter().any(|ex| ex.as_str() == *name)
        })
        .map(|(name, _)| name.to_string())
        .collect()
}

// Maior valor de um mapa ordenado; em empate vence a primeira chave na
// ordem do BTreeMap (data mais antiga / nome lexicograficamente menor).
fn max_entry<K, V>(map: &BTreeMap<K, V>) -> Option<(&K, V)>
where
    V: PartialOrd + Copy,
{
    let mut best: Option<(&K, V)> = None;
    for (key, value) in map {
        let better = match best {
            Some((_, current)) => *value > current,
            None => true,
        };
        if better {
            best = Some((key, *value));
        }
    }
    best
}

fn distinct_invoices<'a>(rows: impl Iterator<Item = &'a Transaction>) -> u64 {
    rows.map(|t| t.invoice_number.as_str())
        .collect::<HashSet<_>>()
        .len() as u64
}

/// Calcula o registro de métricas sobre a tabela já filtrada.
pub fn aggregate(table: &[Transaction], settings: &AnalyticsSettings) -> DashboardMetrics {
    let total_active = active_pharmacists(table, settings).len();
    let total_net_sales: Decimal = table.iter().map(|t| t.net_revenue).sum();
    let total_invoices = distinct_invoices(table.iter());

    // Médias diárias. A exclusão opcional de um dia da semana
    // (settings.exclude_weekday) vale somente para estas duas métricas.
    let daily_rows: Vec<&Transaction> = match settings.exclude_weekday {
        Some(weekday) => table.iter().filter(|t| t.date.weekday() != weekday).collect(),
        None => table.iter().collect(),
    };
    let unique_days = daily_rows.iter().map(|t| t.day()).collect::<BTreeSet<_>>().len();
    let (avg_daily_sales, avg_daily_tx) = if unique_days == 0 {
        (Decimal::ZERO, Decimal::ZERO)
    } else {
        let days = Decimal::from(unique_days as u64);
        let sales: Decimal = daily_rows.iter().map(|t| t.net_revenue).sum();
        let invoices = distinct_invoices(daily_rows.iter().copied());
        (sales / days, Decimal::from(invoices) / days)
    };

    // Dia com maior venda líquida (mesmo que negativa ou zero).
    let mut daily_sales: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for t in table {
        *daily_sales.entry(t.day()).or_default() += t.net_revenue;
    }
    let (top_day, top_day_val) = match max_entry(&daily_sales) {
        Some((day, value)) => (Some(*day), value),
        None => (None, Decimal::ZERO),
    };

    // Dia com mais faturas distintas.
    let mut daily_invoices: BTreeMap<NaiveDate, HashSet<&str>> = BTreeMap::new();
    for t in table {
        daily_invoices.entry(t.day()).or_default().insert(t.invoice_number.as_str());
    }
    let daily_invoice_counts: BTreeMap<NaiveDate, u64> = daily_invoices
        .into_iter()
        .map(|(day, invoices)| (day, invoices.len() as u64))
        .collect();
    let (top_day_inv, top_day_inv_val) = match max_entry(&daily_invoice_counts) {
        Some((day, value)) => (Some(*day), value),
        None => (None, 0),
    };

    // Farmacêutico com maior venda líquida.
    let mut pharmacist_sales: BTreeMap<&str, Decimal> = BTreeMap::new();
    for t in table {
        *pharmacist_sales.entry(t.pharmacist.as_str()).or_default() += t.net_revenue;
    }
    let (top_pharmacist, top_pharmacist_val) = match max_entry(&pharmacist_sales) {
        Some((name, value)) => (Some((*name).to_string()), value),
        None => (None, Decimal::ZERO),
    };

    // Farmacêutico com mais faturas distintas.
    let mut pharmacist_invoices: BTreeMap<&str, HashSet<&str>> = BTreeMap::new();
    for t in table {
        pharmacist_invoices
            .entry(t.pharmacist.as_str())
            .or_default()
            .insert(t.invoice_number.as_str());
    }
    let pharmacist_invoice_counts: BTreeMap<&str, u64> = pharmacist_invoices
        .into_iter()
        .map(|(name, invoices)| (name, invoices.len() as u64))
        .collect();
    let (top_pharmacist_inv, top_pharmacist_inv_val) = match max_entry(&pharmacist_invoice_counts) {
        Some((name, value)) => (Some((*name).to_string()), value),
        None => (None, 0),
    };

    // A fatura individual de maior valor, considerando só valores
    // estritamente positivos (devoluções nunca aparecem aqui).
    let mut top_invoice: Option<&Transaction> = None;
    for t in table {
        if t.net_revenue > Decimal::ZERO
            && top_invoice.is_none_or(|best| t.net_revenue > best.net_revenue)
        {
            top_invoice = Some(t);
        }
    }
    let (top_invoice_val, top_invoice_num, top_invoice_pharmacist) = match top_invoice {
        Some(t) => (
            t.net_revenue,
            Some(t.invoice_number.clone()),
            Some(t.pharmacist.clone()),
        ),
        None => (Decimal::ZERO, None, None),
    };

    DashboardMetrics {
        total_active,
        total_net_sales,
        total_invoices,
        avg_daily_sales,
        avg_daily_tx,
        top_day,
        top_day_val,
        top_day_inv,
        top_day_inv_val,
        top_pharmacist,
        top_pharmacist_val,
        top_pharmacist_inv,
        top_pharmacist_inv_val,
        top_invoice_val,
        top_invoice_num,
        top_invoice_pharmacist,
    }
}

/// Formata um valor para exibição: "1.50M", "2.50K", inteiros sem casas
/// decimais e o resto com duas casas.
pub fn format_k_m(value: Decimal) -> String {
    let abs = value.abs();
    if abs >= Decimal::from(1_000_000) {
        format!("{:.2}M", value / Decimal::from(1_000_000))
    } else if abs >= Decimal::from(1_000) {
        format!("{:.2}K", value / Decimal::from(1_000))
    } else if value.is_integer() {
        format!("{}", value.normalize())
    } else {
        format!("{value:.2}")
    }
}
