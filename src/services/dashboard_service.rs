// src/services/dashboard_service.rs
//
// Orquestração por requisição: carrega a tabela fresca do banco, resolve a
// especificação de filtros, aplica ano → demais dimensões e agrega. Sem
// cache e sem estado entre requisições.

use crate::{
    common::error::AppError,
    config::AnalyticsSettings,
    db::SalesRepository,
    models::{
        dashboard::{
            DashboardMetrics, DashboardQuery, DashboardResponse, FilterOptions, FilterSpec,
            MetricsView, MonthOption, SelectedFilters, ALL_SENTINEL,
        },
        sales::Transaction,
    },
    services::{analytics, analytics::format_k_m, loader},
};
use chrono::Datelike;
use std::collections::BTreeSet;

// Equivalente ao calendar.month_name: rótulos dos controles de mês.
const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

const EMPTY_LABEL: &str = "-";
const EMPTY_INVOICE_LABEL: &str = "N/A";
const DAY_FORMAT: &str = "%d-%m-%Y";

#[derive(Clone)]
pub struct DashboardService {
    repo: SalesRepository,
    settings: AnalyticsSettings,
}

impl DashboardService {
    pub fn new(repo: SalesRepository, settings: AnalyticsSettings) -> Self {
        Self { repo, settings }
    }

    /// O contrato do Loader: busca + limpeza, ou uma falha de carga única.
    pub async fn load(&self) -> Result<Vec<Transaction>, AppError> {
        let rows = self.repo.fetch_all().await?;
        let table = loader::clean(rows, &self.settings.return_marker)?;
        tracing::debug!(rows = table.len(), "tabela de vendas carregada");
        Ok(table)
    }

    /// Monta a resposta completa do dashboard para uma especificação de
    /// filtros já validada.
    pub async fn dashboard(&self, query: &DashboardQuery) -> Result<DashboardResponse, AppError> {
        let table = self.load().await?;

        // Opções dos controles: sempre da tabela sem filtro.
        let options = Self::filter_options(&table);
        let spec = Self::resolve_spec(query);
        let selected = Self::selected(&spec, &options);

        // Ano primeiro, depois as demais dimensões. O status "ativo" é
        // computado sobre a tabela totalmente filtrada.
        let filtered = analytics::apply_filters(
            analytics::filter_by_years(table, &spec.years),
            &spec,
        );
        let metrics = analytics::aggregate(&filtered, &self.settings);

        Ok(DashboardResponse {
            error: None,
            options,
            selected,
            metrics: Self::render_metrics(&metrics),
        })
    }

    /// O estado "sem dados" exigido quando a carga falha: métricas zeradas,
    /// rótulos sentinela e listas de opções vazias (os meses são estáticos).
    pub fn no_data_response(message: String) -> DashboardResponse {
        DashboardResponse {
            error: Some(message),
            options: FilterOptions {
                years: vec![],
                months: Self::month_options(),
                locations: vec![],
                pharmacists: vec![],
            },
            selected: SelectedFilters {
                years: vec![],
                months: vec![],
                locations: vec![],
                pharmacists: vec![],
            },
            metrics: Self::render_metrics(&DashboardMetrics::default()),
        }
    }

    fn month_options() -> Vec<MonthOption> {
        (1..=12)
            .map(|number| MonthOption {
                number,
                name: MONTH_NAMES[number as usize - 1].to_string(),
            })
            .collect()
    }

    /// Valores distintos da tabela sem filtro, ordenados, para popular os
    /// controles de filtro.
    pub fn filter_options(table: &[Transaction]) -> FilterOptions {
        let years: BTreeSet<i32> = table.iter().map(|t| t.date.year()).collect();
        let locations: BTreeSet<&str> = table.iter().map(|t| t.location.as_str()).collect();
        let pharmacists: BTreeSet<&str> = table.iter().map(|t| t.pharmacist.as_str()).collect();

        FilterOptions {
            years: years.into_iter().collect(),
            months: Self::month_options(),
            locations: locations.into_iter().map(str::to_string).collect(),
            pharmacists: pharmacists.into_iter().map(str::to_string).collect(),
        }
    }

    /// Converte a query validada na especificação tipada. O sentinela "all"
    /// em qualquer posição, ou a lista vazia, vira "sem restrição".
    pub fn resolve_spec(query: &DashboardQuery) -> FilterSpec {
        fn resolve<T>(values: &[String], parse: impl Fn(&str) -> Option<T>) -> Vec<T> {
            if values.iter().any(|v| v == ALL_SENTINEL) {
                return vec![];
            }
            values.iter().filter_map(|v| parse(v)).collect()
        }

        FilterSpec {
            years: resolve(&query.years, |v| v.parse().ok()),
            months: resolve(&query.months, |v| v.parse().ok()),
            locations: resolve(&query.locations, |v| Some(v.to_string())),
            pharmacists: resolve(&query.pharmacists, |v| Some(v.to_string())),
        }
    }

    // Dimensões sem restrição ecoam a lista completa de opções.
    fn selected(spec: &FilterSpec, options: &FilterOptions) -> SelectedFilters {
        SelectedFilters {
            years: if spec.years.is_empty() {
                options.years.clone()
            } else {
                spec.years.clone()
            },
            months: if spec.months.is_empty() {
                (1..=12).collect()
            } else {
                spec.months.clone()
            },
            locations: if spec.locations.is_empty() {
                options.locations.clone()
            } else {
                spec.locations.clone()
            },
            pharmacists: if spec.pharmacists.is_empty() {
                options.pharmacists.clone()
            } else {
                spec.pharmacists.clone()
            },
        }
    }

    /// Formata o registro de métricas para exibição.
    pub fn render_metrics(metrics: &DashboardMetrics) -> MetricsView {
        let day_label = |day: &Option<chrono::NaiveDate>| {
            day.map(|d| d.format(DAY_FORMAT).to_string())
                .unwrap_or_else(|| EMPTY_LABEL.to_string())
        };
        let name_label = |name: &Option<String>| {
            name.clone().unwrap_or_else(|| EMPTY_LABEL.to_string())
        };
        let invoice_label = |value: &Option<String>| {
            value.clone().unwrap_or_else(|| EMPTY_INVOICE_LABEL.to_string())
        };

        MetricsView {
            total_active: metrics.total_active,
            total_net_sales: format_k_m(metrics.total_net_sales),
            total_invoices: format_k_m(metrics.total_invoices.into()),
            avg_daily_sales: format_k_m(metrics.avg_daily_sales),
            avg_daily_tx: format_k_m(metrics.avg_daily_tx),
            top_day: day_label(&metrics.top_day),
            top_day_val: format_k_m(metrics.top_day_val),
            top_day_inv: day_label(&metrics.top_day_inv),
            top_day_inv_val: format_k_m(metrics.top_day_inv_val.into()),
            top_pharmacist: name_label(&metrics.top_pharmacist),
            top_pharmacist_val: format_k_m(metrics.top_pharmacist_val),
            top_pharmacist_inv: name_label(&metrics.top_pharmacist_inv),
            top_pharmacist_inv_val: format_k_m(metrics.top_pharmacist_inv_val.into()),
            top_invoice_val: format_k_m(metrics.top_invoice_val),
            top_invoice_num: invoice_label(&metrics.top_invoice_num),
            top_invoice_pharmacist: invoice_label(&metrics.top_invoice_pharmacist),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use rust_decimal_macros::dec;

    fn tx(date: &str, location: &str, pharmacist: &str) -> Transaction {
        Transaction {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .unwrap()
                .and_time(NaiveTime::MIN),
            invoice_number: "INV-1".to_string(),
            location: location.to_string(),
            pharmacist: pharmacist.to_string(),
            net_revenue: dec!(10),
        }
    }

    #[test]
    fn all_sentinel_and_empty_list_mean_no_restriction() {
        let explicit = DashboardQuery {
            years: vec!["all".to_string(), "2025".to_string()],
            months: vec!["all".to_string()],
            locations: vec![],
            pharmacists: vec!["all".to_string()],
        };
        assert_eq!(DashboardService::resolve_spec(&explicit), FilterSpec::default());
        assert_eq!(
            DashboardService::resolve_spec(&DashboardQuery::default()),
            FilterSpec::default()
        );
    }

    #[test]
    fn resolve_spec_parses_selected_values() {
        let query = DashboardQuery {
            years: vec!["2024".to_string(), "2025".to_string()],
            months: vec!["5".to_string()],
            locations: vec!["Al Noor".to_string()],
            pharmacists: vec!["Mona Khalil".to_string()],
        };
        let spec = DashboardService::resolve_spec(&query);
        assert_eq!(spec.years, vec![2024, 2025]);
        assert_eq!(spec.months, vec![5]);
        assert_eq!(spec.locations, vec!["Al Noor".to_string()]);
        assert_eq!(spec.pharmacists, vec!["Mona Khalil".to_string()]);
    }

    #[test]
    fn filter_options_are_distinct_and_sorted() {
        let table = vec![
            tx("2025-05-23", "Al Salam", "Mona Khalil"),
            tx("2024-02-10", "Al Noor", "Ahmed Mahmoud"),
            tx("2025-06-01", "Al Noor", "Mona Khalil"),
        ];
        let options = DashboardService::filter_options(&table);
        assert_eq!(options.years, vec![2024, 2025]);
        assert_eq!(options.locations, vec!["Al Noor", "Al Salam"]);
        assert_eq!(options.pharmacists, vec!["Ahmed Mahmoud", "Mona Khalil"]);
        assert_eq!(options.months.len(), 12);
        assert_eq!(options.months[4].name, "May");
    }

    #[test]
    fn unrestricted_selection_echoes_full_option_lists() {
        let table = vec![tx("2025-05-23", "Al Noor", "Mona Khalil")];
        let options = DashboardService::filter_options(&table);
        let selected = DashboardService::selected(&FilterSpec::default(), &options);
        assert_eq!(selected.years, options.years);
        assert_eq!(selected.months, (1..=12).collect::<Vec<_>>());
        assert_eq!(selected.locations, options.locations);
        assert_eq!(selected.pharmacists, options.pharmacists);
    }

    #[test]
    fn rendered_empty_state_uses_sentinels() {
        let view = DashboardService::render_metrics(&DashboardMetrics::default());
        assert_eq!(view.total_active, 0);
        assert_eq!(view.total_net_sales, "0");
        assert_eq!(view.total_invoices, "0");
        assert_eq!(view.top_day, "-");
        assert_eq!(view.top_day_val, "0");
        assert_eq!(view.top_pharmacist, "-");
        assert_eq!(view.top_invoice_num, "N/A");
        assert_eq!(view.top_invoice_pharmacist, "N/A");
    }

    #[test]
    fn rendered_dates_use_day_month_year() {
        let metrics = DashboardMetrics {
            top_day: NaiveDate::from_ymd_opt(2025, 5, 24),
            top_day_val: dec!(1500000),
            ..DashboardMetrics::default()
        };
        let view = DashboardService::render_metrics(&metrics);
        assert_eq!(view.top_day, "24-05-2025");
        assert_eq!(view.top_day_val, "1.50M");
    }

    #[test]
    fn no_data_response_is_well_defined() {
        let response = DashboardService::no_data_response("sem banco".to_string());
        assert_eq!(response.error.as_deref(), Some("sem banco"));
        assert!(response.options.years.is_empty());
        assert_eq!(response.options.months.len(), 12);
        assert_eq!(response.metrics.top_day, "-");
        assert_eq!(response.metrics.total_net_sales, "0");
    }
}
