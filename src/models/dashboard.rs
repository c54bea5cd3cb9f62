// src/models/dashboard.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Valor especial aceito em qualquer dimensão do filtro: "all" significa
/// "sem restrição nessa dimensão", o mesmo que omitir o campo.
pub const ALL_SENTINEL: &str = "all";

// A especificação de filtros como chega do front end. Os valores vêm como
// strings (estilo formulário); anos e meses são validados aqui e convertidos
// em FilterSpec pelo DashboardService.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardQuery {
    #[validate(custom(function = "validate_years"))]
    #[schema(example = json!(["2025"]))]
    pub years: Vec<String>,

    #[validate(custom(function = "validate_months"))]
    #[schema(example = json!(["5", "6"]))]
    pub months: Vec<String>,

    #[schema(example = json!(["all"]))]
    pub locations: Vec<String>,

    pub pharmacists: Vec<String>,
}

fn validate_years(years: &[String]) -> Result<(), ValidationError> {
    for value in years {
        if value != ALL_SENTINEL && value.parse::<i32>().is_err() {
            let mut err = ValidationError::new("year");
            err.message = Some("O ano deve ser um número inteiro ou 'all'.".into());
            return Err(err);
        }
    }
    Ok(())
}

fn validate_months(months: &[String]) -> Result<(), ValidationError> {
    for value in months {
        let ok = value == ALL_SENTINEL
            || matches!(value.parse::<u32>(), Ok(m) if (1..=12).contains(&m));
        if !ok {
            let mut err = ValidationError::new("month");
            err.message = Some("O mês deve estar entre 1 e 12, ou ser 'all'.".into());
            return Err(err);
        }
    }
    Ok(())
}

// A especificação resolvida, já tipada. Vetor vazio em uma dimensão
// significa "sem restrição" (pass-through), nunca "excluir tudo".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    pub years: Vec<i32>,
    pub months: Vec<u32>,
    pub locations: Vec<String>,
    pub pharmacists: Vec<String>,
}

// O registro de métricas calculado sobre a tabela filtrada. Derivado,
// nunca armazenado: recomputado do zero a cada requisição.
// Default = o estado de tabela vazia (tudo zero / None).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardMetrics {
    pub total_active: usize,
    pub total_net_sales: Decimal,
    pub total_invoices: u64,
    pub avg_daily_sales: Decimal,
    pub avg_daily_tx: Decimal,
    pub top_day: Option<NaiveDate>,
    pub top_day_val: Decimal,
    pub top_day_inv: Option<NaiveDate>,
    pub top_day_inv_val: u64,
    pub top_pharmacist: Option<String>,
    pub top_pharmacist_val: Decimal,
    pub top_pharmacist_inv: Option<String>,
    pub top_pharmacist_inv_val: u64,
    pub top_invoice_val: Decimal,
    pub top_invoice_num: Option<String>,
    pub top_invoice_pharmacist: Option<String>,
}

// As métricas formatadas para exibição: moeda e contagens passam pelo
// formato K/M, datas viram "dd-mm-aaaa", rótulos ausentes viram "-"
// (ou "N/A" no caso da fatura de maior valor).
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MetricsView {
    #[schema(example = 12)]
    pub total_active: usize,
    #[schema(example = "1.50M")]
    pub total_net_sales: String,
    #[schema(example = "32.10K")]
    pub total_invoices: String,
    pub avg_daily_sales: String,
    pub avg_daily_tx: String,
    #[schema(example = "24-05-2025")]
    pub top_day: String,
    pub top_day_val: String,
    pub top_day_inv: String,
    pub top_day_inv_val: String,
    pub top_pharmacist: String,
    pub top_pharmacist_val: String,
    pub top_pharmacist_inv: String,
    pub top_pharmacist_inv_val: String,
    pub top_invoice_val: String,
    pub top_invoice_num: String,
    pub top_invoice_pharmacist: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthOption {
    #[schema(example = 5)]
    pub number: u32,
    #[schema(example = "May")]
    pub name: String,
}

// As opções disponíveis para os controles de filtro, computadas sempre a
// partir da tabela SEM filtro, independente da seleção atual.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub years: Vec<i32>,
    pub months: Vec<MonthOption>,
    pub locations: Vec<String>,
    pub pharmacists: Vec<String>,
}

// Eco da seleção efetiva: dimensões sem restrição voltam com a lista
// completa de opções, como o formulário espera.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SelectedFilters {
    pub years: Vec<i32>,
    pub months: Vec<u32>,
    pub locations: Vec<String>,
    pub pharmacists: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    // Presente apenas quando a carga falhou e o restante está no estado
    // "sem dados" — o dashboard ainda renderiza, nunca quebra.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub options: FilterOptions,
    pub selected: SelectedFilters,
    pub metrics: MetricsView,
}
