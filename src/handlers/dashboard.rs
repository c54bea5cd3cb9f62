// src/handlers/dashboard.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::dashboard::{DashboardQuery, DashboardResponse},
    services::DashboardService,
};

const LOAD_FAILURE_MESSAGE: &str =
    "Falha ao carregar os dados de vendas. Verifique a conexão com o banco de dados.";

// POST /api/dashboard
#[utoipa::path(
    post,
    path = "/api/dashboard",
    tag = "Dashboard",
    request_body = DashboardQuery,
    responses(
        (status = 200, description = "Métricas do dashboard para os filtros enviados; \
            se a carga falhar, o estado 'sem dados' com o campo error preenchido", body = DashboardResponse),
        (status = 400, description = "Filtros inválidos (ano não numérico, mês fora de 1-12)")
    )
)]
pub async fn get_dashboard(
    State(app_state): State<AppState>,
    Json(query): Json<DashboardQuery>,
) -> Result<impl IntoResponse, AppError> {
    query.validate().map_err(AppError::ValidationError)?;

    let response = run(&app_state.dashboard_service, &query).await?;
    Ok((StatusCode::OK, Json(response)))
}

// GET /api/dashboard — a visão padrão, sem nenhum filtro.
#[utoipa::path(
    get,
    path = "/api/dashboard",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Métricas do dashboard sem filtros", body = DashboardResponse)
    )
)]
pub async fn get_dashboard_default(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let response = run(&app_state.dashboard_service, &DashboardQuery::default()).await?;
    Ok((StatusCode::OK, Json(response)))
}

// Falha de carga nunca vira 500 aqui: o dashboard precisa renderizar o
// estado "sem dados" com a mensagem de erro, não quebrar.
async fn run(
    service: &DashboardService,
    query: &DashboardQuery,
) -> Result<DashboardResponse, AppError> {
    match service.dashboard(query).await {
        Ok(response) => Ok(response),
        Err(err) if err.is_load_failure() => {
            tracing::error!("falha na carga dos dados de vendas: {err}");
            Ok(DashboardService::no_data_response(LOAD_FAILURE_MESSAGE.to_string()))
        }
        Err(err) => Err(err),
    }
}
