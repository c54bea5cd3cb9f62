// src/docs.rs

use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Dashboard ---
        handlers::dashboard::get_dashboard,
        handlers::dashboard::get_dashboard_default,
    ),
    components(
        schemas(
            models::dashboard::DashboardQuery,
            models::dashboard::DashboardResponse,
            models::dashboard::MetricsView,
            models::dashboard::FilterOptions,
            models::dashboard::MonthOption,
            models::dashboard::SelectedFilters,
        )
    ),
    tags(
        (name = "Dashboard", description = "Métricas de vendas da farmácia")
    )
)]
pub struct ApiDoc;
