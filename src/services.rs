pub mod analytics;
pub mod dashboard_service;
pub mod loader;
pub use dashboard_service::DashboardService;
