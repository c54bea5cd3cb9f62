// src/config.rs

use crate::{db::SalesRepository, services::DashboardService};
use chrono::Weekday;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::PgPool;
use std::{env, time::Duration};

// Os parâmetros de negócio da classificação e da agregação. Tudo aqui é
// configuração externa (variáveis de ambiente), nada fica enterrado no
// corpo das funções de cálculo.
#[derive(Clone, Debug)]
pub struct AnalyticsSettings {
    /// Mínimo de dias-calendário distintos trabalhados para contar como
    /// farmacêutico ativo.
    pub active_days_threshold: u32,
    /// Nomes que nunca entram na contagem de ativos.
    pub excluded_pharmacists: Vec<String>,
    /// Substring que marca uma fatura de devolução.
    pub return_marker: String,
    /// Dia da semana excluído das médias diárias (ex.: "fri").
    /// Desligado por padrão.
    pub exclude_weekday: Option<Weekday>,
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self {
            active_days_threshold: 15,
            excluded_pharmacists: vec!["Saad Saad".to_string(), "Tamer Elmorsi".to_string()],
            return_marker: "-R".to_string(),
            exclude_weekday: None,
        }
    }
}

impl AnalyticsSettings {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let active_days_threshold = env::var("ACTIVE_DAYS_THRESHOLD")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.active_days_threshold);

        let excluded_pharmacists = env::var("EXCLUDED_PHARMACISTS")
            .ok()
            .map(|v| {
                v.split(',')
                    .map(|name| name.trim().to_string())
                    .filter(|name| !name.is_empty())
                    .collect()
            })
            .unwrap_or(defaults.excluded_pharmacists);

        let return_marker =
            env::var("RETURN_MARKER").unwrap_or(defaults.return_marker);

        let exclude_weekday = env::var("EXCLUDE_WEEKDAY")
            .ok()
            .and_then(|v| match v.parse::<Weekday>() {
                Ok(weekday) => Some(weekday),
                Err(_) => {
                    tracing::warn!("EXCLUDE_WEEKDAY inválido ('{v}'), ignorando");
                    None
                }
            });

        Self {
            active_days_threshold,
            excluded_pharmacists,
            return_marker,
            exclude_weekday,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub settings: AnalyticsSettings,
    pub dashboard_service: DashboardService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        // Parâmetros individuais de conexão, com SSL obrigatório,
        // exatamente como o ambiente de produção fornece.
        let connect_options = PgConnectOptions::new()
            .host(&env::var("DB_HOST").expect("DB_HOST deve ser definida"))
            .database(&env::var("DB_NAME").expect("DB_NAME deve ser definida"))
            .username(&env::var("DB_USER").expect("DB_USER deve ser definido"))
            .password(&env::var("DB_PASSWORD").expect("DB_PASSWORD deve ser definida"))
            .port(
                env::var("DB_PORT")
                    .expect("DB_PORT deve ser definida")
                    .parse()?,
            )
            .ssl_mode(PgSslMode::Require);

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect_with(connect_options)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let settings = AnalyticsSettings::from_env();
        let sales_repo = SalesRepository::new(db_pool.clone());
        let dashboard_service = DashboardService::new(sales_repo, settings.clone());

        Ok(Self {
            db_pool,
            settings,
            dashboard_service,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_match_the_business_rules() {
        let settings = AnalyticsSettings::default();
        assert_eq!(settings.active_days_threshold, 15);
        assert_eq!(
            settings.excluded_pharmacists,
            vec!["Saad Saad".to_string(), "Tamer Elmorsi".to_string()]
        );
        assert_eq!(settings.return_marker, "-R");
        assert_eq!(settings.exclude_weekday, None);
    }
}
