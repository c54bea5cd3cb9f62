use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
//
// As falhas de carga (banco e parsing de data) são o único tipo de falha
// reconhecido pelo núcleo: depois que a tabela foi carregada, a agregação
// é total e nunca falha, nem com a tabela vazia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Variante para erros de banco de dados (conexão ou consulta)
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // A coluna de data é tratada como um todo: uma linha inválida
    // invalida a carga inteira, sem modo degradado parcial.
    #[error("Data de fatura inválida: '{value}'")]
    DateParseError { value: String },

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    /// Falhas que o handler do dashboard converte no estado "sem dados"
    /// em vez de responder 500 (ver handlers::dashboard).
    pub fn is_load_failure(&self) -> bool {
        matches!(
            self,
            AppError::DatabaseError(_) | AppError::DateParseError { .. }
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            // Todos os outros erros viram 500. O `tracing` loga a mensagem
            // detalhada que `thiserror` nos deu.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.")
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
