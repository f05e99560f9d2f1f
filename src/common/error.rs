use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Producto duplicado: ya existe un producto con ese nombre y proveedor.")]
    DuplicateProduct,

    #[error("Proveedor no encontrado")]
    SupplierNotFound(i32),

    #[error("Producto no encontrado o ya eliminado")]
    ProductNotFound(i32),

    #[error("No hay suficiente stock disponible. Stock actual: {current}")]
    InsufficientStock { current: i32 },

    #[error("Cantidad inválida: {0}")]
    InvalidAmount(i32),

    // Outra requisição alterou o produto entre a leitura e a escrita.
    #[error("El producto fue modificado por otra operación, intente nuevamente")]
    ConcurrentModification(i32),

    #[error("Notificación no encontrada")]
    NotificationNotFound(i64),

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // `anyhow::Error` captura o contexto de qualquer outro erro inesperado.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::InvalidAmount(_)
            | AppError::InsufficientStock { .. } => StatusCode::BAD_REQUEST,
            AppError::DuplicateProduct | AppError::ConcurrentModification(_) => StatusCode::CONFLICT,
            AppError::SupplierNotFound(_)
            | AppError::ProductNotFound(_)
            | AppError::NotificationNotFound(_) => StatusCode::NOT_FOUND,
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let error_message = match self {
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
                    "error": "Uno o más campos son inválidos.",
                    "details": details,
                }));
                return (status, body).into_response();
            }

            // O `tracing` loga a mensagem detalhada; o cliente recebe só a genérica.
            ref e @ (AppError::DatabaseError(_) | AppError::InternalServerError(_)) => {
                tracing::error!("Erro Interno do Servidor: {:?}", e);
                "Ocurrió un error inesperado.".to_string()
            }

            ref e => e.to_string(),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
