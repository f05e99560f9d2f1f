// src/models/notification.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

// --- Notificação de estoque baixo ---
// No máximo uma por produto: uma nova avaliação atualiza a existente.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct Notification {
    pub id: i64,

    #[serde(rename = "codigoProducto")]
    pub product_code: i32,

    #[serde(rename = "mensaje")]
    #[schema(example = "Stock bajo: Dog Food tiene 4 unidades (umbral mínimo: 5)")]
    pub message: String,

    #[serde(rename = "stockActual")]
    pub stock: i32,

    #[serde(rename = "umbralMinimo")]
    pub low_stock_threshold: i32,

    #[serde(rename = "leida")]
    pub read: bool,

    #[serde(rename = "creadaEn")]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "actualizadaEn")]
    pub updated_at: DateTime<Utc>,
}

// Dados para gravar (ou renovar) uma notificação.
#[derive(Debug, Clone)]
pub struct NotificationDraft {
    pub product_code: i32,
    pub message: String,
    pub stock: i32,
    pub low_stock_threshold: i32,
}
