// src/handlers/notifications.rs

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{common::error::AppError, config::AppState, models::notification::Notification};

// GET /api/notificaciones
#[utoipa::path(
    get,
    path = "/api/notificaciones",
    tag = "Notificaciones",
    responses(
        (status = 200, description = "Notificaciones de stock bajo, más recientes primero", body = Vec<Notification>)
    )
)]
pub async fn list_notifications(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<Notification>>, AppError> {
    let notifications = app_state.notification_service.list().await?;
    Ok(Json(notifications))
}

// PATCH /api/notificaciones/{id}/leida
#[utoipa::path(
    patch,
    path = "/api/notificaciones/{id}/leida",
    tag = "Notificaciones",
    params(("id" = i64, Path, description = "ID de la notificación")),
    responses(
        (status = 200, description = "Notificación marcada como leída", body = Notification),
        (status = 404, description = "Notificación no encontrada")
    )
)]
pub async fn mark_notification_read(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Notification>, AppError> {
    let notification = app_state.notification_service.mark_read(id).await?;
    Ok(Json(notification))
}
