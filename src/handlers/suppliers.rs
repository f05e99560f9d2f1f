// src/handlers/suppliers.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{common::error::AppError, config::AppState, models::supplier::Supplier};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSupplierPayload {
    #[serde(rename = "nombre")]
    #[validate(
        custom(function = "crate::handlers::validate_not_blank"),
        length(max = 150, message = "El nombre admite hasta 150 caracteres.")
    )]
    #[schema(example = "Pet Supplies SA")]
    pub name: String,
}

// GET /api/proveedores
#[utoipa::path(
    get,
    path = "/api/proveedores",
    tag = "Proveedores",
    responses(
        (status = 200, description = "Proveedores ordenados por nombre", body = Vec<Supplier>)
    )
)]
pub async fn list_suppliers(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<Supplier>>, AppError> {
    let suppliers = app_state.supplier_repo.list().await?;
    Ok(Json(suppliers))
}

// POST /api/proveedores
#[utoipa::path(
    post,
    path = "/api/proveedores",
    tag = "Proveedores",
    request_body = CreateSupplierPayload,
    responses(
        (status = 201, description = "Proveedor creado", body = Supplier),
        (status = 400, description = "Datos inválidos")
    )
)]
pub async fn create_supplier(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateSupplierPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let supplier = app_state.supplier_repo.create(payload.name.trim()).await?;
    tracing::info!("✅ Fornecedor criado: {} (ID: {})", supplier.name, supplier.id);

    Ok((StatusCode::CREATED, Json(supplier)))
}
