// src/handlers/products.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::{
    common::error::AppError,
    config::AppState,
    models::product::ProductResponse,
    services::CreateProductParams,
};

// ---
// Validação Customizada
// ---
fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("El valor no puede ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

// ---
// Payload: CreateProduct (nomes de campo do contrato com o frontend)
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateProductPayload {
    #[serde(rename = "nombre")]
    #[validate(
        custom(function = "crate::handlers::validate_not_blank"),
        length(max = 150, message = "El nombre admite hasta 150 caracteres.")
    )]
    #[schema(example = "Dog Food")]
    pub name: String,

    #[serde(rename = "idProveedor")]
    #[schema(example = 1)]
    pub supplier_id: i32,

    #[serde(rename = "cantidad")]
    #[validate(range(min = 0, message = "La cantidad no puede ser negativa."))]
    #[schema(example = 10)]
    pub quantity: i32,

    #[serde(rename = "precio")]
    #[validate(custom(function = "validate_not_negative"))]
    #[schema(value_type = f64, example = 20.0)]
    pub price: Decimal,

    #[serde(rename = "umbralMinimo")]
    #[validate(range(min = 0, message = "El umbral mínimo no puede ser negativo."))]
    #[schema(example = 5)]
    pub low_stock_threshold: i32,

    #[serde(rename = "imagen")]
    pub image: Option<String>,

    #[serde(rename = "descripcion")]
    #[validate(length(max = 500, message = "La descripción admite hasta 500 caracteres."))]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct StockAdjustmentPayload {
    #[serde(rename = "cantidad")]
    #[validate(range(min = 1, message = "La cantidad debe ser mayor a 0."))]
    #[schema(example = 2)]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateThresholdPayload {
    #[serde(rename = "umbralMinimo")]
    #[validate(range(min = 0, message = "El umbral mínimo no puede ser negativo."))]
    #[schema(example = 5)]
    pub low_stock_threshold: i32,
}

// POST /api/productos
#[utoipa::path(
    post,
    path = "/api/productos",
    tag = "Productos",
    request_body = CreateProductPayload,
    responses(
        (status = 201, description = "Producto creado", body = ProductResponse),
        (status = 400, description = "Datos inválidos"),
        (status = 404, description = "Proveedor no encontrado"),
        (status = 409, description = "Producto duplicado")
    )
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let product = app_state
        .inventory_service
        .create_product(CreateProductParams {
            name: payload.name.trim().to_string(),
            supplier_id: payload.supplier_id,
            quantity: payload.quantity,
            price: payload.price,
            low_stock_threshold: payload.low_stock_threshold,
            image: payload.image,
            description: payload.description,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ProductResponse::from(product))))
}

// GET /api/productos
#[utoipa::path(
    get,
    path = "/api/productos",
    tag = "Productos",
    responses(
        (status = 200, description = "Productos activos", body = Vec<ProductResponse>)
    )
)]
pub async fn list_products(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    let products = app_state.inventory_service.list_active().await?;
    Ok(Json(products.iter().map(ProductResponse::from).collect()))
}

// GET /api/productos/stock-bajo
#[utoipa::path(
    get,
    path = "/api/productos/stock-bajo",
    tag = "Productos",
    responses(
        (status = 200, description = "Productos con stock en o bajo el umbral mínimo", body = Vec<ProductResponse>)
    )
)]
pub async fn list_low_stock(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    let products = app_state.inventory_service.list_low_stock().await?;
    Ok(Json(products.iter().map(ProductResponse::from).collect()))
}

// DELETE /api/productos/{codigo}
#[utoipa::path(
    delete,
    path = "/api/productos/{codigo}",
    tag = "Productos",
    params(("codigo" = i32, Path, description = "Código del producto")),
    responses(
        (status = 204, description = "Producto eliminado"),
        (status = 404, description = "Producto no encontrado o ya eliminado")
    )
)]
pub async fn delete_product(
    State(app_state): State<AppState>,
    Path(code): Path<i32>,
) -> Result<StatusCode, AppError> {
    app_state.inventory_service.delete_product(code).await?;
    Ok(StatusCode::NO_CONTENT)
}

// PATCH /api/productos/{codigo}/aumentar-stock
#[utoipa::path(
    patch,
    path = "/api/productos/{codigo}/aumentar-stock",
    tag = "Productos",
    params(("codigo" = i32, Path, description = "Código del producto")),
    request_body = StockAdjustmentPayload,
    responses(
        (status = 200, description = "Stock actualizado", body = ProductResponse),
        (status = 404, description = "Producto no encontrado o ya eliminado"),
        (status = 409, description = "Modificación concurrente")
    )
)]
pub async fn increase_stock(
    State(app_state): State<AppState>,
    Path(code): Path<i32>,
    Json(payload): Json<StockAdjustmentPayload>,
) -> Result<Json<ProductResponse>, AppError> {
    payload.validate()?;

    let product = app_state
        .inventory_service
        .increase_stock(code, payload.quantity)
        .await?;
    Ok(Json(product.into()))
}

// PATCH /api/productos/{codigo}/disminuir-stock
#[utoipa::path(
    patch,
    path = "/api/productos/{codigo}/disminuir-stock",
    tag = "Productos",
    params(("codigo" = i32, Path, description = "Código del producto")),
    request_body = StockAdjustmentPayload,
    responses(
        (status = 200, description = "Stock actualizado", body = ProductResponse),
        (status = 400, description = "Stock insuficiente"),
        (status = 404, description = "Producto no encontrado o ya eliminado"),
        (status = 409, description = "Modificación concurrente")
    )
)]
pub async fn decrease_stock(
    State(app_state): State<AppState>,
    Path(code): Path<i32>,
    Json(payload): Json<StockAdjustmentPayload>,
) -> Result<Json<ProductResponse>, AppError> {
    payload.validate()?;

    let product = app_state
        .inventory_service
        .decrease_stock(code, payload.quantity)
        .await?;
    Ok(Json(product.into()))
}

// PATCH /api/productos/{codigo}/umbral
#[utoipa::path(
    patch,
    path = "/api/productos/{codigo}/umbral",
    tag = "Productos",
    params(("codigo" = i32, Path, description = "Código del producto")),
    request_body = UpdateThresholdPayload,
    responses(
        (status = 200, description = "Umbral actualizado", body = ProductResponse),
        (status = 404, description = "Producto no encontrado o ya eliminado")
    )
)]
pub async fn update_threshold(
    State(app_state): State<AppState>,
    Path(code): Path<i32>,
    Json(payload): Json<UpdateThresholdPayload>,
) -> Result<Json<ProductResponse>, AppError> {
    payload.validate()?;

    let product = app_state
        .inventory_service
        .update_threshold(code, payload.low_stock_threshold)
        .await?;
    Ok(Json(product.into()))
}
